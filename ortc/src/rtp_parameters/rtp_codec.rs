use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use unicase::UniCase;

use crate::constants::UNSPECIFIED_STR;
use crate::rtp_parameters::PayloadType;
use crate::rtp_parameters::rtcp_parameters::RTCPFeedback;

pub const MIME_TYPE_H264: &str = "video/H264";
pub const MIME_TYPE_HEVC: &str = "video/H265";
pub const MIME_TYPE_OPUS: &str = "audio/opus";
pub const MIME_TYPE_VP8: &str = "video/VP8";
pub const MIME_TYPE_VP9: &str = "video/VP9";
pub const MIME_TYPE_AV1: &str = "video/AV1";
pub const MIME_TYPE_G722: &str = "audio/G722";
pub const MIME_TYPE_PCMU: &str = "audio/PCMU";
pub const MIME_TYPE_PCMA: &str = "audio/PCMA";
pub const MIME_TYPE_RTX: &str = "video/rtx";
pub const MIME_TYPE_ULP_FEC: &str = "video/ulpfec";
pub const MIME_TYPE_TELEPHONE_EVENT: &str = "audio/telephone-event";

/// Media kind of a codec, header extension, track or producer.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RtpCodecKind {
    Audio = 1,

    Video = 2,

    #[default]
    #[serde(other)]
    Unspecified = 0,
}

impl From<&str> for RtpCodecKind {
    fn from(raw: &str) -> Self {
        match raw {
            "audio" => RtpCodecKind::Audio,
            "video" => RtpCodecKind::Video,
            _ => RtpCodecKind::Unspecified,
        }
    }
}

impl From<u8> for RtpCodecKind {
    fn from(v: u8) -> Self {
        match v {
            1 => RtpCodecKind::Audio,
            2 => RtpCodecKind::Video,
            _ => RtpCodecKind::Unspecified,
        }
    }
}

impl fmt::Display for RtpCodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RtpCodecKind::Audio => "audio",
            RtpCodecKind::Video => "video",
            RtpCodecKind::Unspecified => UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

impl RtpCodecKind {
    /// Kind implied by the type part of a MIME type, e.g. `video/VP8`.
    pub fn from_mime_type(mime_type: &str) -> Self {
        match mime_type.split_once('/') {
            Some((typ, _)) => RtpCodecKind::from(typ.to_ascii_lowercase().as_str()),
            None => RtpCodecKind::Unspecified,
        }
    }
}

/// Value of a codec specific parameter (`a=fmtp` entry).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RTCRtpCodecParametersValue {
    Number(u32),
    String(String),
}

impl RTCRtpCodecParametersValue {
    pub fn as_number(&self) -> Option<u32> {
        match self {
            RTCRtpCodecParametersValue::Number(n) => Some(*n),
            RTCRtpCodecParametersValue::String(s) => s.parse().ok(),
        }
    }
}

impl From<u32> for RTCRtpCodecParametersValue {
    fn from(n: u32) -> Self {
        RTCRtpCodecParametersValue::Number(n)
    }
}

impl From<u8> for RTCRtpCodecParametersValue {
    fn from(n: u8) -> Self {
        RTCRtpCodecParametersValue::Number(u32::from(n))
    }
}

impl From<&str> for RTCRtpCodecParametersValue {
    fn from(s: &str) -> Self {
        RTCRtpCodecParametersValue::String(s.to_owned())
    }
}

impl fmt::Display for RTCRtpCodecParametersValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RTCRtpCodecParametersValue::Number(n) => write!(f, "{n}"),
            RTCRtpCodecParametersValue::String(s) => write!(f, "{s}"),
        }
    }
}

/// Codec specific parameters keyed by name, ordered for stable serialization.
pub type RTCRtpCodecParametersMap = BTreeMap<String, RTCRtpCodecParametersValue>;

/// Parses an SDP fmtp line such as `minptime=10;useinbandfec=1`. Numeric
/// values become [`RTCRtpCodecParametersValue::Number`].
pub fn parse_fmtp_line(line: &str) -> RTCRtpCodecParametersMap {
    let mut parameters = RTCRtpCodecParametersMap::new();
    for part in line.split(';') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (key, value) = part.split_once('=').unwrap_or((part, ""));
        let value = match value.trim().parse::<u32>() {
            Ok(n) => RTCRtpCodecParametersValue::Number(n),
            Err(_) => RTCRtpCodecParametersValue::String(value.trim().to_owned()),
        };
        parameters.insert(key.trim().to_owned(), value);
    }
    parameters
}

/// A codec the local engine or the remote endpoint is able to handle.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCRtpCodecCapability {
    pub kind: RtpCodecKind,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_payload_type: Option<PayloadType>,
    pub clock_rate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
    #[serde(default)]
    pub parameters: RTCRtpCodecParametersMap,
    #[serde(default)]
    pub rtcp_feedback: Vec<RTCPFeedback>,
}

impl RTCRtpCodecCapability {
    /// Subtype of the MIME type, e.g. `VP8`.
    pub fn name(&self) -> &str {
        codec_name(&self.mime_type)
    }

    pub fn is_rtx(&self) -> bool {
        is_rtx_mime_type(&self.mime_type)
    }

    /// Payload type this RTX codec retransmits, from its `apt` parameter.
    pub fn apt(&self) -> Option<PayloadType> {
        apt(&self.parameters)
    }
}

/// A codec selected for a concrete producer or consumer.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCRtpCodecParameters {
    pub mime_type: String,
    pub payload_type: PayloadType,
    pub clock_rate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
    #[serde(default)]
    pub parameters: RTCRtpCodecParametersMap,
    #[serde(default)]
    pub rtcp_feedback: Vec<RTCPFeedback>,
}

impl RTCRtpCodecParameters {
    pub fn name(&self) -> &str {
        codec_name(&self.mime_type)
    }

    pub fn kind(&self) -> RtpCodecKind {
        RtpCodecKind::from_mime_type(&self.mime_type)
    }

    pub fn is_rtx(&self) -> bool {
        is_rtx_mime_type(&self.mime_type)
    }

    pub fn apt(&self) -> Option<PayloadType> {
        apt(&self.parameters)
    }
}

pub(crate) fn codec_name(mime_type: &str) -> &str {
    mime_type
        .split_once('/')
        .map(|(_, name)| name)
        .unwrap_or(mime_type)
}

pub(crate) fn mime_type_eq(a: &str, b: &str) -> bool {
    UniCase::new(a) == UniCase::new(b)
}

pub(crate) fn is_rtx_mime_type(mime_type: &str) -> bool {
    codec_name(mime_type).eq_ignore_ascii_case("rtx")
}

fn apt(parameters: &RTCRtpCodecParametersMap) -> Option<PayloadType> {
    parameters
        .get("apt")
        .and_then(|v| v.as_number())
        .and_then(|n| PayloadType::try_from(n).ok())
}

pub(crate) fn rtcp_feedback_intersection(
    a: &[RTCPFeedback],
    b: &[RTCPFeedback],
) -> Vec<RTCPFeedback> {
    let mut out = vec![];
    for a_feedback in a {
        for b_feedback in b {
            if a_feedback.typ == b_feedback.typ && a_feedback.parameter == b_feedback.parameter {
                out.push(a_feedback.clone());
                break;
            }
        }
    }

    out
}
