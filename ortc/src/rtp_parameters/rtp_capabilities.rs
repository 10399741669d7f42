use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shared::error::{Error, Result};

use crate::rtp_parameters::MAX_PAYLOAD_TYPE;
use crate::rtp_parameters::rtp_codec::{RTCRtpCodecCapability, RtpCodecKind};
use crate::rtp_parameters::rtp_header_extension::RTCRtpHeaderExtensionCapability;

/// The codecs and header extensions an endpoint is able to use.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCRtpCapabilities {
    #[serde(default)]
    pub codecs: Vec<RTCRtpCodecCapability>,
    #[serde(default)]
    pub header_extensions: Vec<RTCRtpHeaderExtensionCapability>,
}

impl RTCRtpCapabilities {
    /// Rejects capability sets that cannot be negotiated against.
    pub fn validate(&self) -> Result<()> {
        let mut preferred_payload_types = HashSet::new();
        for codec in &self.codecs {
            if codec.kind == RtpCodecKind::Unspecified {
                return Err(Error::ErrInvalidCapabilities(format!(
                    "codec {} has no kind",
                    codec.mime_type
                )));
            }
            if RtpCodecKind::from_mime_type(&codec.mime_type) != codec.kind {
                return Err(Error::ErrInvalidCapabilities(format!(
                    "codec {} does not match kind {}",
                    codec.mime_type, codec.kind
                )));
            }
            if codec.clock_rate == 0 {
                return Err(Error::ErrInvalidCapabilities(format!(
                    "codec {} has no clock rate",
                    codec.mime_type
                )));
            }
            if let Some(pt) = codec.preferred_payload_type {
                if pt > MAX_PAYLOAD_TYPE || !preferred_payload_types.insert((codec.kind, pt)) {
                    return Err(Error::ErrInvalidCapabilities(format!(
                        "invalid or duplicate payload type {pt}"
                    )));
                }
            }
            let mut feedback = HashSet::new();
            for fb in &codec.rtcp_feedback {
                if !feedback.insert((fb.typ.as_str(), fb.parameter.as_str())) {
                    return Err(Error::ErrInvalidCapabilities(format!(
                        "duplicate rtcp feedback {} {} in {}",
                        fb.typ, fb.parameter, codec.mime_type
                    )));
                }
            }
        }

        let mut uris = HashSet::new();
        for ext in &self.header_extensions {
            if ext.kind == RtpCodecKind::Unspecified || ext.uri.is_empty() {
                return Err(Error::ErrInvalidCapabilities(format!(
                    "invalid header extension {}",
                    ext.uri
                )));
            }
            if !uris.insert((ext.kind, ext.uri.as_str())) {
                return Err(Error::ErrInvalidCapabilities(format!(
                    "duplicate header extension {}",
                    ext.uri
                )));
            }
        }

        Ok(())
    }

    /// Codecs of the given kind, in order.
    pub fn codecs_of(&self, kind: RtpCodecKind) -> impl Iterator<Item = &RTCRtpCodecCapability> {
        self.codecs.iter().filter(move |c| c.kind == kind)
    }
}
