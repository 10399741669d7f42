use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use shared::error::{Error, Result};

use crate::rtp_parameters::rtcp_parameters::RTCRtcpParameters;
use crate::rtp_parameters::rtp_codec::RTCRtpCodecParameters;
use crate::rtp_parameters::rtp_encoding_parameters::RTCRtpEncodingParameters;
use crate::rtp_parameters::rtp_header_extension::RTCRtpHeaderExtensionParameters;
use crate::rtp_parameters::{MAX_PAYLOAD_TYPE, VALID_EXT_IDS};

/// Concrete parameters of one producer or consumer. This is the
/// `rtpParameters` document exchanged with the signaling layer.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCRtpParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<String>,
    pub codecs: Vec<RTCRtpCodecParameters>,
    #[serde(default)]
    pub header_extensions: Vec<RTCRtpHeaderExtensionParameters>,
    #[serde(default)]
    pub encodings: Vec<RTCRtpEncodingParameters>,
    #[serde(default)]
    pub rtcp: RTCRtcpParameters,
}

impl RTCRtpParameters {
    /// Checks the internal consistency of the parameter set: unique payload
    /// types and header extension ids, RTX codecs and encodings referring to
    /// listed codecs, and unique SSRCs.
    pub fn validate(&self) -> Result<()> {
        let mut payload_types = HashSet::new();
        for codec in &self.codecs {
            if codec.payload_type > MAX_PAYLOAD_TYPE {
                return Err(Error::ErrInvalidParameters(format!(
                    "payload type {} out of range",
                    codec.payload_type
                )));
            }
            if !payload_types.insert(codec.payload_type) {
                return Err(Error::ErrInvalidParameters(format!(
                    "duplicate payload type {}",
                    codec.payload_type
                )));
            }
        }

        for codec in self.codecs.iter().filter(|c| c.is_rtx()) {
            match codec.apt() {
                Some(apt) if payload_types.contains(&apt) => {}
                _ => {
                    return Err(Error::ErrInvalidParameters(format!(
                        "rtx codec {} without a matching apt",
                        codec.payload_type
                    )));
                }
            }
        }

        let mut ids = HashSet::new();
        for ext in &self.header_extensions {
            if !VALID_EXT_IDS.contains(&ext.id) || !ids.insert(ext.id) {
                return Err(Error::ErrInvalidParameters(format!(
                    "invalid header extension id {} for {}",
                    ext.id, ext.uri
                )));
            }
        }

        let mut ssrcs = HashSet::new();
        for encoding in &self.encodings {
            if let Some(pt) = encoding.codec_payload_type {
                if !payload_types.contains(&pt) {
                    return Err(Error::ErrInvalidParameters(format!(
                        "encoding refers to unknown payload type {pt}"
                    )));
                }
            }
            for ssrc in encoding.ssrc.iter().chain(encoding.rtx.iter().map(|r| &r.ssrc)) {
                if !ssrcs.insert(*ssrc) {
                    return Err(Error::ErrInvalidParameters(format!("duplicate ssrc {ssrc}")));
                }
            }
        }

        Ok(())
    }

    /// The first non RTX codec, i.e. the one media is sent with.
    pub fn media_codec(&self) -> Option<&RTCRtpCodecParameters> {
        self.codecs.iter().find(|c| !c.is_rtx())
    }
}
