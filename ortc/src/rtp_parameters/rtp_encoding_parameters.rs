use serde::{Deserialize, Serialize};

use crate::rtp_parameters::{PayloadType, SSRC};

/// RTX stream paired with an encoding.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCRtpRtxParameters {
    pub ssrc: SSRC,
}

/// One stream of a producer, i.e. one simulcast layer when sending video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCRtpEncodingParameters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssrc: Option<SSRC>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec_payload_type: Option<PayloadType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rtx: Option<RTCRtpRtxParameters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_bitrate: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_resolution_down_by: Option<f64>,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl Default for RTCRtpEncodingParameters {
    fn default() -> Self {
        RTCRtpEncodingParameters {
            ssrc: None,
            codec_payload_type: None,
            rtx: None,
            max_bitrate: None,
            scale_resolution_down_by: None,
            active: true,
        }
    }
}

fn default_active() -> bool {
    true
}
