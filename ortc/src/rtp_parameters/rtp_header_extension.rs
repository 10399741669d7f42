use serde::{Deserialize, Serialize};

use crate::rtp_parameters::direction::RTCRtpDirection;
use crate::rtp_parameters::rtp_codec::RtpCodecKind;

pub const SDES_MID_URI: &str = "urn:ietf:params:rtp-hdrext:sdes:mid";
pub const SDES_RTP_STREAM_ID_URI: &str = "urn:ietf:params:rtp-hdrext:sdes:rtp-stream-id";
pub const SDES_REPAIR_RTP_STREAM_ID_URI: &str =
    "urn:ietf:params:rtp-hdrext:sdes:repaired-rtp-stream-id";
pub const AUDIO_LEVEL_URI: &str = "urn:ietf:params:rtp-hdrext:ssrc-audio-level";
pub const ABS_SEND_TIME_URI: &str = "http://www.webrtc.org/experiments/rtp-hdrext/abs-send-time";
pub const TRANSPORT_CC_URI: &str =
    "http://www.ietf.org/id/draft-holmer-rmcat-transport-wide-cc-extensions-01";
pub const VIDEO_ORIENTATION_URI: &str = "urn:3gpp:video-orientation";
pub const TIME_OFFSET_URI: &str = "urn:ietf:params:rtp-hdrext:toffset";

/// A header extension the local engine or the remote endpoint supports.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCRtpHeaderExtensionCapability {
    pub kind: RtpCodecKind,
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_id: Option<u16>,
    #[serde(default)]
    pub preferred_encrypt: bool,
    #[serde(default = "default_direction")]
    pub direction: RTCRtpDirection,
}

fn default_direction() -> RTCRtpDirection {
    RTCRtpDirection::Sendrecv
}

/// A header extension negotiated for a producer or consumer.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCRtpHeaderExtensionParameters {
    pub uri: String,
    pub id: u16,
    #[serde(default)]
    pub encrypt: bool,
}
