use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::UNSPECIFIED_STR;

/// Direction of media flow, used for header extension capabilities and to
/// tell a native handler which side of the session it serves.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RTCRtpDirection {
    Sendrecv,

    Sendonly,

    Recvonly,

    Inactive,

    #[default]
    #[serde(other)]
    Unspecified,
}

const RTP_DIRECTION_SENDRECV_STR: &str = "sendrecv";
const RTP_DIRECTION_SENDONLY_STR: &str = "sendonly";
const RTP_DIRECTION_RECVONLY_STR: &str = "recvonly";
const RTP_DIRECTION_INACTIVE_STR: &str = "inactive";

impl From<&str> for RTCRtpDirection {
    fn from(raw: &str) -> Self {
        match raw {
            RTP_DIRECTION_SENDRECV_STR => RTCRtpDirection::Sendrecv,
            RTP_DIRECTION_SENDONLY_STR => RTCRtpDirection::Sendonly,
            RTP_DIRECTION_RECVONLY_STR => RTCRtpDirection::Recvonly,
            RTP_DIRECTION_INACTIVE_STR => RTCRtpDirection::Inactive,
            _ => RTCRtpDirection::Unspecified,
        }
    }
}

impl fmt::Display for RTCRtpDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCRtpDirection::Sendrecv => RTP_DIRECTION_SENDRECV_STR,
            RTCRtpDirection::Sendonly => RTP_DIRECTION_SENDONLY_STR,
            RTCRtpDirection::Recvonly => RTP_DIRECTION_RECVONLY_STR,
            RTCRtpDirection::Inactive => RTP_DIRECTION_INACTIVE_STR,
            RTCRtpDirection::Unspecified => UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

impl RTCRtpDirection {
    /// Returns true if this direction includes sending media.
    pub fn has_send(&self) -> bool {
        matches!(self, Self::Sendrecv | Self::Sendonly)
    }

    /// Returns true if this direction includes receiving media.
    pub fn has_recv(&self) -> bool {
        matches!(self, Self::Sendrecv | Self::Recvonly)
    }
}
