//! Capability and parameter types exchanged with the native engine and the
//! signaling layer. Field names serialize in camelCase.

pub mod direction;
pub mod parameters;
pub mod rtcp_parameters;
pub mod rtp_capabilities;
pub mod rtp_codec;
pub mod rtp_encoding_parameters;
pub mod rtp_header_extension;

use std::ops::RangeInclusive;

pub use direction::RTCRtpDirection;
pub use rtcp_parameters::{
    RTCPFeedback, RTCRtcpParameters, TYPE_RTCP_FB_CCM, TYPE_RTCP_FB_GOOG_REMB, TYPE_RTCP_FB_NACK,
    TYPE_RTCP_FB_TRANSPORT_CC,
};
pub use rtp_capabilities::RTCRtpCapabilities;
pub use rtp_codec::{
    MIME_TYPE_AV1, MIME_TYPE_G722, MIME_TYPE_H264, MIME_TYPE_HEVC, MIME_TYPE_OPUS, MIME_TYPE_PCMA,
    MIME_TYPE_PCMU, MIME_TYPE_RTX, MIME_TYPE_TELEPHONE_EVENT, MIME_TYPE_ULP_FEC, MIME_TYPE_VP8,
    MIME_TYPE_VP9, RTCRtpCodecCapability, RTCRtpCodecParameters, RTCRtpCodecParametersMap,
    RTCRtpCodecParametersValue, RtpCodecKind, parse_fmtp_line,
};
pub use rtp_encoding_parameters::{RTCRtpEncodingParameters, RTCRtpRtxParameters};
pub use rtp_header_extension::{RTCRtpHeaderExtensionCapability, RTCRtpHeaderExtensionParameters};
pub use parameters::RTCRtpParameters;

/// PayloadType identifies the format of the RTP payload and determines
/// its interpretation by the application. Each codec in a RTP Session
/// will have a different PayloadType
/// <https://tools.ietf.org/html/rfc3550#section-3>
pub type PayloadType = u8;

/// SSRC represents a synchronization source
/// A synchronization source is a randomly chosen
/// value meant to be globally unique within a particular
/// RTP session. Used to identify a single stream of media.
/// <https://tools.ietf.org/html/rfc3550#section-3>
#[allow(clippy::upper_case_acronyms)]
pub type SSRC = u32;

pub(crate) const MAX_PAYLOAD_TYPE: PayloadType = 127;

/// One-byte header extension ids.
pub(crate) const VALID_EXT_IDS: RangeInclusive<u16> = 1..=14;
