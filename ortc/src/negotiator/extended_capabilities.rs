use serde::{Deserialize, Serialize};

use crate::rtp_parameters::{
    PayloadType, RTCPFeedback, RTCRtpCodecParametersMap, RTCRtpDirection, RtpCodecKind,
};

/// A codec both sides support, with the payload types each side uses for it.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCExtendedRtpCodec {
    pub kind: RtpCodecKind,
    pub mime_type: String,
    pub clock_rate: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<u8>,
    pub local_payload_type: PayloadType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_rtx_payload_type: Option<PayloadType>,
    pub remote_payload_type: PayloadType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_rtx_payload_type: Option<PayloadType>,
    /// Union of both parameter sets; remote values win on conflicts.
    pub parameters: RTCRtpCodecParametersMap,
    /// Feedback advertised by both sides, in remote order.
    pub rtcp_feedback: Vec<RTCPFeedback>,
}

impl RTCExtendedRtpCodec {
    /// RTX is only usable when both sides pair one with this codec.
    pub fn rtx_payload_type(&self) -> Option<PayloadType> {
        self.local_rtx_payload_type.and(self.remote_rtx_payload_type)
    }
}

/// A header extension both sides support, with the id negotiated for it.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCExtendedRtpHeaderExtension {
    pub kind: RtpCodecKind,
    pub uri: String,
    pub id: u16,
    pub encrypt: bool,
    pub direction: RTCRtpDirection,
}

/// Intersection of the local native capabilities and the remote
/// advertisement. Computed once per loaded device and read-only afterwards.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCExtendedRtpCapabilities {
    pub codecs: Vec<RTCExtendedRtpCodec>,
    pub header_extensions: Vec<RTCExtendedRtpHeaderExtension>,
}

impl RTCExtendedRtpCapabilities {
    pub fn codecs_of(&self, kind: RtpCodecKind) -> impl Iterator<Item = &RTCExtendedRtpCodec> {
        self.codecs.iter().filter(move |c| c.kind == kind)
    }

    pub fn header_extensions_of(
        &self,
        kind: RtpCodecKind,
    ) -> impl Iterator<Item = &RTCExtendedRtpHeaderExtension> {
        self.header_extensions.iter().filter(move |e| e.kind == kind)
    }
}
