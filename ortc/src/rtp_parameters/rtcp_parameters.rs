use serde::{Deserialize, Serialize};

/// RTCP parameters of a producer or consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCRtcpParameters {
    /// Canonical name shared by every encoding of the sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    #[serde(default = "default_reduced_size")]
    pub reduced_size: bool,
}

impl Default for RTCRtcpParameters {
    fn default() -> Self {
        RTCRtcpParameters {
            cname: None,
            reduced_size: true,
        }
    }
}

fn default_reduced_size() -> bool {
    true
}

/// TYPE_RTCP_FB_TRANSPORT_CC ..
pub const TYPE_RTCP_FB_TRANSPORT_CC: &str = "transport-cc";

/// TYPE_RTCP_FB_GOOG_REMB ..
pub const TYPE_RTCP_FB_GOOG_REMB: &str = "goog-remb";

/// TYPE_RTCP_FB_CCM ..
pub const TYPE_RTCP_FB_CCM: &str = "ccm";

/// TYPE_RTCP_FB_NACK ..
pub const TYPE_RTCP_FB_NACK: &str = "nack";

/// RTCPFeedback signals the connection to use additional RTCP packet types.
/// <https://draft.ortc.org/#dom-rtcrtcpfeedback>
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RTCPFeedback {
    /// Type is the type of feedback.
    /// see: <https://draft.ortc.org/#dom-rtcrtcpfeedback>
    /// valid: ack, ccm, nack, goog-remb, transport-cc
    #[serde(rename = "type")]
    pub typ: String,

    /// The parameter value depends on the type.
    /// For example, type="nack" parameter="pli" will send Picture Loss Indicator packets.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parameter: String,
}

impl RTCPFeedback {
    pub fn new(typ: &str, parameter: &str) -> Self {
        RTCPFeedback {
            typ: typ.to_owned(),
            parameter: parameter.to_owned(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_rtcp_feedback_serde() {
        let tests = vec![
            (RTCPFeedback::new("nack", ""), r#"{"type":"nack"}"#),
            (RTCPFeedback::new("nack", "pli"), r#"{"type":"nack","parameter":"pli"}"#),
        ];

        for (feedback, expected) in tests {
            assert_eq!(serde_json::to_string(&feedback).unwrap(), expected);
            let parsed: RTCPFeedback = serde_json::from_str(expected).unwrap();
            assert_eq!(parsed, feedback);
        }
    }

    #[test]
    fn test_rtcp_parameters_default_reduced_size() {
        let rtcp: RTCRtcpParameters = serde_json::from_str(r#"{"cname":"abc"}"#).unwrap();
        assert_eq!(rtcp.cname.as_deref(), Some("abc"));
        assert!(rtcp.reduced_size);
    }
}
