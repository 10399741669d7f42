use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::UNSPECIFIED_STR;

/// ICE parameters of the remote side of a transport.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCIceParameters {
    pub username_fragment: String,
    pub password: String,
    #[serde(default)]
    pub ice_lite: bool,
}

/// A remote ICE candidate.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RTCIceCandidate {
    pub foundation: String,
    pub priority: u32,
    #[serde(alias = "ip")]
    pub address: String,
    pub protocol: String,
    pub port: u16,
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcp_type: Option<String>,
}

/// RTCDtlsRole indicates the role of the DTLS transport.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RTCDtlsRole {
    /// The DTLS role is determined based on the resolved ICE role.
    #[serde(rename = "auto")]
    Auto = 1,

    /// DTLS client role.
    #[serde(rename = "client")]
    Client = 2,

    /// DTLS server role.
    #[serde(rename = "server")]
    Server = 3,

    #[default]
    #[serde(other)]
    Unspecified = 0,
}

impl fmt::Display for RTCDtlsRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RTCDtlsRole::Auto => write!(f, "auto"),
            RTCDtlsRole::Client => write!(f, "client"),
            RTCDtlsRole::Server => write!(f, "server"),
            _ => write!(f, "{}", UNSPECIFIED_STR),
        }
    }
}

/// DTLS certificate fingerprint, e.g. `sha-256` plus colon separated hex.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCDtlsFingerprint {
    pub algorithm: String,
    pub value: String,
}

/// DTLS parameters of one side of a transport.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCDtlsParameters {
    #[serde(default)]
    pub role: RTCDtlsRole,
    pub fingerprints: Vec<RTCDtlsFingerprint>,
}

/// Parameters of the remote transport a local transport connects to, as
/// handed out by the signaling layer.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportRemoteParameters {
    pub id: String,
    pub ice_parameters: RTCIceParameters,
    #[serde(default)]
    pub ice_candidates: Vec<RTCIceCandidate>,
    pub dtls_parameters: RTCDtlsParameters,
}
