use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::UNSPECIFIED_STR;

/// Opaque application data attached to transports, producers and consumers.
pub type AppData = serde_json::Map<String, serde_json::Value>;

/// A STUN or TURN server the native session may use.
#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RTCIceServer {
    pub urls: Vec<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub credential: String,
}

/// Which ICE candidates the native session may use.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCIceTransportPolicy {
    Unspecified,

    #[default]
    All,

    Relay,
}

const ICE_TRANSPORT_POLICY_ALL_STR: &str = "all";
const ICE_TRANSPORT_POLICY_RELAY_STR: &str = "relay";

impl From<&str> for RTCIceTransportPolicy {
    fn from(raw: &str) -> Self {
        match raw {
            ICE_TRANSPORT_POLICY_ALL_STR => RTCIceTransportPolicy::All,
            ICE_TRANSPORT_POLICY_RELAY_STR => RTCIceTransportPolicy::Relay,
            _ => RTCIceTransportPolicy::Unspecified,
        }
    }
}

impl fmt::Display for RTCIceTransportPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCIceTransportPolicy::All => ICE_TRANSPORT_POLICY_ALL_STR,
            RTCIceTransportPolicy::Relay => ICE_TRANSPORT_POLICY_RELAY_STR,
            RTCIceTransportPolicy::Unspecified => UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

/// Local settings of a transport, passed to the handler that backs it.
#[derive(Default, Debug, Clone)]
pub struct TransportOptions {
    pub(crate) ice_servers: Vec<RTCIceServer>,
    pub(crate) ice_transport_policy: RTCIceTransportPolicy,
    pub(crate) app_data: AppData,
}

impl TransportOptions {
    pub fn ice_servers(&self) -> &[RTCIceServer] {
        &self.ice_servers
    }

    pub fn ice_transport_policy(&self) -> RTCIceTransportPolicy {
        self.ice_transport_policy
    }

    pub fn app_data(&self) -> &AppData {
        &self.app_data
    }
}

#[derive(Default)]
pub struct TransportOptionsBuilder {
    ice_servers: Vec<RTCIceServer>,
    ice_transport_policy: RTCIceTransportPolicy,
    app_data: AppData,
}

impl TransportOptionsBuilder {
    pub fn new() -> Self {
        TransportOptionsBuilder::default()
    }

    pub fn with_ice_servers(mut self, ice_servers: Vec<RTCIceServer>) -> Self {
        self.ice_servers = ice_servers;
        self
    }

    pub fn with_ice_transport_policy(
        mut self,
        ice_transport_policy: RTCIceTransportPolicy,
    ) -> Self {
        self.ice_transport_policy = ice_transport_policy;
        self
    }

    pub fn with_app_data(mut self, app_data: AppData) -> Self {
        self.app_data = app_data;
        self
    }

    pub fn build(self) -> TransportOptions {
        TransportOptions {
            ice_servers: self.ice_servers,
            ice_transport_policy: self.ice_transport_policy,
            app_data: self.app_data,
        }
    }
}
