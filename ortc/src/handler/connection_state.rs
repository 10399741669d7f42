use crate::constants::UNSPECIFIED_STR;
use std::fmt;

/// Connection state of a transport's native session, as reported by the
/// ICE/DTLS layer of the engine.
///
/// A transport starts in `New` and reports `Closed` once it has been closed,
/// regardless of what the engine reports afterwards.
///
/// ```
/// use ortc::handler::RTCConnectionState;
///
/// let state = RTCConnectionState::Connected;
/// assert_eq!(state.to_string(), "connected");
///
/// let parsed: RTCConnectionState = "checking".into();
/// assert_eq!(parsed, RTCConnectionState::Checking);
/// ```
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RTCConnectionState {
    /// State not specified. This should not occur in normal operation.
    #[default]
    Unspecified,

    /// No connectivity checks have started yet.
    New,

    /// Candidate pairs are being checked.
    Checking,

    /// A working candidate pair has been found. Media can flow.
    Connected,

    /// Checking has finished and a working pair is in use.
    Completed,

    /// Connectivity was lost; an ICE restart may recover it.
    Disconnected,

    /// All candidate pairs failed.
    Failed,

    /// The session has been shut down.
    Closed,
}

const CONNECTION_STATE_NEW_STR: &str = "new";
const CONNECTION_STATE_CHECKING_STR: &str = "checking";
const CONNECTION_STATE_CONNECTED_STR: &str = "connected";
const CONNECTION_STATE_COMPLETED_STR: &str = "completed";
const CONNECTION_STATE_DISCONNECTED_STR: &str = "disconnected";
const CONNECTION_STATE_FAILED_STR: &str = "failed";
const CONNECTION_STATE_CLOSED_STR: &str = "closed";

/// takes a string and converts it to RTCConnectionState
impl From<&str> for RTCConnectionState {
    fn from(raw: &str) -> Self {
        match raw {
            CONNECTION_STATE_NEW_STR => RTCConnectionState::New,
            CONNECTION_STATE_CHECKING_STR => RTCConnectionState::Checking,
            CONNECTION_STATE_CONNECTED_STR => RTCConnectionState::Connected,
            CONNECTION_STATE_COMPLETED_STR => RTCConnectionState::Completed,
            CONNECTION_STATE_DISCONNECTED_STR => RTCConnectionState::Disconnected,
            CONNECTION_STATE_FAILED_STR => RTCConnectionState::Failed,
            CONNECTION_STATE_CLOSED_STR => RTCConnectionState::Closed,
            _ => RTCConnectionState::Unspecified,
        }
    }
}

impl From<u8> for RTCConnectionState {
    fn from(v: u8) -> Self {
        match v {
            1 => RTCConnectionState::New,
            2 => RTCConnectionState::Checking,
            3 => RTCConnectionState::Connected,
            4 => RTCConnectionState::Completed,
            5 => RTCConnectionState::Disconnected,
            6 => RTCConnectionState::Failed,
            7 => RTCConnectionState::Closed,
            _ => RTCConnectionState::Unspecified,
        }
    }
}

impl fmt::Display for RTCConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            RTCConnectionState::New => CONNECTION_STATE_NEW_STR,
            RTCConnectionState::Checking => CONNECTION_STATE_CHECKING_STR,
            RTCConnectionState::Connected => CONNECTION_STATE_CONNECTED_STR,
            RTCConnectionState::Completed => CONNECTION_STATE_COMPLETED_STR,
            RTCConnectionState::Disconnected => CONNECTION_STATE_DISCONNECTED_STR,
            RTCConnectionState::Failed => CONNECTION_STATE_FAILED_STR,
            RTCConnectionState::Closed => CONNECTION_STATE_CLOSED_STR,
            RTCConnectionState::Unspecified => UNSPECIFIED_STR,
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_new_connection_state() {
        let tests = vec![
            (UNSPECIFIED_STR, RTCConnectionState::Unspecified),
            ("new", RTCConnectionState::New),
            ("checking", RTCConnectionState::Checking),
            ("connected", RTCConnectionState::Connected),
            ("completed", RTCConnectionState::Completed),
            ("disconnected", RTCConnectionState::Disconnected),
            ("failed", RTCConnectionState::Failed),
            ("closed", RTCConnectionState::Closed),
        ];

        for (state_string, expected_state) in tests {
            assert_eq!(
                RTCConnectionState::from(state_string),
                expected_state,
                "testCase: {expected_state}",
            );
        }
    }

    #[test]
    fn test_connection_state_string() {
        let tests = vec![
            (RTCConnectionState::Unspecified, UNSPECIFIED_STR),
            (RTCConnectionState::New, "new"),
            (RTCConnectionState::Checking, "checking"),
            (RTCConnectionState::Connected, "connected"),
            (RTCConnectionState::Completed, "completed"),
            (RTCConnectionState::Disconnected, "disconnected"),
            (RTCConnectionState::Failed, "failed"),
            (RTCConnectionState::Closed, "closed"),
        ];

        for (state, expected_string) in tests {
            assert_eq!(state.to_string(), expected_string);
        }

        for v in 1..=7u8 {
            assert_ne!(RTCConnectionState::from(v), RTCConnectionState::Unspecified);
        }
    }
}
