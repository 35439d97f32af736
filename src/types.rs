use serde::{Deserialize, Serialize};
use std::fmt;

/// One remote side of a TCP connection as decoded from a proc net table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteEndpoint {
    pub addr: String,
    pub port: u16,
}

impl fmt::Display for RemoteEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.addr, self.port)
    }
}

/// Aggregated occurrence counter for one (endpoint, state) combination
/// within a single scan pass.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ConnCounter {
    pub endpoint: RemoteEndpoint,
    pub state: ConnState,
    pub count: u64,
}

/// TCP connection state as reported by the kernel's two-hex-digit state
/// column (`01`..`0C`). Codes outside that set map to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnState {
    Established,
    SynSent,
    SynRecv,
    FinWait1,
    FinWait2,
    TimeWait,
    Close,
    CloseWait,
    LastAck,
    Listen,
    Closing,
    MaxStates,
    Unknown,
}

impl ConnState {
    /// Look up a state code column. Case-sensitive: the kernel prints
    /// uppercase hex, so `"0a"` is not a valid code.
    pub fn from_code(code: &str) -> Self {
        match code {
            "01" => ConnState::Established,
            "02" => ConnState::SynSent,
            "03" => ConnState::SynRecv,
            "04" => ConnState::FinWait1,
            "05" => ConnState::FinWait2,
            "06" => ConnState::TimeWait,
            "07" => ConnState::Close,
            "08" => ConnState::CloseWait,
            "09" => ConnState::LastAck,
            "0A" => ConnState::Listen,
            "0B" => ConnState::Closing,
            "0C" => ConnState::MaxStates,
            _ => ConnState::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConnState::Established => "TCP_ESTABLISHED",
            ConnState::SynSent => "TCP_SYN_SENT",
            ConnState::SynRecv => "TCP_SYN_RECV",
            ConnState::FinWait1 => "TCP_FIN_WAIT1",
            ConnState::FinWait2 => "TCP_FIN_WAIT2",
            ConnState::TimeWait => "TCP_TIME_WAIT",
            ConnState::Close => "TCP_CLOSE",
            ConnState::CloseWait => "TCP_CLOSE_WAIT",
            ConnState::LastAck => "TCP_LAST_ACK",
            ConnState::Listen => "TCP_LISTEN",
            ConnState::Closing => "TCP_CLOSING",
            ConnState::MaxStates => "TCP_MAX_STATES",
            ConnState::Unknown => "UNK",
        }
    }
}

impl fmt::Display for ConnState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ConnState {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
