//! Port probe - diagnostic reachability check run after a failed sync

/// Outcome of a reachability probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeReport {
    pub reachable: bool,
    pub detail: String,
}

/// Checks whether a TCP port on a host accepts connections
pub trait PortProbe {
    fn probe(&self, host: &str, port: u16) -> ProbeReport;
}
