//! TCP Port Probe
//!
//! Answers "does anything accept connections on host:port" after a failed
//! sync, so the operator can tell a closed firewall from a daemon problem.

use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::domain::ports::{PortProbe, ProbeReport};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub struct TcpPortProbe {
    timeout: Duration,
}

impl Default for TcpPortProbe {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl TcpPortProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl PortProbe for TcpPortProbe {
    fn probe(&self, host: &str, port: u16) -> ProbeReport {
        let addrs = match (host, port).to_socket_addrs() {
            Ok(addrs) => addrs.collect::<Vec<_>>(),
            Err(e) => {
                return ProbeReport {
                    reachable: false,
                    detail: format!("could not resolve {host}: {e}"),
                }
            }
        };

        let mut last_error = None;
        for addr in &addrs {
            match TcpStream::connect_timeout(addr, self.timeout) {
                Ok(_) => {
                    return ProbeReport {
                        reachable: true,
                        detail: format!("connection to {addr} succeeded"),
                    }
                }
                Err(e) => last_error = Some(e),
            }
        }

        ProbeReport {
            reachable: false,
            detail: match last_error {
                Some(e) => format!("connection to {host} port {port} failed: {e}"),
                None => format!("{host} resolved to no addresses"),
            },
        }
    }
}
