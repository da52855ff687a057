//! TCP reachability check for the app port

use async_trait::async_trait;
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::TcpStream;

use crate::error::E2eResult;
use crate::traits::PortProbe;

/// Connect timeout for a single port check
pub const PORT_CHECK_TIMEOUT: Duration = Duration::from_secs(1);

/// Checks whether something accepts TCP connections on a local port
#[derive(Debug, Clone)]
pub struct TcpPortProbe {
    host: Ipv4Addr,
    timeout: Duration,
}

impl TcpPortProbe {
    pub fn new() -> Self {
        Self {
            host: Ipv4Addr::LOCALHOST,
            timeout: PORT_CHECK_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for TcpPortProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PortProbe for TcpPortProbe {
    async fn is_reachable(&self, port: u16) -> E2eResult<bool> {
        let addr = SocketAddr::from((self.host, port));

        match tokio::time::timeout(self.timeout, TcpStream::connect(addr)).await {
            Ok(Ok(_stream)) => Ok(true),
            Ok(Err(e))
                if matches!(
                    e.kind(),
                    ErrorKind::ConnectionRefused | ErrorKind::ConnectionReset | ErrorKind::TimedOut
                ) =>
            {
                Ok(false)
            }
            Ok(Err(e)) => Err(e.into()),
            Err(_elapsed) => Ok(false),
        }
    }
}
