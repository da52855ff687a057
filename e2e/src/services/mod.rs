//! Service implementations
//!
//! Real implementations of the service traits. These are the only places
//! that start processes, open sockets or send HTTP requests.

pub mod command_runner;
pub mod http_probe;
pub mod port_probe;

#[cfg(test)]
mod tests;

pub use command_runner::{RealCommandRunner, RealRunningProcess};
pub use http_probe::{HttpReadinessProbe, bundle_ready};
pub use port_probe::TcpPortProbe;
