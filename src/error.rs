use std::io;

use thiserror::Error;
use tokio::task::JoinError;

use crate::dns_parser;

/// Error ending a discovery run, or refusing to start one
///
/// Bad datagrams never show up here, they are logged and dropped while
/// listening.
#[derive(Debug, Error)]
pub enum Error {
    #[error("could not join the mDNS group on any address family")]
    NoUsableInterface,
    #[error("{0:?} is not a valid service type")]
    InvalidServiceType(String),
    #[error("{0:?} is not a valid domain")]
    InvalidDomain(String),
    #[error("failed to encode query: {0}")]
    Encode(#[from] dns_parser::Error),
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
    #[error("listener task failed: {0}")]
    Listener(#[from] JoinError),
    #[error("discovery thread panicked")]
    DiscoveryThread,
}
