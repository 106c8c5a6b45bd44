//! Multicast DNS service discovery client
//!
//! Sends one browse query for a service type, follows up on whatever the
//! answers leave out, and returns the instances found once the network has
//! been quiet for a browsing window.
//!
//! ```no_run
//! use mdns_discover::{discover, Domain, ServiceType};
//!
//! let service = ServiceType::from_name("_http._tcp")?;
//! for instance in discover(&service, &Domain::local(), None)? {
//!     println!("{}", instance);
//! }
//! # Ok::<(), mdns_discover::Error>(())
//! ```

use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

mod address_family;
pub mod dns_parser;
mod error;
mod fsm;
mod instance;
mod service;
mod session;
mod transport;

use crate::dns_parser::Question;
use crate::fsm::FSM;
use crate::transport::MulticastSocket;

pub use crate::dns_parser::MAX_MESSAGE_LEN;
pub use crate::error::Error;
pub use crate::instance::Instance;
pub use crate::service::{Domain, ServiceType};

pub const MDNS_PORT: u16 = 5353;
pub const MDNS_IPV4_GROUP: Ipv4Addr = Ipv4Addr::new(224, 0, 0, 251);
pub const MDNS_IPV6_GROUP: Ipv6Addr = Ipv6Addr::new(0xff02, 0, 0, 0, 0, 0, 0, 0xfb);

/// Multicast TTL and IPv6 hop limit of outgoing queries
pub const MULTICAST_TTL: u32 = 10;

/// How long the network must stay quiet before a run ends
pub const DEFAULT_BROWSING_TIMEOUT: Duration = Duration::from_millis(750);

/// One bounded browse for a service type
#[derive(Debug, Clone)]
pub struct Query {
    service: ServiceType,
    domain: Domain,
    browsing_timeout: Duration,
    interface: Option<IpAddr>,
}

impl Query {
    pub fn new(service: ServiceType, domain: Domain) -> Query {
        Query {
            service,
            domain,
            browsing_timeout: DEFAULT_BROWSING_TIMEOUT,
            interface: None,
        }
    }

    /// Overrides the browsing window
    pub fn with_timeout(mut self, browsing_timeout: Duration) -> Query {
        self.browsing_timeout = browsing_timeout;
        self
    }

    /// Only use the network interface owning `ip`
    pub fn on_interface(mut self, ip: IpAddr) -> Query {
        self.interface = Some(ip);
        self
    }

    pub fn service(&self) -> &ServiceType {
        &self.service
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    pub fn browsing_timeout(&self) -> Duration {
        self.browsing_timeout
    }

    /// The PTR question the run starts with
    pub fn question(&self) -> Question {
        Question::browse(&self.service, &self.domain)
    }

    /// Runs the query on the current tokio runtime
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime with I/O enabled, use
    /// [`Query::run_once`] from synchronous code.
    pub async fn run(&self) -> Result<HashSet<Instance>, Error> {
        let transport = MulticastSocket::open(self.interface)?;
        FSM::new(Arc::new(transport), self.question(), self.browsing_timeout)
            .run()
            .await
    }

    /// Runs the query on a thread and runtime of its own, blocking until it
    /// is done
    ///
    /// Safe to call from within an async context, only the calling thread
    /// is blocked.
    pub fn run_once(&self) -> Result<HashSet<Instance>, Error> {
        let query = self.clone();
        let handle = thread::Builder::new()
            .name("mdns-discover".to_owned())
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()?;
                runtime.block_on(query.run())
            })?;
        handle.join().map_err(|_| Error::DiscoveryThread)?
    }
}

/// Discovers the instances of `service` in `domain`
///
/// Blocks for at least `browsing_timeout`, [`DEFAULT_BROWSING_TIMEOUT`] if
/// `None`, and for as long as responses keep coming in. Finding nothing is
/// not an error.
pub fn discover(
    service: &ServiceType,
    domain: &Domain,
    browsing_timeout: Option<Duration>,
) -> Result<HashSet<Instance>, Error> {
    Query::new(service.clone(), domain.clone())
        .with_timeout(browsing_timeout.unwrap_or(DEFAULT_BROWSING_TIMEOUT))
        .run_once()
}
