use std::fmt;
use std::str::FromStr;

use crate::dns_parser::MAX_LABEL_LEN;
use crate::Error;

const PROTOCOLS: [&str; 2] = ["_tcp", "_udp"];

/// A service type such as `_http._tcp`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceType {
    name: String,
    labels: Vec<String>,
}

impl ServiceType {
    /// Parses `_service._proto`, with `_proto` being `_tcp` or `_udp`
    ///
    /// A single trailing dot is accepted. Service labels may contain ASCII
    /// letters, digits and hyphens.
    pub fn from_name(name: &str) -> Result<ServiceType, Error> {
        let invalid = || Error::InvalidServiceType(name.to_owned());

        let trimmed = name.strip_suffix('.').unwrap_or(name);
        let labels: Vec<&str> = trimmed.split('.').collect();
        let (service, proto) = match labels[..] {
            [proto] => (None, proto),
            [service, proto] => (Some(service), proto),
            _ => return Err(invalid()),
        };
        if !PROTOCOLS.contains(&proto) {
            return Err(invalid());
        }
        if let Some(service) = service {
            let body = service.strip_prefix('_').ok_or_else(invalid)?;
            let valid = !body.is_empty()
                && service.len() <= MAX_LABEL_LEN
                && body.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
            if !valid {
                return Err(invalid());
            }
        }

        Ok(ServiceType {
            name: trimmed.to_owned(),
            labels: labels.into_iter().map(str::to_owned).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl FromStr for ServiceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<ServiceType, Error> {
        ServiceType::from_name(s)
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The domain a service type is browsed in, usually `local.`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Domain {
    name: String,
    labels: Vec<String>,
}

impl Domain {
    /// The link-local mDNS domain
    pub fn local() -> Domain {
        Domain {
            name: "local".to_owned(),
            labels: vec!["local".to_owned()],
        }
    }

    /// Parses a domain name, with or without a trailing dot
    ///
    /// A complete service name like `_http._tcp.local.` is also accepted,
    /// everything up to the protocol label is dropped.
    pub fn from_name(name: &str) -> Result<Domain, Error> {
        let invalid = || Error::InvalidDomain(name.to_owned());

        let trimmed = name.strip_suffix('.').unwrap_or(name);
        let all: Vec<&str> = trimmed.split('.').collect();
        let labels = match all.iter().rposition(|label| PROTOCOLS.contains(label)) {
            Some(idx) => &all[idx + 1..],
            None => &all[..],
        };

        if labels.is_empty()
            || labels
                .iter()
                .any(|label| label.is_empty() || label.len() > MAX_LABEL_LEN)
        {
            return Err(invalid());
        }

        Ok(Domain {
            name: labels.join("."),
            labels: labels.iter().map(|label| label.to_string()).collect(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Default for Domain {
    fn default() -> Domain {
        Domain::local()
    }
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Domain, Error> {
        Domain::from_name(s)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.", self.name)
    }
}
