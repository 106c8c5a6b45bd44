use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::net::IpAddr;

use log::debug;

use crate::dns_parser::{user_visible_name, Response};

/// A discovered service instance
///
/// Built from the SRV, TXT and address records correlated with one PTR
/// answer. Owns its data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Instance {
    name: String,
    addresses: BTreeSet<IpAddr>,
    port: u16,
    attributes: BTreeMap<String, String>,
}

impl Instance {
    /// Assembles the instance a PTR record points to
    ///
    /// `None` without an SRV record for `ptr_target`. A missing TXT record
    /// gives no attributes and missing address records give no addresses.
    pub(crate) fn from_records(ptr_target: &str, records: &Response) -> Option<Instance> {
        let (port, target) = match records.srv_for(ptr_target) {
            Some(srv) => srv,
            None => {
                debug!("no SRV record for {}, dropping it", ptr_target);
                return None;
            }
        };

        Some(Instance {
            name: user_visible_name(ptr_target).to_owned(),
            addresses: records.addresses_for(target).collect(),
            port,
            attributes: records.txt_for(ptr_target).cloned().unwrap_or_default(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn addresses(&self) -> &BTreeSet<IpAddr> {
        &self.addresses
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
    }

    pub fn lookup_attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }
}

impl fmt::Display for Instance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} (", self.name)?;
        for (i, address) in self.addresses.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", address)?;
        }
        write!(f, ") port {}", self.port)?;
        for (key, value) in &self.attributes {
            write!(f, " {}={}", key, value)?;
        }
        Ok(())
    }
}
