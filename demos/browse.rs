use std::time::Duration;

use mdns_discover::{Domain, Query, ServiceType};

pub fn main() {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters("mdns_discover=debug");
    builder.init();

    // usage: browse [service type] [domain] [timeout in ms] [interface address]
    let mut args = std::env::args().skip(1);
    let service = args.next().unwrap_or_else(|| "_http._tcp".to_owned());
    let domain = args.next().unwrap_or_else(|| "local.".to_owned());

    let service = ServiceType::from_name(&service).unwrap();
    let domain = Domain::from_name(&domain).unwrap();
    let mut query = Query::new(service, domain);
    if let Some(ms) = args.next() {
        query = query.with_timeout(Duration::from_millis(ms.parse().unwrap()));
    }
    if let Some(ip) = args.next() {
        query = query.on_interface(ip.parse().unwrap());
    }

    let instances = query.run_once().unwrap();
    println!("{} instances of {}", instances.len(), query.question().qname);
    for instance in instances {
        println!("  {}", instance);
    }
}
