use std::net::SocketAddr;

use serde::{Serialize, Serializer};

/// Hardcoded peer address used when DNS seeding yields nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSpec {
    pub addr: SocketAddr,
}

impl SeedSpec {
    /// Build a seed from a 16-byte IPv6 (or IPv4-mapped) address and a port,
    /// the layout seed tables are generated in.
    fn from_ipv6_bytes(ip: [u8; 16], port: u16) -> Self {
        let v6 = std::net::Ipv6Addr::from(ip);
        let ip = match v6.to_ipv4_mapped() {
            Some(v4) => std::net::IpAddr::V4(v4),
            None => std::net::IpAddr::V6(v6),
        };
        Self {
            addr: SocketAddr::new(ip, port),
        }
    }
}

impl Serialize for SeedSpec {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.addr)
    }
}

/// Generated seed table: 16-byte address and port per entry.
type SeedTable = &'static [([u8; 16], u16)];

// TODO: generate from the operators' seed node list once one is published.
const MAIN_SEEDS: SeedTable = &[];

const TEST_SEEDS: SeedTable = &[];

fn from_table(table: &[([u8; 16], u16)]) -> Vec<SeedSpec> {
    table
        .iter()
        .map(|(ip, port)| SeedSpec::from_ipv6_bytes(*ip, *port))
        .collect()
}

/// Fixed seeds of the production network.
pub fn main_fixed_seeds() -> Vec<SeedSpec> {
    from_table(MAIN_SEEDS)
}

/// Fixed seeds of the public test network.
pub fn test_fixed_seeds() -> Vec<SeedSpec> {
    from_table(TEST_SEEDS)
}
