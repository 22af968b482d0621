use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::str::FromStr;

use ipnet::{Ipv4AddrRange, Ipv4Net};

use crate::error::ScanError;

/// A scan specification, immutable once a session starts.
///
/// Accepted forms: a CIDR block (`192.168.1.0/24`), a single address,
/// or a comma-separated address list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Cidr(Ipv4Net),
    Host(Ipv4Addr),
    List(Vec<Ipv4Addr>),
}

impl Target {
    pub fn parse(spec: &str) -> Result<Self, ScanError> {
        spec.parse()
    }

    /// Every candidate address for this specification, in a fixed order
    /// with no duplicates. A CIDR block covers the whole block, network
    /// and broadcast addresses included.
    pub fn addresses(&self) -> Vec<Ipv4Addr> {
        match self {
            Target::Cidr(net) => Ipv4AddrRange::new(net.network(), net.broadcast()).collect(),
            Target::Host(addr) => vec![*addr],
            Target::List(addrs) => {
                let mut seen = HashSet::new();
                addrs.iter().copied().filter(|a| seen.insert(*a)).collect()
            }
        }
    }
}

impl FromStr for Target {
    type Err = ScanError;

    fn from_str(s: &str) -> Result<Self, ScanError> {
        let spec = s.trim();
        if spec.is_empty() {
            return Err(ScanError::InvalidTarget("empty specification".to_string()));
        }
        if spec.contains(',') {
            let addrs = spec
                .split(',')
                .map(|part| {
                    let part = part.trim();
                    part.parse::<Ipv4Addr>()
                        .map_err(|_| ScanError::InvalidTarget(format!("bad address {part:?}")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Target::List(addrs));
        }
        if spec.contains('/') {
            let net = spec
                .parse::<Ipv4Net>()
                .map_err(|_| ScanError::InvalidTarget(format!("bad CIDR block {spec:?}")))?;
            return Ok(Target::Cidr(net));
        }
        spec.parse::<Ipv4Addr>()
            .map(Target::Host)
            .map_err(|_| ScanError::InvalidTarget(format!("bad address {spec:?}")))
    }
}

/// Local outbound IPv4 address, learned by "connecting" a UDP socket to
/// a public address. No traffic is sent. Falls back to loopback when
/// the machine has no route out.
pub fn local_ip() -> Ipv4Addr {
    fn detect() -> std::io::Result<IpAddr> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        socket.connect("8.8.8.8:80")?;
        Ok(socket.local_addr()?.ip())
    }
    match detect() {
        Ok(IpAddr::V4(ip)) => ip,
        _ => Ipv4Addr::LOCALHOST,
    }
}

/// The /24 around the local address, used as the default scan range.
pub fn local_subnet() -> Ipv4Net {
    Ipv4Net::new(local_ip(), 24)
        .expect("/24 is a valid prefix")
        .trunc()
}
