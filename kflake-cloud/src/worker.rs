//! ways of picking a worker id for a generator
//!
//! a worker id can be given directly, derived from the ipv4 address of the
//! host, or drawn from the os random source. derived values are returned as
//! is, generators reduce them to the 10 bits of the worker segment with
//! [`reduce`].

use std::io;
use std::net::{IpAddr, Ipv4Addr, ToSocketAddrs};
use std::str::FromStr;

use rand::rngs::OsRng;
use rand::TryCryptoRng;

use kflake_flake::Flake;

use crate::error::{self, Error, ResolutionError, ParseSourceError};

/// the available strategies for getting a worker id
///
/// ```rust
/// use kflake_cloud::worker::WorkerSource;
///
/// let source: WorkerSource = "1034".parse().unwrap();
///
/// assert_eq!(source, WorkerSource::Explicit(1034));
/// assert_eq!(source.resolve().unwrap(), 1034);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerSource {
    /// use the given value
    Explicit(u64),

    /// use the first address the hostname resolves to, which must be ipv4
    Host,

    /// use 8 bytes from the os random source
    Random,
}

impl WorkerSource {
    /// derives the raw worker id using the system resolver and
    /// [`OsRng`](rand::rngs::OsRng)
    pub fn resolve(&self) -> error::Result<u64> {
        self.resolve_with(&SystemResolver, &mut OsRng)
    }

    /// derives the raw worker id with the provided resolver and random
    /// source
    pub fn resolve_with<H, R>(&self, resolver: &H, rng: &mut R) -> error::Result<u64>
    where
        H: HostResolver + ?Sized,
        R: TryCryptoRng + ?Sized,
    {
        match self {
            WorkerSource::Explicit(id) => Ok(*id),
            WorkerSource::Host => host_id_with(resolver),
            WorkerSource::Random => random_id_with(rng),
        }
    }
}

impl FromStr for WorkerSource {
    type Err = ParseSourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "host" => Ok(WorkerSource::Host),
            "random" => Ok(WorkerSource::Random),
            _ => s.parse::<u64>()
                .map(WorkerSource::Explicit)
                .map_err(|_| ParseSourceError(s.to_owned())),
        }
    }
}

/// reduces a raw worker id to the range of the worker segment, `0..=1023`
#[inline]
pub fn reduce(worker_id: u64) -> u64 {
    worker_id % (Flake::MAX_WORKER_ID + 1)
}

/// lookup of the local hostname and its addresses
pub trait HostResolver {
    /// name of the local host
    fn hostname(&self) -> io::Result<String>;

    /// addresses the given host resolves to, in resolver order
    fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>>;
}

/// resolves through the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl HostResolver for SystemResolver {
    #[cfg(unix)]
    fn hostname(&self) -> io::Result<String> {
        let name = nix::unistd::gethostname()?;

        name.into_string().map_err(|_| io::Error::new(
            io::ErrorKind::InvalidData,
            "hostname is not valid utf-8"
        ))
    }

    #[cfg(not(unix))]
    fn hostname(&self) -> io::Result<String> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "reading the hostname is not supported on this platform"
        ))
    }

    fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        let addrs = (host, 0u16).to_socket_addrs()?;

        Ok(addrs.map(|addr| addr.ip()).collect())
    }
}

/// derives a worker id from the host address
///
/// only the first address returned by the resolver is used. it is read as a
/// big endian u32 if it is ipv4 or an ipv4 mapped ipv6 address, anything
/// else is [`NotIpv4`](crate::error::ResolutionError::NotIpv4).
pub fn host_id_with<H>(resolver: &H) -> error::Result<u64>
where
    H: HostResolver + ?Sized
{
    match resolve_host(resolver) {
        Ok((host, addr)) => {
            let worker_id = u32::from_be_bytes(addr.octets()) as u64;

            tracing::debug!(%host, %addr, worker_id, "derived worker id from host address");

            Ok(worker_id)
        },
        Err(err) => {
            tracing::warn!(error = %err, "failed to derive worker id from host address");

            Err(err.into())
        }
    }
}

fn resolve_host<H>(resolver: &H) -> Result<(String, Ipv4Addr), ResolutionError>
where
    H: HostResolver + ?Sized
{
    let host = resolver.hostname().map_err(ResolutionError::Hostname)?;

    let addrs = match resolver.lookup(&host) {
        Ok(addrs) => addrs,
        Err(source) => return Err(ResolutionError::Lookup { host, source }),
    };

    let Some(first) = addrs.first() else {
        return Err(ResolutionError::NoAddress(host));
    };

    let Some(addr) = as_ipv4(first) else {
        return Err(ResolutionError::NotIpv4(host));
    };

    Ok((host, addr))
}

fn as_ipv4(addr: &IpAddr) -> Option<Ipv4Addr> {
    match addr {
        IpAddr::V4(v4) => Some(*v4),
        IpAddr::V6(v6) => v6.to_ipv4_mapped(),
    }
}

/// draws a worker id from [`OsRng`](rand::rngs::OsRng)
pub fn random_id() -> error::Result<u64> {
    random_id_with(&mut OsRng)
}

/// draws a worker id from the given cryptographically secure source
///
/// 8 bytes are read and interpreted as a big endian u64.
pub fn random_id_with<R>(rng: &mut R) -> error::Result<u64>
where
    R: TryCryptoRng + ?Sized
{
    let mut bytes = [0u8; 8];

    rng.try_fill_bytes(&mut bytes)
        .map_err(|err| Error::Entropy(err.to_string()))?;

    let worker_id = u64::from_be_bytes(bytes);

    tracing::debug!(worker_id, "drew random worker id");

    Ok(worker_id)
}
