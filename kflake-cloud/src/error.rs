use std::io;

/// possible errors when creating a generator
///
/// only deriving a worker id can fail. once a generator exists every call to
/// next_id produces an id.
///
/// ```rust
/// use kflake_cloud::error::Error;
/// use kflake_cloud::sync::MutexGenerator;
///
/// let gen = match MutexGenerator::with_host_id() {
///     Ok(gen) => gen,
///     Err(Error::Resolution(err)) => {
///         // no usable address, fall back to a fixed worker id
///         println!("{}", err);
///         MutexGenerator::new(1)
///     },
///     Err(err) => panic!("{}", err),
/// };
///
/// println!("{}", gen.next_id());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {

    /// a worker id could not be derived from the address of the host
    #[error("failed to resolve host address: {0}")]
    Resolution(#[from] ResolutionError),

    /// the random source could not provide bytes for a worker id
    #[error("failed to read random worker id: {0}")]
    Entropy(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// why a host address could not be used as a worker id
#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {

    /// the name of the host could not be read
    #[error("failed to read hostname")]
    Hostname(#[source] io::Error),

    /// looking up the addresses of the host failed
    #[error("failed to lookup \"{host}\"")]
    Lookup {
        host: String,
        #[source]
        source: io::Error,
    },

    /// the lookup succeeded but returned nothing
    #[error("no addresses found for \"{0}\"")]
    NoAddress(String),

    /// none of the returned addresses are ipv4 compatible
    #[error("no ipv4 address found for \"{0}\"")]
    NotIpv4(String),
}

/// a string that does not name a [`WorkerSource`](crate::worker::WorkerSource)
#[derive(Debug, thiserror::Error)]
#[error("invalid worker source \"{0}\", expected \"host\", \"random\", or an integer")]
pub struct ParseSourceError(pub String);
