/// possible errors when creating a Flake from its parts or from a string
///
/// a raw `u64` is always a valid Flake so only building from individual
/// segments or parsing text can fail.
///
/// ```rust
/// use kflake_flake::{Flake, error::Error};
///
/// match Flake::from_parts(1, 2048, 0) {
///     Ok(flake) => println!("{}", flake),
///     Err(Error::WorkerIdInvalid) => {
///         // worker ids only have 10 bits
///     },
///     Err(err) => println!("{}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {

    /// a provided timestamp is greater than the max value of 41 bits
    #[error("timestamp invalid")]
    TimestampInvalid,

    /// a provided worker id is greater than the max value of 10 bits
    #[error("worker id invalid")]
    WorkerIdInvalid,

    /// a provided sequence is greater than the max value of 13 bits
    #[error("sequence invalid")]
    SequenceInvalid,

    /// the provided string is not a base 36 encoded u64
    #[error("invalid id string")]
    InvalidString(#[source] std::num::ParseIntError),
}

pub type Result<T> = std::result::Result<T, Error>;
