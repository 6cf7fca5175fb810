//! base traits for implementing helper code
//!
//! good use case could be for implementing different clocks or ways of
//! getting ids from the base generators

/// basics of an id generator
///
/// describes what is needed to be considered an IdGenerator.
/// `kflake_cloud::sync::MutexGenerator` implements this trait as an example
pub trait IdGenerator {
    /// the potential error that could be returned from next_id
    type Error;

    /// the actual Id type that is returned from next_id
    type Id;

    /// to help with allowing for different situations, Output can be what
    /// ever is needed. a [`Result`](std::result::Result) or the id itself if
    /// the generator cannot fail
    type Output;

    /// call to get the next available id
    fn next_id(&self) -> Self::Output;
}

/// similar to [`IdGenerator`](crate::traits::IdGenerator) but allows for
/// mutating
///
/// `kflake_cloud::Generator` implements this trait as an example
pub trait IdGeneratorMut {
    /// the potential error that could be returned from next_id
    type Error;

    /// the actual Id type that is returned from next_id
    type Id;

    /// see [`IdGenerator::Output`](crate::traits::IdGenerator::Output)
    type Output;

    /// mutating call to get the next available id
    fn next_id(&mut self) -> Self::Output;
}

/// basic id structure
pub trait Id {
    /// what the id can be turned to and from
    type BaseType;

    /// creates the a value of BaseType from the id
    fn id(&self) -> Self::BaseType;
}

/// source of millisecond timestamps for a generator
///
/// the value returned is the number of milliseconds elapsed since the epoch
/// the generator encodes ids against, not since the unix epoch. generators
/// only ever read from the clock so implementations must be shareable
/// between threads if the generator is.
pub trait Clock {
    /// current timestamp in milliseconds since the id epoch
    fn now(&self) -> u64;
}
