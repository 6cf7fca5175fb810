//! # kflake
//!
//! a small library for creating unique, roughly time ordered 64 bit ids
//! without any coordination between the machines creating them. every id
//! packs a millisecond timestamp, a worker id, and a sequence counter.
//!
//! ```rust
//! use kflake::MutexGenerator;
//!
//! // the worker id should be different for every generator that is running
//! // at the same time
//! let cloud = MutexGenerator::new(1);
//! let flake = cloud.next_id();
//!
//! println!("{} {}", flake.id(), flake);
//! ```
//!
//! picking the worker id from the host address or at random
//!
//! ```rust
//! use kflake::{MutexGenerator, WorkerSource};
//!
//! let cloud = match MutexGenerator::with_host_id() {
//!     Ok(cloud) => cloud,
//!     Err(err) => {
//!         println!("{}", err);
//!
//!         MutexGenerator::from_source(WorkerSource::Random)
//!             .expect("failed to create MutexGenerator")
//!     }
//! };
//!
//! println!("worker id: {}", cloud.worker_id());
//! ```
//!
//! ## Layout
//!
//! | bits | segment | range |
//! | ---: | :------ | ----: |
//! | 63 - 23 | timestamp, milliseconds since 2015/01/01 00:00:00 UTC | 41 bits, ~69 years |
//! | 22 - 13 | worker id | 0 - 1023 |
//! | 12 - 0 | sequence | 0 - 8191 |
//!
//! ids from one worker always increase. ids from different workers are only
//! ordered by their timestamp (k-ordered). the text form of an id is its
//! lowercase base 36 encoding.
//!
//! ## Behavior
//!
//! [`sync::MutexGenerator`](crate::cloud::sync::MutexGenerator) is a thread
//! safe implementation for sharing between threads on a system. it uses an
//! [`Arc`](std::sync::Arc) [`Mutex`](std::sync::Mutex) to guard the sequence
//! count and prev_time, only blocking while acquiring the mutex.
//!
//! [`Generator`](crate::cloud::Generator) is similar in most aspects to
//! `sync::MutexGenerator` except next_id is a mutating call and the counts
//! are not stored in an Arc Mutex. THIS IS NOT THREAD SAFE.
//!
//! neither generator can fail once created. if more than 8192 ids are asked
//! for in one millisecond the timestamp is moved to the next millisecond
//! ahead of the clock. a clock that moves backwards is treated the same as
//! the clock standing still, the previous timestamp keeps being used until
//! the clock passes it again.
//!
//! ## Worker Ids
//!
//! [`WorkerSource`](crate::cloud::worker::WorkerSource) lists the ways of
//! getting one: given directly, derived from the first ipv4 address of the
//! host, or drawn from the os random source. whatever the source the value is
//! reduced modulo 1024. making sure running generators use different worker
//! ids is up to the caller.
//!
//! ## Traits
//!
//! - [`IdGenerator`](crate::traits::IdGenerator) describes the basic layout
//!   of an id generator with an Error, Id, and Output type along with the
//!   next_id method.
//! - [`IdGeneratorMut`](crate::traits::IdGeneratorMut) is similar to
//!   [`IdGenerator`](crate::traits::IdGenerator) except the next_id call
//!   allows for mutating the object
//! - [`Id`](crate::traits::Id) turns an id into its base type, `u64`
//! - [`Clock`](crate::traits::Clock) is where a generator reads its
//!   timestamps from
//!
//! ## De/Serialize
//!
//! with the `serde` feature flakes de/serialize to a `u64`, or to the base 36
//! string with `flake::serde_ext`.

pub use kflake_core::traits;
pub use kflake_flake as flake;
pub use kflake_cloud as cloud;

pub use kflake_flake::Flake;
pub use kflake_cloud::Generator;
pub use kflake_cloud::sync::MutexGenerator;
pub use kflake_cloud::worker::WorkerSource;
