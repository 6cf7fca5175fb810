//! the id type produced by kflake generators
//!
//! a [`Flake`] is a `u64` made of a 41 bit millisecond timestamp, a 10 bit
//! worker id, and a 13 bit sequence. see [`Flake`] for the exact layout.

pub mod error;
pub mod base36;

#[cfg(feature = "serde")]
pub mod serde_ext;
#[cfg(feature = "postgres")]
mod pg;

mod flake;

pub use flake::{Flake, EPOCH_MILLIS};
