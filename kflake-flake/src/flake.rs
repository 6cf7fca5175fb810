use std::str::FromStr;
use std::time::{Duration, SystemTime};

use kflake_core::traits;

#[cfg(feature = "serde")]
use std::fmt;
#[cfg(feature = "serde")]
use serde::{de, ser};

#[cfg(feature = "postgres")]
use postgres_types::{to_sql_checked, accepts, IsNull, FromSql, ToSql, Type as PgType};
#[cfg(feature = "postgres")]
use bytes::{BytesMut, BufMut};

use crate::error;
use crate::base36;

/// 2015/01/01 00:00:00 UTC in milliseconds since the unix epoch. all
/// timestamps stored in a [`Flake`] are relative to this date.
///
/// changing this breaks compatibility with every other producer and consumer
/// of these ids.
pub const EPOCH_MILLIS: u64 = 1_420_070_400_000;

/// k-ordered u64 id
///
/// the format is as follows with a 41 bit timestamp, 10 bit worker id, and
/// 13 bit sequence:
///
/// ```text
///  11111111111111111111111111111111111111111 - 1111111111 - 1111111111111
///  |                                       |   |        |   |           |
/// 64                                      24  23       14  13           1
///                                  timestamp            |               |
///                                               worker id               |
///                                                                sequence
/// ```
///
/// # Timestamp
///
/// milliseconds elapsed since [`EPOCH_MILLIS`]. 41 bits gives roughly 69
/// years before the field overflows.
///
/// # Worker Id
///
/// identifies the generator that created the id. generators on different
/// machines or processes need different worker ids for ids to stay unique
/// across them.
///
/// # Sequence
///
/// count of ids created by the same worker in the same millisecond.
///
/// # Text Form
///
/// [`Display`](std::fmt::Display) writes the id as a lowercase base 36
/// string and [`FromStr`] reads it back.
///
/// ```rust
/// use kflake_flake::Flake;
///
/// let flake = Flake::from_parts(5000, 3, 0).unwrap();
/// let text = flake.to_string();
///
/// assert_eq!(u64::from_str_radix(&text, 36).unwrap(), flake.id());
/// assert_eq!(text.parse::<Flake>().unwrap(), flake);
/// ```
///
/// # De/Serialize
///
/// with the `serde` feature a flake de/serializes to and from a `u64`. check
/// `serde_ext` for the string form.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Flake(u64);

impl Flake {
    /// bits used by the timestamp
    pub const TIMESTAMP_BITS: u8 = 41;
    /// bits used by the worker id
    pub const WORKER_ID_BITS: u8 = 10;
    /// bits used by the sequence
    pub const SEQUENCE_BITS: u8 = 13;

    /// max value that a timestamp can be. `(1 << 41) - 1`
    pub const MAX_TIMESTAMP: u64 = (1 << Self::TIMESTAMP_BITS) - 1;
    /// max value that a worker id can be. `(1 << 10) - 1`
    pub const MAX_WORKER_ID: u64 = (1 << Self::WORKER_ID_BITS) - 1;
    /// max value a sequence can be. `(1 << 13) - 1`
    pub const MAX_SEQUENCE: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    /// total bits to shift the timestamp. `10 + 13`
    pub const TIMESTAMP_SHIFT: u64 = (Self::WORKER_ID_BITS + Self::SEQUENCE_BITS) as u64;
    /// total bits to shift the worker id. `13`
    pub const WORKER_ID_SHIFT: u64 = Self::SEQUENCE_BITS as u64;

    /// bit mask for timestamp. `Self::MAX_TIMESTAMP << Self::TIMESTAMP_SHIFT`
    pub const TIMESTAMP_MASK: u64 = Self::MAX_TIMESTAMP << Self::TIMESTAMP_SHIFT;
    /// bit mask for worker id. `Self::MAX_WORKER_ID << Self::WORKER_ID_SHIFT`
    pub const WORKER_ID_MASK: u64 = Self::MAX_WORKER_ID << Self::WORKER_ID_SHIFT;
    /// bit mask for sequence. `Self::MAX_SEQUENCE`
    pub const SEQUENCE_MASK: u64 = Self::MAX_SEQUENCE;

    /// generates a Flake from the provided parts
    ///
    /// checks will be performed on each part to ensure that they fit in
    /// their segment of the id.
    pub fn from_parts(tsm: u64, wid: u64, seq: u64) -> error::Result<Self> {
        if tsm > Self::MAX_TIMESTAMP {
            return Err(error::Error::TimestampInvalid);
        }

        if wid > Self::MAX_WORKER_ID {
            return Err(error::Error::WorkerIdInvalid);
        }

        if seq > Self::MAX_SEQUENCE {
            return Err(error::Error::SequenceInvalid);
        }

        Ok(Self::compose(tsm, wid, seq))
    }

    /// packs the provided parts without validating them
    ///
    /// each part is truncated to the bits of its segment so a part can never
    /// bleed into its neighbour. generators use this since they keep their
    /// parts in range themselves.
    #[inline]
    pub const fn compose(tsm: u64, wid: u64, seq: u64) -> Self {
        Flake(
            ((tsm & Self::MAX_TIMESTAMP) << Self::TIMESTAMP_SHIFT) |
            ((wid & Self::MAX_WORKER_ID) << Self::WORKER_ID_SHIFT) |
            (seq & Self::MAX_SEQUENCE)
        )
    }

    /// splits the current Flake into its individual parts
    pub fn into_parts(self) -> (u64, u64, u64) {
        (self.timestamp(), self.worker_id(), self.sequence())
    }

    /// returns the unique id
    #[inline]
    pub const fn id(&self) -> u64 {
        self.0
    }

    /// returns the timestamp, milliseconds since [`EPOCH_MILLIS`]
    pub const fn timestamp(&self) -> u64 {
        (self.0 & Self::TIMESTAMP_MASK) >> Self::TIMESTAMP_SHIFT
    }

    /// returns the worker id
    pub const fn worker_id(&self) -> u64 {
        (self.0 & Self::WORKER_ID_MASK) >> Self::WORKER_ID_SHIFT
    }

    /// returns the sequence
    pub const fn sequence(&self) -> u64 {
        self.0 & Self::SEQUENCE_MASK
    }

    /// the system time that the timestamp of this id points to
    pub fn created_at(&self) -> SystemTime {
        SystemTime::UNIX_EPOCH + Duration::from_millis(EPOCH_MILLIS + self.timestamp())
    }
}

impl traits::Id for Flake {
    type BaseType = u64;

    fn id(&self) -> Self::BaseType {
        Flake::id(self)
    }
}

impl From<Flake> for u64 {
    #[inline(always)]
    fn from(flake: Flake) -> u64 {
        flake.id()
    }
}

impl From<&Flake> for u64 {
    #[inline(always)]
    fn from(flake: &Flake) -> u64 {
        flake.id()
    }
}

impl From<u64> for Flake {
    #[inline(always)]
    fn from(id: u64) -> Flake {
        Flake(id)
    }
}

impl std::fmt::Display for Flake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&base36::encode(self.0))
    }
}

impl FromStr for Flake {
    type Err = error::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        base36::decode(s)
            .map(Flake)
            .map_err(error::Error::InvalidString)
    }
}

impl std::fmt::Debug for Flake {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flake")
            .field("id", &self.0)
            .field("tsm", &self.timestamp())
            .field("wid", &self.worker_id())
            .field("seq", &self.sequence())
            .finish()
    }
}

#[cfg(feature = "serde")]
impl ser::Serialize for Flake {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: ser::Serializer
    {
        serializer.serialize_u64(self.0)
    }
}

#[cfg(feature = "serde")]
struct NumVisitor {}

#[cfg(feature = "serde")]
impl<'de> de::Visitor<'de> for NumVisitor {
    type Value = Flake;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "integer from 0 to u64::MAX")
    }

    fn visit_u64<E>(self, u: u64) -> Result<Self::Value, E>
    where
        E: de::Error
    {
        Ok(Flake(u))
    }

    fn visit_i64<E>(self, i: i64) -> Result<Self::Value, E>
    where
        E: de::Error
    {
        let Ok(u) = u64::try_from(i) else {
            return Err(E::invalid_value(de::Unexpected::Signed(i), &self));
        };

        Ok(Flake(u))
    }
}

#[cfg(feature = "serde")]
impl<'de> de::Deserialize<'de> for Flake {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        deserializer.deserialize_u64(NumVisitor {})
    }
}

// postgres has no unsigned 64 bit type so the bits are stored as is in an
// INT8. ids past 2^63 read back as negative numbers in sql.
#[cfg(feature = "postgres")]
impl<'a> FromSql<'a> for Flake {
    fn from_sql(
        _: &PgType,
        raw: &'a [u8]
    ) -> Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        let Some(int) = crate::pg::read_i64(raw) else {
            return Err("invalid buffer size".into());
        };

        Ok(Flake(int as u64))
    }

    accepts!(INT8);
}

#[cfg(feature = "postgres")]
impl ToSql for Flake {
    fn to_sql(
        &self,
        _: &PgType,
        buf: &mut BytesMut
    ) -> Result<IsNull, Box<dyn std::error::Error + Send + Sync>> {
        buf.put_i64(self.0 as i64);

        Ok(IsNull::No)
    }

    accepts!(INT8);

    to_sql_checked!();
}
