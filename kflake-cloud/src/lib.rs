use kflake_core::traits::{Clock, IdGeneratorMut};
use kflake_flake::Flake;
use rand::rngs::OsRng;
use rand::TryCryptoRng;

pub mod error;
pub mod clock;
pub mod worker;
mod common;
pub mod sync;

use clock::SystemClock;
use common::Counts;
use worker::{HostResolver, SystemResolver, WorkerSource};

/// simple flake generator
///
/// generates flakes for a single worker id. the worker id is reduced to 10
/// bits when the generator is created and the sequence starts at 0.
///
/// follows the same rules as [`sync::MutexGenerator`] except next_id is a
/// mutating call and the counts are not stored in an Arc Mutex. THIS IS NOT
/// THREAD SAFE, only one caller can hold it mutably at a time.
///
/// ```rust
/// use kflake_cloud::Generator;
///
/// let mut cloud = Generator::new(1);
///
/// println!("worker id: {}", cloud.worker_id());
///
/// let first = cloud.next_id();
/// let second = cloud.next_id();
///
/// assert!(first < second);
/// ```
pub struct Generator<C = SystemClock> {
    worker_id: u64,
    clock: C,
    counts: Counts,
}

impl Generator<SystemClock> {
    /// returns a new Generator for the given worker id
    pub fn new(worker_id: u64) -> Self {
        Self::with_clock(worker_id, SystemClock)
    }

    /// returns a new Generator using the ipv4 address of the host as the
    /// worker id
    pub fn with_host_id() -> error::Result<Self> {
        Self::from_source(WorkerSource::Host)
    }

    /// returns a new Generator with a random worker id
    pub fn with_random_id() -> error::Result<Self> {
        Self::from_source(WorkerSource::Random)
    }

    /// returns a new Generator with the worker id from the given source
    pub fn from_source(source: WorkerSource) -> error::Result<Self> {
        Self::from_source_with_clock(source, SystemClock)
    }
}

impl<C> Generator<C>
where
    C: Clock
{
    /// returns a new Generator that reads timestamps from the given clock
    pub fn with_clock(worker_id: u64, clock: C) -> Self {
        let prev_time = clock.now();

        Generator {
            worker_id: worker::reduce(worker_id),
            clock,
            counts: Counts::new(prev_time),
        }
    }

    /// returns a new Generator with the worker id from the given source and
    /// timestamps from the given clock
    pub fn from_source_with_clock(source: WorkerSource, clock: C) -> error::Result<Self> {
        Self::from_source_with(source, &SystemResolver, &mut OsRng, clock)
    }

    /// returns a new Generator with the worker id from the given source,
    /// looking up host addresses with `resolver` and drawing random ids from
    /// `rng`
    ///
    /// nothing is created if the worker id cannot be derived
    pub fn from_source_with<H, R>(
        source: WorkerSource,
        resolver: &H,
        rng: &mut R,
        clock: C
    ) -> error::Result<Self>
    where
        H: HostResolver + ?Sized,
        R: TryCryptoRng + ?Sized,
    {
        let raw = source.resolve_with(resolver, rng)?;
        let gen = Self::with_clock(raw, clock);

        tracing::debug!(?source, raw, worker_id = gen.worker_id, "created generator");

        Ok(gen)
    }

    /// returns the reduced worker id
    pub fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// retrieves the next available id
    pub fn next_id(&mut self) -> Flake {
        let (tsm, seq) = self.counts.advance(self.clock.now());

        Flake::compose(tsm, self.worker_id, seq)
    }
}

impl<C> IdGeneratorMut for Generator<C>
where
    C: Clock
{
    type Error = std::convert::Infallible;
    type Id = Flake;
    type Output = Flake;

    fn next_id(&mut self) -> Self::Output {
        Generator::next_id(self)
    }
}
