use std::sync::{Arc, Mutex, PoisonError};

use kflake_core::traits::{Clock, IdGenerator};
use kflake_flake::Flake;
use rand::rngs::OsRng;
use rand::TryCryptoRng;

use crate::clock::SystemClock;
use crate::common::Counts;
use crate::error;
use crate::worker::{self, HostResolver, SystemResolver, WorkerSource};

/// thread safe flake generator
///
/// generates flakes for a single worker id. the worker id is reduced to 10
/// bits when the generator is created and the sequence starts at 0.
///
/// this guards the previous time and sequence count behind an
/// [`Arc`](std::sync::Arc) [`Mutex`](std::sync::Mutex). clones share the
/// same counts so handing a clone to each thread still produces unique ids.
/// the clock is read before taking the lock and the critical section only
/// updates the counts.
///
/// next_id never fails. when the sequence runs out inside a millisecond the
/// timestamp is moved to the next millisecond instead of waiting for it.
///
/// ```rust
/// use kflake_cloud::sync::MutexGenerator;
///
/// let cloud = MutexGenerator::new(1);
///
/// println!("worker id: {}", cloud.worker_id());
///
/// let flake = cloud.next_id();
///
/// println!("{} {}", flake.id(), flake);
/// ```
pub struct MutexGenerator<C = SystemClock> {
    worker_id: u64,
    clock: C,
    counts: Arc<Mutex<Counts>>,
}

impl<C> Clone for MutexGenerator<C>
where
    C: Clone
{
    fn clone(&self) -> Self {
        MutexGenerator {
            worker_id: self.worker_id,
            clock: self.clock.clone(),
            counts: Arc::clone(&self.counts),
        }
    }
}

impl MutexGenerator<SystemClock> {
    /// returns a new MutexGenerator for the given worker id
    pub fn new(worker_id: u64) -> Self {
        Self::with_clock(worker_id, SystemClock)
    }

    /// returns a new MutexGenerator using the ipv4 address of the host as
    /// the worker id
    ///
    /// will return [`Resolution`](crate::error::Error::Resolution) if no
    /// usable address is found
    pub fn with_host_id() -> error::Result<Self> {
        Self::from_source(WorkerSource::Host)
    }

    /// returns a new MutexGenerator with a random worker id
    ///
    /// will return [`Entropy`](crate::error::Error::Entropy) if the os random
    /// source fails
    pub fn with_random_id() -> error::Result<Self> {
        Self::from_source(WorkerSource::Random)
    }

    /// returns a new MutexGenerator with the worker id from the given source
    pub fn from_source(source: WorkerSource) -> error::Result<Self> {
        Self::from_source_with_clock(source, SystemClock)
    }
}

impl<C> MutexGenerator<C>
where
    C: Clock
{
    /// returns a new MutexGenerator that reads timestamps from the given
    /// clock
    pub fn with_clock(worker_id: u64, clock: C) -> Self {
        let prev_time = clock.now();

        MutexGenerator {
            worker_id: worker::reduce(worker_id),
            clock,
            counts: Arc::new(Mutex::new(Counts::new(prev_time))),
        }
    }

    /// returns a new MutexGenerator with the worker id from the given source
    /// and timestamps from the given clock
    pub fn from_source_with_clock(source: WorkerSource, clock: C) -> error::Result<Self> {
        Self::from_source_with(source, &SystemResolver, &mut OsRng, clock)
    }

    /// returns a new MutexGenerator with the worker id from the given source,
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

        tracing::debug!(?source, raw, worker_id = gen.worker_id, "created mutex generator");

        Ok(gen)
    }

    /// returns the reduced worker id
    pub fn worker_id(&self) -> u64 {
        self.worker_id
    }

    /// retrieves the next available id
    pub fn next_id(&self) -> Flake {
        let now = self.clock.now();

        let (tsm, seq) = {
            // the counts are never left half updated, so a panic in another
            // thread holding the lock does not invalidate them
            let mut counts = self.counts.lock()
                .unwrap_or_else(PoisonError::into_inner);

            counts.advance(now)
        };

        Flake::compose(tsm, self.worker_id, seq)
    }
}

impl<C> IdGenerator for MutexGenerator<C>
where
    C: Clock
{
    type Error = std::convert::Infallible;
    type Id = Flake;
    type Output = Flake;

    fn next_id(&self) -> Self::Output {
        MutexGenerator::next_id(self)
    }
}
