use std::collections::HashSet;
use std::io;
use std::net::IpAddr;
use std::sync::{Arc, Barrier};
use std::time::Instant;

use rand::rngs::OsRng;
use rand::{TryCryptoRng, TryRngCore};

use kflake::{Flake, Generator, MutexGenerator};
use kflake::cloud::clock::ManualClock;
use kflake::cloud::error::Error;
use kflake::cloud::worker::{HostResolver, WorkerSource};
use kflake::traits::IdGenerator;

const THREADS: usize = 8;
const PER_THREAD: usize = 2_000;

#[test]
fn sanity_check() {
    let mut gen = Generator::new(1);

    for _ in 0..(Flake::MAX_SEQUENCE * 3) {
        let flake = gen.next_id();

        assert_eq!(flake.worker_id(), 1);
        assert_eq!(flake.to_string().parse::<Flake>().unwrap(), flake);
    }
}

#[test]
fn threaded_sanity_check() {
    let gen = MutexGenerator::new(7);
    let mut threads = Vec::with_capacity(4);

    for _ in 0..threads.capacity() {
        let local_gen = gen.clone();

        threads.push(std::thread::spawn(move || {
            for _ in 0..(Flake::MAX_SEQUENCE * 3) {
                assert_eq!(IdGenerator::next_id(&local_gen).worker_id(), 7);
            }
        }));
    }

    for joiner in threads {
        joiner.join().expect("thread paniced");
    }
}

struct Call {
    flake: Flake,
    start: Instant,
    end: Instant,
}

#[test]
fn concurrent_ids_are_distinct_and_ordered() {
    let gen = MutexGenerator::new(3);
    let barrier = Arc::new(Barrier::new(THREADS));
    let mut handles = Vec::with_capacity(THREADS);

    for _ in 0..THREADS {
        let b = Arc::clone(&barrier);
        let g = gen.clone();

        handles.push(std::thread::spawn(move || {
            let mut calls = Vec::with_capacity(PER_THREAD);
            b.wait();

            for _ in 0..PER_THREAD {
                let start = Instant::now();
                let flake = g.next_id();
                let end = Instant::now();

                calls.push(Call { flake, start, end });
            }

            calls
        }));
    }

    let mut calls = Vec::with_capacity(THREADS * PER_THREAD);

    for handle in handles {
        calls.extend(handle.join().expect("thread paniced"));
    }

    let unique: HashSet<Flake> = calls.iter().map(|call| call.flake).collect();

    assert_eq!(unique.len(), THREADS * PER_THREAD, "encountered duplicate ids");

    // any call that finished before another started must hold a smaller id
    let mut by_end: Vec<&Call> = calls.iter().collect();
    by_end.sort_by_key(|call| call.end);

    let mut by_start: Vec<&Call> = calls.iter().collect();
    by_start.sort_by_key(|call| call.start);

    let mut finished_max: Option<Flake> = None;
    let mut index = 0;

    for call in by_start {
        while index < by_end.len() && by_end[index].end < call.start {
            finished_max = finished_max.max(Some(by_end[index].flake));
            index += 1;
        }

        if let Some(max) = finished_max {
            assert!(
                max < call.flake,
                "id issued after a finished call is not larger.\nfinished: {:#?}\nlater: {:#?}",
                max,
                call.flake
            );
        }
    }

    // the shared state keeps going after the threads are gone
    let after = gen.next_id();

    assert!(calls.iter().all(|call| call.flake < after));
}

#[test]
fn frozen_clock_rollover() {
    let clock = ManualClock::new(9_999);
    let gen = MutexGenerator::with_clock(5, clock.clone());

    clock.set(10_000);

    for seq in 0..8192 {
        let flake = gen.next_id();

        assert_eq!(flake.into_parts(), (10_000, 5, seq));
    }

    let flake = gen.next_id();

    assert_eq!(flake.timestamp(), 10_001);
    assert_eq!(flake.sequence(), 0);
}

#[test]
fn bit_decomposition() {
    let clock = ManualClock::new(0);
    let gen = MutexGenerator::with_clock(3, clock.clone());

    clock.set(5_000);

    let flake = gen.next_id();

    assert_eq!(flake.id(), (5_000u64 << 23) | (3 << 13));
    assert_eq!(u64::from(flake) >> 23, 5_000);
    assert_eq!((flake.id() >> 13) & 0x3ff, 3);
    assert_eq!(flake.id() & 0x1fff, 0);
}

#[test]
fn explicit_worker_id_is_reduced() {
    let gen = MutexGenerator::new(1034);
    let flake = gen.next_id();

    assert_eq!((flake.id() >> 13) & 0x3ff, 10);
}

#[test]
fn base36_text() {
    assert_eq!(Flake::from(0).to_string(), "0");
    assert_eq!(Flake::from(36).to_string(), "10");

    let gen = MutexGenerator::new(1);

    for _ in 0..100 {
        let flake = gen.next_id();
        let text = flake.to_string();

        assert!(text.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
        assert_eq!(u64::from_str_radix(&text, 36).unwrap(), flake.id());
    }
}

#[test]
fn random_worker_id() {
    let gen = MutexGenerator::with_random_id().expect("failed to create random generator");

    assert!(gen.worker_id() <= Flake::MAX_WORKER_ID);
    assert_eq!(gen.next_id().worker_id(), gen.worker_id());
}

struct Unresolvable;

impl HostResolver for Unresolvable {
    fn hostname(&self) -> io::Result<String> {
        Ok(String::from("no-such-host.invalid"))
    }

    fn lookup(&self, host: &str) -> io::Result<Vec<IpAddr>> {
        Err(io::Error::new(io::ErrorKind::NotFound, format!("failed to lookup {}", host)))
    }
}

#[test]
fn unresolvable_host_gives_no_generator() {
    let result = MutexGenerator::from_source_with(
        WorkerSource::Host,
        &Unresolvable,
        &mut OsRng,
        ManualClock::new(0)
    );

    match result {
        Ok(gen) => panic!("created a generator with worker id {}", gen.worker_id()),
        Err(Error::Resolution(_)) => {},
        Err(err) => panic!("unexpected error: {}", err),
    }
}

struct NoEntropy;

impl TryRngCore for NoEntropy {
    type Error = io::Error;

    fn try_next_u32(&mut self) -> Result<u32, Self::Error> {
        Err(io::Error::new(io::ErrorKind::Other, "no entropy"))
    }

    fn try_next_u64(&mut self) -> Result<u64, Self::Error> {
        Err(io::Error::new(io::ErrorKind::Other, "no entropy"))
    }

    fn try_fill_bytes(&mut self, _dst: &mut [u8]) -> Result<(), Self::Error> {
        Err(io::Error::new(io::ErrorKind::Other, "no entropy"))
    }
}

impl TryCryptoRng for NoEntropy {}

#[test]
fn failed_random_source_gives_no_generator() {
    let result = MutexGenerator::from_source_with(
        WorkerSource::Random,
        &Unresolvable,
        &mut NoEntropy,
        ManualClock::new(0)
    );

    match result {
        Ok(gen) => panic!("created a generator with worker id {}", gen.worker_id()),
        Err(Error::Entropy(_)) => {},
        Err(err) => panic!("unexpected error: {}", err),
    }
}
