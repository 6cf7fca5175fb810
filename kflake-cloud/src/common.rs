use kflake_flake::Flake;

/// the last used timestamp and sequence of a generator
///
/// both values are read and updated together so they must always live behind
/// the same lock.
#[derive(Debug, Clone)]
pub struct Counts {
    pub prev_time: u64,
    pub sequence: u64,
}

impl Counts {
    pub fn new(prev_time: u64) -> Self {
        Counts {
            prev_time,
            sequence: 0,
        }
    }

    /// moves the counts forward for a clock reading of `now` and returns the
    /// timestamp and sequence to encode
    ///
    /// a reading at or behind the previous timestamp reuses the previous
    /// timestamp with the next sequence. this also covers the clock moving
    /// backwards, which means sustained drift can keep pushing prev_time
    /// ahead of the real clock. once the sequence runs out the timestamp is
    /// bumped to the next millisecond even if the clock has not reached it.
    pub fn advance(&mut self, now: u64) -> (u64, u64) {
        let mut now = now;
        let mut sequence = self.sequence;

        if now <= self.prev_time {
            now = self.prev_time;
            sequence += 1;
        } else {
            sequence = 0;
        }

        if sequence > Flake::MAX_SEQUENCE {
            now += 1;
            sequence = 0;

            tracing::trace!(timestamp = now, "sequence exhausted, borrowing next millisecond");
        }

        self.prev_time = now;
        self.sequence = sequence;

        (now, sequence)
    }
}
