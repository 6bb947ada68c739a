use crate::fx::Sample;

/// Fixed-capacity circular store of the most recent `max_delay + 1` samples.
///
/// Storage is allocated once in [`RingHistory::new`]; `push` only moves the
/// cursor and overwrites the oldest slot. Lookups are relative to the most
/// recent push: `get(0)` is the newest value, `get(max_delay)` the oldest.
///
/// Offsets beyond `max_delay` are rejected rather than wrapped around, since
/// an aliased read silently returns a sample from the wrong point in time.
pub struct RingHistory {
    buffer: Box<[Sample]>,
    cursor: usize,
}

impl RingHistory {
    pub fn new(max_delay: usize) -> Self {
        let capacity = max_delay + 1;

        Self {
            buffer: vec![0.0; capacity].into_boxed_slice(),
            // First push lands in slot 0.
            cursor: capacity - 1,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn max_delay(&self) -> usize {
        self.buffer.len() - 1
    }

    #[inline]
    pub fn push(&mut self, sample: Sample) {
        self.cursor += 1;
        if self.cursor == self.buffer.len() {
            self.cursor = 0;
        }
        self.buffer[self.cursor] = sample;
    }

    /// Replace the most recently pushed value.
    #[inline]
    pub fn overwrite_latest(&mut self, sample: Sample) {
        self.buffer[self.cursor] = sample;
    }

    /// Sample pushed `offset` pushes ago.
    ///
    /// # Panics
    ///
    /// Panics if `offset > max_delay`.
    #[inline]
    pub fn get(&self, offset: usize) -> Sample {
        assert!(
            offset <= self.max_delay(),
            "history offset {offset} exceeds max delay {}",
            self.max_delay()
        );
        self.buffer[self.index_of(offset)]
    }

    /// Like [`RingHistory::get`], returning `None` for offsets beyond `max_delay`.
    #[inline]
    pub fn checked_get(&self, offset: usize) -> Option<Sample> {
        (offset <= self.max_delay()).then(|| self.buffer[self.index_of(offset)])
    }

    #[inline]
    fn index_of(&self, offset: usize) -> usize {
        let len = self.buffer.len();
        (self.cursor + len - offset) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_zeroed() {
        let history = RingHistory::new(4);
        assert_eq!(history.capacity(), 5);
        for offset in 0..=4 {
            assert_eq!(history.get(offset), 0.0);
        }
    }

    #[test]
    fn recalls_recent_pushes() {
        let mut history = RingHistory::new(3);
        for v in 0..10 {
            history.push(v as Sample);
            assert_eq!(history.get(0), v as Sample);

            let depth = v.min(3);
            for i in 0..=depth {
                assert_eq!(history.get(i), (v - i) as Sample, "offset {i} after push {v}");
            }
        }
    }

    #[test]
    fn evicts_oldest_after_capacity_pushes() {
        let max_delay = 4;
        let mut history = RingHistory::new(max_delay);
        for v in 1..=(max_delay + 2) {
            history.push(v as Sample);
        }

        // Capacity is 5, six values were pushed: the first one is gone.
        assert_ne!(history.get(max_delay), 1.0);
        assert_eq!(history.get(max_delay), 2.0);
    }

    #[test]
    fn overwrite_latest_keeps_older_values() {
        let mut history = RingHistory::new(2);
        history.push(1.0);
        history.push(0.0);
        history.overwrite_latest(7.0);

        assert_eq!(history.get(0), 7.0);
        assert_eq!(history.get(1), 1.0);
    }

    #[test]
    fn checked_get_rejects_out_of_range() {
        let mut history = RingHistory::new(2);
        history.push(3.0);

        assert_eq!(history.checked_get(0), Some(3.0));
        assert_eq!(history.checked_get(2), Some(0.0));
        assert_eq!(history.checked_get(3), None);
    }

    #[test]
    #[should_panic(expected = "exceeds max delay")]
    fn get_panics_instead_of_aliasing() {
        let history = RingHistory::new(2);
        let _ = history.get(3);
    }

    #[test]
    fn zero_max_delay_holds_only_latest() {
        let mut history = RingHistory::new(0);
        history.push(1.0);
        history.push(2.0);
        assert_eq!(history.get(0), 2.0);
        assert_eq!(history.checked_get(1), None);
    }
}
