use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counter shared by the characteristic handlers of one service instance.
///
/// Cloning yields another handle to the same value.
#[derive(Debug, Clone, Default)]
pub struct Counter {
    value: Arc<AtomicU64>,
}

impl Counter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u64 {
        self.value.load(Ordering::SeqCst)
    }

    /// Adds one and returns the new value.
    pub fn increment(&self) -> u64 {
        self.value.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn reset(&self) {
        self.value.store(0, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_zero() {
        assert_eq!(Counter::new().get(), 0);
    }

    #[test]
    fn increment_and_reset() {
        let counter = Counter::new();
        for expected in 1..=5 {
            assert_eq!(counter.increment(), expected);
        }
        assert_eq!(counter.get(), 5);

        counter.reset();
        assert_eq!(counter.get(), 0);
    }

    #[test]
    fn clones_share_value() {
        let counter = Counter::new();
        let other = counter.clone();
        other.increment();
        assert_eq!(counter.get(), 1);
        assert_eq!(Counter::new().get(), 0);
    }

    #[test]
    fn concurrent_increments_are_not_lost() {
        let counter = Counter::new();
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let counter = counter.clone();
                std::thread::spawn(move || {
                    for _ in 0..1000 {
                        counter.increment();
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }
        assert_eq!(counter.get(), 8000);
    }
}
