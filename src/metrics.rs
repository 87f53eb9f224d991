use std::sync::atomic::{AtomicU64, Ordering};

/// Counts hits on the static file server
///
/// Created once in `startup` and handed to both the counting middleware
/// and the admin handlers.
#[derive(Debug, Default)]
pub struct HitCounter {
    hits: AtomicU64,
}

impl HitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_resets() {
        let counter = HitCounter::new();
        counter.increment();
        counter.increment();
        assert_eq!(counter.hits(), 2);

        counter.reset();
        assert_eq!(counter.hits(), 0);
    }
}
