//! Barrier state: the set of agencies that have declared "finished
//! sending" (`spec.md` §4.D).

use std::collections::HashSet;
use std::sync::Mutex;

use loto_proto::AgencyId;

/// Shared, mutable set of agencies that have sent `FINISHED_SENDING`, plus
/// the fixed count of agencies expected to participate.
///
/// Guarded by a single `std::sync::Mutex`: every operation is short and
/// synchronous, so the guard is never held across an `.await` point
/// (`spec.md` §4.G: `barrier_lock`).
#[derive(Debug)]
pub struct BarrierState {
    finished: Mutex<HashSet<u32>>,
    expected_agencies: u32,
}

/// Recover the guard from a poisoned mutex rather than panicking. A panic
/// in one session's critical section must not take down every other
/// session sharing this barrier.
fn lock(mutex: &Mutex<HashSet<u32>>) -> std::sync::MutexGuard<'_, HashSet<u32>> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl BarrierState {
    /// Create an empty barrier expecting `expected_agencies` distinct
    /// agencies to finish before [`Self::is_ready`] becomes true.
    #[must_use]
    pub fn new(expected_agencies: u32) -> Self {
        Self { finished: Mutex::new(HashSet::new()), expected_agencies }
    }

    /// Record that `agency_id` has finished sending. Idempotent: a second
    /// call for the same agency does not change [`Self::size`].
    pub fn mark_finished(&self, agency_id: AgencyId) {
        lock(&self.finished).insert(agency_id.0);
    }

    /// Number of distinct agencies that have finished.
    #[must_use]
    pub fn size(&self) -> usize {
        lock(&self.finished).len()
    }

    /// `true` once at least `expected_agencies` distinct agencies have
    /// finished.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.size() >= self.expected_agencies as usize
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn finish_idempotence() {
        let barrier = BarrierState::new(3);
        for _ in 0..5 {
            barrier.mark_finished(AgencyId(1));
        }
        assert_eq!(barrier.size(), 1);
    }

    #[test]
    fn is_ready_reflects_expected_count() {
        let barrier = BarrierState::new(2);
        assert!(!barrier.is_ready());
        barrier.mark_finished(AgencyId(1));
        assert!(!barrier.is_ready());
        barrier.mark_finished(AgencyId(2));
        assert!(barrier.is_ready());
    }

    #[test]
    fn distinct_agencies_all_count() {
        let barrier = BarrierState::new(3);
        barrier.mark_finished(AgencyId(1));
        barrier.mark_finished(AgencyId(2));
        barrier.mark_finished(AgencyId(3));
        assert_eq!(barrier.size(), 3);
        assert!(barrier.is_ready());
    }

    proptest! {
        #[test]
        fn monotonicity_under_concurrent_marks(ids in prop::collection::vec(0u32..20, 0..50)) {
            let barrier = Arc::new(BarrierState::new(1000));
            let handles: Vec<_> = ids
                .chunks(5)
                .map(|chunk| {
                    let barrier = Arc::clone(&barrier);
                    let chunk = chunk.to_vec();
                    thread::spawn(move || {
                        let mut sizes = Vec::new();
                        for id in chunk {
                            barrier.mark_finished(AgencyId(id));
                            sizes.push(barrier.size());
                        }
                        sizes
                    })
                })
                .collect();

            let mut all_sizes = Vec::new();
            for handle in handles {
                #[allow(clippy::expect_used)]
                let sizes = handle.join().expect("worker thread should not panic");
                all_sizes.extend(sizes);
            }

            let distinct_count = ids.iter().collect::<std::collections::HashSet<_>>().len();
            prop_assert_eq!(barrier.size(), distinct_count);
            prop_assert!(all_sizes.iter().all(|&s| s <= distinct_count));
        }
    }
}
