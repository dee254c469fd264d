//! Prioritized, de-duplicated, single-flight refresh queue.
//!
//! A pure state machine (`Idle -> Dispatching -> Idle`) driven by discrete
//! calls, so it composes with a single-threaded control loop: no blocking
//! sleeps, no timers of its own. At most one dispatch is in flight globally,
//! and after a completion the pacing deadline holds back the next dispatch.
//! That single slot plus the pacing interval is the backpressure protecting
//! the rate-limited upstream forecast computation.

use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use tracing::trace;

/// Single-flight work queue over keys of type `K`.
#[derive(Debug)]
pub struct RefreshScheduler<K> {
    queue: VecDeque<K>,
    in_flight: Option<K>,
    ready_at: Option<DateTime<Utc>>,
    pacing: Duration,
}

impl<K: Eq + Clone + std::fmt::Debug> RefreshScheduler<K> {
    /// `pacing` is the minimum delay between a completion and the next
    /// dispatch.
    pub fn new(pacing: Duration) -> Self {
        RefreshScheduler {
            queue: VecDeque::new(),
            in_flight: None,
            ready_at: None,
            pacing,
        }
    }

    /// Append a key to the tail unless it is already queued or in flight.
    pub fn enqueue(&mut self, key: K) {
        if self.in_flight.as_ref() == Some(&key) || self.queue.contains(&key) {
            return;
        }
        self.queue.push_back(key);
    }

    /// Move a key to the head of the queue, inserting it if absent. Used when
    /// the user focuses a target so its forecast is computed first.
    pub fn prioritize(&mut self, key: K) {
        if self.in_flight.as_ref() == Some(&key) {
            return;
        }
        self.queue.retain(|k| k != &key);
        self.queue.push_front(key);
    }

    /// Drain tick: pop the next key that still needs work, if the machine is
    /// idle and the pacing deadline has passed. Keys for which `needs`
    /// returns false are dropped rather than dispatched stale.
    pub fn next_dispatch(
        &mut self,
        now: DateTime<Utc>,
        mut needs: impl FnMut(&K) -> bool,
    ) -> Option<K> {
        if self.in_flight.is_some() {
            return None;
        }
        if let Some(ready_at) = self.ready_at {
            if now < ready_at {
                return None;
            }
        }
        while let Some(key) = self.queue.pop_front() {
            if needs(&key) {
                trace!(?key, "dispatching refresh");
                self.in_flight = Some(key.clone());
                return Some(key);
            }
            trace!(?key, "dropping refresh request that is no longer needed");
        }
        None
    }

    /// A dispatch finished, successfully or not. Clears the in-flight slot
    /// and starts the pacing interval.
    pub fn complete(&mut self, now: DateTime<Utc>) {
        self.in_flight = None;
        self.ready_at = Some(now + self.pacing);
    }

    pub fn is_dispatching(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.queue.contains(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn scheduler() -> RefreshScheduler<u32> {
        RefreshScheduler::new(Duration::milliseconds(1500))
    }

    #[test]
    fn test_enqueue_deduplicates() {
        let mut s = scheduler();
        s.enqueue(1);
        s.enqueue(2);
        s.enqueue(1);
        assert_eq!(s.queue_len(), 2);
    }

    #[test]
    fn test_fifo_dispatch_order() {
        let mut s = scheduler();
        s.enqueue(1);
        s.enqueue(2);
        assert_eq!(s.next_dispatch(t(0), |_| true), Some(1));
        s.complete(t(1));
        assert_eq!(s.next_dispatch(t(10), |_| true), Some(2));
    }

    #[test]
    fn test_prioritize_moves_key_to_head_once() {
        let mut s = scheduler();
        s.enqueue(1);
        s.enqueue(2);
        s.enqueue(3);
        s.prioritize(2);

        assert_eq!(s.queue_len(), 3);
        assert_eq!(s.next_dispatch(t(0), |_| true), Some(2));
        // The prioritized key appears only once afterwards.
        assert!(!s.contains(&2));
    }

    #[test]
    fn test_prioritize_inserts_absent_key() {
        let mut s = scheduler();
        s.enqueue(1);
        s.prioritize(9);
        assert_eq!(s.next_dispatch(t(0), |_| true), Some(9));
    }

    #[test]
    fn test_single_flight_globally() {
        let mut s = scheduler();
        s.enqueue(1);
        s.enqueue(2);
        assert_eq!(s.next_dispatch(t(0), |_| true), Some(1));
        assert!(s.is_dispatching());
        // Nothing else dispatches until completion, regardless of key.
        assert_eq!(s.next_dispatch(t(0), |_| true), None);
    }

    #[test]
    fn test_pacing_holds_back_next_dispatch() {
        let mut s = scheduler();
        s.enqueue(1);
        s.enqueue(2);
        assert_eq!(s.next_dispatch(t(0), |_| true), Some(1));
        s.complete(t(1));

        // Deadline is completion + 1.5s.
        assert_eq!(s.next_dispatch(t(2), |_| true), Some(2));

        let mut s = scheduler();
        s.enqueue(1);
        s.enqueue(2);
        s.next_dispatch(t(0), |_| true);
        s.complete(t(1));
        let just_before = t(1) + Duration::milliseconds(1499);
        assert_eq!(s.next_dispatch(just_before, |_| true), None);
        let at_deadline = t(1) + Duration::milliseconds(1500);
        assert_eq!(s.next_dispatch(at_deadline, |_| true), Some(2));
    }

    #[test]
    fn test_stale_requests_skipped() {
        let mut s = scheduler();
        s.enqueue(1);
        s.enqueue(2);
        s.enqueue(3);
        // 1 and 2 were refreshed by another path in the meantime.
        assert_eq!(s.next_dispatch(t(0), |k| *k == 3), Some(3));
        assert_eq!(s.queue_len(), 0);
    }

    #[test]
    fn test_all_stale_leaves_idle() {
        let mut s = scheduler();
        s.enqueue(1);
        assert_eq!(s.next_dispatch(t(0), |_| false), None);
        assert!(!s.is_dispatching());
        assert_eq!(s.queue_len(), 0);
    }

    #[test]
    fn test_enqueue_of_in_flight_key_suppressed() {
        let mut s = scheduler();
        s.enqueue(1);
        s.next_dispatch(t(0), |_| true);
        s.enqueue(1);
        s.prioritize(1);
        assert_eq!(s.queue_len(), 0);
    }

    #[test]
    fn test_failure_still_paces_and_proceeds() {
        let mut s = scheduler();
        s.enqueue(1);
        s.enqueue(2);
        s.next_dispatch(t(0), |_| true);
        // Failed dispatch completes like any other.
        s.complete(t(1));
        assert!(!s.is_dispatching());
        assert_eq!(
            s.next_dispatch(t(1) + Duration::milliseconds(1500), |_| true),
            Some(2)
        );
    }
}
