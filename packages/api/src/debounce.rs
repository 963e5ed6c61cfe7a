use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::timer::sleep;

/// Debouncer for input handlers.
///
/// Each call to [`settle`](Debouncer::settle) takes a new generation ticket,
/// waits for the delay, and reports whether no newer call arrived meanwhile.
/// Only the last keystroke of a burst sees `true`.
#[derive(Clone, Debug)]
pub struct Debouncer {
    generation: Arc<AtomicU64>,
    delay: Duration,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            generation: Arc::new(AtomicU64::new(0)),
            delay,
        }
    }

    pub fn from_millis(ms: u32) -> Self {
        Self::new(Duration::from_millis(u64::from(ms)))
    }

    /// Take a new ticket, invalidating every earlier one.
    pub fn ticket(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket
    }

    /// Wait out the delay; `true` if this call is still the latest.
    pub async fn settle(&self) -> bool {
        let ticket = self.ticket();
        sleep(self.delay).await;
        self.is_current(ticket)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newer_ticket_invalidates_older() {
        let d = Debouncer::from_millis(10);
        let first = d.ticket();
        assert!(d.is_current(first));
        let second = d.ticket();
        assert!(!d.is_current(first));
        assert!(d.is_current(second));
    }

    #[tokio::test]
    async fn test_only_last_call_of_burst_settles() {
        let d = Debouncer::from_millis(30);
        let first = d.settle();
        let second = async {
            sleep(Duration::from_millis(5)).await;
            d.settle().await
        };
        let (a, b) = tokio::join!(first, second);
        assert!(!a);
        assert!(b);
    }
}
