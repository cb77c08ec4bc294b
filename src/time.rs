//! Cached wall-clock reads. The store stamps a fresh Interval on every
//! record it creates and restamps on reset; reading the clock through an
//! atomic keeps those stamps cheap on the hot ingestion path. A host server
//! runs `update_time` on a utility thread to keep the cache fresh.

use chrono::Utc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::{thread, time};

lazy_static! {
    static ref NOW: Arc<AtomicUsize> =
        Arc::new(AtomicUsize::new(Utc::now().timestamp() as usize));
}

/// The current unix time in seconds, read from the cache.
pub fn now() -> i64 {
    NOW.load(Ordering::Relaxed) as i64
}

/// Refresh the cached time twice a second. Never returns; intended to be
/// spawned onto a utility thread by the host server.
pub fn update_time() {
    let dur = time::Duration::from_millis(500);
    loop {
        thread::sleep(dur);
        let now = Utc::now().timestamp() as usize;
        let order = Ordering::Relaxed;
        trace!("updated setstore {:?} now, is: {}", order, now);
        NOW.store(now, order);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_now_is_wall_clock() {
        let n = now();
        let wall = Utc::now().timestamp();
        // the cache is stamped at first access and not refreshed in tests
        assert!(n > 0);
        assert!((wall - n).abs() < 5);
    }
}
