
use std::sync::atomic::{AtomicU64, Ordering};

/// Returns a process-unique, monotonically increasing id.
///
/// Ids start at 1 so that 0 never names a live connection.
pub fn get_id() -> u64 {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}
