//! Line render timing.
//!
//! Keeps the duration of the most recent line render and a running count, read by the
//! runtime for its debug log on shutdown.
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

static LAST_LINE_NS: AtomicU64 = AtomicU64::new(0);
static LINES_RENDERED: AtomicU64 = AtomicU64::new(0);

pub fn record_line_render(started: Instant) {
    let ns = started.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
    LAST_LINE_NS.store(ns, Ordering::Relaxed);
    LINES_RENDERED.fetch_add(1, Ordering::Relaxed);
}

/// Duration of the last completed line render in nanoseconds.
pub fn last_line_ns() -> u64 {
    LAST_LINE_NS.load(Ordering::Relaxed)
}

pub fn lines_rendered() -> u64 {
    LINES_RENDERED.load(Ordering::Relaxed)
}
