#![cfg(feature = "metrics")]

use log::info;
use once_cell::sync::Lazy;
use std::{
    collections::BTreeMap,
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Instant,
};

/* ───────────── Raw latencies ─────────────────────────── */

static TIMES: Lazy<Mutex<Vec<(&'static str, u128)>>> =
    Lazy::new(|| Mutex::new(Vec::new()));

/// Call right after the measured step: `record("enqueue_read", t)`.
pub fn record(name: &'static str, start: Instant) {
    let dur = start.elapsed().as_micros();
    if let Ok(mut times) = TIMES.lock() {
        times.push((name, dur));
    }
}

/* ───────────── Device allocations ────────────────────── */

/// Live device buffers and their size in bytes.
pub static ALLOCS:      AtomicUsize = AtomicUsize::new(0);
pub static ALLOC_BYTES: AtomicUsize = AtomicUsize::new(0);

/* ───────────── Summary ──────────────────────────────── */

/// Mean and p95 per step name, drained from the log.
pub fn stats() -> Vec<(&'static str, u128, u128)> {
    let mut map: BTreeMap<&'static str, Vec<u128>> = BTreeMap::new();
    if let Ok(mut times) = TIMES.lock() {
        for (name, us) in times.drain(..) {
            map.entry(name).or_default().push(us);
        }
    }

    map.into_iter()
        .map(|(name, mut v)| {
            v.sort_unstable();
            let mean = v.iter().sum::<u128>() / v.len() as u128;
            let p95 = v[((v.len() * 95) / 100).saturating_sub(1)];
            (name, mean, p95)
        })
        .collect()
}

/// Logs the latency table and the live allocation counters.
pub fn summary() {
    info!("── metrics summary ──");
    for (name, mean, p95) in stats() {
        info!("{:<16} mean={:>7} µs   p95={:>7} µs", name, mean, p95);
    }
    let allocs = ALLOCS.load(Ordering::Relaxed);
    let bytes = ALLOC_BYTES.load(Ordering::Relaxed);
    info!("live device buffers: {}   ({} bytes)", allocs, bytes);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_group_by_name() {
        let t = Instant::now();
        record("metrics_test_a", t);
        record("metrics_test_a", t);
        record("metrics_test_b", t);
        let stats = stats();
        assert!(stats.iter().any(|(n, _, _)| *n == "metrics_test_a"));
        assert!(stats.iter().any(|(n, _, _)| *n == "metrics_test_b"));
        assert!(stats().iter().all(|(n, _, _)| !n.starts_with("metrics_test")));
    }
}
