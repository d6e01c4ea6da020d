//! GPU vs CPU vector-addition benchmark.

use crate::{ops::VectorAdd, reference, Error, Result, Session};

use log::debug;
use std::{fmt, io::Write, time::Instant};

pub const TITLE: &str = "# Vector Addition benchmark";
pub const HEADER: &str = "#N\tTime(OCL)\tTime\t\tMB/s(OCL)\tMB/s";

pub const DEFAULT_START: usize = 1000;
pub const DEFAULT_LIMIT: usize = 1_000_000;
pub const DEFAULT_REPETITIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchConfig {
    /// First vector length.
    pub start: usize,
    /// Sizes stop before reaching this length.
    pub limit: usize,
    /// Timed rounds per size, averaged.
    pub repetitions: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            limit: DEFAULT_LIMIT,
            repetitions: DEFAULT_REPETITIONS,
        }
    }
}

/// `start, ⌊1.5·start⌋, …` while below `limit`.
pub fn sizes(start: usize, limit: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut n = start;
    while n < limit {
        out.push(n);
        let next = n * 3 / 2;
        if next <= n {
            break;
        }
        n = next;
    }
    out
}

/// `a = [0, 1, 2, …]`, `b = [0, 1, 4, 9, …]` (wrapping).
pub fn inputs(n: usize) -> (Vec<i32>, Vec<i32>) {
    let a: Vec<i32> = (0..n).map(|i| i as i32).collect();
    let b = a.iter().map(|&i| i.wrapping_mul(i)).collect();
    (a, b)
}

/// First index where the device result differs from the host one.
pub fn verify(device: &[i32], host: &[i32]) -> Result<()> {
    match device.iter().zip(host).position(|(d, h)| d != h) {
        Some(index) => Err(Error::Verification {
            index,
            expected: host[index] as i64,
            actual: device[index] as i64,
        }),
        None if device.len() != host.len() => Err(Error::LengthMismatch {
            host: host.len(),
            device: device.len(),
        }),
        None => Ok(()),
    }
}

/// Averaged timings for one vector length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchRow {
    pub size: usize,
    pub ocl_secs: f64,
    pub cpu_secs: f64,
}

impl BenchRow {
    pub fn bytes(&self) -> usize {
        self.size * std::mem::size_of::<i32>()
    }

    pub fn ocl_throughput(&self) -> f64 {
        self.bytes() as f64 / self.ocl_secs / 1e6
    }

    pub fn cpu_throughput(&self) -> f64 {
        self.bytes() as f64 / self.cpu_secs / 1e6
    }
}

impl fmt::Display for BenchRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{:.9}\t{:.9}\t{:.3}\t\t{:.3}",
            self.size,
            self.ocl_secs,
            self.cpu_secs,
            self.ocl_throughput(),
            self.cpu_throughput()
        )
    }
}

/// Runs the whole table, writing the header and one line per size to `out`.
/// The device sum is checked against the host sum for every size.
pub fn run<W: Write>(session: &Session, config: &BenchConfig, out: &mut W) -> Result<Vec<BenchRow>> {
    if config.repetitions == 0 {
        return Err(Error::InvalidSize(config.repetitions));
    }
    let kernel = session.kernel("simple_add")?;

    writeln!(out, "{TITLE}")?;
    writeln!(out, "{HEADER}")?;

    let mut rows = Vec::new();
    for size in sizes(config.start, config.limit) {
        let (a, b) = inputs(size);
        let job = VectorAdd::upload(session, &a, &b)?;
        let mut device_sum = vec![0i32; size];
        let mut host_sum = vec![0i32; size];

        let (mut ocl_secs, mut cpu_secs) = (0.0, 0.0);
        for _ in 0..config.repetitions {
            let t = Instant::now();
            job.run(session, &kernel, &mut device_sum)?;
            ocl_secs += t.elapsed().as_secs_f64();

            let t = Instant::now();
            reference::vector_add(&a, &b, &mut host_sum);
            cpu_secs += t.elapsed().as_secs_f64();
        }
        verify(&device_sum, &host_sum)?;

        let row = BenchRow {
            size,
            ocl_secs: ocl_secs / config.repetitions as f64,
            cpu_secs: cpu_secs / config.repetitions as f64,
        };
        debug!("{size} elements verified");
        writeln!(out, "{row}")?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_grow_by_half_and_stop_below_limit() {
        let s = sizes(DEFAULT_START, DEFAULT_LIMIT);
        assert_eq!(&s[..4], &[1000, 1500, 2250, 3375]);
        assert!(s.iter().all(|&n| n < DEFAULT_LIMIT));
        assert!(s.last().unwrap() * 3 / 2 >= DEFAULT_LIMIT);
    }

    #[test]
    fn sizes_terminate_for_tiny_start() {
        assert_eq!(sizes(1, 100), vec![1]);
        assert!(sizes(0, 100).len() <= 1);
    }

    #[test]
    fn row_has_five_tab_separated_columns() {
        let row = BenchRow {
            size: 1000,
            ocl_secs: 0.001,
            cpu_secs: 0.002,
        };
        let line = row.to_string();
        let cols: Vec<&str> = line.split('\t').filter(|c| !c.is_empty()).collect();
        assert_eq!(cols.len(), 5);
        assert_eq!(cols[0], "1000");
        assert_eq!(cols[3], "4.000");
        assert_eq!(cols[4], "2.000");
    }
}
