//! Request statistics for the `/health` endpoint.
//!
//! Tracks how disk statistics requests were answered and how long the
//! external command took. Nothing here feeds back into extraction.

use std::collections::VecDeque;
use std::fmt::Write as FmtWrite;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Running statistics for a single metric.
#[derive(Clone, Copy, Default)]
pub struct RunningStat {
    count: u64,
    sum: f64,
    min: f64,
    max: f64,
    last: f64,
}

impl RunningStat {
    pub fn add(&mut self, value: f64) {
        if self.count == 0 {
            self.min = value;
            self.max = value;
            self.last = value;
            self.sum = value;
            self.count = 1;
            return;
        }
        self.count += 1;
        self.sum += value;
        self.last = value;
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    pub fn avg(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / (self.count as f64)
        }
    }
}

/// Thread-safe wrapper for running statistics.
#[derive(Default)]
pub struct Stat {
    inner: Mutex<RunningStat>,
}

impl Stat {
    pub fn add_sample(&self, value: f64) {
        if let Ok(mut s) = self.inner.lock() {
            s.add(value);
        }
    }

    /// Returns (last, avg, max, min, count).
    pub fn snapshot(&self) -> (f64, f64, f64, f64, u64) {
        if let Ok(s) = self.inner.lock() {
            (s.last, s.avg(), s.max, s.min, s.count)
        } else {
            (0.0, 0.0, 0.0, 0.0, 0)
        }
    }
}

/// Thread-safe circular buffer for tracking HTTP request timestamps.
pub struct RequestTimestamps {
    inner: Mutex<VecDeque<Instant>>,
}

impl Default for RequestTimestamps {
    fn default() -> Self {
        Self {
            inner: Mutex::new(VecDeque::with_capacity(1024)),
        }
    }
}

impl RequestTimestamps {
    pub fn record(&self) {
        if let Ok(mut guard) = self.inner.lock() {
            let now = Instant::now();
            guard.push_back(now);
            // Keep only last 10 minutes of timestamps to avoid unbounded growth
            if let Some(cutoff) = now.checked_sub(Duration::from_secs(600)) {
                while guard.front().is_some_and(|&t| t < cutoff) {
                    guard.pop_front();
                }
            }
        }
    }

    pub fn count_last_minute(&self) -> u64 {
        if let Ok(guard) = self.inner.lock() {
            match Instant::now().checked_sub(Duration::from_secs(60)) {
                Some(cutoff) => guard.iter().filter(|&&t| t >= cutoff).count() as u64,
                None => guard.len() as u64,
            }
        } else {
            0
        }
    }
}

/// Outcome of a `/{hostname}/diskstats` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Success,
    InvalidHostname,
    NoStatsFound,
    CommandFailure,
}

/// Counters and timings shared by all handlers.
pub struct RequestStats {
    pub http_request_timestamps: RequestTimestamps,
    pub http_requests_total: AtomicU64,

    // Disk statistics outcomes
    pub diskstats_success: AtomicU64,
    pub invalid_hostname: AtomicU64,
    pub no_stats_found: AtomicU64,
    pub command_failures: AtomicU64,

    /// Wall time of the blocking extraction per request.
    pub extraction_duration_ms: Stat,

    pub start_time: Instant,
}

impl Default for RequestStats {
    fn default() -> Self {
        Self {
            http_request_timestamps: RequestTimestamps::default(),
            http_requests_total: AtomicU64::new(0),
            diskstats_success: AtomicU64::new(0),
            invalid_hostname: AtomicU64::new(0),
            no_stats_found: AtomicU64::new(0),
            command_failures: AtomicU64::new(0),
            extraction_duration_ms: Stat::default(),
            start_time: Instant::now(),
        }
    }
}

impl RequestStats {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn record_http_request(&self) {
        self.http_request_timestamps.record();
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_outcome(&self, outcome: RequestOutcome) {
        let counter = match outcome {
            RequestOutcome::Success => &self.diskstats_success,
            RequestOutcome::InvalidHostname => &self.invalid_hostname,
            RequestOutcome::NoStatsFound => &self.no_stats_found,
            RequestOutcome::CommandFailure => &self.command_failures,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_extraction_duration_ms(&self, duration_ms: f64) {
        self.extraction_duration_ms.add_sample(duration_ms);
    }

    /// Share of diskstats requests answered with data, in percent.
    pub fn get_success_rate(&self) -> f64 {
        let success = self.diskstats_success.load(Ordering::Relaxed);
        let total = success
            + self.invalid_hostname.load(Ordering::Relaxed)
            + self.no_stats_found.load(Ordering::Relaxed)
            + self.command_failures.load(Ordering::Relaxed);
        if total == 0 {
            100.0
        } else {
            (success as f64 / total as f64) * 100.0
        }
    }

    pub fn get_uptime_hours(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() / 3600.0
    }

    pub fn get_uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    pub fn render_table(&self) -> String {
        let left_col = 26usize;
        let col_w = 12usize;

        let (ed_cur, ed_avg, ed_max, ed_min, ed_count) = self.extraction_duration_ms.snapshot();

        let mut out = String::new();

        writeln!(out, "HEALTH ENDPOINT - REQUEST STATS").ok();
        writeln!(out, "===============================").ok();
        writeln!(out).ok();

        writeln!(
            out,
            "{:left$} | {:^col$} | {:^col$} | {:^col$} | {:^col$}",
            "",
            "current",
            "average",
            "max",
            "min",
            left = left_col,
            col = col_w
        )
        .ok();

        writeln!(out).ok();
        writeln!(out, "EXTRACTION").ok();
        writeln!(out, "----------").ok();

        writeln!(
            out,
            "{:left$} | {:^col$} | {:^col$} | {:^col$} | {:^col$}",
            "extraction_duration (ms)",
            format!("{:.1}", ed_cur),
            format!("{:.1}", ed_avg),
            format!("{:.1}", ed_max),
            format!("{:.1}", ed_min),
            left = left_col,
            col = col_w
        )
        .ok();

        writeln!(
            out,
            "{:left$} | {:^col$} | {:^col$} | {:^col$} | {:^col$}",
            "success_rate (%)",
            format!("{:.1}", self.get_success_rate()),
            "N/A",
            "N/A",
            "N/A",
            left = left_col,
            col = col_w
        )
        .ok();

        writeln!(out).ok();
        writeln!(out, "OUTCOMES").ok();
        writeln!(out, "--------").ok();

        for (name, counter) in [
            ("ok", &self.diskstats_success),
            ("invalid_hostname", &self.invalid_hostname),
            ("no_stats_found", &self.no_stats_found),
            ("command_failures", &self.command_failures),
        ] {
            writeln!(
                out,
                "{:left$} | {:^col$}",
                name,
                counter.load(Ordering::Relaxed),
                left = left_col,
                col = col_w
            )
            .ok();
        }

        writeln!(out).ok();
        writeln!(out, "HTTP SERVER").ok();
        writeln!(out, "-----------").ok();

        writeln!(
            out,
            "{:left$} | {:^col$}",
            "http_requests_last_minute",
            self.http_request_timestamps.count_last_minute(),
            left = left_col,
            col = col_w
        )
        .ok();

        writeln!(out).ok();
        writeln!(
            out,
            "number of extractions: {} | total requests: {} | uptime: {:.1}h",
            ed_count,
            self.http_requests_total.load(Ordering::Relaxed),
            self.get_uptime_hours()
        )
        .ok();

        out
    }
}
