//! Process-wide metric registry and text exposition rendering.
//!
//! # Responsibilities
//! - Own counter and histogram series keyed by canonical label sets,
//!   plus the single `active_users_total` gauge
//! - Lazily create series on first increment / observation
//! - Render everything as a line-oriented text payload for scraping
//!
//! # Design Decisions
//! - Series tables live behind `std::sync::Mutex` with short, non-async
//!   critical sections; the runtime is multi-threaded, so every mutation
//!   must be protected
//! - Poisoned locks are recovered with `into_inner` so recording stays
//!   available after a panic elsewhere
//! - Render iterates series in first-touch order, making output
//!   deterministic for a given call sequence
//! - Labels render as `{key:value,...}` rather than the standard
//!   `{key="value",...}` pairing, and histogram bucket lines carry `le` in
//!   its own brace group ahead of the series labels. Both are kept
//!   deliberately; reconsider before pointing a standards-strict scraper
//!   at this endpoint.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::metrics::labels::LabelSet;

/// Histogram bucket thresholds in seconds, with their rendered form.
const DURATION_BUCKETS: [(f64, &str); 6] = [
    (0.1, "0.1"),
    (0.5, "0.5"),
    (1.0, "1.0"),
    (2.5, "2.5"),
    (5.0, "5.0"),
    (10.0, "10.0"),
];

/// Identifies one series: metric name plus canonical label key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SeriesId {
    name: String,
    labels: String,
}

/// Series storage preserving first-touch order for rendering.
struct SeriesTable<T> {
    rows: HashMap<SeriesId, T>,
    order: Vec<SeriesId>,
}

impl<T> SeriesTable<T> {
    fn new() -> Self {
        Self {
            rows: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn get_or_insert_with(&mut self, id: SeriesId, init: impl FnOnce() -> T) -> &mut T {
        match self.rows.entry(id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.order.push(entry.key().clone());
                entry.insert(init())
            }
        }
    }

    fn iter_in_order(&self) -> impl Iterator<Item = (&SeriesId, &T)> {
        self.order.iter().map(move |id| (id, &self.rows[id]))
    }
}

/// One histogram series: raw observations plus a running sum.
///
/// Bucket counts are computed at render time from the raw samples; the
/// sample count doubles as `_count`.
struct HistogramSeries {
    samples: Vec<f64>,
    sum: f64,
}

impl HistogramSeries {
    fn new() -> Self {
        Self {
            samples: Vec::new(),
            sum: 0.0,
        }
    }
}

/// In-memory metric registry.
///
/// One instance per process, constructed explicitly and shared via `Arc`
/// between the instrumentation middleware and the scrape handlers. State
/// is never persisted or reset; a restart starts empty.
pub struct MetricsRegistry {
    counters: Mutex<SeriesTable<u64>>,
    histograms: Mutex<SeriesTable<HistogramSeries>>,
    active_users: Mutex<f64>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self {
            counters: Mutex::new(SeriesTable::new()),
            histograms: Mutex::new(SeriesTable::new()),
            active_users: Mutex::new(0.0),
        }
    }

    /// Increment the counter series for `(name, labels)` by one, creating
    /// it at zero first if this is the first touch. Infallible.
    pub fn increment_counter(&self, name: &str, labels: &LabelSet) {
        let id = SeriesId {
            name: name.to_string(),
            labels: labels.canonical_key(),
        };
        let mut counters = lock_or_recover(&self.counters);
        *counters.get_or_insert_with(id, || 0) += 1;
    }

    /// Append one observation (elapsed seconds) to the histogram series
    /// for `(name, labels)`, creating it if needed.
    ///
    /// The value is stored as-is; negative or non-finite values are not
    /// rejected.
    pub fn observe_histogram(&self, name: &str, labels: &LabelSet, value: f64) {
        let id = SeriesId {
            name: name.to_string(),
            labels: labels.canonical_key(),
        };
        let mut histograms = lock_or_recover(&self.histograms);
        let series = histograms.get_or_insert_with(id, HistogramSeries::new);
        series.samples.push(value);
        series.sum += value;
    }

    /// Set the `active_users_total` gauge to an absolute value.
    pub fn set_gauge(&self, value: f64) {
        *lock_or_recover(&self.active_users) = value;
    }

    /// Raise the gauge by `delta`.
    pub fn inc_gauge(&self, delta: f64) {
        *lock_or_recover(&self.active_users) += delta;
    }

    /// Lower the gauge by `delta`, clamping at zero.
    pub fn dec_gauge(&self, delta: f64) {
        let mut gauge = lock_or_recover(&self.active_users);
        *gauge = (*gauge - delta).max(0.0);
    }

    /// Render every series as a text exposition payload.
    ///
    /// Counters come first in first-touch order, then histograms, then the
    /// gauge (always present, even on a fresh registry). HELP and TYPE
    /// comment lines are emitted per series, not per metric family.
    pub fn render(&self) -> String {
        let mut lines: Vec<String> = Vec::new();

        {
            let counters = lock_or_recover(&self.counters);
            for (id, value) in counters.iter_in_order() {
                lines.push(format!("# HELP {} {}", id.name, help_text(&id.name)));
                lines.push(format!("# TYPE {} counter", id.name));
                lines.push(format!("{}{} {}", id.name, label_group(&id.labels), value));
            }
        }

        {
            let histograms = lock_or_recover(&self.histograms);
            for (id, series) in histograms.iter_in_order() {
                if series.samples.is_empty() {
                    continue;
                }
                let labels = label_group(&id.labels);
                let count = series.samples.len();

                lines.push(format!("# HELP {} {}", id.name, help_text(&id.name)));
                lines.push(format!("# TYPE {} histogram", id.name));
                lines.push(format!("{}_sum{} {}", id.name, labels, series.sum));
                lines.push(format!("{}_count{} {}", id.name, labels, count));
                for (threshold, rendered) in DURATION_BUCKETS {
                    let below = series.samples.iter().filter(|v| **v <= threshold).count();
                    lines.push(format!(
                        "{}_bucket{{le=\"{}\"}}{} {}",
                        id.name, rendered, labels, below
                    ));
                }
                lines.push(format!("{}_bucket{{le=\"+Inf\"}}{} {}", id.name, labels, count));
            }
        }

        let active = *lock_or_recover(&self.active_users);
        lines.push(format!(
            "# HELP active_users_total {}",
            help_text("active_users_total")
        ));
        lines.push("# TYPE active_users_total gauge".to_string());
        lines.push(format!("active_users_total {}", active));

        lines.join("\n") + "\n"
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Lock a mutex, recovering the inner state if a previous holder panicked.
fn lock_or_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Render a canonical label key as a brace-enclosed group, or nothing for
/// a series without labels.
fn label_group(canonical: &str) -> String {
    if canonical.is_empty() {
        String::new()
    } else {
        format!("{{{}}}", canonical)
    }
}

fn help_text(name: &str) -> &'static str {
    match name {
        "http_requests_total" => "Total number of HTTP requests",
        "http_request_duration_seconds" => "Duration of HTTP requests in seconds",
        "active_users_total" => "Number of active users",
        _ => "application metric",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_labels(route: &str) -> LabelSet {
        LabelSet::new()
            .with("method", "GET")
            .with("route", route)
            .with("status_code", "200")
    }

    #[test]
    fn label_permutations_hit_the_same_series() {
        let registry = MetricsRegistry::new();
        let a = LabelSet::new()
            .with("method", "GET")
            .with("route", "/x")
            .with("status_code", "200");
        let b = LabelSet::new()
            .with("status_code", "200")
            .with("method", "GET")
            .with("route", "/x");

        registry.increment_counter("http_requests_total", &a);
        registry.increment_counter("http_requests_total", &b);

        let text = registry.render();
        assert!(
            text.contains("http_requests_total{method:GET,route:/x,status_code:200} 2"),
            "expected one series at 2, got:\n{text}"
        );
    }

    #[test]
    fn counter_renders_exact_value() {
        let registry = MetricsRegistry::new();
        for _ in 0..5 {
            registry.increment_counter("http_requests_total", &request_labels("/x"));
        }
        let text = registry.render();
        assert!(text.contains("http_requests_total{method:GET,route:/x,status_code:200} 5"));
        assert!(text.contains("# TYPE http_requests_total counter"));
    }

    #[test]
    fn bucket_counts_are_cumulative() {
        let registry = MetricsRegistry::new();
        let labels = LabelSet::new().with("method", "GET").with("route", "/x");
        for value in [0.05, 0.3, 0.3, 0.7, 3.0, 20.0] {
            registry.observe_histogram("http_request_duration_seconds", &labels, value);
        }

        let text = registry.render();
        let bucket = |le: &str| -> usize {
            let needle = format!(
                "http_request_duration_seconds_bucket{{le=\"{le}\"}}{{method:GET,route:/x}} "
            );
            let line = text
                .lines()
                .find(|l| l.starts_with(&needle))
                .unwrap_or_else(|| panic!("no bucket line for le={le} in:\n{text}"));
            line.rsplit(' ').next().unwrap().parse().unwrap()
        };

        let counts = [
            bucket("0.1"),
            bucket("0.5"),
            bucket("1.0"),
            bucket("2.5"),
            bucket("5.0"),
            bucket("10.0"),
            bucket("+Inf"),
        ];
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(counts[0], 1);
        assert_eq!(counts[6], 6);
        assert!(text.contains("http_request_duration_seconds_count{method:GET,route:/x} 6"));
    }

    #[test]
    fn gauge_never_goes_negative() {
        let registry = MetricsRegistry::new();
        registry.set_gauge(2.0);
        registry.dec_gauge(5.0);
        assert!(registry.render().contains("active_users_total 0"));
    }

    #[test]
    fn gauge_set_inc_dec() {
        let registry = MetricsRegistry::new();
        registry.inc_gauge(1.0);
        registry.inc_gauge(1.0);
        registry.dec_gauge(1.0);
        assert!(registry.render().contains("active_users_total 1"));
        registry.set_gauge(7.0);
        assert!(registry.render().contains("active_users_total 7"));
    }

    #[test]
    fn fresh_registry_renders_only_the_gauge() {
        let registry = MetricsRegistry::new();
        let text = registry.render();
        assert!(text.contains("# HELP active_users_total Number of active users"));
        assert!(text.contains("# TYPE active_users_total gauge"));
        assert!(text.contains("active_users_total 0"));
        assert!(!text.contains("http_requests_total"));
        assert!(!text.contains("http_request_duration_seconds"));
    }

    #[test]
    fn request_series_end_to_end() {
        let registry = MetricsRegistry::new();
        let counter_labels = request_labels("/api/apps");
        let duration_labels = LabelSet::new().with("method", "GET").with("route", "/api/apps");

        for _ in 0..3 {
            registry.increment_counter("http_requests_total", &counter_labels);
        }
        registry.observe_histogram("http_request_duration_seconds", &duration_labels, 0.05);

        let text = registry.render();
        assert!(
            text.contains("http_requests_total{method:GET,route:/api/apps,status_code:200} 3")
        );
        assert!(text.contains(
            "http_request_duration_seconds_bucket{le=\"0.1\"}{method:GET,route:/api/apps} 1"
        ));
        assert!(text.contains("http_request_duration_seconds_sum{method:GET,route:/api/apps} 0.05"));
        assert!(
            text.contains("http_request_duration_seconds_count{method:GET,route:/api/apps} 1")
        );
    }

    #[test]
    fn render_is_stable_across_calls() {
        let registry = MetricsRegistry::new();
        registry.increment_counter("http_requests_total", &request_labels("/a"));
        registry.increment_counter("http_requests_total", &request_labels("/b"));
        assert_eq!(registry.render(), registry.render());

        // First-touch order, not alphabetical.
        let text = registry.render();
        let a = text.find("route:/a").unwrap();
        let b = text.find("route:/b").unwrap();
        assert!(a < b);
    }
}
