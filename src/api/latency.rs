//! Per-upstream request latency histograms.
//! The NASA client records every call, /health reports the percentiles.

use std::collections::BTreeMap;
use std::time::Duration;

use dashmap::DashMap;
use hdrhistogram::Histogram;
use serde::Serialize;

use crate::types::Upstream;

/// Tracks 1us to 100s, 3 significant figures. Values stored in microseconds.
fn new_histogram() -> Histogram<u64> {
    Histogram::new_with_bounds(1, 100_000_000, 3).expect("valid histogram bounds")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatencySummary {
    pub samples: u64,
    pub p50_ms: f64,
    pub p95_ms: f64,
    pub p99_ms: f64,
}

#[derive(Default)]
pub struct UpstreamLatency {
    by_api: DashMap<Upstream, Histogram<u64>>,
}

impl UpstreamLatency {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, api: Upstream, elapsed: Duration) {
        let us = elapsed.as_micros().clamp(1, 100_000_000) as u64;
        let mut h = self.by_api.entry(api).or_insert_with(new_histogram);
        let _ = h.record(us);
    }

    /// Percentiles per upstream that has seen at least one request.
    pub fn summary(&self) -> BTreeMap<String, LatencySummary> {
        self.by_api
            .iter()
            .filter(|e| e.value().len() > 0)
            .map(|e| {
                let h = e.value();
                let ms = |q: f64| h.value_at_quantile(q) as f64 / 1000.0;
                (
                    e.key().to_string(),
                    LatencySummary {
                        samples: h.len(),
                        p50_ms: ms(0.5),
                        p95_ms: ms(0.95),
                        p99_ms: ms(0.99),
                    },
                )
            })
            .collect()
    }
}
