//! Listing search metrics

use crate::metrics::{area_metric, AreaMetrics, MetricDoc, MetricType};

pub struct SearchMetrics;

impl SearchMetrics {
    /// Record one filter pass over `input` listings keeping `retained`.
    pub fn record_filter(input: usize, retained: usize, duration_secs: f64) {
        ::metrics::counter!(area_metric!(counter, "search", "filters")).increment(1);
        ::metrics::histogram!(area_metric!(histogram, "search", "input_listings"))
            .record(input as f64);
        ::metrics::histogram!(area_metric!(histogram, "search", "retained_listings"))
            .record(retained as f64);
        ::metrics::histogram!(area_metric!(histogram, "search", "duration_seconds"))
            .record(duration_secs);
    }

    pub fn record_compatibility_lookup() {
        ::metrics::counter!(area_metric!(counter, "search", "compatibility_lookups"))
            .increment(1);
    }
}

impl AreaMetrics for SearchMetrics {
    fn register_metrics() {
        let _ = ::metrics::counter!(area_metric!(counter, "search", "filters"));
        let _ = ::metrics::counter!(area_metric!(counter, "search", "compatibility_lookups"));
        let _ = ::metrics::histogram!(area_metric!(histogram, "search", "input_listings"));
        let _ = ::metrics::histogram!(area_metric!(histogram, "search", "retained_listings"));
        let _ = ::metrics::histogram!(area_metric!(histogram, "search", "duration_seconds"));
    }

    fn area_name() -> &'static str {
        "search"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: area_metric!(counter, "search", "filters"),
                metric_type: MetricType::Counter,
                help: "Listing filter passes",
            },
            MetricDoc {
                name: area_metric!(counter, "search", "compatibility_lookups"),
                metric_type: MetricType::Counter,
                help: "Compatible category lookups",
            },
            MetricDoc {
                name: area_metric!(histogram, "search", "input_listings"),
                metric_type: MetricType::Histogram,
                help: "Listings fed into a filter pass",
            },
            MetricDoc {
                name: area_metric!(histogram, "search", "retained_listings"),
                metric_type: MetricType::Histogram,
                help: "Listings kept by a filter pass",
            },
            MetricDoc {
                name: area_metric!(histogram, "search", "duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Time spent filtering listings",
            },
        ]
    }
}
