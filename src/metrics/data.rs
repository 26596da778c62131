//! Data access metrics: cache behaviour and provider calls

use crate::metrics::{area_metric, AreaMetrics, MetricDoc, MetricType};

pub struct DataMetrics;

impl DataMetrics {
    pub fn record_cache_hit(_key: &str) {
        ::metrics::counter!(area_metric!(counter, "data", "cache_hits")).increment(1);
    }

    pub fn record_cache_miss(_key: &str) {
        ::metrics::counter!(area_metric!(counter, "data", "cache_misses")).increment(1);
    }

    pub fn record_provider_call(_provider: &str, duration_secs: f64) {
        ::metrics::counter!(area_metric!(counter, "data", "provider_calls")).increment(1);
        ::metrics::histogram!(area_metric!(histogram, "data", "provider_duration_seconds"))
            .record(duration_secs);
    }

    pub fn record_provider_error(_provider: &str, _operation: &str) {
        ::metrics::counter!(area_metric!(counter, "data", "provider_errors")).increment(1);
    }

    pub fn record_message_sent() {
        ::metrics::counter!(area_metric!(counter, "data", "messages_sent")).increment(1);
    }
}

impl AreaMetrics for DataMetrics {
    fn register_metrics() {
        let _ = ::metrics::counter!(area_metric!(counter, "data", "cache_hits"));
        let _ = ::metrics::counter!(area_metric!(counter, "data", "cache_misses"));
        let _ = ::metrics::counter!(area_metric!(counter, "data", "provider_calls"));
        let _ = ::metrics::counter!(area_metric!(counter, "data", "provider_errors"));
        let _ = ::metrics::counter!(area_metric!(counter, "data", "messages_sent"));
        let _ = ::metrics::histogram!(area_metric!(histogram, "data", "provider_duration_seconds"));
    }

    fn area_name() -> &'static str {
        "data"
    }

    fn metrics_documentation() -> Vec<MetricDoc> {
        vec![
            MetricDoc {
                name: area_metric!(counter, "data", "cache_hits"),
                metric_type: MetricType::Counter,
                help: "Reads served from the data service cache",
            },
            MetricDoc {
                name: area_metric!(counter, "data", "cache_misses"),
                metric_type: MetricType::Counter,
                help: "Reads that had to go to the provider",
            },
            MetricDoc {
                name: area_metric!(counter, "data", "provider_calls"),
                metric_type: MetricType::Counter,
                help: "Calls made to the data provider",
            },
            MetricDoc {
                name: area_metric!(counter, "data", "provider_errors"),
                metric_type: MetricType::Counter,
                help: "Provider calls that failed and fell back",
            },
            MetricDoc {
                name: area_metric!(counter, "data", "messages_sent"),
                metric_type: MetricType::Counter,
                help: "Chat messages persisted",
            },
            MetricDoc {
                name: area_metric!(histogram, "data", "provider_duration_seconds"),
                metric_type: MetricType::Histogram,
                help: "Provider call latency",
            },
        ]
    }
}
