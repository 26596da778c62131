//! Registers every area's metrics and catches name clashes early.

use crate::metrics::{AreaMetrics, MetricDoc};
use std::collections::HashMap;
use tracing::{debug, info, warn};

pub fn register_all_metrics() {
    let mut all_metrics = HashMap::new();

    register_area_metrics::<super::search::SearchMetrics>(&mut all_metrics);
    register_area_metrics::<super::data::DataMetrics>(&mut all_metrics);

    info!("Registered {} metrics", all_metrics.len());
}

fn register_area_metrics<T: AreaMetrics>(all_metrics: &mut HashMap<&'static str, MetricDoc>) {
    T::register_metrics();
    let area = T::area_name();

    for doc in T::metrics_documentation() {
        if area_of(doc.name) != area {
            warn!("Metric '{}' is registered by area '{}' but named for another", doc.name, area);
        }
        if all_metrics.contains_key(doc.name) {
            warn!("Metric name conflict: '{}' registered again by area '{}'", doc.name, area);
        } else {
            debug!("{} ({:?}): {}", doc.name, doc.metric_type, doc.help);
            all_metrics.insert(doc.name, doc);
        }
    }
}

/// Area encoded in a metric name ("motoswap_data_cache_hits_total" -> "data")
fn area_of(metric_name: &str) -> &str {
    metric_name
        .strip_prefix("motoswap_")
        .and_then(|rest| rest.split('_').next())
        .unwrap_or("unknown")
}
