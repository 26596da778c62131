//! Metrics for the MotoSwap application layer
//!
//! Each area (search, data access) owns its metric names in a dedicated
//! submodule. Recording is always safe: without an installed recorder the
//! `metrics` macros are no-ops.

pub mod data;
pub mod registry;
pub mod search;

pub use data::DataMetrics;
pub use search::SearchMetrics;

use std::net::SocketAddr;
use std::sync::Once;
use tracing::{info, warn};

static INIT: Once = Once::new();

/// Install the Prometheus exporter on `addr` and register every area's metrics.
///
/// Idempotent. An unparsable address is logged and skipped.
pub fn init_metrics(addr: &str) {
    INIT.call_once(|| {
        let addr: SocketAddr = match addr.parse() {
            Ok(addr) => addr,
            Err(e) => {
                warn!("Invalid metrics addr '{}': {}, metrics exporter disabled", addr, e);
                return;
            }
        };

        let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
        match builder.install() {
            Ok(()) => {
                info!("Prometheus exporter listening on http://{}/metrics", addr);
                registry::register_all_metrics();
            }
            Err(e) => {
                warn!("Failed to install Prometheus exporter: {}", e);
            }
        }
    });
}

/// Trait for area-specific metrics collections
pub trait AreaMetrics {
    /// Pre-register metrics so they show up before first use
    fn register_metrics();

    fn area_name() -> &'static str;

    fn metrics_documentation() -> Vec<MetricDoc>;
}

/// Documentation for a single metric
#[derive(Debug, Clone)]
pub struct MetricDoc {
    pub name: &'static str,
    pub metric_type: MetricType,
    pub help: &'static str,
}

#[derive(Debug, Clone)]
pub enum MetricType {
    Counter,
    Histogram,
}

/// Metric names follow motoswap_{area}_{name}[_total]
macro_rules! area_metric {
    (counter, $area:literal, $name:literal) => {
        concat!("motoswap_", $area, "_", $name, "_total")
    };
    (histogram, $area:literal, $name:literal) => {
        concat!("motoswap_", $area, "_", $name)
    };
}

pub(crate) use area_metric;
