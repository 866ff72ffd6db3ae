//! Observability infrastructure - metrics

mod metrics;

pub use self::metrics::{
    init_metrics, record_execution, record_node, record_validation_failure, PrometheusMetrics,
};
