//! Prometheus metrics for workflow runs

use std::time::Duration;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Handle to the installed Prometheus recorder
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: PrometheusHandle,
}

impl PrometheusMetrics {
    /// Metrics in the Prometheus text exposition format
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Install a global Prometheus recorder.
///
/// Returns `None` if a recorder is already installed.
pub fn init_metrics() -> Option<PrometheusMetrics> {
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("workflow_engine_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
            tracing::debug!("Prometheus recorder installed");
            Some(PrometheusMetrics { handle })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

fn status_label(success: bool) -> &'static str {
    if success { "success" } else { "error" }
}

/// Record a finished workflow run
pub fn record_execution(success: bool, duration: Duration) {
    let labels = [("status", status_label(success).to_string())];

    counter!("workflow_executions_total", &labels).increment(1);
    histogram!("workflow_execution_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record one node's run
pub fn record_node(node_type: &str, success: bool, duration: Duration) {
    let labels = [
        ("node_type", node_type.to_string()),
        ("status", status_label(success).to_string()),
    ];

    counter!("workflow_node_executions_total", &labels).increment(1);
    histogram!("workflow_node_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record a structural validation error by code
pub fn record_validation_failure(code: &str) {
    counter!("workflow_validation_failures_total", "code" => code.to_string()).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_label() {
        assert_eq!(status_label(true), "success");
        assert_eq!(status_label(false), "error");
    }

    #[test]
    fn test_recorded_metrics_render() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        metrics::with_local_recorder(&recorder, || {
            record_execution(true, Duration::from_millis(20));
            record_node("llmEngine", false, Duration::from_millis(5));
            record_validation_failure("CYCLE_DETECTED");
        });

        let rendered = handle.render();
        assert!(rendered.contains("workflow_executions_total{status=\"success\"} 1"));
        assert!(rendered.contains(
            "workflow_node_executions_total{node_type=\"llmEngine\",status=\"error\"} 1"
        ));
        assert!(rendered.contains("workflow_validation_failures_total{code=\"CYCLE_DETECTED\"} 1"));
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_execution(false, Duration::from_millis(1));
        record_node("output", true, Duration::ZERO);
    }
}
