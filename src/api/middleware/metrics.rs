//! Request metrics, exported in Prometheus format.

use std::sync::Arc;
use std::time::Instant;

use axum::http::Method;
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

use super::Middleware;
use crate::api::httpkit::{BoxHandler, HttpRequest, Outcome};
use crate::config::{
    LATENCY_BUCKETS_MS, METRIC_HTTP_LATENCY_MS, METRIC_HTTP_REQUESTS, METRIC_HTTP_RESPONSE_SIZE,
    RESPONSE_SIZE_BUCKETS,
};

/// Install the process-wide Prometheus recorder with the request histograms'
/// buckets.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    exporter()?.install_recorder()
}

fn exporter() -> Result<PrometheusBuilder, BuildError> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(METRIC_HTTP_LATENCY_MS.to_string()),
            LATENCY_BUCKETS_MS,
        )?
        .set_buckets_for_metric(
            Matcher::Full(METRIC_HTTP_RESPONSE_SIZE.to_string()),
            RESPONSE_SIZE_BUCKETS,
        )
}

/// Counts requests and records latency and response size.
///
/// Without an installed recorder the macros are no-ops.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestMetrics;

impl Middleware for RequestMetrics {
    fn wrap(&self, method: &Method, pattern: &str, next: BoxHandler) -> BoxHandler {
        let method = method.to_string();
        let pattern = pattern.to_string();

        Arc::new(move |req: HttpRequest| {
            let next = next.clone();
            let method = method.clone();
            let pattern = pattern.clone();

            async move {
                let start = Instant::now();
                let result = next.serve(req).await;
                let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

                let outcome = Outcome::of(&result);
                let code = outcome.status.as_u16().to_string();

                ::metrics::counter!(
                    METRIC_HTTP_REQUESTS,
                    "method" => method.clone(),
                    "pattern" => pattern.clone(),
                    "code" => code.clone()
                )
                .increment(1);
                ::metrics::histogram!(
                    METRIC_HTTP_LATENCY_MS,
                    "method" => method.clone(),
                    "pattern" => pattern.clone(),
                    "code" => code
                )
                .record(latency_ms);
                ::metrics::histogram!(
                    METRIC_HTTP_RESPONSE_SIZE,
                    "method" => method,
                    "pattern" => pattern
                )
                .record(outcome.bytes_written as f64);

                result
            }
        })
    }
}
