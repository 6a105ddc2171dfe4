use crate::utils::metrics::{Method, Metrics, Status};
use anyhow::{Context as _, Result};
use opentelemetry::{
    Context, KeyValue, global,
    trace::{Span, SpanKind, TraceContextExt, Tracer},
};
use opentelemetry_otlp::{LogExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{Resource, logs::SdkLoggerProvider, trace::SdkTracerProvider};
use tokio::time::Instant;
use tracing::{error, info};

pub struct Telemetry {
    service_name: String,
    otel_endpoint: String,
    tracer_provider: Option<SdkTracerProvider>,
    logger_provider: Option<SdkLoggerProvider>,
}

impl Telemetry {
    pub fn new(service_name: impl Into<String>, otel_endpoint: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            otel_endpoint: otel_endpoint.into(),
            tracer_provider: None,
            logger_provider: None,
        }
    }

    fn resource(&self) -> Resource {
        Resource::builder()
            .with_service_name(self.service_name.clone())
            .build()
    }

    pub fn init_tracer(&mut self) -> Result<()> {
        let exporter = SpanExporter::builder()
            .with_tonic()
            .with_endpoint(self.otel_endpoint.clone())
            .build()
            .context("Failed to create span exporter")?;

        let provider = SdkTracerProvider::builder()
            .with_resource(self.resource())
            .with_batch_exporter(exporter)
            .build();

        global::set_tracer_provider(provider.clone());
        self.tracer_provider = Some(provider);

        Ok(())
    }

    pub fn init_logger(&mut self) -> Result<SdkLoggerProvider> {
        let exporter = LogExporter::builder()
            .with_tonic()
            .with_endpoint(self.otel_endpoint.clone())
            .build()
            .context("Failed to create log exporter")?;

        let provider = SdkLoggerProvider::builder()
            .with_resource(self.resource())
            .with_batch_exporter(exporter)
            .build();

        self.logger_provider = Some(provider.clone());

        Ok(provider)
    }

    pub fn shutdown(self) -> Result<()> {
        let mut errors = Vec::new();

        if let Some(tracer) = self.tracer_provider
            && let Err(e) = tracer.shutdown()
        {
            errors.push(format!("tracer provider: {e}"));
        }
        if let Some(logger) = self.logger_provider
            && let Err(e) = logger.shutdown()
        {
            errors.push(format!("logger provider: {e}"));
        }

        if !errors.is_empty() {
            anyhow::bail!("Failed to shutdown providers:\n{}", errors.join("\n"));
        }

        Ok(())
    }
}

/// An open span plus the instant it started, closed through [`TracingContext::complete`].
pub struct TracingContext {
    pub cx: Context,
    pub start_time: Instant,
}

impl TracingContext {
    pub fn start(
        tracer_name: &'static str,
        operation_name: &str,
        attributes: Vec<KeyValue>,
    ) -> Self {
        let start_time = Instant::now();
        let tracer = global::tracer(tracer_name);
        let mut span = tracer
            .span_builder(operation_name.to_string())
            .with_kind(SpanKind::Server)
            .with_attributes(attributes)
            .start(&tracer);

        info!("Starting operation: {operation_name}");

        span.add_event(
            "Operation started",
            vec![KeyValue::new("operation", operation_name.to_string())],
        );

        let cx = Context::current_with_span(span);
        Self { cx, start_time }
    }

    pub fn complete(&self, metrics: &Metrics, method: Method, is_success: bool, message: &str) {
        let status_str = if is_success { "SUCCESS" } else { "ERROR" };
        let status = if is_success {
            Status::Success
        } else {
            Status::Error
        };
        let elapsed = self.start_time.elapsed().as_secs_f64();

        self.cx.span().add_event(
            "Operation completed",
            vec![
                KeyValue::new("status", status_str),
                KeyValue::new("duration_secs", elapsed.to_string()),
                KeyValue::new("message", message.to_string()),
            ],
        );

        if is_success {
            info!("✅ Operation completed successfully: {message}");
        } else {
            error!("❌ Operation failed: {message}");
        }

        metrics.record(method, status, elapsed);

        self.cx.span().end();
    }
}
