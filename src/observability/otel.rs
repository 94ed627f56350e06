//! OpenTelemetry trace export and W3C trace-context propagation.
//!
//! Spans produced through `tracing` are bridged into an OpenTelemetry tracer.
//! Inbound `traceparent` headers become the parent of the request span, and
//! every outbound hop carries the current span's context onward.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use opentelemetry::propagation::{Extractor, Injector};
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::{global, Context};
use opentelemetry_otlp::{ExporterBuildError, SpanExporter, WithExportConfig};
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::trace::SdkTracerProvider;
use opentelemetry_sdk::Resource;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// OTLP/HTTP traces path appended to the collector base URL.
const TRACES_PATH: &str = "/v1/traces";

/// Resolve the traces URL from a collector base endpoint.
///
/// Matches how OTLP/HTTP SDKs treat `OTEL_EXPORTER_OTLP_ENDPOINT`: the signal
/// path is appended unless already present.
pub fn traces_endpoint(base: &str) -> String {
    let base = base.trim_end_matches('/');
    if base.ends_with(TRACES_PATH) {
        base.to_string()
    } else {
        format!("{}{}", base, TRACES_PATH)
    }
}

/// Build a tracer provider tagged with `service_name`.
///
/// With an endpoint, spans are batched to the collector over OTLP/HTTP.
/// Without one the provider still assigns trace and span ids, so context
/// propagation works with nothing exported.
pub fn tracer_provider(
    service_name: &str,
    endpoint: Option<&str>,
) -> Result<SdkTracerProvider, ExporterBuildError> {
    let resource = Resource::builder()
        .with_service_name(service_name.to_string())
        .build();
    let mut builder = SdkTracerProvider::builder().with_resource(resource);

    if let Some(endpoint) = endpoint {
        let exporter = SpanExporter::builder()
            .with_http()
            .with_endpoint(traces_endpoint(endpoint))
            .build()?;
        builder = builder.with_batch_exporter(exporter);
    }

    Ok(builder.build())
}

/// `tracing` layer feeding spans into `provider`.
pub fn layer<S>(provider: &SdkTracerProvider, service_name: &str) -> impl Layer<S> + Send + Sync
where
    S: tracing::Subscriber + for<'span> LookupSpan<'span> + Send + Sync,
{
    tracing_opentelemetry::layer().with_tracer(provider.tracer(service_name.to_string()))
}

/// Install the W3C trace-context propagator process-wide.
pub fn install_propagator() {
    global::set_text_map_propagator(TraceContextPropagator::new());
}

/// Trace context carried by inbound request headers.
pub fn extract_context(headers: &HeaderMap) -> Context {
    global::get_text_map_propagator(|propagator| propagator.extract(&HeaderExtractor(headers)))
}

/// Write `span`'s trace context into outbound headers.
pub fn inject_context(span: &Span, headers: &mut HeaderMap) {
    let cx = span.context();
    global::get_text_map_propagator(|propagator| {
        propagator.inject_context(&cx, &mut HeaderInjector(headers))
    });
}

struct HeaderExtractor<'a>(&'a HeaderMap);

impl Extractor for HeaderExtractor<'_> {
    fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.to_str().ok())
    }

    fn keys(&self) -> Vec<&str> {
        self.0.keys().map(HeaderName::as_str).collect()
    }
}

struct HeaderInjector<'a>(&'a mut HeaderMap);

impl Injector for HeaderInjector<'_> {
    fn set(&mut self, key: &str, value: String) {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(key.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            self.0.insert(name, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::trace::TraceContextExt;
    use tracing_subscriber::layer::SubscriberExt;

    const TRACEPARENT: &str = "00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01";

    #[test]
    fn traces_endpoint_appends_signal_path_once() {
        assert_eq!(
            traces_endpoint("http://collector:4318"),
            "http://collector:4318/v1/traces"
        );
        assert_eq!(
            traces_endpoint("http://collector:4318/"),
            "http://collector:4318/v1/traces"
        );
        assert_eq!(
            traces_endpoint("http://collector:4318/v1/traces"),
            "http://collector:4318/v1/traces"
        );
    }

    #[test]
    fn exporter_builds_without_contacting_collector() {
        let provider = tracer_provider("otel-test", Some("http://127.0.0.1:1")).unwrap();
        let _ = provider.shutdown();
    }

    #[test]
    fn child_span_continues_inbound_trace() {
        install_propagator();
        let provider = tracer_provider("otel-test", None).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer(&provider, "otel-test"));

        tracing::subscriber::with_default(subscriber, || {
            let mut inbound = HeaderMap::new();
            inbound.insert("traceparent", HeaderValue::from_static(TRACEPARENT));
            let parent = extract_context(&inbound);
            assert!(parent.span().span_context().is_valid());

            let span = tracing::info_span!("request");
            let _ = span.set_parent(parent);

            let mut outbound = HeaderMap::new();
            inject_context(&span, &mut outbound);

            let header = outbound["traceparent"].to_str().unwrap();
            assert!(header.starts_with("00-4bf92f3577b34da6a3ce929d0e0e4736-"));
            assert_ne!(header, TRACEPARENT);
        });
    }

    #[test]
    fn no_traceparent_without_active_trace() {
        install_propagator();
        let mut outbound = HeaderMap::new();
        inject_context(&Span::none(), &mut outbound);
        assert!(outbound.get("traceparent").is_none());
    }
}
