//! Subscriber setup.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, ServerConfig};

use super::ObservabilityError;

/// Crates whose `info` output drowns request logs.
const QUIET_TARGETS: &str = "h2=warn,hyper=warn,tower=warn,tonic=warn,opentelemetry=warn,sqlx=warn";

pub(super) fn init_subscriber(
    config: &ServerConfig,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<(), ObservabilityError> {
    let filter = env_filter(&config.logging.log_level);
    let tracer = tracer_provider.map(|provider| {
        provider.tracer(config.observability.otel_service_name.clone())
    });

    match config.logging.log_format {
        LogFormat::Compact => install(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
            filter,
            tracer,
        ),
        LogFormat::Json => install(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
            filter,
            tracer,
        ),
    }
}

fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},{QUIET_TARGETS}")))
}

fn install<L, T>(fmt_layer: L, filter: EnvFilter, tracer: Option<T>) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
    T: opentelemetry::trace::Tracer + Send + Sync + 'static,
    T::Span: Send + Sync,
{
    let subscriber = tracing_subscriber::registry().with(fmt_layer).with(filter);

    match tracer {
        Some(tracer) => subscriber
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .try_init()?,
        None => subscriber.try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_filter_keeps_level_and_quiets_transport_crates() {
        let filter = EnvFilter::new(format!("debug,{QUIET_TARGETS}")).to_string();

        assert!(filter.contains("debug"), "level directive missing: {filter}");
        assert!(filter.contains("hyper=warn"), "hyper directive missing: {filter}");
    }
}
