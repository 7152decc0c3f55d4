use tracing::Subscriber;
use tracing_subscriber::{
    fmt::MakeWriter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

fn default_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("onefile_build=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("onefile_build=info"))
    }
}

/// Builds the subscriber for `format`, writing every event to `writer`.
pub fn build_subscriber<W>(
    verbose: bool,
    format: LogFormat,
    writer: W,
) -> Box<dyn Subscriber + Send + Sync>
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let registry = tracing_subscriber::registry().with(default_filter(verbose));
    match format {
        LogFormat::Compact => Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_writer(writer)
                    .compact(),
            ),
        ),
        // JSON lines, for CI runners that collect structured logs.
        LogFormat::Json => Box::new(
            registry.with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .with_writer(writer)
                    .json(),
            ),
        ),
    }
}

/// Logs go to stderr in both formats; stdout carries only the operator console.
pub fn init_logger(verbose: bool, format: LogFormat) {
    build_subscriber(verbose, format, std::io::stderr).init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Captured {
        fn text(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    #[test]
    fn test_both_formats_write_to_the_given_writer() {
        for format in [LogFormat::Compact, LogFormat::Json] {
            let captured = Captured::default();
            let sink = captured.clone();
            let subscriber = build_subscriber(true, format, move || sink.clone());

            tracing::subscriber::with_default(subscriber, || {
                tracing::info!("🧹 Removed dist");
            });

            assert!(
                captured.text().contains("Removed dist"),
                "{:?} output went elsewhere",
                format
            );
        }
    }
}
