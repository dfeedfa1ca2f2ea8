// ABOUTME: Diagnostic logging setup for the ssh-config binary
// ABOUTME: Logs go to stderr so command output on stdout stays clean

use tracing_subscriber::EnvFilter;

/// Default WARN (DEBUG with `verbose`), `RUST_LOG` overrides either.
pub fn init(verbose: bool) {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(build_filter(std::env::var("RUST_LOG").ok().as_deref(), verbose))
        .with_target(false)
        .init();
}

/// A non-empty, parseable `rust_log` wins; anything else falls back to the
/// verbosity default.
fn build_filter(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(level.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Write};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn captured(filter: EnvFilter) -> String {
        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_env_filter(filter)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("debug event");
            tracing::warn!("warn event");
        });

        let bytes = buffer.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_rust_log_level_is_honoured() {
        let output = captured(build_filter(Some("debug"), false));
        assert!(output.contains("debug event"));
        assert!(output.contains("warn event"));
    }

    #[test]
    fn test_default_level_is_warn() {
        let output = captured(build_filter(None, false));
        assert!(!output.contains("debug event"));
        assert!(output.contains("warn event"));
    }

    #[test]
    fn test_verbose_raises_default() {
        let output = captured(build_filter(None, true));
        assert!(output.contains("debug event"));

        let output = captured(build_filter(Some(""), true));
        assert!(output.contains("debug event"));
    }

    #[test]
    fn test_rust_log_overrides_verbose() {
        let output = captured(build_filter(Some("error"), true));
        assert!(!output.contains("debug event"));
        assert!(!output.contains("warn event"));
    }
}
