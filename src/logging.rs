use anyhow::{Context, Result};
use tracing::Subscriber;
use tracing_subscriber::{fmt::MakeWriter, EnvFilter};

/// Log subscriber shared by the binaries. `RUST_LOG` overrides the default `info` level.
pub fn subscriber<W>(writer: W) -> impl Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static
{
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(writer)
        .finish()
}

/// Install [subscriber] globally, logging to stderr.
pub fn init() -> Result<()> {
    tracing::subscriber::set_global_default(subscriber(std::io::stderr))
        .context("unable to install log subscriber")
}


#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::protocol::state::ControlState;
    use crate::store::StateStore;

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_load_warnings_are_logged() {
        let captured = Captured::default();
        let writer = captured.clone();
        let _guard = tracing::subscriber::set_default(subscriber(move || writer.clone()));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{\"power\": tru").unwrap();

        assert_eq!(StateStore::new(&path).load().await, ControlState::default());

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("stored state is corrupt, using default"), "{output}");
    }
}
