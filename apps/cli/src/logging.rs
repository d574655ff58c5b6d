use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the stderr subscriber.
///
/// Levels come from `HELIX_LOG` (e.g. `HELIX_LOG=helix_annotator=debug`),
/// falling back to `helix=info`. Safe to call more than once.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("HELIX_LOG").unwrap_or_else(|_| EnvFilter::new("helix=info"));

        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .with(filter)
            .init();
    });
}
