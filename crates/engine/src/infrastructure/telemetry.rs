//! Process-wide diagnostics setup.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global `tracing` subscriber.
///
/// `RUST_LOG` overrides `default_filter`. Call once, at process start.
pub fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
    {
        eprintln!("tracing already initialized: {e}");
    }
}

/// Load `.env.local` then `.env` from the repository root.
///
/// Earlier files win; variables already set in the process are never
/// overridden.
pub fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            if let Err(e) = dotenvy::from_path(&path) {
                eprintln!("failed to load {}: {e}", path.display());
            }
        }
    }
}
