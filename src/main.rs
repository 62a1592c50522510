use kitty::commands::Cli;
use kitty::libs::messages::macros::is_debug_mode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    if is_debug_mode() {
        tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::new(
                std::env::var("RUST_LOG").unwrap_or_else(|_| "kitty=debug".into()),
            ))
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    Cli::menu()
}
