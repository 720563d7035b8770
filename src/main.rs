mod shell;

use fileconv::{Dispatcher, Registry};
use shell::Shell;
use tracing::info;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they don't interleave with the prompts
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fileconv=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Detect installed converters once; the registry is fixed from here on
    let registry = Registry::probe().await;
    let dispatcher = Dispatcher::new(registry);

    let open_result = std::env::var_os("FILECONV_NO_OPEN").is_none();
    info!("fileconv {} ready", env!("CARGO_PKG_VERSION"));

    Shell::new(dispatcher, open_result).run().await
}
