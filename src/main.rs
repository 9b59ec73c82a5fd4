//! Remotes shell bootstrap entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at the configured level
//!   4. Seed the remotes registry with configured defaults
//!   5. Fetch and merge the remotes manifest
//!   6. Start the shell entry point

use tracing::info;

use remotes_shell::bootstrap::EntryTable;
use remotes_shell::error::AppError;
use remotes_shell::{config, logger, shell};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let result = run().await;
    if let Err(e) = &result {
        eprintln!("error: {e}");
    }
    std::process::exit(shell::exit_code(&result));
}

async fn run() -> Result<(), AppError> {
    // Load .env if present; ignore errors (file is optional).
    let _ = dotenvy::dotenv();

    let config = config::load()?;

    logger::init(&config.log_level, config.log_level_pinned)?;

    info!(
        name = %config.name,
        origin = %config.origin,
        entry = %config.entry,
        defaults = config.remotes.len(),
        "config loaded"
    );

    let mut entries = EntryTable::new();
    entries.register(shell::listing_entry(config.entry.clone(), config.name.clone()));

    shell::start(&config, entries).await?;
    Ok(())
}
