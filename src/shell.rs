//! Shell startup wiring used by the binary.
//!
//! [`start`] turns a resolved [`Config`] into a loader run. Its result is what
//! the process exit code is derived from: `Ok` (including a recovered
//! bootstrap failure) exits 0, `Err` exits 1.

use std::sync::Arc;

use tracing::info;

use crate::bootstrap::{EntryPoint, EntryTable, entry_fn};
use crate::config::Config;
use crate::error::AppError;
use crate::loader::{LoadReport, RemoteConfigLoader};
use crate::manifest::ManifestSource;
use crate::remotes::RemotesConfig;

/// Entry that prints the resolved remotes, one `name<TAB>url` line each.
pub fn listing_entry(id: String, shell_name: String) -> impl EntryPoint {
    entry_fn(id, move |remotes: Arc<RemotesConfig>| async move {
        for (name, url) in remotes.sorted() {
            println!("{name}\t{url}");
        }
        println!("✓ {shell_name} started: remotes={}", remotes.len());
        Ok::<(), AppError>(())
    })
}

/// Seed the registry from config, load the manifest and start `entries`.
pub async fn start(config: &Config, entries: EntryTable) -> Result<LoadReport, AppError> {
    let source = ManifestSource::from_origin(&config.origin)?;
    let remotes = RemotesConfig::with_defaults(config.remotes.clone());

    let report = RemoteConfigLoader::new(source, config.entry.clone())
        .with_policy(config.on_manifest_error)
        .run(remotes, entries)
        .await?;

    info!(
        merged = report.merged,
        remotes = report.remotes.len(),
        bootstrapped = report.bootstrapped,
        "startup complete"
    );

    Ok(report)
}

/// Exit code for a finished startup.
pub fn exit_code<T>(result: &Result<T, AppError>) -> i32 {
    match result {
        Ok(_) => 0,
        Err(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use crate::loader::ManifestErrorPolicy;

    fn dist_with(body: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("assets")).unwrap();
        fs::write(dir.path().join("assets/module-federation.manifest.json"), body).unwrap();
        dir
    }

    fn failing_entries() -> EntryTable {
        let mut entries = EntryTable::new();
        entries.register(entry_fn("bootstrap", |_remotes: Arc<RemotesConfig>| async {
            Err::<(), AppError>(AppError::Config("no root element".into()))
        }));
        entries
    }

    #[tokio::test]
    async fn recovered_bootstrap_failure_exits_zero() {
        let dist = dist_with(r#"{"remoteA":"https://host/remoteA.js"}"#);
        let config = Config::test_default(&dist.path().display().to_string());

        let result = start(&config, failing_entries()).await;

        assert_eq!(exit_code(&result), 0);
        assert!(!result.unwrap().bootstrapped);
    }

    #[tokio::test]
    async fn manifest_abort_exits_one() {
        let dist = tempfile::tempdir().unwrap();
        let config = Config::test_default(&dist.path().display().to_string());

        let result = start(&config, failing_entries()).await;

        assert_eq!(exit_code(&result), 1);
        assert!(matches!(result, Err(AppError::Manifest(_))));
    }

    #[tokio::test]
    async fn manifest_continue_exits_zero() {
        let dist = tempfile::tempdir().unwrap();
        let mut config = Config::test_default(&dist.path().display().to_string());
        config.on_manifest_error = ManifestErrorPolicy::Continue;
        let mut entries = EntryTable::new();
        entries.register(listing_entry("bootstrap".into(), "test".into()));

        let result = start(&config, entries).await;

        assert_eq!(exit_code(&result), 0);
        let report = result.unwrap();
        assert!(report.manifest_skipped);
        assert!(report.bootstrapped);
    }

    #[tokio::test]
    async fn defaults_from_config_reach_the_registry() {
        let dist = dist_with(r#"{"remoteA":"https://host/remoteA.js"}"#);
        let mut config = Config::test_default(&dist.path().display().to_string());
        config
            .remotes
            .insert("local".into(), "http://localhost:4201/remoteEntry.js".into());
        let mut entries = EntryTable::new();
        entries.register(listing_entry("bootstrap".into(), "test".into()));

        let report = start(&config, entries).await.unwrap();

        assert_eq!(report.remotes.len(), 2);
        assert!(report.remotes.contains("local"));
        assert!(report.remotes.contains("remoteA"));
    }
}
