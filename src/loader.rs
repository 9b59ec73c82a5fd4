//! Remote configuration loader: manifest → registry → entry point.
//!
//! Startup sequence performed by [`RemoteConfigLoader::run`]:
//!   1. Fetch the manifest from the configured source
//!   2. Merge every entry into the remotes registry
//!   3. Freeze the registry
//!   4. Resolve the entry point by key and run it
//!   5. Report a bootstrap failure to diagnostics (never returned)
//!
//! Manifest failures are returned to the caller unless the
//! [`ManifestErrorPolicy`] says to carry on without them.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::bootstrap::{self, Diagnostics, EntryTable, TracingDiagnostics};
use crate::error::ManifestError;
use crate::manifest::ManifestSource;
use crate::remotes::RemotesConfig;

/// What to do when the manifest cannot be fetched or parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestErrorPolicy {
    /// Return the error; the entry point is never started.
    #[default]
    Abort,
    /// Log the error and start the entry point with the registry as it was.
    Continue,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct LoadReport {
    /// Manifest entries written into the registry.
    pub merged: usize,
    /// `true` when a manifest failure was skipped under [`ManifestErrorPolicy::Continue`].
    pub manifest_skipped: bool,
    /// The frozen registry the entry point received.
    pub remotes: Arc<RemotesConfig>,
    /// `false` when the entry point failed and was reported to diagnostics.
    pub bootstrapped: bool,
}

pub struct RemoteConfigLoader {
    source: ManifestSource,
    entry: String,
    policy: ManifestErrorPolicy,
    diagnostics: Arc<dyn Diagnostics>,
}

impl RemoteConfigLoader {
    /// Loader reading from `source` and starting the entry registered as `entry`.
    /// Aborts on manifest failure and logs bootstrap failures via tracing.
    pub fn new(source: ManifestSource, entry: impl Into<String>) -> Self {
        Self {
            source,
            entry: entry.into(),
            policy: ManifestErrorPolicy::default(),
            diagnostics: Arc::new(TracingDiagnostics),
        }
    }

    pub fn with_policy(mut self, policy: ManifestErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Fetch the manifest and merge it into `remotes`.
    ///
    /// All-or-nothing: on error `remotes` is untouched.
    pub async fn load_manifest(&self, remotes: &mut RemotesConfig) -> Result<usize, ManifestError> {
        let manifest = self.source.fetch().await?;
        let merged = remotes.merge(manifest);
        info!(
            source = %self.source.location(),
            merged,
            remotes = remotes.len(),
            "manifest merged"
        );
        Ok(merged)
    }

    /// Run the full startup sequence once.
    ///
    /// Returns `Err` only for manifest failures under
    /// [`ManifestErrorPolicy::Abort`]. Bootstrap failures go to diagnostics
    /// and show up as `bootstrapped: false`.
    pub async fn run(
        self,
        mut remotes: RemotesConfig,
        mut entries: EntryTable,
    ) -> Result<LoadReport, ManifestError> {
        let (merged, manifest_skipped) = match self.load_manifest(&mut remotes).await {
            Ok(n) => (n, false),
            Err(e) => match self.policy {
                ManifestErrorPolicy::Abort => return Err(e),
                ManifestErrorPolicy::Continue => {
                    warn!(error = %e, "manifest unavailable, continuing with configured remotes");
                    (0, true)
                }
            },
        };

        let remotes = remotes.freeze();
        debug!(entry = %self.entry, "resolving entry point");

        let outcome = match entries.resolve(&self.entry) {
            Ok(entry) => bootstrap::launch(entry, remotes.clone()).await,
            Err(e) => Err(e),
        };

        let bootstrapped = match outcome {
            Ok(()) => {
                info!(entry = %self.entry, "entry point finished");
                true
            }
            Err(e) => {
                self.diagnostics.report(&e);
                false
            }
        };

        Ok(LoadReport { merged, manifest_skipped, remotes, bootstrapped })
    }
}
