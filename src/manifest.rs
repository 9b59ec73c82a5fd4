//! Remotes manifest retrieval and parsing.
//!
//! The manifest lives at a fixed path under the shell origin:
//! [`MANIFEST_PATH`]. Its body is a flat JSON object mapping remote module
//! names to entry URLs.
//!
//! `ManifestSource` is an enum over the places a manifest can come from.
//! Enum dispatch keeps `fetch` a plain `async fn`; a new source is a new
//! variant plus a new `fetch` arm.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::config::expand_home;
use crate::error::ManifestError;

/// Well-known manifest path, relative to the shell origin.
pub const MANIFEST_PATH: &str = "/assets/module-federation.manifest.json";

// ── Manifest ──────────────────────────────────────────────────────────────────

/// Remote module name → entry URL, as published at deploy time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    entries: HashMap<String, String>,
}

impl Manifest {
    /// Parse a manifest body. `location` only feeds the error message.
    ///
    /// Anything other than an object of string values is rejected as a whole;
    /// there is no per-entry recovery.
    pub fn parse(body: &str, location: &str) -> Result<Self, ManifestError> {
        serde_json::from_str(body).map_err(|source| ManifestError::Parse {
            location: location.to_string(),
            source,
        })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, String)> {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, String)> for Manifest {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

// ── Sources ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum ManifestSource {
    /// `GET <origin>/assets/module-federation.manifest.json`.
    Http(HttpSource),
    /// `<dir>/assets/module-federation.manifest.json` from a local build output.
    Dir(DirSource),
}

impl ManifestSource {
    /// Pick a source from the configured origin: `http(s)://` URLs are fetched
    /// over HTTP, anything else is treated as a local directory.
    pub fn from_origin(origin: &str) -> Result<Self, ManifestError> {
        if is_http_origin(origin) {
            Ok(ManifestSource::Http(HttpSource::new(origin)?))
        } else {
            Ok(ManifestSource::Dir(DirSource::new(expand_home(origin))))
        }
    }

    /// Where the manifest is read from: URL or file path.
    pub fn location(&self) -> String {
        match self {
            ManifestSource::Http(s) => s.url().to_string(),
            ManifestSource::Dir(s) => s.path().display().to_string(),
        }
    }

    pub async fn fetch(&self) -> Result<Manifest, ManifestError> {
        match self {
            ManifestSource::Http(s) => s.fetch().await,
            ManifestSource::Dir(s) => s.fetch().await,
        }
    }
}

/// HTTP manifest source. Cloning is cheap: `reqwest::Client` is an `Arc`
/// internally.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    url: String,
}

impl HttpSource {
    /// Build a source for `origin`. No timeout is set on the client; the
    /// request runs to completion or transport failure.
    pub fn new(origin: &str) -> Result<Self, ManifestError> {
        let url = manifest_url(origin);
        let client = Client::builder().build().map_err(|e| ManifestError::Transport {
            url: url.clone(),
            reason: format!("failed to build HTTP client: {e}"),
        })?;
        Ok(Self { client, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<Manifest, ManifestError> {
        debug!(url = %self.url, "requesting manifest");

        let response = self.client.get(&self.url).send().await.map_err(|e| {
            debug!(url = %self.url, error = %e, "manifest request failed (transport)");
            ManifestError::Transport { url: self.url.clone(), reason: e.to_string() }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ManifestError::Status { url: self.url.clone(), status: status.as_u16() });
        }

        let body = response.text().await.map_err(|e| ManifestError::Transport {
            url: self.url.clone(),
            reason: format!("failed to read response body: {e}"),
        })?;

        debug!(url = %self.url, body_len = body.len(), "manifest received");
        Manifest::parse(&body, &self.url)
    }
}

/// Local build-output source, for running the shell against a `dist/` folder.
#[derive(Debug, Clone)]
pub struct DirSource {
    path: PathBuf,
}

impl DirSource {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self { path: dir.as_ref().join(MANIFEST_PATH.trim_start_matches('/')) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn fetch(&self) -> Result<Manifest, ManifestError> {
        debug!(path = %self.path.display(), "reading manifest");
        let body = tokio::fs::read_to_string(&self.path).await.map_err(|source| {
            ManifestError::Io { path: self.path.display().to_string(), source }
        })?;
        Manifest::parse(&body, &self.path.display().to_string())
    }
}

/// `true` for `http://` and `https://` origins, scheme compared case-insensitively.
pub fn is_http_origin(origin: &str) -> bool {
    ["http://", "https://"].iter().any(|scheme| {
        origin
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Join the fixed manifest path onto `origin`, tolerating a trailing slash.
pub fn manifest_url(origin: &str) -> String {
    format!("{}{}", origin.trim_end_matches('/'), MANIFEST_PATH)
}
