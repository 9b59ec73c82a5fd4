//! Application-wide error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("logger error: {0}")]
    Logger(String),

    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
}

/// Failure while retrieving or parsing the remotes manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest request to {url} failed: {reason}")]
    Transport { url: String, reason: String },

    #[error("manifest request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("manifest at {location} is not a name-to-url object: {source}")]
    Parse {
        location: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot read manifest {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while resolving or running the bootstrap entry point.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("no entry point registered under '{0}'")]
    NotFound(String),

    #[error("entry point '{entry}' failed: {reason}")]
    Failed { entry: String, reason: String },

    #[error("entry point '{entry}' panicked: {reason}")]
    Panicked { entry: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn config_error_display() {
        let e = AppError::Config("missing field".into());
        assert!(e.to_string().contains("config error"));
        assert!(e.to_string().contains("missing field"));
    }

    #[test]
    fn logger_error_display() {
        let e = AppError::Logger("already initialized".into());
        assert!(e.to_string().contains("already initialized"));
    }

    #[test]
    fn manifest_error_converts_and_keeps_status() {
        let e: AppError = ManifestError::Status {
            url: "http://localhost/assets/x.json".into(),
            status: 404,
        }
        .into();
        let msg = e.to_string();
        assert!(msg.starts_with("manifest error"));
        assert!(e.source().is_some());
        assert!(msg.contains("404"));
    }

    #[test]
    fn parse_error_exposes_source() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let e = ManifestError::Parse { location: "dist".into(), source: json_err };
        assert!(e.source().is_some());
    }

    #[test]
    fn bootstrap_error_names_entry() {
        let e = BootstrapError::Failed { entry: "bootstrap".into(), reason: "boom".into() };
        assert!(e.to_string().contains("'bootstrap'"));
        assert!(e.to_string().contains("boom"));
        assert!(BootstrapError::NotFound("x".into()).to_string().contains("'x'"));
    }
}
