//! Deferred entry-point resolution.
//!
//! # Entry model
//!
//! An [`EntryPoint`] is the unit that actually starts the shell application
//! once remote configuration is known. Entry points are registered in an
//! [`EntryTable`] under a lookup key and resolved by that key at runtime;
//! a missing key is a typed [`BootstrapError::NotFound`], not a panic.
//!
//! [`launch`] runs the resolved entry on its own Tokio task so that a panic
//! during the entry's initialization comes back as
//! [`BootstrapError::Panicked`] instead of unwinding through the loader.
//! The process panic hook is left alone, so a panicking entry still prints
//! the usual `thread ... panicked at` line to stderr before it is reported.
//!
//! # Diagnostics
//!
//! Bootstrap failures are recovered, never propagated. They are handed to a
//! [`Diagnostics`] sink exactly once; [`TracingDiagnostics`] logs them.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, error};

use crate::error::{AppError, BootstrapError};
use crate::remotes::RemotesConfig;

// ── EntryPoint ────────────────────────────────────────────────────────────────

/// A boxed, owned future returned by [`EntryPoint::start`].
pub type EntryFuture = Pin<Box<dyn Future<Output = Result<(), AppError>> + Send + 'static>>;

/// The application's bootstrap entry.
///
/// Receives the frozen remotes registry; everything else it needs is
/// captured at construction time.
pub trait EntryPoint: Send + 'static {
    /// Lookup key, also used in log messages.
    fn id(&self) -> &str;

    /// Consume the entry and return its startup future.
    fn start(self: Box<Self>, remotes: Arc<RemotesConfig>) -> EntryFuture;
}

/// Closure-backed [`EntryPoint`]. Build one with [`entry_fn`].
pub struct FnEntry<F> {
    id: String,
    f: F,
}

/// Wrap an async closure as an [`EntryPoint`] registered under `id`.
pub fn entry_fn<F, Fut>(id: impl Into<String>, f: F) -> FnEntry<F>
where
    F: FnOnce(Arc<RemotesConfig>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), AppError>> + Send + 'static,
{
    FnEntry { id: id.into(), f }
}

impl<F, Fut> EntryPoint for FnEntry<F>
where
    F: FnOnce(Arc<RemotesConfig>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), AppError>> + Send + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    fn start(self: Box<Self>, remotes: Arc<RemotesConfig>) -> EntryFuture {
        Box::pin((self.f)(remotes))
    }
}

// ── EntryTable ────────────────────────────────────────────────────────────────

/// Entry points by lookup key. Each entry is resolved at most once.
#[derive(Default)]
pub struct EntryTable {
    entries: HashMap<String, Box<dyn EntryPoint>>,
}

impl EntryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entry` under its own id.
    ///
    /// # Panics
    ///
    /// Panics if the id is already registered. That is a wiring mistake and must
    /// surface before the shell starts.
    pub fn register(&mut self, entry: impl EntryPoint) -> &mut Self {
        let id = entry.id().to_string();
        if self.entries.insert(id.clone(), Box::new(entry)).is_some() {
            panic!("duplicate entry point registered: {id:?}");
        }
        self
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Take the entry registered under `key` out of the table.
    pub fn resolve(&mut self, key: &str) -> Result<Box<dyn EntryPoint>, BootstrapError> {
        self.entries
            .remove(key)
            .ok_or_else(|| BootstrapError::NotFound(key.to_string()))
    }
}

// ── launch ────────────────────────────────────────────────────────────────────

/// Run `entry` to completion on its own task.
///
/// `start` itself is called on the spawned task, so a panic in the entry's
/// synchronous setup is caught the same way as one in its async body.
pub async fn launch(
    entry: Box<dyn EntryPoint>,
    remotes: Arc<RemotesConfig>,
) -> Result<(), BootstrapError> {
    let id = entry.id().to_string();
    debug!(entry = %id, remotes = remotes.len(), "starting entry point");

    let handle = tokio::spawn(async move { entry.start(remotes).await });

    match handle.await {
        Ok(Ok(())) => Ok(()),
        Ok(Err(e)) => Err(BootstrapError::Failed { entry: id, reason: e.to_string() }),
        Err(e) if e.is_panic() => Err(BootstrapError::Panicked {
            entry: id,
            reason: panic_message(e.into_panic()),
        }),
        Err(e) => Err(BootstrapError::Failed { entry: id, reason: e.to_string() }),
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

// ── Diagnostics ───────────────────────────────────────────────────────────────

/// Sink for recovered bootstrap failures.
pub trait Diagnostics: Send + Sync {
    fn report(&self, err: &BootstrapError);
}

/// Default sink: one `error!` line per failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn report(&self, err: &BootstrapError) {
        error!(error = %err, "bootstrap failed");
    }
}
