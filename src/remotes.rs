//! Remote module registry (module name → entry URL).
//!
//! A [`RemotesConfig`] is built at startup (empty or seeded with defaults),
//! populated once by the loader, then frozen behind an `Arc` and handed to the
//! entry point. Nothing mutates it after [`RemotesConfig::freeze`].

use std::collections::HashMap;
use std::sync::Arc;

use crate::manifest::Manifest;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemotesConfig {
    entries: HashMap<String, String>,
}

impl RemotesConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the registry with default entries.
    pub fn with_defaults(defaults: HashMap<String, String>) -> Self {
        Self { entries: defaults }
    }

    /// Write every manifest entry under the same key, overwriting existing
    /// values. Keys absent from the manifest are left untouched.
    ///
    /// Returns the number of entries written.
    pub fn merge(&mut self, manifest: Manifest) -> usize {
        let mut written = 0;
        for (name, entry) in manifest.into_entries() {
            self.entries.insert(name, entry);
            written += 1;
        }
        written
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by name, for stable logging and display.
    pub fn sorted(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = self
            .entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        out.sort_unstable_by(|a, b| a.0.cmp(b.0));
        out
    }

    /// End the population phase; the registry is read-only from here on.
    pub fn freeze(self) -> Arc<RemotesConfig> {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manifest(pairs: &[(&str, &str)]) -> Manifest {
        Manifest::from_iter(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())))
    }

    #[test]
    fn merge_adds_new_entries() {
        let mut remotes = RemotesConfig::new();
        let n = remotes.merge(manifest(&[("remoteA", "https://host/remoteA.js")]));
        assert_eq!(n, 1);
        assert_eq!(remotes.get("remoteA"), Some("https://host/remoteA.js"));
    }

    #[test]
    fn merge_keeps_unrelated_defaults() {
        let mut remotes = RemotesConfig::with_defaults(HashMap::from([(
            "local".to_string(),
            "http://localhost:4201/remoteEntry.js".to_string(),
        )]));
        remotes.merge(manifest(&[("remoteA", "https://host/a.js")]));
        assert_eq!(remotes.get("local"), Some("http://localhost:4201/remoteEntry.js"));
        assert_eq!(remotes.len(), 2);
    }

    #[test]
    fn merge_overwrites_shared_keys() {
        let mut remotes = RemotesConfig::with_defaults(HashMap::from([(
            "remoteA".to_string(),
            "http://old/a.js".to_string(),
        )]));
        remotes.merge(manifest(&[("remoteA", "https://new/a.js")]));
        assert_eq!(remotes.get("remoteA"), Some("https://new/a.js"));
        assert_eq!(remotes.len(), 1);
    }

    #[test]
    fn empty_manifest_leaves_registry_unchanged() {
        let mut remotes = RemotesConfig::with_defaults(HashMap::from([(
            "a".to_string(),
            "x".to_string(),
        )]));
        let before = remotes.clone();
        assert_eq!(remotes.merge(Manifest::default()), 0);
        assert_eq!(remotes, before);
    }

    #[test]
    fn sorted_is_ordered_by_name() {
        let mut remotes = RemotesConfig::new();
        remotes.merge(manifest(&[("b", "2"), ("a", "1"), ("c", "3")]));
        let names: Vec<&str> = remotes.sorted().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }
}
