//! Fragment and module-requirement sinks.
//!
//! The engine does not own the vhost file lifecycle or the module-loading
//! machinery; it hands its results to these two capabilities. The in-memory
//! implementations below back the CLI and the test suite; production callers
//! plug in their own.

use std::collections::BTreeSet;

use serde::Serialize;

/// A rendered configuration fragment, immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedFragment {
    /// Fragment identifier within the target file.
    pub name: String,
    /// Vhost configuration file this fragment is assembled into.
    pub target_file: String,
    /// Position among all fragments of the target file.
    pub order: u32,
    /// Directive text, concatenated verbatim by the assembler.
    pub body: String,
}

/// Receives rendered fragments for later assembly.
///
/// All fragments submitted for one target file are concatenated in ascending
/// `order`, lowest first; ties keep submission order.
pub trait FragmentSink {
    fn submit(&mut self, fragment: &RenderedFragment) -> anyhow::Result<()>;
}

/// Receives module requirements.
///
/// `require` is idempotent: registering an already-loaded module is a no-op.
/// Every required module must be loaded before the assembled configuration is
/// evaluated by the web server.
pub trait ModuleSink {
    fn require(&mut self, module: &str) -> anyhow::Result<()>;
}

/// In-memory fragment sink with assembly support.
#[derive(Debug, Default)]
pub struct FragmentStore {
    fragments: Vec<RenderedFragment>,
}

impl FragmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All fragments in submission order.
    pub fn fragments(&self) -> &[RenderedFragment] {
        &self.fragments
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Concatenate the bodies destined for one target file, lowest order
    /// first. The sort is stable, so ties keep submission order.
    pub fn assemble(&self, target_file: &str) -> String {
        let mut selected: Vec<&RenderedFragment> = self
            .fragments
            .iter()
            .filter(|f| f.target_file == target_file)
            .collect();
        selected.sort_by_key(|f| f.order);
        selected.iter().map(|f| f.body.as_str()).collect()
    }
}

impl FragmentSink for FragmentStore {
    fn submit(&mut self, fragment: &RenderedFragment) -> anyhow::Result<()> {
        self.fragments.push(fragment.clone());
        Ok(())
    }
}

/// In-memory module sink backed by a set.
#[derive(Debug, Default)]
pub struct LoadedModules {
    modules: BTreeSet<String>,
}

impl LoadedModules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, module: &str) -> bool {
        self.modules.contains(module)
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(String::as_str)
    }
}

impl ModuleSink for LoadedModules {
    fn require(&mut self, module: &str) -> anyhow::Result<()> {
        self.modules.insert(module.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(name: &str, target: &str, order: u32, body: &str) -> RenderedFragment {
        RenderedFragment {
            name: name.to_string(),
            target_file: target.to_string(),
            order,
            body: body.to_string(),
        }
    }

    #[test]
    fn test_assemble_orders_by_key_ascending() {
        let mut store = FragmentStore::new();
        store.submit(&fragment("c", "15-default-80.conf", 300, "third\n")).unwrap();
        store.submit(&fragment("a", "15-default-80.conf", 10, "first\n")).unwrap();
        store.submit(&fragment("b", "15-default-80.conf", 170, "second\n")).unwrap();

        assert_eq!(store.assemble("15-default-80.conf"), "first\nsecond\nthird\n");
    }

    #[test]
    fn test_assemble_ties_keep_submission_order() {
        let mut store = FragmentStore::new();
        store.submit(&fragment("a", "f.conf", 170, "a\n")).unwrap();
        store.submit(&fragment("b", "f.conf", 170, "b\n")).unwrap();

        assert_eq!(store.assemble("f.conf"), "a\nb\n");
    }

    #[test]
    fn test_assemble_filters_by_target_file() {
        let mut store = FragmentStore::new();
        store.submit(&fragment("a", "15-default-80.conf", 170, "a\n")).unwrap();
        store.submit(&fragment("b", "25-other-443.conf", 10, "b\n")).unwrap();

        assert_eq!(store.assemble("15-default-80.conf"), "a\n");
        assert_eq!(store.assemble("missing.conf"), "");
    }

    #[test]
    fn test_module_require_is_idempotent() {
        let mut modules = LoadedModules::new();
        modules.require("proxy").unwrap();
        modules.require("proxy_http").unwrap();
        modules.require("proxy").unwrap();

        assert_eq!(modules.len(), 2);
        assert!(modules.contains("proxy"));
        assert!(modules.contains("proxy_http"));
        assert!(!modules.contains("proxy_http2"));
    }
}
