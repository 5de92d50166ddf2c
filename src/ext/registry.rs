//! Name -> constructor lookup for extensions.
//!
//! The process-wide registry is pre-populated with the bundled extensions
//! and open to caller registrations, so new namespaces plug in without
//! touching [`Feed`](crate::Feed) or [`Entry`](crate::Entry).

use std::collections::HashMap;
use std::sync::{OnceLock, PoisonError, RwLock};

use super::{base, dc, podcast, syndication, torrent, Extension, Scope};
use crate::error::{FeedError, FeedResult};

/// Zero-argument constructor for one side of an extension.
pub type Constructor = fn() -> Box<dyn Extension>;

/// The two constructors registered under an extension name.
#[derive(Debug, Clone, Copy)]
pub struct ExtensionFactory {
    pub feed: Constructor,
    pub entry: Constructor,
}

impl ExtensionFactory {
    pub fn new(feed: Constructor, entry: Constructor) -> Self {
        Self { feed, entry }
    }

    pub fn build(&self, scope: Scope) -> Box<dyn Extension> {
        match scope {
            Scope::Feed => (self.feed)(),
            Scope::Entry => (self.entry)(),
        }
    }
}

/// A set of named extension factories.
#[derive(Debug, Clone, Default)]
pub struct ExtensionRegistry {
    factories: HashMap<String, ExtensionFactory>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the extensions shipped with this crate.
    pub fn with_bundled() -> Self {
        let mut registry = Self::new();
        registry.register(podcast::NAME, podcast::factory());
        registry.register(torrent::NAME, torrent::factory());
        registry.register(dc::NAME, dc::factory());
        registry.register(syndication::NAME, syndication::factory());
        registry.register(base::NAME, base::factory());
        registry
    }

    /// Associates `name` with `factory`, returning the factory it replaced.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: ExtensionFactory,
    ) -> Option<ExtensionFactory> {
        self.factories.insert(name.into(), factory)
    }

    pub fn resolve(&self, name: &str) -> FeedResult<ExtensionFactory> {
        self.factories
            .get(name)
            .copied()
            .ok_or_else(|| FeedError::UnknownExtension(name.to_string()))
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }
}

static GLOBAL: OnceLock<RwLock<ExtensionRegistry>> = OnceLock::new();

fn global() -> &'static RwLock<ExtensionRegistry> {
    GLOBAL.get_or_init(|| RwLock::new(ExtensionRegistry::with_bundled()))
}

/// Registers an extension process-wide.
pub fn register(name: impl Into<String>, factory: ExtensionFactory) -> Option<ExtensionFactory> {
    let name = name.into();
    tracing::debug!(extension = %name, "Registering extension");
    global()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(name, factory)
}

/// Looks up a process-wide registration.
pub fn resolve(name: &str) -> FeedResult<ExtensionFactory> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .resolve(name)
}

/// Names registered process-wide, sorted.
pub fn registered_names() -> Vec<String> {
    global()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .names()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ext::Inert;

    fn inert() -> Box<dyn Extension> {
        Box::new(Inert)
    }

    #[test]
    fn test_bundled_names() {
        let names = ExtensionRegistry::with_bundled().names();
        assert_eq!(names, ["base", "dc", "podcast", "syndication", "torrent"]);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = ExtensionRegistry::new();
        let err = registry.resolve("geo").unwrap_err();
        assert!(matches!(err, FeedError::UnknownExtension(name) if name == "geo"));
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = ExtensionRegistry::new();
        assert!(registry.register("x", ExtensionFactory::new(inert, inert)).is_none());
        assert!(registry.register("x", ExtensionFactory::new(inert, inert)).is_some());
        assert!(registry.resolve("x").is_ok());
    }

    #[test]
    fn test_global_registration() {
        register("registry-test-inert", ExtensionFactory::new(inert, inert));
        assert!(resolve("registry-test-inert").is_ok());
        assert!(registered_names().contains(&"podcast".to_string()));
    }
}
