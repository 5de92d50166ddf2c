use super::{registry, Extension, Fragment, Namespace, Scope};
use crate::error::{FeedResult, ValidationError};

/// Loaded extensions of one feed or entry, in load order.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtensionContainer {
    scope: Scope,
    loaded: Vec<(String, Box<dyn Extension>)>,
}

impl ExtensionContainer {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            loaded: Vec::new(),
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Loads `name` from the process-wide registry.
    ///
    /// Returns `true` when the extension was newly attached. Loading a name
    /// twice keeps the existing instance and its settings.
    pub fn load(&mut self, name: &str) -> FeedResult<bool> {
        if self.contains(name) {
            return Ok(false);
        }
        let factory = registry::resolve(name)?;
        self.insert(name, factory.build(self.scope));
        Ok(true)
    }

    /// Attaches an already constructed instance, unless `name` is loaded.
    pub fn insert(&mut self, name: &str, extension: Box<dyn Extension>) -> bool {
        if self.contains(name) {
            return false;
        }
        tracing::debug!(extension = name, scope = ?self.scope, "Loaded extension");
        self.loaded.push((name.to_string(), extension));
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loaded.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<&(dyn Extension + 'static)> {
        self.loaded
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ext)| &**ext)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Extension + 'static)> {
        self.loaded
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, ext)| &mut **ext)
    }

    /// Typed access to a loaded extension.
    pub fn get_as<T: Extension>(&self, name: &str) -> Option<&T> {
        self.get(name)?.as_any().downcast_ref::<T>()
    }

    pub fn get_as_mut<T: Extension>(&mut self, name: &str) -> Option<&mut T> {
        self.get_mut(name)?.as_any_mut().downcast_mut::<T>()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.loaded.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.loaded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loaded.is_empty()
    }

    pub fn namespaces(&self) -> impl Iterator<Item = Namespace> + '_ {
        self.loaded
            .iter()
            .flat_map(|(_, ext)| ext.namespaces().iter().copied())
    }

    /// Validates each extension; errors are prefixed with the extension name.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (name, ext) in &self.loaded {
            ext.validate().map_err(|e| e.within(name))?;
        }
        Ok(())
    }

    /// RSS fragments in load order.
    pub fn rss_fragments(&self) -> impl Iterator<Item = Fragment> + '_ {
        self.loaded.iter().filter_map(|(_, ext)| ext.rss_fragment())
    }

    /// Atom fragments in load order.
    pub fn atom_fragments(&self) -> impl Iterator<Item = Fragment> + '_ {
        self.loaded.iter().filter_map(|(_, ext)| ext.atom_fragment())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedError;
    use crate::ext::syndication::{Syndication, UpdatePeriod};

    #[test]
    fn test_load_is_idempotent() {
        let mut container = ExtensionContainer::new(Scope::Feed);
        assert!(container.load("syndication").unwrap());
        container
            .get_as_mut::<Syndication>("syndication")
            .unwrap()
            .update_period = Some(UpdatePeriod::Daily);

        assert!(!container.load("syndication").unwrap());
        assert_eq!(container.len(), 1);
        assert_eq!(
            container.get_as::<Syndication>("syndication").unwrap().update_period,
            Some(UpdatePeriod::Daily)
        );
    }

    #[test]
    fn test_unknown_name_fails() {
        let mut container = ExtensionContainer::new(Scope::Entry);
        assert!(matches!(
            container.load("does-not-exist"),
            Err(FeedError::UnknownExtension(_))
        ));
        assert!(container.is_empty());
    }

    #[test]
    fn test_load_order_is_kept() {
        let mut container = ExtensionContainer::new(Scope::Feed);
        container.load("dc").unwrap();
        container.load("base").unwrap();
        container.load("podcast").unwrap();
        let names: Vec<_> = container.names().collect();
        assert_eq!(names, ["dc", "base", "podcast"]);
    }

    #[test]
    fn test_wrong_type_downcast_is_none() {
        let mut container = ExtensionContainer::new(Scope::Feed);
        container.load("dc").unwrap();
        assert!(container.get_as::<Syndication>("dc").is_none());
    }
}
