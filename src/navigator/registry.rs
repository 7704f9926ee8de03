//! # Navigator Registry
//!
//! Maps a navigator name to its implementation. Each controller owns one;
//! there is no process-wide registry.

use std::collections::HashMap;

use log::{debug, info};

use crate::error::{NavError, NavResult};
use crate::graph::{DestinationBuilder, DestinationId};
use crate::navigator::{HostInfo, Navigator, NavigatorKind};

#[derive(Default)]
pub struct NavigatorRegistry {
    navigators: HashMap<String, Box<dyn Navigator>>,
}

impl NavigatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `navigator` under `name`. Fails if the name is taken.
    pub fn register(&mut self, name: impl Into<String>, navigator: impl Navigator + 'static) -> NavResult<()> {
        let name = name.into();
        if self.navigators.contains_key(&name) {
            return Err(NavError::DuplicateNavigator(name));
        }
        debug!("Registered navigator {name}");
        self.navigators.insert(name, Box::new(navigator));
        Ok(())
    }

    /// Registers `navigator` under `name`, returning whatever it replaced.
    pub fn replace(
        &mut self,
        name: impl Into<String>,
        navigator: impl Navigator + 'static,
    ) -> Option<Box<dyn Navigator>> {
        let name = name.into();
        let previous = self.navigators.insert(name.clone(), Box::new(navigator));
        if previous.is_some() {
            info!("Replaced navigator {name}");
        }
        previous
    }

    pub fn get(&self, name: &str) -> NavResult<&dyn Navigator> {
        self.navigators
            .get(name)
            .map(|n| n.as_ref())
            .ok_or_else(|| NavError::NavigatorNotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> NavResult<&mut (dyn Navigator + 'static)> {
        self.navigators
            .get_mut(name)
            .map(|n| n.as_mut())
            .ok_or_else(|| NavError::NavigatorNotFound(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.navigators.contains_key(name)
    }

    pub fn kind(&self, name: &str) -> NavResult<NavigatorKind> {
        self.get(name).map(|n| n.kind())
    }

    pub fn len(&self) -> usize {
        self.navigators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.navigators.is_empty()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.navigators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Starts a destination description owned by the navigator `name`.
    pub fn create_destination(&self, name: &str, id: impl Into<DestinationId>) -> NavResult<DestinationBuilder> {
        let navigator = self.get(name)?;
        Ok(navigator.create_destination(DestinationBuilder::new(id, name)))
    }

    pub(crate) fn attach_all(&mut self, host: &HostInfo) {
        for navigator in self.navigators.values_mut() {
            navigator.on_attach(host);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::navigators::{HostNavigator, NoopNavigator, OverlayNavigator};

    #[test]
    fn test_register_and_get() {
        let mut registry = NavigatorRegistry::new();
        registry.register("host", HostNavigator::new()).unwrap();
        registry.register("dialog", OverlayNavigator::new()).unwrap();
        assert_eq!(registry.kind("host").unwrap(), NavigatorKind::Host);
        assert_eq!(registry.kind("dialog").unwrap(), NavigatorKind::Overlay);
        assert_eq!(registry.names(), vec!["dialog", "host"]);
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut registry = NavigatorRegistry::new();
        registry.register("host", HostNavigator::new()).unwrap();
        let err = registry.register("host", NoopNavigator).unwrap_err();
        assert!(matches!(err, NavError::DuplicateNavigator(name) if name == "host"));
        assert_eq!(registry.kind("host").unwrap(), NavigatorKind::Host);
    }

    #[test]
    fn test_replace_is_explicit() {
        let mut registry = NavigatorRegistry::new();
        assert!(registry.replace("host", HostNavigator::new()).is_none());
        let old = registry.replace("host", NoopNavigator);
        assert_eq!(old.map(|n| n.kind()), Some(NavigatorKind::Host));
        assert_eq!(registry.kind("host").unwrap(), NavigatorKind::NoOp);
    }

    #[test]
    fn test_missing_navigator() {
        let mut registry = NavigatorRegistry::new();
        assert!(matches!(registry.get("nope"), Err(NavError::NavigatorNotFound(_))));
        assert!(registry.get_mut("nope").is_err());
    }

    #[test]
    fn test_create_destination_uses_registered_name() {
        let mut registry = NavigatorRegistry::new();
        registry.register("dialog", OverlayNavigator::new()).unwrap();
        let graph = crate::graph::NavGraphBuilder::new("main", "confirm")
            .destination("main", registry.create_destination("dialog", "confirm").unwrap())
            .build()
            .unwrap();
        assert_eq!(graph.get(&"confirm".into()).unwrap().navigator(), "dialog");
        assert!(registry.create_destination("host", "x").is_err());
    }
}
