//! Name-keyed generator factories.
use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::generator::child::ChildDepositGenerator;
use crate::generator::disc::{DiscDepositGenerator, DiscShape};
use crate::generator::{DepositGenerator, GeneratorArgs};

/// Builds a generator for one deposit variant.
pub type GeneratorFactory =
    Arc<dyn Fn(&GeneratorArgs<'_>) -> Box<dyn DepositGenerator> + Send + Sync>;

/// Maps generator names used in deposit configuration to factories.
#[derive(Clone, Default)]
pub struct GeneratorRegistry {
    factories: HashMap<String, GeneratorFactory>,
}

impl GeneratorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the disc shapes and the child generator registered.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        for shape in [
            DiscShape::Anywhere,
            DiscShape::FollowSurface,
            DiscShape::FollowSealevel,
        ] {
            registry.register(shape.generator_name(), move |args: &GeneratorArgs<'_>| {
                Box::new(DiscDepositGenerator::new(args, shape)) as Box<dyn DepositGenerator>
            });
        }
        registry.register(ChildDepositGenerator::NAME, |args: &GeneratorArgs<'_>| {
            Box::new(ChildDepositGenerator::new(args)) as Box<dyn DepositGenerator>
        });
        registry
    }

    /// Registers `factory` under `name`, replacing an existing entry.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(&GeneratorArgs<'_>) -> Box<dyn DepositGenerator> + Send + Sync + 'static,
    {
        let name = name.into();
        debug!("Registering deposit generator '{}'", name);
        self.factories.insert(name, Arc::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Creates a generator, or `None` if no factory is registered under `name`.
    pub fn create(
        &self,
        name: &str,
        args: &GeneratorArgs<'_>,
    ) -> Option<Box<dyn DepositGenerator>> {
        self.factories.get(name).map(|factory| factory(args))
    }
}

impl std::fmt::Debug for GeneratorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorRegistry")
            .field("names", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_names_are_registered() {
        let registry = GeneratorRegistry::with_builtin();
        assert_eq!(
            registry.names(),
            vec![
                "childdeposit",
                "disc-anywhere",
                "disc-followsealevel",
                "disc-followsurface"
            ]
        );
        assert!(!registry.contains("disc-nowhere"));
    }

    #[test]
    fn empty_registry_has_no_names() {
        let registry = GeneratorRegistry::new();
        assert!(registry.names().is_empty());
    }
}
