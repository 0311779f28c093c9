use std::collections::HashMap;

use tracing::debug;

use super::{EffectHandler, ModifierInfo};

/// Maps effect names to handler implementations.
#[derive(Debug, Clone, Default)]
pub struct HandlerRegistry {
    builtins: HashMap<String, EffectHandler>,
}

impl HandlerRegistry {
    /// Registry with no built-in handlers; every effect resolves from its
    /// declared modifiers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the engine's built-in handlers.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("remoteWebifierEntity", EffectHandler::RemoteWebifier);
        registry.register("remoteWebifierFalloff", EffectHandler::RemoteWebifier);
        registry.register("online", EffectHandler::Noop);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, handler: EffectHandler) {
        self.builtins.insert(name.into(), handler);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.builtins.contains_key(name)
    }

    /// Pick the handler for an effect.
    ///
    /// A built-in registered under `name` wins over declared modifiers.
    pub fn resolve(&self, name: &str, modifiers: Vec<ModifierInfo>) -> EffectHandler {
        if let Some(handler) = self.builtins.get(name) {
            if !modifiers.is_empty() {
                debug!(effect = name, "ignoring declared modifiers for built-in handler");
            }
            return handler.clone();
        }
        if modifiers.is_empty() {
            EffectHandler::Noop
        } else {
            EffectHandler::Modifiers(modifiers)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::Operation;
    use crate::effects::ModifierDomain;

    fn velocity_bonus() -> ModifierInfo {
        ModifierInfo {
            domain: ModifierDomain::Ship,
            filter_group: None,
            operation: Operation::PostPercent,
            source: "velocityBonus".to_string(),
            target: "maxVelocity".to_string(),
            stacking_penalties: false,
        }
    }

    #[test]
    fn builtin_wins_over_declared_modifiers() {
        let registry = HandlerRegistry::builtin();
        assert_eq!(
            registry.resolve("remoteWebifierEntity", vec![velocity_bonus()]),
            EffectHandler::RemoteWebifier
        );
    }

    #[test]
    fn unknown_names_fall_back_to_declarations() {
        let registry = HandlerRegistry::empty();
        assert!(!registry.contains("remoteWebifierEntity"));
        assert_eq!(
            registry.resolve("overdrive", vec![velocity_bonus()]),
            EffectHandler::Modifiers(vec![velocity_bonus()])
        );
        assert_eq!(registry.resolve("overdrive", Vec::new()), EffectHandler::Noop);
    }
}
