//! The fixed, ordered list of animations.

use crate::color::Color;
use crate::error::RegistryError;
use crate::families::SimKind;
use crate::presets::PRESETS;

/// Immutable definition of one animation.
#[derive(Clone, Debug, PartialEq)]
pub struct Descriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// Laid over the previous frame before every step.
    pub backdrop: Color,
    pub kind: SimKind,
}

/// Ordered descriptors, looked up by index.
#[derive(Clone, Debug)]
pub struct Registry {
    descriptors: Vec<Descriptor>,
}

impl Registry {
    pub fn new(descriptors: Vec<Descriptor>) -> Self {
        Self { descriptors }
    }

    /// Every built-in preset, in gallery order.
    pub fn builtin() -> Self {
        let descriptors = PRESETS
            .iter()
            .map(|p| Descriptor { name: p.name, description: p.description, backdrop: p.backdrop, kind: (p.config)() })
            .collect();
        Self { descriptors }
    }

    pub fn get(&self, index: usize) -> Result<&Descriptor, RegistryError> {
        self.descriptors
            .get(index)
            .ok_or(RegistryError::InvalidSelection { index, len: self.descriptors.len() })
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.descriptors.iter().position(|d| d.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.descriptors.iter()
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EffectiveConfig, Knobs};
    use crate::input::InputBus;
    use crate::surface::Dimensions;

    #[test]
    fn test_get_out_of_range() {
        let registry = Registry::builtin();
        let err = registry.get(registry.len()).unwrap_err();
        assert_eq!(err, RegistryError::InvalidSelection { index: registry.len(), len: registry.len() });
    }

    #[test]
    fn test_builtin_order() {
        let registry = Registry::builtin();
        assert_eq!(registry.len(), PRESETS.len());
        assert_eq!(registry.position("🌀 Vortex Flow"), Some(18));
    }

    #[test]
    fn test_every_builtin_initializes() {
        let registry = Registry::builtin();
        for d in registry.iter() {
            let config = EffectiveConfig::new(d, Knobs::new(0.1, 0.3, 350.0), 9);
            let mut input = InputBus::new();
            let mut state = d.kind.init(Dimensions::new(320.0, 240.0), &config, &mut input).unwrap();
            state.teardown(&mut input);
            assert_eq!(input.subscription_count(), 0, "{} leaked a subscription", d.name);
        }
    }
}
