//! Configuration for a universe.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a [`Universe`](crate::Universe).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UniverseConfig {
    /// Global name registered for the root entity.
    pub root_name: Option<String>,

    /// Whether newly created entities may be erased by name.
    pub default_can_be_erased: bool,

    /// Whether a newly created scene becomes the active scene.
    pub activate_new_scenes: bool,

    /// Deepest allowed entity depth (root is depth 0). `None` = unlimited.
    pub max_depth: Option<usize>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            root_name: Some("universe".to_string()),
            default_can_be_erased: true,
            activate_new_scenes: true,
            max_depth: None,
        }
    }
}

impl UniverseConfig {
    /// Configuration for tools and tests: unnamed root, no scene activation.
    #[must_use]
    pub fn headless() -> Self {
        Self {
            root_name: None,
            activate_new_scenes: false,
            ..Self::default()
        }
    }

    /// Builder method to set the root name.
    #[must_use]
    pub fn with_root_name(mut self, name: impl Into<String>) -> Self {
        self.root_name = Some(name.into());
        self
    }

    /// Builder method to leave the root unnamed.
    #[must_use]
    pub fn without_root_name(mut self) -> Self {
        self.root_name = None;
        self
    }

    /// Builder method to set the erasability default.
    #[must_use]
    pub fn with_default_can_be_erased(mut self, can_be_erased: bool) -> Self {
        self.default_can_be_erased = can_be_erased;
        self
    }

    /// Builder method to enable/disable scene activation on creation.
    #[must_use]
    pub fn with_activate_new_scenes(mut self, activate: bool) -> Self {
        self.activate_new_scenes = activate;
        self
    }

    /// Builder method to limit tree depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }
}
