//! # Accessory Type Registry
//!
//! Maps accessory "type" strings reported by the bridge to the UI component
//! key that renders them, and exposes deferred loaders for those components.
//!
//! ## Lookup Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Accessory Rendering Pipeline                          │
//! │                                                                         │
//! │  Bridge reports accessory { type: "outlet", ... }                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  classify("outlet") ──► Some(ComponentKey::SwitchAccessory)            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  component_loaders()[SwitchAccessory]() ──► future ──► AccessoryModule │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Loader collaborator renders the widget (and caches the module -       │
//! │  caching is NOT this registry's job; thunks are repeatable)            │
//! │                                                                         │
//! │  classify("thermostat") ──► None (caller decides the fallback)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Component Keys
// =============================================================================

/// The closed set of accessory UI component keys.
///
/// Serialized with the kebab-case names the dashboard bundles use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ComponentKey {
    /// Dimmable and color lights.
    #[serde(rename = "light-accessory")]
    LightAccessory,

    /// Switches and outlets share one widget.
    #[serde(rename = "switch-accessory")]
    SwitchAccessory,

    /// Fans with speed control.
    #[serde(rename = "fan-accessory")]
    FanAccessory,
}

impl ComponentKey {
    /// Returns the component key as the dashboard bundle identifier.
    pub const fn as_str(&self) -> &'static str {
        match self {
            ComponentKey::LightAccessory => "light-accessory",
            ComponentKey::SwitchAccessory => "switch-accessory",
            ComponentKey::FanAccessory => "fan-accessory",
        }
    }
}

impl fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Maps an accessory type string to its UI component key.
///
/// ## Contract
/// - `"light"` → `LightAccessory`
/// - `"switch"` and `"outlet"` → `SwitchAccessory`
/// - `"fan"` → `FanAccessory`
/// - anything else → `None` (the caller must handle unknown types)
///
/// Total function: never panics, never errors.
pub fn classify(kind: &str) -> Option<ComponentKey> {
    match kind {
        "light" => Some(ComponentKey::LightAccessory),
        "switch" | "outlet" => Some(ComponentKey::SwitchAccessory),
        "fan" => Some(ComponentKey::FanAccessory),
        _ => None,
    }
}

// =============================================================================
// Deferred Component Loaders
// =============================================================================

/// A resolved accessory UI module descriptor.
///
/// The component bodies live in the dashboard frontend; this descriptor
/// tells the loader collaborator which bundle to mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct AccessoryModule {
    /// The component key this module satisfies.
    pub key: ComponentKey,

    /// Bundle path of the widget inside the dashboard frontend.
    pub component: &'static str,
}

/// A boxed future resolving to an accessory module.
pub type LoaderFuture = Pin<Box<dyn Future<Output = AccessoryModule> + Send>>;

/// A zero-argument deferred-load thunk.
///
/// Thunks are idempotent and repeatable: callers may invoke one any number
/// of times and each call resolves to the same module. Caching the resolved
/// module is the loader collaborator's responsibility.
pub type ComponentLoader = fn() -> LoaderFuture;

fn load_light() -> LoaderFuture {
    Box::pin(async {
        AccessoryModule {
            key: ComponentKey::LightAccessory,
            component: "accessories/light",
        }
    })
}

fn load_switch() -> LoaderFuture {
    Box::pin(async {
        AccessoryModule {
            key: ComponentKey::SwitchAccessory,
            component: "accessories/switch",
        }
    })
}

fn load_fan() -> LoaderFuture {
    Box::pin(async {
        AccessoryModule {
            key: ComponentKey::FanAccessory,
            component: "accessories/fan",
        }
    })
}

/// Returns the deferred loader for every known component key.
///
/// The map contains exactly the three keys of [`ComponentKey`]; loaders may
/// resolve at arbitrary later times and have no ordering relationship with
/// each other or with state mutations.
pub fn component_loaders() -> HashMap<ComponentKey, ComponentLoader> {
    let mut loaders: HashMap<ComponentKey, ComponentLoader> = HashMap::new();

    loaders.insert(ComponentKey::LightAccessory, load_light);
    loaders.insert(ComponentKey::SwitchAccessory, load_switch);
    loaders.insert(ComponentKey::FanAccessory, load_fan);

    loaders
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_types() {
        assert_eq!(classify("light"), Some(ComponentKey::LightAccessory));
        assert_eq!(classify("switch"), Some(ComponentKey::SwitchAccessory));
        assert_eq!(classify("outlet"), Some(ComponentKey::SwitchAccessory));
        assert_eq!(classify("fan"), Some(ComponentKey::FanAccessory));
    }

    #[test]
    fn test_classify_unknown_types() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("thermostat"), None);
        assert_eq!(classify("Light"), None); // case sensitive
        assert_eq!(classify("light-accessory"), None); // keys are not types
    }

    #[test]
    fn test_component_key_strings() {
        assert_eq!(ComponentKey::LightAccessory.as_str(), "light-accessory");
        assert_eq!(ComponentKey::SwitchAccessory.to_string(), "switch-accessory");
        assert_eq!(
            serde_json::to_string(&ComponentKey::FanAccessory).unwrap(),
            "\"fan-accessory\""
        );
    }

    #[test]
    fn test_loaders_cover_exactly_the_known_keys() {
        let loaders = component_loaders();

        assert_eq!(loaders.len(), 3);
        assert!(loaders.contains_key(&ComponentKey::LightAccessory));
        assert!(loaders.contains_key(&ComponentKey::SwitchAccessory));
        assert!(loaders.contains_key(&ComponentKey::FanAccessory));
    }

    #[tokio::test]
    async fn test_loaders_resolve_to_matching_modules() {
        let loaders = component_loaders();

        for (key, loader) in loaders {
            let module = loader().await;
            assert_eq!(module.key, key);
        }
    }

    #[tokio::test]
    async fn test_loaders_are_repeatable() {
        let loaders = component_loaders();
        let loader = loaders[&ComponentKey::FanAccessory];

        let first = loader().await;
        let second = loader().await;

        assert_eq!(first, second);
        assert_eq!(first.component, "accessories/fan");
    }
}
