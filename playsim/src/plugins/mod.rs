// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Post-tick plugins
//!
//! Plugins are the collaborators that run global per-tick post-processing
//! once the tick walk has finished: item respawns, level specials, demo
//! bookkeeping. Each plugin declares a name, a version, the plugin API
//! version it targets and the plugins it depends on.
//!
//! ```rust,ignore
//! use playsim::plugins::{ItemRespawnPlugin, PluginRegistry};
//!
//! let mut registry = PluginRegistry::new();
//! registry.register(Box::new(ItemRespawnPlugin::new()))?;
//! ```
//!
//! The registry will:
//! - Reject duplicate names and incompatible API versions
//! - Verify all dependencies are registered
//! - Run hooks in dependency order, breaking ties by registration order
//! - Detect and reject circular dependencies
//!
//! # Version Compatibility
//!
//! The plugin API follows semantic versioning. While the API is 0.x, a
//! plugin must target the same minor version as the engine; from 1.0 on, a
//! plugin may target any minor version up to the engine's.

pub mod api;
pub mod registry;
pub mod respawn;

pub use api::{Plugin, PluginContext, PLUGIN_API_VERSION};
pub use registry::{PluginError, PluginRegistry};
pub use respawn::{
    ItemRespawnPlugin, DEFAULT_QUEUE_CAPACITY, DEFAULT_RESPAWN_DELAY, ITEM_RESPAWN_PLUGIN, TICRATE,
};

/// Register a plugin, panicking on failure
///
/// ```rust,ignore
/// register_plugin!(registry, ItemRespawnPlugin::new());
/// ```
#[macro_export]
macro_rules! register_plugin {
    ($registry:expr, $plugin:expr) => {
        $registry
            .register(Box::new($plugin))
            .expect("Failed to register plugin")
    };
}
