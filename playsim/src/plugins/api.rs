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
//! Plugin API traits and context for post-tick collaborators
//!
//! Plugins run after the tick walk has finished. They see the whole thinker
//! list and may register, mark or retarget thinkers, but never run inside the
//! walk itself.

use crate::thinker::ThinkerList;
use std::any::Any;

/// Version of the plugin API
///
/// Format: MAJOR.MINOR.PATCH following semantic versioning.
pub const PLUGIN_API_VERSION: &str = "0.1.0";

/// Context handed to plugin hooks
pub struct PluginContext<'a> {
    list: &'a mut ThinkerList,
    level_time: u64,
}

impl<'a> PluginContext<'a> {
    /// Create a new plugin context
    ///
    /// Plugins receive contexts from the [`Ticker`](crate::Ticker); tests and
    /// custom loops may build their own.
    pub fn new(list: &'a mut ThinkerList, level_time: u64) -> Self {
        PluginContext { list, level_time }
    }

    pub fn list(&self) -> &ThinkerList {
        self.list
    }

    pub fn list_mut(&mut self) -> &mut ThinkerList {
        self.list
    }

    /// Tics elapsed since level load, counting the tick just walked
    pub fn level_time(&self) -> u64 {
        self.level_time
    }
}

/// Lifecycle hooks for plugins
pub trait Plugin {
    /// Get the name of this plugin
    ///
    /// Must be unique across all registered plugins.
    fn name(&self) -> &str;

    /// Get the version of this plugin
    fn version(&self) -> &str;

    /// Get the plugin API version this plugin was built against
    fn api_version(&self) -> &str {
        PLUGIN_API_VERSION
    }

    /// Names of plugins that must be initialized (and run) before this one
    fn dependencies(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Called once at level load, in dependency order
    fn initialize(&mut self, _context: &mut PluginContext) -> Result<(), String> {
        Ok(())
    }

    /// Called after every tick walk, in dependency order
    fn post_tick(&mut self, _context: &mut PluginContext) -> Result<(), String> {
        Ok(())
    }

    /// Called once at level teardown, in reverse dependency order
    fn shutdown(&mut self) -> Result<(), String> {
        Ok(())
    }

    /// Allow downcasting to concrete plugin types
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
