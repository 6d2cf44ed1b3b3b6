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
//! Plugin registry
//!
//! This module provides the registry for managing plugins, including:
//! - Registration with duplicate and API version checks
//! - Dependency resolution and circular dependency detection
//! - Deterministic hook order: dependencies first, then registration order

use crate::plugins::api::{Plugin, PluginContext, PLUGIN_API_VERSION};
use semver::Version;
use std::collections::{HashMap, VecDeque};
use thiserror::Error;
use tracing::info;

/// Errors raised by the [`PluginRegistry`]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PluginError {
    #[error("plugin '{0}' is already registered")]
    Duplicate(String),

    #[error("plugin '{name}' API version {found} is incompatible with engine API version {expected}")]
    IncompatibleVersion {
        name: String,
        found: String,
        expected: &'static str,
    },

    #[error("plugin '{plugin}' depends on '{dependency}' which is not registered")]
    MissingDependency { plugin: String, dependency: String },

    #[error("circular dependency detected among plugins: {}", .0.join(", "))]
    DependencyCycle(Vec<String>),

    #[error("plugin '{plugin}' failed during {stage}: {message}")]
    HookFailed {
        plugin: String,
        stage: &'static str,
        message: String,
    },

    #[error("plugin registry is already initialized")]
    AlreadyInitialized,

    #[error("plugin registry is not initialized")]
    NotInitialized,
}

/// Registry for managing and running plugins
pub struct PluginRegistry {
    /// Registered plugins indexed by name
    plugins: HashMap<String, Box<dyn Plugin>>,
    /// Names in registration order
    registered: Vec<String>,
    /// Hook order, filled by `initialize_all`
    load_order: Vec<String>,
    initialized: bool,
}

impl PluginRegistry {
    pub fn new() -> Self {
        PluginRegistry {
            plugins: HashMap::new(),
            registered: Vec::new(),
            load_order: Vec::new(),
            initialized: false,
        }
    }

    /// Register a plugin
    ///
    /// Fails if a plugin with the same name is registered, if the plugin's API
    /// version is incompatible, or if the registry is already initialized.
    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> Result<(), PluginError> {
        if self.initialized {
            return Err(PluginError::AlreadyInitialized);
        }

        let name = plugin.name().to_string();
        if self.plugins.contains_key(&name) {
            return Err(PluginError::Duplicate(name));
        }

        let api_version = plugin.api_version();
        if !is_version_compatible(api_version, PLUGIN_API_VERSION) {
            return Err(PluginError::IncompatibleVersion {
                found: api_version.to_string(),
                name,
                expected: PLUGIN_API_VERSION,
            });
        }

        self.registered.push(name.clone());
        self.plugins.insert(name, plugin);
        Ok(())
    }

    /// Resolve the dependency order and initialize every plugin
    pub fn initialize_all(&mut self, context: &mut PluginContext) -> Result<(), PluginError> {
        if self.initialized {
            return Err(PluginError::AlreadyInitialized);
        }

        let mut dependencies: Vec<(String, Vec<String>)> = Vec::with_capacity(self.registered.len());
        for name in &self.registered {
            let plugin = &self.plugins[name];
            let deps: Vec<String> = plugin.dependencies().iter().map(|s| s.to_string()).collect();
            for dep in &deps {
                if !self.plugins.contains_key(dep) {
                    return Err(PluginError::MissingDependency {
                        plugin: name.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
            dependencies.push((name.clone(), deps));
        }

        self.load_order = topological_sort(&dependencies)?;

        for name in &self.load_order {
            if let Some(plugin) = self.plugins.get_mut(name) {
                plugin
                    .initialize(context)
                    .map_err(|message| hook_failed(name, "initialize", message))?;
                info!(plugin = %name, version = plugin.version(), "plugin_initialized");
            }
        }

        self.initialized = true;
        Ok(())
    }

    /// Run every plugin's post-tick hook in load order
    pub fn post_tick_all(&mut self, context: &mut PluginContext) -> Result<(), PluginError> {
        if !self.initialized {
            return Err(PluginError::NotInitialized);
        }

        for name in &self.load_order {
            if let Some(plugin) = self.plugins.get_mut(name) {
                plugin
                    .post_tick(context)
                    .map_err(|message| hook_failed(name, "post_tick", message))?;
            }
        }
        Ok(())
    }

    /// Shut plugins down in reverse load order
    pub fn shutdown_all(&mut self) -> Result<(), PluginError> {
        if !self.initialized {
            return Ok(());
        }

        for name in self.load_order.iter().rev() {
            if let Some(plugin) = self.plugins.get_mut(name) {
                plugin
                    .shutdown()
                    .map_err(|message| hook_failed(name, "shutdown", message))?;
                info!(plugin = %name, "plugin_shut_down");
            }
        }

        self.initialized = false;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.plugins.get(name).map(|p| p.as_ref())
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Plugin + '_)> {
        self.plugins
            .get_mut(name)
            .map(|p| &mut **p as &mut (dyn Plugin + '_))
    }

    /// Look up a plugin by name and downcast it to its concrete type
    pub fn downcast<P: Plugin + 'static>(&self, name: &str) -> Option<&P> {
        self.get(name)?.as_any().downcast_ref::<P>()
    }

    pub fn downcast_mut<P: Plugin + 'static>(&mut self, name: &str) -> Option<&mut P> {
        self.get_mut(name)?.as_any_mut().downcast_mut::<P>()
    }

    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Names of plugins in the order their hooks run
    pub fn load_order(&self) -> &[String] {
        &self.load_order
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn hook_failed(plugin: &str, stage: &'static str, message: String) -> PluginError {
    PluginError::HookFailed {
        plugin: plugin.to_string(),
        stage,
        message,
    }
}

/// Check if a plugin API version is compatible with the engine
///
/// Uses semantic versioning rules:
/// - Major version must match
/// - For major version 0.x.y, minor versions must match (breaking changes)
/// - For major version >= 1, minor version can be less than or equal
/// - Patch version is ignored
fn is_version_compatible(plugin_version: &str, engine_version: &str) -> bool {
    let (plugin_ver, engine_ver) = match (
        Version::parse(plugin_version),
        Version::parse(engine_version),
    ) {
        (Ok(plugin), Ok(engine)) => (plugin, engine),
        _ => return false,
    };

    if plugin_ver.major != engine_ver.major {
        return false;
    }

    if plugin_ver.major != 0 {
        plugin_ver.minor <= engine_ver.minor
    } else {
        plugin_ver.minor == engine_ver.minor
    }
}

/// Order plugins so each follows its dependencies
///
/// Ties are broken by position in `dependencies`, so the result is stable
/// across runs. Returns the names left unsorted if they form a cycle.
fn topological_sort(dependencies: &[(String, Vec<String>)]) -> Result<Vec<String>, PluginError> {
    let position: HashMap<&str, usize> = dependencies
        .iter()
        .enumerate()
        .map(|(i, (name, _))| (name.as_str(), i))
        .collect();

    let mut in_degree = vec![0usize; dependencies.len()];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); dependencies.len()];
    for (i, (_, deps)) in dependencies.iter().enumerate() {
        for dep in deps {
            if let Some(&d) = position.get(dep.as_str()) {
                dependents[d].push(i);
                in_degree[i] += 1;
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..dependencies.len())
        .filter(|&i| in_degree[i] == 0)
        .collect();
    let mut sorted = Vec::with_capacity(dependencies.len());

    while let Some(node) = queue.pop_front() {
        sorted.push(dependencies[node].0.clone());
        for &dependent in &dependents[node] {
            in_degree[dependent] -= 1;
            if in_degree[dependent] == 0 {
                queue.push_back(dependent);
            }
        }
    }

    if sorted.len() != dependencies.len() {
        let stuck = (0..dependencies.len())
            .filter(|&i| in_degree[i] > 0)
            .map(|i| dependencies[i].0.clone())
            .collect();
        return Err(PluginError::DependencyCycle(stuck));
    }

    Ok(sorted)
}
