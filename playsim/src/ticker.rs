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
//! Per-level game loop
//!
//! The [`Ticker`] owns everything one level needs to advance: the thinker
//! list, the per-kind update logic and the post-tick plugins. Each call to
//! [`Ticker::run_tick`] walks the list once and then runs the plugins.
//!
//! # Examples
//!
//! ```
//! use playsim::plugins::PluginRegistry;
//! use playsim::thinker::{Door, KindTag, ThinkerId, ThinkerList};
//! use playsim::Ticker;
//!
//! let mut list = ThinkerList::new();
//! list.register(Door::default());
//!
//! let logic = |_: &mut ThinkerList, _: ThinkerId, _: KindTag| {};
//! let mut ticker = Ticker::new(list, logic, PluginRegistry::new()).unwrap();
//! ticker.run_tick().unwrap();
//! assert_eq!(ticker.level_time(), 1);
//! ```

use crate::plugins::{PluginContext, PluginError, PluginRegistry};
use crate::thinker::{ThinkerList, ThinkerLogic};
use tracing::info;

/// Owns one level's thinkers, update logic and plugins
pub struct Ticker<L: ThinkerLogic> {
    list: ThinkerList,
    logic: L,
    plugins: PluginRegistry,
    level_time: u64,
}

impl<L: ThinkerLogic> Ticker<L> {
    /// Build the ticker for a freshly loaded level and initialize its plugins
    pub fn new(mut list: ThinkerList, logic: L, mut plugins: PluginRegistry) -> Result<Self, PluginError> {
        plugins.initialize_all(&mut PluginContext::new(&mut list, 0))?;
        info!(
            thinkers = list.len(),
            plugins = plugins.plugin_count(),
            logic = logic.name(),
            "level_loaded"
        );

        Ok(Ticker {
            list,
            logic,
            plugins,
            level_time: 0,
        })
    }

    /// Advance the level by one tick
    ///
    /// Walks the thinker list, then runs every plugin's post-tick hook with
    /// the updated level time.
    pub fn run_tick(&mut self) -> Result<(), PluginError> {
        self.list.tick(&mut self.logic);
        self.level_time += 1;
        self.plugins
            .post_tick_all(&mut PluginContext::new(&mut self.list, self.level_time))
    }

    /// Tics run since level load
    pub fn level_time(&self) -> u64 {
        self.level_time
    }

    pub fn list(&self) -> &ThinkerList {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ThinkerList {
        &mut self.list
    }

    pub fn logic(&self) -> &L {
        &self.logic
    }

    pub fn logic_mut(&mut self) -> &mut L {
        &mut self.logic
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }

    pub fn plugins_mut(&mut self) -> &mut PluginRegistry {
        &mut self.plugins
    }

    /// Borrow the list and the plugins together, for code that moves
    /// thinkers into or out of plugin state between ticks
    pub fn split_mut(&mut self) -> (&mut ThinkerList, &mut PluginRegistry) {
        (&mut self.list, &mut self.plugins)
    }

    /// Tear the level down
    ///
    /// Plugins shut down in reverse order; the list is handed back for the
    /// caller to clear or drop.
    pub fn shutdown(mut self) -> Result<ThinkerList, PluginError> {
        self.plugins.shutdown_all()?;
        info!(level_time = self.level_time, stats = ?self.list.stats(), "level_shut_down");
        Ok(self.list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plugins::{ItemRespawnPlugin, ITEM_RESPAWN_PLUGIN};
    use crate::thinker::{KindTag, Mobj, MobjFlags, ThinkerId};

    fn idle(_: &mut ThinkerList, _: ThinkerId, _: KindTag) {}

    #[test]
    fn test_run_tick_advances_time() {
        let mut ticker = Ticker::new(ThinkerList::new(), idle, PluginRegistry::new()).unwrap();
        ticker.run_tick().unwrap();
        ticker.run_tick().unwrap();
        assert_eq!(ticker.level_time(), 2);
        assert_eq!(ticker.list().stats().ticks, 2);
    }

    #[test]
    fn test_respawn_runs_after_walk() {
        let mut plugins = PluginRegistry::new();
        plugins
            .register(Box::new(ItemRespawnPlugin::with_settings(2, 8)))
            .unwrap();
        let mut ticker = Ticker::new(ThinkerList::new(), idle, plugins).unwrap();

        let item = ticker
            .list_mut()
            .register(Mobj::new(2011, 0, 0, 0).with_flags(MobjFlags::SPECIAL));
        let level_time = ticker.level_time();
        let (list, plugins) = ticker.split_mut();
        let respawn = plugins
            .downcast_mut::<ItemRespawnPlugin>(ITEM_RESPAWN_PLUGIN)
            .unwrap();
        assert!(respawn.pick_up(list, item, level_time));

        ticker.run_tick().unwrap();
        assert!(ticker.list().is_empty());
        ticker.run_tick().unwrap();
        assert_eq!(ticker.list().len(), 1);
    }

    #[test]
    fn test_shutdown_returns_list() {
        let mut list = ThinkerList::new();
        list.register(Mobj::default());
        let ticker = Ticker::new(list, idle, PluginRegistry::new()).unwrap();
        let list = ticker.shutdown().unwrap();
        assert_eq!(list.len(), 1);
    }
}
