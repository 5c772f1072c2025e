//! # Name → controller type table.
//!
//! The registry backs [`Presenter::present_named`](crate::Presenter::present_named) and
//! deep links. It is filled by the builder and read-only afterwards.
//!
//! ## Rules
//! - Names are case-sensitive and unique; registering a name again replaces the binding.
//! - Lookups never construct anything; they only hand out the blueprint.

use std::collections::HashMap;

use crate::controllers::{Blueprint, ControllerType, Presentable};
use crate::error::PresentError;

/// Controller types addressable by name.
#[derive(Clone, Debug, Default)]
pub struct ControllerRegistry {
    entries: HashMap<String, Blueprint>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name` to `C`; returns the type that was bound before, if any.
    pub fn register<C: Presentable>(&mut self, name: impl Into<String>) -> Option<ControllerType> {
        let name = name.into();
        let previous = self.entries.insert(name.clone(), Blueprint::of::<C>());
        if let Some(prev) = previous {
            tracing::debug!(name = %name, previous = ?prev.kind, "controller name rebound");
        }
        previous.map(|b| b.kind)
    }

    /// Type bound to `name`.
    pub fn kind(&self, name: &str) -> Option<ControllerType> {
        self.entries.get(name).map(|b| b.kind)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn blueprint(&self, name: &str) -> Result<Blueprint, PresentError> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| PresentError::NotRegistered { name: name.to_owned() })
    }
}
