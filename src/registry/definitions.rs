//! View Registry
//!
//! In-memory table of view definitions keyed by view name.
//! Removal leaves a tombstone so a name can be registered again,
//! while a second live registration is rejected.

use crate::error::{Result, ViewError};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Registration state of a single view name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionState<'a> {
    /// Never registered
    Unset,
    /// Registered with a normalized body
    Live(&'a str),
    /// Registered once, then unregistered
    Removed,
}

impl<'a> DefinitionState<'a> {
    pub fn is_live(&self) -> bool {
        matches!(self, DefinitionState::Live(_))
    }

    pub fn body(&self) -> Option<&'a str> {
        match *self {
            DefinitionState::Live(body) => Some(body),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
enum Slot {
    Live(String),
    Removed,
}

/// Registry of view definitions owned by a single orchestrator
#[derive(Debug, Clone)]
pub struct ViewRegistry {
    definitions: BTreeMap<String, Slot>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self {
            definitions: BTreeMap::new(),
        }
    }

    /// Register a view definition and return the normalized body
    pub fn register(&mut self, name: &str, definition: &str) -> Result<String> {
        if name.is_empty() {
            return Err(ViewError::InvalidName {
                name: name.to_string(),
            });
        }

        if self.state(name).is_live() {
            return Err(ViewError::DuplicateDefinition {
                name: name.to_string(),
            });
        }

        let body = normalize_definition(definition);
        debug!("Registered view {} ({} bytes)", name, body.len());

        self.definitions
            .insert(name.to_string(), Slot::Live(body.clone()));

        Ok(body)
    }

    /// Register a definition supplied as an untyped value (e.g. from a JSON manifest).
    ///
    /// The duplicate check runs before the type check, so a live name reports
    /// `DuplicateDefinition` whatever the value is.
    pub fn register_value(&mut self, name: &str, definition: &Value) -> Result<String> {
        if self.state(name).is_live() {
            return Err(ViewError::DuplicateDefinition {
                name: name.to_string(),
            });
        }

        match definition {
            Value::String(sql) => self.register(name, sql),
            other => Err(ViewError::InvalidDefinition {
                name: name.to_string(),
                definition: other.to_string(),
            }),
        }
    }

    /// Mark a name as removed, whether or not it held a definition
    pub fn unregister(&mut self, name: &str) {
        if let Some(Slot::Live(_)) = self
            .definitions
            .insert(name.to_string(), Slot::Removed)
        {
            debug!("Unregistered view {}", name);
        }
    }

    pub fn get_definition(&self, name: &str) -> Option<&str> {
        self.state(name).body()
    }

    pub fn state(&self, name: &str) -> DefinitionState<'_> {
        match self.definitions.get(name) {
            None => DefinitionState::Unset,
            Some(Slot::Live(body)) => DefinitionState::Live(body),
            Some(Slot::Removed) => DefinitionState::Removed,
        }
    }

    /// Snapshot of every live (name, body) pair
    pub fn live_definitions(&self) -> Vec<(String, String)> {
        self.definitions
            .iter()
            .filter_map(|(name, slot)| match slot {
                Slot::Live(body) => Some((name.clone(), body.clone())),
                Slot::Removed => None,
            })
            .collect()
    }

    pub fn names(&self) -> Vec<String> {
        self.live_definitions()
            .into_iter()
            .map(|(name, _)| name)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.definitions
            .values()
            .filter(|slot| matches!(slot, Slot::Live(_)))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ViewRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim surrounding whitespace and strip exactly one trailing semicolon
pub fn normalize_definition(definition: &str) -> String {
    let trimmed = definition.trim();
    match trimmed.strip_suffix(';') {
        Some(body) => body.trim_end().to_string(),
        None => trimmed.to_string(),
    }
}
