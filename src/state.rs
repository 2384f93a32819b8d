//! Per-call generation state
//!
//! Tracks the JSON pointer path to the node being generated, the current
//! depth, and the pointers at which composite types were first emitted.
//! Path segments are pushed through [`PathScope`] guards which pop on drop, so
//! an error anywhere below still leaves the path balanced.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use crate::config::MapperConfig;
use crate::contract::{Converter, TypeName};
use crate::error::{Result, SchemaError};

/// Key under which an emitted schema can be referenced again
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VisitKey {
    pub type_name: TypeName,
    pub converter: Converter,
    /// Whether `null` was unioned into the emitted schema
    pub nullable: bool,
}

/// Mutable context for one top-level mapping call
#[derive(Debug)]
pub struct GenerationState<'c> {
    config: &'c MapperConfig,
    depth: usize,
    path: Vec<String>,
    visited: HashMap<VisitKey, String>,
}

impl<'c> GenerationState<'c> {
    pub fn new(config: &'c MapperConfig) -> Self {
        Self {
            config,
            depth: 0,
            path: Vec::new(),
            visited: HashMap::new(),
        }
    }

    pub fn config(&self) -> &'c MapperConfig {
        self.config
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// JSON pointer of the node currently being generated
    pub fn pointer(&self) -> String {
        if self.depth == 0 {
            "#".to_string()
        } else {
            format!("#/{}", self.path.join("/"))
        }
    }

    /// Descend into `segment`; the returned scope pops it again when dropped
    pub fn push(&mut self, segment: impl Into<String>) -> Result<PathScope<'_, 'c>> {
        let segment = segment.into();
        if self.depth >= self.config.max_depth {
            let mut path = self.path.clone();
            path.push(segment);
            return Err(SchemaError::DepthExceeded {
                max_depth: self.config.max_depth,
                path: format!("#/{}", path.join("/")),
            });
        }

        self.depth += 1;
        self.path.push(segment);
        Ok(PathScope { state: self })
    }

    fn pop(&mut self) {
        debug_assert!(self.depth > 0);
        self.depth -= 1;
        self.path.pop();
    }

    /// Record the current pointer for `key`.
    ///
    /// A key is registered at most once per call; later registrations of the
    /// same key keep the first pointer. No-op when references are disabled.
    pub fn register(&mut self, key: VisitKey) {
        if !self.config.allow_schema_references {
            return;
        }
        let pointer = self.pointer();
        tracing::trace!(type_name = %key.type_name, %pointer, "registered schema pointer");
        self.visited.entry(key).or_insert(pointer);
    }

    /// Pointer at which `key` was first emitted
    pub fn lookup(&self, key: &VisitKey) -> Option<&str> {
        if !self.config.allow_schema_references {
            return None;
        }
        self.visited.get(key).map(String::as_str)
    }
}

/// A pushed path segment, popped on drop
pub struct PathScope<'s, 'c> {
    state: &'s mut GenerationState<'c>,
}

impl<'c> Deref for PathScope<'_, 'c> {
    type Target = GenerationState<'c>;

    fn deref(&self) -> &Self::Target {
        self.state
    }
}

impl DerefMut for PathScope<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.state
    }
}

impl Drop for PathScope<'_, '_> {
    fn drop(&mut self) {
        self.state.pop();
    }
}
