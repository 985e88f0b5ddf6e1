#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Command Registry: the method table for typed wallet commands.
//!
//! Each command family registers its command types once at startup, naming
//! the JSON-RPC method each type maps to and whether its parameters travel
//! as a positional array or a named object. The builder is then frozen into
//! a [`CommandRegistry`], which is read-only and can be shared between tasks
//! without locking.
//!
//! Lookups go through the command's type, never a caller-supplied string, so
//! a command value can only ever be sent under the method it was registered
//! with.

pub mod command;

use std::any::{type_name, TypeId};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

pub use command::{Command, Field};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a command's parameters are laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamConvention {
    /// Parameters form an ordered array; trailing unset optionals are dropped.
    Positional,
    /// Parameters form a single object keyed by field name.
    Named,
}

impl fmt::Display for ParamConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamConvention::Positional => f.write_str("positional"),
            ParamConvention::Named => f.write_str("named"),
        }
    }
}

/// Errors raised while populating or querying the registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// The method name is already bound to another command type.
    #[error("method '{method}' is already registered to {existing}")]
    DuplicateMethod {
        /// The contested method name.
        method: &'static str,
        /// Type name of the command already registered under it.
        existing: &'static str,
    },
    /// The command type is already bound to a method.
    #[error("command {command} is already registered as '{method}'")]
    DuplicateCommand {
        /// Type name of the command.
        command: &'static str,
        /// The method it is already registered under.
        method: &'static str,
    },
    /// The command type was never registered.
    #[error("{0} is not registered")]
    Unregistered(&'static str),
}

/// What the registry knows about a command type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryEntry {
    /// JSON-RPC method name.
    pub method: &'static str,
    /// Parameter convention.
    pub convention: ParamConvention,
    /// Rust type name of the command, for diagnostics.
    pub command: &'static str,
}

impl RegistryEntry {
    /// Whether parameters are sent as a named object.
    pub fn uses_named_parameters(&self) -> bool { self.convention == ParamConvention::Named }
}

/// Mutable registry used during startup.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    by_type: HashMap<TypeId, RegistryEntry>,
    methods: BTreeMap<&'static str, TypeId>,
}

impl RegistryBuilder {
    /// Create a new empty builder.
    pub fn new() -> Self { Self::default() }

    /// Bind command type `C` to `method` with the given convention.
    ///
    /// Fails if either the method name or the command type is already bound.
    pub fn register<C: Command>(
        &mut self,
        method: &'static str,
        convention: ParamConvention,
    ) -> Result<&mut Self, RegistryError> {
        let type_id = TypeId::of::<C>();
        if let Some(existing) = self.methods.get(method) {
            return Err(RegistryError::DuplicateMethod {
                method,
                existing: self.by_type.get(existing).map_or("<unknown>", |e| e.command),
            });
        }
        if let Some(entry) = self.by_type.get(&type_id) {
            return Err(RegistryError::DuplicateCommand {
                command: type_name::<C>(),
                method: entry.method,
            });
        }

        tracing::trace!(method, %convention, command = type_name::<C>(), "registering command");
        self.methods.insert(method, type_id);
        self.by_type
            .insert(type_id, RegistryEntry { method, convention, command: type_name::<C>() });
        Ok(self)
    }

    /// Freeze the builder into a read-only registry.
    pub fn build(self) -> CommandRegistry {
        CommandRegistry { by_type: self.by_type, methods: self.methods }
    }
}

/// A frozen table of registered commands.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    by_type: HashMap<TypeId, RegistryEntry>,
    methods: BTreeMap<&'static str, TypeId>,
}

impl CommandRegistry {
    /// Resolve a command value to its registry entry.
    pub fn lookup<C: Command>(&self, _command: &C) -> Result<&RegistryEntry, RegistryError> {
        self.by_type
            .get(&TypeId::of::<C>())
            .ok_or_else(|| RegistryError::Unregistered(type_name::<C>()))
    }
}

/// Read-only interface to the registry.
///
/// Provides method-name queries without exposing the type-keyed lookup used
/// for marshaling.
pub trait CommandRegistryReader {
    /// Get all method names in the registry, sorted.
    fn list_methods(&self) -> Vec<&'static str>;

    /// Get the entry registered under a method name.
    ///
    /// Returns `None` if no command uses that name.
    fn get_method(&self, name: &str) -> Option<&RegistryEntry>;

    /// Get the total number of registered commands.
    fn method_count(&self) -> usize;
}

impl CommandRegistryReader for CommandRegistry {
    fn list_methods(&self) -> Vec<&'static str> { self.methods.keys().copied().collect() }

    fn get_method(&self, name: &str) -> Option<&RegistryEntry> {
        self.methods.get(name).and_then(|id| self.by_type.get(id))
    }

    fn method_count(&self) -> usize { self.methods.len() }
}
