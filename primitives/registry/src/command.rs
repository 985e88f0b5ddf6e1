//! Command values and their parameter tables.
//!
//! A command declares its parameters as an ordered table of [`Field`]s. The
//! request builder walks that table instead of inspecting the command at
//! runtime, so the order and optionality of every parameter is fixed where
//! the command is defined.

use serde::Serialize;
use serde_json::Value;

/// A typed JSON-RPC command.
///
/// Implementors are plain value types created per call. The method name and
/// parameter convention are not part of the trait: they are attached when the
/// type is registered in a [`crate::CommandRegistry`].
pub trait Command: Send + Sync + 'static {
    /// The command's parameters in declaration order.
    fn fields(&self) -> Vec<Field>;
}

/// One entry of a command's parameter table.
#[derive(Debug)]
pub struct Field {
    name: &'static str,
    optional: bool,
    value: Option<Result<Value, serde_json::Error>>,
}

impl Field {
    /// A parameter that is always sent.
    pub fn required<T: Serialize + ?Sized>(name: &'static str, value: &T) -> Self {
        Self { name, optional: false, value: Some(serde_json::to_value(value)) }
    }

    /// A parameter that may be left unset.
    pub fn optional<T: Serialize>(name: &'static str, value: Option<&T>) -> Self {
        Self { name, optional: true, value: value.map(serde_json::to_value) }
    }

    /// The field name, used as the key for named parameters and to tag
    /// marshal errors.
    pub fn name(&self) -> &'static str { self.name }

    /// Whether the field was declared optional.
    pub fn is_optional(&self) -> bool { self.optional }

    /// Whether the field carries a value.
    pub fn is_set(&self) -> bool { self.value.is_some() }

    /// Consume the field, yielding its serialized value if set.
    pub fn into_value(self) -> Option<Result<Value, serde_json::Error>> { self.value }
}
