//! Structural classification of target types
//!
//! The category decides which builder strategy can stand in for a target.

use crate::source::TypeHeader;
use serde::Serialize;
use std::fmt;

/// Structural category of a target type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TargetClassification {
    /// Declared `final`; cannot be extended
    Final,
    /// Interface provided by the runtime, with no declaration source
    InternalInterface,
    /// Interface extending one or more interfaces
    NestedInterface,
    /// Abstract class whose parent is abstract too
    NestedAbstract,
    PlainInterface,
    PlainClass,
}

impl TargetClassification {
    /// Shapes too ambiguous to proxy by inheritance
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::Final | Self::InternalInterface | Self::NestedInterface | Self::NestedAbstract
        )
    }
}

impl fmt::Display for TargetClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Final => "final",
            Self::InternalInterface => "internal-interface",
            Self::NestedInterface => "nested-interface",
            Self::NestedAbstract => "nested-abstract",
            Self::PlainInterface => "plain-interface",
            Self::PlainClass => "plain-class",
        };
        write!(f, "{}", name)
    }
}

/// What is known about a target's declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetShape {
    /// Runtime-provided interface; nothing to parse
    RuntimeInterface,
    /// Parsed header, plus the parent class header when one was found
    Declared {
        header: TypeHeader,
        parent: Option<TypeHeader>,
    },
}

/// Classify a target. Rules are evaluated in order; first match wins.
pub fn classify(shape: &TargetShape) -> TargetClassification {
    let (header, parent) = match shape {
        TargetShape::RuntimeInterface => return TargetClassification::InternalInterface,
        TargetShape::Declared { header, parent } => (header, parent.as_ref()),
    };

    if header.is_final {
        return TargetClassification::Final;
    }

    if header.is_interface() {
        return if header.extends.is_empty() {
            TargetClassification::PlainInterface
        } else {
            TargetClassification::NestedInterface
        };
    }

    if header.is_abstract && parent.is_some_and(|p| p.is_abstract) {
        return TargetClassification::NestedAbstract;
    }

    TargetClassification::PlainClass
}
