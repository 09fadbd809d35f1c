//! Public operation extraction
//!
//! Walks a parsed declaration and collects the signatures a proxy has to
//! forward, with every type name made absolute.

use crate::source::ast::{Member, TypeDecl, Visibility};
use crate::source::names::NameContext;
use crate::source::parser::parse_source;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

/// One forwarded parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    /// Absolute type (`.a.B`), if declared
    pub ty: Option<String>,
    pub variadic: bool,
    /// Default value, verbatim
    pub default: Option<String>,
}

/// Signature of one public operation of a target type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature {
    pub name: String,
    pub params: Vec<Parameter>,
    /// Absolute return type, if declared
    pub return_type: Option<String>,
    pub is_static: bool,
    /// Declared `final`; a subclass cannot override it
    pub is_final: bool,
}

impl MethodSignature {
    /// Whether a forward of this operation must not `return` a value
    pub fn returns_nothing(&self) -> bool {
        matches!(self.return_type.as_deref(), Some("void") | Some("never"))
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_static {
            write!(f, "static ")?;
        }
        write!(f, "fn {}(", self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if param.variadic {
                write!(f, "...")?;
            }
            write!(f, "{}", param.name)?;
            if let Some(ty) = &param.ty {
                write!(f, ": {}", ty)?;
            }
            if let Some(default) = &param.default {
                write!(f, " = {}", default)?;
            }
        }
        write!(f, ")")?;
        if let Some(ret) = &self.return_type {
            write!(f, " -> {}", ret)?;
        }
        Ok(())
    }
}

/// Parse `text` and return the public operations of `target`, in order
///
/// Never fails: malformed text or a missing declaration yields an empty list.
pub fn extract_public_operations(
    text: &str,
    target: &str,
    runtime: &HashSet<String>,
) -> Vec<MethodSignature> {
    let file = match parse_source(text) {
        Ok(file) => file,
        Err(e) => {
            warn!("Cannot parse declaration of {}: {}", target, e);
            return Vec::new();
        }
    };

    let Some(decl) = file.find(target) else {
        warn!("No declaration of {} in its source file", target);
        return Vec::new();
    };

    let ctx = NameContext::new(&file, runtime).with_self(&file.qualify(&decl.header.name));
    let operations = public_operations(decl, &ctx);
    debug!("Extracted {} public operation(s) from {}", operations.len(), target);
    operations
}

/// Collect public operations of a parsed declaration
///
/// Interface operations are public whether marked or not; bodiless
/// operations are included.
pub fn public_operations(decl: &TypeDecl, ctx: &NameContext<'_>) -> Vec<MethodSignature> {
    let interface = decl.header.is_interface();

    decl.members
        .iter()
        .filter_map(|member| match member {
            Member::Operation(op) => Some(op),
            Member::Field { .. } | Member::Constant { .. } => None,
        })
        .filter(|op| match op.visibility {
            Visibility::Public => true,
            Visibility::Unmarked => interface,
            Visibility::Protected | Visibility::Private => false,
        })
        .map(|op| MethodSignature {
            name: op.name.clone(),
            params: op
                .params
                .iter()
                .map(|p| Parameter {
                    name: p.name.clone(),
                    ty: p.ty.as_ref().map(|ty| ctx.absolute_type(ty).to_string()),
                    variadic: p.variadic,
                    default: p.default.clone(),
                })
                .collect(),
            return_type: op
                .return_type
                .as_ref()
                .map(|ty| ctx.absolute_type(ty).to_string()),
            is_static: op.is_static,
            is_final: op.is_final,
        })
        .collect()
}
