//! Proxy source builders
//!
//! A [`Strategy`] turns a target's public operations into the declaration of
//! a stand-in type. Every strategy emits the same skeleton:
//!
//! ```text
//! // header comment
//! namespace <proxy namespace>;
//!
//! class <Name> [extends T | implements T] {
//!     instance accessor (resolves through the container)
//!     one forwarding operation per public operation of T
//! }
//! ```
//!
//! | Strategy  | Relationship     | Instance state        |
//! |-----------|------------------|-----------------------|
//! | Class     | `extends T`      | cached in a field     |
//! | Interface | `implements T`   | none, resolved per call |
//! | Fallback  | none             | cached in a field     |

mod emit;

pub use emit::proxy_class_name;

use crate::classify::TargetClassification;
use crate::config::schema::ProxyConfig;
use crate::source::names::absolute;
use crate::source::MethodSignature;
use emit::{string_literal, SourceWriter};
use serde::Serialize;
use std::fmt;

const INSTANCE_FIELD: &str = "__instance";
const RESOLVE_FN: &str = "__resolve";

/// Settings shared by every generated proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyTemplate {
    /// Namespace the proxy is declared in
    pub namespace: String,
    /// Callable receiving the identifier and returning the real instance
    pub container_accessor: String,
}

impl Default for ProxyTemplate {
    fn default() -> Self {
        Self::from(&ProxyConfig::default())
    }
}

impl From<&ProxyConfig> for ProxyTemplate {
    fn from(config: &ProxyConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            container_accessor: config.container_accessor.clone(),
        }
    }
}

/// Input of a single build
#[derive(Debug, Clone, Copy)]
pub struct BuildRequest<'a> {
    pub template: &'a ProxyTemplate,
    pub identifier: &'a str,
    /// Fully-qualified target type
    pub target: &'a str,
    pub classification: TargetClassification,
    pub operations: &'a [MethodSignature],
}

/// Code-synthesis strategy for a proxy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Class,
    Interface,
    Fallback,
}

impl Strategy {
    /// Select the strategy able to stand in for a classified target
    pub fn for_classification(classification: TargetClassification) -> Self {
        match classification {
            c if c.is_unsupported() => Self::Fallback,
            TargetClassification::PlainInterface => Self::Interface,
            _ => Self::Class,
        }
    }

    /// Emit the full declaration text of the proxy
    pub fn build(&self, request: &BuildRequest<'_>) -> String {
        let target = absolute(request.target);
        let class_name = proxy_class_name(request.identifier);
        let lookup = format!(
            "{}({})",
            request.template.container_accessor,
            string_literal(request.identifier)
        );

        let mut w = SourceWriter::new();
        w.line("// Lazy proxy generated by lazyproxy. Do not edit.")
            .line(format!("// identifier: {}", request.identifier))
            .line(format!("// target: {}", request.target))
            .line(format!("// strategy: {}", self));
        if *self == Self::Fallback {
            w.line(format!(
                "// fallback: target is {}, no type relationship declared",
                request.classification
            ));
        }
        w.line(format!("namespace {};", request.template.namespace))
            .blank();

        let header = match self {
            Self::Class => format!("class {} extends {}", class_name, target),
            Self::Interface => format!("class {} implements {}", class_name, target),
            Self::Fallback => format!("class {}", class_name),
        };

        w.block(header, |w| {
            self.write_accessor(w, &target, &lookup);
            for op in request.operations {
                w.blank();
                if op.is_final && *self == Self::Class {
                    w.line(format!("// {}: final in {}, inherited unproxied", op.name, target));
                    continue;
                }
                write_forward(w, op, &target);
            }
        });

        w.finish()
    }

    fn write_accessor(&self, w: &mut SourceWriter, target: &str, lookup: &str) {
        let signature = format!("private fn {}() -> {}", RESOLVE_FN, target);
        match self {
            Self::Interface => {
                w.block(signature, |w| {
                    w.line(format!("return {};", lookup));
                });
            }
            Self::Class | Self::Fallback => {
                w.line(format!("private {}: ?{} = null;", INSTANCE_FIELD, target))
                    .blank()
                    .block(signature, |w| {
                        w.block(format!("if (this.{} == null)", INSTANCE_FIELD), |w| {
                            w.line(format!("this.{} = {};", INSTANCE_FIELD, lookup));
                        });
                        w.line(format!("return this.{};", INSTANCE_FIELD));
                    });
            }
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Fallback => "fallback",
        };
        write!(f, "{}", name)
    }
}

fn write_forward(w: &mut SourceWriter, op: &MethodSignature, target: &str) {
    let args = op
        .params
        .iter()
        .map(|p| {
            if p.variadic {
                format!("...{}", p.name)
            } else {
                p.name.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    let receiver = if op.is_static {
        target.to_string()
    } else {
        format!("this.{}()", RESOLVE_FN)
    };
    let call = format!("{}.{}({})", receiver, op.name, args);

    w.block(format!("public {}", op), |w| {
        if op.returns_nothing() {
            w.line(format!("{};", call));
        } else {
            w.line(format!("return {};", call));
        }
    });
}
