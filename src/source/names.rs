//! Qualified-name resolution
//!
//! Forwarded signatures are emitted in another namespace, so every type
//! name in them has to be rewritten to its fully-qualified form first.

use crate::source::ast::{SourceFile, TypeRef};
use std::collections::{HashMap, HashSet};

/// Scalar and pseudo types that never take a namespace
const BUILTIN_TYPES: &[&str] = &[
    "int", "float", "string", "bool", "array", "object", "mixed", "void", "null", "never",
    "iterable", "callable", "true", "false",
];

/// Resolves names as written in one declaration file
#[derive(Debug, Clone)]
pub struct NameContext<'a> {
    namespace: Option<&'a str>,
    imports: HashMap<&'a str, &'a str>,
    runtime: &'a HashSet<String>,
    self_name: Option<String>,
}

impl<'a> NameContext<'a> {
    /// Build a context from a parsed file and the runtime-provided type names
    pub fn new(file: &'a SourceFile, runtime: &'a HashSet<String>) -> Self {
        Self {
            namespace: file.namespace.as_deref(),
            imports: file
                .imports
                .iter()
                .map(|import| (import.alias.as_str(), import.path.as_str()))
                .collect(),
            runtime,
            self_name: None,
        }
    }

    /// Resolve `self` and `static` to the given fully-qualified type
    pub fn with_self(mut self, fqn: &str) -> Self {
        self.self_name = Some(fqn.to_string());
        self
    }

    /// Resolve a single dotted name
    ///
    /// * `.a.B` is already fully qualified
    /// * builtin types and runtime-provided names stay as written
    /// * `self`/`static` become the enclosing type
    /// * a first segment matching an import alias expands to the import path
    /// * other dotted names are taken as fully qualified
    /// * unqualified names are placed in the file's namespace
    pub fn resolve(&self, name: &str) -> String {
        if let Some(absolute) = name.strip_prefix('.') {
            return absolute.to_string();
        }

        if is_builtin_type(name) {
            return name.to_string();
        }

        if name == "self" || name == "static" {
            return self.self_name.clone().unwrap_or_else(|| name.to_string());
        }

        let (head, rest) = match name.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (name, None),
        };

        if let Some(path) = self.imports.get(head) {
            return match rest {
                Some(rest) => format!("{}.{}", path, rest),
                None => path.to_string(),
            };
        }

        if rest.is_some() || self.runtime.contains(name) {
            return name.to_string();
        }

        match self.namespace {
            Some(ns) => format!("{}.{}", ns, name),
            None => name.to_string(),
        }
    }

    /// Resolve and mark every non-builtin name absolute (`.a.B`), so the
    /// type reads the same from any namespace
    pub fn absolute_type(&self, ty: &TypeRef) -> TypeRef {
        ty.map_paths(&|path| absolute(&self.resolve(path)))
    }
}

/// Whether `name` is a scalar or pseudo type
pub fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES.contains(&name.to_ascii_lowercase().as_str())
}

/// Prefix a fully-qualified name with the absolute marker
pub fn absolute(fqn: &str) -> String {
    if is_builtin_type(fqn) || fqn.starts_with('.') {
        fqn.to_string()
    } else {
        format!(".{}", fqn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parser::parse_source;

    fn runtime() -> HashSet<String> {
        ["Countable".to_string()].into_iter().collect()
    }

    const FILE: &str = "namespace services;\nuse mail.Message;\nuse mail.transport.Transport as Wire;\n";

    #[test]
    fn resolves_imports_and_aliases() {
        let file = parse_source(FILE).unwrap();
        let runtime = runtime();
        let ctx = NameContext::new(&file, &runtime);

        assert_eq!(ctx.resolve("Message"), "mail.Message");
        assert_eq!(ctx.resolve("Wire"), "mail.transport.Transport");
        assert_eq!(ctx.resolve("Message.Part"), "mail.Message.Part");
    }

    #[test]
    fn places_unqualified_names_in_namespace() {
        let file = parse_source(FILE).unwrap();
        let runtime = runtime();
        let ctx = NameContext::new(&file, &runtime);

        assert_eq!(ctx.resolve("Envelope"), "services.Envelope");
        assert_eq!(ctx.resolve("other.Envelope"), "other.Envelope");
        assert_eq!(ctx.resolve(".Envelope"), "Envelope");
    }

    #[test]
    fn leaves_builtins_and_runtime_types() {
        let file = parse_source(FILE).unwrap();
        let runtime = runtime();
        let ctx = NameContext::new(&file, &runtime);

        assert_eq!(ctx.resolve("int"), "int");
        assert_eq!(ctx.resolve("void"), "void");
        assert_eq!(ctx.resolve("Countable"), "Countable");
    }

    #[test]
    fn resolves_self() {
        let file = parse_source(FILE).unwrap();
        let runtime = runtime();
        let ctx = NameContext::new(&file, &runtime).with_self("services.Mailer");

        assert_eq!(ctx.resolve("self"), "services.Mailer");
        assert_eq!(ctx.resolve("static"), "services.Mailer");
    }

    #[test]
    fn resolves_nested_type_refs() {
        let file = parse_source(FILE).unwrap();
        let runtime = runtime();
        let ctx = NameContext::new(&file, &runtime);

        let ty = TypeRef::Nullable(Box::new(TypeRef::Named {
            path: "List".to_string(),
            args: vec![TypeRef::named("Message")],
        }));
        assert_eq!(
            ctx.absolute_type(&ty).to_string(),
            "?.services.List<.mail.Message>"
        );
    }

    #[test]
    fn absolute_marks_only_named_types() {
        assert_eq!(absolute("mail.Message"), ".mail.Message");
        assert_eq!(absolute(".mail.Message"), ".mail.Message");
        assert_eq!(absolute("int"), "int");
    }
}
