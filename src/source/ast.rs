//! Declaration tree produced by the parser

use std::fmt;

/// A parsed declaration file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceFile {
    /// Dotted namespace, if declared
    pub namespace: Option<String>,
    pub imports: Vec<Import>,
    pub decls: Vec<TypeDecl>,
}

impl SourceFile {
    /// Fully-qualified name of a type declared in this file
    pub fn qualify(&self, name: &str) -> String {
        match &self.namespace {
            Some(ns) => format!("{}.{}", ns, name),
            None => name.to_string(),
        }
    }

    /// Find the declaration whose fully-qualified name is `fqn`
    pub fn find(&self, fqn: &str) -> Option<&TypeDecl> {
        let fqn = fqn.trim_start_matches('.');
        self.decls
            .iter()
            .find(|decl| self.qualify(&decl.header.name) == fqn)
    }
}

/// `use a.b.C;` or `use a.b.C as D;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    pub path: String,
    pub alias: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Class,
    Interface,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Interface => write!(f, "interface"),
        }
    }
}

/// Everything before a type's body: modifiers, kind, name and relationships
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHeader {
    pub name: String,
    pub kind: TypeKind,
    pub is_final: bool,
    pub is_abstract: bool,
    /// Parent class, or parent interfaces, as written
    pub extends: Vec<String>,
    /// Implemented interfaces, as written
    pub implements: Vec<String>,
}

impl TypeHeader {
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

/// A type declaration. `members` is empty when only headers were parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub header: TypeHeader,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Protected,
    Private,
    /// No visibility keyword
    Unmarked,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Member {
    Operation(OperationDecl),
    Field { name: String, visibility: Visibility },
    Constant { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationDecl {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    /// Cannot be overridden by a subclass
    pub is_final: bool,
    pub params: Vec<ParamDecl>,
    pub return_type: Option<TypeRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: Option<TypeRef>,
    pub variadic: bool,
    /// Default value, verbatim
    pub default: Option<String>,
}

/// A type expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    Named { path: String, args: Vec<TypeRef> },
    Nullable(Box<TypeRef>),
    Union(Vec<TypeRef>),
}

impl TypeRef {
    pub fn named(path: impl Into<String>) -> Self {
        Self::Named {
            path: path.into(),
            args: Vec::new(),
        }
    }

    /// Rewrite every named path with `f`, keeping the shape
    pub fn map_paths(&self, f: &dyn Fn(&str) -> String) -> TypeRef {
        match self {
            Self::Named { path, args } => Self::Named {
                path: f(path),
                args: args.iter().map(|a| a.map_paths(f)).collect(),
            },
            Self::Nullable(inner) => Self::Nullable(Box::new(inner.map_paths(f))),
            Self::Union(parts) => Self::Union(parts.iter().map(|p| p.map_paths(f)).collect()),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named { path, args } => {
                write!(f, "{}", path)?;
                if !args.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Self::Nullable(inner) => write!(f, "?{}", inner),
            Self::Union(parts) => {
                for (i, part) in parts.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    write!(f, "{}", part)?;
                }
                Ok(())
            }
        }
    }
}
