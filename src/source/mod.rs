//! Source transformer for target declarations
//!
//! Lexes and parses declaration files, resolves names to fully-qualified
//! form and extracts the public operations a proxy forwards.
//!
//! ```text
//! text ──lexer──▶ tokens ──parser──▶ SourceFile ──names──▶ MethodSignature[]
//! ```

pub mod ast;
pub mod extract;
pub mod lexer;
pub mod locate;
pub mod names;
pub mod parser;

pub use ast::{SourceFile, TypeDecl, TypeHeader, TypeKind};
pub use extract::{extract_public_operations, MethodSignature, Parameter};
pub use locate::{DeclarationSource, FsDeclarationSource, MemoryDeclarationSource};
pub use names::NameContext;
pub use parser::{parse_headers, parse_source, ParseError};
