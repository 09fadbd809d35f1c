//! Recursive-descent parser for declaration files
//!
//! Operation bodies, field initializers and constants are skipped by
//! bracket matching; only signatures and type headers end up in the tree.

use crate::source::ast::{
    Import, Member, OperationDecl, ParamDecl, SourceFile, TypeDecl, TypeHeader, TypeKind,
    TypeRef, Visibility,
};
use crate::source::lexer::{LexError, Lexer, Token, TokenKind};
use thiserror::Error;

/// Parsing failure with the position of the offending token
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} at {line}:{column}")]
pub struct ParseError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        Self {
            message: err.message,
            line: err.line,
            column: err.column,
        }
    }
}

type ParseResult<T> = Result<T, ParseError>;

/// Parse a full declaration file, members included
pub fn parse_source(text: &str) -> ParseResult<SourceFile> {
    Parser::new(text, Mode::Full)?.file()
}

/// Parse only type headers; every body is skipped and `members` stays empty
pub fn parse_headers(text: &str) -> ParseResult<SourceFile> {
    Parser::new(text, Mode::HeadersOnly)?.file()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Full,
    HeadersOnly,
}

struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    mode: Mode,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str, mode: Mode) -> ParseResult<Self> {
        let tokens = Lexer::new(source).tokenize()?;
        Ok(Self {
            source,
            tokens,
            pos: 0,
            mode,
        })
    }

    fn file(mut self) -> ParseResult<SourceFile> {
        let mut file = SourceFile::default();

        if self.eat_keyword("namespace") {
            file.namespace = Some(self.path()?);
            self.expect(TokenKind::Semicolon)?;
        }

        while self.eat_keyword("use") {
            let path = self.path()?;
            let alias = if self.eat_keyword("as") {
                self.ident()?
            } else {
                last_segment(&path).to_string()
            };
            self.expect(TokenKind::Semicolon)?;
            file.imports.push(Import { path, alias });
        }

        while !self.at(&TokenKind::Eof) {
            file.decls.push(self.type_decl()?);
        }

        Ok(file)
    }

    fn type_decl(&mut self) -> ParseResult<TypeDecl> {
        let mut is_final = false;
        let mut is_abstract = false;
        loop {
            if self.eat_keyword("final") {
                is_final = true;
            } else if self.eat_keyword("abstract") {
                is_abstract = true;
            } else {
                break;
            }
        }

        let kind = if self.eat_keyword("class") {
            TypeKind::Class
        } else if self.eat_keyword("interface") {
            TypeKind::Interface
        } else {
            return Err(self.unexpected("'class' or 'interface'"));
        };

        let name = self.ident()?;

        let mut extends = Vec::new();
        if self.eat_keyword("extends") {
            extends = self.path_list()?;
            if kind == TypeKind::Class && extends.len() > 1 {
                return Err(self.error_here(&format!(
                    "class {} may extend at most one parent",
                    name
                )));
            }
        }

        let mut implements = Vec::new();
        if self.eat_keyword("implements") {
            if kind == TypeKind::Interface {
                return Err(self.error_here(&format!(
                    "interface {} cannot implement; use extends",
                    name
                )));
            }
            implements = self.path_list()?;
        }

        let header = TypeHeader {
            name,
            kind,
            is_final,
            is_abstract,
            extends,
            implements,
        };

        let members = match self.mode {
            Mode::HeadersOnly => {
                self.skip_block()?;
                Vec::new()
            }
            Mode::Full => {
                self.expect(TokenKind::LBrace)?;
                let mut members = Vec::new();
                while !self.eat(&TokenKind::RBrace) {
                    if self.at(&TokenKind::Eof) {
                        return Err(self.unexpected("'}'"));
                    }
                    members.push(self.member()?);
                }
                members
            }
        };

        Ok(TypeDecl { header, members })
    }

    fn member(&mut self) -> ParseResult<Member> {
        let mut visibility = Visibility::Unmarked;
        let mut is_static = false;
        let mut is_final = false;

        loop {
            if self.eat_keyword("public") {
                visibility = Visibility::Public;
            } else if self.eat_keyword("protected") {
                visibility = Visibility::Protected;
            } else if self.eat_keyword("private") {
                visibility = Visibility::Private;
            } else if self.eat_keyword("static") {
                is_static = true;
            } else if self.eat_keyword("final") {
                is_final = true;
            } else if !self.eat_keyword("abstract") {
                break;
            }
        }

        if self.eat_keyword("fn") {
            return self
                .operation(visibility, is_static, is_final)
                .map(Member::Operation);
        }

        if self.eat_keyword("const") {
            let name = self.ident()?;
            self.skip_member_rest()?;
            return Ok(Member::Constant { name });
        }

        let name = self.ident()?;
        self.skip_member_rest()?;
        Ok(Member::Field { name, visibility })
    }

    fn operation(
        &mut self,
        visibility: Visibility,
        is_static: bool,
        is_final: bool,
    ) -> ParseResult<OperationDecl> {
        let name = self.ident()?;
        self.expect(TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.eat(&TokenKind::RParen) {
            loop {
                params.push(self.param()?);
                if self.eat(&TokenKind::Comma) {
                    if self.eat(&TokenKind::RParen) {
                        break;
                    }
                    continue;
                }
                self.expect(TokenKind::RParen)?;
                break;
            }
        }

        let return_type = if self.eat(&TokenKind::Arrow) {
            Some(self.type_ref()?)
        } else {
            None
        };

        if self.at(&TokenKind::LBrace) {
            self.skip_block()?;
        } else if !self.eat(&TokenKind::Semicolon) {
            return Err(self.unexpected("operation body or ';'"));
        }

        Ok(OperationDecl {
            name,
            visibility,
            is_static,
            is_final,
            params,
            return_type,
        })
    }

    fn param(&mut self) -> ParseResult<ParamDecl> {
        let variadic = self.eat(&TokenKind::Ellipsis);
        let name = self.ident()?;
        let ty = if self.eat(&TokenKind::Colon) {
            Some(self.type_ref()?)
        } else {
            None
        };
        let default = if self.eat(&TokenKind::Eq) {
            Some(self.default_value()?)
        } else {
            None
        };
        Ok(ParamDecl {
            name,
            ty,
            variadic,
            default,
        })
    }

    /// Capture a default value verbatim, up to the next `,` or `)` at depth 0
    fn default_value(&mut self) -> ParseResult<String> {
        let start = self.peek().start;
        let mut end = start;
        let mut depth = 0usize;

        loop {
            match self.peek().kind.clone() {
                TokenKind::Eof => return Err(self.unexpected("default value")),
                TokenKind::Comma | TokenKind::RParen if depth == 0 => break,
                TokenKind::RBracket | TokenKind::RBrace if depth == 0 => {
                    return Err(self.unexpected("default value"))
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => depth -= 1,
                _ => {}
            }
            end = self.advance().end;
        }

        let value = self.source[start..end].trim();
        if value.is_empty() {
            return Err(self.unexpected("default value"));
        }
        Ok(value.to_string())
    }

    fn type_ref(&mut self) -> ParseResult<TypeRef> {
        let first = self.type_atom()?;
        if !self.at(&TokenKind::Pipe) {
            return Ok(first);
        }

        let mut parts = vec![first];
        while self.eat(&TokenKind::Pipe) {
            parts.push(self.type_atom()?);
        }
        Ok(TypeRef::Union(parts))
    }

    fn type_atom(&mut self) -> ParseResult<TypeRef> {
        if self.eat(&TokenKind::Question) {
            return Ok(TypeRef::Nullable(Box::new(self.type_atom()?)));
        }

        let path = if self.eat(&TokenKind::Dot) {
            format!(".{}", self.path()?)
        } else {
            self.path()?
        };

        let mut args = Vec::new();
        if self.eat(&TokenKind::Lt) {
            loop {
                args.push(self.type_ref()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::Gt)?;
        }

        Ok(TypeRef::Named { path, args })
    }

    fn path_list(&mut self) -> ParseResult<Vec<String>> {
        let mut paths = vec![self.path()?];
        while self.eat(&TokenKind::Comma) {
            paths.push(self.path()?);
        }
        Ok(paths)
    }

    /// `ident ("." ident)*`
    fn path(&mut self) -> ParseResult<String> {
        let mut path = self.ident()?;
        while self.eat(&TokenKind::Dot) {
            path.push('.');
            path.push_str(&self.ident()?);
        }
        Ok(path)
    }

    fn ident(&mut self) -> ParseResult<String> {
        match &self.peek().kind {
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(name)
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    /// Skip a `{ ... }` block, starting at its opening brace
    fn skip_block(&mut self) -> ParseResult<()> {
        self.expect(TokenKind::LBrace)?;
        let mut depth = 1usize;
        while depth > 0 {
            match self.advance().kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => depth -= 1,
                TokenKind::Eof => return Err(self.error_here("unterminated block")),
                _ => {}
            }
        }
        Ok(())
    }

    /// Skip a non-operation member: up to `;` at depth 0, or a trailing block
    fn skip_member_rest(&mut self) -> ParseResult<()> {
        let mut depth = 0usize;
        loop {
            match self.peek().kind.clone() {
                TokenKind::Eof => return Err(self.unexpected("';'")),
                TokenKind::RBrace if depth == 0 => return Err(self.unexpected("';'")),
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return Ok(());
                }
                TokenKind::LParen | TokenKind::LBracket | TokenKind::LBrace => depth += 1,
                TokenKind::RParen | TokenKind::RBracket => depth = depth.saturating_sub(1),
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        self.eat(&TokenKind::Semicolon);
                        return Ok(());
                    }
                }
                _ => {}
            }
            self.advance();
        }
    }

    fn peek(&self) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[self.pos.min(last)]
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        token
    }

    fn at(&self, kind: &TokenKind) -> bool {
        &self.peek().kind == kind
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.at(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        if matches!(&self.peek().kind, TokenKind::Ident(name) if name == keyword) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.at(&kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        ParseError {
            message: format!("expected {}, found {}", expected, token.kind),
            line: token.line,
            column: token.column,
        }
    }

    fn error_here(&self, message: &str) -> ParseError {
        let token = self.peek();
        ParseError {
            message: message.to_string(),
            line: token.line,
            column: token.column,
        }
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit('.').next().unwrap_or(path)
}
