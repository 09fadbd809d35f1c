//! Tokenizer for declaration files

use std::fmt;
use thiserror::Error;

/// Kinds of token produced by the [`Lexer`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Str,
    Number,
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Lt,
    Gt,
    Comma,
    Semicolon,
    Colon,
    Dot,
    Ellipsis,
    Arrow,
    Question,
    Pipe,
    Eq,
    /// Any other punctuation; only meaningful inside skipped regions
    Symbol(char),
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(name) => write!(f, "identifier '{}'", name),
            Self::Str => write!(f, "string literal"),
            Self::Number => write!(f, "number"),
            Self::LBrace => write!(f, "'{{'"),
            Self::RBrace => write!(f, "'}}'"),
            Self::LParen => write!(f, "'('"),
            Self::RParen => write!(f, "')'"),
            Self::LBracket => write!(f, "'['"),
            Self::RBracket => write!(f, "']'"),
            Self::Lt => write!(f, "'<'"),
            Self::Gt => write!(f, "'>'"),
            Self::Comma => write!(f, "','"),
            Self::Semicolon => write!(f, "';'"),
            Self::Colon => write!(f, "':'"),
            Self::Dot => write!(f, "'.'"),
            Self::Ellipsis => write!(f, "'...'"),
            Self::Arrow => write!(f, "'->'"),
            Self::Question => write!(f, "'?'"),
            Self::Pipe => write!(f, "'|'"),
            Self::Eq => write!(f, "'='"),
            Self::Symbol(c) => write!(f, "'{}'", c),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

/// A token with its byte span and starting position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

/// Lexing failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message} at {line}:{column}")]
pub struct LexError {
    pub message: String,
    pub line: u32,
    pub column: u32,
}

pub struct Lexer<'src> {
    source: &'src str,
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    current: usize,
    line: u32,
    column: u32,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the whole input. The last token is always `Eof`.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_trivia()?;

        let start = self.current;
        let (line, column) = (self.line, self.column);

        let Some(c) = self.advance() else {
            return Ok(self.make(TokenKind::Eof, start, line, column));
        };

        let kind = match c {
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            '|' => TokenKind::Pipe,
            '=' => TokenKind::Eq,
            '.' => {
                if self.peek() == Some('.') {
                    self.advance();
                    if self.peek() != Some('.') {
                        return Err(self.error("expected '...'", line, column));
                    }
                    self.advance();
                    TokenKind::Ellipsis
                } else {
                    TokenKind::Dot
                }
            }
            '-' => {
                if self.peek() == Some('>') {
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Symbol('-')
                }
            }
            '"' | '\'' => {
                self.string(c, line, column)?;
                TokenKind::Str
            }
            c if c.is_ascii_digit() => {
                while self
                    .peek()
                    .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
                {
                    self.advance();
                }
                TokenKind::Number
            }
            c if is_ident_start(c) => {
                while self.peek().is_some_and(is_ident_continue) {
                    self.advance();
                }
                TokenKind::Ident(self.source[start..self.current].to_string())
            }
            other => TokenKind::Symbol(other),
        };

        Ok(self.make(kind, start, line, column))
    }

    fn skip_trivia(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') => match self.peek_second() {
                    Some('/') => {
                        while self.peek().is_some_and(|c| c != '\n') {
                            self.advance();
                        }
                    }
                    Some('*') => {
                        let (line, column) = (self.line, self.column);
                        self.advance();
                        self.advance();
                        loop {
                            match self.advance() {
                                Some('*') if self.peek() == Some('/') => {
                                    self.advance();
                                    break;
                                }
                                Some(_) => {}
                                None => {
                                    return Err(self.error("unterminated comment", line, column))
                                }
                            }
                        }
                    }
                    _ => return Ok(()),
                },
                _ => return Ok(()),
            }
        }
    }

    fn string(&mut self, quote: char, line: u32, column: u32) -> Result<(), LexError> {
        loop {
            match self.advance() {
                Some('\\') => {
                    self.advance();
                }
                Some(c) if c == quote => return Ok(()),
                Some(_) => {}
                None => return Err(self.error("unterminated string", line, column)),
            }
        }
    }

    fn advance(&mut self) -> Option<char> {
        let (idx, c) = self.chars.next()?;
        self.current = idx + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_second(&self) -> Option<char> {
        self.source[self.current..].chars().nth(1)
    }

    fn make(&self, kind: TokenKind, start: usize, line: u32, column: u32) -> Token {
        Token {
            kind,
            start,
            end: self.current,
            line,
            column,
        }
    }

    fn error(&self, message: &str, line: u32, column: u32) -> LexError {
        LexError {
            message: message.to_string(),
            line,
            column,
        }
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_signature() {
        assert_eq!(
            kinds("fn send(m: ?Message) -> bool;"),
            vec![
                TokenKind::Ident("fn".into()),
                TokenKind::Ident("send".into()),
                TokenKind::LParen,
                TokenKind::Ident("m".into()),
                TokenKind::Colon,
                TokenKind::Question,
                TokenKind::Ident("Message".into()),
                TokenKind::RParen,
                TokenKind::Arrow,
                TokenKind::Ident("bool".into()),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_comments() {
        assert_eq!(
            kinds("// line\n/* block\n } */ class"),
            vec![TokenKind::Ident("class".into()), TokenKind::Eof]
        );
    }

    #[test]
    fn braces_inside_strings_are_opaque() {
        assert_eq!(
            kinds(r#"{ "}\"" }"#),
            vec![
                TokenKind::LBrace,
                TokenKind::Str,
                TokenKind::RBrace,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn ellipsis_and_dots() {
        assert_eq!(
            kinds("...args a.b"),
            vec![
                TokenKind::Ellipsis,
                TokenKind::Ident("args".into()),
                TokenKind::Ident("a".into()),
                TokenKind::Dot,
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn tracks_positions() {
        let tokens = Lexer::new("class\n  Mailer").tokenize().unwrap();
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
        assert_eq!(&"class\n  Mailer"[tokens[1].start..tokens[1].end], "Mailer");
    }

    #[test]
    fn unterminated_string_errors() {
        let err = Lexer::new("fn f(a = \"open").tokenize().unwrap_err();
        assert!(err.message.contains("unterminated string"));
        assert_eq!(err.line, 1);
    }

    #[test]
    fn unterminated_comment_errors() {
        assert!(Lexer::new("/* never closed").tokenize().is_err());
    }
}
