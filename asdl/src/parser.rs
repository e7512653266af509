//! Recursive descent parser for ASDL descriptions.
//!
//! ```text
//! module      ::= "module" Id "{" definitions "}"
//! definitions ::= { TypeId "=" type }
//! type        ::= product | sum
//! product     ::= fields [ "attributes" fields ]
//! fields      ::= "(" { field "," } field ")"
//! field       ::= TypeId [ "?" | "*" ] [ Id ]
//! sum         ::= constructor { "|" constructor } [ "attributes" fields ]
//! constructor ::= ConstructorId [ fields ]
//! ```
//!
//! `module` and `attributes` are not reserved: they are type identifiers that
//! are only treated as keywords where the grammar expects them.

use codespan_reporting::diagnostic::{Diagnostic, Label};
use itertools::Itertools;
use std::fmt;

use crate::ast::{Constructor, Field, Module, Product, Sum, Type, TypeValue};
use crate::lexer::{self, Token, TokenKind};
use crate::source::{ByteRange, LineNumber};

/// A fatal error encountered while tokenizing or parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    message: String,
    line: Option<LineNumber>,
    range: Option<ByteRange>,
}

impl SyntaxError {
    fn new(message: impl Into<String>, token: Option<&Token<'_>>) -> SyntaxError {
        SyntaxError {
            message: message.into(),
            line: token.map(|token| token.line),
            range: token.map(|token| token.range),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// The line the error occurred on, if known.
    pub fn line(&self) -> Option<LineNumber> {
        self.line
    }

    pub fn range(&self) -> Option<ByteRange> {
        self.range
    }

    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        let labels = match self.range {
            Some(range) => vec![Label::primary(file_id, range)],
            None => Vec::new(),
        };
        Diagnostic::error()
            .with_message(format!("syntax error: {}", self.message))
            .with_labels(labels)
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Syntax error on line {}: {}", line, self.message),
            None => write!(f, "Syntax error on line <unknown>: {}", self.message),
        }
    }
}

impl std::error::Error for SyntaxError {}

impl From<lexer::Error> for SyntaxError {
    fn from(error: lexer::Error) -> SyntaxError {
        SyntaxError {
            message: error.to_string(),
            line: Some(error.line()),
            range: Some(error.range()),
        }
    }
}

/// Parse an ASDL description into a module.
pub fn parse(source: &str) -> Result<Module, SyntaxError> {
    let mut parser = Parser::new(lexer::tokens(source))?;
    let module = parser.parse_module()?;
    parser.expect_end()?;

    tracing::debug!(
        module = module.name(),
        definitions = module.dfns().len(),
        "parsed module"
    );
    Ok(module)
}

/// A single-token lookahead parser over a token stream.
pub struct Parser<'source, Tokens> {
    tokens: Tokens,
    current: Option<Token<'source>>,
}

impl<'source, Tokens> Parser<'source, Tokens>
where
    Tokens: Iterator<Item = Result<Token<'source>, lexer::Error>>,
{
    pub fn new(mut tokens: Tokens) -> Result<Self, SyntaxError> {
        let current = tokens.next().transpose()?;
        Ok(Parser { tokens, current })
    }

    /// Parse a module from the start of the token stream.
    pub fn parse_module(&mut self) -> Result<Module, SyntaxError> {
        if !self.at_keyword("module") {
            let found = self.current.as_ref().map_or("end of input", |token| token.value);
            return Err(self.error(format!("expected `module`, found `{found}`")));
        }
        self.advance()?;

        let name = self.expect(TokenKind::IDS)?;
        self.expect(&[TokenKind::LBrace])?;
        let dfns = self.parse_definitions()?;
        self.expect(&[TokenKind::RBrace])?;

        Ok(Module::new(name.value, dfns))
    }

    /// Ensure that the token stream has been exhausted.
    pub fn expect_end(&mut self) -> Result<(), SyntaxError> {
        match &self.current {
            None => Ok(()),
            Some(token) => Err(self.error(format!(
                "expected end of input, found {}",
                token.kind
            ))),
        }
    }

    fn parse_definitions(&mut self) -> Result<Vec<Type>, SyntaxError> {
        let mut dfns = Vec::new();
        while self.at(TokenKind::TypeId) {
            let name = self.expect(&[TokenKind::TypeId])?;
            self.expect(&[TokenKind::Equals])?;
            let value = self.parse_type()?;

            tracing::trace!(name = name.value, line = name.line, "parsed definition");
            dfns.push(Type {
                name: name.value.to_owned(),
                value,
                range: name.range,
            });
        }
        Ok(dfns)
    }

    fn parse_type(&mut self) -> Result<TypeValue, SyntaxError> {
        if self.at(TokenKind::LParen) {
            return Ok(TypeValue::Product(self.parse_product()?));
        }

        let mut constructors = vec![self.parse_constructor()?];
        while self.at(TokenKind::Pipe) {
            self.advance()?;
            constructors.push(self.parse_constructor()?);
        }
        let attributes = self.parse_optional_attributes()?;

        Ok(TypeValue::Sum(Sum {
            constructors,
            attributes,
        }))
    }

    fn parse_product(&mut self) -> Result<Product, SyntaxError> {
        let fields = self.parse_fields()?;
        let attributes = self.parse_optional_attributes()?;
        Ok(Product { fields, attributes })
    }

    fn parse_constructor(&mut self) -> Result<Constructor, SyntaxError> {
        let name = self.expect(&[TokenKind::ConstructorId])?;
        let fields = match self.at(TokenKind::LParen) {
            true => self.parse_fields()?,
            false => Vec::new(),
        };

        Ok(Constructor {
            name: name.value.to_owned(),
            fields,
            range: name.range,
        })
    }

    /// Parse a parenthesised list of fields. Each field may be followed by a
    /// comma, including the last one.
    fn parse_fields(&mut self) -> Result<Vec<Field>, SyntaxError> {
        let mut fields = Vec::new();
        self.expect(&[TokenKind::LParen])?;
        while self.at(TokenKind::TypeId) {
            fields.push(self.parse_field()?);
            if self.at(TokenKind::RParen) {
                break;
            } else if self.at(TokenKind::Comma) {
                self.advance()?;
            }
        }
        self.expect(&[TokenKind::RParen])?;
        Ok(fields)
    }

    fn parse_field(&mut self) -> Result<Field, SyntaxError> {
        let type_name = self.expect(&[TokenKind::TypeId])?;
        let (seq, opt) = self.parse_field_quantifier()?;
        let name = match self.at_any(TokenKind::IDS) {
            true => Some(self.expect(TokenKind::IDS)?.value.to_owned()),
            false => None,
        };

        Ok(Field {
            type_name: type_name.value.to_owned(),
            name,
            seq,
            opt,
            range: type_name.range,
        })
    }

    /// Parse an optional `?` or `*`, returning `(seq, opt)`.
    fn parse_field_quantifier(&mut self) -> Result<(bool, bool), SyntaxError> {
        let quantifiers = [TokenKind::Question, TokenKind::Asterisk];
        if !self.at_any(&quantifiers) {
            return Ok((false, false));
        }

        let quantifier = self.expect(&quantifiers)?;
        if self.at_any(&quantifiers) {
            return Err(self.error("a field may have at most one quantifier"));
        }
        Ok((
            quantifier.kind == TokenKind::Asterisk,
            quantifier.kind == TokenKind::Question,
        ))
    }

    fn parse_optional_attributes(&mut self) -> Result<Vec<Field>, SyntaxError> {
        match self.at_keyword("attributes") {
            true => {
                self.advance()?;
                self.parse_fields()
            }
            false => Ok(Vec::new()),
        }
    }

    /// Move to the next token, returning the previous one.
    fn advance(&mut self) -> Result<Option<Token<'source>>, SyntaxError> {
        let next = self.tokens.next().transpose()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Consume the current token if it is one of the `expected` kinds.
    fn expect(&mut self, expected: &[TokenKind]) -> Result<Token<'source>, SyntaxError> {
        match self.current {
            Some(ref token) if expected.contains(&token.kind) => {}
            _ => {
                let found = self
                    .current
                    .as_ref()
                    .map_or("end of input", |token| token.kind.description());
                let expected = expected.iter().format(" or ");
                return Err(self.error(format!("expected {expected}, found {found}")));
            }
        }
        match self.advance()? {
            Some(token) => Ok(token),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn at(&self, kind: TokenKind) -> bool {
        matches!(&self.current, Some(token) if token.kind == kind)
    }

    fn at_any(&self, kinds: &[TokenKind]) -> bool {
        matches!(&self.current, Some(token) if kinds.contains(&token.kind))
    }

    /// Contextual keywords are type identifiers with a specific value.
    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(
            &self.current,
            Some(token) if token.kind == TokenKind::TypeId && token.value == keyword,
        )
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.current.as_ref())
    }
}

#[cfg(test)]
mod tests;
