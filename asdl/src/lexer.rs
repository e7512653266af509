//! Tokenizer for ASDL descriptions.
//!
//! Tokens never span lines, so the source is lexed one line at a time. A
//! `--` starts a comment that runs to the end of the line.

use logos::Logos;
use std::fmt;

use crate::source::{self, ByteRange, LineNumber};

/// The raw lexemes of a single line, before identifiers are classified.
#[derive(Clone, Debug, Logos)]
enum Lexeme<'source> {
    #[regex(r"\p{Alphabetic}[\p{Alphabetic}\p{N}_]*")]
    Word(&'source str),

    #[token("=")]
    Equals,
    #[token(",")]
    Comma,
    #[token("?")]
    Question,
    #[token("|")]
    Pipe,
    #[token("*")]
    Asterisk,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,

    #[error]
    #[regex(r"\p{Whitespace}", logos::skip)]
    #[regex(r"--.*", logos::skip)]
    Error,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    ConstructorId,
    TypeId,
    Equals,
    Comma,
    Question,
    Pipe,
    Asterisk,
    LParen,
    RParen,
    LBrace,
    RBrace,
}

impl TokenKind {
    /// The kinds of token that can be used where any identifier is expected.
    pub const IDS: &'static [TokenKind] = &[TokenKind::ConstructorId, TokenKind::TypeId];

    pub fn description(&self) -> &'static str {
        match self {
            TokenKind::ConstructorId => "constructor identifier",
            TokenKind::TypeId => "type identifier",
            TokenKind::Equals => "`=`",
            TokenKind::Comma => "`,`",
            TokenKind::Question => "`?`",
            TokenKind::Pipe => "`|`",
            TokenKind::Asterisk => "`*`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
        }
    }

    /// Classify an identifier by the case of its first character.
    fn from_word(word: &str) -> TokenKind {
        match word.starts_with(char::is_uppercase) {
            true => TokenKind::ConstructorId,
            false => TokenKind::TypeId,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token<'source> {
    pub kind: TokenKind,
    pub value: &'source str,
    pub line: LineNumber,
    pub range: ByteRange,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    UnexpectedCharacter {
        character: char,
        line: LineNumber,
        range: ByteRange,
    },
}

impl Error {
    pub fn line(&self) -> LineNumber {
        match self {
            Error::UnexpectedCharacter { line, .. } => *line,
        }
    }

    pub fn range(&self) -> ByteRange {
        match self {
            Error::UnexpectedCharacter { range, .. } => *range,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::UnexpectedCharacter { character, .. } => {
                write!(f, "invalid character `{}`", character.escape_default())
            }
        }
    }
}

impl std::error::Error for Error {}

/// Lazily tokenize `source`. The returned iterator is forward-only; a fresh
/// one must be created for every parse.
pub fn tokens(source: &str) -> impl Iterator<Item = Result<Token<'_>, Error>> {
    source::lines(source).flat_map(|(line, offset, text)| {
        Lexeme::lexer(text)
            .spanned()
            .map(move |(lexeme, range)| {
                let value = &text[range.clone()];
                let range = ByteRange::from(range).offset(offset);
                let kind = match lexeme {
                    Lexeme::Word(word) => TokenKind::from_word(word),
                    Lexeme::Equals => TokenKind::Equals,
                    Lexeme::Comma => TokenKind::Comma,
                    Lexeme::Question => TokenKind::Question,
                    Lexeme::Pipe => TokenKind::Pipe,
                    Lexeme::Asterisk => TokenKind::Asterisk,
                    Lexeme::LParen => TokenKind::LParen,
                    Lexeme::RParen => TokenKind::RParen,
                    Lexeme::LBrace => TokenKind::LBrace,
                    Lexeme::RBrace => TokenKind::RBrace,
                    Lexeme::Error => {
                        return Err(Error::UnexpectedCharacter {
                            character: value.chars().next().unwrap_or('\u{FFFD}'),
                            line,
                            range,
                        })
                    }
                };
                Ok(Token {
                    kind,
                    value,
                    line,
                    range,
                })
            })
    })
}
