//! A parser and checker for the Abstract Syntax Description Language (ASDL).
//!
//! ASDL describes the shape of syntax trees as sums of constructors and
//! products of fields:
//!
//! ```text
//! module Python {
//!     stmt = Expr(expr value) | Pass
//!          attributes (int lineno)
//!     expr = Name(identifier id)
//! }
//! ```
//!
//! [`parse`] turns a description into a [`Module`], and [`check`] verifies
//! that constructor names are unique and that every field type is defined.

pub mod ast;
pub mod check;
pub mod driver;
pub mod lexer;
pub mod parser;
pub mod reporting;
pub mod source;
pub mod visitor;

pub use crate::ast::{
    is_builtin_type, Constructor, Field, Module, Node, Product, Sum, Type, TypeValue,
    BUILTIN_TYPES,
};
pub use crate::check::check;
pub use crate::driver::{Driver, Status};
pub use crate::parser::{parse, SyntaxError};
