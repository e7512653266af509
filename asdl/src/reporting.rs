use codespan_reporting::diagnostic::{Diagnostic, Label};
use itertools::Itertools;
use std::fmt;

use crate::source::ByteRange;

/// Diagnostic messages produced when checking a module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    /// A constructor name was used more than once in the module.
    DuplicateConstructor {
        name: String,
        first_definition: String,
        first_range: ByteRange,
        second_definition: String,
        second_range: ByteRange,
    },
    /// A field referred to a type that is neither defined in the module nor
    /// builtin.
    UndefinedType {
        name: String,
        /// The constructors and products that use the type, with the range of
        /// each offending field.
        uses: Vec<(String, ByteRange)>,
        suggestion: Option<String>,
    },
}

impl Message {
    pub fn to_diagnostic(&self, file_id: usize) -> Diagnostic<usize> {
        match self {
            Message::DuplicateConstructor {
                name,
                first_definition,
                first_range,
                second_definition,
                second_range,
            } => Diagnostic::error()
                .with_message(format!("redefinition of constructor `{name}`"))
                .with_labels(vec![
                    Label::primary(file_id, *second_range)
                        .with_message(format!("redefined in `{second_definition}`")),
                    Label::secondary(file_id, *first_range)
                        .with_message(format!("first defined in `{first_definition}`")),
                ]),
            Message::UndefinedType {
                name,
                uses,
                suggestion,
            } => {
                let labels = (uses.iter())
                    .map(|(user, range)| {
                        Label::primary(file_id, *range).with_message(format!("used in `{user}`"))
                    })
                    .collect();
                let notes = match suggestion {
                    Some(suggestion) => vec![format!("help: did you mean `{suggestion}`?")],
                    None => Vec::new(),
                };

                Diagnostic::error()
                    .with_message(format!("undefined type `{name}`"))
                    .with_labels(labels)
                    .with_notes(notes)
            }
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::DuplicateConstructor {
                name,
                first_definition,
                second_definition,
                ..
            } => {
                writeln!(f, "Redefinition of constructor {name}")?;
                write!(f, "Defined in {first_definition} and {second_definition}")
            }
            Message::UndefinedType { name, uses, .. } => {
                let uses = uses.iter().map(|(user, _)| user).format(", ");
                write!(f, "Undefined type {name}, used in {uses}")
            }
        }
    }
}
