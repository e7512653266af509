//! Traversals over the meta-AST.
//!
//! A [`Visitor`] handles nodes one at a time, matching on the kind of node it
//! is given. Visitors only need to handle the kinds they are interested in:
//! anything else should fall through to a wildcard arm that does nothing.
//! Handlers recurse into child nodes by calling [`visit`] again, threading
//! whatever context the children need.

use std::fmt;

use crate::ast::Node;

/// An error raised by a visitor while handling a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitError {
    /// The rendering of the node whose handler failed.
    pub node: String,
    pub message: String,
}

impl VisitError {
    pub fn new(node: Node<'_>, message: impl Into<String>) -> VisitError {
        VisitError {
            node: node.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for VisitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error visiting {}: {}", self.node, self.message)
    }
}

impl std::error::Error for VisitError {}

pub trait Visitor<'a> {
    /// Handle a node. `context` is supplied by the handler of the enclosing
    /// node, if any.
    fn visit_node(&mut self, node: Node<'a>, context: Option<&'a str>) -> Result<(), VisitError>;
}

/// Dispatch `node` to the visitor. Errors are logged and then returned to the
/// caller, aborting the rest of the traversal.
pub fn visit<'a, V>(
    visitor: &mut V,
    node: impl Into<Node<'a>>,
    context: Option<&'a str>,
) -> Result<(), VisitError>
where
    V: Visitor<'a> + ?Sized,
{
    let node = node.into();
    visitor.visit_node(node, context).map_err(|error| {
        tracing::error!(kind = node.kind(), node = %node, error = %error.message, "error visiting node");
        error
    })
}
