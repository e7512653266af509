//! Well-formedness checking of parsed modules.
//!
//! A module is well-formed when:
//!
//! - no two constructors in the module share a name, and
//! - every field refers either to a builtin type or to a type defined in the
//!   module.
//!
//! Problems are reported as [`Message`]s while checking continues, so every
//! problem in a module is found in a single pass.

use fxhash::FxHashMap;

use crate::ast::{self, Module, Node};
use crate::reporting::Message;
use crate::source::ByteRange;
use crate::visitor::{self, VisitError, Visitor};

/// The largest edit distance at which an undefined type is considered a
/// likely misspelling.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// Check a module, printing each problem to stderr. Returns `true` if no
/// problems were found.
pub fn check(module: &Module) -> Result<bool, VisitError> {
    check_module(module, &mut |message| eprintln!("{message}"))
}

/// Check a module, passing each problem to `on_message`. Returns `true` if no
/// problems were found.
pub fn check_module(
    module: &Module,
    on_message: &mut dyn FnMut(Message),
) -> Result<bool, VisitError> {
    let mut checker = Checker::new(on_message);
    visitor::visit(&mut checker, module, None)?;
    checker.report_undefined_types(module);

    tracing::debug!(
        module = module.name(),
        errors = checker.errors,
        "checked module"
    );
    Ok(checker.errors == 0)
}

struct Checker<'a, 'msg> {
    /// The definition that first introduced each constructor name.
    constructors: FxHashMap<&'a str, (&'a str, ByteRange)>,
    /// Uses of each referenced type, in the order the types were first seen.
    type_uses: Vec<(&'a str, Vec<(&'a str, ByteRange)>)>,
    type_indices: FxHashMap<&'a str, usize>,
    errors: usize,
    on_message: &'msg mut dyn FnMut(Message),
}

impl<'a, 'msg> Checker<'a, 'msg> {
    fn new(on_message: &'msg mut dyn FnMut(Message)) -> Checker<'a, 'msg> {
        Checker {
            constructors: FxHashMap::default(),
            type_uses: Vec::new(),
            type_indices: FxHashMap::default(),
            errors: 0,
            on_message,
        }
    }

    fn report(&mut self, message: Message) {
        self.errors += 1;
        (self.on_message)(message);
    }

    fn register_constructor(&mut self, constructor: &'a ast::Constructor, definition: &'a str) {
        let name = constructor.name.as_str();
        match self.constructors.get(name) {
            None => {
                self.constructors.insert(name, (definition, constructor.range));
            }
            Some(&(first_definition, first_range)) => self.report(Message::DuplicateConstructor {
                name: name.to_owned(),
                first_definition: first_definition.to_owned(),
                first_range,
                second_definition: definition.to_owned(),
                second_range: constructor.range,
            }),
        }
    }

    fn record_type_use(&mut self, field: &'a ast::Field, user: &'a str) {
        let type_name = field.type_name.as_str();
        let index = match self.type_indices.get(type_name) {
            Some(index) => *index,
            None => {
                self.type_uses.push((type_name, Vec::new()));
                self.type_indices.insert(type_name, self.type_uses.len() - 1);
                self.type_uses.len() - 1
            }
        };
        self.type_uses[index].1.push((user, field.range));
    }

    fn report_undefined_types(&mut self, module: &Module) {
        let undefined = (self.type_uses.iter())
            .filter(|(name, _)| !module.is_defined(name) && !ast::is_builtin_type(name))
            .map(|(name, uses)| Message::UndefinedType {
                name: (*name).to_owned(),
                uses: (uses.iter())
                    .map(|(user, range)| ((*user).to_owned(), *range))
                    .collect(),
                suggestion: suggest_type(module, name),
            })
            .collect::<Vec<_>>();

        for message in undefined {
            self.report(message);
        }
    }
}

impl<'a, 'msg> Visitor<'a> for Checker<'a, 'msg> {
    fn visit_node(&mut self, node: Node<'a>, context: Option<&'a str>) -> Result<(), VisitError> {
        match node {
            Node::Module(module) => {
                for dfn in module.dfns() {
                    visitor::visit(self, dfn, None)?;
                }
            }
            Node::Type(dfn) => visitor::visit(self, &dfn.value, Some(dfn.name.as_str()))?,
            Node::Sum(sum) => {
                for constructor in &sum.constructors {
                    visitor::visit(self, constructor, context)?;
                }
                for field in &sum.attributes {
                    visitor::visit(self, field, context)?;
                }
            }
            Node::Product(product) => {
                for field in product.fields.iter().chain(&product.attributes) {
                    visitor::visit(self, field, context)?;
                }
            }
            Node::Constructor(constructor) => {
                let definition = enclosing(node, context)?;
                self.register_constructor(constructor, definition);
                for field in &constructor.fields {
                    visitor::visit(self, field, Some(constructor.name.as_str()))?;
                }
            }
            Node::Field(field) => {
                let user = enclosing(node, context)?;
                self.record_type_use(field, user);
            }
        }
        Ok(())
    }
}

fn enclosing<'a>(node: Node<'_>, context: Option<&'a str>) -> Result<&'a str, VisitError> {
    context.ok_or_else(|| VisitError::new(node, "visited outside of a type definition"))
}

/// Find the closest defined or builtin type name to `name`.
fn suggest_type(module: &Module, name: &str) -> Option<String> {
    (module.definition_names())
        .chain(ast::BUILTIN_TYPES.iter().copied())
        .map(|candidate| (levenshtein::levenshtein(name, candidate), candidate))
        .filter(|(distance, _)| *distance <= MAX_SUGGESTION_DISTANCE && *distance < name.len())
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate.to_owned())
}
