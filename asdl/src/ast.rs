//! The meta-AST of an ASDL description.
//!
//! ASDL descriptions themselves describe the syntax trees of some other
//! language. These nodes describe ASDL descriptions: a module of type
//! definitions, each of which is either a sum of constructors or a product of
//! fields. Nodes are built once by the parser and are never mutated.

use fxhash::FxHashMap;
use itertools::Itertools;
use std::fmt;

use crate::source::ByteRange;

/// Field types that are assumed to exist without being defined in a module.
pub const BUILTIN_TYPES: &[&str] = &[
    "identifier",
    "string",
    "int",
    "constant",
    "bool",
    "conversion_flag",
];

pub fn is_builtin_type(name: &str) -> bool {
    BUILTIN_TYPES.iter().any(|builtin| name == *builtin)
}

/// A module of type definitions.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    dfns: Vec<Type>,
    /// Indices into `dfns`, keyed by definition name.
    types: FxHashMap<String, usize>,
}

impl Module {
    pub fn new(name: impl Into<String>, dfns: Vec<Type>) -> Module {
        // Later definitions shadow earlier ones with the same name.
        let types = (dfns.iter().enumerate())
            .map(|(index, dfn)| (dfn.name.clone(), index))
            .collect();

        Module {
            name: name.into(),
            dfns,
            types,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type definitions, in source order.
    pub fn dfns(&self) -> &[Type] {
        &self.dfns
    }

    pub fn definition_names(&self) -> impl Iterator<Item = &str> {
        self.dfns.iter().map(|dfn| dfn.name.as_str())
    }

    /// Look up the value of a type definition by name.
    pub fn lookup(&self, name: &str) -> Option<&TypeValue> {
        let index = *self.types.get(name)?;
        Some(&self.dfns[index].value)
    }

    pub fn is_defined(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// The mapping from definition names to their values, in no particular
    /// order.
    pub fn types(&self) -> impl Iterator<Item = (&str, &TypeValue)> {
        (self.types.iter()).map(|(name, index)| (name.as_str(), &self.dfns[*index].value))
    }
}

/// A named type definition.
#[derive(Debug, Clone)]
pub struct Type {
    pub name: String,
    pub value: TypeValue,
    /// The range of the definition's name.
    pub range: ByteRange,
}

#[derive(Debug, Clone)]
pub enum TypeValue {
    Sum(Sum),
    Product(Product),
}

/// A tagged union of constructors.
#[derive(Debug, Clone)]
pub struct Sum {
    pub constructors: Vec<Constructor>,
    /// Fields shared by every constructor of the sum.
    pub attributes: Vec<Field>,
}

/// A record of fields.
#[derive(Debug, Clone)]
pub struct Product {
    pub fields: Vec<Field>,
    pub attributes: Vec<Field>,
}

#[derive(Debug, Clone)]
pub struct Constructor {
    pub name: String,
    pub fields: Vec<Field>,
    pub range: ByteRange,
}

#[derive(Debug, Clone)]
pub struct Field {
    /// The name of the field's type.
    pub type_name: String,
    /// The optional binding name of the field.
    pub name: Option<String>,
    /// Zero or more (`*`).
    pub seq: bool,
    /// Zero or one (`?`).
    pub opt: bool,
    /// The range of the field's type name.
    pub range: ByteRange,
}

impl Field {
    /// Render the field the way it is written in a description, eg.
    /// `expr* args`.
    pub fn to_source(&self) -> String {
        let quantifier = match (self.seq, self.opt) {
            (true, _) => "*",
            (false, true) => "?",
            (false, false) => "",
        };
        match &self.name {
            Some(name) => format!("{}{} {}", self.type_name, quantifier, name),
            None => format!("{}{}", self.type_name, quantifier),
        }
    }
}

/// A reference to any node of the meta-AST.
#[derive(Debug, Copy, Clone)]
pub enum Node<'a> {
    Module(&'a Module),
    Type(&'a Type),
    Sum(&'a Sum),
    Product(&'a Product),
    Constructor(&'a Constructor),
    Field(&'a Field),
}

impl<'a> Node<'a> {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Module(_) => "Module",
            Node::Type(_) => "Type",
            Node::Sum(_) => "Sum",
            Node::Product(_) => "Product",
            Node::Constructor(_) => "Constructor",
            Node::Field(_) => "Field",
        }
    }
}

impl<'a> From<&'a Module> for Node<'a> {
    fn from(module: &'a Module) -> Self {
        Node::Module(module)
    }
}

impl<'a> From<&'a Type> for Node<'a> {
    fn from(dfn: &'a Type) -> Self {
        Node::Type(dfn)
    }
}

impl<'a> From<&'a TypeValue> for Node<'a> {
    fn from(value: &'a TypeValue) -> Self {
        match value {
            TypeValue::Sum(sum) => Node::Sum(sum),
            TypeValue::Product(product) => Node::Product(product),
        }
    }
}

impl<'a> From<&'a Constructor> for Node<'a> {
    fn from(constructor: &'a Constructor) -> Self {
        Node::Constructor(constructor)
    }
}

impl<'a> From<&'a Field> for Node<'a> {
    fn from(field: &'a Field) -> Self {
        Node::Field(field)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Module({}, [{}])", self.name, self.dfns.iter().format(", "))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Type({}, {})", self.name, self.value)
    }
}

impl fmt::Display for TypeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeValue::Sum(sum) => fmt::Display::fmt(sum, f),
            TypeValue::Product(product) => fmt::Display::fmt(product, f),
        }
    }
}

impl fmt::Display for Sum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sum([{}]", self.constructors.iter().format(", "))?;
        if !self.attributes.is_empty() {
            write!(f, ", [{}]", self.attributes.iter().format(", "))?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Product([{}]", self.fields.iter().format(", "))?;
        if !self.attributes.is_empty() {
            write!(f, ", [{}]", self.attributes.iter().format(", "))?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Constructor({}, [{}])", self.name, self.fields.iter().format(", "))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Field({}", self.type_name)?;
        if let Some(name) = &self.name {
            write!(f, ", {name}")?;
        }
        if self.seq {
            write!(f, ", seq=True")?;
        }
        if self.opt {
            write!(f, ", opt=True")?;
        }
        write!(f, ")")
    }
}

impl<'a> fmt::Display for Node<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Module(module) => fmt::Display::fmt(module, f),
            Node::Type(dfn) => fmt::Display::fmt(dfn, f),
            Node::Sum(sum) => fmt::Display::fmt(sum, f),
            Node::Product(product) => fmt::Display::fmt(product, f),
            Node::Constructor(constructor) => fmt::Display::fmt(constructor, f),
            Node::Field(field) => fmt::Display::fmt(field, f),
        }
    }
}
