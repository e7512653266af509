use super::*;

fn parse_ok(source: &str) -> Module {
    match parse(source) {
        Ok(module) => module,
        Err(error) => panic!("failed to parse: {error}"),
    }
}

fn parse_err(source: &str) -> SyntaxError {
    match parse(source) {
        Ok(module) => panic!("unexpectedly parsed: {module}"),
        Err(error) => error,
    }
}

fn sum(dfn: &Type) -> &Sum {
    match &dfn.value {
        TypeValue::Sum(sum) => sum,
        TypeValue::Product(_) => panic!("expected a sum, found {}", dfn.value),
    }
}

fn product(dfn: &Type) -> &Product {
    match &dfn.value {
        TypeValue::Product(product) => product,
        TypeValue::Sum(_) => panic!("expected a product, found {}", dfn.value),
    }
}

#[test]
fn simple_sum() {
    let module = parse_ok("module Test { stmt = Expr(int value) | Pass }");

    assert_eq!(module.name(), "Test");
    assert_eq!(module.dfns().len(), 1);

    let stmt = &module.dfns()[0];
    assert_eq!(stmt.name, "stmt");

    let sum = sum(stmt);
    assert_eq!(sum.constructors.len(), 2);
    assert!(sum.attributes.is_empty());

    let expr = &sum.constructors[0];
    assert_eq!(expr.name, "Expr");
    assert_eq!(expr.fields.len(), 1);
    assert_eq!(expr.fields[0].type_name, "int");
    assert_eq!(expr.fields[0].name.as_deref(), Some("value"));
    assert!(!expr.fields[0].seq);
    assert!(!expr.fields[0].opt);

    let pass = &sum.constructors[1];
    assert_eq!(pass.name, "Pass");
    assert!(pass.fields.is_empty());
}

#[test]
fn definitions_in_source_order() {
    let module = parse_ok(
        "
        module Python {
            mod = Module(stmt* body)
            stmt = Pass | Break
            alias = (identifier name, identifier? asname)
            keyword = (identifier arg, expr value)
            expr = Name(identifier id)
        }
        ",
    );

    assert_eq!(
        module.definition_names().collect::<Vec<_>>(),
        vec!["mod", "stmt", "alias", "keyword", "expr"],
    );
    assert!(matches!(module.lookup("alias"), Some(TypeValue::Product(_))));
    assert!(matches!(module.lookup("stmt"), Some(TypeValue::Sum(_))));
}

#[test]
fn empty_module() {
    let module = parse_ok("module Empty {}");
    assert_eq!(module.name(), "Empty");
    assert!(module.dfns().is_empty());
}

#[test]
fn lowercase_module_name() {
    let module = parse_ok("module test { }");
    assert_eq!(module.name(), "test");
}

#[test]
fn product_with_attributes() {
    let module = parse_ok(
        "module Test {
            arg = (identifier arg, expr? annotation)
                  attributes (int lineno, int col_offset)
        }",
    );

    let product = product(&module.dfns()[0]);
    let fields = product.fields.iter().map(Field::to_source).collect::<Vec<_>>();
    assert_eq!(fields, vec!["identifier arg", "expr? annotation"]);
    let attributes = product.attributes.iter().map(Field::to_source).collect::<Vec<_>>();
    assert_eq!(attributes, vec!["int lineno", "int col_offset"]);
}

#[test]
fn sum_with_attributes() {
    let module = parse_ok(
        "module Test {
            stmt = Pass | Return(expr? value)
                 attributes (int lineno)
            expr = Name(identifier id)
        }",
    );

    let stmt = sum(&module.dfns()[0]);
    assert_eq!(stmt.constructors.len(), 2);
    assert_eq!(stmt.attributes.len(), 1);
    assert_eq!(stmt.attributes[0].to_source(), "int lineno");
    assert_eq!(module.dfns()[1].name, "expr");
}

#[test]
fn attributes_is_only_a_keyword_after_fields() {
    let module = parse_ok(
        "module Test {
            attributes = (int lineno)
            node = (attributes attributes)
        }",
    );

    assert_eq!(
        module.definition_names().collect::<Vec<_>>(),
        vec!["attributes", "node"],
    );
    let field = &product(&module.dfns()[1]).fields[0];
    assert_eq!(field.type_name, "attributes");
    assert_eq!(field.name.as_deref(), Some("attributes"));
}

#[test]
fn quantifiers() {
    let module = parse_ok("module Test { call = (expr func, expr* args, keyword? kw) }");
    let fields = &product(&module.dfns()[0]).fields;

    assert!(!fields[0].seq && !fields[0].opt);
    assert!(fields[1].seq && !fields[1].opt);
    assert!(!fields[2].seq && fields[2].opt);
}

#[test]
fn multiple_quantifiers() {
    for source in ["module Test { a = (int?* x) }", "module Test { a = (int*? x) }"] {
        let error = parse_err(source);
        assert_eq!(error.message(), "a field may have at most one quantifier");
        assert_eq!(error.line(), Some(1));
    }
}

#[test]
fn unnamed_and_constructor_named_fields() {
    let module = parse_ok("module Test { a = (int, string Name) }");
    let fields = &product(&module.dfns()[0]).fields;

    assert_eq!(fields[0].name, None);
    assert_eq!(fields[1].name.as_deref(), Some("Name"));
}

#[test]
fn trailing_comma() {
    let with_comma = parse_ok("module Test { a = (int x, string y,) }");
    let without_comma = parse_ok("module Test { a = (int x, string y) }");
    assert_eq!(with_comma.to_string(), without_comma.to_string());
}

#[test]
fn commas_are_optional_between_fields() {
    let module = parse_ok("module Test { a = (int x string y) }");
    assert_eq!(product(&module.dfns()[0]).fields.len(), 2);
}

#[test]
fn empty_fields() {
    let module = parse_ok("module Test { a = X() }");
    assert!(sum(&module.dfns()[0]).constructors[0].fields.is_empty());
}

#[test]
fn non_ascii_identifiers() {
    let module = parse_ok("module Tëst { stmt = Pass | Ünit(éxpr välue) }");
    assert_eq!(module.name(), "Tëst");

    let stmt = sum(&module.dfns()[0]);
    assert_eq!(stmt.constructors[1].name, "Ünit");
    assert_eq!(stmt.constructors[1].fields[0].type_name, "éxpr");
    assert_eq!(stmt.constructors[1].fields[0].name.as_deref(), Some("välue"));
}

#[test]
fn lowercase_non_ascii_constructor() {
    let error = parse_err("module Test { stmt = Pass | é }");
    assert_eq!(
        error.message(),
        "expected constructor identifier, found type identifier",
    );
}

#[test]
fn comments() {
    let module = parse_ok(
        "-- leading comment
        module Test { -- trailing comment
            -- stmt = Nope
            stmt = Pass
        }",
    );
    assert_eq!(module.definition_names().collect::<Vec<_>>(), vec!["stmt"]);
}

#[test]
fn node_ranges() {
    let source = "module Test {\n  stmt = Expr(int value)\n}";
    let module = parse_ok(source);
    let stmt = &module.dfns()[0];
    let expr = &sum(stmt).constructors[0];

    assert_eq!(&source[std::ops::Range::from(stmt.range)], "stmt");
    assert_eq!(&source[std::ops::Range::from(expr.range)], "Expr");
    assert_eq!(&source[std::ops::Range::from(expr.fields[0].range)], "int");
}

#[test]
fn missing_type() {
    let error = parse_err("module Test {\n  stmt =\n}");
    assert_eq!(error.line(), Some(3));
    assert_eq!(
        error.to_string(),
        "Syntax error on line 3: expected constructor identifier, found `}`",
    );
}

#[test]
fn missing_type_on_one_line() {
    let error = parse_err("module Test { stmt = }");
    assert_eq!(error.line(), Some(1));
}

#[test]
fn missing_module_keyword() {
    let error = parse_err("Test { }");
    assert_eq!(error.message(), "expected `module`, found `Test`");
}

#[test]
fn empty_source() {
    let error = parse_err("");
    assert_eq!(error.line(), None);
    assert_eq!(
        error.to_string(),
        "Syntax error on line <unknown>: expected `module`, found `end of input`",
    );
}

#[test]
fn unterminated_module() {
    let error = parse_err("module Test {\n  stmt = Pass\n");
    assert_eq!(error.line(), None);
    assert_eq!(error.message(), "expected `}`, found end of input");
}

#[test]
fn lowercase_constructor() {
    let error = parse_err("module Test { stmt = pass }");
    assert_eq!(
        error.message(),
        "expected constructor identifier, found type identifier",
    );
}

#[test]
fn module_name_must_be_an_identifier() {
    let error = parse_err("module { }");
    assert_eq!(
        error.message(),
        "expected constructor identifier or type identifier, found `{`",
    );
}

#[test]
fn constructor_as_field_type() {
    let error = parse_err("module Test { a = (Int x) }");
    assert_eq!(error.message(), "expected `)`, found constructor identifier");
}

#[test]
fn trailing_tokens() {
    let error = parse_err("module Test { }\n}");
    assert_eq!(error.line(), Some(2));
    assert_eq!(error.message(), "expected end of input, found `}`");
}

#[test]
fn invalid_character() {
    let error = parse_err("module Test {\n  stmt = Pass;\n}");
    assert_eq!(error.line(), Some(2));
    assert_eq!(error.to_string(), "Syntax error on line 2: invalid character `;`");
    assert!(error.range().is_some());
}
