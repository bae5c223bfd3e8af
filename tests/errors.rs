use inkwell::context::Context;
use tobsterlang::codegen::Codegen;
use tobsterlang::{parser, Error};

fn lower_err(source: &str) -> Error {
    let program = parser::parse(source).expect("source should parse");
    let context = Context::create();
    let mut codegen = Codegen::new(&context);
    let result = codegen.generate(&program);
    match result {
        Ok(_) => panic!("expected lowering to fail"),
        Err(err) => err,
    }
}

// ── Type resolution ──────────────────────────────────────────────────────

#[test]
fn unknown_return_type_is_fatal() {
    let err = lower_err(r#"<Root module="m"><Func name="f" returns="Float"/></Root>"#);
    assert!(matches!(err, Error::UnknownType(name) if name == "Float"));
}

#[test]
fn unknown_parameter_type_is_fatal() {
    let err = lower_err(r#"<Root module="m"><Func name="f" x="Float"/></Root>"#);
    assert!(matches!(err, Error::UnknownType(name) if name == "Float"));
}

#[test]
fn unknown_variable_type_is_fatal() {
    let err = lower_err(
        r#"<Root module="m"><Func name="f"><Var name="x" type="Number"/></Func></Root>"#,
    );
    assert!(matches!(err, Error::UnknownType(name) if name == "Number"));
}

#[test]
fn value_of_void_type_is_rejected_as_unknown() {
    // `Void` resolves as a type name but has no literal form.
    let err = lower_err(
        r#"<Root module="m"><Func name="f"><Value type="Void">x</Value></Func></Root>"#,
    );
    assert!(matches!(err, Error::UnknownType(name) if name == "Void"));
}

// ── Function resolution ──────────────────────────────────────────────────

#[test]
fn calling_an_undeclared_function_fails() {
    let err = lower_err(
        r#"<Root module="m"><Func name="f"><Call name="nonsense"/></Func></Root>"#,
    );
    assert!(matches!(err, Error::UnknownFunction(name) if name == "nonsense"));
}

#[test]
fn functions_are_not_visible_before_their_definition() {
    let err = lower_err(
        r#"<Root module="m"><Func name="f"><Call name="g"/></Func><Func name="g"/></Root>"#,
    );
    assert!(matches!(err, Error::UnknownFunction(name) if name == "g"));
}

// ── Malformed nodes ──────────────────────────────────────────────────────

#[test]
fn func_requires_a_name() {
    let err = lower_err(r#"<Root module="m"><Func returns="Int32"/></Root>"#);
    assert!(matches!(err, Error::MalformedNode { .. }));
}

#[test]
fn store_requires_exactly_one_child() {
    let err = lower_err(
        r#"<Root module="m"><Func name="f"><Var name="x" type="Int32"/><Store name="x"><Value type="Int32">1</Value><Value type="Int32">2</Value></Store></Func></Root>"#,
    );
    assert!(matches!(err, Error::MalformedNode { .. }));

    let err = lower_err(
        r#"<Root module="m"><Func name="f"><Var name="x" type="Int32"/><Store name="x"/></Func></Root>"#,
    );
    assert!(matches!(err, Error::MalformedNode { .. }));
}

#[test]
fn arithmetic_requires_two_operands() {
    let err = lower_err(
        r#"<Root module="m"><Func name="f"><Add><Value type="Int32">1</Value></Add></Func></Root>"#,
    );
    assert!(matches!(err, Error::MalformedNode { .. }));
}

#[test]
fn non_numeric_integer_literal_is_rejected() {
    let err = lower_err(
        r#"<Root module="m"><Func name="f"><Value type="Int32">five</Value></Func></Root>"#,
    );
    assert!(matches!(err, Error::MalformedNode { .. }));
}

// ── Symbol table ─────────────────────────────────────────────────────────

#[test]
fn loading_an_undeclared_variable_fails() {
    let err = lower_err(
        r#"<Root module="m"><Func name="f"><Load name="ghost"/></Func></Root>"#,
    );
    assert!(matches!(err, Error::UndefinedVariable(name) if name == "ghost"));
}

#[test]
fn slots_do_not_leak_across_functions() {
    // `x` is declared in `f`; the table is reset when `g` starts.
    let err = lower_err(
        r#"<Root module="m"><Func name="f"><Var name="x" type="Int32"/></Func><Func name="g"><Load name="x"/></Func></Root>"#,
    );
    assert!(matches!(err, Error::UndefinedVariable(name) if name == "x"));
}

#[test]
fn parameters_of_type_void_are_rejected() {
    let err = lower_err(r#"<Root module="m"><Func name="f" x="Void"/></Root>"#);
    assert!(matches!(err, Error::MalformedNode { .. }));
}
