//! Per-file generation tests.
//!
//! Tests validate:
//! - File layout (header, namespace bootstrap, template functions)
//! - Statement generation (print, if, foreach, let)
//! - Page function calls inside template bodies
//! - Failed files write nothing to the destination

use soyjs_codegen::{CodegenError, FileGenerator, FuncRegistry, Generator};
use soyjs_types::ast::{Access, Expr, ExprKind, IfBranch, Node, SoyFile, Template};
use soyjs_types::TemplateRegistry;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn file(name: &str, namespace: &str, templates: Vec<Template>) -> SoyFile {
    SoyFile {
        name: name.into(),
        namespace: namespace.into(),
        templates,
    }
}

fn template(name: &str, body: Vec<Node>) -> Template {
    Template {
        name: name.into(),
        body,
        span: Default::default(),
    }
}

fn text(s: &str) -> Node {
    Node::RawText { text: s.into() }
}

fn print(expr: Expr) -> Node {
    Node::Print { expr }
}

fn field(root: &str, key: &str) -> Expr {
    ExprKind::Data {
        root: root.into(),
        path: vec![Access::Key { name: key.into() }],
    }
    .into()
}

/// Generate one file from a single-file registry (panics on error).
fn generate(soy: SoyFile) -> String {
    try_generate(soy).unwrap_or_else(|e| panic!("codegen failed: {e}"))
}

fn try_generate(soy: SoyFile) -> Result<String, CodegenError> {
    let name = soy.name.clone();
    let registry = TemplateRegistry::new(vec![soy]);
    let funcs = FuncRegistry::new();
    let mut out = Vec::new();
    Generator::new(&registry, &funcs).write_file(&mut out, &name)?;
    Ok(String::from_utf8(out).expect("generated JavaScript is UTF-8"))
}

// ══════════════════════════════════════════════════════════════════════════════
// File layout
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn hello_world_file() {
    let js = generate(file(
        "hello.soy",
        "pages.hello",
        vec![template(
            ".greet",
            vec![text("Hello "), print(Expr::data("name")), text("!")],
        )],
    ));
    let expected = "\
// This file was automatically generated from hello.soy.
// Please don't edit this file by hand.

if (typeof pages == 'undefined') { var pages = {}; }
if (typeof pages.hello == 'undefined') { pages.hello = {}; }

pages.hello.greet = function(opt_data, opt_ignored, opt_ijData) {
  opt_data = opt_data || {};
  var output = '';
  output += 'Hello ';
  output += opt_data.name;
  output += '!';
  return output;
};
";
    assert_eq!(js, expected);
}

#[test]
fn every_template_becomes_a_function() {
    let js = generate(file(
        "multi.soy",
        "pages.multi",
        vec![template(".a", vec![]), template("b", vec![])],
    ));
    assert!(js.contains("pages.multi.a = function(opt_data, opt_ignored, opt_ijData) {"));
    assert!(js.contains("pages.multi.b = function(opt_data, opt_ignored, opt_ijData) {"));
    assert_eq!(js.matches("return output;").count(), 2);
}

#[test]
fn missing_namespace_is_unsupported() {
    let err = try_generate(file("bare.soy", "", vec![])).unwrap_err();
    assert!(matches!(err, CodegenError::Unsupported { .. }), "{err:?}");
}

#[test]
fn namespace_with_empty_segment_is_unsupported() {
    for namespace in ["a..b", ".a", "a.", "."] {
        let soy = file("ns.soy", namespace, vec![template(".t", vec![text("x")])]);
        let registry = TemplateRegistry::new(vec![soy]);
        let funcs = FuncRegistry::new();
        let mut out = Vec::new();
        let err = Generator::new(&registry, &funcs)
            .write_file(&mut out, "ns.soy")
            .unwrap_err();
        assert!(
            matches!(&err, CodegenError::Unsupported { message, .. } if message.contains(namespace)),
            "{namespace}: {err:?}"
        );
        assert!(out.is_empty(), "{namespace}: partial output leaked");
    }
}

#[test]
fn unknown_file_is_reported() {
    let registry = TemplateRegistry::default();
    let funcs = FuncRegistry::new();
    let mut out = Vec::new();
    let err = Generator::new(&registry, &funcs)
        .write_file(&mut out, "nope.soy")
        .unwrap_err();
    assert!(matches!(&err, CodegenError::UnknownFile(name) if name == "nope.soy"));
    assert!(out.is_empty());
}

// ══════════════════════════════════════════════════════════════════════════════
// Statements
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn if_elseif_else_chain() {
    let js = generate(file(
        "cond.soy",
        "pages.cond",
        vec![template(
            ".status",
            vec![Node::If {
                branches: vec![
                    IfBranch {
                        cond: field("hours", "open"),
                        body: vec![text("Open")],
                    },
                    IfBranch {
                        cond: Expr::call("isNonnull", vec![field("hours", "reopen")]),
                        body: vec![text("Reopens soon")],
                    },
                ],
                else_body: Some(vec![text("Closed")]),
            }],
        )],
    ));
    let expected_body = "\
  if (opt_data.hours.open) {
    output += 'Open';
  } else if ((opt_data.hours.reopen != null)) {
    output += 'Reopens soon';
  } else {
    output += 'Closed';
  }
";
    assert!(js.contains(expected_body), "{js}");
}

#[test]
fn foreach_with_ifempty_and_loop_builtins() {
    let js = generate(file(
        "list.soy",
        "pages.list",
        vec![template(
            ".items",
            vec![Node::Foreach {
                var: "item".into(),
                list: Expr::data("items"),
                body: vec![
                    print(field("item", "name")),
                    Node::If {
                        branches: vec![IfBranch {
                            cond: Expr::call("isLast", vec![Expr::data("item")]),
                            body: vec![text(".")],
                        }],
                        else_body: Some(vec![text(", ")]),
                    },
                ],
                if_empty: Some(vec![text("Nothing here")]),
            }],
        )],
    ));
    let expected_body = "\
  var itemList = opt_data.items;
  var itemListLen = itemList.length;
  if (itemListLen > 0) {
    for (var itemIndex = 0; itemIndex < itemListLen; itemIndex++) {
      var itemData = itemList[itemIndex];
      output += itemData.name;
      if ((itemIndex == itemListLen - 1)) {
        output += '.';
      } else {
        output += ', ';
      }
    }
  } else {
    output += 'Nothing here';
  }
";
    assert!(js.contains(expected_body), "{js}");
}

#[test]
fn foreach_without_ifempty_has_no_guard() {
    let js = generate(file(
        "list.soy",
        "pages.list",
        vec![template(
            ".items",
            vec![Node::Foreach {
                var: "x".into(),
                list: Expr::data("xs"),
                body: vec![print(Expr::call("index", vec![Expr::data("x")]))],
                if_empty: None,
            }],
        )],
    ));
    assert!(!js.contains("if (xListLen > 0)"));
    assert!(js.contains("    output += xIndex;\n"), "{js}");
}

#[test]
fn loop_variable_is_out_of_scope_after_loop() {
    let js = generate(file(
        "scope.soy",
        "pages.scope",
        vec![template(
            ".t",
            vec![
                Node::Foreach {
                    var: "x".into(),
                    list: Expr::data("xs"),
                    body: vec![print(Expr::data("x"))],
                    if_empty: None,
                },
                print(Expr::data("x")),
            ],
        )],
    ));
    assert!(js.contains("    output += xData;\n"));
    assert!(js.contains("  output += opt_data.x;\n"), "{js}");
}

#[test]
fn let_bindings_shadow_data() {
    let js = generate(file(
        "let.soy",
        "pages.let",
        vec![template(
            ".t",
            vec![
                Node::Let {
                    name: "phone".into(),
                    value: Expr::call("prettyPrintPhone", vec![field("location", "phone")]),
                },
                print(Expr::data("phone")),
            ],
        )],
    ));
    assert!(js.contains(
        "  var phone__soy = yext.pages.soy.prettyPrintPhone(opt_data.location.phone);\n"
    ));
    assert!(js.contains("  output += phone__soy;\n"), "{js}");
}

#[test]
fn page_functions_inside_templates() {
    let js = generate(file(
        "hours.soy",
        "pages.hours",
        vec![template(
            ".hours",
            vec![
                print(Expr::call("collapseDays", vec![field("location", "hours")])),
                print(Expr::call(
                    "slice",
                    vec![field("location", "photos"), Expr::int(0), Expr::int(3)],
                )),
                print(Expr::call("gmap", vec![Expr::data("location")])),
            ],
        )],
    ));
    assert!(js.contains("  output += yext.pages.soy.collapseDays(opt_data.location.hours);\n"));
    assert!(js.contains("  output += opt_data.location.photos.slice(0, 3);\n"));
    assert!(js.contains("  output += alert('gmap is not implemented for JS templates');\n"));
}

// ══════════════════════════════════════════════════════════════════════════════
// Failure behavior
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn arity_error_writes_nothing() {
    let soy = file(
        "bad.soy",
        "pages.bad",
        vec![
            template(".ok", vec![text("fine")]),
            template(
                ".broken",
                vec![print(Expr::call("strlen", vec![Expr::data("a"), Expr::data("b")]))],
            ),
        ],
    );
    let registry = TemplateRegistry::new(vec![soy]);
    let funcs = FuncRegistry::new();
    let mut out = Vec::new();
    let err = Generator::new(&registry, &funcs)
        .write_file(&mut out, "bad.soy")
        .unwrap_err();
    assert!(
        matches!(&err, CodegenError::ArityMismatch { name, got: 2, .. } if name == "strlen"),
        "{err:?}"
    );
    assert!(out.is_empty(), "partial output leaked");
}

#[test]
fn unknown_function_in_body() {
    let err = try_generate(file(
        "u.soy",
        "pages.u",
        vec![template(".t", vec![print(Expr::call("nope", vec![]))])],
    ))
    .unwrap_err();
    assert!(matches!(err, CodegenError::UnknownFunction { .. }));
}

// ══════════════════════════════════════════════════════════════════════════════
// JSON input
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn generate_from_decoded_json() {
    let soy: SoyFile = serde_json::from_str(
        r#"{
            "name": "phone.soy",
            "namespace": "pages.phone",
            "templates": [{
                "name": ".digits",
                "body": [
                    { "node": "print", "expr": {
                        "expr": "call", "name": "stripOutPhoneDigits",
                        "args": [{ "expr": "data", "root": "phone" }]
                    } }
                ]
            }]
        }"#,
    )
    .unwrap();
    let js = generate(soy);
    assert!(js.contains("  output += yext.pages.soy.stripOutPhoneDigits(opt_data.phone);\n"));
}

#[test]
fn generation_is_deterministic() {
    let make = || {
        file(
            "d.soy",
            "pages.d",
            vec![template(
                ".t",
                vec![print(Expr::call("timef", vec![Expr::data("a"), Expr::string("%H")]))],
            )],
        )
    };
    let first = generate(make());
    for i in 0..100 {
        assert_eq!(first, generate(make()), "Determinism failure at iteration {i}");
    }
}
