//! Per-file JavaScript generation.
//!
//! Each compiled file becomes one self-contained fragment:
//! 1. a header comment naming the source file
//! 2. namespace bootstrap statements for every dotted prefix
//! 3. one `<namespace>.<template> = function(...) { ... };` per template
//!
//! A file is rendered completely in memory before anything reaches the
//! destination, so a failing file contributes no output.

use std::io::Write;

use soyjs_types::ast::{Expr, Node, SoyFile, Template};
use soyjs_types::{Span, TemplateRegistry};

use crate::error::{CodegenError, CodegenResult};
use crate::funcs::FuncRegistry;
use crate::writer::{quote_js_string, JsSink, JsWriter, LocalKind};

/// The per-file generation entry point the translation loop drives.
pub trait FileGenerator {
    /// Generate `file_name` and append its JavaScript to `out`.
    fn write_file(&self, out: &mut dyn Write, file_name: &str) -> CodegenResult<()>;
}

/// Generates JavaScript for files of one [`TemplateRegistry`].
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    registry: &'a TemplateRegistry,
    funcs: &'a FuncRegistry,
}

impl<'a> Generator<'a> {
    pub fn new(registry: &'a TemplateRegistry, funcs: &'a FuncRegistry) -> Self {
        Self { registry, funcs }
    }

    /// Render one compiled file to a JavaScript string.
    pub fn render_file(&self, file: &SoyFile) -> CodegenResult<String> {
        if file.namespace.is_empty() {
            return Err(CodegenError::Unsupported {
                message: format!("file `{}` declares no namespace", file.name),
                span: Span::default(),
            });
        }
        if file.namespace.split('.').any(str::is_empty) {
            return Err(CodegenError::Unsupported {
                message: format!(
                    "file `{}` has an empty segment in namespace `{}`",
                    file.name, file.namespace
                ),
                span: Span::default(),
            });
        }

        let mut w = JsWriter::new(self.funcs);
        w.line(&format!(
            "// This file was automatically generated from {}.",
            file.name
        ));
        w.line("// Please don't edit this file by hand.");
        w.line("");
        emit_namespace(&mut w, &file.namespace);

        for template in &file.templates {
            w.line("");
            emit_template(&mut w, &file.namespace, template)?;
        }
        Ok(w.finish())
    }
}

impl FileGenerator for Generator<'_> {
    fn write_file(&self, out: &mut dyn Write, file_name: &str) -> CodegenResult<()> {
        let file = self
            .registry
            .file(file_name)
            .ok_or_else(|| CodegenError::UnknownFile(file_name.to_string()))?;
        let js = self.render_file(file)?;
        tracing::debug!(
            file = file_name,
            templates = file.templates.len(),
            bytes = js.len(),
            "file generated"
        );
        out.write_all(js.as_bytes())?;
        Ok(())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// File structure
// ══════════════════════════════════════════════════════════════════════════════

/// `if (typeof a == 'undefined') { var a = {}; }` for `a`, then
/// `if (typeof a.b == 'undefined') { a.b = {}; }` for each deeper prefix.
fn emit_namespace(w: &mut JsWriter<'_>, namespace: &str) {
    let mut prefix = String::new();
    for (i, part) in namespace.split('.').enumerate() {
        if i > 0 {
            prefix.push('.');
        }
        prefix.push_str(part);
        let decl = if i == 0 { "var " } else { "" };
        w.line(&format!(
            "if (typeof {prefix} == 'undefined') {{ {decl}{prefix} = {{}}; }}"
        ));
    }
}

fn emit_template(w: &mut JsWriter<'_>, namespace: &str, template: &Template) -> CodegenResult<()> {
    let name = template
        .name
        .strip_prefix('.')
        .unwrap_or(&template.name);
    w.line(&format!(
        "{namespace}.{name} = function(opt_data, opt_ignored, opt_ijData) {{"
    ));
    w.indent();
    w.line("opt_data = opt_data || {};");
    w.line("var output = '';");
    emit_nodes(w, &template.body)?;
    w.line("return output;");
    w.dedent();
    w.line("};");
    Ok(())
}

// ══════════════════════════════════════════════════════════════════════════════
// Body nodes
// ══════════════════════════════════════════════════════════════════════════════

fn emit_nodes(w: &mut JsWriter<'_>, nodes: &[Node]) -> CodegenResult<()> {
    for node in nodes {
        emit_node(w, node)?;
    }
    Ok(())
}

/// Emit `nodes` one level deeper; bindings made inside do not leak out.
fn emit_block(w: &mut JsWriter<'_>, nodes: &[Node]) -> CodegenResult<()> {
    let depth = w.scope_depth();
    w.indent();
    emit_nodes(w, nodes)?;
    w.dedent();
    w.restore_scope(depth);
    Ok(())
}

fn emit_node(w: &mut JsWriter<'_>, node: &Node) -> CodegenResult<()> {
    match node {
        Node::RawText { text } => {
            if !text.is_empty() {
                w.line(&format!("output += {};", quote_js_string(text)));
            }
        }
        Node::Print { expr } => {
            w.start_line();
            w.write_str("output += ");
            w.write_expr(expr)?;
            w.write_str(";\n");
        }
        Node::If {
            branches,
            else_body,
        } => {
            if branches.is_empty() {
                if let Some(body) = else_body {
                    let depth = w.scope_depth();
                    emit_nodes(w, body)?;
                    w.restore_scope(depth);
                }
                return Ok(());
            }
            for (i, branch) in branches.iter().enumerate() {
                w.start_line();
                w.write_str(if i == 0 { "if (" } else { "} else if (" });
                w.write_expr(&branch.cond)?;
                w.write_str(") {\n");
                emit_block(w, &branch.body)?;
            }
            if let Some(body) = else_body {
                w.line("} else {");
                emit_block(w, body)?;
            }
            w.line("}");
        }
        Node::Foreach {
            var,
            list,
            body,
            if_empty,
        } => emit_foreach(w, var, list, body, if_empty.as_deref())?,
        Node::Let { name, value } => {
            w.start_line();
            w.write_str(&format!("var {name}__soy = "));
            w.write_expr(value)?;
            w.write_str(";\n");
            w.push_local(name, LocalKind::Let);
        }
    }
    Ok(())
}

fn emit_foreach(
    w: &mut JsWriter<'_>,
    var: &str,
    list: &Expr,
    body: &[Node],
    if_empty: Option<&[Node]>,
) -> CodegenResult<()> {
    // The list is evaluated before the loop variable comes into scope.
    w.start_line();
    w.write_str(&format!("var {var}List = "));
    w.write_expr(list)?;
    w.write_str(";\n");
    w.line(&format!("var {var}ListLen = {var}List.length;"));

    if if_empty.is_some() {
        w.line(&format!("if ({var}ListLen > 0) {{"));
        w.indent();
    }

    w.line(&format!(
        "for (var {var}Index = 0; {var}Index < {var}ListLen; {var}Index++) {{"
    ));
    let depth = w.scope_depth();
    w.indent();
    w.push_local(var, LocalKind::Loop);
    w.line(&format!("var {var}Data = {var}List[{var}Index];"));
    emit_nodes(w, body)?;
    w.restore_scope(depth);
    w.dedent();
    w.line("}");

    if let Some(empty) = if_empty {
        w.dedent();
        w.line("} else {");
        emit_block(w, empty)?;
        w.line("}");
    }
    Ok(())
}
