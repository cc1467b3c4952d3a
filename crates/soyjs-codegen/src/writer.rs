//! The output sink generated fragments are written through.
//!
//! Emitters only see the [`JsSink`] trait: they append literal text and ask
//! the sink to render argument expressions in place. [`JsWriter`] is the
//! concrete sink. It buffers one translation unit in memory and tracks the
//! indentation and local bindings the statement generator needs.

use soyjs_types::ast::Expr;

use crate::error::CodegenResult;
use crate::funcs::FuncRegistry;

/// Ordered, append-only destination for JavaScript fragments.
pub trait JsSink {
    /// Append literal text.
    fn write_str(&mut self, text: &str);

    /// Append the rendered form of an argument expression.
    fn write_arg(&mut self, arg: &Expr) -> CodegenResult<()>;
}

/// How a template-local name is bound in the generated function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalKind {
    /// A `foreach` loop variable.
    Loop,
    /// A `let` binding.
    Let,
}

#[derive(Debug)]
struct Local {
    name: String,
    kind: LocalKind,
}

/// In-memory JavaScript writer for one translation unit.
#[derive(Debug)]
pub struct JsWriter<'a> {
    funcs: &'a FuncRegistry,
    buf: String,
    indent: usize,
    locals: Vec<Local>,
}

impl<'a> JsWriter<'a> {
    pub fn new(funcs: &'a FuncRegistry) -> Self {
        Self {
            funcs,
            buf: String::new(),
            indent: 0,
            locals: Vec::new(),
        }
    }

    /// The page-function table consulted for non-native calls.
    pub fn funcs(&self) -> &'a FuncRegistry {
        self.funcs
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn finish(self) -> String {
        self.buf
    }

    // ── Statement layout ─────────────────────────────────────────────────

    pub(crate) fn indent(&mut self) {
        self.indent += 1;
    }

    pub(crate) fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    pub(crate) fn start_line(&mut self) {
        for _ in 0..self.indent {
            self.buf.push_str("  ");
        }
    }

    pub(crate) fn line(&mut self, text: &str) {
        self.start_line();
        self.buf.push_str(text);
        self.buf.push('\n');
    }

    // ── Local bindings ───────────────────────────────────────────────────

    pub(crate) fn push_local(&mut self, name: &str, kind: LocalKind) {
        self.locals.push(Local {
            name: name.to_string(),
            kind,
        });
    }

    pub(crate) fn scope_depth(&self) -> usize {
        self.locals.len()
    }

    /// Drop every local bound since `depth` was recorded.
    pub(crate) fn restore_scope(&mut self, depth: usize) {
        self.locals.truncate(depth);
    }

    /// Innermost binding for `name`, if any.
    pub fn lookup_local(&self, name: &str) -> Option<LocalKind> {
        self.locals
            .iter()
            .rev()
            .find(|l| l.name == name)
            .map(|l| l.kind)
    }
}

impl JsSink for JsWriter<'_> {
    fn write_str(&mut self, text: &str) {
        self.buf.push_str(text);
    }

    fn write_arg(&mut self, arg: &Expr) -> CodegenResult<()> {
        self.write_expr(arg)
    }
}

/// Quote `s` as a single-quoted JavaScript string literal.
///
/// `<` is escaped so template text can never close an enclosing `<script>`.
pub fn quote_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '<' => out.push_str("\\u003c"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_plain() {
        assert_eq!(quote_js_string("hello"), "'hello'");
    }

    #[test]
    fn test_quote_escapes() {
        assert_eq!(quote_js_string("it's"), r"'it\'s'");
        assert_eq!(quote_js_string("a\\b"), r"'a\\b'");
        assert_eq!(quote_js_string("a\nb"), r"'a\nb'");
        assert_eq!(quote_js_string("</script>"), r"'\u003c/script>'");
    }

    #[test]
    fn test_locals_shadow_and_restore() {
        let funcs = FuncRegistry::empty();
        let mut w = JsWriter::new(&funcs);
        w.push_local("x", LocalKind::Let);
        let depth = w.scope_depth();
        w.push_local("x", LocalKind::Loop);
        assert_eq!(w.lookup_local("x"), Some(LocalKind::Loop));
        w.restore_scope(depth);
        assert_eq!(w.lookup_local("x"), Some(LocalKind::Let));
        assert_eq!(w.lookup_local("y"), None);
    }

    #[test]
    fn test_indented_lines() {
        let funcs = FuncRegistry::empty();
        let mut w = JsWriter::new(&funcs);
        w.line("a {");
        w.indent();
        w.line("b;");
        w.dedent();
        w.line("}");
        assert_eq!(w.finish(), "a {\n  b;\n}\n");
    }
}
