//! Expression code generation.
//!
//! Every template expression becomes one JavaScript expression. Compound
//! operator results are always parenthesized, so a rendered expression can
//! be dropped into any argument or operand position unchanged.

use soyjs_types::ast::*;
use soyjs_types::Span;

use crate::error::{CodegenError, CodegenResult};
use crate::funcs::{arg_list, method_call, Arity};
use crate::writer::{quote_js_string, JsSink, JsWriter, LocalKind};

impl JsWriter<'_> {
    /// Append the JavaScript rendering of `expr`.
    pub fn write_expr(&mut self, expr: &Expr) -> CodegenResult<()> {
        match &expr.kind {
            // ── Literals ──────────────────────────────────────────────────────
            ExprKind::Null => self.write_str("null"),
            ExprKind::Bool { value } => self.write_str(if *value { "true" } else { "false" }),
            // Negative literals are grouped so a leading `-` never merges
            // with a preceding unary minus into `--`.
            ExprKind::Int { value } if *value < 0 => self.write_str(&format!("({value})")),
            ExprKind::Int { value } => self.write_str(&value.to_string()),
            ExprKind::Float { value } => {
                if !value.is_finite() {
                    return Err(CodegenError::Unsupported {
                        message: format!("non-finite float literal {value}"),
                        span: expr.span,
                    });
                }
                if value.is_sign_negative() {
                    self.write_str(&format!("({value:?})"));
                } else {
                    self.write_str(&format!("{value:?}"));
                }
            }
            ExprKind::Str { value } => self.write_str(&quote_js_string(value)),
            ExprKind::List { items } => {
                self.write_str("[");
                self.write_comma_separated(items)?;
                self.write_str("]");
            }
            ExprKind::Map { entries } => self.write_map(entries)?,

            // ── References ───────────────────────────────────────────────────
            ExprKind::Global { name } => self.write_str(name),
            ExprKind::Data { root, path } => self.write_data_ref(root, path)?,

            // ── Operators ────────────────────────────────────────────────────
            ExprKind::Unary { op, operand } => {
                self.write_str("(");
                self.write_str(op.js_symbol());
                self.write_expr(operand)?;
                self.write_str(")");
            }
            ExprKind::Binary { op, left, right } => {
                self.write_str("(");
                self.write_expr(left)?;
                self.write_str(" ");
                self.write_str(op.js_symbol());
                self.write_str(" ");
                self.write_expr(right)?;
                self.write_str(")");
            }
            ExprKind::Ternary {
                cond,
                then,
                otherwise,
            } => {
                self.write_str("(");
                self.write_expr(cond)?;
                self.write_str(" ? ");
                self.write_expr(then)?;
                self.write_str(" : ");
                self.write_expr(otherwise)?;
                self.write_str(")");
            }
            ExprKind::Elvis { left, right } => {
                self.write_str("(");
                self.write_expr(left)?;
                self.write_str(" != null ? ");
                self.write_expr(left)?;
                self.write_str(" : ");
                self.write_expr(right)?;
                self.write_str(")");
            }

            // ── Calls ────────────────────────────────────────────────────────
            ExprKind::Call(call) => self.write_call(call, expr.span)?,
        }
        Ok(())
    }

    fn write_comma_separated(&mut self, items: &[Expr]) -> CodegenResult<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write_str(", ");
            }
            self.write_expr(item)?;
        }
        Ok(())
    }

    fn write_map(&mut self, entries: &[MapEntry]) -> CodegenResult<()> {
        self.write_str("{");
        for (i, entry) in entries.iter().enumerate() {
            if i > 0 {
                self.write_str(", ");
            }
            match &entry.key.kind {
                ExprKind::Str { value } => self.write_str(&quote_js_string(value)),
                _ => {
                    self.write_str("[");
                    self.write_expr(&entry.key)?;
                    self.write_str("]");
                }
            }
            self.write_str(": ");
            self.write_expr(&entry.value)?;
        }
        self.write_str("}");
        Ok(())
    }

    fn write_data_ref(&mut self, root: &str, path: &[Access]) -> CodegenResult<()> {
        match self.lookup_local(root) {
            Some(LocalKind::Loop) => self.write_str(&format!("{root}Data")),
            Some(LocalKind::Let) => self.write_str(&format!("{root}__soy")),
            None => {
                self.write_str("opt_data.");
                self.write_str(root);
            }
        }
        for access in path {
            match access {
                Access::Key { name } => {
                    self.write_str(".");
                    self.write_str(name);
                }
                Access::Index { index } => {
                    self.write_str("[");
                    self.write_expr(index)?;
                    self.write_str("]");
                }
            }
        }
        Ok(())
    }

    // ══════════════════════════════════════════════════════════════════════
    // Function calls
    // ══════════════════════════════════════════════════════════════════════

    /// Native built-ins win over page functions of the same name; anything
    /// else must be in the page function registry.
    fn write_call(&mut self, call: &FuncCall, span: Span) -> CodegenResult<()> {
        if let Some(arity) = native_arity(&call.name) {
            arity.check(&call.name, call.args.len(), span)?;
            return self.write_native(&call.name, &call.args, span);
        }

        let funcs = self.funcs();
        match funcs.get(&call.name) {
            Some(func) => {
                func.check_arity(&call.name, call.args.len(), span)?;
                func.emitter.emit(self, &call.args)
            }
            None => Err(CodegenError::UnknownFunction {
                name: call.name.clone(),
                span,
            }),
        }
    }

    fn write_native(&mut self, name: &str, args: &[Expr], span: Span) -> CodegenResult<()> {
        match (name, args) {
            ("isNonnull", [x]) => {
                self.write_str("(");
                self.write_expr(x)?;
                self.write_str(" != null)");
            }
            ("length", [x]) => {
                self.write_expr(x)?;
                self.write_str(".length");
            }
            ("keys", _) => {
                self.write_str("Object.keys");
                arg_list(self, args)?;
            }
            ("floor", _) | ("ceiling", _) | ("round", _) | ("min", _) | ("max", _) => {
                let math = match name {
                    "ceiling" => "ceil",
                    other => other,
                };
                self.write_str("Math.");
                self.write_str(math);
                arg_list(self, args)?;
            }
            ("strContains", [s, needle]) => {
                self.write_str("(");
                method_call(self, s, "indexOf", std::slice::from_ref(needle))?;
                self.write_str(" != -1)");
            }
            ("index", [x]) => {
                let var = self.loop_var(name, x, span)?;
                self.write_str(&format!("{var}Index"));
            }
            ("isFirst", [x]) => {
                let var = self.loop_var(name, x, span)?;
                self.write_str(&format!("({var}Index == 0)"));
            }
            ("isLast", [x]) => {
                let var = self.loop_var(name, x, span)?;
                self.write_str(&format!("({var}Index == {var}ListLen - 1)"));
            }
            _ => {
                return Err(CodegenError::Internal(format!(
                    "native `{name}` invoked with {} argument(s)",
                    args.len()
                )))
            }
        }
        Ok(())
    }

    /// The loop variable a loop-position built-in refers to.
    fn loop_var(&self, func: &str, arg: &Expr, span: Span) -> CodegenResult<String> {
        match &arg.kind {
            ExprKind::Data { root, path }
                if path.is_empty() && self.lookup_local(root) == Some(LocalKind::Loop) =>
            {
                Ok(root.clone())
            }
            _ => Err(CodegenError::Unsupported {
                message: format!("`{func}` expects a foreach loop variable"),
                span,
            }),
        }
    }
}

/// Argument budgets of the generator's own built-ins.
fn native_arity(name: &str) -> Option<Arity> {
    let argc = match name {
        "isNonnull" | "length" | "keys" | "floor" | "ceiling" | "round" => 1,
        "index" | "isFirst" | "isLast" => 1,
        "min" | "max" | "strContains" => 2,
        _ => return None,
    };
    Some(Arity::exactly(argc))
}

/// Whether `name` is handled by the generator before the page function
/// registry is consulted.
pub fn is_native(name: &str) -> bool {
    native_arity(name).is_some()
}
