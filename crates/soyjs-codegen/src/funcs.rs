//! Page function registry.
//!
//! Maps template-level function names to the strategy that turns a call
//! site into JavaScript, together with the argument counts each function
//! accepts. The expression generator consults this table for every call
//! whose name is not one of its native built-ins.
//!
//! Three strategies exist:
//! - **forward**: `yext.pages.soy.<name>(args...)`, implemented by the page
//!   runtime library shipped next to the generated script;
//! - **inline**: expanded onto a native string/array method of the receiver;
//! - **server-side only**: always degrades to a runtime `alert`.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::slice;

use soyjs_types::ast::Expr;
use soyjs_types::Span;

use crate::error::{CodegenError, CodegenResult};
use crate::writer::{quote_js_string, JsSink};

/// Namespace prefix of the page runtime library.
pub const JS_FUNC_NAMESPACE: &str = "yext.pages.soy.";

// ══════════════════════════════════════════════════════════════════════════════
// Arity
// ══════════════════════════════════════════════════════════════════════════════

/// The set of argument counts a function accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arity(BTreeSet<usize>);

impl Arity {
    /// Build a budget from the accepted counts.
    ///
    /// # Panics
    ///
    /// Panics if `counts` is empty: a function nobody can call is a defect in
    /// the registry definition.
    pub fn new(counts: impl IntoIterator<Item = usize>) -> Self {
        let counts: BTreeSet<usize> = counts.into_iter().collect();
        assert!(
            !counts.is_empty(),
            "arity budget must accept at least one argument count"
        );
        Self(counts)
    }

    pub fn exactly(n: usize) -> Self {
        Self::new([n])
    }

    pub fn accepts(&self, n: usize) -> bool {
        self.0.contains(&n)
    }

    /// Accepted counts in ascending order.
    pub fn counts(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Verify a call site's argument count against this budget.
    pub fn check(&self, name: &str, got: usize, span: Span) -> CodegenResult<()> {
        if self.accepts(got) {
            Ok(())
        } else {
            Err(CodegenError::ArityMismatch {
                name: name.to_string(),
                got,
                expected: self.clone(),
                span,
            })
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, n) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{n}")?;
        }
        write!(f, "}}")
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Emitters
// ══════════════════════════════════════════════════════════════════════════════

/// Native string/array method expansions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineMethod {
    /// `s.sub(start)` / `s.substring(start, end)`
    Substring,
    /// `s.length`
    Length,
    /// `s.replace(pattern, replacement[, flags])`
    Replace,
    /// `xs.slice(start[, end])`
    Slice,
}

impl InlineMethod {
    pub fn arity(self) -> Arity {
        match self {
            Self::Substring => Arity::new([2, 3]),
            Self::Length => Arity::exactly(1),
            Self::Replace => Arity::new([3, 4]),
            Self::Slice => Arity::new([2, 3]),
        }
    }

    fn emit(self, sink: &mut dyn JsSink, args: &[Expr]) -> CodegenResult<()> {
        match (self, args) {
            (Self::Substring, [s, start]) => method_call(sink, s, "sub", slice::from_ref(start)),
            (Self::Substring, [s, start_end @ ..]) if start_end.len() == 2 => {
                method_call(sink, s, "substring", start_end)
            }
            (Self::Length, [s]) => {
                sink.write_arg(s)?;
                sink.write_str(".length");
                Ok(())
            }
            (Self::Replace, [s, rest @ ..]) if matches!(rest.len(), 2 | 3) => {
                method_call(sink, s, "replace", rest)
            }
            (Self::Slice, [xs, rest @ ..]) if matches!(rest.len(), 1 | 2) => {
                method_call(sink, xs, "slice", rest)
            }
            _ => Err(CodegenError::Internal(format!(
                "{:?} emitter invoked with {} argument(s)",
                self,
                args.len()
            ))),
        }
    }
}

/// Code-generation strategy for one page function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Emitter {
    /// `<namespace><name>(arg0, ..., argN)`
    Forward { namespace: String, name: String },
    Inline(InlineMethod),
    /// Only renderable server-side: the generated script raises an alert.
    ServerSideOnly { name: String },
}

impl Emitter {
    /// Append the JavaScript for a call with the given arguments.
    pub fn emit(&self, sink: &mut dyn JsSink, args: &[Expr]) -> CodegenResult<()> {
        match self {
            Self::Forward { namespace, name } => {
                sink.write_str(namespace);
                sink.write_str(name);
                arg_list(sink, args)
            }
            Self::Inline(method) => method.emit(sink, args),
            Self::ServerSideOnly { name } => {
                let message = format!("{name} is not implemented for JS templates");
                sink.write_str("alert(");
                sink.write_str(&quote_js_string(&message));
                sink.write_str(")");
                Ok(())
            }
        }
    }

    /// Server-side-only functions ignore their arguments, so any call-site
    /// count is let through.
    pub fn enforces_arity(&self) -> bool {
        !matches!(self, Self::ServerSideOnly { .. })
    }
}

/// Writes `(<arg0>, <arg1>, ...)`. The only place call parentheses are
/// opened and closed.
pub(crate) fn arg_list(sink: &mut dyn JsSink, args: &[Expr]) -> CodegenResult<()> {
    sink.write_str("(");
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            sink.write_str(", ");
        }
        sink.write_arg(arg)?;
    }
    sink.write_str(")");
    Ok(())
}

/// Writes `<receiver>.<method>(<args>)`.
pub(crate) fn method_call(
    sink: &mut dyn JsSink,
    receiver: &Expr,
    method: &str,
    args: &[Expr],
) -> CodegenResult<()> {
    sink.write_arg(receiver)?;
    sink.write_str(".");
    sink.write_str(method);
    arg_list(sink, args)
}

// ══════════════════════════════════════════════════════════════════════════════
// Registry
// ══════════════════════════════════════════════════════════════════════════════

/// A registered page function: strategy plus accepted argument counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Func {
    pub emitter: Emitter,
    pub arity: Arity,
}

impl Func {
    pub fn new(emitter: Emitter, arity: Arity) -> Self {
        Self { emitter, arity }
    }

    /// A function forwarded to the runtime library under `namespace`.
    pub fn forward(namespace: &str, name: &str, argc: usize) -> Self {
        Self::new(
            Emitter::Forward {
                namespace: namespace.to_string(),
                name: name.to_string(),
            },
            Arity::exactly(argc),
        )
    }

    pub fn inline(method: InlineMethod) -> Self {
        Self::new(Emitter::Inline(method), method.arity())
    }

    pub fn server_side_only(name: &str) -> Self {
        Self::new(
            Emitter::ServerSideOnly {
                name: name.to_string(),
            },
            Arity::exactly(0),
        )
    }

    /// Validate a call site's argument count for this function.
    pub fn check_arity(&self, name: &str, got: usize, span: Span) -> CodegenResult<()> {
        if self.emitter.enforces_arity() {
            self.arity.check(name, got, span)
        } else {
            Ok(())
        }
    }
}

/// Immutable name → [`Func`] table, built once before generation starts.
#[derive(Debug, Clone)]
pub struct FuncRegistry {
    namespace: String,
    funcs: HashMap<String, Func>,
}

impl FuncRegistry {
    /// The full page function table under [`JS_FUNC_NAMESPACE`].
    pub fn new() -> Self {
        Self::with_namespace(JS_FUNC_NAMESPACE)
    }

    /// The full page function table, forwarding to a different runtime
    /// namespace. `namespace` is used as a verbatim prefix.
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        let mut reg = Self {
            namespace: namespace.into(),
            funcs: HashMap::new(),
        };
        reg.register_time();
        reg.register_locale();
        reg.register_strings();
        reg.register_lists();
        reg.register_server_side_only();
        tracing::debug!(
            functions = reg.len(),
            namespace = %reg.namespace,
            "page function registry built"
        );
        reg
    }

    /// A registry with no functions.
    pub fn empty() -> Self {
        Self {
            namespace: JS_FUNC_NAMESPACE.to_string(),
            funcs: HashMap::new(),
        }
    }

    /// Register `func` under `name`, replacing any earlier binding.
    pub fn with(mut self, name: impl Into<String>, func: Func) -> Self {
        self.funcs.insert(name.into(), func);
        self
    }

    /// Runtime namespace used by forwarded functions.
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn get(&self, name: &str) -> Option<&Func> {
        self.funcs.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.funcs.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.funcs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.funcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.funcs.is_empty()
    }

    // ──────────────────────────────────────────────────────────────────────
    // Registration helpers
    // ──────────────────────────────────────────────────────────────────────

    fn forward(&mut self, name: &str, argc: usize) {
        let func = Func::forward(&self.namespace, name, argc);
        self.funcs.insert(name.to_string(), func);
    }

    fn inline(&mut self, name: &str, method: InlineMethod) {
        self.funcs.insert(name.to_string(), Func::inline(method));
    }

    fn server_side_only(&mut self, name: &str) {
        self.funcs
            .insert(name.to_string(), Func::server_side_only(name));
    }

    // ══════════════════════════════════════════════════════════════════════
    // Function groups
    // ══════════════════════════════════════════════════════════════════════

    /// Date and time formatting.
    fn register_time(&mut self) {
        self.forward("collapseDays", 1);
        self.forward("timef", 2);
        self.forward("timestampf", 2);
        self.forward("sameDay", 2);
        self.forward("sameYear", 2);
    }

    /// Locale-aware formatting, resolved by the runtime library.
    fn register_locale(&mut self) {
        self.forward("ltimef", 3);
        self.forward("ltimestampf", 3);
        self.forward("lnumberf", 2);
        self.forward("lpercentf", 2);
        self.forward("lcurrencyf", 3);
        self.forward("llanguageName", 2);
        self.forward("lcountryName", 2);
        self.forward("llocaleName", 2);
        self.forward("lregionName", 3);
    }

    fn register_strings(&mut self) {
        self.inline("substring", InlineMethod::Substring);
        self.inline("strlen", InlineMethod::Length);
        self.inline("replace", InlineMethod::Replace);
        self.forward("stripOutPhoneDigits", 1);
        self.forward("prettyPrintPhone", 1);
        self.forward("fullState", 1);
    }

    fn register_lists(&mut self) {
        self.inline("slice", InlineMethod::Slice);
        self.forward("listItems", 1);
        self.forward("augmentList", 2);
        self.forward("sortList", 2);
        self.forward("sortListByKeys", 2);
        self.forward("groupListByKey", 2);
    }

    fn register_server_side_only(&mut self) {
        self.server_side_only("gmap");
    }
}

impl Default for FuncRegistry {
    fn default() -> Self {
        Self::new()
    }
}
