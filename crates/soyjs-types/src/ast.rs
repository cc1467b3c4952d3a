//! Compiled template AST.
//!
//! These nodes are produced by the upstream template compiler after parsing,
//! dependency resolution and syntax validation. The code generator only
//! reads them. Every type round-trips through serde so compiled bundles can
//! be handed over as JSON documents.
//! Node lists preserve source order.

use serde::{Deserialize, Serialize};

use crate::Span;

// ══════════════════════════════════════════════════════════════════════════════
// Registry of compiled files
// ══════════════════════════════════════════════════════════════════════════════

/// The set of compiled template files, in the order the upstream compiler
/// produced them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateRegistry {
    pub soy_files: Vec<SoyFile>,
}

impl TemplateRegistry {
    pub fn new(soy_files: Vec<SoyFile>) -> Self {
        Self { soy_files }
    }

    /// Iterate over the compiled files in registry order.
    pub fn files(&self) -> impl Iterator<Item = &SoyFile> {
        self.soy_files.iter()
    }

    /// Look up a compiled file by name.
    pub fn file(&self, name: &str) -> Option<&SoyFile> {
        self.soy_files.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.soy_files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.soy_files.is_empty()
    }
}

impl From<Vec<SoyFile>> for TemplateRegistry {
    fn from(soy_files: Vec<SoyFile>) -> Self {
        Self::new(soy_files)
    }
}

/// One compiled template source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoyFile {
    /// File name, e.g. `listings.soy`. Unique within a registry.
    pub name: String,
    /// Dotted namespace all templates of the file live under.
    pub namespace: String,
    #[serde(default)]
    pub templates: Vec<Template>,
}

/// `{template .name} ... {/template}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Template name, either relative (`.hello`) or bare (`hello`).
    pub name: String,
    #[serde(default)]
    pub body: Vec<Node>,
    #[serde(default)]
    pub span: Span,
}

// ══════════════════════════════════════════════════════════════════════════════
// Template body nodes
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Node {
    /// Literal text copied to the output.
    RawText { text: String },
    /// `{$expr}` / `{print expr}`
    Print { expr: Expr },
    /// `{if c1}...{elseif c2}...{else}...{/if}`
    If {
        branches: Vec<IfBranch>,
        #[serde(default)]
        else_body: Option<Vec<Node>>,
    },
    /// `{foreach $var in list}...{ifempty}...{/foreach}`
    Foreach {
        var: String,
        list: Expr,
        #[serde(default)]
        body: Vec<Node>,
        #[serde(default)]
        if_empty: Option<Vec<Node>>,
    },
    /// `{let $name: value /}`
    Let { name: String, value: Expr },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IfBranch {
    pub cond: Expr,
    #[serde(default)]
    pub body: Vec<Node>,
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions
// ══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expr {
    #[serde(flatten)]
    pub kind: ExprKind,
    #[serde(default)]
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "snake_case")]
pub enum ExprKind {
    Null,
    Bool { value: bool },
    Int { value: i64 },
    Float { value: f64 },
    Str { value: String },
    List { items: Vec<Expr> },
    Map { entries: Vec<MapEntry> },
    /// A compile-time global, emitted verbatim.
    Global { name: String },
    /// `$root.key[index]...`
    Data {
        root: String,
        #[serde(default)]
        path: Vec<Access>,
    },
    Unary { op: UnaryOp, operand: Box<Expr> },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// `cond ? then : otherwise`
    Ternary {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// `left ?: right`
    Elvis { left: Box<Expr>, right: Box<Expr> },
    Call(FuncCall),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: Expr,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "access", rename_all = "snake_case")]
pub enum Access {
    /// `.name`
    Key { name: String },
    /// `[index]`
    Index { index: Expr },
}

/// A function-call site: `name(arg0, arg1, ...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuncCall {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Not,
}

impl UnaryOp {
    pub fn js_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    NotEq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    And,
    Or,
}

impl BinaryOp {
    pub fn js_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

// ── Construction helpers ─────────────────────────────────────────────────────

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn null() -> Self {
        ExprKind::Null.into()
    }

    pub fn int(value: i64) -> Self {
        ExprKind::Int { value }.into()
    }

    pub fn string(value: impl Into<String>) -> Self {
        ExprKind::Str {
            value: value.into(),
        }
        .into()
    }

    pub fn global(name: impl Into<String>) -> Self {
        ExprKind::Global { name: name.into() }.into()
    }

    /// `$root` with no field path.
    pub fn data(root: impl Into<String>) -> Self {
        ExprKind::Data {
            root: root.into(),
            path: Vec::new(),
        }
        .into()
    }

    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        ExprKind::Call(FuncCall {
            name: name.into(),
            args,
        })
        .into()
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr) -> Self {
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
        .into()
    }

    /// Attach a source location.
    pub fn at(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// The call node, if this expression is a function call.
    pub fn as_call(&self) -> Option<&FuncCall> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }
}

impl From<ExprKind> for Expr {
    fn from(kind: ExprKind) -> Self {
        Self {
            kind,
            span: Span::default(),
        }
    }
}
