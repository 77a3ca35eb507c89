//! Language-agnostic function definitions.

use remap_ir::TypeRef;

use super::expr::Expr;

/// A generated mapping function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSpec {
    pub name: String,
    pub doc: Option<String>,
    pub params: Vec<ParamSpec>,
    pub return_type: TypeRef,
    pub body: Vec<Statement>,
    pub visibility: Visibility,
    /// Implements a function the mapper declares.
    pub is_override: bool,
}

impl FunctionSpec {
    pub fn new(name: impl Into<String>, return_type: TypeRef) -> Self {
        Self {
            name: name.into(),
            doc: None,
            params: Vec::new(),
            return_type,
            body: Vec::new(),
            visibility: Visibility::Public,
            is_override: false,
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = ParamSpec>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn statements(mut self, stmts: impl IntoIterator<Item = Statement>) -> Self {
        self.body.extend(stmts);
        self
    }

    pub fn private(mut self) -> Self {
        self.visibility = Visibility::Private;
        self
    }

    pub fn override_(mut self) -> Self {
        self.is_override = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

/// A function parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: String,
    pub ty: TypeRef,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// A statement in a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Let {
        name: String,
        value: Expr,
        mutable: bool,
    },
    Return(Expr),
    Expr(Expr),
    If {
        condition: Expr,
        then: Vec<Statement>,
    },
    For {
        binding: String,
        iter: Expr,
        body: Vec<Statement>,
    },
    /// Leave with `on_null` when parameter `name` is absent; afterwards the
    /// parameter is known to be present.
    NullGuard { name: String, on_null: Expr },
}

impl Statement {
    pub fn let_(name: impl Into<String>, value: Expr) -> Self {
        Self::Let {
            name: name.into(),
            value,
            mutable: false,
        }
    }

    pub fn let_mut(name: impl Into<String>, value: Expr) -> Self {
        Self::Let {
            name: name.into(),
            value,
            mutable: true,
        }
    }

    pub fn return_(value: Expr) -> Self {
        Self::Return(value)
    }

    pub fn expr(value: Expr) -> Self {
        Self::Expr(value)
    }

    pub fn if_(condition: Expr, then: Vec<Statement>) -> Self {
        Self::If { condition, then }
    }

    pub fn for_(binding: impl Into<String>, iter: Expr, body: Vec<Statement>) -> Self {
        Self::For {
            binding: binding.into(),
            iter,
            body,
        }
    }

    pub fn null_guard(name: impl Into<String>, on_null: Expr) -> Self {
        Self::NullGuard {
            name: name.into(),
            on_null,
        }
    }
}
