//! Expressions in generated function bodies.

use remap_ir::{CollectionShape, TypeRef};

/// An expression producing a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// The absent value.
    Null,
    Bool(bool),
    /// A string literal.
    Str(String),
    /// A local name.
    Ident(String),
    /// A dotted read through members, e.g. `dto.nested.id`.
    Path(Vec<String>),
    /// Verbatim expression text supplied by the user.
    Raw(String),
    /// A non-null value placed where a nullable one is expected.
    Present(Box<Expr>),
    /// A call to a mapping function, optionally through an included mapper.
    Call {
        receiver: Option<String>,
        function: String,
        args: Vec<Expr>,
    },
    /// Construct a value of `ty` from named fields.
    Construct {
        ty: TypeRef,
        fields: Vec<FieldInit>,
        /// Some members were left to their defaults.
        fill_defaults: bool,
    },
    /// Evaluate `body` with `binding` bound to `subject` when it is present.
    NullSafe {
        subject: Box<Expr>,
        binding: String,
        body: Box<Expr>,
        /// `body` is itself nullable and must not be wrapped twice.
        flatten: bool,
    },
    /// Turn a nullable value into a non-null one.
    Fallback {
        value: Box<Expr>,
        fallback: NullFallback,
    },
    EnumEntry {
        ty: TypeRef,
        entry: String,
    },
    Match {
        subject: Box<Expr>,
        arms: Vec<MatchArm>,
    },
    IsEmpty(Box<Expr>),
    Len(Box<Expr>),
    /// A fresh growable buffer, pre-sized when a capacity is known.
    NewBuffer {
        capacity: Option<Box<Expr>>,
    },
    /// Append every item of `items` to `buffer`.
    Extend {
        buffer: String,
        items: Box<Expr>,
    },
    Push {
        buffer: String,
        value: Box<Expr>,
    },
    /// Convert `buffer` into the requested collection.
    Collect {
        buffer: String,
        shape: CollectionShape,
    },
    EmptyCollection(CollectionShape),
}

impl Expr {
    pub fn ident(name: impl Into<String>) -> Self {
        Self::Ident(name.into())
    }

    pub fn path(segments: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.len() == 1 {
            Self::Ident(segments.into_iter().collect())
        } else {
            Self::Path(segments)
        }
    }

    pub fn raw(text: impl Into<String>) -> Self {
        Self::Raw(text.into())
    }

    pub fn present(value: Expr) -> Self {
        Self::Present(Box::new(value))
    }

    pub fn call(function: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call {
            receiver: None,
            function: function.into(),
            args,
        }
    }

    pub fn call_on(receiver: impl Into<String>, function: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call {
            receiver: Some(receiver.into()),
            function: function.into(),
            args,
        }
    }

    pub fn null_safe(subject: Expr, binding: impl Into<String>, body: Expr, flatten: bool) -> Self {
        Self::NullSafe {
            subject: Box::new(subject),
            binding: binding.into(),
            body: Box::new(body),
            flatten,
        }
    }

    pub fn fallback(value: Expr, fallback: NullFallback) -> Self {
        Self::Fallback {
            value: Box::new(value),
            fallback,
        }
    }

    pub fn enum_entry(ty: TypeRef, entry: impl Into<String>) -> Self {
        Self::EnumEntry {
            ty,
            entry: entry.into(),
        }
    }

    pub fn match_(subject: Expr, arms: Vec<MatchArm>) -> Self {
        Self::Match {
            subject: Box::new(subject),
            arms,
        }
    }

    /// Whether the expression spans several lines once rendered.
    pub fn is_block(&self) -> bool {
        match self {
            Self::Construct { .. } | Self::Match { .. } => true,
            Self::Present(inner) => inner.is_block(),
            _ => false,
        }
    }
}

/// One `name: value` pair of a [`Expr::Construct`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInit {
    pub name: String,
    pub value: Expr,
}

impl FieldInit {
    pub fn new(name: impl Into<String>, value: Expr) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// How a nullable value is made non-null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NullFallback {
    /// Absent booleans read as `false`.
    False,
    /// Absent strings read as empty.
    EmptyString,
    /// Unwrap unconditionally.
    ForceUnwrap,
    /// Fail at runtime naming both ends of the assignment.
    Raise { source: String, target: String },
}

/// A `pattern => value` arm.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchArm {
    pub pattern: Pattern,
    pub value: Expr,
}

impl MatchArm {
    pub fn new(pattern: Pattern, value: Expr) -> Self {
        Self { pattern, value }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    Wildcard,
    /// A string literal.
    Literal(String),
    EnumEntry { ty: TypeRef, entry: String },
}
