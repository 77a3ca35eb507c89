//! Type handles, members and declarations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A semantic type handle: declaration name, nullability and generic arguments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    pub nullable: bool,
    pub args: Vec<TypeRef>,
}

impl TypeRef {
    /// A non-null reference without generic arguments.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            args: Vec::new(),
        }
    }

    /// A non-null reference with generic arguments.
    pub fn generic(name: impl Into<String>, args: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            nullable: false,
            args,
        }
    }

    /// Builder-style: mark as nullable.
    pub fn optional(mut self) -> Self {
        self.nullable = true;
        self
    }

    /// The same type with the nullability flag cleared.
    pub fn non_null(&self) -> Self {
        Self {
            nullable: false,
            ..self.clone()
        }
    }

    /// The last segment of a dotted declaration name.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// The first generic argument, i.e. the element type of a collection.
    pub fn element(&self) -> Option<&TypeRef> {
        self.args.first()
    }

    /// Replace type parameters by the given arguments.
    ///
    /// A parameter keeps its own nullability on top of the argument's, so
    /// `T?` seen through `T = Dto` is `Dto?`.
    pub fn substitute(&self, params: &[String], args: &[TypeRef]) -> TypeRef {
        if self.args.is_empty()
            && let Some(pos) = params.iter().position(|p| *p == self.name)
            && let Some(arg) = args.get(pos)
        {
            let mut resolved = arg.clone();
            resolved.nullable |= self.nullable;
            return resolved;
        }

        TypeRef {
            name: self.name.clone(),
            nullable: self.nullable,
            args: self
                .args
                .iter()
                .map(|a| a.substitute(params, args))
                .collect(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.simple_name())?;
        if !self.args.is_empty() {
            write!(f, "<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{arg}")?;
            }
            write!(f, ">")?;
        }
        if self.nullable {
            write!(f, "?")?;
        }
        Ok(())
    }
}

/// A named, typed child element of a type, or a function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub ty: TypeRef,
    /// Whether the member may be left out when constructing its owner.
    pub has_default: bool,
}

impl Member {
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            has_default: false,
        }
    }

    /// Builder-style: mark as defaulted.
    pub fn defaulted(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// The same member with a non-null type.
    pub fn non_null(&self) -> Self {
        Self {
            ty: self.ty.non_null(),
            ..self.clone()
        }
    }
}

/// The flavour of collection a built-in collection type stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionShape {
    Iterable,
    Collection,
    List,
    MutableList,
    Set,
}

impl CollectionShape {
    /// Sized collections expose their length up front.
    pub fn is_sized(&self) -> bool {
        !matches!(self, CollectionShape::Iterable)
    }
}

/// What kind of declaration a type name resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclKind {
    /// Data-like type: members are its constructor parameters.
    Data,
    /// Plain class: members are its properties.
    Class,
    Interface,
    Enum,
    String,
    Boolean,
    /// Numeric and other opaque scalars.
    Scalar,
    Unit,
    Any,
    Collection(CollectionShape),
}

/// How the members of a declaration are enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberStrategy {
    /// Constructor parameters; every non-defaulted one must be supplied.
    Constructor,
    /// Declared properties; any of them may be left unset.
    Properties,
}

/// A type declaration in the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub name: String,
    pub kind: DeclKind,
    /// Generic parameter names.
    pub params: Vec<String>,
    /// Names of direct supertypes.
    pub supertypes: Vec<String>,
    pub fields: Vec<Member>,
    /// Entries, in declaration order, for enums.
    pub entries: Vec<String>,
}

impl TypeDecl {
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            kind,
            params: Vec::new(),
            supertypes: Vec::new(),
            fields: Vec::new(),
            entries: Vec::new(),
        }
    }

    pub fn params(mut self, params: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn supertype(mut self, name: impl Into<String>) -> Self {
        self.supertypes.push(name.into());
        self
    }

    pub fn field(mut self, member: Member) -> Self {
        self.fields.push(member);
        self
    }

    pub fn entries(mut self, entries: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.entries = entries.into_iter().map(Into::into).collect();
        self
    }

    /// Member enumeration is a pure function of the kind, so it never
    /// changes for a given declaration.
    pub fn member_strategy(&self) -> MemberStrategy {
        match self.kind {
            DeclKind::Data => MemberStrategy::Constructor,
            _ => MemberStrategy::Properties,
        }
    }

    /// Whether a value of this declaration can be assembled field by field.
    pub fn is_constructible(&self) -> bool {
        matches!(
            self.kind,
            DeclKind::Data | DeclKind::Class | DeclKind::Interface
        )
    }
}
