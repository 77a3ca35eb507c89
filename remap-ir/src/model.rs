//! The type model the resolution engine queries.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::{CollectionShape, DeclKind, Member, MemberStrategy, TypeDecl, TypeRef};

/// Names every environment knows without declaring them.
pub const BUILTIN_TYPES: &[&str] = &[
    "String",
    "Boolean",
    "Byte",
    "Short",
    "Int",
    "Long",
    "Float",
    "Double",
    "Char",
    "Unit",
    "Any",
    "Iterable",
    "Collection",
    "List",
    "MutableList",
    "Set",
];

/// Introspection over declared types.
///
/// Only [`declaration`](TypeModel::declaration) and
/// [`is_assignable`](TypeModel::is_assignable) are required; member
/// enumeration and the capability probes derive from the declaration.
pub trait TypeModel {
    /// Look up a declaration by name.
    fn declaration(&self, name: &str) -> Option<&TypeDecl>;

    /// Whether a value of `source` can be used where `target` is expected.
    fn is_assignable(&self, target: &TypeRef, source: &TypeRef, ignore_nullability: bool) -> bool;

    /// Members of `ty`, with generic parameters substituted.
    fn members(&self, ty: &TypeRef) -> Vec<Member> {
        let Some(decl) = self.declaration(&ty.name) else {
            return Vec::new();
        };
        let strategy = decl.member_strategy();
        decl.fields
            .iter()
            .map(|field| Member {
                name: field.name.clone(),
                ty: field.ty.substitute(&decl.params, &ty.args),
                has_default: match strategy {
                    MemberStrategy::Constructor => field.has_default,
                    MemberStrategy::Properties => true,
                },
            })
            .collect()
    }

    /// Entries of an enum type, empty for anything else.
    fn enum_entries(&self, ty: &TypeRef) -> Vec<String> {
        match self.declaration(&ty.name) {
            Some(decl) if decl.kind == DeclKind::Enum => decl.entries.clone(),
            _ => Vec::new(),
        }
    }

    fn kind(&self, ty: &TypeRef) -> Option<&DeclKind> {
        self.declaration(&ty.name).map(|decl| &decl.kind)
    }

    fn collection_shape(&self, ty: &TypeRef) -> Option<CollectionShape> {
        match self.kind(ty) {
            Some(DeclKind::Collection(shape)) => Some(*shape),
            _ => None,
        }
    }

    fn is_iterable(&self, ty: &TypeRef) -> bool {
        self.collection_shape(ty).is_some()
    }

    fn is_collection_sized(&self, ty: &TypeRef) -> bool {
        self.collection_shape(ty).is_some_and(|shape| shape.is_sized())
    }

    fn is_string(&self, ty: &TypeRef) -> bool {
        matches!(self.kind(ty), Some(DeclKind::String))
    }

    fn is_boolean(&self, ty: &TypeRef) -> bool {
        matches!(self.kind(ty), Some(DeclKind::Boolean))
    }

    fn is_unit(&self, ty: &TypeRef) -> bool {
        matches!(self.kind(ty), Some(DeclKind::Unit))
    }

    fn is_enum(&self, ty: &TypeRef) -> bool {
        matches!(self.kind(ty), Some(DeclKind::Enum))
    }
}

/// A table of declarations, seeded with the built-in types.
#[derive(Debug, Clone)]
pub struct TypeEnvironment {
    decls: IndexMap<String, TypeDecl>,
}

impl Default for TypeEnvironment {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeEnvironment {
    pub fn new() -> Self {
        let mut env = Self {
            decls: IndexMap::new(),
        };
        for name in BUILTIN_TYPES {
            env.insert(builtin(name));
        }
        env
    }

    /// Add or replace a declaration.
    pub fn insert(&mut self, decl: TypeDecl) {
        self.decls.insert(decl.name.clone(), decl);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, decl: TypeDecl) -> Self {
        self.insert(decl);
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decls.contains_key(name)
    }

    /// User declarations, skipping the built-ins.
    pub fn user_declarations(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls
            .values()
            .filter(|decl| !BUILTIN_TYPES.contains(&decl.name.as_str()))
    }

    /// Whether `source` is `target` or reaches it through declared supertypes.
    fn is_subtype(&self, source: &str, target: &str) -> bool {
        let mut seen = HashSet::new();
        let mut pending = vec![source];
        while let Some(name) = pending.pop() {
            if name == target {
                return true;
            }
            if !seen.insert(name) {
                continue;
            }
            if let Some(decl) = self.decls.get(name) {
                pending.extend(decl.supertypes.iter().map(String::as_str));
            }
        }
        false
    }
}

impl TypeModel for TypeEnvironment {
    fn declaration(&self, name: &str) -> Option<&TypeDecl> {
        self.decls.get(name)
    }

    fn is_assignable(&self, target: &TypeRef, source: &TypeRef, ignore_nullability: bool) -> bool {
        if !ignore_nullability && source.nullable && !target.nullable {
            return false;
        }
        if target.name == "Any" {
            return true;
        }
        if !self.is_subtype(&source.name, &target.name) {
            return false;
        }
        // A bare target accepts any parameterization.
        if target.args.is_empty() {
            return true;
        }
        target.args.len() == source.args.len()
            && target
                .args
                .iter()
                .zip(&source.args)
                .all(|(t, s)| self.is_assignable(t, s, false))
    }
}

fn builtin(name: &str) -> TypeDecl {
    let collection = |shape| TypeDecl::new(name, DeclKind::Collection(shape)).params(["T"]);
    match name {
        "String" => TypeDecl::new(name, DeclKind::String),
        "Boolean" => TypeDecl::new(name, DeclKind::Boolean),
        "Unit" => TypeDecl::new(name, DeclKind::Unit),
        "Any" => TypeDecl::new(name, DeclKind::Any),
        "Iterable" => collection(CollectionShape::Iterable),
        "Collection" => collection(CollectionShape::Collection).supertype("Iterable"),
        "List" => collection(CollectionShape::List).supertype("Collection"),
        "MutableList" => collection(CollectionShape::MutableList).supertype("List"),
        "Set" => collection(CollectionShape::Set).supertype("Collection"),
        _ => TypeDecl::new(name, DeclKind::Scalar),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(of: TypeRef) -> TypeRef {
        TypeRef::generic("List", vec![of])
    }

    fn env() -> TypeEnvironment {
        TypeEnvironment::new()
            .with(TypeDecl::new("Animal", DeclKind::Interface))
            .with(
                TypeDecl::new("Dog", DeclKind::Data)
                    .supertype("Animal")
                    .field(Member::new("name", TypeRef::named("String")))
                    .field(Member::new("age", TypeRef::named("Int")).defaulted()),
            )
            .with(
                TypeDecl::new("Kennel", DeclKind::Class)
                    .field(Member::new("name", TypeRef::named("String"))),
            )
            .with(
                TypeDecl::new("Page", DeclKind::Data)
                    .params(["T"])
                    .field(Member::new("items", list(TypeRef::named("T"))))
                    .field(Member::new("first", TypeRef::named("T").optional())),
            )
            .with(TypeDecl::new("Status", DeclKind::Enum).entries(["ON", "OFF"]))
    }

    #[test]
    fn test_assignable_same_type() {
        let env = env();
        assert!(env.is_assignable(&TypeRef::named("Dog"), &TypeRef::named("Dog"), false));
    }

    #[test]
    fn test_assignable_through_supertype() {
        let env = env();
        assert!(env.is_assignable(&TypeRef::named("Animal"), &TypeRef::named("Dog"), false));
        assert!(!env.is_assignable(&TypeRef::named("Dog"), &TypeRef::named("Animal"), false));
    }

    #[test]
    fn test_assignable_nullability() {
        let env = env();
        let dog = TypeRef::named("Dog");
        assert!(env.is_assignable(&dog.clone().optional(), &dog, false));
        assert!(!env.is_assignable(&dog, &dog.clone().optional(), false));
        assert!(env.is_assignable(&dog, &dog.clone().optional(), true));
    }

    #[test]
    fn test_assignable_collections() {
        let env = env();
        let dogs = list(TypeRef::named("Dog"));
        let animals = TypeRef::generic("Iterable", vec![TypeRef::named("Animal")]);
        assert!(env.is_assignable(&animals, &dogs, false));
        assert!(!env.is_assignable(&dogs, &animals, false));
        assert!(!env.is_assignable(&dogs, &list(TypeRef::named("Dog").optional()), false));
    }

    #[test]
    fn test_any_accepts_everything() {
        let env = env();
        assert!(env.is_assignable(&TypeRef::named("Any"), &TypeRef::named("Dog"), false));
    }

    #[test]
    fn test_members_constructor_strategy() {
        let env = env();
        let members = env.members(&TypeRef::named("Dog"));
        assert_eq!(members.len(), 2);
        assert!(!members[0].has_default);
        assert!(members[1].has_default);
    }

    #[test]
    fn test_members_property_strategy_may_be_unset() {
        let env = env();
        let members = env.members(&TypeRef::named("Kennel"));
        assert!(members.iter().all(|m| m.has_default));
    }

    #[test]
    fn test_members_substitute_generics() {
        let env = env();
        let page = TypeRef::generic("Page", vec![TypeRef::named("Dog")]);
        let members = env.members(&page);
        assert_eq!(members[0].ty, list(TypeRef::named("Dog")));
        assert_eq!(members[1].ty, TypeRef::named("Dog").optional());
    }

    #[test]
    fn test_probes() {
        let env = env();
        assert!(env.is_iterable(&list(TypeRef::named("Dog"))));
        assert!(env.is_collection_sized(&list(TypeRef::named("Dog"))));
        assert!(!env.is_collection_sized(&TypeRef::generic("Iterable", vec![TypeRef::named("Dog")])));
        assert!(env.is_string(&TypeRef::named("String")));
        assert!(env.is_boolean(&TypeRef::named("Boolean").optional()));
        assert!(env.is_unit(&TypeRef::named("Unit")));
        assert!(env.is_enum(&TypeRef::named("Status")));
        assert_eq!(env.enum_entries(&TypeRef::named("Status")), vec!["ON", "OFF"]);
        assert!(env.enum_entries(&TypeRef::named("Dog")).is_empty());
    }

    #[test]
    fn test_supertype_cycle_terminates() {
        let env = TypeEnvironment::new()
            .with(TypeDecl::new("A", DeclKind::Interface).supertype("B"))
            .with(TypeDecl::new("B", DeclKind::Interface).supertype("A"));
        assert!(!env.is_assignable(&TypeRef::named("String"), &TypeRef::named("A"), false));
        assert!(env.is_assignable(&TypeRef::named("B"), &TypeRef::named("A"), false));
    }

    #[test]
    fn test_user_declarations_skip_builtins() {
        let names: Vec<_> = env().user_declarations().map(|d| d.name.clone()).collect();
        assert_eq!(names, vec!["Animal", "Dog", "Kennel", "Page", "Status"]);
    }
}
