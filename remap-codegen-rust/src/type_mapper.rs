//! Rust type mapper implementation.

use remap_codegen::language::TypeMapper;
use remap_ir::TypeRef;

/// Spells model types the way Rust code names them.
///
/// Numeric built-ins map to fixed-width primitives, every collection but
/// `Set` to `Vec`, and declared types to their simple name.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustTypeMapper;

impl RustTypeMapper {
    fn map_args(&self, ty: &TypeRef) -> String {
        let args: Vec<String> = ty.args.iter().map(|a| self.map_ref(a)).collect();
        args.join(", ")
    }
}

impl TypeMapper for RustTypeMapper {
    fn language(&self) -> &'static str {
        "rust"
    }

    fn map_type(&self, ty: &TypeRef) -> String {
        let primitive = match ty.simple_name() {
            "String" => Some("String"),
            "Boolean" => Some("bool"),
            "Byte" => Some("i8"),
            "Short" => Some("i16"),
            "Int" => Some("i32"),
            "Long" => Some("i64"),
            "Float" => Some("f32"),
            "Double" => Some("f64"),
            "Char" => Some("char"),
            "Unit" => Some("()"),
            "Any" => Some("Box<dyn std::any::Any>"),
            _ => None,
        };
        if let Some(primitive) = primitive {
            return primitive.to_string();
        }

        match ty.simple_name() {
            "List" | "MutableList" | "Iterable" | "Collection" => {
                format!("Vec<{}>", self.map_args(ty))
            }
            "Set" => format!("std::collections::HashSet<{}>", self.map_args(ty)),
            name if ty.args.is_empty() => name.to_string(),
            name => format!("{name}<{}>", self.map_args(ty)),
        }
    }
}
