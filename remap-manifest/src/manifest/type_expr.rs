//! Type expressions such as `List<NestedDto?>?`.

use std::{fmt, str::FromStr};

use remap_ir::TypeRef;
use serde::Deserialize;

/// A parsed type expression.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct TypeExpr(TypeRef);

impl TypeExpr {
    pub fn type_ref(&self) -> &TypeRef {
        &self.0
    }

    pub fn into_type_ref(self) -> TypeRef {
        self.0
    }

    /// Every declaration name mentioned, outermost first.
    pub fn names(&self) -> Vec<&str> {
        fn walk<'a>(ty: &'a TypeRef, out: &mut Vec<&'a str>) {
            out.push(&ty.name);
            for arg in &ty.args {
                walk(arg, out);
            }
        }
        let mut out = Vec::new();
        walk(&self.0, &mut out);
        out
    }
}

impl fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TypeExpr {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl FromStr for TypeExpr {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser { src: s, pos: 0 };
        let ty = parser.parse_type()?;
        parser.skip_whitespace();
        if parser.pos != s.len() {
            return Err(format!(
                "invalid type expression '{s}': unexpected '{}'",
                &s[parser.pos..]
            ));
        }
        Ok(TypeExpr(ty))
    }
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek()
            && c.is_whitespace()
        {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn parse_type(&mut self) -> Result<TypeRef, String> {
        self.skip_whitespace();
        let start = self.pos;
        while let Some(c) = self.peek() {
            let valid = if self.pos == start {
                c.is_ascii_alphabetic() || c == '_'
            } else {
                c.is_ascii_alphanumeric() || c == '_' || c == '.'
            };
            if !valid {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(format!(
                "invalid type expression '{}': expected a type name at offset {start}",
                self.src
            ));
        }
        let name = &self.src[start..self.pos];

        let mut args = Vec::new();
        if self.eat('<') {
            loop {
                args.push(self.parse_type()?);
                if self.eat(',') {
                    continue;
                }
                if self.eat('>') {
                    break;
                }
                return Err(format!(
                    "invalid type expression '{}': expected ',' or '>'",
                    self.src
                ));
            }
        }

        let mut ty = TypeRef::generic(name, args);
        if self.eat('?') {
            ty = ty.optional();
        }
        Ok(ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> TypeRef {
        s.parse::<TypeExpr>().unwrap().into_type_ref()
    }

    #[test]
    fn test_parse_simple() {
        assert_eq!(parse("String"), TypeRef::named("String"));
        assert_eq!(parse("NestedDto?"), TypeRef::named("NestedDto").optional());
    }

    #[test]
    fn test_parse_generic() {
        assert_eq!(
            parse("List<NestedDto?>?"),
            TypeRef::generic("List", vec![TypeRef::named("NestedDto").optional()]).optional()
        );
        assert_eq!(
            parse("Page< List<Int> , String >"),
            TypeRef::generic(
                "Page",
                vec![
                    TypeRef::generic("List", vec![TypeRef::named("Int")]),
                    TypeRef::named("String")
                ]
            )
        );
    }

    #[test]
    fn test_parse_qualified() {
        assert_eq!(parse("sample.Dto").simple_name(), "Dto");
    }

    #[test]
    fn test_parse_errors() {
        assert!("".parse::<TypeExpr>().is_err());
        assert!("List<".parse::<TypeExpr>().is_err());
        assert!("List<Int".parse::<TypeExpr>().is_err());
        assert!("Int??".parse::<TypeExpr>().is_err());
        assert!("1Int".parse::<TypeExpr>().is_err());
        assert!("Int Long".parse::<TypeExpr>().is_err());
    }

    #[test]
    fn test_names() {
        let expr: TypeExpr = "Map<String, List<Dto>>".parse().unwrap();
        assert_eq!(expr.names(), vec!["Map", "String", "List", "Dto"]);
    }

    #[test]
    fn test_display_round_trip() {
        let expr: TypeExpr = "List<Dto?>?".parse().unwrap();
        assert_eq!(expr.to_string(), "List<Dto?>?");
    }
}
