//! Element-wise collection conversion.

use remap_ir::{CollectionShape, Member};

use super::present_if;
use crate::{
    builder::{Expr, Statement},
    engine::{Engine, MappingError, MappingId},
};

const BUFFER: &str = "result";
const ITEM: &str = "item";

impl Engine<'_> {
    pub(super) fn write_iterable(&mut self, id: MappingId) -> Result<Vec<Statement>, MappingError> {
        let mapping = self.mappings[id.0].clone();
        let internal = |what: &str| {
            MappingError::Internal(format!("{} has no {what}", self.qualified_name(id)))
        };
        let source = mapping.sources.first().cloned().ok_or_else(|| internal("source"))?;
        let target_element = mapping
            .target
            .element()
            .cloned()
            .ok_or_else(|| internal("target element type"))?;
        let source_element = source
            .ty
            .element()
            .cloned()
            .ok_or_else(|| internal("source element type"))?;
        let shape = self
            .model
            .collection_shape(&mapping.target)
            .unwrap_or(CollectionShape::List);
        let nullable_target = mapping.target.nullable;

        let mut body = Vec::new();
        if source.ty.nullable {
            let on_null = if nullable_target {
                Expr::Null
            } else {
                Expr::EmptyCollection(shape)
            };
            body.push(Statement::null_guard(&source.name, on_null));
        }

        let items = Expr::ident(&source.name);
        let sized = self.model.is_collection_sized(&source.ty);
        if sized {
            body.push(Statement::if_(
                Expr::IsEmpty(Box::new(items.clone())),
                vec![Statement::return_(present_if(
                    nullable_target,
                    Expr::EmptyCollection(shape),
                ))],
            ));
        }
        body.push(Statement::let_mut(
            BUFFER,
            Expr::NewBuffer {
                capacity: sized.then(|| Box::new(Expr::Len(Box::new(items.clone())))),
            },
        ));

        let item_path = format!("{}.{ITEM}", source.name);
        let fallback = if source_element.nullable && !target_element.nullable {
            let policy = self.nullability_policy(&mapping, None);
            let options = mapping
                .catch_all()
                .map(|d| d.options.clone())
                .unwrap_or_default();
            Some(self.null_fallback(id, &target_element, &options, policy, &item_path, ITEM)?)
        } else {
            None
        };

        let same_elements = fallback.is_none()
            && source_element.nullable == target_element.nullable
            && self.model.is_assignable(&target_element, &source_element, false);
        if same_elements {
            body.push(Statement::expr(Expr::Extend {
                buffer: BUFFER.into(),
                items: Box::new(items),
            }));
        } else {
            let argument = match &fallback {
                Some(fallback) => Expr::fallback(Expr::ident(ITEM), fallback.clone()),
                None => Expr::ident(ITEM),
            };
            let argument_nullable = source_element.nullable && fallback.is_none();
            let (value, nullable) =
                if self.model.is_assignable(&target_element, &source_element, true) {
                    (argument, argument_nullable)
                } else {
                    let element = Member::new(ITEM, source_element.clone());
                    let element = if fallback.is_some() {
                        element.non_null()
                    } else {
                        element
                    };
                    let found = self.require_mapping(&target_element, &element, id, &item_path)?;
                    (
                        self.call(id, found, &element.ty, argument)?,
                        self.mappings[found.0].target.nullable,
                    )
                };
            let value = present_if(target_element.nullable && !nullable, value);
            body.push(Statement::for_(
                ITEM,
                items,
                vec![Statement::expr(Expr::Push {
                    buffer: BUFFER.into(),
                    value: Box::new(value),
                })],
            ));
        }

        body.push(Statement::return_(present_if(
            nullable_target,
            Expr::Collect {
                buffer: BUFFER.into(),
                shape,
            },
        )));
        Ok(body)
    }
}
