//! The emission driver.
//!
//! Writes every annotated mapper with its includes first. For each mapper the
//! declared functions are written, then the queue of synthesized functions
//! is drained; writing one may enqueue more.

use std::collections::HashSet;

use eyre::{Result, eyre};
use remap_ir::{Declarations, FactoryDecl};
use tracing::{debug, debug_span, info};

use super::{Engine, MapperId, MappingError, MappingId, MappingState, PHASE};
use crate::{
    builder::{
        FactoryEntry, FactorySpec, FunctionSpec, GeneratedOutput, IncludeSpec, MapperSpec,
        ParamSpec,
    },
    pipeline::Diagnostic,
};

/// The result of one generation pass.
#[derive(Debug, Default)]
pub struct Emission {
    /// Mappers and factories that generated cleanly.
    pub output: GeneratedOutput,
    pub diagnostics: Vec<Diagnostic>,
}

/// Generate every mapper and factory in `decls`.
///
/// Mapping errors become error diagnostics and abandon only the mapper they
/// occurred in; broken engine invariants abort the pass.
pub fn emit(decls: &Declarations) -> Result<Emission> {
    let mut engine = Engine::new(&decls.types, &decls.helpers);
    let mut emission = Emission::default();

    for decl in decls.mappers.values() {
        if let Err(err) = engine.register(decl) {
            report(&mut emission.diagnostics, err, &decl.name)?;
        }
    }

    let annotated: Vec<MapperId> = decls
        .mappers
        .keys()
        .filter_map(|name| engine.mapper_id(name))
        .collect();
    for &id in &annotated {
        if engine.mapper(id).failed {
            continue;
        }
        if let Err(err) = engine.link_includes(id) {
            engine.mappers[id.0].failed = true;
            let name = engine.mapper(id).name.clone();
            report(&mut emission.diagnostics, err, &name)?;
        }
    }

    let mut written = HashSet::new();
    for &id in &annotated {
        write_in_order(&mut engine, id, &mut written, &mut emission)?;
    }

    for factory in &decls.factories {
        match engine.factory(factory) {
            Ok(spec) => emission.output.factories.push(spec),
            Err(err) => report(&mut emission.diagnostics, err, &factory.name)?,
        }
    }

    info!(
        mappers = emission.output.mappers.len(),
        functions = emission.output.function_count(),
        "generation finished"
    );
    Ok(emission)
}

fn write_in_order(
    engine: &mut Engine<'_>,
    id: MapperId,
    written: &mut HashSet<MapperId>,
    emission: &mut Emission,
) -> Result<()> {
    if !written.insert(id) {
        return Ok(());
    }
    let includes: Vec<MapperId> = engine.mapper(id).includes.keys().copied().collect();
    for included in includes {
        write_in_order(engine, included, written, emission)?;
    }

    let mapper = engine.mapper(id);
    if !mapper.is_annotated() || mapper.failed {
        return Ok(());
    }
    let name = mapper.name.clone();
    emission
        .diagnostics
        .push(Diagnostic::info(PHASE, format!("writing mapper {name}")).at(&name));

    match engine.write_mapper(id) {
        Ok(spec) => emission.output.mappers.push(spec),
        Err(err) => {
            engine.mappers[id.0].failed = true;
            report(&mut emission.diagnostics, err, &name)?;
        }
    }
    emission.diagnostics.extend(engine.take_warnings());
    Ok(())
}

fn report(diagnostics: &mut Vec<Diagnostic>, err: MappingError, location: &str) -> Result<()> {
    if err.is_internal() {
        return Err(eyre!(err));
    }
    debug!(%location, error = %err, "mapping error");
    diagnostics.push(Diagnostic::error(PHASE, err.to_string()).at(location));
    Ok(())
}

impl Engine<'_> {
    /// Write the functions of one annotated mapper.
    pub fn write_mapper(&mut self, id: MapperId) -> Result<MapperSpec, MappingError> {
        let _span = debug_span!("mapper", name = %self.mappers[id.0].name).entered();

        let declared: Vec<MappingId> = self.mappers[id.0]
            .mappings
            .iter()
            .copied()
            .filter(|m| {
                let mapping = &self.mappings[m.0];
                mapping.is_declared() && !mapping.is_implemented()
            })
            .collect();

        let mut functions = Vec::new();
        for mapping in declared {
            functions.push(self.write_function(mapping)?);
        }
        while let Some(next) = self.mappers[id.0].queue.pop_front() {
            if self.mappings[next.0].is_implemented() {
                continue;
            }
            functions.push(self.write_function(next)?);
        }

        let mapper = &self.mappers[id.0];
        Ok(MapperSpec {
            name: mapper.name.clone(),
            implementation: mapper.implementation(),
            shape: mapper.shape,
            imports: mapper.imports.clone(),
            injection: mapper.injection,
            scope: mapper.scope.clone(),
            includes: self.include_specs(id),
            functions,
        })
    }

    fn write_function(&mut self, id: MappingId) -> Result<FunctionSpec, MappingError> {
        debug!(function = %self.qualified_name(id), "writing function");
        let body = self.write_body(id)?;

        let mapping = &mut self.mappings[id.0];
        mapping.state = MappingState::Implemented;
        let spec = FunctionSpec::new(&mapping.name, mapping.target.clone())
            .params(
                mapping
                    .sources
                    .iter()
                    .map(|s| ParamSpec::new(&s.name, s.ty.clone())),
            )
            .statements(body);

        if mapping.is_declared() {
            Ok(spec.override_())
        } else {
            let source = mapping
                .sources
                .first()
                .map(|s| s.ty.to_string())
                .unwrap_or_default();
            Ok(spec
                .doc(format!("Maps `{source}` to `{}`.", mapping.target))
                .private())
        }
    }

    fn include_specs(&self, id: MapperId) -> Vec<IncludeSpec> {
        self.mappers[id.0]
            .includes
            .iter()
            .map(|(included, field)| {
                let mapper = &self.mappers[included.0];
                IncludeSpec {
                    field: field.clone(),
                    mapper: mapper.name.clone(),
                    generated: mapper.is_annotated(),
                }
            })
            .collect()
    }

    /// Describe how a factory builds its mappers. Generated mappers they
    /// include get an entry too, ahead of the mapper that needs them.
    pub fn factory(&self, decl: &FactoryDecl) -> Result<FactorySpec, MappingError> {
        if decl.mappers.is_empty() {
            return Err(MappingError::AnnotationShape {
                declaration: decl.name.clone(),
                reason: "a factory needs at least one mapper".into(),
            });
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for name in &decl.mappers {
            let id = self
                .mapper_id(name)
                .filter(|id| self.mappers[id.0].is_annotated())
                .ok_or_else(|| MappingError::UnresolvedMapper { name: name.clone() })?;
            self.collect_entry(id, &mut seen, &mut entries);
        }

        Ok(FactorySpec {
            name: decl.name.clone(),
            style: decl.style,
            entries,
        })
    }

    fn collect_entry(
        &self,
        id: MapperId,
        seen: &mut HashSet<MapperId>,
        entries: &mut Vec<FactoryEntry>,
    ) {
        if !seen.insert(id) {
            return;
        }
        for included in self.mappers[id.0].includes.keys() {
            if self.mappers[included.0].is_annotated() {
                self.collect_entry(*included, seen, entries);
            }
        }
        let mapper = &self.mappers[id.0];
        entries.push(FactoryEntry {
            mapper: mapper.name.clone(),
            implementation: mapper.implementation(),
            dependencies: self.include_specs(id),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        builder::{Expr, NullFallback, Statement},
        pipeline::Severity,
        testing,
    };

    const TYPES: &str = r#"
        [project]
        name = "test"

        [types.Dto]
        kind = "data"
        fields = { id = "Long", name = "String?", nested = "NestedDto", items = "List<NestedDto>" }

        [types.NestedDto]
        kind = "data"
        fields = { id = "Long" }

        [types.Model]
        kind = "data"
        fields = { id = "Long", name = "String", nested = "NestedModel", items = "List<NestedModel>" }

        [types.NestedModel]
        kind = "data"
        fields = { id = "Long" }

        [types.Status]
        kind = "enum"
        entries = ["OneSample", "SecondSample", "Unknown"]

        [types.Node]
        kind = "data"
        fields = { id = "Long", children = "List<Node>" }

        [types.NodeModel]
        kind = "data"
        fields = { id = "Long", children = "List<NodeModel>" }

        [types.Wrapper]
        kind = "data"
        fields = { root = "Node" }

        [types.WrapperModel]
        kind = "data"
        fields = { root = "NodeModel" }
    "#;

    fn emit(mappers: &str) -> Emission {
        testing::emit(&format!("{TYPES}\n{mappers}")).expect("emission should not abort")
    }

    fn errors(emission: &Emission) -> Vec<&str> {
        emission
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .map(|d| d.message.as_str())
            .collect()
    }

    fn function_names(emission: &Emission, mapper: &str) -> Vec<String> {
        emission
            .output
            .mapper(mapper)
            .map(|m| m.functions.iter().map(|f| f.name.clone()).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_identical_types_read_fields_directly() {
        let emission = emit(
            r#"
            [[mappers.NestedMapper.functions]]
            name = "map"
            params = { dto = "NestedDto" }
            returns = "NestedModel"
        "#,
        );
        assert!(errors(&emission).is_empty());
        let function = &emission.output.mappers[0].functions[0];
        assert!(function.is_override);
        assert_eq!(
            function.body,
            vec![Statement::return_(Expr::Construct {
                ty: remap_ir::TypeRef::named("NestedModel"),
                fields: vec![crate::builder::FieldInit::new("id", Expr::path(["dto", "id"]))],
                fill_defaults: false,
            })]
        );
    }

    #[test]
    fn test_collections_synthesize_element_functions() {
        let emission = emit(
            r#"
            [mappers.SampleMapper]
            nullability = "unwrap"

            [[mappers.SampleMapper.functions]]
            name = "map"
            params = { dto = "Dto" }
            returns = "Model"
        "#,
        );
        assert!(errors(&emission).is_empty(), "{:?}", emission.diagnostics);
        assert_eq!(
            function_names(&emission, "SampleMapper"),
            vec!["map", "map_nested_dto", "map_nested_dto_list"]
        );

        let mapper = emission.output.mapper("SampleMapper").unwrap();
        let map = mapper.function("map").unwrap();
        let Statement::Return(Expr::Construct { fields, .. }) = &map.body[0] else {
            panic!("unexpected body {:?}", map.body);
        };
        assert_eq!(
            fields[1].value,
            Expr::fallback(Expr::path(["dto", "name"]), NullFallback::ForceUnwrap)
        );
        let list = mapper.function("map_nested_dto_list").unwrap();
        assert!(!list.is_override);
        assert!(matches!(
            &list.body[1],
            Statement::Let { value: Expr::NewBuffer { capacity: Some(_) }, .. }
        ));
    }

    #[test]
    fn test_fail_policy_abandons_only_that_mapper() {
        let emission = emit(
            r#"
            [[mappers.SampleMapper.functions]]
            name = "map"
            params = { dto = "Dto" }
            returns = "Model"

            [[mappers.NestedMapper.functions]]
            name = "map"
            params = { dto = "NestedDto" }
            returns = "NestedModel"
        "#,
        );
        assert_eq!(
            errors(&emission),
            vec![
                "nullable source `dto.name` cannot be assigned to non-null target `name` in SampleMapper.map(dto)"
            ]
        );
        assert!(emission.output.mapper("SampleMapper").is_none());
        assert!(emission.output.mapper("NestedMapper").is_some());
        let error = emission
            .diagnostics
            .iter()
            .find(|d| d.severity == Severity::Error)
            .unwrap();
        assert_eq!(error.location.as_deref(), Some("SampleMapper"));
    }

    #[test]
    fn test_string_to_enum() {
        let emission = emit(
            r#"
            [mappers.StatusMapper]
            enum-source-naming = "upper-snake"
            enum-target-naming = "upper-camel"

            [[mappers.StatusMapper.functions]]
            name = "parse"
            params = { value = "String" }
            returns = "Status"
            enum-mappings = [{ target = "Unknown" }]
        "#,
        );
        assert!(errors(&emission).is_empty());
        let parse = &emission.output.mappers[0].functions[0];
        let Statement::Return(Expr::Match { arms, .. }) = &parse.body[0] else {
            panic!("unexpected body {:?}", parse.body);
        };
        assert_eq!(
            arms[0].pattern,
            crate::builder::Pattern::Literal("ONE_SAMPLE".into())
        );
        assert_eq!(arms.last().unwrap().pattern, crate::builder::Pattern::Wildcard);
    }

    #[test]
    fn test_included_synthesized_functions_are_not_reused() {
        let emission = emit(
            r#"
            [mappers.OuterMapper]
            includes = ["InnerMapper"]

            [[mappers.OuterMapper.functions]]
            name = "map_wrapper"
            params = { wrapper = "Wrapper" }
            returns = "WrapperModel"

            [[mappers.InnerMapper.functions]]
            name = "map_nodes"
            params = { nodes = "List<Node>" }
            returns = "List<NodeModel>"
        "#,
        );
        assert!(errors(&emission).is_empty(), "{:?}", emission.diagnostics);

        // Includes are written first.
        let order: Vec<&str> = emission.output.mappers.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(order, vec!["InnerMapper", "OuterMapper"]);
        assert_eq!(
            function_names(&emission, "InnerMapper"),
            vec!["map_nodes", "map_node"]
        );
        // InnerMapper's `map_node` is synthesized, so OuterMapper gets its own.
        assert_eq!(
            function_names(&emission, "OuterMapper"),
            vec!["map_wrapper", "map_node"]
        );

        // Declared functions of the include are called through its field.
        let outer = emission.output.mapper("OuterMapper").unwrap();
        let map_node = outer.function("map_node").unwrap();
        let Statement::Return(Expr::Construct { fields, .. }) = &map_node.body[0] else {
            panic!("unexpected body {:?}", map_node.body);
        };
        assert_eq!(
            fields[1].value,
            Expr::Call {
                receiver: Some("inner_mapper".into()),
                function: "map_nodes".into(),
                args: vec![Expr::path(["root", "children"])],
            }
        );
        assert_eq!(outer.includes[0].field, "inner_mapper");
        assert!(outer.includes[0].generated);
    }

    #[test]
    fn test_recursive_types_terminate() {
        let emission = emit(
            r#"
            [[mappers.TreeMapper.functions]]
            name = "map"
            params = { node = "Node" }
            returns = "NodeModel"
        "#,
        );
        assert!(errors(&emission).is_empty());
        assert_eq!(
            function_names(&emission, "TreeMapper"),
            vec!["map", "map_node_list"]
        );
    }

    #[test]
    fn test_generation_is_deterministic() {
        let mappers = r#"
            [mappers.SampleMapper]
            nullability = "raise"

            [[mappers.SampleMapper.functions]]
            name = "map"
            params = { dto = "Dto" }
            returns = "Model"

            [[mappers.TreeMapper.functions]]
            name = "map"
            params = { node = "Node" }
            returns = "NodeModel"
        "#;
        assert_eq!(emit(mappers).output, emit(mappers).output);
    }

    #[test]
    fn test_writing_is_logged() {
        let emission = emit(
            r#"
            [[mappers.NestedMapper.functions]]
            name = "map"
            params = { dto = "NestedDto" }
            returns = "NestedModel"
        "#,
        );
        let infos: Vec<&str> = emission
            .diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Info)
            .map(|d| d.message.as_str())
            .collect();
        assert_eq!(infos, vec!["writing mapper NestedMapper"]);
    }

    #[test]
    fn test_factories() {
        let emission = emit(
            r#"
            [mappers.OuterMapper]
            includes = ["InnerMapper", "DateUtils"]

            [mappers.InnerMapper]

            [helpers.DateUtils]

            [factories.Mappers]
            mappers = ["OuterMapper"]

            [factories.Broken]
            mappers = ["DateUtils"]
        "#,
        );
        let factory = &emission.output.factories[0];
        let entries: Vec<&str> = factory.entries.iter().map(|e| e.mapper.as_str()).collect();
        assert_eq!(entries, vec!["InnerMapper", "OuterMapper"]);
        let external: Vec<&str> = factory
            .external_dependencies()
            .iter()
            .map(|d| d.mapper.as_str())
            .collect();
        assert_eq!(external, vec!["DateUtils"]);
        assert_eq!(errors(&emission), vec!["can't find mapper `DateUtils`"]);
    }
}
