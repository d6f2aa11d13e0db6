use super::*;
pub(super) use cxxdoc_core::entities::Entity;
pub(super) use cxxdoc_core::enums::{Access, ClassKey, DefinitionKind, RefQualifier, VirtualKind};
pub(super) use cxxdoc_core::{EntityKind, TranslationUnit};

mod consistency_tests;
mod fixture_tests;
mod member_tests;
mod special_member_tests;
mod virtual_tests;

fn parse(source: &str) -> TranslationUnit {
    parse_translation_unit("test.cpp", source, &ParserConfig::default())
        .expect("translation unit should build")
}

fn parse_with(source: &str, config: &ParserConfig) -> Result<TranslationUnit, ParserError> {
    parse_translation_unit("test.cpp", source, config)
}

fn partial() -> ParserConfig {
    ParserConfig {
        allow_partial: true,
        ..ParserConfig::default()
    }
}

fn find<'a>(unit: &'a TranslationUnit, unique_name: &str) -> &'a Entity {
    unit.tree.find(unique_name).unwrap_or_else(|| {
        let available: Vec<_> = unit
            .tree
            .iter()
            .map(|(_, e, _)| format!("{}: {}", e.kind.as_str(), e.unique_name))
            .collect();
        panic!(
            "entity {unique_name:?} not found. Available entities:\n{}",
            available.join("\n")
        );
    })
}

fn names_of_kind(unit: &TranslationUnit, kind: &str) -> Vec<String> {
    unit.tree
        .iter()
        .filter(|(_, e, _)| e.kind.as_str() == kind)
        .map(|(_, e, _)| e.unique_name.clone())
        .collect()
}

fn child_names(unit: &TranslationUnit, unique_name: &str) -> Vec<String> {
    let id = unit
        .tree
        .find_id(unique_name)
        .unwrap_or_else(|| panic!("entity {unique_name:?} not found"));
    unit.tree.children(id).map(|e| e.name.clone()).collect()
}

fn fixture_unit() -> TranslationUnit {
    let source = include_str!("../../tests/fixtures/sample.cpp");
    parse_translation_unit("sample.cpp", source, &ParserConfig::default())
        .expect("fixture should build")
}
