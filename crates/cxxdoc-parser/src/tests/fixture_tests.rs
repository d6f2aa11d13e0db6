use super::*;
use cxxdoc_core::tree::Walk;
use pretty_assertions::assert_eq;

// ════════════════════════════════════════════════════════════════
// 1. Smoke / fixture tests
// ════════════════════════════════════════════════════════════════

#[test]
fn fixture_builds_without_diagnostics() {
    let unit = fixture_unit();
    assert_eq!(unit.name, "sample.cpp");
    assert!(unit.diagnostics.is_empty(), "{:?}", unit.diagnostics);
    assert!(unit.tree.len() >= 35, "expected 35+ entities, got {}", unit.tree.len());
}

#[test]
fn fixture_top_level_order() {
    let unit = fixture_unit();
    let roots: Vec<_> = unit
        .tree
        .roots()
        .iter()
        .map(|id| unit.tree.get(*id).unique_name.as_str())
        .collect();
    assert_eq!(
        roots,
        vec![
            "geo",
            "c_entry()",
            "make_point(double,double)",
            "answer"
        ]
    );
}

#[test]
fn fixture_classes() {
    let unit = fixture_unit();
    assert_eq!(
        names_of_kind(&unit, "class"),
        vec!["geo::shape", "geo::point", "geo::circle"]
    );
    let circle = find(&unit, "geo::circle").as_class().expect("class");
    assert!(circle.is_final);
    assert_eq!(circle.bases.len(), 1);
    assert_eq!(circle.bases[0].name, "shape");
}

#[test]
fn fixture_virtual_classification() {
    let unit = fixture_unit();
    let kind = |name: &str| find(&unit, name).virtuality().map(|v| v.kind);
    assert_eq!(kind("geo::shape::~shape()"), Some(VirtualKind::New));
    assert_eq!(kind("geo::shape::count()"), Some(VirtualKind::Static));
    assert_eq!(kind("geo::circle::~circle()"), Some(VirtualKind::Overridden));
    assert_eq!(kind("geo::circle::area() const"), Some(VirtualKind::Overridden));
    assert_eq!(kind("geo::circle::name() const"), Some(VirtualKind::Overridden));
    assert_eq!(kind("geo::circle::operator bool() const"), Some(VirtualKind::None));
    assert!(
        find(&unit, "geo::shape::area() const")
            .virtuality()
            .is_some_and(|v| v.is_pure)
    );
}

#[test]
fn fixture_out_of_line_definitions_merge() {
    let unit = fixture_unit();
    let definition = |name: &str| find(&unit, name).function().map(|f| f.definition);
    assert_eq!(definition("geo::circle::circle(double)"), Some(DefinitionKind::Normal));
    assert_eq!(definition("geo::circle::area() const"), Some(DefinitionKind::Normal));
    assert_eq!(
        definition("geo::circle::circle(const circle &)"),
        Some(DefinitionKind::Defaulted)
    );
    assert_eq!(
        names_of_kind(&unit, "constructor"),
        vec!["geo::circle::circle(double)", "geo::circle::circle(const circle &)"]
    );
}

#[test]
fn fixture_signatures() {
    let unit = fixture_unit();
    let scale = find(&unit, "geo::circle::scale(double,int,...)")
        .function()
        .expect("function-like");
    assert!(scale.is_variadic);
    assert_eq!(scale.parameters[1].default_value.as_deref(), Some("(1 + 1)"));

    let helper = find(&unit, "geo::detail::v1::helper(int (*)(int),const point &)");
    let sig = helper.function().expect("function-like");
    assert_eq!(sig.noexcept.expression, "false");
    assert!(sig.noexcept.is_explicit);

    let make_point = find(&unit, "make_point(double,double)");
    assert_eq!(
        make_point.function().map(|f| f.return_type.as_str()),
        Some("geo::point")
    );
    let name = find(&unit, "geo::shape::name() const");
    assert_eq!(name.function().map(|f| f.return_type.as_str()), Some("const char*"));
}

#[test]
fn fixture_template_location_starts_at_the_template_keyword() {
    let unit = fixture_unit();
    let clamp = find(&unit, "geo::clamp(T,T,T)");
    assert_eq!(clamp.template_parameters.as_deref(), Some("<typename T>"));
    assert_eq!(clamp.location.start_line, 43);
    assert_eq!(clamp.location.end_line, 44);
}

#[test]
fn fixture_aliases_and_variables() {
    let unit = fixture_unit();
    assert!(matches!(
        &find(&unit, "geo::area_fn").kind,
        EntityKind::TypeAlias { target } if target == "double (*)(const shape &)"
    ));
    assert!(matches!(
        &find(&unit, "geo::vec2_ptr").kind,
        EntityKind::TypeAlias { target } if target == "struct point *"
    ));
    find(&unit, "geo::hidden_counter");
    let EntityKind::Variable(answer) = &find(&unit, "answer").kind else {
        panic!("answer should be a variable");
    };
    assert!(answer.is_constexpr);
    assert_eq!(answer.initializer.as_deref(), Some("42"));
}

#[test]
fn walk_can_skip_subtrees() {
    let unit = fixture_unit();
    let mut visited = Vec::new();
    unit.tree.walk(|entity, depth| {
        visited.push((entity.name.clone(), depth));
        if entity.as_class().is_some() {
            Walk::SkipChildren
        } else {
            Walk::Continue
        }
    });
    assert!(visited.contains(&("shape".to_string(), 1)));
    assert!(!visited.iter().any(|(name, _)| name == "radius_"));
}

// ════════════════════════════════════════════════════════════════
// 2. Batches
// ════════════════════════════════════════════════════════════════

#[test]
fn batch_results_keep_input_order() {
    let units = [
        ("a.cpp", "int a;"),
        ("b.cpp", "void broken( {"),
        ("c.cpp", "int c;"),
    ];
    let results = parse_translation_units(&units, &ParserConfig::default());
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().map(|u| u.name.as_str()).ok(), Some("a.cpp"));
    assert!(matches!(
        &results[1],
        Err(ParserError::FrontEnd { unit, .. }) if unit == "b.cpp"
    ));
    assert!(results[2].as_ref().is_ok_and(|u| u.tree.find("c").is_some()));
}

#[test]
fn batch_builds_equal_single_builds() {
    let source = include_str!("../../tests/fixtures/sample.cpp");
    let units = vec![("one.cpp".to_string(), source.to_string()); 4];
    let results = parse_translation_units(&units, &ParserConfig::default());
    let single = fixture_unit();
    for result in results {
        let unit = result.expect("fixture should build");
        assert_eq!(unit.tree, single.tree);
    }
}

// ════════════════════════════════════════════════════════════════
// 3. Serialization
// ════════════════════════════════════════════════════════════════

#[test]
fn built_unit_survives_json() {
    let unit = fixture_unit();
    let json = serde_json::to_string(&unit).expect("unit should serialize");
    let back: TranslationUnit = serde_json::from_str(&json).expect("unit should deserialize");
    assert_eq!(back, unit);
    assert_eq!(back.tree.find("geo::circle").map(|e| e.name.as_str()), Some("circle"));
}
