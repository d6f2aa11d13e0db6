use super::*;
use pretty_assertions::assert_eq;

const HIERARCHY: &str = r"
struct base {
    virtual void k(int) const;
    virtual ~base();
    virtual int pure() = 0;
    void plain();
};
struct middle : base {
    void k(int) const override;
};
struct derived final : middle {
    void k(int) const final;
    ~derived();
    int pure();
    void plain();
    void k(long) const;
};
";

const DANGLING: &str = r"
struct a {
    void f() override;
    void g() final;
};
";

fn kind_of(unit: &TranslationUnit, unique_name: &str) -> VirtualKind {
    find(unit, unique_name)
        .virtuality()
        .map(|v| v.kind)
        .unwrap_or_else(|| panic!("{unique_name} cannot be virtual"))
}

// ════════════════════════════════════════════════════════════════
// 1. Introducing virtual functions
// ════════════════════════════════════════════════════════════════

#[test]
fn virtual_keyword_introduces_new_virtuals() {
    let unit = parse(HIERARCHY);
    assert_eq!(kind_of(&unit, "base::k(int) const"), VirtualKind::New);
    assert_eq!(kind_of(&unit, "base::~base()"), VirtualKind::New);
    assert_eq!(kind_of(&unit, "base::plain()"), VirtualKind::None);
}

#[test]
fn pure_virtual_is_flagged() {
    let unit = parse(HIERARCHY);
    let pure = find(&unit, "base::pure()");
    let virtuality = pure.virtuality().expect("member function");
    assert_eq!(virtuality.kind, VirtualKind::New);
    assert!(virtuality.is_pure);
    assert_eq!(
        pure.function().map(|f| f.definition),
        Some(DefinitionKind::Pure)
    );
}

// ════════════════════════════════════════════════════════════════
// 2. Overrides
// ════════════════════════════════════════════════════════════════

#[test]
fn explicit_override() {
    let unit = parse(HIERARCHY);
    assert_eq!(kind_of(&unit, "middle::k(int) const"), VirtualKind::Overridden);
}

#[test]
fn overrides_are_found_without_a_virt_specifier() {
    let unit = parse(HIERARCHY);
    assert_eq!(kind_of(&unit, "derived::~derived()"), VirtualKind::Overridden);

    let pure = find(&unit, "derived::pure()").virtuality().expect("member function");
    assert_eq!(pure.kind, VirtualKind::Overridden);
    assert!(!pure.is_pure);
}

#[test]
fn final_override_through_two_levels() {
    let unit = parse(HIERARCHY);
    let k = find(&unit, "derived::k(int) const")
        .virtuality()
        .expect("member function");
    assert_eq!(k.kind, VirtualKind::Overridden);
    assert!(k.is_final);
    assert!(
        find(&unit, "derived")
            .as_class()
            .is_some_and(|c| c.is_final)
    );
}

#[test]
fn different_parameters_or_non_virtual_base_do_not_override() {
    let unit = parse(HIERARCHY);
    assert_eq!(kind_of(&unit, "derived::k(long) const"), VirtualKind::None);
    assert_eq!(kind_of(&unit, "derived::plain()"), VirtualKind::None);
    assert!(unit.warnings().next().is_none(), "{:?}", unit.diagnostics);
}

// ════════════════════════════════════════════════════════════════
// 3. Mismatched virt-specifiers
// ════════════════════════════════════════════════════════════════

#[test]
fn override_without_base_is_reported() {
    let unit = parse(DANGLING);
    assert_eq!(kind_of(&unit, "a::f()"), VirtualKind::None);
    assert_eq!(kind_of(&unit, "a::g()"), VirtualKind::None);

    let messages: Vec<_> = unit.warnings().map(|d| d.message.as_str()).collect();
    assert_eq!(messages.len(), 2, "{messages:?}");
    assert!(messages[0].contains("`f` is marked override"), "{messages:?}");
    assert!(messages[1].contains("`g` is marked final"), "{messages:?}");
}

#[test]
fn mismatch_reporting_can_be_disabled() {
    let config = ParserConfig {
        report_override_mismatch: false,
        ..ParserConfig::default()
    };
    let unit = parse_with(DANGLING, &config).expect("translation unit should build");
    assert!(unit.diagnostics.is_empty(), "{:?}", unit.diagnostics);
}

#[test]
fn base_in_enclosing_namespace_is_found() {
    let unit = parse(
        r"
namespace lib {
struct root { virtual void run(); };
namespace impl {
struct leaf : root { void run(); };
}
}
",
    );
    assert_eq!(kind_of(&unit, "lib::impl::leaf::run()"), VirtualKind::Overridden);
}
