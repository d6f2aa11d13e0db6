use super::*;
use pretty_assertions::assert_eq;
use rstest::rstest;

const CONSTRUCTORS: &str = r"
struct foo
{
    /// a
    [[noreturn]] foo() = delete;

    /// b
    explicit foo(int a = {}) {}

    /// c
    constexpr foo(char c) noexcept;

    /// d
    foo(const foo &other) __attribute__(()) = default;

    /// e
    foo(char *ptr) noexcept(false)
    : foo(0) {}
};
";

const CONVERSIONS: &str = r"
template <typename T>
struct bar {};

struct foo
{
    [[noreturn]] operator    int() [[]]; // multiple whitespace

    explicit __attribute__((foo)) operator const char&(void);

    constexpr explicit __attribute__((bar)) operator char() const volatile && noexcept
    {
        return '0';
    }

    operator bar<decltype(int())>();
};
";

fn member_names(unit: &TranslationUnit) -> Vec<String> {
    let id = unit.tree.find_id("foo").expect("foo");
    unit.tree.children(id).map(|e| e.unique_name.clone()).collect()
}

// ════════════════════════════════════════════════════════════════
// 1. Constructors
// ════════════════════════════════════════════════════════════════

#[test]
fn every_constructor_form_builds() {
    let unit = parse(CONSTRUCTORS);
    assert!(unit.diagnostics.is_empty(), "{:?}", unit.diagnostics);
    assert_eq!(
        member_names(&unit),
        vec![
            "foo::foo()",
            "foo::foo(int)",
            "foo::foo(char)",
            "foo::foo(const foo &)",
            "foo::foo(char *)",
        ]
    );
}

#[rstest]
#[case::deleted("foo::foo()", 0, false, false, ("false", false), DefinitionKind::Deleted)]
#[case::brace_default("foo::foo(int)", 1, false, true, ("false", false), DefinitionKind::Normal)]
#[case::constexpr_noexcept("foo::foo(char)", 1, true, false, ("true", true), DefinitionKind::Declaration)]
#[case::defaulted_copy("foo::foo(const foo &)", 1, false, false, ("false", false), DefinitionKind::Defaulted)]
#[case::delegating("foo::foo(char *)", 1, false, false, ("false", true), DefinitionKind::Normal)]
fn constructor_forms(
    #[case] unique_name: &str,
    #[case] parameters: usize,
    #[case] is_constexpr: bool,
    #[case] is_explicit: bool,
    #[case] noexcept: (&str, bool),
    #[case] definition: DefinitionKind,
) {
    let unit = parse(CONSTRUCTORS);
    let entity = find(&unit, unique_name);
    let EntityKind::Constructor(ctor) = &entity.kind else {
        panic!("{unique_name} should be a constructor");
    };
    assert_eq!(entity.full_name, "foo::foo");
    assert_eq!(ctor.is_explicit, is_explicit);

    let sig = &ctor.signature;
    assert_eq!(entity.unique_name, format!("{}{}", entity.full_name, sig.signature));
    assert!(!sig.is_variadic);
    assert_eq!(sig.return_type, "");
    assert_eq!(sig.parameters.len(), parameters);
    assert_eq!(sig.is_constexpr, is_constexpr);
    assert_eq!((sig.noexcept.expression.as_str(), sig.noexcept.is_explicit), noexcept);
    assert_eq!(sig.definition, definition);
}

#[test]
fn brace_initialized_default_is_kept() {
    let unit = parse(CONSTRUCTORS);
    let sig = find(&unit, "foo::foo(int)").function().expect("constructor");
    assert_eq!(sig.parameters[0].default_value.as_deref(), Some("{}"));
}

// ════════════════════════════════════════════════════════════════
// 2. Conversion operators
// ════════════════════════════════════════════════════════════════

#[test]
fn every_conversion_form_builds() {
    let unit = parse(CONVERSIONS);
    assert!(unit.diagnostics.is_empty(), "{:?}", unit.diagnostics);
    assert_eq!(
        member_names(&unit),
        vec![
            "foo::operator int()",
            "foo::operator const char &()",
            "foo::operator char() const volatile &&",
            "foo::operator bar<decltype(int())>()",
        ]
    );
}

#[rstest]
#[case::attributed("foo::operator int()", "int", false, false, ("false", false), DefinitionKind::Declaration)]
#[case::void_parameter("foo::operator const char &()", "const char &", true, false, ("false", false), DefinitionKind::Declaration)]
#[case::qualified_definition("foo::operator char() const volatile &&", "char", true, true, ("true", true), DefinitionKind::Normal)]
#[case::template_target("foo::operator bar<decltype(int())>()", "bar<decltype(int())>", false, false, ("false", false), DefinitionKind::Declaration)]
fn conversion_forms(
    #[case] unique_name: &str,
    #[case] target: &str,
    #[case] is_explicit: bool,
    #[case] is_constexpr: bool,
    #[case] noexcept: (&str, bool),
    #[case] definition: DefinitionKind,
) {
    let unit = parse(CONVERSIONS);
    let entity = find(&unit, unique_name);
    let EntityKind::ConversionOp(op) = &entity.kind else {
        panic!("{unique_name} should be a conversion operator");
    };
    assert_eq!(entity.name, format!("operator {target}"));
    assert_eq!(entity.full_name, format!("foo::{}", entity.name));
    assert_eq!(op.target_type(), target);
    assert_eq!(op.is_explicit, is_explicit);

    let sig = &op.signature;
    assert!(sig.takes_no_arguments());
    assert_eq!(entity.unique_name, format!("{}{}", entity.full_name, sig.signature));
    assert_eq!(sig.is_constexpr, is_constexpr);
    assert_eq!((sig.noexcept.expression.as_str(), sig.noexcept.is_explicit), noexcept);
    assert_eq!(sig.definition, definition);
}

#[test]
fn conversion_qualifiers() {
    let unit = parse(CONVERSIONS);
    let qualified = find(&unit, "foo::operator char() const volatile &&")
        .qualifiers()
        .expect("member qualifiers");
    assert!(qualified.cv.is_const);
    assert!(qualified.cv.is_volatile);
    assert_eq!(qualified.ref_qualifier, RefQualifier::Rvalue);

    let plain = find(&unit, "foo::operator int()")
        .qualifiers()
        .expect("member qualifiers");
    assert!(!plain.cv.is_const);
    assert_eq!(plain.ref_qualifier, RefQualifier::None);
}
