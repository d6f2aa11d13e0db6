use super::*;
use pretty_assertions::assert_eq;

const SOURCE: &str = r"
void a(int x, const char *ptr = nullptr);
int b(int c, ...) { return 0; }
struct base {
    virtual int& k() const = 0;
    virtual void m(int a);
    virtual ~base() = 0;
};
struct over : base {
    int& k() const override;
    void m(int a = (j(), 0)) final;
    ~over();
};
struct implicit : base {
    int& k() const;
};
";

// ════════════════════════════════════════════════════════════════
// 1. Names and signatures
// ════════════════════════════════════════════════════════════════

#[test]
fn unique_name_is_full_name_plus_signature() {
    let unit = parse(SOURCE);
    let mut functions = 0;
    unit.tree.visit(|entity| {
        if let Some(function) = entity.function() {
            functions += 1;
            assert_eq!(
                entity.unique_name,
                format!("{}{}", entity.full_name, function.signature)
            );
        } else {
            assert_eq!(entity.unique_name, entity.full_name);
        }
    });
    assert_eq!(functions, 9);
}

#[test]
fn signatures_never_mention_names_or_defaults() {
    let unit = parse(SOURCE);
    unit.tree.visit(|entity| {
        let Some(function) = entity.function() else {
            return;
        };
        for parameter in &function.parameters {
            if let Some(name) = &parameter.name {
                assert!(
                    !function.signature.contains(name.as_str()),
                    "{} leaks parameter name {name}",
                    entity.unique_name
                );
            }
            if let Some(default) = &parameter.default_value {
                assert!(!function.signature.contains(default.as_str()));
            }
        }
    });
}

#[test]
fn declaration_with_default_pointer() {
    let unit = parse(SOURCE);
    let sig = find(&unit, "a(int,const char *)")
        .function()
        .expect("function");
    assert_eq!(sig.parameters.len(), 2);
    assert_eq!(sig.parameters[1].default_value.as_deref(), Some("nullptr"));
    assert_eq!(sig.noexcept.expression, "false");
    assert!(!sig.noexcept.is_explicit);
    assert_eq!(sig.definition, DefinitionKind::Declaration);
}

#[test]
fn variadic_definition() {
    let unit = parse(SOURCE);
    let sig = find(&unit, "b(int,...)").function().expect("function");
    assert!(sig.is_variadic);
    assert_eq!(sig.definition, DefinitionKind::Normal);
}

#[test]
fn rebuilding_yields_identical_names() {
    let names = |unit: &TranslationUnit| -> Vec<String> {
        unit.tree.iter().map(|(_, e, _)| e.unique_name.clone()).collect()
    };
    assert_eq!(names(&parse(SOURCE)), names(&parse(SOURCE)));
}

// ════════════════════════════════════════════════════════════════
// 2. Overrides
// ════════════════════════════════════════════════════════════════

#[test]
fn override_of_a_pure_virtual_with_and_without_keyword() {
    let unit = parse(SOURCE);
    for name in ["over::k() const", "implicit::k() const"] {
        let k = find(&unit, name).virtuality().expect("member function");
        assert_eq!(k.kind, VirtualKind::Overridden, "{name}");
        assert!(!k.is_pure, "{name}");
    }
    let base_k = find(&unit, "base::k() const")
        .virtuality()
        .expect("member function");
    assert!(base_k.is_pure);
}

#[test]
fn final_override_keeps_its_default_argument() {
    let unit = parse(SOURCE);
    let m = find(&unit, "over::m(int)");
    let virtuality = m.virtuality().expect("member function");
    assert_eq!(virtuality.kind, VirtualKind::Overridden);
    assert!(virtuality.is_final);
    assert_eq!(
        m.function().and_then(|f| f.parameters[0].default_value.as_deref()),
        Some("(j(), 0)")
    );
}

#[test]
fn destructor_overrides_a_pure_virtual_destructor() {
    let unit = parse(SOURCE);
    let base = find(&unit, "base::~base()").virtuality().expect("destructor");
    assert_eq!(base.kind, VirtualKind::New);
    assert!(base.is_pure);
    assert_eq!(
        find(&unit, "over::~over()").virtuality().map(|v| v.kind),
        Some(VirtualKind::Overridden)
    );
    assert!(unit.diagnostics.is_empty(), "{:?}", unit.diagnostics);
}
