use super::*;
use pretty_assertions::assert_eq;

const SOURCE: &str = r"
struct foo {
    void k(int a, const char *b) const;
    void r() &&;
    void cv() const volatile &;
    static int count();
    mutable int cache;
    static const int limit = 8;
    operator const char &() const;
    explicit operator bool() const noexcept;
    foo &operator=(const foo &) = delete;
    foo &operator+=(int);
    bool operator()(int) const;
    foo();
    foo(foo &&) noexcept = default;
    ~foo();
    friend void swap(foo &, foo &);
};
";

// ════════════════════════════════════════════════════════════════
// 1. Member qualifiers
// ════════════════════════════════════════════════════════════════

#[test]
fn const_qualifier_joins_the_signature() {
    let unit = parse(SOURCE);
    let k = find(&unit, "foo::k(int,const char *) const");
    assert!(matches!(k.kind, EntityKind::MemberFunction(_)));
    let qualifiers = k.qualifiers().expect("member qualifiers");
    assert!(qualifiers.cv.is_const);
    assert!(!qualifiers.cv.is_volatile);
    assert_eq!(qualifiers.ref_qualifier, RefQualifier::None);
}

#[test]
fn ref_qualifiers() {
    let unit = parse(SOURCE);
    let r = find(&unit, "foo::r() &&");
    assert_eq!(
        r.qualifiers().map(|q| q.ref_qualifier),
        Some(RefQualifier::Rvalue)
    );

    let cv = find(&unit, "foo::cv() const volatile &");
    let qualifiers = cv.qualifiers().expect("member qualifiers");
    assert!(qualifiers.cv.is_const && qualifiers.cv.is_volatile);
    assert_eq!(qualifiers.ref_qualifier, RefQualifier::Lvalue);
}

#[test]
fn static_member_function_is_classified_static() {
    let unit = parse(SOURCE);
    let count = find(&unit, "foo::count()");
    assert_eq!(count.virtuality().map(|v| v.kind), Some(VirtualKind::Static));
}

// ════════════════════════════════════════════════════════════════
// 2. Data members
// ════════════════════════════════════════════════════════════════

#[test]
fn data_member_specifiers() {
    let unit = parse(SOURCE);
    let EntityKind::Variable(cache) = &find(&unit, "foo::cache").kind else {
        panic!("foo::cache should be a variable");
    };
    assert!(cache.is_mutable);
    assert!(!cache.is_static);

    let EntityKind::Variable(limit) = &find(&unit, "foo::limit").kind else {
        panic!("foo::limit should be a variable");
    };
    assert!(limit.is_static);
    assert_eq!(limit.ty, "const int");
    assert_eq!(limit.initializer.as_deref(), Some("8"));
}

// ════════════════════════════════════════════════════════════════
// 3. Operators and conversions
// ════════════════════════════════════════════════════════════════

#[test]
fn conversion_operator_names_its_target() {
    let unit = parse(SOURCE);
    let conversion = find(&unit, "foo::operator const char &() const");
    let EntityKind::ConversionOp(op) = &conversion.kind else {
        panic!("expected a conversion operator, got {}", conversion.kind.as_str());
    };
    assert_eq!(conversion.name, "operator const char &");
    assert_eq!(op.target_type(), "const char &");
    assert!(!op.is_explicit);
}

#[test]
fn explicit_conversion_operator() {
    let unit = parse(SOURCE);
    let conversion = find(&unit, "foo::operator bool() const");
    let EntityKind::ConversionOp(op) = &conversion.kind else {
        panic!("expected a conversion operator, got {}", conversion.kind.as_str());
    };
    assert!(op.is_explicit);
    assert_eq!(op.signature.noexcept.expression, "true");
}

#[test]
fn operator_functions_keep_their_symbol() {
    let unit = parse(SOURCE);
    let assign = find(&unit, "foo::operator=(const foo &)");
    let sig = assign.function().expect("function-like");
    assert_eq!(sig.return_type, "foo&");
    assert_eq!(sig.definition, DefinitionKind::Deleted);

    find(&unit, "foo::operator+=(int)");
    let call = find(&unit, "foo::operator()(int) const");
    assert_eq!(call.name, "operator()");
}

// ════════════════════════════════════════════════════════════════
// 4. Constructors and destructors
// ════════════════════════════════════════════════════════════════

#[test]
fn constructors_have_no_return_type() {
    let unit = parse(SOURCE);
    let ctor = find(&unit, "foo::foo()");
    assert!(matches!(ctor.kind, EntityKind::Constructor(_)));
    assert_eq!(ctor.function().map(|f| f.return_type.as_str()), Some(""));

    let moving = find(&unit, "foo::foo(foo &&)");
    let sig = moving.function().expect("function-like");
    assert_eq!(sig.definition, DefinitionKind::Defaulted);
    assert_eq!(sig.noexcept.expression, "true");
    assert!(sig.noexcept.is_explicit);
}

#[test]
fn destructor_is_implicitly_noexcept() {
    let unit = parse(SOURCE);
    let dtor = find(&unit, "foo::~foo()");
    assert!(matches!(dtor.kind, EntityKind::Destructor(_)));
    let noexcept = &dtor.function().expect("function-like").noexcept;
    assert_eq!(noexcept.expression, "true");
    assert!(!noexcept.is_explicit);
}

#[test]
fn implicit_destructor_noexcept_can_be_disabled() {
    let config = ParserConfig {
        implicit_destructor_noexcept: false,
        ..ParserConfig::default()
    };
    let unit = parse_with(SOURCE, &config).expect("translation unit should build");
    let dtor = find(&unit, "foo::~foo()");
    assert_eq!(
        dtor.function().map(|f| f.noexcept.expression.as_str()),
        Some("false")
    );
}

// ════════════════════════════════════════════════════════════════
// 5. Friends
// ════════════════════════════════════════════════════════════════

#[test]
fn friends_are_not_members() {
    let unit = parse(SOURCE);
    assert!(!child_names(&unit, "foo").contains(&"swap".to_string()));
    assert!(unit.tree.find("swap(foo &,foo &)").is_none());
}
