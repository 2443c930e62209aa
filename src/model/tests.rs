use super::*;
use rstest::rstest;

fn binding(local: &str, origin: ImportOrigin) -> ImportBinding {
    ImportBinding {
        local: local.into(),
        origin,
        reexported: false,
        range: TextRange::default(),
    }
}

fn member(module: &str, name: &str) -> ImportOrigin {
    ImportOrigin::Member {
        module: module.into(),
        name: name.into(),
    }
}

fn name(text: &str) -> TypeExpr {
    TypeExpr::Name(text.into())
}

#[rstest]
#[case(name("int"), "int")]
#[case(TypeExpr::Union(vec![name("int"), TypeExpr::none()]), "int | None")]
#[case(
    TypeExpr::Generic { base: "dict".into(), args: vec![name("str"), TypeExpr::ForwardRef("Node".into())] },
    "dict[str, \"Node\"]"
)]
#[case(
    TypeExpr::Callable { base: "Callable".into(), params: Some(vec![name("int")]), returns: Box::new(name("str")) },
    "Callable[[int], str]"
)]
#[case(
    TypeExpr::Callable { base: "Callable".into(), params: None, returns: Box::new(TypeExpr::none()) },
    "Callable[..., None]"
)]
#[case(
    TypeExpr::Literal { base: "Literal".into(), values: vec!["\"a\"".into(), "1".into()] },
    "Literal[\"a\", 1]"
)]
#[case(
    TypeExpr::Generic { base: "tuple".into(), args: vec![TypeExpr::Tuple(vec![])] },
    "tuple[()]"
)]
fn test_type_expr_display(#[case] ty: TypeExpr, #[case] expected: &str) {
    assert_eq!(ty.to_string(), expected);
}

#[test]
fn test_forward_ref_unquoted() {
    let ty = TypeExpr::Generic {
        base: "list".into(),
        args: vec![TypeExpr::ForwardRef("Node".into())],
    };
    assert_eq!(ty.unquoted(), "list[Node]");
}

#[rstest]
#[case("plain", "\"plain\"")]
#[case("say \"hi\"", "\"say \\\"hi\\\"\"")]
#[case("a\\b\n", "\"a\\\\b\\n\"")]
fn test_quote_str(#[case] value: &str, #[case] expected: &str) {
    assert_eq!(quote_str(value), expected);
}

#[rstest]
#[case("pkg.mod", ".sibling", "pkg.sibling")]
#[case("pkg.mod", ".", "pkg")]
#[case("pkg.sub.mod", "..other", "pkg.other")]
#[case("pkg.mod", "absolute", "absolute")]
#[case("", ".sibling", ".sibling")]
#[case("mod", "...far", "...far")]
fn test_resolve_relative(#[case] module_path: &str, #[case] module: &str, #[case] expected: &str) {
    assert_eq!(resolve_relative(module_path, module), expected);
}

#[test]
fn test_requirements_sorted_by_module_then_name() {
    let mut requirements = ImportRequirements::new();
    requirements.require(&binding("Z", member("zeta", "Z")), false).unwrap();
    requirements.require(&binding("b", member("alpha", "b")), false).unwrap();
    requirements
        .require(
            &binding(
                "alpha",
                ImportOrigin::Module {
                    module: "alpha".into(),
                    aliased: false,
                },
            ),
            false,
        )
        .unwrap();
    requirements.require(&binding("a", member("alpha", "a")), false).unwrap();

    let order: Vec<(String, Option<String>)> = requirements
        .iter()
        .map(|r| (r.module.clone(), r.name.clone()))
        .collect();
    assert_eq!(
        order,
        vec![
            ("alpha".to_string(), None),
            ("alpha".to_string(), Some("a".to_string())),
            ("alpha".to_string(), Some("b".to_string())),
            ("zeta".to_string(), Some("Z".to_string())),
        ]
    );
}

#[test]
fn test_requirements_deduplicate() {
    let mut requirements = ImportRequirements::new();
    let any = binding("Any", member("typing", "Any"));
    requirements.require(&any, false).unwrap();
    requirements.require(&any, false).unwrap();
    assert_eq!(requirements.iter().count(), 1);
}

#[test]
fn test_requirements_collision() {
    let mut requirements = ImportRequirements::new();
    requirements
        .require(&binding("Any", member("typing", "Any")), false)
        .unwrap();
    let error = requirements
        .require(&binding("Any", member("mylib", "Any")), false)
        .unwrap_err();
    assert_eq!(
        error,
        crate::diagnostics::ExtractError::ImportCollision {
            local: "Any".into(),
            first: "typing.Any".into(),
            second: "mylib.Any".into(),
        }
    );
}

#[test]
fn test_reexport_supersedes_plain_import() {
    let mut requirements = ImportRequirements::new();
    let helper = binding("helper", member("pkg", "helper"));
    requirements.require(&helper, false).unwrap();
    requirements.require(&helper, true).unwrap();
    requirements.require(&helper, false).unwrap();

    let all: Vec<_> = requirements.iter().collect();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].alias.as_deref(), Some("helper"));
}

#[test]
fn test_unaliased_submodule_import_binds_root() {
    let os_path = binding(
        "os",
        ImportOrigin::Module {
            module: "os.path".into(),
            aliased: false,
        },
    );
    let requirement = ImportRequirement::from_binding(&os_path, true);
    assert_eq!(requirement.alias, None);
    assert_eq!(requirement.local(), "os");
}

#[test]
fn test_binding_canonical_path() {
    let relative = binding("helper", member(".util", "helper"));
    assert_eq!(relative.canonical("pkg.mod"), "pkg.util.helper");

    let aliased = binding(
        "np",
        ImportOrigin::Module {
            module: "numpy".into(),
            aliased: true,
        },
    );
    assert_eq!(aliased.canonical(""), "numpy");
}
