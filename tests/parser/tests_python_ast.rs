//! Typed AST access through the public parser API.

use stub_extractor::parser::{AstNode, AstToken, SourceFile, Stmt, SyntaxKind, parse, tokenize};

fn statements(source: &str) -> Vec<Stmt> {
    let parsed = parse(source);
    assert!(parsed.ok(), "{:?}", parsed.errors);
    SourceFile::cast(parsed.syntax()).expect("source file").statements().collect()
}

#[test]
fn test_function_signature_accessors() {
    let stmts = statements("async def fetch(url, retries=3, *, timeout: float) -> bytes:\n    pass\n");
    let [Stmt::FunctionDef(func)] = stmts.as_slice() else {
        panic!("expected one function, got {stmts:?}");
    };
    assert_eq!(func.name().expect("name").text(), "fetch");
    assert!(func.is_async());

    let params = func.param_list().expect("params").params();
    let names: Vec<String> = params
        .iter()
        .filter_map(|p| p.name().map(|n| n.text().to_string()))
        .collect();
    assert_eq!(names, vec!["url", "retries", "timeout"]);
    assert!(params[1].has_default());
    assert!(func.return_type().is_some());
}

#[test]
fn test_import_from_levels() {
    let stmts = statements("from ..pkg import a\nfrom . import *\n");
    let levels: Vec<(usize, bool)> = stmts
        .iter()
        .filter_map(|s| match s {
            Stmt::ImportFrom(import) => Some((import.level(), import.is_star())),
            _ => None,
        })
        .collect();
    assert_eq!(levels, vec![(2, false), (1, true)]);
}

#[test]
fn test_nested_blocks_stay_in_their_class() {
    let stmts = statements("class A:\n    def f(self):\n        pass\n\n    x = 1\ny = 2\n");
    assert_eq!(stmts.len(), 2);
    assert!(matches!(stmts[0], Stmt::ClassDef(_)));
    assert!(matches!(stmts[1], Stmt::Assign(_)));
}

#[test]
fn test_tokens_cover_the_source() {
    let source = "x = 'a'  # note\n";
    let tokens = tokenize(source);
    let joined: String = tokens.iter().map(|t| t.text).collect();
    assert_eq!(joined, source);
    assert!(tokens.iter().any(|t| t.kind == SyntaxKind::COMMENT));
}
