//! Driver runs against a real directory tree.

use std::fs;
use std::path::PathBuf;

use stub_extractor::DiagnosticCode;
use stub_extractor::driver::{Driver, DriverOptions, FileOutcome, stub_path};
use tempfile::TempDir;

fn package() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let pkg = dir.path().join("pkg");
    fs::create_dir_all(pkg.join("sub")).unwrap();
    fs::write(pkg.join("__init__.py"), "from .core import Engine as Engine\n").unwrap();
    fs::write(pkg.join("core.py"), "class Engine:\n    def start(self) -> None:\n        pass\n").unwrap();
    fs::write(pkg.join("sub").join("util.py"), "def helper(x: int) -> int:\n    return x\n").unwrap();
    fs::write(pkg.join("README.md"), "not python\n").unwrap();
    (dir, pkg)
}

#[test]
fn test_second_run_without_overwrite_skips_and_keeps_the_first_stub() {
    let (_dir, pkg) = package();
    let source = pkg.join("core.py");
    let target = stub_path(&source);

    let first = Driver::new(DriverOptions::default()).run(&[source.clone()]);
    assert!(matches!(first[0], FileOutcome::Written { .. }));
    let written = fs::read_to_string(&target).unwrap();

    fs::write(&source, "def replaced() -> None:\n    pass\n").unwrap();
    let second = Driver::new(DriverOptions::default()).run(&[source]);
    let FileOutcome::Skipped { warning, .. } = &second[0] else {
        panic!("expected a skip, got {:?}", second[0]);
    };
    assert_eq!(warning.code, DiagnosticCode::OverwriteSkip);
    assert_eq!(fs::read_to_string(&target).unwrap(), written);
}

#[test]
fn test_directory_run_writes_every_stub() {
    let (_dir, pkg) = package();
    let outcomes = Driver::new(DriverOptions::default()).run(&[pkg.clone()]);

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(|o| matches!(o, FileOutcome::Written { .. })));
    assert_eq!(
        fs::read_to_string(pkg.join("__init__.pyi")).unwrap(),
        "from .core import Engine as Engine\n"
    );
    assert_eq!(
        fs::read_to_string(pkg.join("core.pyi")).unwrap(),
        "class Engine:\n    def start(self) -> None: ...\n"
    );
    assert_eq!(
        fs::read_to_string(pkg.join("sub").join("util.pyi")).unwrap(),
        "def helper(x: int) -> int: ...\n"
    );
    assert!(!pkg.join("README.md.pyi").exists());
}

#[test]
fn test_overwrite_run_refreshes_stubs() {
    let (_dir, pkg) = package();
    Driver::new(DriverOptions::default()).run(&[pkg.clone()]);
    fs::write(pkg.join("core.py"), "VERSION = '1'\n").unwrap();

    let options = DriverOptions {
        overwrite: true,
        ..DriverOptions::default()
    };
    let outcomes = Driver::new(options).run(&[pkg.clone()]);
    assert!(outcomes.iter().all(|o| !o.is_failure()));
    assert_eq!(fs::read_to_string(pkg.join("core.pyi")).unwrap(), "VERSION: str\n");
}
