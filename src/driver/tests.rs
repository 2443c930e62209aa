use super::*;
use rstest::rstest;
use tempfile::TempDir;

fn write(dir: &Path, relative: &str, text: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, text).unwrap();
    path
}

fn sources(paths: &[PathBuf]) -> Vec<Source> {
    collect_sources(paths).into_iter().collect::<Result<_, _>>().unwrap()
}

struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[rstest]
#[case("pkg/mod.py", "pkg/mod.pyi")]
#[case("script", "script.pyi")]
#[case("archive.tar", "archive.tar.pyi")]
fn test_stub_path(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(stub_path(Path::new(source)), PathBuf::from(expected));
}

#[rstest]
#[case("src", "src/pkg/sub/mod.py", "pkg.sub.mod")]
#[case("src", "src/pkg/__init__.py", "pkg")]
#[case("", "single.py", "single")]
fn test_module_path(#[case] root: &str, #[case] path: &str, #[case] expected: &str) {
    assert_eq!(module_path(Path::new(root), Path::new(path)), expected);
}

#[test]
fn test_collect_sources_walks_directories_sorted() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pkg/b.py", "");
    write(dir.path(), "pkg/a.py", "");
    write(dir.path(), "pkg/sub/__init__.py", "");
    write(dir.path(), "pkg/notes.txt", "");
    write(dir.path(), "pkg/a.pyi", "");

    let sources = sources(&[dir.path().join("pkg")]);
    let modules: Vec<&str> = sources.iter().map(|s| s.module_path.as_str()).collect();
    assert_eq!(modules, vec!["pkg.a", "pkg.b", "pkg.sub"]);
}

#[test]
fn test_explicit_files_are_taken_as_given() {
    let dir = TempDir::new().unwrap();
    let script = write(dir.path(), "tool", "x = 1\n");
    let sources = sources(std::slice::from_ref(&script));
    assert_eq!(sources.len(), 1);
    assert_eq!(sources[0].path, script);
}

#[test]
fn test_run_writes_stubs() {
    let dir = TempDir::new().unwrap();
    let source = write(dir.path(), "mod.py", "def f(x: int) -> int:\n    return x\n");

    let outcomes = Driver::new(DriverOptions::default()).run(&[source.clone()]);
    assert!(matches!(outcomes[0], FileOutcome::Written { .. }));
    assert_eq!(
        fs::read_to_string(stub_path(&source)).unwrap(),
        "def f(x: int) -> int: ...\n"
    );
}

#[test]
fn test_existing_stub_is_skipped_without_overwrite() {
    let dir = TempDir::new().unwrap();
    let source = write(dir.path(), "mod.py", "x: int\n");
    let target = write(dir.path(), "mod.pyi", "keep me\n");

    let outcomes = Driver::new(DriverOptions::default()).run(&[source]);
    let FileOutcome::Skipped { warning, .. } = &outcomes[0] else {
        panic!("expected skip, got {:?}", outcomes[0]);
    };
    assert_eq!(warning.code, DiagnosticCode::OverwriteSkip);
    assert_eq!(fs::read_to_string(target).unwrap(), "keep me\n");
}

#[test]
fn test_overwrite_replaces_existing_stub() {
    let dir = TempDir::new().unwrap();
    let source = write(dir.path(), "mod.py", "x: int\n");
    let target = write(dir.path(), "mod.pyi", "stale\n");

    let options = DriverOptions {
        overwrite: true,
        ..DriverOptions::default()
    };
    Driver::new(options).run(&[source]);
    assert_eq!(fs::read_to_string(target).unwrap(), "x: int\n");
}

#[test]
fn test_failed_unit_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let broken = write(dir.path(), "broken.py", "def f(:\n");
    let fine = write(dir.path(), "fine.py", "y = 1\n");

    let outcomes = Driver::new(DriverOptions::default()).run(&[broken.clone(), fine.clone()]);
    assert!(outcomes[0].is_failure());
    assert_eq!(outcomes[0].source(), broken.as_path());
    assert!(!stub_path(&broken).exists());
    assert!(stub_path(&fine).exists());
}

#[test]
fn test_missing_input_fails_that_file() {
    let dir = TempDir::new().unwrap();
    let outcomes = Driver::new(DriverOptions::default())
        .run(&[dir.path().join("absent.py")]);
    assert!(matches!(&outcomes[0], FileOutcome::Failed { error: DriverError::Io { .. }, .. }));
}

#[test]
fn test_failed_write_removes_partial_stub() {
    let dir = TempDir::new().unwrap();
    let target = write(dir.path(), "mod.pyi", "partial");
    let error = write_or_remove(FailingWriter, &target, "x: int\n").unwrap_err();
    assert_eq!(error.to_string(), "disk full");
    assert!(!target.exists());
}

#[test]
fn test_successful_write_keeps_stub() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("mod.pyi");
    let file = fs::File::create(&target).unwrap();
    write_or_remove(file, &target, "x: int\n").unwrap();
    assert_eq!(fs::read_to_string(target).unwrap(), "x: int\n");
}

#[cfg(unix)]
#[test]
fn test_unwalkable_directory_fails_only_its_entry() {
    use std::os::unix::fs::PermissionsExt;

    let dir = TempDir::new().unwrap();
    let pkg = dir.path().join("pkg");
    write(dir.path(), "pkg/a.py", "A = 1\n");
    write(dir.path(), "pkg/locked/b.py", "B = 2\n");
    write(dir.path(), "pkg/z.py", "Z = 3\n");
    let locked = pkg.join("locked");
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
    // Privileged users read through the permission bits.
    let readable = fs::read_dir(&locked).is_ok();

    let outcomes = Driver::new(DriverOptions::default()).run(&[pkg.clone()]);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    if readable {
        return;
    }

    assert_eq!(outcomes.len(), 3);
    assert!(matches!(outcomes[0], FileOutcome::Written { .. }));
    let FileOutcome::Failed { source, error } = &outcomes[1] else {
        panic!("expected a failed entry, got {:?}", outcomes[1]);
    };
    assert_eq!(source, &locked);
    assert!(matches!(error, DriverError::Io { .. }));
    assert!(matches!(outcomes[2], FileOutcome::Written { .. }));
    assert!(pkg.join("z.pyi").exists());
}
