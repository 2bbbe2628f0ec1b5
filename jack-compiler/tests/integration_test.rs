use std::fs;
use std::path::Path;
use std::process::Command;

/// Compiles every `.jack` fixture with a matching `.expected.vm` sibling
/// through the `compile` binary and compares byte-for-byte output.
#[test]
fn test_all_jack_fixtures() {
    let test_data = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/test_data");

    for entry in fs::read_dir(&test_data).expect("cannot read test_data directory") {
        let dir = entry.expect("cannot read directory entry").path();
        if !dir.is_dir() {
            continue;
        }
        run_fixture(&dir);
    }
}

fn run_fixture(dir: &Path) {
    let jack_files: Vec<_> = fs::read_dir(dir)
        .expect("cannot read fixture directory")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "jack"))
        .collect();

    for jack_file in jack_files {
        let expected_file = jack_file.with_extension("expected.vm");
        if !expected_file.exists() {
            continue;
        }

        let status = Command::new("cargo")
            .arg("run")
            .arg("--quiet")
            .arg("--bin")
            .arg("compile")
            .arg("--")
            .arg("--input")
            .arg(&jack_file)
            .status()
            .expect("failed to execute compiler");

        assert!(status.success(), "compiler failed for {}", jack_file.display());

        let produced_file = jack_file.with_extension("vm");
        let actual = fs::read_to_string(&produced_file).unwrap();
        let expected = fs::read_to_string(&expected_file).unwrap();
        assert_eq!(actual, expected, "output mismatch for {}", jack_file.display());

        fs::remove_file(&produced_file).ok();
    }
}
