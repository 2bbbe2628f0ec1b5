use std::fs;
use std::path::Path;
use std::process::Command;

/// Runs every `.vm`/`.expected.asm` pair found directly under a
/// `tests/test_data/<name>/` directory through the `translate` binary and
/// compares byte-for-byte output.
#[test]
fn test_all_vm_fixtures() {
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
    let vm_files: Vec<_> = fs::read_dir(dir)
        .expect("cannot read fixture directory")
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "vm"))
        .collect();

    for vm_file in vm_files {
        let expected_file = vm_file.with_extension("expected.asm");
        if !expected_file.exists() {
            continue;
        }

        let temp_output = vm_file.with_extension("temp.asm");
        let status = Command::new("cargo")
            .arg("run")
            .arg("--quiet")
            .arg("--bin")
            .arg("translate")
            .arg("--")
            .arg("--input")
            .arg(&vm_file)
            .arg("--output")
            .arg(&temp_output)
            .status()
            .expect("failed to execute translator");

        assert!(status.success(), "translator failed for {}", vm_file.display());

        let actual = fs::read_to_string(&temp_output).unwrap();
        let expected = fs::read_to_string(&expected_file).unwrap();
        assert_eq!(
            actual, expected,
            "output mismatch for {}",
            vm_file.display()
        );

        fs::remove_file(&temp_output).ok();
    }
}
