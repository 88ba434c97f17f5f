//! Integration tests for the `calgen-ctl` binary.
//!
//! Builds a small SDK tree in a temp directory and runs the compiled binary
//! against it.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const BANNER: &str = "---------------------CALGEN COMPLETED---------------------";

const SCHEMA: &str = "\
brief: Test calibration page
parameters:
  - name: UserBoardId
    address: 0x0
    length: 2
    fields:
      - {name: UserBoardId, pos: 0, bits: 16}
  - name: UpperBandRfFilter
    address: 0x4
    length: 4
    fields:
      - {name: LowFreqLimit, pos: 0, bits: float}
  - name: LowerBandRfFilter
    address: 0x8
    length: 4
    fields:
      - {name: LowFreqLimit, pos: 0, bits: float}
";

const HEADER_PATH: &str = "ex10_c_dev_kit/board/e710_ref_design/calibration_v5.h";
const SOURCE_PATH: &str = "ex10_c_dev_kit/board/e710_ref_design/calibration_v5.c";
const PRINTER_PATH: &str = "ex10_c_dev_kit/examples/print_calibration_v5.c";
const SHIM_PATH: &str = "ex10_dev_kit/py2c_interface/py2c_python_cal.py";

fn calgen_ctl_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_calgen-ctl"))
}

/// Run calgen-ctl from `work_dir` with an isolated HOME.
fn run_calgen_ctl(work_dir: &Path, args: &[&str]) -> Output {
    Command::new(calgen_ctl_bin())
        .args(args)
        .current_dir(work_dir)
        .env("HOME", work_dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute calgen-ctl")
}

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn create_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    write(root, "ex10_cal/cal_yaml/cal_info_page_v5.yml", SCHEMA);
    write(
        root,
        HEADER_PATH,
        "#pragma once\n// Impinj_calgen | gen_calibration_v5_h {\n// Impinj_calgen }\n",
    );
    write(
        root,
        SOURCE_PATH,
        "// Impinj_calgen | gen_calibration_v5_c {\n// Impinj_calgen }\n",
    );
    write(
        root,
        PRINTER_PATH,
        "// Impinj_calgen | gen_cal_v5_c_example {\n// Impinj_calgen }\n",
    );
    write(root, SHIM_PATH, "from ctypes import *\n");
    dir
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_worklist_run_prints_progress_and_banner() {
    let project = create_project();
    let root = project.path();

    let output = run_calgen_ctl(root, &["--root", root.to_str().unwrap()]);
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let lines = stdout_lines(&output);
    assert_eq!(
        lines,
        vec![
            format!("Autogenerating {}", root.join(HEADER_PATH).display()),
            format!("Autogenerating {}", root.join(SOURCE_PATH).display()),
            format!("Autogenerating {}", root.join(PRINTER_PATH).display()),
            format!("Ignoring {}", root.join(SHIM_PATH).display()),
            BANNER.to_string(),
        ]
    );

    let header = fs::read_to_string(root.join(HEADER_PATH)).unwrap();
    assert!(header.contains("struct PerBandRfFilterV5 {\n    float low_freq_limit;\n};"));
    assert_eq!(
        fs::read_to_string(root.join(SHIM_PATH)).unwrap(),
        "from ctypes import *\n"
    );
}

#[test]
fn test_defaults_to_current_directory() {
    let project = create_project();
    let output = run_calgen_ctl(project.path(), &[]);
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).last().map(String::as_str), Some(BANNER));
}

#[test]
fn test_missing_worklist_file_is_a_warning() {
    let project = create_project();
    let root = project.path();
    fs::remove_file(root.join(PRINTER_PATH)).unwrap();

    let output = run_calgen_ctl(root, &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No such file or directory"));
    assert!(stdout.contains(BANNER));
}

#[test]
fn test_invalid_block_fails_with_location() {
    let project = create_project();
    let root = project.path();
    let body = "// Impinj_calgen | gen_calibration_v5_c | extra {\n// Impinj_calgen }\n";
    write(root, SOURCE_PATH, body);

    let output = run_calgen_ctl(root, &[]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("calibration_v5.c:0"), "stderr: {stderr}");
    assert!(!String::from_utf8_lossy(&output.stdout).contains(BANNER));
    assert_eq!(fs::read_to_string(root.join(SOURCE_PATH)).unwrap(), body);
}

#[test]
fn test_overlapping_schema_fails() {
    let project = create_project();
    let root = project.path();
    write(
        root,
        "ex10_cal/cal_yaml/cal_info_page_v5.yml",
        "brief: x\nparameters:\n  - {name: A, address: 0, length: 4}\n  - {name: B, address: 3, length: 1}\n",
    );

    let output = run_calgen_ctl(root, &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("overlap found"));
}

#[test]
fn test_single_file_subcommand() {
    let project = create_project();
    let root = project.path();

    let target = root.join(PRINTER_PATH);
    let output = run_calgen_ctl(
        root,
        &["--root", root.to_str().unwrap(), "file", target.to_str().unwrap()],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(&format!("Autogenerating {}", target.display())));
    assert!(!stdout.contains(BANNER));

    let printer = fs::read_to_string(root.join(PRINTER_PATH)).unwrap();
    assert!(printer.contains("ex10_ex_printf(\"PerBandRfFilter:\\n\");"));
    // Other worklist files are untouched.
    assert_eq!(
        fs::read_to_string(root.join(SOURCE_PATH)).unwrap(),
        "// Impinj_calgen | gen_calibration_v5_c {\n// Impinj_calgen }\n"
    );
}

#[test]
fn test_config_file_overrides_worklist_and_sentinel() {
    let project = create_project();
    let root = project.path();
    write(
        root,
        ".calgen.toml",
        "sentinel = \"Acme_calgen\"\nworklist = [\"gen/cal.py\"]\n",
    );
    write(
        root,
        "gen/cal.py",
        "# Acme_calgen | gen_calibration_v5_shim {\n# Acme_calgen }\n",
    );

    let output = run_calgen_ctl(root, &["--root", root.to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        stdout_lines(&output),
        vec![
            format!("Autogenerating {}", root.join("gen/cal.py").display()),
            BANNER.to_string(),
        ]
    );
    let shim = fs::read_to_string(root.join("gen/cal.py")).unwrap();
    assert!(shim.contains("        ('upper_band_rf_filter', PerBandRfFilterV5),\n"));
}

#[test]
fn test_dump_schema_lists_entries_in_address_order() {
    let project = create_project();
    let root = project.path();

    let output = run_calgen_ctl(root, &["dump-schema"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Test calibration page"));
    assert!(stdout.contains("Entries: 3"));
    assert!(stdout.contains("Total length: 0x000C"));
    let user = stdout.find("UserBoardId: [0x0000:0x0001]").unwrap();
    let upper = stdout.find("UpperBandRfFilter: [0x0004:0x0007]").unwrap();
    let lower = stdout.find("LowerBandRfFilter: [0x0008:0x000B]").unwrap();
    assert!(user < upper && upper < lower);
}
