//! CLI smoke tests for cvbuild.
//!
//! Only commands that never touch the network or a toolchain are exercised
//! here; the pipeline itself is covered by cvbuild-core's tests.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn cvbuild_cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("cvbuild");
    cmd.env_remove("CVB_ROOT")
        .env_remove("CVB_OPENCV_URL")
        .env_remove("CVB_OPENCV_SHA256")
        .env_remove("CVB_JOBS")
        .env_remove("CVB_LOG");
    cmd
}

#[test]
fn help_flag_works() {
    cvbuild_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn subcommand_help_works() {
    for cmd in &["build", "flags", "paths"] {
        cvbuild_cmd()
            .arg(cmd)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage"));
    }
}

#[test]
fn flags_lists_universal_configure_arguments() {
    cvbuild_cmd()
        .args(["flags", "--prefix", "/opt/cv"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("-G\nUnix Makefiles\n"))
        .stdout(predicate::str::contains("-DCMAKE_INSTALL_PREFIX=/opt/cv\n"))
        .stdout(predicate::str::contains("-DWITH_LAPACK=OFF\n"))
        .stdout(predicate::str::ends_with("..\n"));
}

#[test]
fn neon_features_json_is_all_off() {
    let output = cvbuild_cmd()
        .args(["flags", "--preset", "neon-dotprod", "--features-only", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let flags: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(flags.len(), 87);
    assert!(flags.iter().all(|f| f.starts_with("-D") && f.ends_with("=OFF")));
    assert!(!flags.contains(&"-DWITH_IPP=OFF".to_string()));
}

#[test]
fn paths_honours_root_override() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().to_string_lossy().to_string();
    cvbuild_cmd()
        .args(["paths", "--preset", "neon-dotprod", "--root", &root])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "{root}/3rdparty/binary/opencv-macos"
        )))
        .stdout(predicate::str::contains(format!(
            "{root}/3rdparty/opencv-4.11.0/.build"
        )));
}

#[test]
fn bad_url_is_a_configuration_error() {
    cvbuild_cmd()
        .args(["paths", "--url", "https://example.com/not-an-archive"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration Error"));
}

#[test]
fn missing_source_tree_fails_without_running_tools() {
    let temp = TempDir::new().unwrap();
    cvbuild_cmd()
        .current_dir(temp.path())
        .args(["build", "--preset", "neon-dotprod", "--dry-run"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Source tree missing"));
    assert!(!temp.path().join("3rdparty/opencv-4.11.0/.build").exists());
}

#[test]
fn dry_run_logs_commands_and_keeps_existing_install() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("3rdparty/opencv-4.11.0");
    std::fs::create_dir_all(&source).unwrap();
    std::fs::write(source.join("CMakeLists.txt"), "project(OpenCV)").unwrap();
    let installed = temp
        .path()
        .join("3rdparty/binary/opencv-macos/lib/libopencv_core.a");
    std::fs::create_dir_all(installed.parent().unwrap()).unwrap();
    std::fs::write(&installed, "!<arch>\n").unwrap();

    cvbuild_cmd()
        .current_dir(temp.path())
        .args(["build", "--preset", "neon-dotprod", "--dry-run", "-j", "2"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[dry-run]"))
        .stderr(predicate::str::contains("make -j2"))
        .stderr(predicate::str::contains("-DCPU_BASELINE=NEON_DOTPROD"));

    assert!(installed.is_file());
    assert!(source.join("CMakeLists.txt").is_file());
    assert!(!source.join(".build").exists());
}

#[test]
fn universal_dry_run_never_downloads_or_removes_third_party() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("3rdparty/opencv-4.11.0");
    std::fs::create_dir_all(&source).unwrap();
    std::fs::write(source.join("CMakeLists.txt"), "project(OpenCV)").unwrap();

    cvbuild_cmd()
        .current_dir(temp.path())
        .args(["build", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("[dry-run] Would fetch"));

    assert!(source.join("CMakeLists.txt").is_file());
    assert!(!temp.path().join("opencv-4.11.0.tar.gz").exists());
    assert!(!temp.path().join("binary").exists());
}
