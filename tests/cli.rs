use std::path::Path;
use std::process::{Command, Output};
use std::time::{Duration, Instant};

use tempfile::tempdir;

fn sbench() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sbench"));
    cmd.env_remove("SBENCH_LOG").env_remove("RUST_LOG");
    cmd
}

fn run(args: &[&str]) -> Output {
    sbench().args(args).output().expect("spawn sbench")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("utf-8 temp path")
}

#[test]
fn test_no_arguments_prints_banner() {
    let out = run(&[]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("Simple SSD Benchmark"), "{}", stderr);
    assert!(stderr.contains("Usage:"));
    assert!(out.stdout.is_empty());
}

#[test]
fn test_bad_size_is_usage_error_without_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.dat");

    let out = run(&[path_arg(&path), "abc"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Failed to parse SIZE_MB"), "{}", stderr);
    assert!(!stderr.contains("Simple SSD Benchmark"));
    assert!(!path.exists());
}

#[test]
fn test_size_smaller_than_buffer_exits_with_config_code() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.dat");

    let out = run(&["--buffer-kib", "4096", path_arg(&path), "1"]);

    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("Invalid output size"));
    assert!(!path.exists());
}

#[test]
fn test_cache_drop_failure_exit_code() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.dat");

    let out = run(&["-q", "--no-sync", "--cache-drop-command", "false", path_arg(&path), "1"]);

    assert_eq!(out.status.code(), Some(4));
    assert!(!path.exists());
}

#[cfg(any(target_os = "macos", target_os = "linux"))]
#[test]
fn test_successful_run_prints_json_report() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.dat");

    let out = run(&[
        "--json",
        "--no-sync",
        "--cache-drop-command",
        "true",
        path_arg(&path),
        "2",
    ]);

    assert_eq!(
        out.status.code(),
        Some(0),
        "{}",
        String::from_utf8_lossy(&out.stderr)
    );
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["size_mb"], 2);
    assert_eq!(report["write"]["metrics"]["bytes"], 2 * 1024 * 1024);
    assert_eq!(report["read"]["metrics"]["bytes"], 2 * 1024 * 1024);
    assert!(String::from_utf8_lossy(&out.stderr).contains("(Removed"));
    assert!(!path.exists());
}

#[cfg(any(target_os = "macos", target_os = "linux"))]
#[test]
fn test_human_report_on_stdout() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.dat");

    let out = run(&["--skip-cache-drop", "--no-sync", path_arg(&path), "1"]);

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Writing 1 MB to"), "{}", stdout);
    assert!(stdout.contains("MB/sec"));
    assert!(stdout.contains("Read cache: skipped"));
    assert!(String::from_utf8_lossy(&out.stderr).contains("WARN"));
}

#[cfg(unix)]
#[test]
fn test_sigterm_exits_99_and_removes_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.dat");

    // The cache-drop command keeps the run busy long enough to be signalled
    let mut child = sbench()
        .args(["--no-sync", "--cache-drop-command", "sleep 3", path_arg(&path), "1"])
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while !path.exists() {
        assert!(Instant::now() < deadline, "benchmark file never appeared");
        std::thread::sleep(Duration::from_millis(10));
    }
    std::thread::sleep(Duration::from_millis(300));

    // SAFETY: plain kill(2) on our own child's pid
    let res = unsafe { libc::kill(child.id() as libc::pid_t, libc::SIGTERM) };
    assert_eq!(res, 0);

    let out = child.wait_with_output().unwrap();
    assert_eq!(out.status.code(), Some(99));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Caught signal"), "{}", stderr);
    assert!(!path.exists());
}

#[cfg(unix)]
#[test]
fn test_group_sigint_during_cache_drop_exits_99() {
    use std::os::unix::process::CommandExt;

    let dir = tempdir().unwrap();
    let path = dir.path().join("out.dat");

    // Own process group, so the signal reaches sbench and the cache-drop child together
    let mut child = sbench()
        .args(["--no-sync", "--cache-drop-command", "sleep 3", path_arg(&path), "1"])
        .process_group(0)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::piped())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    while !path.exists() {
        assert!(Instant::now() < deadline, "benchmark file never appeared");
        std::thread::sleep(Duration::from_millis(10));
    }
    std::thread::sleep(Duration::from_millis(300));

    // SAFETY: kill(2) on the process group we just created
    let res = unsafe { libc::kill(-(child.id() as libc::pid_t), libc::SIGINT) };
    assert_eq!(res, 0);

    let out = child.wait_with_output().unwrap();
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert_eq!(out.status.code(), Some(99), "{}", stderr);
    assert!(!stderr.contains("Cache drop failed"), "{}", stderr);
    assert!(!path.exists());
}
