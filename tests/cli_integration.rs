//! End-to-end tests for the `zxc` binary: spawn the built executable and
//! drive it through stdin/stdout and file arguments.

use std::io::Write;
use std::process::{Command, Stdio};

fn zxc_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_zxc"))
}

#[test]
fn compress_then_decompress_via_stdin_stdout_roundtrips() {
    let data = b"roundtrip through the cli, start to finish\n".repeat(200);

    let mut compress = zxc_bin()
        .args(["-z", "-C"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    compress
        .stdin
        .take()
        .unwrap()
        .write_all(&data)
        .unwrap();
    let compressed = compress.wait_with_output().unwrap();
    assert!(compressed.status.success());
    assert_eq!(&compressed.stdout[0..3], b"ZXC");

    let mut decompress = zxc_bin()
        .args(["-d", "-C"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    decompress
        .stdin
        .take()
        .unwrap()
        .write_all(&compressed.stdout)
        .unwrap();
    let decompressed = decompress.wait_with_output().unwrap();
    assert!(decompressed.status.success());
    assert_eq!(decompressed.stdout, data);
}

#[test]
fn compress_via_file_arguments_roundtrips() {
    let dir = tempfile::tempdir().unwrap();
    let input_path = dir.path().join("input.txt");
    let archive_path = dir.path().join("input.zxc");
    let output_path = dir.path().join("output.txt");

    let data = b"file-argument roundtrip data\n".repeat(500);
    std::fs::write(&input_path, &data).unwrap();

    let status = zxc_bin()
        .args(["-z", "-3", "-C"])
        .arg(&input_path)
        .arg(&archive_path)
        .status()
        .unwrap();
    assert!(status.success());

    let status = zxc_bin()
        .args(["-d", "-C"])
        .arg(&archive_path)
        .arg(&output_path)
        .status()
        .unwrap();
    assert!(status.success());

    let roundtripped = std::fs::read(&output_path).unwrap();
    assert_eq!(roundtripped, data);
}

#[test]
fn malformed_archive_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let bogus_path = dir.path().join("bogus.zxc");
    std::fs::write(&bogus_path, b"not a zxc stream at all").unwrap();

    let status = zxc_bin()
        .args(["-d"])
        .arg(&bogus_path)
        .status()
        .unwrap();
    assert!(!status.success());
}

#[test]
fn version_flag_exits_zero() {
    let status = zxc_bin().arg("--version").status().unwrap();
    assert!(status.success());
}

#[test]
fn help_flag_exits_zero() {
    let status = zxc_bin().arg("--help").status().unwrap();
    assert!(status.success());
}
