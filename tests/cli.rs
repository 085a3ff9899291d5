//! Tests that drive the `md2pdf` binary.
#![cfg(feature = "cli")]

use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

const RESUME: &str = "# Jane Doe\n**Engineer**\njane@example.com\n\
    ## EXPERIENCE\n### Acme\n**Staff Engineer** | March 2020 - Present\n- Shipped things\n";

fn md2pdf(args: &[&Path], stdin: &str) -> Output {
    md2pdf_in(None, args, stdin)
}

fn md2pdf_in(cwd: Option<&Path>, args: &[&Path], stdin: &str) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_md2pdf"));
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    let mut child = cmd
        .args(args)
        .env_remove("RUST_LOG")
        .env("MD2PDF_TODAY", "2022-01-15")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

#[test]
fn converts_beside_the_input() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("jane.md");
    fs::write(&input, RESUME).unwrap();

    let out = md2pdf(&[input.as_path()], "");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(fs::read(dir.path().join("jane.pdf"))
        .unwrap()
        .starts_with(b"%PDF-"));
}

#[test]
fn declined_overwrite_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("jane.md");
    let output = dir.path().join("jane.pdf");
    fs::write(&input, RESUME).unwrap();
    fs::write(&output, b"previous").unwrap();

    let out = md2pdf(&[input.as_path(), output.as_path()], "n\n");
    assert_eq!(out.status.code(), Some(1));
    assert_eq!(fs::read(&output).unwrap(), b"previous");
}

#[test]
fn accepted_overwrite_replaces_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("jane.md");
    let output = dir.path().join("jane.pdf");
    fs::write(&input, RESUME).unwrap();
    fs::write(&output, b"previous").unwrap();

    let out = md2pdf(&[input.as_path(), output.as_path()], "y\n");
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(fs::read(&output).unwrap().starts_with(b"%PDF-"));
}

#[test]
fn missing_name_exits_non_zero_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nameless.md");
    fs::write(&input, "## SUMMARY\nNo heading.\n").unwrap();

    let out = md2pdf(&[input.as_path()], "");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("# Name"));
    assert!(!dir.path().join("nameless.pdf").exists());
}

#[test]
fn missing_input_lists_suggestions() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("resume.md"), RESUME).unwrap();

    let out = md2pdf(&[dir.path().join("resme.md").as_path()], "");
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Did you mean"), "{stderr}");
    assert!(stderr.contains("resume.md"), "{stderr}");
}

#[test]
fn non_markdown_input_needs_confirmation() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("jane.txt");
    fs::write(&input, RESUME).unwrap();

    let out = md2pdf(&[input.as_path()], "\n");
    assert_eq!(out.status.code(), Some(1));
    assert!(!dir.path().join("jane.pdf").exists());
}

#[test]
fn inspect_prints_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("jane.md");
    fs::write(&input, RESUME).unwrap();

    let out = md2pdf(&[input.as_path(), Path::new("--inspect")], "");
    assert!(out.status.success());
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["name"], "Jane Doe");
    assert!(!dir.path().join("jane.pdf").exists());
}

#[test]
fn help_shows_style_file_example() {
    let out = md2pdf(&[Path::new("--help")], "");
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("primary_color = \"#1a5e3a\""), "{stdout}");
    assert!(stdout.contains("MD2PDF_TODAY"), "{stdout}");
}

#[test]
fn input_found_in_inputs_dir_writes_beside_typed_path() {
    let dir = tempfile::tempdir().unwrap();
    let inbox = dir.path().join("inbox");
    let work = dir.path().join("work");
    fs::create_dir(&inbox).unwrap();
    fs::create_dir(&work).unwrap();
    fs::write(inbox.join("jane.md"), RESUME).unwrap();

    let out = md2pdf_in(
        Some(&work),
        &[Path::new("jane.md"), Path::new("--inputs-dir"), inbox.as_path()],
        "",
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(fs::read(work.join("jane.pdf")).unwrap().starts_with(b"%PDF-"));
    assert!(!inbox.join("jane.pdf").exists());
}

#[test]
fn missing_name_prints_a_hint() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nameless.md");
    fs::write(&input, "## SUMMARY\nNo heading.\n").unwrap();

    let out = md2pdf(&[input.as_path()], "");
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("'# Jane Doe'"));
}
