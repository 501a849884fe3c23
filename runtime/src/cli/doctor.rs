//! Environment readiness check.

use crate::config::resolve_output_dir;
use crate::renderer::chromium::{find_chromium, CHROMIUM_PATH_ENV};
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Serialize)]
struct DoctorReport {
    os: &'static str,
    arch: &'static str,
    chromium: Option<PathBuf>,
    output_dir: PathBuf,
    output_dir_writable: bool,
    ready: bool,
}

/// Check Chromium availability and that the report directory is usable.
pub async fn run(output_dir: Option<&str>, json: bool) -> Result<()> {
    let chromium = find_chromium();
    let output_dir = resolve_output_dir(output_dir);
    let output_dir_writable = std::fs::create_dir_all(&output_dir).is_ok()
        && can_write(&output_dir);

    let report = DoctorReport {
        os: std::env::consts::OS,
        arch: std::env::consts::ARCH,
        ready: output_dir_writable,
        chromium,
        output_dir,
        output_dir_writable,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("ionian-wx doctor");
    println!("================");
    println!();
    println!("OS:   {}", report.os);
    println!("Arch: {}", report.arch);
    println!();

    match &report.chromium {
        Some(path) => println!("[OK] Chromium found: {}", path.display()),
        None => println!(
            "[!!] Chromium NOT found. Install Chrome/Chromium or set {CHROMIUM_PATH_ENV}; \
             penteli and weathercloud will report errors."
        ),
    }

    if report.output_dir_writable {
        println!("[OK] Output directory {} is writable", report.output_dir.display());
    } else {
        println!("[!!] Output directory {} is not writable", report.output_dir.display());
    }

    println!();
    if report.ready {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
    }

    Ok(())
}

/// Create and remove a scratch file in `dir`.
fn can_write(dir: &std::path::Path) -> bool {
    let marker = dir.join(".ionian-wx-doctor");
    let ok = std::fs::write(&marker, b"ok").is_ok();
    let _ = std::fs::remove_file(&marker);
    ok
}
