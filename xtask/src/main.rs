//! Custom cargo commands for the guardstack crate.
//!
//! Usage:
//!   cargo xtask verify          - Run full verification suite
//!   cargo xtask test            - Run all tests
//!   cargo xtask check           - Quick check (check + test + clippy)
//!   cargo xtask fuzz [SECS]     - Run every fuzz target for SECS seconds
//!   cargo xtask kani            - Run Kani proofs
//!   cargo xtask bench           - Run benchmarks

use anyhow::{bail, Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::process::Command;

const FUZZ_TARGETS: &[&str] = &["stack_ops", "tamper_detection"];

/// Constants that must agree between the crate and the extracted proofs.
const SHARED_CONSTANTS: &[&str] = &["SENTINEL_SIZE", "CHECKSUM_SIZE", "POISON_BYTE"];

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let task = args.next();
    match task.as_deref() {
        Some("verify") => verify()?,
        Some("test") => test()?,
        Some("check") => check()?,
        Some("fuzz") => {
            let seconds = match args.next() {
                Some(raw) => raw
                    .parse()
                    .with_context(|| format!("invalid fuzz duration {:?}", raw))?,
                None => 30,
            };
            fuzz(seconds)?
        }
        Some("kani") => kani()?,
        Some("bench") => bench()?,
        _ => print_help(),
    }
    Ok(())
}

fn print_help() {
    eprintln!(
        r#"
cargo xtask <COMMAND>

Commands:
  verify        Run full verification suite (tests + clippy + proofs + constant alignment)
  test          Run all Rust tests
  check         Quick check (cargo check + test + clippy)
  fuzz [SECS]   Run each fuzz target for SECS seconds (default 30, needs nightly)
  kani          Run Kani proofs (needs cargo-kani)
  bench         Run benchmarks
"#
    );
}

/// Full verification suite
fn verify() -> Result<()> {
    println!("==========================================");
    println!("guardstack Verification Suite");
    println!("==========================================\n");

    println!("[1/4] Running Rust tests...");
    run_cargo(&["test", "--quiet"])?;
    println!("✓ All Rust tests passed\n");

    println!("[2/4] Running clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;
    println!("✓ Clippy passed\n");

    println!("[3/4] Testing extracted proof crate...");
    run_cargo_in(&project_root()?.join("kani-proofs"), &["test", "--quiet"])?;
    println!("✓ Proof crate tests passed\n");

    println!("[4/4] Verifying crate/proof constant alignment...");
    verify_constants()?;
    println!("✓ Constants aligned\n");

    println!("==========================================");
    println!("✓ ALL VERIFICATION CHECKS PASSED");
    println!("==========================================");

    Ok(())
}

/// Run all tests
fn test() -> Result<()> {
    run_cargo(&["test"])
}

/// Quick check
fn check() -> Result<()> {
    println!("Running quick checks...\n");

    println!("[1/3] cargo check...");
    run_cargo(&["check", "--all-targets"])?;

    println!("[2/3] cargo test...");
    run_cargo(&["test", "--quiet"])?;

    println!("[3/3] cargo clippy...");
    run_cargo(&["clippy", "--quiet", "--", "-D", "warnings"])?;

    println!("\n✓ Quick checks passed");
    Ok(())
}

/// Run every fuzz target for a bounded time
fn fuzz(seconds: u64) -> Result<()> {
    let fuzz_dir = project_root()?.join("fuzz");
    let budget = format!("-max_total_time={}", seconds);

    for target in FUZZ_TARGETS {
        println!("fuzzing {} for {}s...", target, seconds);
        run_cargo_in(
            &fuzz_dir,
            &["+nightly", "fuzz", "run", target, "--", &budget],
        )?;
    }

    println!("\n✓ No fuzz failures");
    Ok(())
}

/// Run Kani proofs
fn kani() -> Result<()> {
    run_cargo_in(&project_root()?.join("kani-proofs"), &["kani"])
}

/// Run benchmarks
fn bench() -> Result<()> {
    run_cargo(&["bench"])
}

// ============================================================================
// Helper functions
// ============================================================================

fn project_root() -> Result<PathBuf> {
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => env::current_dir().context("Failed to read current directory")?,
    };

    // xtask is in project_root/xtask, so go up one level
    let root = manifest_dir.parent().unwrap_or(&manifest_dir);
    Ok(root.to_path_buf())
}

fn run_cargo(args: &[&str]) -> Result<()> {
    run_cargo_in(&project_root()?, args)
}

fn run_cargo_in(dir: &Path, args: &[&str]) -> Result<()> {
    let status = Command::new("cargo")
        .args(args)
        .current_dir(dir)
        .status()
        .with_context(|| format!("Failed to run cargo {:?}", args))?;

    if !status.success() {
        bail!("cargo {:?} failed in {}", args, dir.display());
    }

    Ok(())
}

fn verify_constants() -> Result<()> {
    let root = project_root()?;

    let layout_rs = std::fs::read_to_string(root.join("src/layout.rs"))
        .context("Failed to read src/layout.rs")?;
    let proofs_path = root.join("kani-proofs/src/lib.rs");
    if !proofs_path.exists() {
        println!("  (no kani-proofs crate, skipping constant check)");
        return Ok(());
    }
    let proofs_rs = std::fs::read_to_string(&proofs_path)
        .context("Failed to read kani-proofs/src/lib.rs")?;

    for name in SHARED_CONSTANTS {
        let crate_value = extract_const(&layout_rs, name)
            .with_context(|| format!("{} not found in src/layout.rs", name))?;
        let proof_value = extract_const(&proofs_rs, name)
            .with_context(|| format!("{} not found in kani-proofs", name))?;

        if crate_value != proof_value {
            bail!(
                "{} differs: crate `{}` vs proofs `{}`",
                name,
                crate_value,
                proof_value
            );
        }
    }

    Ok(())
}

/// Right-hand side of `pub const NAME: Ty = value;`, whitespace-trimmed.
fn extract_const(content: &str, name: &str) -> Option<String> {
    let prefix = format!("pub const {}:", name);
    content
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(&prefix))
        .and_then(|line| line.split('=').nth(1))
        .map(|value| value.trim().trim_end_matches(';').trim().to_string())
}
