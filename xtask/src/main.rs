use std::{
    env, fs,
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};

/// Build and development tasks for the plugin crate.
///
/// Thin sequencing of cargo invocations; exits non-zero if the build or any
/// test fails.
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build and development tasks")]
struct Cli {
    /// Remove the output directory before building
    #[arg(long)]
    clean: bool,

    /// Run the test suite after building
    #[arg(short = 't', long)]
    tests: bool,

    /// Verbose cargo output
    #[arg(short, long)]
    verbose: bool,

    /// Build output directory (relative to the workspace root)
    #[arg(short, long, default_value = "target")]
    output: PathBuf,

    /// Build configuration
    #[arg(short, long, value_enum, default_value = "debug")]
    config: Config,

    /// Build with a sanitizer (requires a nightly toolchain)
    #[arg(long, value_enum)]
    sanitizer: Option<Sanitizer>,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Config {
    Debug,
    Release,
}

#[derive(Copy, Clone, ValueEnum)]
enum Sanitizer {
    Address,
    Thread,
    Leak,
    Memory,
}

impl Sanitizer {
    fn rustflag(self) -> &'static str {
        match self {
            Sanitizer::Address => "-Zsanitizer=address",
            Sanitizer::Thread => "-Zsanitizer=thread",
            Sanitizer::Leak => "-Zsanitizer=leak",
            Sanitizer::Memory => "-Zsanitizer=memory",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = workspace_root();
    let output = root.join(&cli.output);

    if cli.clean && output.exists() {
        fs::remove_dir_all(&output)
            .with_context(|| format!("Failed to remove {}", output.display()))?;
    }

    run_cargo(&cli, &root, &output, "build")?;

    if cli.tests {
        run_cargo(&cli, &root, &output, "test")?;
    }

    Ok(())
}

fn run_cargo(cli: &Cli, root: &Path, output: &Path, subcommand: &str) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg(subcommand)
        .arg("--workspace")
        .arg("--target-dir")
        .arg(output)
        .current_dir(root);

    if cli.config == Config::Release {
        cmd.arg("--release");
    }
    if cli.verbose {
        cmd.arg("--verbose");
    }
    if let Some(sanitizer) = cli.sanitizer {
        let mut rustflags = env::var("RUSTFLAGS").unwrap_or_default();
        if !rustflags.is_empty() {
            rustflags.push(' ');
        }
        rustflags.push_str(sanitizer.rustflag());
        cmd.env("RUSTFLAGS", rustflags);
    }

    let status = cmd
        .status()
        .with_context(|| format!("Failed to run cargo {subcommand}"))?;
    if !status.success() {
        bail!("cargo {subcommand} failed with {status}");
    }
    Ok(())
}

fn workspace_root() -> PathBuf {
    // xtask lives one level below the workspace root.
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .expect("xtask has a parent directory")
        .to_path_buf()
}
