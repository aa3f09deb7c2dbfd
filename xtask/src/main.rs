use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use std::process::{Command, Stdio};
use std::time::Instant;

/// Test suites that can be run on their own, as (name, lib test filter)
const SUITES: [(&str, &str); 5] = [
    ("viewport", "video::viewport"),
    ("format", "video::format"),
    ("lifecycle", "video::tests::lifecycle"),
    ("presentation", "video::tests::presentation"),
    ("resources", "video::tests::resources"),
];

#[derive(Parser)]
#[command(name = "x")]
#[command(about = "Development automation for fb-present")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all CI checks (fmt, clippy, headless and gpu builds, headless tests)
    Ci {
        #[arg(long)]
        verbose: bool,
    },
    /// Format code
    Fmt {
        #[arg(long)]
        check: bool,
    },
    /// Run clippy
    Clippy {
        /// Skip the wgpu/winit stack
        #[arg(long)]
        headless: bool,
    },
    /// Build the project
    Build {
        #[arg(long)]
        release: bool,
        /// Library only, without the wgpu/winit stack
        #[arg(long)]
        headless: bool,
    },
    /// Run tests
    Test {
        /// Skip the wgpu/winit stack
        #[arg(long)]
        headless: bool,
        /// Run one suite: viewport, format, lifecycle, presentation or resources
        #[arg(long)]
        suite: Option<String>,
    },
    /// Run benchmarks
    Bench {
        /// Only benchmarks whose name contains this
        filter: Option<String>,
    },
    /// Run the presentation demo window
    Demo {
        /// Log filter passed through RUST_LOG (defaults to fb_present=debug)
        #[arg(long, default_value = "fb_present=debug")]
        log: String,
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Ci { verbose } => run_ci(verbose),
        Commands::Fmt { check } => run_fmt(check),
        Commands::Clippy { headless } => run_clippy(headless),
        Commands::Build { release, headless } => run_build(release, headless),
        Commands::Test { headless, suite } => run_test(headless, suite.as_deref()),
        Commands::Bench { filter } => run_bench(filter.as_deref()),
        Commands::Demo { log, release } => run_demo(&log, release),
    }
}

fn run_ci(verbose: bool) -> Result<()> {
    println!("{}", "=== Running CI Pipeline ===".bold().blue());

    let start = Instant::now();

    // Runners have no display, so tests stay on the software context
    run_task("Format Check", || run_fmt(true), verbose)?;
    run_task("Clippy (headless)", || run_clippy(true), verbose)?;
    run_task("Build (headless)", || run_build(false, true), verbose)?;
    run_task("Build (gpu)", || run_build(false, false), verbose)?;
    run_task("Test (headless)", || run_test(true, None), verbose)?;

    let elapsed = start.elapsed();
    println!(
        "\n{} {}",
        "✓ CI passed in".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

fn run_fmt(check: bool) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.arg("fmt").arg("--all");

    if check {
        cmd.arg("--").arg("--check");
    }

    execute_command(&mut cmd)
}

fn run_clippy(headless: bool) -> Result<()> {
    let mut cmd = cargo("clippy", headless);
    cmd.arg("--all-targets")
        .arg("--")
        .arg("-D")
        .arg("warnings");

    execute_command(&mut cmd)
}

fn run_build(release: bool, headless: bool) -> Result<()> {
    let mut cmd = cargo("build", headless);

    if release {
        cmd.arg("--release");
    }

    execute_command(&mut cmd)
}

fn run_test(headless: bool, suite: Option<&str>) -> Result<()> {
    let Some(name) = suite else {
        return execute_command(&mut cargo("test", headless));
    };

    let Some((_, filter)) = SUITES.iter().find(|(suite, _)| *suite == name) else {
        let known: Vec<&str> = SUITES.iter().map(|(suite, _)| *suite).collect();
        anyhow::bail!("Unknown suite '{}', expected one of: {}", name, known.join(", "));
    };

    println!("{} Running {} tests...", "→".blue(), name.bold());

    let mut cmd = cargo("test", headless);
    cmd.arg("--lib").arg(filter);

    match execute_command(&mut cmd) {
        Ok(_) => {
            println!("{} {} tests passed", "✓".green(), name);
            Ok(())
        }
        Err(e) => {
            println!("{} {} tests failed", "✗".red(), name);
            Err(e)
        }
    }
}

fn run_bench(filter: Option<&str>) -> Result<()> {
    // present_bench drives the software context only
    let mut cmd = cargo("bench", true);
    cmd.arg("--bench").arg("present_bench");

    if let Some(filter) = filter {
        cmd.arg("--").arg(filter);
    }

    execute_command(&mut cmd)
}

fn run_demo(log: &str, release: bool) -> Result<()> {
    println!("{}", "=== Presentation Demo ===".bold().blue());
    println!("{} Log filter: {}", "→".blue(), log.cyan());
    println!(
        "{} Build mode: {}",
        "→".blue(),
        if release {
            "release".green().bold()
        } else {
            "debug".yellow().bold()
        }
    );
    println!();

    let start = Instant::now();

    let mut cmd = cargo("run", false);
    cmd.arg("--bin").arg("fb-present");

    if release {
        cmd.arg("--release");
    }

    cmd.env("RUST_LOG", log);

    if let Err(e) = execute_command(&mut cmd) {
        println!("\n{} Demo exited with an error", "✗".red().bold());
        return Err(e);
    }

    let elapsed = start.elapsed();
    println!(
        "\n{} Demo ran for {}",
        "✓".green().bold(),
        format!("{:.2}s", elapsed.as_secs_f64()).bold()
    );

    Ok(())
}

/// `cargo <subcommand>`, without the `gpu` feature when `headless`
fn cargo(subcommand: &str, headless: bool) -> Command {
    let mut cmd = Command::new("cargo");
    cmd.arg(subcommand);

    if headless {
        cmd.arg("--no-default-features");
    }

    cmd
}

fn run_task<F>(name: &str, task: F, verbose: bool) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    print!("{} {} ... ", "→".blue(), name);

    let start = Instant::now();

    match task() {
        Ok(_) => {
            let elapsed = start.elapsed();
            println!(
                "{} {}",
                "✓".green().bold(),
                if verbose {
                    format!("({:.2}s)", elapsed.as_secs_f64())
                } else {
                    String::new()
                }
            );
            Ok(())
        }
        Err(e) => {
            println!("{}", "✗".red().bold());
            Err(e)
        }
    }
}

fn execute_command(cmd: &mut Command) -> Result<()> {
    let status = cmd
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()?;

    if !status.success() {
        anyhow::bail!("Command failed with exit code: {}", status);
    }

    Ok(())
}
