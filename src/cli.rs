// src/cli.rs
use anyhow::Result;
use clap::{Arg, ArgAction, ArgGroup, Command};
use std::path::PathBuf;
use std::str::FromStr;

use crate::commands;
use crate::core::models::Scope;
use crate::infra::fs::expand_path;

fn build_cli() -> Command {
    Command::new("matrix-forge")
        .author(env!("CARGO_PKG_AUTHORS"))
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generate CI test matrices, run matrix entries, and aggregate result artifacts.")
        .subcommand(
            Command::new("generate")
                .about("Discover the test-suite layout and write the execution matrix as JSON")
                .arg(
                    Arg::new("scope")
                        .short('s')
                        .long("scope")
                        .help("Filter: all, python, api, ui, unit, component, integration, e2e, performance")
                        .value_name("SCOPE")
                        .default_value("all")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Path of the matrix JSON file consumed by the CI orchestrator")
                        .value_name("OUTPUT")
                        .default_value("test-matrix.json")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("base-path")
                        .long("base-path")
                        .help("Root directory of the test suite to scan")
                        .value_name("DIR")
                        .default_value("tests")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a MatrixForge.toml overriding the stock expansion sets")
                        .value_name("CONFIG")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("lenient")
                        .long("lenient")
                        .help("Produce an empty matrix instead of failing when the base path is missing")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("verbose")
                        .short('v')
                        .long("verbose")
                        .help("List every generated matrix entry")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("run")
                .about("Execute one matrix entry (CI mode) or the whole matrix in-process")
                .arg(
                    Arg::new("matrix")
                        .short('m')
                        .long("matrix")
                        .help("Matrix JSON file produced by `generate`")
                        .value_name("MATRIX")
                        .default_value("test-matrix.json")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("index")
                        .short('i')
                        .long("index")
                        .help("Zero-based matrix entry to run, as passed by the CI matrix job")
                        .value_name("INDEX")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("all")
                        .long("all")
                        .help("Run every matrix entry with an in-process worker pool")
                        .action(ArgAction::SetTrue)
                        .conflicts_with("index"),
                )
                .group(
                    ArgGroup::new("selection")
                        .args(["index", "all"])
                        .required(true),
                )
                .arg(
                    Arg::new("jobs")
                        .short('j')
                        .long("jobs")
                        .help("Parallel jobs for --all (default: half the CPUs plus one)")
                        .value_name("JOBS")
                        .value_parser(clap::value_parser!(usize))
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("artifacts-dir")
                        .long("artifacts-dir")
                        .help("Directory the per-run JSON artifacts are written to")
                        .value_name("DIR")
                        .default_value("test-artifacts")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("simulate")
                        .long("simulate")
                        .help("Report deterministic counts without spawning the test framework")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .help("Path to a MatrixForge.toml providing a runner command override")
                        .value_name("CONFIG")
                        .action(ArgAction::Set),
                ),
        )
        .subcommand(
            Command::new("aggregate")
                .about("Merge JSON/JUnit artifacts from parallel jobs into one combined report")
                .arg(
                    Arg::new("artifacts-dir")
                        .long("artifacts-dir")
                        .help("Directory scanned recursively for *.json and *.xml artifacts")
                        .value_name("DIR")
                        .default_value("test-artifacts")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Path of the combined report JSON file")
                        .value_name("OUTPUT")
                        .default_value("combined-report.json")
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new("strict")
                        .long("strict")
                        .help("Abort on the first malformed artifact instead of skipping it")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("init")
                .about("Create a MatrixForge.toml configuration file")
                .arg(
                    Arg::new("non-interactive")
                        .long("non-interactive")
                        .help("Write the stock defaults without launching the interactive wizard")
                        .action(ArgAction::SetTrue),
                ),
        )
}

pub async fn run() -> Result<()> {
    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("generate", generate_matches)) => {
            let scope = Scope::from_str(generate_matches.get_one::<String>("scope").unwrap())?;
            let output = expand_path(generate_matches.get_one::<String>("output").unwrap());
            let base_path = expand_path(generate_matches.get_one::<String>("base-path").unwrap());
            let config = generate_matches
                .get_one::<String>("config")
                .map(|path| expand_path(path));
            let lenient = generate_matches.get_flag("lenient");
            let verbose = generate_matches.get_flag("verbose");

            commands::generate::execute(scope, output, base_path, config, lenient, verbose)?;
        }
        Some(("run", run_matches)) => {
            let args = commands::run::RunArgs {
                matrix: expand_path(run_matches.get_one::<String>("matrix").unwrap()),
                index: run_matches.get_one::<usize>("index").copied(),
                all: run_matches.get_flag("all"),
                jobs: run_matches.get_one::<usize>("jobs").copied(),
                artifacts_dir: expand_path(
                    run_matches.get_one::<String>("artifacts-dir").unwrap(),
                ),
                simulate: run_matches.get_flag("simulate"),
                config: run_matches
                    .get_one::<String>("config")
                    .map(|path| expand_path(path)),
            };

            commands::run::execute(args).await?;
        }
        Some(("aggregate", aggregate_matches)) => {
            let artifacts_dir = expand_path(
                aggregate_matches.get_one::<String>("artifacts-dir").unwrap(),
            );
            let output: PathBuf =
                expand_path(aggregate_matches.get_one::<String>("output").unwrap());
            let strict = aggregate_matches.get_flag("strict");

            commands::aggregate::execute(artifacts_dir, output, strict)?;
        }
        Some(("init", init_matches)) => {
            let non_interactive = init_matches.get_flag("non-interactive");
            commands::init::run_init_wizard(non_interactive)?;
        }
        _ => {
            // This case handles when no subcommand is given.
            // Clap will have already printed help info.
        }
    }
    Ok(())
}
