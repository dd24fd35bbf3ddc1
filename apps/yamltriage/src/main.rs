//! yamltriage CLI binary entry point.
//! Resolves configuration, runs the pipeline, and prints results.

use clap::Parser;
use yamltriage::cli::{Cli, Commands, CommonArgs};
use yamltriage::config::{self, Effective};
use yamltriage::pipeline::{self, RunOptions};
use yamltriage::{output, utils};

fn resolve(common: &CommonArgs, write: Option<bool>, check: Option<bool>) -> Effective {
    match config::resolve_effective(
        common.repo_root.as_deref(),
        common.root.as_deref(),
        &common.exclude,
        common.output.as_deref(),
        common.report_dir.as_deref(),
        write,
        check,
    ) {
        Ok(eff) => eff,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            std::process::exit(2);
        }
    }
}

/// Run the pipeline and print. Returns the report for exit-code decisions.
fn execute(eff: &Effective, fix: bool, write: bool) -> pipeline::RunReport {
    let opts = RunOptions {
        root: eff.root.clone(),
        exclude: eff.exclude.clone(),
        extensions: eff.extensions.clone(),
        required_key: eff.required_key.clone(),
        fix,
        write,
    };
    let run = match pipeline::run(&opts) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            if eff.output == "json" {
                println!("null");
            }
            std::process::exit(2);
        }
    };
    if eff.output != "json" && run.validation.report.total_analyzed == 0 {
        eprintln!(
            "{} No documents found under {}",
            utils::note_prefix(),
            utils::rel_to_wd(&eff.root)
        );
    }
    output::print_run(&run, &eff.output, fix, write);
    if let Some(dir) = eff.report_dir.as_ref() {
        match output::write_reports(dir, &run, fix) {
            Ok(paths) => {
                if eff.output != "json" {
                    for p in paths {
                        eprintln!("{} wrote {}", utils::info_prefix(), utils::rel_to_wd(&p));
                    }
                }
            }
            Err(e) => {
                eprintln!("{} {}", utils::error_prefix(), e);
                std::process::exit(2);
            }
        }
    }
    run
}

fn main() {
    let cli = Cli::parse();
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Validate { common } => {
            let eff = resolve(&common, None, None);
            let run = execute(&eff, false, false);
            if !run.validation.report.error_files.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Fix {
            common,
            write,
            check,
        } => {
            let eff = resolve(
                &common,
                if write { Some(true) } else { None },
                if check { Some(true) } else { None },
            );
            // check mode never writes
            let eff_write = if eff.check { false } else { eff.write };
            let run = execute(&eff, true, eff_write);
            if eff.check && run.applied_count() > 0 {
                std::process::exit(1);
            }
        }
    }
}
