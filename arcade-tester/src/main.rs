mod common;
mod logic;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use common::scenario::{SCENARIO_KEYS, get_scenario, list_scenarios};
use common::split_csv;
use logic::seeds::SeedSource;
use logic::{LogicTester, ScenarioResult, resolve_seed_inputs};

#[derive(Debug, Parser)]
#[command(name = "arcade-tester", version)]
#[command(about = "Headless QA runs for the arcade mini-games engine")]
struct Args {
    /// Scenarios to run (comma-separated, or `all`)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated integers, 0x hex, or sweep:N)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    let start_time = Instant::now();
    let scenarios = expand_scenarios(&args.scenarios);
    let seed_infos = resolve_seed_inputs(&split_csv(&args.seeds))?;
    let seeds: Vec<u64> = seed_infos.iter().map(|s| s.seed).collect();
    let swept = seed_infos
        .iter()
        .filter(|s| s.source == SeedSource::Sweep)
        .count();
    log::info!(
        "running {} scenario(s) over {} seed(s), {swept} from sweeps",
        scenarios.len(),
        seeds.len()
    );

    let results = run_logic_scenarios(&args, &scenarios, &seeds);
    write_reports(&args, &results, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut sink = ReportSink::open(args.output.as_deref())?;
    writeln!(sink, "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(sink, "  {key:15} - {description}")?;
    }
    sink.flush()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🕹️  Arcade Automated Tester".bright_cyan().bold());
    println!("{}", "================================".cyan());
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for key in SCENARIO_KEYS {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

fn run_logic_scenarios(args: &Args, scenarios: &[String], seeds: &[u64]) -> Vec<ScenarioResult> {
    println!("{}", "🧠 Running Logic Tests".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(args.verbose);
    let mut results = Vec::new();
    for scenario_name in scenarios {
        if let Some(scenario) = get_scenario(scenario_name) {
            results.extend(tester.run_scenario(&scenario, seeds, args.iterations));
        } else {
            eprintln!("⚠️  Unknown scenario: {}", scenario_name.yellow());
        }
    }
    results
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut sink = ReportSink::open(args.output.as_deref())?;
    let out: &mut dyn Write = &mut sink;

    match args.report.as_str() {
        "json" => {
            if results.is_empty() {
                writeln!(out, "[]")?;
            } else {
                logic::reports::generate_json_report(out, results)?;
            }
        }
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    out,
                    "# Arcade Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(out, results)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(out, "No logic scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(out, results, start_time.elapsed())?;
            }
            writeln!(out)?;
            writeln!(out, "🏁 Total time: {:?}", start_time.elapsed())?;
        }
    }

    sink.flush()?;
    Ok(())
}

/// Where reports go: stdout by default, or a file from `--output`.
struct ReportSink {
    inner: BufWriter<Box<dyn Write>>,
}

impl ReportSink {
    fn open(path: Option<&Path>) -> Result<Self> {
        let target: Box<dyn Write> = match path {
            Some(path) => Box::new(
                File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?,
            ),
            None => Box::new(stdout()),
        };
        Ok(Self {
            inner: BufWriter::new(target),
        })
    }
}

impl Write for ReportSink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.inner.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
