use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::warn;

use swiper::{
    arith::{normalize_weights, parse_rational, parse_rationals},
    driver::{solve, solve_wq, SolveOptions},
    instance::{WeightQualification, WeightRestriction},
};

#[derive(Debug, Parser)]
#[command(name = "swiper", about = "Solver for the Weight Restriction and Weight Qualification ticket allocation problems")]
struct CommandArgs {
    #[clap(subcommand)]
    problem: Problem,
}

#[derive(Debug, Subcommand)]
enum Problem {
    /// Solve a Weight Restriction instance
    Wr(WrArgs),
    /// Solve a Weight Qualification instance
    Wq(WqArgs),
}

#[derive(Debug, Args)]
struct CommonArgs {
    /// Input file (defaults to standard input)
    input_file: Option<PathBuf>,

    /// Skip the exact refinement phases, accepting a possibly larger total
    #[arg(long)]
    linear: bool,

    /// Force the arbitrary-precision knapsack backend
    #[arg(long)]
    no_jit: bool,

    /// Emit only the ticket total
    #[arg(long)]
    sum_only: bool,

    /// Enable the validator's postcondition assertions after each phase
    #[arg(long)]
    debug: bool,

    /// Output file (defaults to standard output)
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output_file: Option<PathBuf>,

    /// Increase logging verbosity (-v info, -vv debug)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Args)]
struct WrArgs {
    #[clap(flatten)]
    common: CommonArgs,

    /// Weighted threshold alpha_w
    #[arg(long, alias = "alpha_w", value_name = "RATIONAL")]
    tw: String,

    /// Nominal threshold alpha_n
    #[arg(long, alias = "alpha_n", value_name = "RATIONAL")]
    tn: String,
}

#[derive(Debug, Args)]
struct WqArgs {
    #[clap(flatten)]
    common: CommonArgs,

    /// Weighted threshold beta_w
    #[arg(long, alias = "beta_w", value_name = "RATIONAL")]
    tw: String,

    /// Nominal threshold beta_n
    #[arg(long, alias = "beta_n", value_name = "RATIONAL")]
    tn: String,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn read_input(path: &Option<PathBuf>) -> anyhow::Result<String> {
    match path {
        Some(path) => Ok(fs::read_to_string(path)?),
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn write_output(path: &Option<PathBuf>, contents: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => fs::write(path, contents)?,
        None => io::stdout().write_all(contents.as_bytes())?,
    }
    Ok(())
}

fn format_allocation(t: &[u64], sum_only: bool) -> String {
    if sum_only {
        format!("{}\n", t.iter().sum::<u64>())
    } else {
        let joined = t.iter().map(u64::to_string).collect::<Vec<_>>().join(" ");
        format!("{joined}\n")
    }
}

fn solve_options(common: &CommonArgs) -> SolveOptions {
    SolveOptions {
        linear: common.linear,
        no_jit: common.no_jit,
        verify: common.debug,
    }
}

fn run_wr(args: &WrArgs) -> anyhow::Result<()> {
    init_logging(args.common.verbose);

    let input = read_input(&args.common.input_file)?;
    let tokens = parse_rationals(&input)?;
    let tw = parse_rational(&args.tw)?;
    let tn = parse_rational(&args.tn)?;

    let weights = normalize_weights(&tokens, &tw, &tn);
    let inst = WeightRestriction::new(weights, tw, tn)?;

    let t = solve(&inst, solve_options(&args.common));
    write_output(&args.common.output_file, &format_allocation(&t, args.common.sum_only))
}

fn run_wq(args: &WqArgs) -> anyhow::Result<()> {
    init_logging(args.common.verbose);

    let input = read_input(&args.common.input_file)?;
    let tokens = parse_rationals(&input)?;
    let tw = parse_rational(&args.tw)?;
    let tn = parse_rational(&args.tn)?;

    let weights = normalize_weights(&tokens, &tw, &tn);
    let inst = WeightQualification::new(weights, tw, tn)?;

    let t = solve_wq(&inst, solve_options(&args.common));
    write_output(&args.common.output_file, &format_allocation(&t, args.common.sum_only))
}

/// Domain failures (bad thresholds, malformed tokens, empty/all-zero weights)
/// are reported and exit 1; anything else reaching this point (an unreadable
/// input path, a write failure) is treated as a usage error and exits 2.
fn is_domain_error(err: &anyhow::Error) -> bool {
    err.downcast_ref::<swiper::DomainError>().is_some()
        || err.downcast_ref::<swiper::arith::ParseTokenError>().is_some()
}

fn main() -> ExitCode {
    let args = CommandArgs::parse();

    let result = match &args.problem {
        Problem::Wr(wr_args) => run_wr(wr_args),
        Problem::Wq(wq_args) => run_wq(wq_args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            if is_domain_error(&err) {
                ExitCode::from(1)
            } else {
                warn!("{err}");
                ExitCode::from(2)
            }
        }
    }
}
