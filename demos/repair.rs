use std::path::PathBuf;

use clap::Parser;

use regex_repair::enumerator::{Enumerator, SearchConfig};
use regex_repair::regex::Regex;

#[derive(Debug, Parser)]
#[command(author, version)]
struct Cli {
    /// Regex to repair.
    #[arg(value_name = "SEED")]
    seed: String,

    /// Regex denoting the desired language.
    #[arg(value_name = "TARGET")]
    target: String,

    /// Maximum number of edits.
    #[clap(long, value_name = "INT")]
    max_distance: Option<usize>,

    /// Maximum number of candidates kept in the frontier.
    #[clap(long, value_name = "INT", default_value = "1048576")]
    max_frontier: usize,

    /// Number of answers to print.
    #[clap(long, value_name = "INT", default_value = "1")]
    answers: usize,

    /// Write the minimal target automaton to this file in DOT format.
    #[clap(long, value_name = "FILE")]
    dot: Option<PathBuf>,

    /// Log every oracle call.
    #[clap(short, long)]
    verbose: bool,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Cli::parse();

    simplelog::TermLogger::init(
        if args.verbose {
            simplelog::LevelFilter::Debug
        } else {
            simplelog::LevelFilter::Info
        },
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    let time_total = std::time::Instant::now();
    println!("args = {:?}", args);

    let mut config = SearchConfig::default().with_max_frontier(args.max_frontier);
    if let Some(max_distance) = args.max_distance {
        config = config.with_max_distance(max_distance);
    }

    let seed = Regex::new(&args.seed)?;
    let target = regex_repair::parser::parse(&args.target)?;
    let mut search = Enumerator::from_parts(seed, &target, config);

    println!("alphabet = {:?}", search.alphabet());
    println!(
        "target: {} states, {} positive tests, {} negative tests",
        search.target().num_states(),
        search.tests().positive().len(),
        search.tests().negative().len()
    );
    for len in 0..=4 {
        println!("  words of length {}: {}", len, search.target().count_words(len));
    }

    if let Some(path) = &args.dot {
        std::fs::write(path, search.target().to_dot()?)?;
        println!("Wrote target automaton to {}", path.display());
    }

    for i in 0..args.answers {
        match search.next_validated() {
            Some(answer) => {
                println!("answer #{} = {} (distance {})", i + 1, answer, answer.distance());
            }
            None => {
                println!("No more answers within the given bounds");
                break;
            }
        }
    }

    println!("tested: {}", search.testing_counter());
    println!("validated: {}", search.validation_counter());
    println!(
        "tests: {} positive, {} negative",
        search.tests().positive().len(),
        search.tests().negative().len()
    );

    let time_total = time_total.elapsed();
    println!("Done in {:.3} s", time_total.as_secs_f64());

    Ok(())
}
