//! infocode: command-line driver for the coding and channel experiments.
//!
//! Logging goes to stderr through `tracing`; set `RUST_LOG=debug` to see
//! codec internals or `RUST_LOG=info` for per-point BER progress.

mod config;
mod input_gen;

use config::{Command, Config};
use infocode_core::channel::{simulate_ber_curve, BinarySymmetricChannel};
use infocode_core::model::EntropyModel;
use infocode_core::report::{
    analyze_batch, analyze_text, bsc_text_experiment, UniversalMethod, UniversalReport,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::error::Error;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            eprintln!("run with --help for usage");
            std::process::exit(2);
        }
    };

    if config.print_config {
        config.print();
    }

    if let Err(e) = run(&config) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Text supplied with `--text` or `--in`, if any.
fn user_text(config: &Config) -> Result<Option<String>, Box<dyn Error>> {
    if let Some(text) = &config.text {
        return Ok(Some(text.clone()));
    }
    match &config.input_file {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
            Ok(Some(text))
        }
        None => Ok(None),
    }
}

/// Text for the character-level commands.
fn character_text(config: &Config) -> Result<String, Box<dyn Error>> {
    if let Some(text) = user_text(config)? {
        return Ok(text);
    }
    match &config.sequence {
        Some(name) => input_gen::named_sequence(name, config.seed)
            .ok_or_else(|| format!("unknown sequence: {name}").into()),
        None => Ok(input_gen::SAMPLE_TEXT.to_string()),
    }
}

fn run(config: &Config) -> Result<(), Box<dyn Error>> {
    match config.command {
        Command::Entropy => {
            let text = character_text(config)?;
            let model = EntropyModel::from_filtered(text.chars(), &input_gen::valid_charset())?;

            println!("=== Probability Model ===");
            for entry in model.pmf.entries() {
                println!(
                    "  {:?}: {} ({:.4})",
                    entry.symbol, entry.count, entry.probability
                );
            }
            println!();
            println!("Symbols: {}", model.pmf.total());
            println!("Alphabet size: {}", model.pmf.alphabet_size());
            println!("Entropy: {:.4} bits/symbol", model.entropy);
            println!("Relative entropy: {:.4} bits", model.relative_entropy);
        }

        Command::Source => {
            let text = character_text(config)?;
            let report = analyze_text(&text, &input_gen::valid_charset())?;
            report.print_summary();
        }

        Command::Arithmetic | Command::Lz78 => {
            let method = if config.command == Command::Arithmetic {
                UniversalMethod::Arithmetic
            } else {
                UniversalMethod::Lz78
            };

            let single = match (user_text(config)?, &config.sequence) {
                (Some(text), _) => Some(text),
                (None, Some(name)) => Some(
                    input_gen::named_sequence(name, config.seed)
                        .ok_or_else(|| format!("unknown sequence: {name}"))?,
                ),
                (None, None) => None,
            };

            match single {
                Some(sequence) => {
                    let tokens = input_gen::tokenize(&sequence);
                    UniversalReport::analyze(&tokens, method)?.print_summary();
                }
                None => {
                    let cases = input_gen::test_cases(config.seed);
                    analyze_batch(&cases, method).print_summary();
                }
            }
        }

        Command::Ber => {
            let sim = &config.simulation;
            let curve = simulate_ber_curve(sim)?;

            println!(
                "=== BER: BPSK over {} ({}) ===",
                sim.channel,
                sim.coding.label()
            );
            println!("{:>8}  {:>10}  {:>12}  {:>12}", "Eb/N0", "errors", "BER", "uncoded AWGN");
            for point in &curve {
                println!(
                    "{:>8.2}  {:>10}  {:>12.3e}  {:>12.3e}",
                    point.ebn0_db, point.bit_errors, point.ber, point.theoretical
                );
            }
        }

        Command::Bsc => {
            let text = character_text(config)?;
            let channel = BinarySymmetricChannel::new(config.crossover)?;
            let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
            let report =
                bsc_text_experiment(&text, &input_gen::valid_charset(), &channel, &mut rng)?;
            report.print_summary();
        }
    }

    Ok(())
}
