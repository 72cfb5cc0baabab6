//! Command-line driver.
//!
//! Reads the number of points, evolves tours through a random world and
//! streams progress to stdout: a line whenever the best cost changes, a dot
//! for every generation that repeats it, and a final summary.

use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tsp_evo::ga::{EvolutionConfig, EvolutionEngine, Generation};
use tsp_evo::geo::GeoWorld;
use tsp_evo::TspError;

#[derive(Parser, Debug)]
#[command(name = "tsp-evo")]
#[command(about = "Evolve a short open path through N random points")]
struct Cli {
    /// Number of points; read from stdin when omitted
    points: Option<String>,

    /// Random seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Fraction of the population drawn as parents each generation
    #[arg(long, default_value_t = 0.5)]
    selection_fraction: f64,

    /// Probability that a child is mutated
    #[arg(long, default_value_t = 0.1)]
    mutation_chance: f64,

    /// Stagnation constant; the run stops after this many minus one
    /// generations with the same best cost
    #[arg(long, default_value_t = 16)]
    stagnation_limit: usize,

    /// Evaluate children in parallel (requires the `parallel` feature)
    #[arg(long)]
    parallel: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn config(&self) -> EvolutionConfig {
        // Raw values, so `validate` rejects out-of-range rates
        let mut config = EvolutionConfig::default()
            .with_stagnation_limit(self.stagnation_limit)
            .with_parallel(self.parallel);
        config.selection_fraction = self.selection_fraction;
        config.mutation_chance = self.mutation_chance;
        config.seed = self.seed;
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let raw = match cli.points {
        Some(ref arg) => arg.clone(),
        None => {
            let mut line = String::new();
            io::stdin()
                .lock()
                .read_line(&mut line)
                .context("failed to read point count from stdin")?;
            line
        }
    };
    let point_count = parse_point_count(&raw)?;

    let config = cli.config();
    config.validate()?;
    let mut rng = config.create_rng();
    let world = GeoWorld::random(point_count, &mut rng)?;
    let mut engine = EvolutionEngine::new(&world, config, &mut rng)?;

    let stdout = io::stdout();
    let mut progress = Progress::new(stdout.lock());
    for generation in engine.generations(&mut rng) {
        progress.record(&generation?)?;
    }
    progress.finish()?;

    Ok(())
}

/// Parses a positive point count.
fn parse_point_count(raw: &str) -> Result<usize, TspError> {
    let trimmed = raw.trim();
    let value: i64 = trimmed.parse().map_err(|_| TspError::InvalidInput {
        reason: format!("point count must be an integer, got {trimmed:?}"),
    })?;
    if value < 1 {
        return Err(TspError::InvalidInput {
            reason: format!("point count must be at least 1, got {value}"),
        });
    }
    usize::try_from(value).map_err(|_| TspError::InvalidInput {
        reason: format!("point count {value} is too large"),
    })
}

/// Textual progress stream.
struct Progress<W: Write> {
    out: W,
    iteration: usize,
    last_cost: f64,
    best: Option<Generation>,
}

impl<W: Write> Progress<W> {
    fn new(out: W) -> Self {
        Self {
            out,
            iteration: 1,
            last_cost: f64::INFINITY,
            best: None,
        }
    }

    fn record(&mut self, generation: &Generation) -> io::Result<()> {
        if generation.cost != self.last_cost {
            write!(
                self.out,
                "\nGeneration {} -> Cost {}",
                self.iteration, generation.cost
            )?;
        } else {
            write!(self.out, ".")?;
        }
        self.out.flush()?;

        self.last_cost = generation.cost;
        self.iteration += 1;
        self.best = Some(generation.clone());
        Ok(())
    }

    fn finish(mut self) -> io::Result<()> {
        writeln!(
            self.out,
            "\nFinal generation ({}) -> Cost {}",
            self.iteration, self.last_cost
        )?;
        if let Some(best) = &self.best {
            writeln!(self.out, "{}", best.best)?;
        }
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsp_evo::ga::Tour;

    fn generation(index: usize, cost: f64, done: bool) -> Generation {
        Generation {
            index,
            best: Tour::new(vec![1, 0, 2]),
            cost,
            stagnation: 0,
            done,
        }
    }

    #[test]
    fn test_parse_point_count() {
        assert_eq!(parse_point_count("12\n").unwrap(), 12);
        assert_eq!(parse_point_count(" 1 ").unwrap(), 1);
    }

    #[test]
    fn test_parse_point_count_rejects_bad_input() {
        for raw in ["0", "-3", "ten", "", "4.5"] {
            let err = parse_point_count(raw).unwrap_err();
            assert!(
                matches!(err, TspError::InvalidInput { .. }),
                "{raw:?} should be invalid input"
            );
        }
    }

    #[test]
    fn test_progress_stream() {
        let mut buf = Vec::new();
        let mut progress = Progress::new(&mut buf);
        progress.record(&generation(1, 10.5, false)).unwrap();
        progress.record(&generation(2, 10.5, false)).unwrap();
        progress.record(&generation(3, 10.5, false)).unwrap();
        progress.record(&generation(4, 7.0, true)).unwrap();
        progress.finish().unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "\nGeneration 1 -> Cost 10.5..\nGeneration 4 -> Cost 7\
             \nFinal generation (5) -> Cost 7\n1->0->2\n"
        );
    }

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::parse_from([
            "tsp-evo",
            "9",
            "--seed",
            "3",
            "--mutation-chance",
            "0.2",
            "-vv",
        ]);
        assert_eq!(cli.points.as_deref(), Some("9"));
        assert_eq!(cli.verbose, 2);

        let config = cli.config();
        assert_eq!(config.seed, Some(3));
        assert!((config.mutation_chance - 0.2).abs() < 1e-12);
        assert_eq!(config.stagnation_limit, 16);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_out_of_range_rates_are_rejected() {
        for args in [
            ["tsp-evo", "9", "--mutation-chance", "5"],
            ["tsp-evo", "9", "--selection-fraction", "1.5"],
        ] {
            let err = Cli::parse_from(args).config().validate().unwrap_err();
            assert!(
                matches!(err, TspError::InvalidInput { .. }),
                "{args:?} should be invalid input"
            );
        }
    }
}
