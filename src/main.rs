//! ila - learn record validation rules from a training set and apply
//! them.
//!
//! Usage:
//!   ila classify train.csv input.csv output.csv      # Learn and classify
//!   ila classify train.csv input.csv output.csv 0,3  # Ignoring fields 0 and 3
//!   ila slice data.csv slice.csv rest.csv 101 50     # Cut a validation slice
//!   ila strip classified.csv bare.csv                # Drop the label field
//!   ila compare baseline.csv results.csv diff.txt    # Report label mismatches
//!   ila generate train.csv 1000 --seed 7             # Synthetic training data

use std::{
    path::{Path, PathBuf},
    process::ExitCode
};

use clap::{Parser, Subcommand};
use ila_rs::{
    Classifier, Error, Result, csv, dataset,
    generator::{
        ComboRule, Counter, FieldSource, NumericRange, PositiveNumericRule, RecordGenerator,
        ValidityRule, ValuePool, ValueRule, WeightedPool
    },
    utils::{rng_from_entropy, rng_from_seed}
};

/// Learns categorical validation rules from labelled records and applies
/// them to unlabelled ones.
#[derive(Parser)]
#[command(name = "ila", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command
}

#[derive(Subcommand)]
enum Command {
    /// Learn rules from a training file and classify records
    Classify {
        /// Training records with a trailing true/false label field
        training: PathBuf,
        /// Records to classify
        input:    PathBuf,
        /// Destination for the labelled records
        output:   PathBuf,
        /// Comma-separated field indices to exclude from rule induction
        ignore_fields: Option<String>
    },
    /// Split a file into a contiguous slice and its complement
    Slice {
        input:      PathBuf,
        slice_out:  PathBuf,
        rest_out:   PathBuf,
        /// First line of the slice, 1-based
        first_line: usize,
        /// Number of lines in the slice
        count:      usize
    },
    /// Remove the last comma-separated field of every line
    Strip {
        input:  PathBuf,
        output: PathBuf
    },
    /// Report lines whose final field differs from a baseline
    Compare {
        baseline: PathBuf,
        results:  PathBuf,
        /// Destination for the mismatch report
        mismatches: PathBuf
    },
    /// Write synthetic labelled training records
    Generate {
        output: PathBuf,
        /// Number of records to generate
        count:  usize,
        /// RNG seed; omit for a random run
        #[arg(long)]
        seed: Option<u64>
    }
}

fn parse_ignore_fields(arg: Option<&str>) -> Result<Vec<usize>> {
    let Some(arg) = arg else {
        return Ok(Vec::new());
    };
    arg.split(',')
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| Error::BadIgnoreFields(arg.to_string()))
        })
        .collect()
}

fn classify(
    training: &Path,
    input: &Path,
    output: &Path,
    ignore_fields: Option<&str>
) -> Result<()> {
    let ignore = parse_ignore_fields(ignore_fields)?;
    let training = csv::read_records(training)?;
    let classifier = Classifier::learn(&training, &ignore)?;

    println!("Rules for classifying invalid records:");
    print!("{}", classifier.rules());

    let mut records = csv::read_records(input)?;
    classifier.classify_records(&mut records);
    csv::write_records(output, &records)
}

/// The demonstration generator: an order-id counter, a product pool, a
/// skewed region distribution, and a quantity that may go non-positive.
/// Invalid records are discontinued products, a product/region pairing
/// that is not sold, or a bad quantity.
fn generate(output: &Path, count: usize, seed: Option<u64>) -> Result<()> {
    let mut products = ValuePool::new();
    products
        .push("widget")
        .push("gadget")
        .push("sprocket")
        .push("doodad");

    let mut regions = WeightedPool::new();
    regions
        .push("north", 4.0)
        .push("south", 3.0)
        .push("east", 2.0)
        .push("west", 1.0);

    let sources: Vec<Box<dyn FieldSource>> = vec![
        Box::new(Counter::new(1)),
        Box::new(products),
        Box::new(regions),
        Box::new(NumericRange::new(-5, 60)),
    ];

    let mut discontinued = ValueRule::new(1, true);
    discontinued.push("doodad");
    let mut unsold = ComboRule::new(1, "sprocket", 2, "west", 3, false)?;
    unsold.push("0"); // Sprocket never stocked in the west
    let rules: Vec<Box<dyn ValidityRule>> = vec![
        Box::new(discontinued),
        Box::new(unsold),
        Box::new(PositiveNumericRule::new(3)),
    ];

    let mut generator = RecordGenerator::new(sources, rules)?;
    let mut rng = seed.map_or_else(rng_from_entropy, rng_from_seed);
    let records = generator.generate(count, &mut rng);
    csv::write_records(output, &records)
}

fn run(command: &Command) -> Result<()> {
    match command {
        Command::Classify {
            training,
            input,
            output,
            ignore_fields
        } => classify(training, input, output, ignore_fields.as_deref()),
        Command::Slice {
            input,
            slice_out,
            rest_out,
            first_line,
            count
        } => dataset::slice(input, slice_out, rest_out, *first_line, *count),
        Command::Strip {
            input,
            output
        } => dataset::strip_last_field(input, output),
        Command::Compare {
            baseline,
            results,
            mismatches
        } => {
            let count = dataset::compare_to_baseline(baseline, results, mismatches)?;
            if count == 0 {
                println!("Baseline and results are identical");
            } else {
                println!(
                    "Baseline and results have {count} mismatches, see {}",
                    mismatches.display()
                );
            }
            Ok(())
        }
        Command::Generate {
            output,
            count,
            seed
        } => generate(output, *count, *seed)
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_fields_parse() {
        assert_eq!(parse_ignore_fields(None).unwrap(), Vec::<usize>::new());
        assert_eq!(parse_ignore_fields(Some("0")).unwrap(), vec![0]);
        assert_eq!(parse_ignore_fields(Some("2,0,7")).unwrap(), vec![2, 0, 7]);
    }

    #[test]
    fn ignore_fields_reject_garbage() {
        assert_eq!(
            parse_ignore_fields(Some("1,x")).unwrap_err(),
            Error::BadIgnoreFields("1,x".to_string())
        );
        assert!(parse_ignore_fields(Some("")).is_err());
        assert!(parse_ignore_fields(Some("-1")).is_err());
    }
}
