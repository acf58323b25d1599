//! Dataset file utilities: slicing for cross-verification, stripping
//! classifications, and comparing results to a baseline.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path
};

use log::{info, warn};

use crate::error::{Error, Result};

fn read_error(path: &Path, source: &io::Error) -> Error {
    Error::Read {
        path:    path.display().to_string(),
        message: source.to_string()
    }
}

fn write_error(path: &Path, source: &io::Error) -> Error {
    Error::Write {
        path:    path.display().to_string(),
        message: source.to_string()
    }
}

/// Reads every line of a file, blank lines included; these utilities
/// operate on raw lines, not parsed records.
fn read_lines(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| read_error(path, &e))?;
    BufReader::new(file)
        .lines()
        .map(|line| line.map_err(|e| read_error(path, &e)))
        .collect()
}

fn write_lines<'a, I>(path: &Path, lines: I) -> Result<()>
where
    I: IntoIterator<Item = &'a str>
{
    let file = File::create(path).map_err(|e| write_error(path, &e))?;
    let mut out = BufWriter::new(file);
    for line in lines {
        writeln!(out, "{line}").map_err(|e| write_error(path, &e))?;
    }
    out.flush().map_err(|e| write_error(path, &e))
}

/// # Overview
///
/// Splits a file into a contiguous slice and its complement, preserving
/// line order. `first_line` is 1-based; both it and `count` must be
/// positive, and the input must reach `first_line`.
pub fn slice<P: AsRef<Path>>(
    input: P,
    slice_out: P,
    remainder_out: P,
    first_line: usize,
    count: usize
) -> Result<()> {
    if first_line == 0 || count == 0 {
        return Err(Error::SliceBounds);
    }
    let lines = read_lines(input.as_ref())?;
    if lines.len() < first_line {
        return Err(Error::SliceOutOfRange {
            lines: lines.len()
        });
    }

    let start = first_line - 1;
    let end = first_line.saturating_add(count) - 1;
    let in_slice = |index: &usize| (start..end).contains(index);

    let sliced = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| in_slice(i))
        .map(|(_, line)| line.as_str());
    write_lines(slice_out.as_ref(), sliced)?;

    let rest = lines
        .iter()
        .enumerate()
        .filter(|(i, _)| !in_slice(i))
        .map(|(_, line)| line.as_str());
    write_lines(remainder_out.as_ref(), rest)?;

    info!(
        "sliced {} of {} lines from {}",
        end.min(lines.len()) - start,
        lines.len(),
        input.as_ref().display()
    );
    Ok(())
}

/// # Overview
///
/// Removes the last comma-separated field of every line. A line with no
/// comma becomes empty, with a warning, so line counts stay aligned with
/// the input.
pub fn strip_last_field<P: AsRef<Path>>(input: P, output: P) -> Result<()> {
    let lines = read_lines(input.as_ref())?;
    let stripped = lines.iter().enumerate().map(|(i, line)| {
        line.rfind(',').map_or_else(
            || {
                warn!("line {} has no field separator, result is empty", i + 1);
                ""
            },
            |cut| &line[..cut]
        )
    });
    write_lines(output.as_ref(), stripped)
}

/// # Overview
///
/// Compares classified results against a baseline with the same record
/// bodies. Lines whose final field disagrees are reported to
/// `mismatch_out`; returns the number of mismatches.
///
/// The files must have the same number of lines and identical bodies
/// (everything before the last comma) in the same order; anything else is
/// a hard error, since the comparison would be meaningless.
pub fn compare_to_baseline<P: AsRef<Path>>(
    baseline: P,
    results: P,
    mismatch_out: P
) -> Result<usize> {
    let base_lines = read_lines(baseline.as_ref())?;
    let result_lines = read_lines(results.as_ref())?;
    if base_lines.len() != result_lines.len() {
        return Err(Error::RecordCountMismatch);
    }

    let mut mismatches = Vec::new();
    for (i, (base, result)) in base_lines.iter().zip(&result_lines).enumerate() {
        if base == result {
            continue;
        }
        let base_cut = base.rfind(',').ok_or(Error::MissingSeparator {
            line: i + 1
        })?;
        let result_cut = result.rfind(',').ok_or(Error::MissingSeparator {
            line: i + 1
        })?;
        if base[..base_cut] != result[..result_cut] {
            return Err(Error::RecordBodyMismatch {
                line: i + 1
            });
        }
        mismatches.push(format!(
            "Record: {} Baseline: {} Result: {}",
            &base[..base_cut],
            &base[base_cut + 1..],
            &result[result_cut + 1..]
        ));
    }

    write_lines(mismatch_out.as_ref(), mismatches.iter().map(String::as_str))?;
    if mismatches.is_empty() {
        info!("baseline and results are identical");
    } else {
        info!(
            "baseline and results have {} mismatches, see {}",
            mismatches.len(),
            mismatch_out.as_ref().display()
        );
    }
    Ok(mismatches.len())
}
