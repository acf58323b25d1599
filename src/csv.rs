//! Line-oriented CSV boundary: one record per line, fields split on a
//! single comma, no quoting or escaping.

use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::Path
};

use log::debug;

use crate::{
    error::{Error, Result},
    record::{Record, RecordGroup}
};

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

/// # Overview
///
/// Reads a record group from a CSV file. Blank lines are skipped; every
/// remaining line must split into the same number of fields. An empty
/// file is an input error.
pub fn read_records<P: AsRef<Path>>(path: P) -> Result<RecordGroup> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| read_error(path, &e))?;

    let mut records = RecordGroup::new();
    let mut expected = None;
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| read_error(path, &e))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: Record = line.split(',').map(str::to_string).collect();
        match expected {
            None => expected = Some(record.len()),
            Some(count) if count != record.len() => {
                return Err(Error::RaggedDataset {
                    expected: count,
                    got:      record.len()
                });
            }
            Some(_) => {}
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(Error::EmptyDataset);
    }
    debug!("read {} records from {}", records.len(), path.display());
    Ok(records)
}

/// # Overview
///
/// Writes a record group as CSV, one record per line. Records must all
/// have the same field count; an existing file is overwritten.
pub fn write_records<P: AsRef<Path>>(path: P, records: &RecordGroup) -> Result<()> {
    let path = path.as_ref();
    if !records.is_empty() {
        records.uniform_field_count()?;
    }

    let file = File::create(path).map_err(|e| write_error(path, &e))?;
    let mut out = BufWriter::new(file);
    for record in records {
        writeln!(out, "{}", record.join(",")).map_err(|e| write_error(path, &e))?;
    }
    out.flush().map_err(|e| write_error(path, &e))?;
    debug!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn record(values: &[&str]) -> Record {
        values.iter().map(|v| (*v).to_string()).collect()
    }

    #[test]
    fn round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let group = RecordGroup::from_records(vec![
            record(&["a", "b", "c"]),
            record(&["d", "", "f"]),
        ]);

        write_records(&path, &group).unwrap();
        let back = read_records(&path).unwrap();
        assert_eq!(back, group);
    }

    #[test]
    fn read_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(&path, "a,b\n\n  \nc,d\n").unwrap();

        let group = read_records(&path).unwrap();
        assert_eq!(group.len(), 2);
        assert_eq!(group.records()[1], record(&["c", "d"]));
    }

    #[test]
    fn read_rejects_inconsistent_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(&path, "a,b,c\nd,ef\n").unwrap();

        assert_eq!(
            read_records(&path).unwrap_err(),
            Error::RaggedDataset {
                expected: 3,
                got:      2
            }
        );
    }

    #[test]
    fn read_rejects_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        fs::write(&path, "\n\n").unwrap();

        assert_eq!(read_records(&path).unwrap_err(), Error::EmptyDataset);
    }

    #[test]
    fn read_missing_file_reports_path() {
        let err = read_records("no/such/file.csv").unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert!(err.to_string().contains("no/such/file.csv"));
    }

    #[test]
    fn write_rejects_ragged_group() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        let group = RecordGroup::from_records(vec![
            record(&["a", "b"]),
            record(&["c"]),
        ]);

        assert!(matches!(
            write_records(&path, &group).unwrap_err(),
            Error::RaggedDataset { .. }
        ));
    }

    #[test]
    fn write_empty_group_creates_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.csv");
        write_records(&path, &RecordGroup::new()).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }
}
