use crate::core::state::{Pid, Process, Ticks};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{trace, warn};

/// Rows whose content is shorter than this are skipped outright under
/// the lenient policy, before any field parsing. Counted without the
/// line terminator: the shortest well-formed record (`1,2,9,5,2`) is
/// nine characters.
pub const MIN_RECORD_LEN: usize = 9;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("line {line}: expected 5 integer fields, found {found}")]
    MalformedRecord { line: usize, found: usize },
    #[error("line {line}: {value:?} is not a non-negative integer")]
    BadField { line: usize, value: String },
    #[error("line {line}: duplicate process id {pid}")]
    DuplicatePid { line: usize, pid: Pid },
}

/// How malformed records are treated. The two engines historically
/// disagreed and both behaviors are kept as distinct policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordPolicy {
    /// Any malformed record aborts the load (tick engine).
    Strict,
    /// Short rows are skipped silently, longer unparsable rows are
    /// skipped with a warning (event-skip engine).
    Lenient,
}

/// Reads a descriptor file: one header line, then one record per line
/// with five integer fields `pid, arrival, total, io_frequency,
/// io_duration`, separated by `,` or `;`. Duplicate pids are rejected
/// under both policies.
pub fn load_processes(path: &Path, policy: RecordPolicy) -> Result<Vec<Process>, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut procs = Vec::new();
    let mut seen: HashSet<Pid> = HashSet::new();

    // line numbers are 1-based; line 1 is the header
    for (line, raw) in text.lines().enumerate().skip(1) {
        let line = line + 1;
        if raw.trim().is_empty() {
            continue;
        }
        if policy == RecordPolicy::Lenient && raw.len() < MIN_RECORD_LEN {
            trace!(line, "skipping short row");
            continue;
        }

        match parse_record(line, raw) {
            Ok(proc) => {
                if !seen.insert(proc.pid) {
                    return Err(LoadError::DuplicatePid {
                        line,
                        pid: proc.pid,
                    });
                }
                procs.push(proc);
            }
            Err(err) => match policy {
                RecordPolicy::Strict => return Err(err),
                RecordPolicy::Lenient => {
                    warn!(line, %err, "skipping malformed row");
                }
            },
        }
    }

    Ok(procs)
}

fn parse_record(line: usize, raw: &str) -> Result<Process, LoadError> {
    let fields: Vec<&str> = raw
        .split([',', ';'])
        .map(str::trim)
        .filter(|f| !f.is_empty())
        .collect();
    if fields.len() != 5 {
        return Err(LoadError::MalformedRecord {
            line,
            found: fields.len(),
        });
    }

    let int = |value: &str| -> Result<Ticks, LoadError> {
        value.parse().map_err(|_| LoadError::BadField {
            line,
            value: value.to_owned(),
        })
    };
    let pid: Pid = fields[0].parse().map_err(|_| LoadError::BadField {
        line,
        value: fields[0].to_owned(),
    })?;

    Ok(Process::new(
        pid,
        int(fields[1])?,
        int(fields[2])?,
        int(fields[3])?,
        int(fields[4])?,
    ))
}

/// Derives the tick engine's output file name from the input's file
/// name: `output_<name>.txt` in the working directory.
pub fn output_name(input: &Path) -> PathBuf {
    let name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_owned());
    PathBuf::from(format!("output_{name}.txt"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn file_with(contents: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().expect("temp file");
        f.write_all(contents.as_bytes()).expect("write");
        f
    }

    const BASIC: &str = "\
Pid,Arrival Time,Total CPU Time,I/O Frequency,I/O Duration
1,0,20,5,3
2,4,10,12,2
";

    #[test]
    fn parses_records_after_the_header() {
        let f = file_with(BASIC);
        let procs = load_processes(f.path(), RecordPolicy::Strict).unwrap();
        assert_eq!(procs.len(), 2);
        assert_eq!(procs[0], Process::new(1, 0, 20, 5, 3));
        assert_eq!(procs[1], Process::new(2, 4, 10, 12, 2));
    }

    #[test]
    fn load_is_idempotent() {
        let f = file_with(BASIC);
        let a = load_processes(f.path(), RecordPolicy::Strict).unwrap();
        let b = load_processes(f.path(), RecordPolicy::Strict).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn accepts_semicolon_separators() {
        let f = file_with("Pid;Arrival;Total;Freq;Dur\n1;0;20;5;3\n");
        let procs = load_processes(f.path(), RecordPolicy::Lenient).unwrap();
        assert_eq!(procs, vec![Process::new(1, 0, 20, 5, 3)]);
    }

    #[test]
    fn strict_rejects_malformed_records() {
        let f = file_with("header\n1,0,20\n");
        let err = load_processes(f.path(), RecordPolicy::Strict).unwrap_err();
        assert!(matches!(
            err,
            LoadError::MalformedRecord { line: 2, found: 3 }
        ));
    }

    #[test]
    fn strict_rejects_non_integer_fields() {
        let f = file_with("header\n1,0,twenty,5,3\n");
        let err = load_processes(f.path(), RecordPolicy::Strict).unwrap_err();
        assert!(matches!(err, LoadError::BadField { line: 2, .. }));
    }

    #[test]
    fn lenient_skips_short_and_malformed_rows() {
        let f = file_with("header\nbad\n1,0,20,5,3\n2,0,x,5,3,9,9\n");
        let procs = load_processes(f.path(), RecordPolicy::Lenient).unwrap();
        assert_eq!(procs, vec![Process::new(1, 0, 20, 5, 3)]);
    }

    #[test]
    fn lenient_loads_a_minimal_nine_character_record() {
        // all-single-digit record: nine content characters, the
        // shortest a well-formed row can be
        let f = file_with("header\n2,2,9,5,2\n1,2,3,4\n");
        let procs = load_processes(f.path(), RecordPolicy::Lenient).unwrap();
        assert_eq!(procs, vec![Process::new(2, 2, 9, 5, 2)]);
    }

    #[test]
    fn duplicate_pid_is_rejected_under_both_policies() {
        for policy in [RecordPolicy::Strict, RecordPolicy::Lenient] {
            let f = file_with("header\n1,0,20,5,3\n1,2,10,5,3\n");
            let err = load_processes(f.path(), policy).unwrap_err();
            assert!(matches!(err, LoadError::DuplicatePid { line: 3, pid: 1 }));
        }
    }

    #[test]
    fn missing_file_is_an_explicit_error() {
        let err = load_processes(Path::new("no/such/file.csv"), RecordPolicy::Lenient).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
    }

    #[test]
    fn empty_input_yields_no_processes() {
        let f = file_with("header only\n");
        let procs = load_processes(f.path(), RecordPolicy::Strict).unwrap();
        assert!(procs.is_empty());
    }

    #[test]
    fn output_name_uses_the_file_name_only() {
        assert_eq!(
            output_name(Path::new("data/test_case.csv")),
            PathBuf::from("output_test_case.csv.txt")
        );
    }
}
