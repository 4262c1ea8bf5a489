//! Reader for the GENER block of a TOUGH2/AUTOUGH2 `.dat` input file.
//!
//! Each generator is one fixed-column record:
//!
//! ```text
//! cols  0..5   block        25..30  LTAB       40..50  GX
//!       5..10  name         35..39  TYPE       50..60  EX
//!      10..25  NSEQ/NADD/   39..40  ITAB       60..70  HG
//!              NADS                            70..80  FG
//! ```
//!
//! Tabular generators (LTAB > 1) are followed by time, rate and optional
//! enthalpy tables, four values per line, which are skipped.

use crate::scenario::dat_path;
use meta_core::{BoxError, Generator, GeneratorSource, SimulationSpec};
use std::path::{Path, PathBuf};
use thiserror::Error;

const TABULAR_TYPES: &[&str] = &[
    "MASS", "HEAT", "WATE", "AIR", "TRAC", "NACL", "COM1", "COM2", "COM3", "COM4", "COM5",
];

const SECTION_KEYWORDS: &[&str] = &[
    "TITLE", "ROCKS", "MULTI", "START", "PARAM", "SELEC", "INDOM", "INCON", "SOLVR", "LINEQ",
    "TIMES", "ELEME", "CONNE", "GENER", "SHORT", "FOFT", "COFT", "GOFT", "RPCAP", "DIFFU",
    "OUTPU", "MOMOP", "NOVER", "ENDCY", "ENDFI",
];

const TABLE_VALUES_PER_LINE: usize = 4;

#[derive(Debug, Error)]
pub enum DatError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no GENER block found")]
    NoGenerBlock,

    #[error("line {line}: invalid {field} value '{value}'")]
    BadNumber {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: table of generator '{gener}' ends early")]
    TruncatedTable { line: usize, gener: String },

    #[error("line {line}: record is not plain ASCII, columns cannot be located")]
    NonAscii { line: usize },
}

/// Text between byte columns of an ASCII record, empty when the line is shorter.
fn column(line: &str, start: usize, end: usize) -> &str {
    line.get(start..end.min(line.len())).unwrap_or("")
}

/// Rewrites Fortran exponents (`1.5D-3`, `1.5-3`, `-2.0+1`) into Rust float syntax.
fn fortran_exponent(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 1);
    let mut prev: Option<char> = None;
    for c in value.chars() {
        let c = if matches!(c, 'D' | 'd') { 'E' } else { c };
        if matches!(c, '+' | '-') && prev.is_some_and(|p| p.is_ascii_digit() || p == '.') {
            out.push('E');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn parse_float(line: usize, field: &'static str, raw: &str) -> Result<f64, DatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    fortran_exponent(trimmed)
        .parse()
        .map_err(|_| DatError::BadNumber {
            line,
            field,
            value: trimmed.to_string(),
        })
}

fn parse_count(line: usize, field: &'static str, raw: &str) -> Result<usize, DatError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    // Negative LTAB has special meanings in some codes; it never implies a table.
    trimmed
        .parse::<i64>()
        .map(|n| usize::try_from(n).unwrap_or(0))
        .map_err(|_| DatError::BadNumber {
            line,
            field,
            value: trimmed.to_string(),
        })
}

fn is_section_start(line: &str) -> bool {
    SECTION_KEYWORDS.iter().any(|k| line.starts_with(k)) || line.starts_with("+++")
}

struct Record {
    gener: Generator,
    ltab: usize,
    has_enthalpy: bool,
}

fn parse_record(line_no: usize, line: &str) -> Result<Record, DatError> {
    if !line.is_ascii() {
        return Err(DatError::NonAscii { line: line_no });
    }
    let gener = Generator {
        block: column(line, 0, 5).to_string(),
        name: column(line, 5, 10).to_string(),
        gener_type: column(line, 35, 39).trim_end().to_string(),
        mass_target: parse_float(line_no, "GX", column(line, 40, 50))?,
        steam_target: parse_float(line_no, "EX", column(line, 50, 60))?,
        scaling: parse_float(line_no, "HG", column(line, 60, 70))?,
        flow: parse_float(line_no, "FG", column(line, 70, 80))?,
    };
    Ok(Record {
        ltab: parse_count(line_no, "LTAB", column(line, 25, 30))?,
        has_enthalpy: !column(line, 39, 40).trim().is_empty(),
        gener,
    })
}

/// Generators of the GENER block, in file order.
pub fn parse_geners(text: &str) -> Result<Vec<Generator>, DatError> {
    let mut lines = text.lines().enumerate().map(|(i, l)| (i + 1, l));
    if !lines.any(|(_, l)| l.starts_with("GENER")) {
        return Err(DatError::NoGenerBlock);
    }

    let mut geners = Vec::new();
    while let Some((line_no, line)) = lines.next() {
        if line.trim().is_empty() || is_section_start(line) {
            break;
        }
        let record = parse_record(line_no, line)?;
        if record.ltab > 1 && TABULAR_TYPES.contains(&record.gener.gener_type.as_str()) {
            let tables = if record.has_enthalpy { 3 } else { 2 };
            let table_lines = record.ltab.div_ceil(TABLE_VALUES_PER_LINE) * tables;
            for _ in 0..table_lines {
                if lines.next().is_none() {
                    return Err(DatError::TruncatedTable {
                        line: line_no,
                        gener: record.gener.name,
                    });
                }
            }
        }
        geners.push(record.gener);
    }
    Ok(geners)
}

pub fn read_geners(path: &Path) -> Result<Vec<Generator>, DatError> {
    let text = std::fs::read_to_string(path).map_err(|source| DatError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_geners(&text)
}

/// Reads `<root>/<filename>.dat` for each simulation.
#[derive(Debug, Clone)]
pub struct DatGeneratorSource {
    root: PathBuf,
}

impl DatGeneratorSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl GeneratorSource for DatGeneratorSource {
    fn generators(&self, simulation: &SimulationSpec) -> Result<Vec<Generator>, BoxError> {
        let path = dat_path(&self.root, &simulation.filename);
        tracing::info!(path = %path.display(), "loading generators");
        Ok(read_geners(&path)?)
    }
}
