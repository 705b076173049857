//! Flat feature database with brute-force nearest-neighbor retrieval.
//!
//! Records are kept in insertion order; duplicate name/frame pairs are legal
//! (multiple source recordings may reuse names). The store is read-only after
//! loading. Retrieval is an intentional linear scan; recordings hold
//! thousands of frames, not millions, and the reference behavior is exact.
//!
//! Canonical row layout, one record per line:
//! `name, frame, f0, ..., f26` (29 comma-separated fields). The frame index
//! is read from the data, never inferred from line order.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::DatabaseError;
use crate::feature::{FeatureVector, FEATURE_DIM};

/// One loaded database row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatabaseRecord {
    pub name: String,
    /// Frame index within the named sequence.
    pub frame: usize,
    pub features: [f32; FEATURE_DIM],
}

/// Result of a nearest-neighbor query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryMatch {
    /// Sequence name of the winning record.
    pub name: String,
    /// Winning frame normalized to `[0, 1]` within its sequence.
    pub time: f32,
}

/// Ordered collection of feature records, queryable by Euclidean distance.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FeatureDatabase {
    records: Vec<DatabaseRecord>,
}

impl FeatureDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from serialized rows. Any malformed field aborts the load with
    /// the offending 1-based line number.
    pub fn parse(text: &str) -> Result<Self, DatabaseError> {
        let mut db = Self::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            db.records.push(parse_record(line, index + 1)?);
        }
        log::debug!("loaded feature database: {} records", db.records.len());
        Ok(db)
    }

    pub fn from_reader(reader: impl BufRead) -> Result<Self, DatabaseError> {
        let mut db = Self::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            db.records.push(parse_record(&line, index + 1)?);
        }
        log::debug!("loaded feature database: {} records", db.records.len());
        Ok(db)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn add(&mut self, record: DatabaseRecord) {
        self.records.push(record);
    }

    /// Append one record per extracted feature vector.
    pub fn extend_from_vectors(&mut self, vectors: &[FeatureVector]) {
        for vector in vectors {
            self.records.push(DatabaseRecord {
                name: vector.name.clone(),
                frame: vector.frame,
                features: vector.to_array(),
            });
        }
    }

    /// Serialize all records in the canonical row layout.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for record in &self.records {
            write!(writer, "{}, {}", record.name, record.frame)?;
            for value in record.features {
                write!(writer, ", {value}")?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    #[inline]
    pub fn records(&self) -> &[DatabaseRecord] {
        &self.records
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Nearest record to `query`, mapped to a normalized playback position
    /// within its sequence. Ties break to the first-seen record (stable scan).
    pub fn query(&self, query: &[f32; FEATURE_DIM]) -> Result<QueryMatch, DatabaseError> {
        let (record, distance) = self.closest_record(query).ok_or(DatabaseError::Empty)?;

        // Sequence length = records sharing the winner's name, case-insensitive.
        let length = self
            .records
            .iter()
            .filter(|r| r.name.eq_ignore_ascii_case(&record.name))
            .count();
        let time = (record.frame as f32 / length.saturating_sub(1).max(1) as f32).clamp(0.0, 1.0);

        log::debug!(
            "matched sequence {} frame {}/{} distance {:.4}",
            record.name,
            record.frame,
            length,
            distance
        );
        Ok(QueryMatch {
            name: record.name.clone(),
            time,
        })
    }

    /// Nearest record and its distance, without time normalization.
    pub fn closest_record(&self, query: &[f32; FEATURE_DIM]) -> Option<(&DatabaseRecord, f32)> {
        let mut best: Option<(&DatabaseRecord, f32)> = None;
        for record in &self.records {
            let d = distance(query, &record.features);
            if best.map_or(true, |(_, bd)| d < bd) {
                best = Some((record, d));
            }
        }
        best
    }
}

/// Euclidean distance over the 27-dimensional feature space.
fn distance(a: &[f32; FEATURE_DIM], b: &[f32; FEATURE_DIM]) -> f32 {
    let mut sum = 0.0f32;
    for i in 0..FEATURE_DIM {
        let diff = a[i] - b[i];
        sum += diff * diff;
    }
    sum.sqrt()
}

fn parse_record(line: &str, line_number: usize) -> Result<DatabaseRecord, DatabaseError> {
    let malformed = |reason: String| DatabaseError::Malformed {
        line: line_number,
        reason,
    };

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FEATURE_DIM + 2 {
        return Err(malformed(format!(
            "expected {} fields, found {}",
            FEATURE_DIM + 2,
            fields.len()
        )));
    }

    let name = fields[0].to_string();
    if name.is_empty() {
        return Err(malformed("empty sequence name".to_string()));
    }
    let frame: usize = fields[1]
        .parse()
        .map_err(|_| malformed(format!("invalid frame index '{}'", fields[1])))?;

    let mut features = [0.0f32; FEATURE_DIM];
    for (i, field) in fields[2..].iter().enumerate() {
        features[i] = field
            .parse()
            .map_err(|_| malformed(format!("invalid feature field {i}: '{field}'")))?;
    }

    Ok(DatabaseRecord {
        name,
        frame,
        features,
    })
}
