//! Training corpus CSV: one header row, then
//! `net_ev,volatility,efficiency,capital_required,user_bankroll,recommendation`.

use std::io::{Read, Write};

use common::{Error, FeatureRow, Recommendation, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};

pub const CSV_COLUMNS: [&str; 6] = [
    "net_ev",
    "volatility",
    "efficiency",
    "capital_required",
    "user_bankroll",
    "recommendation",
];

/// One labeled feature row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingRecord {
    pub features: FeatureRow,
    pub recommendation: Recommendation,
}

// Flat on-disk shape; the csv crate cannot serialize flattened structs.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    net_ev: f64,
    volatility: f64,
    efficiency: f64,
    capital_required: f64,
    user_bankroll: f64,
    recommendation: Recommendation,
}

impl From<&TrainingRecord> for CsvRow {
    fn from(record: &TrainingRecord) -> Self {
        let f = &record.features;
        Self {
            net_ev: f.net_ev,
            volatility: f.volatility,
            efficiency: f.efficiency,
            capital_required: f.capital_required,
            user_bankroll: f.user_bankroll,
            recommendation: record.recommendation,
        }
    }
}

impl From<CsvRow> for TrainingRecord {
    fn from(row: CsvRow) -> Self {
        Self {
            features: FeatureRow {
                net_ev: row.net_ev,
                volatility: row.volatility,
                efficiency: row.efficiency,
                capital_required: row.capital_required,
                user_bankroll: row.user_bankroll,
            },
            recommendation: row.recommendation,
        }
    }
}

fn to_error(err: csv::Error) -> Error {
    let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
    let message = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(e) => Error::Io(e),
        _ => Error::Dataset { line, message },
    }
}

/// Streams records into a corpus; the header is written on creation.
pub struct CorpusWriter<W: Write> {
    inner: csv::Writer<W>,
}

impl<W: Write> CorpusWriter<W> {
    pub fn new(out: W) -> Result<Self> {
        // Header written by hand so an empty corpus still carries it.
        let mut inner = WriterBuilder::new().has_headers(false).from_writer(out);
        inner.write_record(CSV_COLUMNS).map_err(to_error)?;
        Ok(Self { inner })
    }

    pub fn write(&mut self, record: &TrainingRecord) -> Result<()> {
        self.inner.serialize(CsvRow::from(record)).map_err(to_error)
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }
}

/// Read a corpus. Any standard CSV quoting is accepted; columns must match
/// [`CSV_COLUMNS`] in order.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<TrainingRecord>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().map_err(to_error)?;
    if headers.is_empty() {
        return Err(Error::Dataset {
            line: 0,
            message: "empty dataset".into(),
        });
    }
    if !headers.iter().eq(CSV_COLUMNS.iter().copied()) {
        return Err(Error::Dataset {
            line: 1,
            message: format!("expected header '{}'", CSV_COLUMNS.join(",")),
        });
    }

    rdr.deserialize::<CsvRow>()
        .map(|row| row.map(TrainingRecord::from).map_err(to_error))
        .collect()
}
