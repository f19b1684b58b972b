use crate::core::client::VerificationClient;
use crate::domain::model::{ErrorCategory, LocationQuery, VerificationOutcome};
use crate::utils::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tokio::task::{JoinError, JoinSet};

pub const DEFAULT_CONCURRENCY: usize = 5;

#[derive(Debug, Deserialize)]
struct InputRow {
    latitude: String,
    longitude: String,
    country_code: String,
}

/// One input line: the raw values as written, plus the query they parse into.
#[derive(Debug)]
pub struct BatchEntry {
    pub latitude: String,
    pub longitude: String,
    pub country_code: String,
    pub query: Result<LocationQuery>,
}

impl BatchEntry {
    pub fn new(latitude: &str, longitude: &str, country_code: &str) -> Self {
        let query = parse_coordinate("latitude", latitude).and_then(|lat| {
            let lon = parse_coordinate("longitude", longitude)?;
            LocationQuery::new(lat, lon, country_code)
        });

        Self {
            latitude: latitude.trim().to_string(),
            longitude: longitude.trim().to_string(),
            country_code: country_code.trim().to_string(),
            query,
        }
    }
}

fn parse_coordinate(field: &str, value: &str) -> Result<f64> {
    value.trim().parse::<f64>().map_err(|e| Error::InvalidQuery {
        field: field.to_string(),
        value: value.to_string(),
        reason: e.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub latitude: String,
    pub longitude: String,
    pub country_code: String,
    pub status: &'static str,
    pub is_inside: Option<bool>,
    pub country_name: Option<String>,
    pub checked_at: Option<String>,
    pub category: Option<ErrorCategory>,
    pub reason: Option<String>,
}

impl ReportRow {
    fn new(entry: &BatchEntry, outcome: VerificationOutcome) -> Self {
        let mut row = Self {
            latitude: entry.latitude.clone(),
            longitude: entry.longitude.clone(),
            country_code: entry.country_code.clone(),
            status: "verified",
            is_inside: None,
            country_name: None,
            checked_at: None,
            category: None,
            reason: None,
        };

        match outcome {
            VerificationOutcome::Verified(v) => {
                row.is_inside = Some(v.is_inside);
                row.country_name = Some(v.country_name);
                row.checked_at = Some(v.checked_at);
            }
            VerificationOutcome::Failed(f) => {
                row.status = "failed";
                row.category = Some(f.category);
                row.reason = Some(f.reason);
            }
        }

        row
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub total: usize,
    pub inside: usize,
    pub outside: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        rows.iter().fold(Self::default(), |mut summary, row| {
            summary.total += 1;
            match row.is_inside {
                Some(true) => summary.inside += 1,
                Some(false) => summary.outside += 1,
                None => summary.failed += 1,
            }
            summary
        })
    }
}

/// Checks many queries with a bounded number of requests in flight.
pub struct BatchRunner {
    client: VerificationClient,
    concurrency: usize,
}

impl BatchRunner {
    pub fn new(client: VerificationClient, concurrency: usize) -> Self {
        Self {
            client,
            concurrency: concurrency.max(1),
        }
    }

    /// Reads `latitude,longitude,country_code` rows. Bad values become failing entries;
    /// a structurally broken file is an error.
    pub fn read_entries<R: Read>(reader: R) -> Result<Vec<BatchEntry>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut entries = Vec::new();
        for row in csv_reader.deserialize() {
            let row: InputRow = row?;
            entries.push(BatchEntry::new(
                &row.latitude,
                &row.longitude,
                &row.country_code,
            ));
        }

        tracing::debug!("Read {} batch entries", entries.len());
        Ok(entries)
    }

    /// Runs every entry and returns one report row per entry, in input order.
    ///
    /// At most `concurrency` checks exist at any time; the next one is spawned only after a
    /// running one finishes. The entries and their outcomes are held in memory for the
    /// whole run, so inputs are expected to fit comfortably in RAM.
    pub async fn run(&self, entries: Vec<BatchEntry>) -> Vec<ReportRow> {
        let mut outcomes: Vec<Option<VerificationOutcome>> = vec![None; entries.len()];
        let mut tasks = JoinSet::new();

        for (index, entry) in entries.iter().enumerate() {
            let query = match &entry.query {
                Ok(query) => query.clone(),
                Err(e) => {
                    outcomes[index] = Some(VerificationOutcome::failed(e.to_string(), e.category()));
                    continue;
                }
            };

            while tasks.len() >= self.concurrency {
                if let Some(joined) = tasks.join_next().await {
                    record(&mut outcomes, joined);
                }
            }

            let client = self.client.clone();
            tasks.spawn(async move { (index, client.check(&query).await) });
        }

        while let Some(joined) = tasks.join_next().await {
            record(&mut outcomes, joined);
        }

        entries
            .iter()
            .zip(outcomes)
            .map(|(entry, outcome)| {
                let outcome = outcome.unwrap_or_else(|| {
                    VerificationOutcome::failed(
                        "Check task did not complete",
                        ErrorCategory::NetworkError,
                    )
                });
                ReportRow::new(entry, outcome)
            })
            .collect()
    }

    pub fn write_report<W: Write>(rows: &[ReportRow], writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    /// Reads `input`, checks every row and writes the report to `output`.
    pub async fn run_io<R: Read, W: Write>(&self, input: R, output: W) -> Result<BatchSummary> {
        let entries = Self::read_entries(input)?;
        let rows = self.run(entries).await;
        Self::write_report(&rows, output)?;

        let summary = BatchSummary::from_rows(&rows);
        tracing::info!(
            "Batch finished: {} checked, {} inside, {} outside, {} failed",
            summary.total,
            summary.inside,
            summary.outside,
            summary.failed
        );
        Ok(summary)
    }
}

fn record(
    outcomes: &mut [Option<VerificationOutcome>],
    joined: std::result::Result<(usize, VerificationOutcome), JoinError>,
) {
    match joined {
        Ok((index, outcome)) => outcomes[index] = Some(outcome),
        Err(e) => tracing::error!("Batch check task failed: {}", e),
    }
}
