use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::RowError;

use super::normalize::{normalize, InvalidNumber};

// ---------------------------------------------------------------------------
// TemperatureKey – the unit of set membership
// ---------------------------------------------------------------------------

/// Canonical two-decimal rendering of a measured temperature (`-?\d+\.\d{2}`).
///
/// Two readings are the same temperature iff their keys are equal. Keys are
/// only produced by [`normalize`], so equality on the text is exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemperatureKey(String);

impl TemperatureKey {
    pub(crate) fn from_canonical(text: String) -> Self {
        TemperatureKey(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn is_negative(&self) -> bool {
        self.0.starts_with('-')
    }

    /// Integer and fraction digits without the sign.
    fn magnitude(&self) -> (&str, &str) {
        let body = self.0.trim_start_matches('-');
        body.split_once('.').unwrap_or((body, ""))
    }

    fn cmp_magnitude(&self, other: &Self) -> Ordering {
        let (a_int, a_frac) = self.magnitude();
        let (b_int, b_frac) = other.magnitude();
        a_int
            .len()
            .cmp(&b_int.len())
            .then_with(|| a_int.cmp(b_int))
            .then_with(|| a_frac.cmp(b_frac))
    }
}

// -- Numeric ordering straight off the canonical text --

impl Ord for TemperatureKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_negative(), other.is_negative()) {
            (false, true) => Ordering::Greater,
            (true, false) => Ordering::Less,
            (false, false) => self.cmp_magnitude(other),
            (true, true) => other.cmp_magnitude(self),
        }
    }
}

impl PartialOrd for TemperatureKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for TemperatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TemperatureKey {
    type Err = InvalidNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        normalize(s)
    }
}

impl TryFrom<String> for TemperatureKey {
    type Error = InvalidNumber;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        normalize(&value)
    }
}

impl From<TemperatureKey> for String {
    fn from(key: TemperatureKey) -> Self {
        key.0
    }
}

// ---------------------------------------------------------------------------
// Collections
// ---------------------------------------------------------------------------

/// Distinct keys in first-seen order.
pub type KeySet = IndexSet<TemperatureKey>;

/// Key → dates on which it was observed, in input row order, duplicates kept.
pub type DateIndex = IndexMap<TemperatureKey, Vec<String>>;

/// The two measuring stations, in column order of the input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Station {
    North,
    Northeast,
}

impl Station {
    pub const ALL: [Station; 2] = [Station::North, Station::Northeast];

    /// Column name used in diagnostics.
    pub fn column(self) -> &'static str {
        match self {
            Station::North => "north",
            Station::Northeast => "northeast",
        }
    }
}

// ---------------------------------------------------------------------------
// Row outcomes
// ---------------------------------------------------------------------------

/// One accepted input row with both temperatures canonicalised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reading {
    /// 1-based line number in the input file.
    pub line: u64,
    /// Date token exactly as it appeared (trimmed).
    pub date: String,
    pub north: TemperatureKey,
    pub northeast: TemperatureKey,
}

impl Reading {
    pub fn key(&self, station: Station) -> &TemperatureKey {
        match station {
            Station::North => &self.north,
            Station::Northeast => &self.northeast,
        }
    }
}

/// What became of a single input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Accepted(Reading),
    Rejected(RowError),
}

/// Running counters for the build pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowTally {
    pub accepted: usize,
    pub shape_rejected: usize,
    pub parse_rejected: usize,
}

impl RowTally {
    pub fn rejected(&self) -> usize {
        self.shape_rejected + self.parse_rejected
    }

    pub fn total(&self) -> usize {
        self.accepted + self.rejected()
    }
}

// ---------------------------------------------------------------------------
// StationIndex / SeriesIndex – the output of the single build pass
// ---------------------------------------------------------------------------

/// Everything observed at one station.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StationIndex {
    /// Distinct keys in first-seen order.
    pub values: KeySet,
    /// Dates per key.
    pub dates: DateIndex,
}

impl StationIndex {
    fn record(&mut self, key: &TemperatureKey, date: &str) {
        self.values.insert(key.clone());
        self.dates.entry(key.clone()).or_default().push(date.to_string());
    }

    /// Dates on which `key` was observed here (empty if never).
    pub fn dates_for(&self, key: &TemperatureKey) -> &[String] {
        self.dates.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Per-station value sets and date indexes plus same-row coincidences.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SeriesIndex {
    pub north: StationIndex,
    pub northeast: StationIndex,
    /// Keys observed at both stations on the same row, with that row's date.
    pub coincidences: DateIndex,
    pub tally: RowTally,
}

impl SeriesIndex {
    /// Fold row outcomes into the index in one linear pass.
    pub fn build<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = RowOutcome>,
    {
        let mut index = SeriesIndex::default();
        for outcome in outcomes {
            index.push(outcome);
        }
        index
    }

    fn push(&mut self, outcome: RowOutcome) {
        match outcome {
            RowOutcome::Accepted(reading) => {
                for station in Station::ALL {
                    self.station_mut(station).record(reading.key(station), &reading.date);
                }
                if reading.north == reading.northeast {
                    log::debug!("line {}: both stations at {}", reading.line, reading.north);
                    self.coincidences
                        .entry(reading.north)
                        .or_default()
                        .push(reading.date);
                }
                self.tally.accepted += 1;
            }
            RowOutcome::Rejected(err) => {
                log::warn!("skipping row: {err}");
                match err {
                    RowError::Shape { .. } => self.tally.shape_rejected += 1,
                    RowError::Parse { .. } => self.tally.parse_rejected += 1,
                }
            }
        }
    }

    fn station_mut(&mut self, station: Station) -> &mut StationIndex {
        match station {
            Station::North => &mut self.north,
            Station::Northeast => &mut self.northeast,
        }
    }

    /// Same-row coincidence dates for `key` (empty if none).
    pub fn coincidences_for(&self, key: &TemperatureKey) -> &[String] {
        self.coincidences.get(key).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
