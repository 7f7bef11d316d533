use std::io::Write;

use anyhow::Result;
use indexmap::IndexSet;
use serde::Serialize;

use crate::analysis::Analysis;
use crate::config::AnalysisConfig;
use crate::data::model::{DateIndex, RowTally, StationIndex, TemperatureKey};
use crate::data::powerset::CapacityWarning;
use crate::data::sets::SetRelations;

#[derive(Serialize)]
struct StationReport<'a> {
    label: &'a str,
    #[serde(flatten)]
    index: &'a StationIndex,
}

#[derive(Serialize)]
struct PowerSetReport<'a> {
    count: usize,
    truncation: Option<CapacityWarning>,
    /// `2^n` for the untruncated input, as text since it may not fit a u64.
    theoretical_count: Option<String>,
    subsets: &'a [IndexSet<TemperatureKey>],
    withheld: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    header: Option<&'a [String]>,
    rows: RowTally,
    north: StationReport<'a>,
    northeast: StationReport<'a>,
    coincidences: &'a DateIndex,
    relations: &'a SetRelations,
    power_set: PowerSetReport<'a>,
}

/// Serialise the analysis as one pretty-printed JSON document.
///
/// Subsets are capped at `config.display_limit` like the text report; every
/// other collection is written in full and in its insertion order.
pub fn write_json_report<W: Write>(
    w: &mut W,
    analysis: &Analysis,
    config: &AnalysisConfig,
) -> Result<()> {
    let ps = &analysis.power_set;
    let shown = config.display_limit.min(ps.len());

    let report = JsonReport {
        header: analysis.header.as_deref(),
        rows: analysis.index.tally,
        north: StationReport {
            label: &config.north_label,
            index: &analysis.index.north,
        },
        northeast: StationReport {
            label: &config.northeast_label,
            index: &analysis.index.northeast,
        },
        coincidences: &analysis.index.coincidences,
        relations: &analysis.relations,
        power_set: PowerSetReport {
            count: ps.len(),
            truncation: ps.truncation,
            theoretical_count: ps.truncation.map(|t| match t.theoretical_subsets() {
                Some(n) => n.to_string(),
                None => format!("2^{}", t.requested),
            }),
            subsets: &ps.subsets[..shown],
            withheld: ps.len() - shown,
        },
    };

    serde_json::to_writer_pretty(&mut *w, &report)?;
    writeln!(w)?;
    Ok(())
}
