use std::io::{self, Write};

use indexmap::IndexSet;

use crate::analysis::Analysis;
use crate::config::AnalysisConfig;
use crate::data::model::{Station, TemperatureKey};

// ---------------------------------------------------------------------------
// Human-readable report
// ---------------------------------------------------------------------------

/// Write every report section in a fixed order: row tally, union,
/// intersection details, difference details, universe and complement,
/// then the power-set listing capped at `config.display_limit`.
pub fn write_text_report<W: Write>(
    w: &mut W,
    analysis: &Analysis,
    config: &AnalysisConfig,
) -> io::Result<()> {
    let a = config.label(Station::North);
    let b = config.label(Station::Northeast);
    let index = &analysis.index;
    let rel = &analysis.relations;

    write_tally(w, analysis)?;
    writeln!(w)?;

    writeln!(
        w,
        "Distinct temperatures: {a} (A) {}, {b} (B) {}",
        index.north.values.len(),
        index.northeast.values.len()
    )?;
    writeln!(w, "Union (A ∪ B): {}", rel.union.len())?;
    writeln!(w)?;

    // ---- Intersection ----
    writeln!(w, "Intersection (A ∩ B): {}", rel.intersection.len())?;
    let width = a.len().max(b.len()) + 1;
    for key in &rel.intersection {
        writeln!(w, "{key}°C")?;
        writeln!(w, "  {:<width$} {}", format!("{a}:"), dates(index.north.dates_for(key)))?;
        writeln!(w, "  {:<width$} {}", format!("{b}:"), dates(index.northeast.dates_for(key)))?;
        let same = index.coincidences_for(key);
        if !same.is_empty() {
            writeln!(w, "  Same date at both: {}", dates(same))?;
        }
    }
    writeln!(w)?;

    // ---- Difference ----
    writeln!(w, "Difference (A − B): {}", rel.difference.len())?;
    for key in &rel.difference {
        writeln!(w, "{key}°C  |  {a} dates: {}", dates(index.north.dates_for(key)))?;
    }
    writeln!(w)?;

    // ---- Universe / complement ----
    writeln!(w, "Temperatures above {}°C (U): {}", rel.threshold, rel.universe.len())?;
    writeln!(w, "Complement of A (U \\ A): {}", rel.complement.len())?;
    for key in &rel.complement {
        let combined = rel.universe_dates.get(key).map(Vec::as_slice).unwrap_or(&[]);
        writeln!(w, "{key}°C  |  {a}+{b} dates: {}", dates(combined))?;
    }
    writeln!(w)?;

    write_power_set(w, analysis, config.display_limit)
}

fn write_tally<W: Write>(w: &mut W, analysis: &Analysis) -> io::Result<()> {
    let tally = &analysis.index.tally;
    writeln!(
        w,
        "Rows: {} read, {} accepted, {} rejected ({} malformed, {} unparsable)",
        tally.total(),
        tally.accepted,
        tally.rejected(),
        tally.shape_rejected,
        tally.parse_rejected
    )?;
    if let Some(header) = &analysis.header {
        writeln!(w, "Header skipped: {}", header.join(","))?;
    }
    Ok(())
}

fn write_power_set<W: Write>(w: &mut W, analysis: &Analysis, limit: usize) -> io::Result<()> {
    let ps = &analysis.power_set;
    writeln!(w, "P(A ∩ B): {} subsets", ps.len())?;
    if let Some(warning) = &ps.truncation {
        writeln!(w, "Warning: {warning}")?;
    }

    let shown = limit.min(ps.len());
    writeln!(w, "First {shown} subsets of P(A ∩ B):")?;
    for subset in ps.subsets.iter().take(shown) {
        writeln!(w, "{}", braces(subset))?;
    }
    if ps.len() > shown {
        writeln!(w, "... ({} subsets not shown)", ps.len() - shown)?;
    }
    Ok(())
}

fn dates(list: &[String]) -> String {
    format!("[{}]", list.join(", "))
}

fn braces(subset: &IndexSet<TemperatureKey>) -> String {
    let items: Vec<&str> = subset.iter().map(TemperatureKey::as_str).collect();
    format!("{{{}}}", items.join(", "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
