use std::path::Path;

use crate::config::AnalysisConfig;
use crate::data::loader::{load_file, ParsedRows};
use crate::data::model::{SeriesIndex, TemperatureKey};
use crate::data::powerset::{power_set, PowerSet};
use crate::data::sets::SetRelations;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Analysis – the result of one run
// ---------------------------------------------------------------------------

/// Everything derived from one input file. Built once, read by the reports.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Fields of the skipped header row, if any.
    pub header: Option<Vec<String>>,
    pub index: SeriesIndex,
    pub relations: SetRelations,
    /// Power set of the intersection.
    pub power_set: PowerSet<TemperatureKey>,
}

impl Analysis {
    /// Read `path` and run the whole pipeline on it.
    pub fn from_file(path: &Path, config: &AnalysisConfig) -> Result<Self, LoadError> {
        let rows = load_file(path, config.header)?;
        Ok(Self::from_rows(rows, config))
    }

    /// Index parsed rows, then derive the sets and the power set.
    pub fn from_rows(rows: ParsedRows, config: &AnalysisConfig) -> Self {
        let index = SeriesIndex::build(rows.outcomes);
        log::info!(
            "{} rows accepted, {} rejected; {} distinct {} values, {} distinct {} values",
            index.tally.accepted,
            index.tally.rejected(),
            index.north.values.len(),
            config.north_label,
            index.northeast.values.len(),
            config.northeast_label,
        );

        let relations = SetRelations::compute(&index, &config.threshold);
        let power_set = power_set(&relations.intersection, config.power_set_ceiling);

        Analysis {
            header: rows.header,
            index,
            relations,
            power_set,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::HeaderPolicy;
    use crate::data::loader::read_rows;
    use crate::data::model::KeySet;

    fn rendered(set: &KeySet) -> Vec<&str> {
        set.iter().map(TemperatureKey::as_str).collect()
    }

    fn analyse(text: &str, config: &AnalysisConfig) -> Analysis {
        let rows = read_rows(text.as_bytes(), config.header).unwrap();
        Analysis::from_rows(rows, config)
    }

    #[test]
    fn end_to_end_scenario() {
        let config = AnalysisConfig::default();
        let analysis = analyse(
            "2024-01-01,30.0,31.5\n2024-01-02,31.5,31.50\nbad,x,y\n",
            &config,
        );

        assert_eq!(rendered(&analysis.index.north.values), ["30.00", "31.50"]);
        assert_eq!(rendered(&analysis.index.northeast.values), ["31.50"]);
        assert_eq!(rendered(&analysis.relations.intersection), ["31.50"]);
        assert_eq!(rendered(&analysis.relations.difference), ["30.00"]);
        assert_eq!(analysis.index.tally.rejected(), 1);
        assert_eq!(analysis.index.tally.parse_rejected, 1);
        assert_eq!(analysis.index.tally.accepted, 2);

        let subsets: Vec<Vec<&str>> = analysis
            .power_set
            .subsets
            .iter()
            .map(|s| s.iter().map(TemperatureKey::as_str).collect())
            .collect();
        assert_eq!(subsets, vec![vec![], vec!["31.50"]]);
        assert!(analysis.power_set.truncation.is_none());
    }

    #[test]
    fn coincidence_across_decimal_comma() {
        let analysis = analyse("2024-01-01,30.0,30,00\n", &AnalysisConfig::default());
        // "30,00" splits into two fields, so the northeast value is "30".
        let key: TemperatureKey = "30.00".parse().unwrap();
        assert_eq!(analysis.index.coincidences_for(&key), ["2024-01-01"]);
    }

    #[test]
    fn intersection_over_ceiling_is_truncated() {
        let config = AnalysisConfig {
            power_set_ceiling: 3,
            ..AnalysisConfig::default()
        };
        let text: String = (0..5).map(|i| format!("d{i},{i},{i}\n")).collect();
        let analysis = analyse(&text, &config);

        assert_eq!(analysis.relations.intersection.len(), 5);
        assert_eq!(analysis.power_set.len(), 8);
        let warning = analysis.power_set.truncation.unwrap();
        assert_eq!(warning.theoretical_subsets(), Some(32));
    }

    #[test]
    fn default_ceiling_enumerates_twenty_of_twenty_one() {
        let text: String = (0..21).map(|i| format!("d{i},{i},{i}\n")).collect();
        let analysis = analyse(&text, &AnalysisConfig::default());

        assert_eq!(analysis.relations.intersection.len(), 21);
        assert_eq!(analysis.power_set.len(), 1 << 20);
        let warning = analysis.power_set.truncation.unwrap();
        assert_eq!(warning.enumerated, 20);
        assert_eq!(warning.theoretical_subsets(), Some(1 << 21));
    }

    #[test]
    fn header_is_kept_for_the_report() {
        let analysis = analyse(
            "date,north,northeast\n2024-01-01,34,35\n",
            &AnalysisConfig {
                header: HeaderPolicy::Auto,
                ..AnalysisConfig::default()
            },
        );
        assert!(analysis.header.is_some());
        assert_eq!(rendered(&analysis.relations.universe), ["34.00", "35.00"]);
        assert_eq!(rendered(&analysis.relations.complement), ["35.00"]);
    }

    #[test]
    fn from_file_reads_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "2024-01-01,30.0,31.5").unwrap();
        writeln!(file, "2024-01-02,31.5,31.50").unwrap();
        let analysis = Analysis::from_file(file.path(), &AnalysisConfig::default()).unwrap();
        assert_eq!(analysis.index.tally.accepted, 2);
    }
}
