//! Rendering an [`Analysis`] for people (`text`) or scripts (`json`).

pub mod json;
pub mod text;

use std::io::Write;

use anyhow::Result;

use crate::analysis::Analysis;
use crate::config::AnalysisConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

pub fn write_report<W: Write>(
    w: &mut W,
    analysis: &Analysis,
    config: &AnalysisConfig,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Text => text::write_text_report(w, analysis, config)?,
        OutputFormat::Json => json::write_json_report(w, analysis, config)?,
    }
    w.flush()?;
    Ok(())
}
