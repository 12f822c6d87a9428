//! The `amt --action report` command.

use std::path::Path;

use anyhow::Result;

use amt_core::config::AmtConfig;
use amt_report::{write_html_report, SystemCard};

pub fn execute(config: &AmtConfig, card_path: &Path) -> Result<()> {
    let card = SystemCard::load(card_path)?;
    let output = config.report_path();

    write_html_report(&card, &output)?;
    println!("Report written to {}", output.display());

    Ok(())
}
