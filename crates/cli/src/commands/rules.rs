//! Rules command — show the catalog the installed tool reports

use crate::OutputFormat;
use anyhow::Result;
use colored::Colorize;
use lintrelay_core::{AdapterError, RelayConfig, RuleCatalog};

pub fn run(format: OutputFormat) -> Result<()> {
    let config = RelayConfig::find_and_load(std::path::Path::new("."))?;

    let work_dir = std::env::temp_dir().join("lintrelay-rules");
    std::fs::create_dir_all(&work_dir)?;

    let env = config.env.scrubbed();
    let relay = |line: &str| -> Result<(), AdapterError> {
        log::info!("{line}");
        Ok(())
    };
    let catalog = RuleCatalog::discover(&config, &work_dir, &env, &relay)?;

    match format {
        OutputFormat::Json => {
            let entries: Vec<serde_json::Value> = catalog
                .iter()
                .map(|(id, severity)| {
                    serde_json::json!({ "id": id, "severity": severity.as_str() })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
        OutputFormat::Terminal => {
            for (id, severity) in catalog.iter() {
                println!("  {:<14} {}", severity.to_string().yellow(), id);
            }
            println!(
                "\n  {} rules reported by the installed tool",
                catalog.len().to_string().bold()
            );
        }
    }

    Ok(())
}
