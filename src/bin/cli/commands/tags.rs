use anyhow::{bail, Result};

use crate::app::App;
use crate::OutputFormat;

pub fn run_list(app: &App, format: &OutputFormat) -> Result<()> {
    let tags = app.store.list_tags()?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&tags)?);
        }
        OutputFormat::Plain => {
            if tags.is_empty() {
                println!("No tags found.");
                return Ok(());
            }
            for tag in &tags {
                println!("#{}", tag);
            }
            println!("\n{} tags total", tags.len());
        }
    }

    Ok(())
}

pub fn run_add(app: &App, name: &str, format: &OutputFormat) -> Result<()> {
    if name.trim().is_empty() {
        bail!("Tag name is required");
    }
    app.store.add_tag(name)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "added": name.trim() }));
        }
        OutputFormat::Plain => {
            println!("Added tag #{}", name.trim());
        }
    }

    Ok(())
}

pub fn run_rename(app: &App, old: &str, new: &str, format: &OutputFormat) -> Result<()> {
    if !app.store.rename_tag(old, new)? {
        bail!(
            "Could not rename '{}' to '{}' (missing, identical, or already taken)",
            old,
            new
        );
    }

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::json!({ "old": old, "new": new }));
        }
        OutputFormat::Plain => {
            println!("Renamed #{} to #{}", old, new);
        }
    }

    Ok(())
}
