//! Items command handler for browsing the catalog.

use anyhow::Result;
use serde::Serialize;

use fitsim_lib::Catalog;

use crate::config::OutputFormat;

#[derive(Debug, Serialize)]
struct ItemSummary<'a> {
    id: i64,
    name: &'a str,
    group: &'a str,
    category: &'a str,
    effects: usize,
}

/// Handle the items subcommand.
///
/// Lists catalog items sorted by ID, optionally restricted to names
/// containing `search` (case-insensitive).
pub fn handle_items(catalog: &Catalog, search: Option<&str>, format: OutputFormat) -> Result<()> {
    let needle = search.map(|s| s.to_lowercase());
    let items: Vec<ItemSummary<'_>> = catalog
        .items_sorted()
        .into_iter()
        .filter(|item| {
            needle
                .as_deref()
                .is_none_or(|needle| item.name.to_lowercase().contains(needle))
        })
        .map(|item| ItemSummary {
            id: item.id,
            name: &item.name,
            group: &item.group.name,
            category: &item.group.category,
            effects: item.effects().len(),
        })
        .collect();

    match format {
        OutputFormat::Text => print_items(&items),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&items)?),
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(std::io::stdout());
            for item in &items {
                writer.serialize(item)?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

fn print_items(items: &[ItemSummary<'_>]) {
    if items.is_empty() {
        println!("No matching items in catalog.");
        return;
    }

    println!("Items ({}):", items.len());
    println!(
        "{:>8} {:<30} {:<24} {:<10} {:>7}",
        "ID", "Name", "Group", "Category", "Effects"
    );
    for item in items {
        println!(
            "{:>8} {:<30} {:<24} {:<10} {:>7}",
            item.id, item.name, item.group, item.category, item.effects
        );
    }
}
