use std::io::{self, Write};

use anyhow::Result;
use clap::Args;
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::{ContentArrangement, Table};
use scour_mutators::{Catalog, CompositeFactory, MutatorMeta};
use serde::Serialize;

#[derive(Args, Debug, Default, Clone)]
#[command(about = "Show the available mutators and composites")]
pub struct ListArgs {
    /// List composites instead of single mutators
    #[arg(long)]
    pub composites: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CompositeEntry<'a> {
    id: &'a str,
    description: &'a str,
    version_filtered: bool,
}

impl<'a> From<&'a CompositeFactory> for CompositeEntry<'a> {
    fn from(factory: &'a CompositeFactory) -> Self {
        CompositeEntry {
            id: factory.id(),
            description: factory.description(),
            version_filtered: factory.needs_version(),
        }
    }
}

pub fn execute(args: ListArgs) -> Result<()> {
    let catalog = Catalog::load()?;
    let mut out = io::stdout().lock();

    if args.composites {
        let entries: Vec<CompositeEntry> = catalog
            .composite_factories()
            .iter()
            .map(CompositeEntry::from)
            .collect();
        if args.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        } else {
            write_composite_table(&entries, out)?;
        }
        return Ok(());
    }

    let metas: Vec<&MutatorMeta> = catalog.mutators().iter().map(|m| m.meta()).collect();
    if args.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&metas)?)?;
    } else {
        write_mutator_table(&metas, out)?;
    }
    Ok(())
}

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_BORDERS_ONLY)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

fn write_mutator_table<W: Write>(metas: &[&MutatorMeta], mut writer: W) -> io::Result<()> {
    let mut table = new_table();
    table.set_header(vec!["Id", "Aliases", "Since", "Status", "Description"]);
    for meta in metas {
        let aliases = meta.ids.iter().skip(1).cloned().collect::<Vec<_>>().join(", ");
        let status = if meta.draft { "draft" } else { "ready" };
        table.add_row(vec![
            meta.primary_id().unwrap_or_default().to_string(),
            aliases,
            meta.min_version.to_string(),
            status.to_string(),
            meta.description.clone(),
        ]);
    }
    writeln!(writer, "{table}")
}

fn write_composite_table<W: Write>(entries: &[CompositeEntry], mut writer: W) -> io::Result<()> {
    let mut table = new_table();
    table.set_header(vec!["Id", "Version filtered", "Description"]);
    for entry in entries {
        table.add_row(vec![
            entry.id,
            if entry.version_filtered { "yes" } else { "no" },
            entry.description,
        ]);
    }
    writeln!(writer, "{table}")
}
