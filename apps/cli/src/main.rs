// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: reassign IFC materials from a CSV lookup table.
//!
//! Usage:
//!   ifc-matmap <input.ifc> <output.ifc> <mapping.csv>
//!
//! The CSV has a header line, then one rule per line: material name,
//! metadata field name, and one or more metadata values that map to that
//! material.

use std::env;
use std::fs;
use std::io::BufWriter;
use std::path::Path;
use std::process;

use ifc_matmap_core::Model;
use ifc_matmap_mapper::{apply_material_mapping, MaterialTable, Result};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 4 {
        print_usage(&args[0]);
        process::exit(1);
    }

    let input = &args[1];
    let output = &args[2];
    let table_path = &args[3];

    for path in [input, table_path] {
        if !Path::new(path).exists() {
            eprintln!("Error: Cannot find file {path}");
            process::exit(1);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    if let Err(e) = run(input, output, table_path) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run(input: &str, output: &str, table_path: &str) -> Result<()> {
    let table = MaterialTable::from_path(table_path)?;
    if table.is_empty() {
        tracing::warn!(table = table_path, "no mapping rules found; nothing to do");
        return Ok(());
    }

    let content = fs::read_to_string(input)?;
    let mut model = Model::parse(&content).map_err(ifc_matmap_mapper::Error::Core)?;
    tracing::info!(input, entities = model.len(), "document loaded");

    let summary = apply_material_mapping(&mut model, &table)?;
    tracing::info!(
        matched = summary.attachments_matched,
        skipped = summary.attachments_skipped,
        products = summary.products_linked,
        clones = summary.clones_made,
        markers = summary.markers_created,
        detached = summary.markers_detached,
        "transformation complete"
    );

    let file = fs::File::create(output)?;
    let mut writer = BufWriter::new(file);
    model.write_step(&mut writer)?;
    tracing::info!(output, "document written");

    Ok(())
}

fn print_usage(program: &str) {
    eprintln!("Usage: {program} <input file> <output file> <csv file>");
}
