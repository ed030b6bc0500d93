//! List and Get commands.

use crate::documents::{Document, EntityType};
use crate::indexing::WorkspaceIndexer;

/// Run list command - document summaries, optionally filtered by type.
pub fn run_list(indexer: &WorkspaceIndexer, entity_type: Option<EntityType>, json: bool) {
    let summaries = match indexer.list(entity_type) {
        Ok(summaries) => summaries,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if json {
        print_json(&summaries);
        return;
    }

    if summaries.is_empty() {
        match entity_type {
            Some(entity_type) => println!("No documents of type '{entity_type}' indexed."),
            None => println!("No documents indexed. Run 'worklens index' first."),
        }
        return;
    }

    for summary in &summaries {
        let status = summary.status.as_deref().unwrap_or("-");
        println!(
            "{:<28} {:<9} {:<10} {}",
            summary.id, summary.entity_type, status, summary.title
        );
    }
    println!();
    println!(
        "{} document{}",
        summaries.len(),
        if summaries.len() == 1 { "" } else { "s" }
    );
}

/// Run get command - one full record by id.
pub fn run_get(indexer: &WorkspaceIndexer, id: &str, json: bool) {
    let document = match indexer.get(id) {
        Ok(Some(document)) => document,
        Ok(None) => {
            eprintln!("No document found with id: {id}");
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    if json {
        print_json(&document);
        return;
    }

    print_record(&document);
}

fn print_record(document: &Document) {
    println!("id:      {}", document.id);
    println!("type:    {}", document.entity_type);
    println!("title:   {}", document.title);
    println!("path:    {}", document.path.display());
    if let Some(owner) = &document.owner {
        println!("owner:   {owner}");
    }
    if let Some(status) = &document.status {
        println!("status:  {status}");
    }
    println!("updated: {}", document.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));
    println!();
    print!("{}", document.content);
}

fn print_json(value: &impl serde::Serialize) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            eprintln!("Error serializing output: {e}");
            std::process::exit(1);
        }
    }
}
