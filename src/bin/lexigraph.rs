//! Lexigraph CLI — integrity reports and repairs for a catalog database.
//!
//! Usage:
//!   lexigraph report all [--json] [--db path]
//!   lexigraph repair merge <original> <duplicate>... [--db path]

use clap::{Parser, Subcommand, ValueEnum};
use lexigraph::{
    CatalogStore, FieldSelector, IntegrityAnalyzer, IntegrityReport, ItemId, LinkId, LinkOrStrip,
    NewItem, OpenStore, RepairExecutor, SqliteStore, TextField,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lexigraph",
    version,
    about = "Referential-integrity engine for tag-linked knowledge catalogs"
)]
struct Cli {
    /// Path to the catalog database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    /// Enable debug logging
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run integrity checks and print the findings
    Report {
        /// Which check to run
        #[arg(value_enum, default_value = "all")]
        check: Check,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Apply corrective mutations
    Repair {
        #[command(subcommand)]
        action: RepairAction,
    },
    /// Manage catalog items
    Item {
        #[command(subcommand)]
        action: ItemAction,
    },
    /// Show catalog totals
    Stats,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Check {
    All,
    Unlinked,
    Hidden,
    Dangling,
    Duplicates,
    SelfRefs,
    Orphans,
    UnknownCategories,
    MissingDefinitions,
    UnknownTags,
}

#[derive(Subcommand)]
enum RepairAction {
    /// Create a link between two existing items
    Link {
        source: i64,
        destination: i64,
        #[arg(long, default_value = "reference")]
        link_type: String,
    },
    /// Delete a link by id
    Unlink { link_id: i64 },
    /// Link to the referenced word, or strip its tags if the word is unknown
    LinkOrStrip { source: i64, word: String },
    /// Remove any link to the referenced word and strip its tags
    Detach { source: i64, word: String },
    /// Rewrite matching tags to bare text in one field (or all fields)
    StripTag {
        item: i64,
        word: String,
        #[arg(long, value_enum)]
        field: Option<Field>,
    },
    /// Merge duplicate items into an original
    Merge {
        original: i64,
        #[arg(required = true)]
        duplicates: Vec<i64>,
    },
    /// Delete every link with a missing endpoint
    PurgeDangling,
}

#[derive(Subcommand)]
enum ItemAction {
    /// Create an item
    Add {
        word: String,
        #[arg(long, default_value = "Word")]
        category: String,
        #[arg(long)]
        definition: Option<String>,
    },
    /// Print one item
    Show { item: i64 },
    /// Delete an item
    Rm { item: i64 },
}

#[derive(Clone, Copy, ValueEnum)]
enum Field {
    Definition,
    Derivation,
    Appendices,
}

impl From<Field> for TextField {
    fn from(field: Field) -> Self {
        match field {
            Field::Definition => TextField::Definition,
            Field::Derivation => TextField::Derivation,
            Field::Appendices => TextField::Appendices,
        }
    }
}

/// Get the default database path (~/.local/share/lexigraph/catalog.db)
fn default_db_path() -> PathBuf {
    let data_dir = dirs::data_dir()
        .unwrap_or_else(|| dirs::home_dir().unwrap_or_default().join(".local/share"));
    data_dir.join("lexigraph").join("catalog.db")
}

fn open_store(db: Option<PathBuf>) -> Result<SqliteStore, String> {
    let db_path = db.unwrap_or_else(default_db_path);
    SqliteStore::open(&db_path).map_err(|e| format!("Failed to open database: {}", e))
}

fn cmd_report(store: &SqliteStore, check: Check, json: bool) -> i32 {
    let snapshot = match store.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };
    let report = IntegrityAnalyzer::new().run(&snapshot);

    if json {
        return print_json(&report, check);
    }
    print_text(&report, check);
    0
}

fn print_json(report: &IntegrityReport, check: Check) -> i32 {
    let value = match check {
        Check::All => serde_json::to_value(report),
        Check::Unlinked => serde_json::to_value(&report.unlinked_references),
        Check::Hidden => serde_json::to_value(&report.hidden_links),
        Check::Dangling => serde_json::to_value(&report.dangling_links),
        Check::Duplicates => serde_json::to_value(&report.duplicates),
        Check::SelfRefs => serde_json::to_value(&report.self_references),
        Check::Orphans => serde_json::to_value(&report.orphans),
        Check::UnknownCategories => serde_json::to_value(&report.unknown_categories),
        Check::MissingDefinitions => serde_json::to_value(&report.missing_definitions),
        Check::UnknownTags => serde_json::to_value(&report.unknown_tags),
    };
    match value.and_then(|v| serde_json::to_string_pretty(&v)) {
        Ok(out) => {
            println!("{}", out);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn print_text(report: &IntegrityReport, check: Check) {
    let all = check == Check::All;

    if all || check == Check::Unlinked {
        section("Unlinked references", report.unlinked_references.len());
        for entry in &report.unlinked_references {
            for offending in &entry.refs {
                println!(
                    "  #{:<6} {:<24} {:?} ({:?})",
                    entry.item_id, entry.word, offending.text, offending.reason
                );
            }
        }
    }
    if all || check == Check::Hidden {
        section("Links not reflected in text", report.hidden_links.len());
        for entry in &report.hidden_links {
            println!(
                "  #{:<6} {:<24} missing: {}",
                entry.item_id,
                entry.word,
                entry.missing_words.join(", ")
            );
        }
    }
    if all || check == Check::Dangling {
        section("Dangling links", report.dangling_links.len());
        for entry in &report.dangling_links {
            println!(
                "  link {:<6} {} -> {}  missing {:?} (source: {})",
                entry.link_id,
                entry.source_item_id,
                entry.destination_item_id,
                entry.missing_side,
                entry.source_word.as_deref().unwrap_or("?")
            );
        }
    }
    if all || check == Check::Duplicates {
        section("Duplicate items", report.duplicates.len());
        for group in &report.duplicates {
            let duplicates: Vec<String> = group
                .duplicates
                .iter()
                .map(|d| format!("#{} {:?}", d.item_id, d.word))
                .collect();
            println!(
                "  {:<24} original #{} {:?}, duplicates: {}",
                group.key,
                group.original.item_id,
                group.original.word,
                duplicates.join(", ")
            );
        }
    }
    if all || check == Check::SelfRefs {
        section("Self-referential items", report.self_references.len());
        for entry in &report.self_references {
            println!("  #{:<6} {:<24} {}", entry.item_id, entry.word, entry.tag);
        }
    }
    if all || check == Check::Orphans {
        section("Orphaned items", report.orphans.len());
        for entry in &report.orphans {
            println!("  #{:<6} {:<24} {}", entry.item_id, entry.word, entry.category);
        }
    }
    if all || check == Check::UnknownCategories {
        section("Unknown categories", report.unknown_categories.len());
        for entry in &report.unknown_categories {
            println!(
                "  #{:<6} {:<24} {:?} ({} incoming)",
                entry.item_id, entry.word, entry.category, entry.incoming_links
            );
        }
    }
    if all || check == Check::MissingDefinitions {
        section("Missing definitions", report.missing_definitions.len());
        for entry in &report.missing_definitions {
            let kind = if entry.placeholder { "placeholder" } else { "empty" };
            println!("  #{:<6} {:<24} {}", entry.item_id, entry.word, kind);
        }
    }
    if all || check == Check::UnknownTags {
        section("Unknown tags", report.unknown_tags.len());
        for entry in &report.unknown_tags {
            println!(
                "  #{:<6} {:<24} {}",
                entry.item_id,
                entry.word,
                entry.tags.join(", ")
            );
        }
    }
}

fn section(title: &str, count: usize) {
    println!("{} ({})", title, count);
}

fn cmd_repair(store: &SqliteStore, action: RepairAction) -> i32 {
    let executor = RepairExecutor::new(store);
    let outcome = match action {
        RepairAction::Link {
            source,
            destination,
            link_type,
        } => executor
            .create_link(ItemId::new(source), ItemId::new(destination), &link_type)
            .map(|link| format!("Created link {}", link.id)),
        RepairAction::Unlink { link_id } => executor
            .delete_link(LinkId::new(link_id))
            .map(|_| format!("Deleted link {}", link_id)),
        RepairAction::LinkOrStrip { source, word } => executor
            .link_or_strip(ItemId::new(source), &word)
            .map(|result| match result {
                LinkOrStrip::Linked(link) => {
                    format!("Added link {} to {}", link.id, link.destination)
                }
                LinkOrStrip::Stripped { changed: true } => {
                    format!("Removed nonexistent reference to {}", word)
                }
                LinkOrStrip::Stripped { changed: false } => "No changes needed".to_string(),
            }),
        RepairAction::Detach { source, word } => executor
            .detach_reference(ItemId::new(source), &word)
            .map(|changed| {
                if changed {
                    format!("Detached reference to {}", word)
                } else {
                    format!("No tags for {} found", word)
                }
            }),
        RepairAction::StripTag { item, word, field } => {
            let selector = match field {
                Some(field) => FieldSelector::One(field.into()),
                None => FieldSelector::All,
            };
            executor
                .strip_tag(ItemId::new(item), selector, &word)
                .map(|changed| {
                    if changed {
                        format!("Stripped tags for {}", word)
                    } else {
                        "No changes needed".to_string()
                    }
                })
        }
        RepairAction::Merge {
            original,
            duplicates,
        } => {
            let duplicate_ids: Vec<ItemId> = duplicates.into_iter().map(ItemId::new).collect();
            executor
                .merge_duplicates(ItemId::new(original), &duplicate_ids)
                .map(|outcome| {
                    format!(
                        "Merged {} item(s): {} link(s) rewritten, {} dropped",
                        outcome.items_deleted, outcome.links_rewritten, outcome.links_dropped
                    )
                })
        }
        RepairAction::PurgeDangling => executor
            .purge_dangling_links()
            .map(|purged| format!("Purged {} dangling link(s)", purged)),
    };

    match outcome {
        Ok(message) => {
            println!("{}", message);
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn cmd_item(store: &SqliteStore, action: ItemAction) -> i32 {
    match action {
        ItemAction::Add {
            word,
            category,
            definition,
        } => {
            let mut item = NewItem::new(word, category);
            if let Some(definition) = definition {
                item = item.with_definition(definition);
            }
            match store.create_item(item) {
                Ok(item) => {
                    println!("Created item {} ({:?})", item.id, item.word);
                    0
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    1
                }
            }
        }
        ItemAction::Show { item } => match store.get_item(ItemId::new(item)) {
            Ok(Some(item)) => {
                println!("#{}  {}  [{}]", item.id, item.word, item.category);
                for (field, text) in item.text_fields() {
                    println!("  {}: {}", field.as_str(), text);
                }
                0
            }
            Ok(None) => {
                eprintln!("Error: item {} not found", item);
                1
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
        ItemAction::Rm { item } => match store.delete_item(ItemId::new(item)) {
            Ok(true) => {
                println!("Deleted item {}", item);
                0
            }
            Ok(false) => {
                eprintln!("Error: item {} not found", item);
                1
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                1
            }
        },
    }
}

fn cmd_stats(store: &SqliteStore) -> i32 {
    match store.stats() {
        Ok(stats) => {
            println!("{:<16} {:>7}", "ITEMS", stats.items);
            println!("{:<16} {:>7}", "LINKS", stats.links);
            for (category, count) in &stats.items_by_category {
                println!("  {:<14} {:>7}", category, count);
            }
            0
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .init();

    let store = match open_store(cli.db) {
        Ok(store) => store,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let code = match cli.command {
        Commands::Report { check, json } => cmd_report(&store, check, json),
        Commands::Repair { action } => cmd_repair(&store, action),
        Commands::Item { action } => cmd_item(&store, action),
        Commands::Stats => cmd_stats(&store),
    };
    std::process::exit(code);
}
