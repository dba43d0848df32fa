use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use punpinyin::{Engine, Query};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Sound-alike pun generator over Chinese idioms, sayings and word lists.
#[derive(Parser)]
#[command(name = "pungen", version)]
struct Args {
    /// Dictionary configuration (TOML). The built-in demo corpus is used
    /// when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate puns for a word and print them as JSON.
    Generate {
        word: String,
        /// Category to search; repeat for several. Defaults to all.
        #[arg(long = "type", value_name = "NAME")]
        types: Vec<String>,
        /// Require matched characters to keep their order.
        #[arg(long)]
        ordered: bool,
        /// Print only this page (0-based) of each category.
        #[arg(long)]
        page: Option<usize>,
    },
    /// Menu groups and their categories.
    Categories,
    /// Every category in search priority order.
    TypesOrdered,
    /// Categories selected by default.
    TypesDefault,
    /// Read words from stdin and print the top puns per category.
    Interactive {
        #[arg(long = "type", value_name = "NAME")]
        types: Vec<String>,
        #[arg(long)]
        ordered: bool,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn interactive(engine: &Engine, types: Vec<String>, ordered: bool) -> Result<()> {
    let stats = engine.stats();
    eprintln!(
        "pungen: {} records in {} categories. Type a word and press Enter, Ctrl+D to exit.",
        stats.items, stats.categories
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    for line in stdin.lock().lines() {
        let line = line?;
        let word = line.trim();
        if word.is_empty() {
            continue;
        }
        let query = Query::new(word)
            .with_categories(types.iter().cloned())
            .ignore_order(!ordered);
        let results = engine.generate(&query);
        if results.total() == 0 {
            writeln!(stdout, "  → (no puns found)\n")?;
            continue;
        }
        for (category, list) in results.iter() {
            if list.is_empty() {
                continue;
            }
            let page = engine.page(list, 0);
            writeln!(stdout, "[{}] {} result(s)", category, list.len())?;
            for (i, r) in page.items().iter().take(5).enumerate() {
                let origins: Vec<&str> = r.origins.iter().map(String::as_str).collect();
                writeln!(stdout, "  {}. {}  ← {}", i + 1, r.pun, origins.join(" / "))?;
            }
        }
        writeln!(stdout)?;
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let engine = match &args.config {
        Some(path) => Engine::from_config_file(path)?,
        None => Engine::demo(),
    };

    match args.command {
        Command::Generate {
            word,
            types,
            ordered,
            page,
        } => {
            let query = Query::new(word).with_categories(types).ignore_order(!ordered);
            let results = engine.generate(&query);
            match page {
                Some(n) => print_json(&engine.paged(&results, n))?,
                None => print_json(&results)?,
            }
        }
        Command::Categories => print_json(&engine.category_map())?,
        Command::TypesOrdered => print_json(&engine.all_types_ordered())?,
        Command::TypesDefault => print_json(&engine.default_selected_types())?,
        Command::Interactive { types, ordered } => interactive(&engine, types, ordered)?,
    }
    Ok(())
}
