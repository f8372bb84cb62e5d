//! Shelf CLI
//!
//! Command-line interface for Shelf - a personal book-tracking application
//! with local JSON storage and one-way sheet sync.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use shelf_core::{Config, JsonStore, Library, SearchMode};

mod commands;
mod metadata;
mod output;
mod review;

use commands::book::BookFields;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "shelf")]
#[command(about = "Shelf - personal book tracking with sheet sync")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage books
    Book {
        #[command(subcommand)]
        command: BookCommands,
    },
    /// Manage quotes on a book
    Quote {
        #[command(subcommand)]
        command: QuoteCommands,
    },
    /// Look up book metadata by ISBN (informational only)
    Lookup {
        /// ISBN to look up
        isbn: String,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (collection counts, storage, sync settings)
    Status,
}

#[derive(Subcommand)]
enum BookCommands {
    /// Add a new book
    #[command(alias = "create")]
    Add {
        /// Book title
        title: String,
        /// Author name
        #[arg(short, long)]
        author: String,
        #[command(flatten)]
        fields: BookFields,
        /// Prefill missing fields from Open Library (requires --isbn)
        #[arg(long)]
        lookup: bool,
    },
    /// List all books
    #[command(alias = "ls")]
    List,
    /// Show book details (including quotes)
    Show {
        /// Book ID (full UUID or prefix)
        id: String,
    },
    /// Update a book
    #[command(alias = "edit")]
    Update {
        /// Book ID (full UUID or prefix)
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New author
        #[arg(short, long)]
        author: Option<String>,
        #[command(flatten)]
        fields: BookFields,
    },
    /// Delete a book
    #[command(alias = "rm")]
    Delete {
        /// Book ID (full UUID or prefix)
        id: String,
    },
    /// Search books or quotes
    Search {
        /// Search query
        query: String,
        /// What to match against
        #[arg(long, value_enum, default_value_t = SearchBy::Title)]
        by: SearchBy,
    },
    /// Generate an AI review and store it as the summary
    Review {
        /// Book ID (full UUID or prefix)
        id: String,
    },
}

#[derive(Subcommand)]
enum QuoteCommands {
    /// Add a quote to a book
    #[command(alias = "create")]
    Add {
        /// Book ID (full UUID or prefix)
        book_id: String,
        /// The quoted text
        text: String,
        /// Page reference (number or free text like "xii" or "102-104")
        #[arg(short, long)]
        page: Option<String>,
    },
    /// List quotes on a book, in display order
    #[command(alias = "ls")]
    List {
        /// Book ID (full UUID or prefix)
        book_id: String,
    },
    /// Update a quote
    #[command(alias = "edit")]
    Update {
        /// Book ID (full UUID or prefix)
        book_id: String,
        /// Quote ID (full UUID or prefix)
        quote_id: String,
        /// New text
        #[arg(long)]
        text: Option<String>,
        /// New page reference
        #[arg(short, long)]
        page: Option<String>,
    },
    /// Delete a quote from a book
    #[command(alias = "rm")]
    Delete {
        /// Book ID (full UUID or prefix)
        book_id: String,
        /// Quote ID (full UUID or prefix)
        quote_id: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, sync_url, sync_enabled)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Search target for `book search`
#[derive(Debug, Clone, Copy, ValueEnum)]
enum SearchBy {
    Title,
    Author,
    Quote,
}

impl From<SearchBy> for SearchMode {
    fn from(by: SearchBy) -> Self {
        match by {
            SearchBy::Title => SearchMode::Title,
            SearchBy::Author => SearchMode::Author,
            SearchBy::Quote => SearchMode::Quote,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Config commands don't need the library
    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command.clone(), &output);
    }

    // Metadata lookup doesn't touch local state at all
    if let Commands::Lookup { isbn } = &cli.command {
        return handle_lookup(isbn, &output).await;
    }

    let config = Config::load()?;
    let mut library = Library::new(JsonStore::open(config.data_dir.clone()));

    match cli.command {
        Commands::Book { command } => {
            handle_book_command(command, &mut library, &config, &output).await
        }
        Commands::Quote { command } => {
            handle_quote_command(command, &mut library, &config, &output).await
        }
        Commands::Status => commands::status::show(&library, &config, &output),
        Commands::Config { .. } | Commands::Lookup { .. } => unreachable!(), // Handled above
    }
}

async fn handle_book_command(
    command: BookCommands,
    library: &mut Library,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        BookCommands::Add {
            title,
            author,
            fields,
            lookup,
        } => commands::book::add(library, config, title, author, fields, lookup, output).await,
        BookCommands::List => commands::book::list(library, output),
        BookCommands::Show { id } => commands::book::show(library, id, output),
        BookCommands::Update {
            id,
            title,
            author,
            fields,
        } => commands::book::update(library, config, id, title, author, fields, output).await,
        BookCommands::Delete { id } => commands::book::delete(library, id, output),
        BookCommands::Search { query, by } => {
            commands::book::search_books(library, query, by.into(), output)
        }
        BookCommands::Review { id } => {
            commands::book::generate_review(library, config, id, output).await
        }
    }
}

async fn handle_quote_command(
    command: QuoteCommands,
    library: &mut Library,
    config: &Config,
    output: &Output,
) -> Result<()> {
    match command {
        QuoteCommands::Add {
            book_id,
            text,
            page,
        } => commands::quote::add(library, config, book_id, text, page, output).await,
        QuoteCommands::List { book_id } => commands::quote::list(library, book_id, output),
        QuoteCommands::Update {
            book_id,
            quote_id,
            text,
            page,
        } => commands::quote::update(library, config, book_id, quote_id, text, page, output).await,
        QuoteCommands::Delete { book_id, quote_id } => {
            commands::quote::delete(library, config, book_id, quote_id, output).await
        }
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

async fn handle_lookup(isbn: &str, output: &Output) -> Result<()> {
    match metadata::fetch_by_isbn(isbn).await {
        Some(found) => {
            if output.is_json() {
                println!(
                    "{}",
                    serde_json::json!({
                        "title": found.title,
                        "author": found.author,
                        "page_count": found.page_count,
                        "cover_image": found.cover_image,
                    })
                );
            } else {
                println!("Title:  {}", found.title);
                println!("Author: {}", found.author);
                if found.page_count > 0 {
                    println!("Pages:  {}", found.page_count);
                }
                if let Some(cover) = found.cover_image {
                    println!("Cover:  {}", cover);
                }
            }
            Ok(())
        }
        None => {
            anyhow::bail!("No book found for ISBN {}", isbn);
        }
    }
}
