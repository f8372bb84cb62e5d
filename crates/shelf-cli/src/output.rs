//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use shelf_core::{Book, Quote};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single book (with its quotes in display order)
    pub fn print_book(&self, book: &Book) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", book.id);
                println!("Title:     {}", book.title);
                println!("Author:    {}", book.author);
                if let Some(ref isbn) = book.isbn {
                    println!("ISBN:      {}", isbn);
                }
                if !book.genre.is_empty() {
                    println!("Genre:     {}", book.genre);
                }
                println!("Rating:    {}", stars(book.rating));
                if book.page_count > 0 {
                    println!("Pages:     {}", book.page_count);
                }
                if let Some(date) = book.completion_date {
                    println!("Finished:  {}", date);
                }
                println!("Cover:     {}", book.cover_image);
                if !book.summary.is_empty() {
                    println!();
                    println!("{}", book.summary);
                }

                let quotes = book.sorted_quotes();
                if !quotes.is_empty() {
                    println!();
                    println!("── Quotes ({}) ──", quotes.len());
                    for quote in &quotes {
                        self.print_quote_line(quote);
                    }
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(book).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", book.id);
            }
        }
    }

    /// Print a list of books
    pub fn print_books(&self, books: &[Book]) {
        match self.format {
            OutputFormat::Human => {
                if books.is_empty() {
                    println!("No books found.");
                    return;
                }
                for book in books {
                    let quotes_indicator = if book.quotes.is_empty() {
                        String::new()
                    } else {
                        format!(" [{}]", book.quotes.len())
                    };
                    println!(
                        "{} | {}{} | {} | {}",
                        &book.id.to_string()[..8],
                        truncate(&book.title, 35),
                        quotes_indicator,
                        truncate(&book.author, 25),
                        stars(book.rating)
                    );
                }
                println!("\n{} book(s)", books.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(books).unwrap());
            }
            OutputFormat::Quiet => {
                for book in books {
                    println!("{}", book.id);
                }
            }
        }
    }

    /// Print the quotes of a book, in display order
    pub fn print_quotes(&self, book: &Book) {
        let quotes = book.sorted_quotes();
        match self.format {
            OutputFormat::Human => {
                println!("Quotes for: {} - {}", &book.id.to_string()[..8], book.title);
                println!();

                if quotes.is_empty() {
                    println!("No quotes on this book.");
                    return;
                }

                for quote in &quotes {
                    self.print_quote_line(quote);
                }
                println!("\n{} quote(s)", quotes.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&quotes).unwrap());
            }
            OutputFormat::Quiet => {
                for quote in &quotes {
                    println!("{}", quote.id);
                }
            }
        }
    }

    /// Print quote search results paired with their owning books
    pub fn print_quote_matches(&self, matches: &[(Quote, Book)]) {
        match self.format {
            OutputFormat::Human => {
                if matches.is_empty() {
                    println!("No quotes found.");
                    return;
                }
                for (quote, book) in matches {
                    println!("\"{}\"", quote.text);
                    let page = quote.page.to_string();
                    if page.is_empty() {
                        println!("  — {} ({})", book.title, book.author);
                    } else {
                        println!("  — {} ({}), p. {}", book.title, book.author, page);
                    }
                }
                println!("\n{} match(es)", matches.len());
            }
            OutputFormat::Json => {
                let json_matches: Vec<_> = matches
                    .iter()
                    .map(|(quote, book)| serde_json::json!({"quote": quote, "book": book}))
                    .collect();
                println!("{}", serde_json::to_string_pretty(&json_matches).unwrap());
            }
            OutputFormat::Quiet => {
                for (quote, _) in matches {
                    println!("{}", quote.id);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print a non-fatal warning (shown even in quiet mode)
    pub fn warn(&self, message: &str) {
        match self.format {
            OutputFormat::Json => {
                eprintln!(
                    "{}",
                    serde_json::json!({"status": "warning", "message": message})
                );
            }
            _ => eprintln!("⚠ {}", message),
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    fn print_quote_line(&self, quote: &Quote) {
        let page = quote.page.to_string();
        if page.is_empty() {
            println!("[{}] {}", &quote.id.to_string()[..8], quote.text);
        } else {
            println!("[{}] p.{} — {}", &quote.id.to_string()[..8], page, quote.text);
        }
    }
}

/// Render a 0-5 rating as stars
fn stars(rating: u8) -> String {
    let filled = rating.min(5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

/// Truncate a string to max length, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_flags() {
        assert_eq!(OutputFormat::from_flags(false, false), OutputFormat::Human);
        assert_eq!(OutputFormat::from_flags(true, false), OutputFormat::Json);
        assert_eq!(OutputFormat::from_flags(false, true), OutputFormat::Quiet);
        // Quiet takes precedence
        assert_eq!(OutputFormat::from_flags(true, true), OutputFormat::Quiet);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("this is a long string", 10), "this is...");
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(0), "☆☆☆☆☆");
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(9), "★★★★★");
    }
}
