//! Status command handler

use anyhow::Result;
use std::fs;

use shelf_core::{Config, Library};

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(library: &Library, config: &Config, output: &Output) -> Result<()> {
    let books_path = config.books_path();
    let collection_exists = books_path.exists();
    let collection_size = fs::metadata(&books_path).map(|m| m.len()).unwrap_or(0);

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "sync_enabled": config.sync_enabled,
                    "sync_url": config.sync_url,
                    "storage": {
                        "collection_exists": collection_exists,
                        "collection_size": collection_size,
                    },
                    "counts": {
                        "books": library.book_count(),
                        "quotes": library.quote_count()
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", library.book_count());
        }
        OutputFormat::Human => {
            println!("Shelf Status");
            println!("============");
            println!();
            println!("Collection:");
            println!("  Books:  {}", library.book_count());
            println!("  Quotes: {}", library.quote_count());
            println!();
            println!("Storage:");
            println!("  File: {}", books_path.display());
            if collection_exists {
                println!("  Size: {} bytes", collection_size);
            } else {
                println!("  Size: (not yet written)");
            }
            println!();
            println!("Sheet sync:");
            println!(
                "  Status: {}",
                if config.sync_enabled {
                    "enabled"
                } else {
                    "disabled"
                }
            );
            if let Some(ref url) = config.sync_url {
                println!("  Endpoint: {}", url);
            }
        }
    }

    Ok(())
}
