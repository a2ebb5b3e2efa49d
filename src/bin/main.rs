use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use catalog_ui::books::dto::BookDto;
use catalog_ui::catalog::client::{BookCatalogClient, CatalogApi};
use catalog_ui::catalog::response::{ApiResponse, ResponseData};
use catalog_ui::samples::loader::SampleStore;
use catalog_ui::utils::trace::setup_tracing;

/// Terminal front end for the Book Catalog Service.
#[derive(Parser)]
#[command(name = "catalog-ui")]
struct Cli {
    /// Base address of the catalog service.
    #[arg(long)]
    base_url: Option<String>,
    /// Directory holding bundled import samples.
    #[arg(long)]
    sample_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all books in the catalog.
    List,
    /// Show a single book by ISBN.
    Get { isbn: String },
    /// Add a new book.
    Add {
        isbn: String,
        #[command(flatten)]
        book: BookArgs,
    },
    /// Replace the book stored under an ISBN.
    Update {
        isbn: String,
        #[command(flatten)]
        book: BookArgs,
    },
    /// Delete a book by ISBN.
    Delete { isbn: String },
    /// Import a catalog payload from a file or a bundled sample.
    Import {
        #[arg(long, default_value = "json")]
        format: String,
        #[arg(long, conflicts_with = "sample")]
        file: Option<PathBuf>,
        #[arg(long)]
        sample: Option<String>,
    },
    /// Export the catalog in the requested format.
    Export {
        #[arg(long, default_value = "json")]
        format: String,
    },
    /// Revert the most recent catalog mutation.
    Undo,
    /// List bundled import samples.
    Samples,
}

#[derive(Args)]
struct BookArgs {
    #[arg(long)]
    title: String,
    #[arg(long)]
    author: String,
    #[arg(long)]
    publisher: String,
    #[arg(long)]
    pages: u32,
}

fn build_book(isbn: &str, args: &BookArgs) -> BookDto {
    BookDto::new(
        args.title.as_str(),
        args.author.as_str(),
        isbn,
        args.publisher.as_str(),
        args.pages,
    )
}

#[tokio::main]
async fn main() {
    setup_tracing();
    let cli = Cli::parse();
    let client = BookCatalogClient::new(cli.base_url.as_deref());
    let store = match cli.sample_dir {
        Some(dir) => SampleStore::new(dir),
        None => SampleStore::default(),
    };
    if !run(&cli.command, &client, &store).await {
        std::process::exit(1);
    }
}

async fn run(command: &Command, client: &dyn CatalogApi, store: &SampleStore) -> bool {
    let response = match command {
        Command::List => client.list_books().await,
        Command::Get { isbn } => client.get_book(isbn).await,
        Command::Add { isbn, book } => client.add_book(&build_book(isbn, book)).await,
        Command::Update { isbn, book } => {
            client.update_book(isbn, &build_book(isbn, book)).await
        }
        Command::Delete { isbn } => client.delete_book(isbn).await,
        Command::Import { format, file, sample } => {
            // A sample carries its own format; --format applies to --file.
            let (format, content) = match (file, sample) {
                (_, Some(name)) => match store.load_import_sample(name) {
                    Some(sample) => (sample.format, sample.content),
                    None => {
                        eprintln!("No sample named {} is available", name);
                        return false;
                    }
                },
                (Some(path), None) => match std::fs::read_to_string(path) {
                    Ok(content) => (format.clone(), content),
                    Err(err) => {
                        eprintln!("Cannot read {}: {}", path.display(), err);
                        return false;
                    }
                },
                (None, None) => {
                    eprintln!("import needs --file or --sample");
                    return false;
                }
            };
            client.import_catalog(format.as_str(), content.as_str()).await
        }
        Command::Export { format } => client.export_catalog(format).await,
        Command::Undo => client.undo_last().await,
        Command::Samples => {
            let names = store.list_sample_files();
            if names.is_empty() {
                println!("No samples available in {}", store.dir().display());
            }
            for name in names {
                println!("{}", name);
            }
            return true;
        }
    };
    match response.failure_summary() {
        Some(summary) => {
            eprintln!("{}", summary);
            false
        }
        None => {
            render(&response);
            true
        }
    }
}

fn render(response: &ApiResponse) {
    match &response.data {
        Some(ResponseData::Books(books)) => render_books(books),
        Some(ResponseData::Book(book)) => render_books(std::slice::from_ref(book)),
        Some(ResponseData::Import(outcome)) => println!("Imported {} records", outcome.count),
        Some(ResponseData::Export(doc)) => println!("{}", doc.content),
        Some(ResponseData::Undo(snapshot)) => {
            println!("Remaining undos: {}", snapshot.remaining_undos);
            render_books(&snapshot.books);
        }
        None => println!("OK"),
    }
}

fn render_books(books: &[BookDto]) {
    if books.is_empty() {
        println!("No books available.");
        return;
    }
    println!(
        "{:<16} {:<28} {:<20} {:<16} {:>6}",
        "ISBN", "TITLE", "AUTHOR", "PUBLISHER", "PAGES"
    );
    for book in books {
        println!(
            "{:<16} {:<28} {:<20} {:<16} {:>6}",
            book.isbn, book.title, book.author, book.publisher, book.pages
        );
    }
}
