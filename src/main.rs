//! shelfrank CLI: reading catalog and top-K book recommendations.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use rand::SeedableRng;

use shelfrank::config::ShelfConfig;
use shelfrank::coverage::EngineKind;
use shelfrank::library::{
    ActiveFilter, Catalog, LibraryError, NoopNotifier, SeedPlan, seed_catalog,
};
use shelfrank::model::{BookId, ReaderId, coverage_entries};
use shelfrank::paths::ShelfPaths;
use shelfrank::rank::BookNameLookup;
use shelfrank::service::RecommendationService;

#[derive(Parser)]
#[command(name = "shelfrank", version, about = "Reading coverage and book recommendations")]
struct Cli {
    /// Data directory holding the catalog (and config, unless --config is given).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Path to the TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and write a default config.
    Init,

    /// Manage books.
    Book {
        #[command(subcommand)]
        action: BookAction,
    },

    /// Manage readers.
    Reader {
        #[command(subcommand)]
        action: ReaderAction,
    },

    /// Submit and manage reading intervals.
    Interval {
        #[command(subcommand)]
        action: IntervalAction,
    },

    /// Show distinct pages read per book.
    Coverage {
        /// Coverage engine (sweep or reference).
        #[arg(long)]
        engine: Option<EngineKind>,
    },

    /// Show the top-K most read books.
    Top {
        /// Number of books to return.
        #[arg(long)]
        k: Option<usize>,

        /// Coverage engine (sweep or reference).
        #[arg(long)]
        engine: Option<EngineKind>,

        /// Sweep books in parallel.
        #[arg(long)]
        parallel: bool,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Cross-check the sequential and parallel sweeps against the reference engine.
    Verify,

    /// Fill the catalog with random demo data.
    Seed {
        #[arg(long, default_value = "10")]
        readers: usize,

        #[arg(long, default_value = "10")]
        books: usize,

        /// RNG seed for reproducible data.
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

#[derive(Subcommand)]
enum BookAction {
    /// Add a book.
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        pages: u32,
    },
    /// Change a book's title and page count.
    Update {
        id: u64,
        #[arg(long)]
        title: String,
        #[arg(long)]
        pages: u32,
    },
    /// List books, newest first.
    List {
        /// all, active, or inactive.
        #[arg(long, default_value = "all")]
        status: ActiveFilter,
    },
    /// Show one book.
    Show { id: u64 },
    /// Mark a book inactive.
    Deactivate { id: u64 },
    /// Mark a book active again.
    Restore { id: u64 },
}

#[derive(Subcommand)]
enum ReaderAction {
    /// Register a reader.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
    },
    /// List readers.
    List,
}

#[derive(Subcommand)]
enum IntervalAction {
    /// Submit pages start..=end of a book as read.
    Submit {
        #[arg(long)]
        reader: u64,
        #[arg(long)]
        book: u64,
        #[arg(long)]
        start: u32,
        #[arg(long)]
        end: u32,
    },
    /// Change the page range of a submission, optionally moving it.
    Update {
        id: u64,
        /// Move the submission to this reader.
        #[arg(long)]
        reader: Option<u64>,
        /// Move the submission to this book.
        #[arg(long)]
        book: Option<u64>,
        #[arg(long)]
        start: u32,
        #[arg(long)]
        end: u32,
    },
    /// Delete a submission.
    Remove { id: u64 },
    /// List submissions, newest first.
    List,
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => ShelfPaths::rooted(dir),
        None => ShelfPaths::resolve()?,
    };
    let config_path = cli.config.unwrap_or_else(|| paths.config_file());
    let config = ShelfConfig::load_or_default(&config_path)?;

    match cli.command {
        Commands::Init => {
            paths.ensure_dirs()?;
            if config_path.exists() {
                println!("Config already present at {}", config_path.display());
            } else {
                config.save(&config_path)?;
                println!("Wrote default config to {}", config_path.display());
            }
            println!("Catalog directory: {}", paths.library_dir().display());
        }

        Commands::Book { action } => {
            let mut catalog = Catalog::open_with(&paths.library_dir(), &config)?;

            match action {
                BookAction::Add { title, pages } => {
                    let book = catalog.add_book(&title, pages)?;
                    println!(
                        "Added book {} \"{}\" ({} pages)",
                        book.id, book.title, book.number_of_pages
                    );
                }
                BookAction::Update { id, title, pages } => {
                    let book = catalog.update_book(BookId(id), &title, pages)?;
                    println!(
                        "Updated book {} \"{}\" ({} pages)",
                        book.id, book.title, book.number_of_pages
                    );
                }
                BookAction::List { status } => {
                    let books = catalog.books(status);
                    if books.is_empty() {
                        println!("No books.");
                    } else {
                        println!("Books ({}):", books.len());
                        for book in &books {
                            println!(
                                "  {} \"{}\" {} pages{}",
                                book.id,
                                book.title,
                                book.number_of_pages,
                                if book.is_active { "" } else { " [inactive]" }
                            );
                        }
                    }
                }
                BookAction::Show { id } => {
                    let book = catalog
                        .book(BookId(id))
                        .ok_or(LibraryError::BookNotFound { id })?;
                    let json = serde_json::to_string_pretty(book).into_diagnostic()?;
                    println!("{json}");
                }
                BookAction::Deactivate { id } => {
                    let book = catalog.deactivate_book(BookId(id))?;
                    println!("Deactivated book {} \"{}\"", book.id, book.title);
                }
                BookAction::Restore { id } => {
                    let book = catalog.restore_book(BookId(id))?;
                    println!("Restored book {} \"{}\"", book.id, book.title);
                }
            }
        }

        Commands::Reader { action } => {
            let mut catalog = Catalog::open_with(&paths.library_dir(), &config)?;

            match action {
                ReaderAction::Add { name, email } => {
                    let reader = catalog.add_reader(&name, &email)?;
                    println!("Added reader {} ({})", reader.id, reader.name);
                }
                ReaderAction::List => {
                    let readers = catalog.readers();
                    if readers.is_empty() {
                        println!("No readers.");
                    } else {
                        println!("Readers ({}):", readers.len());
                        for reader in readers {
                            println!("  {} {} <{}>", reader.id, reader.name, reader.email);
                        }
                    }
                }
            }
        }

        Commands::Interval { action } => {
            let mut catalog = Catalog::open_with(&paths.library_dir(), &config)?;

            match action {
                IntervalAction::Submit {
                    reader,
                    book,
                    start,
                    end,
                } => {
                    let sub = catalog.submit_interval(ReaderId(reader), BookId(book), start, end)?;
                    println!(
                        "Accepted interval {}: book {} pages {}-{}",
                        sub.id, sub.interval.book_id, sub.interval.start_page, sub.interval.end_page
                    );
                }
                IntervalAction::Update {
                    id,
                    reader,
                    book,
                    start,
                    end,
                } => {
                    let sub = catalog.update_interval(
                        id,
                        reader.map(ReaderId),
                        book.map(BookId),
                        start,
                        end,
                    )?;
                    println!(
                        "Updated interval {}: reader {} book {} pages {}-{}",
                        sub.id,
                        sub.reader_id,
                        sub.interval.book_id,
                        sub.interval.start_page,
                        sub.interval.end_page
                    );
                }
                IntervalAction::Remove { id } => {
                    catalog.remove_interval(id)?;
                    println!("Removed interval {id}");
                }
                IntervalAction::List => {
                    let intervals = catalog.intervals();
                    if intervals.is_empty() {
                        println!("No intervals.");
                    } else {
                        println!("Intervals ({}):", intervals.len());
                        for sub in &intervals {
                            let reader = catalog
                                .reader(sub.reader_id)
                                .map_or("?", |r| r.name.as_str());
                            let book = catalog.book_name(sub.interval.book_id).unwrap_or("?");
                            println!(
                                "  {} {} read \"{}\" pages {}-{}",
                                sub.id, reader, book, sub.interval.start_page, sub.interval.end_page
                            );
                        }
                    }
                }
            }
        }

        Commands::Coverage { engine } => {
            let catalog = Catalog::open_with(&paths.library_dir(), &config)?;
            let kind = engine.unwrap_or(config.engine);
            let service = RecommendationService::from_config(&catalog, &config)
                .with_engine(kind.build(config.parallel));
            let coverage = service.coverage()?;

            if coverage.is_empty() {
                println!("No intervals submitted.");
            } else {
                println!("Coverage ({} books, {} engine):", coverage.len(), service.engine_name());
                for entry in coverage_entries(&coverage) {
                    let name = catalog.book_name(entry.book_id).unwrap_or("?");
                    println!(
                        "  {} \"{}\": {} pages",
                        entry.book_id, name, entry.total_unique_pages_read
                    );
                }
            }
        }

        Commands::Top {
            k,
            engine,
            parallel,
            json,
        } => {
            let catalog = Catalog::open_with(&paths.library_dir(), &config)?;
            let kind = engine.unwrap_or(config.engine);
            let service = RecommendationService::from_config(&catalog, &config)
                .with_engine(kind.build(parallel || config.parallel))
                .with_top_k(k.unwrap_or(config.top_k));
            let ranked = service.top_books()?;

            if json {
                let out = serde_json::to_string_pretty(&ranked).into_diagnostic()?;
                println!("{out}");
            } else if ranked.is_empty() {
                println!("No books have been read yet.");
            } else {
                println!("Top {} books ({} engine):", service.top_k(), service.engine_name());
                for (i, entry) in ranked.iter().enumerate() {
                    println!(
                        "  {}. \"{}\" / {} ({} pages read)",
                        i + 1,
                        entry.book_name,
                        entry.book_id,
                        entry.num_of_read_pages
                    );
                }
            }
        }

        Commands::Verify => {
            let catalog = Catalog::open_with(&paths.library_dir(), &config)?;
            let report = RecommendationService::new(&catalog).verify()?;
            println!(
                "Checked {} books over {} intervals.",
                report.books, report.intervals
            );
            if report.is_consistent() {
                println!("Sequential and parallel sweeps agree with the reference engine.");
            } else {
                for m in &report.mismatches {
                    println!(
                        "  book {}: sweep={:?} parallel={:?} reference={:?}",
                        m.book_id, m.sweep, m.parallel, m.reference
                    );
                }
                miette::bail!("{} books disagree between engines", report.mismatches.len());
            }
        }

        Commands::Seed {
            readers,
            books,
            seed,
        } => {
            let mut catalog = Catalog::open_with(&paths.library_dir(), &config)?
                .with_notifier(Box::new(NoopNotifier));
            let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
            let plan = SeedPlan {
                readers,
                books,
                ..Default::default()
            };
            let summary = seed_catalog(&mut catalog, plan, &mut rng)?;
            println!(
                "Seeded {} readers, {} books, {} intervals.",
                summary.readers, summary.books, summary.intervals
            );
        }
    }

    Ok(())
}
