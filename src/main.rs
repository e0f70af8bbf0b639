//! Command line front end for the publication catalogue.
//!
//! ```bash
//! pubcatalog publishers
//! pubcatalog journals -p "Nature Portfolio"
//! pubcatalog summary -p "Nature Portfolio" -j "Nature"
//! pubcatalog search -N "Nature Portfolio" -r 1995 -R 2000-03 --get-title -o results.json
//! pubcatalog import extracted.json --overwrite
//! ```
//!
//! Settings are read from `pubcatalog.json` (or the file given with `--config`)
//! and `PUBCATALOG_*` environment variables; command line flags win.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use pubcatalog::export::{read_publications, write_json};
use pubcatalog::filter::PubFilter;
use pubcatalog::report;
use pubcatalog::search::{SearchEngine, SearchOptions};
use pubcatalog::settings::Settings;
use pubcatalog::store::{PersistenceMode, PublicationStore};
use pubcatalog::Result;

#[derive(Parser, Debug)]
#[command(name = "pubcatalog", version, about = "Search, filter and summarize publication metadata")]
struct Cli {
    /// Settings file
    #[arg(long, value_name = "PATH", default_value = "pubcatalog.json")]
    config: String,

    /// Database file path (`:memory:` for a throwaway database)
    #[arg(long, value_name = "PATH")]
    db_path: Option<String>,

    /// Logging verbosity level
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Alphabetical list of publishers
    Publishers,
    /// Alphabetical list of journals of a publisher
    Journals {
        #[arg(long, short)]
        publisher: String,
    },
    /// Summary of a publisher, or of one of its journals
    Summary {
        #[arg(long, short)]
        publisher: String,
        #[arg(long, short)]
        journal: Option<String>,
    },
    /// Search the publications; prints a summary unless --output is given
    Search(SearchArgs),
    /// Commit publication records from a JSON array
    Import {
        file: PathBuf,
        /// Replace records whose DOI is already stored
        #[arg(long)]
        overwrite: bool,
    },
    /// Remove a publication
    Delete { doi: String },
}

#[derive(Args, Debug)]
struct SearchArgs {
    /// Normalized publisher name (repeatable)
    #[arg(long, short = 'N')]
    publisher: Vec<String>,
    /// Normalized journal name (repeatable)
    #[arg(long, short = 'J')]
    journal: Vec<String>,
    /// Publication type (repeatable, experimental)
    #[arg(long, short = 'T')]
    publication_type: Vec<String>,
    /// Earliest received date (YYYY, YYYY-MM or YYYY-MM-DD)
    #[arg(long, short = 'r')]
    min_received: Option<String>,
    /// Latest received date
    #[arg(long, short = 'R')]
    max_received: Option<String>,
    /// Earliest accepted date
    #[arg(long, short = 'a')]
    min_accepted: Option<String>,
    /// Latest accepted date
    #[arg(long, short = 'A')]
    max_accepted: Option<String>,
    /// Earliest published date
    #[arg(long, short = 'p')]
    min_published: Option<String>,
    /// Latest published date
    #[arg(long, short = 'P')]
    max_published: Option<String>,
    /// Write the results to this JSON file instead of printing a summary
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,
    #[arg(long)]
    get_title: bool,
    #[arg(long)]
    get_publication_type: bool,
    #[arg(long)]
    get_no_of_authors: bool,
    #[arg(long)]
    get_affiliations: bool,
}

impl SearchArgs {
    fn filter(&self) -> PubFilter {
        let list = |values: &Vec<String>| (!values.is_empty()).then(|| values.clone());
        PubFilter {
            normalized_publisher: list(&self.publisher),
            normalized_journal: list(&self.journal),
            publication_type: list(&self.publication_type),
            min_received: self.min_received.clone(),
            max_received: self.max_received.clone(),
            min_accepted: self.min_accepted.clone(),
            max_accepted: self.max_accepted.clone(),
            min_published: self.min_published.clone(),
            max_published: self.max_published.clone(),
        }
    }
    fn options(&self) -> SearchOptions {
        SearchOptions {
            get_title: self.get_title,
            get_publication_type: self.get_publication_type,
            get_no_of_authors: self.get_no_of_authors,
            get_affiliations: self.get_affiliations,
        }
    }
}

fn setup_logging(log_level: &str) {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .init();
}

fn run(command: Command, store: &PublicationStore) -> Result<()> {
    match command {
        Command::Publishers => {
            println!("{}", report::publishers_report(&store.unique_publishers()?));
        }
        Command::Journals { publisher } => {
            let journals = store.unique_journals(&publisher)?;
            println!("{}", report::journals_report(&publisher, journals.as_deref()));
        }
        Command::Summary { publisher, journal: None } => {
            let summaries = store.publisher_summary(&publisher)?;
            println!("{}", report::publisher_summary_report(&publisher, summaries.as_deref()));
        }
        Command::Summary { publisher, journal: Some(journal) } => {
            let summary = store.journal_summary(&publisher, &journal)?;
            println!("{}", report::journal_summary_report(&publisher, &journal, summary.as_ref()));
        }
        Command::Search(args) => {
            let engine = SearchEngine::new(store);
            let results = engine.search(&args.filter(), args.options())?;
            match &args.output {
                Some(path) => {
                    write_json(path, &results)?;
                    println!("Wrote {} publication(s) to {}", results.len(), path.display());
                }
                None => println!("{}", report::search_report(report::analyze(&results).as_ref())),
            }
        }
        Command::Import { file, overwrite } => {
            let (mut inserted, mut duplicates, mut replaced) = (0, 0, 0);
            for mut publication in read_publications(&file)? {
                publication.fill_normalized_dates();
                let outcome = store.add_entry(&publication, overwrite)?;
                match (outcome.duplicate, outcome.inserted) {
                    (false, _) => inserted += 1,
                    (true, true) => replaced += 1,
                    (true, false) => duplicates += 1,
                }
            }
            info!(inserted, replaced, duplicates, "import finished");
            println!("Inserted {}, replaced {}, skipped {} duplicate(s).", inserted, replaced, duplicates);
        }
        Command::Delete { doi } => {
            if store.delete_entry(&doi)? {
                println!("Entry {} removed.", doi);
            } else {
                println!("Entry {} does not exist.", doi);
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let settings = match Settings::load(&cli.config) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    setup_logging(cli.log_level.as_deref().unwrap_or(&settings.log_level));

    let mode = match &cli.db_path {
        Some(path) => PersistenceMode::from_path(path),
        None => settings.persistence_mode(),
    };
    let outcome = PublicationStore::new(mode).and_then(|store| run(cli.command, &store));
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "command failed");
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
