use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use biblehub_scraper::logging::{self, LogTarget};
use biblehub_scraper::{
    reference, Catalog, Config, Field, FormController, Selection, SimulatedBackend,
};

mod app;
mod handler;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, TerminalSession, Tui};

#[derive(Parser)]
#[command(name = "biblehub", version)]
#[command(about = "Build Bible Hub scrape requests from a terminal form or the command line")]
struct Cli {
    /// JSON catalog replacing the built-in books, commentaries, languages and scrape types
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,
    /// Simulated scrape delay in milliseconds
    #[arg(long, global = true)]
    delay_ms: Option<u64>,
    /// Config file to use instead of the per-user one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive form (default)
    Tui,
    /// Run one scrape without the form
    Scrape(ScrapeArgs),
    /// Print catalog entries
    List {
        #[arg(value_enum, default_value_t = ListKind::All)]
        what: ListKind,
    },
}

#[derive(clap::Args)]
struct ScrapeArgs {
    /// Passage such as "John 3:16" or "Psalms 23"
    #[arg(short, long)]
    reference: Option<String>,
    #[arg(short, long)]
    book: Option<String>,
    #[arg(short, long)]
    chapter: Option<u32>,
    /// Verse number or "all"
    #[arg(short, long)]
    verse: Option<String>,
    /// Scrape type id or name (bibleproject, commentary, languages, questions, summary)
    #[arg(short = 't', long = "type")]
    scrape_type: String,
    #[arg(long)]
    commentary: Option<String>,
    #[arg(short, long)]
    language: Option<String>,
    /// Write the result here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ListKind {
    All,
    Books,
    Commentaries,
    Languages,
    Types,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let interactive = matches!(command, Commands::Tui);

    let (mut config, config_error) = Config::load_for_run(cli.config.as_deref(), interactive)?;
    if let Some(path) = cli.catalog {
        config.catalog_path = Some(path);
    }

    if interactive {
        let log_path = Config::config_dir()?.join("biblehub.log");
        let filter = config.log_level.as_deref().unwrap_or("info");
        logging::init(filter, LogTarget::File(log_path))?;
    } else {
        logging::init(config.log_level.as_deref().unwrap_or("warn"), LogTarget::Stderr)?;
    }
    if let Some(e) = config_error {
        log::warn!("Ignoring unreadable config: {:#}", e);
    }

    let catalog = config.catalog().await?;
    let delay = cli
        .delay_ms
        .map(Duration::from_millis)
        .unwrap_or_else(|| config.delay());
    let controller = FormController::new(catalog.clone(), Arc::new(SimulatedBackend::new(delay)));

    match command {
        Commands::Tui => run_tui(controller).await,
        Commands::Scrape(args) => scrape_once(controller, args).await,
        Commands::List { what } => {
            list_catalog(&catalog, what);
            Ok(())
        }
    }
}

async fn run_tui(controller: FormController) -> Result<()> {
    let mut session = TerminalSession::enter()?;
    let mut events = EventHandler::new();
    let mut app = App::new(controller);

    log::info!("Form opened (backend={})", app.controller.backend_name());
    event_loop(session.terminal(), &mut app, &mut events).await
}

async fn event_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;
        match events.next().await {
            Some(event) => handler::handle_event(app, event)?,
            None => break,
        }
    }
    Ok(())
}

async fn scrape_once(mut controller: FormController, args: ScrapeArgs) -> Result<()> {
    let selection = selection_from_args(controller.catalog(), &args)?;
    controller.set_selection(selection);
    controller.submit()?;

    eprintln!("Scraping...");
    controller.wait().await?;

    let text = controller
        .result()
        .ok_or_else(|| anyhow!("scrape finished without a result"))?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Wrote {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// Builds a selection from `--reference` and the explicit flags. Flags win
/// over the reference; every value must be one the form would offer.
fn selection_from_args(catalog: &Catalog, args: &ScrapeArgs) -> Result<Selection> {
    let mut selection = match &args.reference {
        Some(text) => reference::parse(text, catalog)?.apply_to(&Selection::new()),
        None => Selection::new(),
    };

    let chapter = args.chapter.map(|c| c.to_string());
    let overrides = [
        (Field::Book, args.book.as_deref()),
        (Field::Chapter, chapter.as_deref()),
        (Field::Verse, args.verse.as_deref()),
        (Field::ScrapeType, Some(args.scrape_type.as_str())),
        (Field::Commentary, args.commentary.as_deref()),
        (Field::Language, args.language.as_deref()),
    ];

    for (field, value) in overrides {
        let Some(value) = value else { continue };
        let canonical = catalog
            .canonical(field, &selection.book, value)
            .ok_or_else(|| anyhow!("'{}' is not a valid {}", value, field.as_str()))?;
        selection = selection.with(field, canonical);
    }

    // The chapter may have come from a reference checked against another book
    if selection.is_set(Field::Chapter)
        && catalog.canonical(Field::Chapter, &selection.book, &selection.chapter).is_none()
    {
        bail!("{} has no chapter {}", selection.book, selection.chapter);
    }

    Ok(selection)
}

fn list_catalog(catalog: &Catalog, what: ListKind) {
    let show = |kind: ListKind| what == ListKind::All || what == kind;

    if show(ListKind::Books) {
        println!("Books ({}):", catalog.books.len());
        for book in &catalog.books {
            let chapters = catalog.chapters_for(book);
            println!("  {} (chapters {}-{})", book, chapters.start(), chapters.end());
        }
    }
    if show(ListKind::Commentaries) {
        println!("Commentaries:");
        for commentary in &catalog.commentaries {
            println!("  {}", commentary);
        }
    }
    if show(ListKind::Languages) {
        println!("Languages:");
        for language in &catalog.languages {
            println!("  {}", language);
        }
    }
    if show(ListKind::Types) {
        println!("Scrape types:");
        for kind in &catalog.scrape_types {
            println!("  {:<14} {} - {}", kind.id, kind.name, kind.description);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(reference: Option<&str>, scrape_type: &str) -> ScrapeArgs {
        ScrapeArgs {
            reference: reference.map(String::from),
            book: None,
            chapter: None,
            verse: None,
            scrape_type: scrape_type.to_string(),
            commentary: None,
            language: None,
            output: None,
        }
    }

    #[test]
    fn test_selection_from_reference() {
        let catalog = Catalog::default();
        let s = selection_from_args(&catalog, &args(Some("john 3:16"), "Bible Project")).unwrap();
        assert_eq!(s.book, "John");
        assert_eq!(s.chapter, "3");
        assert_eq!(s.verse, "16");
        assert_eq!(s.scrape_type, "bibleproject");
        assert!(s.is_valid());
    }

    #[test]
    fn test_flags_override_reference() {
        let catalog = Catalog::default();
        let mut a = args(Some("John 3:16"), "summary");
        a.verse = Some("ALL".to_string());
        a.language = Some("greek".to_string());
        let s = selection_from_args(&catalog, &a).unwrap();
        assert_eq!(s.verse, "all");
        assert_eq!(s.language, "Greek");
    }

    #[test]
    fn test_unknown_values_rejected() {
        let catalog = Catalog::default();
        assert!(selection_from_args(&catalog, &args(Some("John 3"), "poetry")).is_err());

        let mut a = args(None, "summary");
        a.book = Some("Hezekiah".to_string());
        assert!(selection_from_args(&catalog, &a).is_err());
    }

    #[test]
    fn test_cli_parses() {
        let cli = Cli::try_parse_from([
            "biblehub", "--delay-ms", "0", "scrape", "-r", "Ruth 1", "-t", "questions",
        ])
        .unwrap();
        assert_eq!(cli.delay_ms, Some(0));
        assert!(matches!(cli.command, Some(Commands::Scrape(_))));
    }
}
