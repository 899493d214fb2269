//! Folio - Command Line Entry Point
//!
//! Format, export and copy generated articles, browse trending articles and
//! manage the saved-article library, history and favorites from a terminal.

use clap::{Args, Parser, Subcommand, ValueEnum};
use folio::config::{load_config, save_config_silent, Settings};
use folio::export::{
    build_full_article_html, copy_content, copy_full_article, export_article, format_to_html,
    render_export, ExportFormat, ExportOptions, RichWriteResult, SystemClipboard,
};
use folio::history::ArticleHistory;
use folio::library::{Library, LibraryQuery, SaveOutcome, SortOrder};
use folio::storage::{JsonFileStore, KeyValueStore, MemoryStore};
use folio::trending::{HttpTrendingSource, TrendingCache};
use folio::{Article, CategoryKey, Error, Result};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

/// Application name constant.
const APP_NAME: &str = "Folio";

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Format, export and organise generated articles")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Backend base URL (overrides config and FOLIO_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Keep cache and library in memory for this run only
    #[arg(long, global = true)]
    no_persist: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the HTML (or plain) rendering of an article
    Format {
        #[command(flatten)]
        article: ArticleArgs,

        /// Render only the body
        #[arg(long)]
        body_only: bool,

        /// Output flavour
        #[arg(long = "as", value_enum, default_value_t = Rendering::Html)]
        rendering: Rendering,
    },

    /// Write an article to a .txt, .doc or .html file
    Export {
        #[command(flatten)]
        article: ArticleArgs,

        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,

        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Open the file once written
        #[arg(long)]
        open: bool,
    },

    /// Copy an article to the clipboard with formatting
    Copy {
        #[command(flatten)]
        article: ArticleArgs,

        /// Copy only the body
        #[arg(long)]
        content_only: bool,
    },

    /// Show trending articles
    Trending {
        /// Category (all, tech, finance, ...)
        #[arg(short, long)]
        category: Option<String>,

        /// Bypass the cache and fetch again
        #[arg(long)]
        refresh: bool,

        /// Drop every cached category and exit
        #[arg(long, conflicts_with = "refresh")]
        invalidate_all: bool,

        /// Save the article at this rank (1-based) to the library
        #[arg(long)]
        save: Option<usize>,
    },

    /// Manage saved articles
    Library {
        #[command(subcommand)]
        action: LibraryAction,
    },

    /// Recently generated articles
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },

    /// Favorite articles
    Favorite {
        #[command(subcommand)]
        action: FavoriteAction,
    },
}

#[derive(Subcommand)]
enum LibraryAction {
    /// List saved articles
    List {
        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        search: Option<String>,

        #[arg(long, value_enum, default_value_t = SortArg::Newest)]
        sort: SortArg,
    },
    /// Save an article
    Save {
        #[command(flatten)]
        article: ArticleArgs,
    },
    /// Print a saved article as plain text
    Show { id: String },
    /// Delete a saved article
    Delete { id: String },
    /// Add a tag to a saved article
    Tag { id: String, tag: String },
    /// Remove a tag from a saved article
    Untag { id: String, tag: String },
}

#[derive(Subcommand)]
enum HistoryAction {
    /// List history, newest first
    List,
    /// Record a generated article
    Add {
        #[command(flatten)]
        article: ArticleArgs,
    },
    /// Print a history entry as plain text
    Show { id: String },
    /// Forget all history
    Clear,
}

#[derive(Subcommand)]
enum FavoriteAction {
    /// List favorites
    List,
    /// Mark a history or library article as a favorite
    Add { id: String },
    /// Remove a favorite
    Remove { id: String },
    /// Forget all favorites
    Clear,
}

/// An article given on the command line.
///
/// A `.json` file is read as a full article; anything else is the body,
/// titled by `--title` or the file stem.
#[derive(Args)]
struct ArticleArgs {
    file: PathBuf,

    #[arg(long)]
    title: Option<String>,

    #[arg(long)]
    subtitle: Option<String>,
}

impl ArticleArgs {
    fn load(&self) -> Result<Article> {
        let text = fs::read_to_string(&self.file)?;
        let is_json = self
            .file
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let mut article = if is_json {
            serde_json::from_str::<Article>(&text).map_err(|e| {
                Error::Application(format!(
                    "'{}' is not a valid article: {}",
                    self.file.display(),
                    e
                ))
            })?
        } else {
            let stem = self
                .file
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            Article::new(stem, "", text)
        };

        if let Some(title) = &self.title {
            article.title = title.clone();
        }
        if let Some(subtitle) = &self.subtitle {
            article.subtitle = subtitle.clone();
        }
        if !article.has_title() {
            return Err(Error::Application("Article title must not be empty".to_string()));
        }
        Ok(article)
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Rendering {
    Html,
    Plain,
    Document,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Txt,
    Doc,
    Html,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Txt => ExportFormat::Txt,
            FormatArg::Doc => ExportFormat::Doc,
            FormatArg::Html => ExportFormat::Html,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Newest,
    Oldest,
    Title,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Newest => SortOrder::Newest,
            SortArg::Oldest => SortOrder::Oldest,
            SortArg::Title => SortOrder::Title,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter(cli.verbose)),
    )
    .init();

    info!("Starting {}", APP_NAME);

    let settings = load_config().with_api_override(cli.api_url.clone());
    debug!("Using backend {}", settings.api_base_url);

    match run(cli, settings) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            if e.is_retryable() {
                eprintln!("Run `folio trending --refresh` to try again.");
            }
            ExitCode::FAILURE
        }
    }
}

/// Log level used when `RUST_LOG` is unset.
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

fn open_store(no_persist: bool) -> Result<Box<dyn KeyValueStore>> {
    if no_persist {
        Ok(Box::new(MemoryStore::new()))
    } else {
        Ok(Box::new(JsonFileStore::open_default()?))
    }
}

fn run(cli: Cli, mut settings: Settings) -> Result<()> {
    match cli.command {
        Command::Format {
            article,
            body_only,
            rendering,
        } => {
            let article = article.load()?;
            let output = match (rendering, body_only) {
                (Rendering::Html, true) => format_to_html(&article.content),
                (Rendering::Html, false) => {
                    build_full_article_html(&article.title, &article.subtitle, &article.content)
                }
                (Rendering::Plain, true) => article.content.clone(),
                (Rendering::Plain, false) => render_export(&article, ExportFormat::Txt),
                (Rendering::Document, _) => render_export(&article, ExportFormat::Html),
            };
            println!("{}", output);
        }

        Command::Export {
            article,
            format,
            out,
            open,
        } => {
            let article = article.load()?;
            let format = format
                .map(ExportFormat::from)
                .unwrap_or(settings.default_export_format);
            let mut options = ExportOptions::new(format)
                .with_open_after_export(open || settings.open_after_export);
            if let Some(dir) = out.or_else(|| settings.last_export_directory.clone()) {
                options = options.with_directory(dir);
            }

            let path = export_article(&article, &options)?;
            println!("Article exported as {}: {}", format.label(), path.display());

            if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
                settings.last_export_directory = Some(dir.to_path_buf());
                save_config_silent(&settings);
            }
        }

        Command::Copy {
            article,
            content_only,
        } => {
            let article = article.load()?;
            let what = if content_only { "Content" } else { "Full article" };
            let result = match SystemClipboard::new() {
                Ok(mut clipboard) if content_only => copy_content(&mut clipboard, &article),
                Ok(mut clipboard) => copy_full_article(&mut clipboard, &article),
                Err(e) => RichWriteResult::TotalFailure(e),
            };
            println!("{}", result.message(what));
            if let RichWriteResult::TotalFailure(e) = result {
                return Err(e.into());
            }
        }

        Command::Trending {
            category,
            refresh,
            invalidate_all,
            save,
        } => {
            let category = match category {
                Some(name) => name.parse::<CategoryKey>()?,
                None => settings.default_category,
            };
            let mut store = open_store(cli.no_persist)?;
            let source = HttpTrendingSource::from_settings(&settings)?;
            let mut cache = TrendingCache::new(store.as_mut(), source)
                .with_freshness(settings.freshness_window());

            if invalidate_all {
                cache.invalidate_all(CategoryKey::all())?;
                println!("Cleared cached trending articles for every category");
                return Ok(());
            }

            let (articles, from_cache) = if refresh {
                (cache.refresh(category)?, false)
            } else {
                let loaded = cache.load(category)?;
                (loaded.articles, loaded.from_cache)
            };
            drop(cache);

            println!(
                "Trending in {}{}",
                category.label(),
                if from_cache { " (cached)" } else { "" }
            );
            for (rank, article) in articles.iter().enumerate() {
                println!("#{:<2} {}", rank + 1, article.title);
                if !article.subtitle.is_empty() {
                    println!("    {}", article.subtitle);
                }
                if let Some(author) = &article.author {
                    println!("    by {}", author);
                }
            }

            if let Some(rank) = save {
                let article = rank
                    .checked_sub(1)
                    .and_then(|i| articles.get(i))
                    .ok_or_else(|| Error::Application(format!("No trending article #{}", rank)))?;
                let mut to_save = article.clone();
                if to_save.category.is_none() {
                    to_save.category = Some(category.to_string());
                }
                report_save(Library::new(store.as_mut()).save(&to_save)?);
            }
        }

        Command::Library { action } => {
            let mut store = open_store(cli.no_persist)?;
            let mut library = Library::new(store.as_mut());
            match action {
                LibraryAction::List {
                    category,
                    search,
                    sort,
                } => {
                    let query = LibraryQuery {
                        category,
                        search,
                        sort: sort.into(),
                    };
                    let articles = library.query(&query)?;
                    if articles.is_empty() {
                        println!("No saved articles");
                    }
                    for article in articles {
                        println!(
                            "{}  {}  [{}]{}",
                            article.id.as_deref().unwrap_or("-"),
                            article.title,
                            article.category.as_deref().unwrap_or("-"),
                            if article.tags.is_empty() {
                                String::new()
                            } else {
                                format!("  #{}", article.tags.join(" #"))
                            }
                        );
                    }
                }
                LibraryAction::Save { article } => {
                    report_save(library.save(&article.load()?)?);
                }
                LibraryAction::Show { id } => {
                    let article = library.get(&id)?;
                    println!("{}", render_export(&article, ExportFormat::Txt));
                }
                LibraryAction::Delete { id } => {
                    library.delete(&id)?;
                    println!("Deleted {}", id);
                }
                LibraryAction::Tag { id, tag } => library.add_tag(&id, &tag)?,
                LibraryAction::Untag { id, tag } => library.remove_tag(&id, &tag)?,
            }
        }

        Command::History { action } => {
            let mut store = open_store(cli.no_persist)?;
            let mut history = ArticleHistory::new(store.as_mut());
            match action {
                HistoryAction::List => {
                    let entries = history.entries()?;
                    if entries.is_empty() {
                        println!("No articles in history");
                    }
                    for entry in entries {
                        println!(
                            "{}  {}{}",
                            entry.id.as_deref().unwrap_or("-"),
                            if entry.is_favorite { "* " } else { "" },
                            entry.title
                        );
                    }
                }
                HistoryAction::Add { article } => {
                    let entry = history.record(&article.load()?)?;
                    println!(
                        "Added to history ({})",
                        entry.id.as_deref().unwrap_or("-")
                    );
                }
                HistoryAction::Show { id } => {
                    let entry = history.get(&id)?;
                    println!("{}", render_export(&entry, ExportFormat::Txt));
                }
                HistoryAction::Clear => {
                    history.clear()?;
                    println!("History cleared");
                }
            }
        }

        Command::Favorite { action } => {
            let mut store = open_store(cli.no_persist)?;
            match action {
                FavoriteAction::List => {
                    let favorites = ArticleHistory::new(store.as_mut()).favorites()?;
                    if favorites.is_empty() {
                        println!("No favorites");
                    }
                    for favorite in favorites {
                        println!(
                            "{}  {}  [{}]",
                            favorite.id.as_deref().unwrap_or("-"),
                            favorite.title,
                            favorite.category.as_deref().unwrap_or("-")
                        );
                    }
                }
                FavoriteAction::Add { id } => {
                    let in_history = ArticleHistory::new(store.as_mut()).get(&id);
                    let article = match in_history {
                        Ok(entry) => entry,
                        Err(Error::ArticleNotFound(_)) => Library::new(store.as_mut()).get(&id)?,
                        Err(e) => return Err(e),
                    };
                    if ArticleHistory::new(store.as_mut()).add_favorite(&article)? {
                        println!("Added '{}' to favorites", article.title);
                    } else {
                        println!("'{}' is already a favorite", article.title);
                    }
                }
                FavoriteAction::Remove { id } => {
                    if ArticleHistory::new(store.as_mut()).remove_favorite(&id)? {
                        println!("Removed {} from favorites", id);
                    } else {
                        return Err(Error::ArticleNotFound(id));
                    }
                }
                FavoriteAction::Clear => {
                    ArticleHistory::new(store.as_mut()).clear_favorites()?;
                    println!("Favorites cleared");
                }
            }
        }
    }

    Ok(())
}

fn report_save(outcome: SaveOutcome) {
    match outcome {
        SaveOutcome::Saved(id) => println!("Article saved to library! ({})", id),
        SaveOutcome::AlreadySaved => println!("Article already in library!"),
    }
}
