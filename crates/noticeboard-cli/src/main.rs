use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};
use noticeboard_source::{source_for_location, TableSource};
use noticeboard_store::{ConfigOverrides, Debouncer, ListConfig, ListStore, NavKey, PageView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "noticeboard")]
#[command(about = "Searchable, paginated noticeboard over a CSV feed")]
struct Cli {
    /// YAML config file (defaults to ./noticeboard.yaml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// CSV location: an http(s) URL or a local path
    #[arg(long, global = true)]
    csv: Option<String>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Serve the web UI
    Serve,
    /// Load once and print one page
    Render {
        #[arg(short, long, default_value = "")]
        query: String,
        #[arg(short, long, default_value_t = 1)]
        page: usize,
        /// Print the page view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Interactive list: type to search, `:page N`, `:left`, `:right`,
    /// `:view ID`, `:reload`, `:quit`
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("noticeboard=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => ListConfig::load_from(Some(path.as_path()), |key| std::env::var(key).ok())?,
        None => ListConfig::load()?,
    };
    config.apply(&ConfigOverrides {
        csv_url: cli.csv.clone(),
        ..ConfigOverrides::default()
    });

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => noticeboard_web::serve(config).await?,
        Commands::Render { query, page, json } => {
            let source = source_for_location(&config.csv_url, config.http_config())?;
            let mut store = ListStore::new(config);
            store.load(source.as_ref()).await?;
            if !query.trim().is_empty() {
                store.search(&query)?;
            }
            if page != 1 {
                store.goto_page(page)?;
            }
            let view = store.page_view();
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render_text(&view));
            }
        }
        Commands::Browse => {
            let source = source_for_location(&config.csv_url, config.http_config())?;
            browse(ListStore::new(config), source).await?;
        }
    }

    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum BrowseCommand {
    Query(String),
    Page(usize),
    Nav(NavKey),
    View(String),
    Reload,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> BrowseCommand {
    let Some(cmd) = line.trim().strip_prefix(':') else {
        return BrowseCommand::Query(line.to_string());
    };
    let mut parts = cmd.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("page"), Some(n)) => match n.parse() {
            Ok(n) => BrowseCommand::Page(n),
            Err(_) => BrowseCommand::Unknown(line.trim().to_string()),
        },
        (Some("left"), None) => BrowseCommand::Nav(NavKey::Left),
        (Some("right"), None) => BrowseCommand::Nav(NavKey::Right),
        (Some("view"), Some(id)) => BrowseCommand::View(id.to_string()),
        (Some("reload"), None) => BrowseCommand::Reload,
        (Some("quit") | Some("q"), None) => BrowseCommand::Quit,
        _ => BrowseCommand::Unknown(line.trim().to_string()),
    }
}

/// Lines typed in quick succession are debounced; only the last one of a
/// burst is applied as the search query.
async fn browse(mut store: ListStore, source: Arc<dyn TableSource>) -> Result<()> {
    if let Err(err) = store.load(source.as_ref()).await {
        debug!(error = %err, "initial load failed");
    }
    print!("{}", render_text(&store.page_view()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut debouncer: Debouncer<String> = Debouncer::new(store.config().debounce());

    loop {
        let deadline = debouncer.deadline();
        let sleep = tokio::time::sleep_until(tokio::time::Instant::from_std(
            deadline.unwrap_or_else(Instant::now),
        ));

        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    if let Some(query) = debouncer.cancel() {
                        let _ = store.search(&query);
                        print!("{}", render_text(&store.page_view()));
                    }
                    break;
                };
                match parse_command(&line) {
                    BrowseCommand::Query(query) => debouncer.arm(query, Instant::now()),
                    BrowseCommand::Page(page) => {
                        if let Err(err) = store.goto_page(page) {
                            println!("{err}");
                            continue;
                        }
                        print!("{}", render_text(&store.page_view()));
                    }
                    BrowseCommand::Nav(key) => {
                        if store.navigate(key).unwrap_or(false) {
                            print!("{}", render_text(&store.page_view()));
                        }
                    }
                    BrowseCommand::View(id) => {
                        if let Err(err) = store.view_more(&id) {
                            println!("{err}");
                        }
                    }
                    BrowseCommand::Reload => {
                        let _ = store.load(source.as_ref()).await;
                        print!("{}", render_text(&store.page_view()));
                    }
                    BrowseCommand::Quit => break,
                    BrowseCommand::Unknown(cmd) => println!("unknown command: {cmd}"),
                }
            }
            _ = sleep, if deadline.is_some() => {
                if let Some(query) = debouncer.take_ready(Instant::now()) {
                    let _ = store.search(&query);
                    print!("{}", render_text(&store.page_view()));
                }
            }
        }
    }

    info!("browse session ended");
    Ok(())
}

fn render_text(view: &PageView) -> String {
    let mut out = String::new();
    if let Some(banner) = &view.banner {
        let _ = writeln!(out, "! {banner}");
    }
    if view.is_loading() {
        let _ = writeln!(out, "Loading...");
        return out;
    }
    if let Some(notice) = &view.notice {
        let _ = writeln!(out, "{}", notice.text);
    }
    if view.total_results == 0 {
        let _ = writeln!(out, "No {}s found matching your search criteria.", view.item_noun);
    }
    for section in view.sections() {
        if let Some(label) = &section.label {
            let _ = writeln!(out, "== {label} ==");
        }
        for entry in &section.entries {
            let _ = write!(out, "  {} ({})", entry.record.title, entry.display_date);
            if let Some(id) = &entry.record.id {
                let _ = write!(out, " [{id}]");
            }
            out.push('\n');
        }
    }
    if view.show_controls {
        let _ = writeln!(
            out,
            "Page {} of {} ({})",
            view.page.current_page, view.page.total_pages, view.summary
        );
    }
    out
}
