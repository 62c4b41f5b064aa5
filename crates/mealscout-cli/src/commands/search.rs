//! Search command - Debounced, incrementally loaded recipe search
//!
//! One-shot mode starts the loader on the term, waits for it to settle and
//! then scrolls to the end of the list `--pages` times. Interactive mode
//! reads stdin line by line:
//!
//! - any text replaces the search box content
//! - `:more` scrolls to the end of the list
//! - `:retry` retries a failed fetch
//! - `:quit` exits

use anyhow::{bail, Context, Result};
use clap::Args;
use mealscout_search::{LoaderHandle, LoaderOptions, LoaderSnapshot, SearchLoader, SearchView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::{create_api, load_config, print_recipes, OutputFormat};
use crate::progress;
use crate::GlobalOptions;

/// Arguments for the search command
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Search term (defaults to the URL's `q` parameter)
    term: Option<String>,

    /// Page URL whose `q` parameter seeds the search and is kept in sync
    #[arg(long)]
    url: Option<String>,

    /// Number of times to scroll to the end of the results
    #[arg(long, short = 'p', default_value = "0")]
    pages: usize,

    /// Output format: text (default), json
    #[arg(long, short = 'o', value_enum, default_value = "text")]
    output: OutputFormat,

    /// Read search input from stdin
    #[arg(long, short = 'i', conflicts_with_all = ["term", "pages"])]
    interactive: bool,

    /// Quiet period before a typed term is searched, in milliseconds
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Number of recipes requested by the first fetch
    #[arg(long)]
    page_size: Option<usize>,
}

/// Execute the search command
pub async fn execute(args: SearchArgs, global: GlobalOptions) -> Result<()> {
    let mut config = load_config(&global)?;
    if let Some(debounce_ms) = args.debounce_ms {
        config.search.debounce_ms = debounce_ms;
    }
    if let Some(page_size) = args.page_size {
        config.search.page_size = page_size;
    }
    config.search.validate().context("Invalid search options")?;

    let mut options =
        LoaderOptions::from_config(&config.search).context("Invalid search base URL")?;
    if let Some(ref url) = args.url {
        options = options.with_url(url).context("Invalid --url")?;
    }
    // A given term is the first query; the URL's own term is never fetched
    if let Some(ref term) = args.term {
        options = options.with_term(term.as_str());
    }

    let api = create_api(&config).await?;
    let handle = SearchLoader::spawn(api, options);

    if args.interactive {
        run_interactive(handle, args.output, global.quiet).await
    } else {
        run_once(handle, &args, global.quiet).await
    }
}

async fn run_once(mut handle: LoaderHandle, args: &SearchArgs, quiet: bool) -> Result<()> {
    let pb = progress::spinner("Searching recipes...", quiet);

    let mut snapshot = handle.settled().await?;

    for page in 1..=args.pages {
        if !snapshot.query.has_more || inline_error(&snapshot).is_some() {
            break;
        }

        progress::set_message(&pb, &format!("Loading more recipes (page {})...", page + 1));
        handle.reach_end().await?;
        snapshot = handle.settled().await?;
    }

    handle.shutdown().await;

    match snapshot.view {
        SearchView::Failed { ref message, .. } => {
            progress::finish_spinner_error(pb, "Search failed");
            bail!("Search failed: {}", message);
        }
        SearchView::Results { .. } => match inline_error(&snapshot) {
            Some(message) => progress::finish_spinner_warn(
                pb,
                &format!("Could not load more recipes: {}", message),
            ),
            None => progress::finish_spinner(
                pb,
                &format!("Loaded {} recipes", snapshot.recipes().len()),
            ),
        },
        _ => progress::clear_spinner(pb),
    }

    render(&snapshot, args.output, quiet)
}

async fn run_interactive(mut handle: LoaderHandle, output: OutputFormat, quiet: bool) -> Result<()> {
    if !quiet {
        eprintln!("Type to search. Commands: :more, :retry, :quit");
    }

    let mut updates = handle.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last_rendered: Option<LoaderSnapshot> = None;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    // EOF: search whatever was typed last, then stop
                    let snapshot = handle.finish().await?;
                    render_changed(&snapshot, &mut last_rendered, output, quiet)?;
                    return Ok(());
                };

                match line.trim() {
                    ":quit" | ":q" => break,
                    ":more" => handle.reach_end().await?,
                    ":retry" => handle.retry().await?,
                    _ => handle.input(line).await?,
                }
            }
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }

                let snapshot = updates.borrow_and_update().clone();
                if snapshot.is_settled() {
                    render_changed(&snapshot, &mut last_rendered, output, quiet)?;
                }
            }
        }
    }

    debug!("Leaving interactive search");
    handle.shutdown().await;
    Ok(())
}

fn render_changed(
    snapshot: &LoaderSnapshot,
    last: &mut Option<LoaderSnapshot>,
    output: OutputFormat,
    quiet: bool,
) -> Result<()> {
    if last.as_ref() == Some(snapshot) {
        return Ok(());
    }

    match output {
        // One object per line so the stream can be consumed incrementally
        OutputFormat::Json => {
            println!("{}", serde_json::to_string(snapshot).context("Failed to serialize results")?)
        }
        OutputFormat::Text => {
            render_text(snapshot, quiet);
            println!();
        }
    }

    *last = Some(snapshot.clone());
    Ok(())
}

fn render(snapshot: &LoaderSnapshot, output: OutputFormat, quiet: bool) -> Result<()> {
    match output {
        OutputFormat::Json => {
            let json =
                serde_json::to_string_pretty(snapshot).context("Failed to serialize results")?;
            println!("{}", json);
        }
        OutputFormat::Text => render_text(snapshot, quiet),
    }
    Ok(())
}

fn render_text(snapshot: &LoaderSnapshot, quiet: bool) {
    match snapshot.view {
        SearchView::Loading { ref term } => println!("Searching for \"{}\"...", term),
        SearchView::Failed { ref message, .. } => {
            println!("Search failed: {}", message);
            if !quiet {
                println!("Type :retry to try again");
            }
        }
        SearchView::Empty { ref term } => println!("No recipes found for \"{}\"", term),
        SearchView::Results {
            ref term,
            ref recipes,
            has_more,
            ref inline_error,
            ..
        } => {
            if !quiet {
                let more = if has_more { " (more available)" } else { "" };
                println!(
                    "Found {} recipes for \"{}\"{}:\n",
                    recipes.len(),
                    term,
                    more
                );
            }

            print_recipes(recipes);

            if let Some(ref message) = inline_error {
                println!("\nCould not load more recipes: {}", message);
            }
        }
    }

    if !quiet {
        if let Some(ref location) = snapshot.location {
            println!("\nShare: {}", location);
        }
    }
}

fn inline_error(snapshot: &LoaderSnapshot) -> Option<&str> {
    match snapshot.view {
        SearchView::Results {
            inline_error: Some(ref message),
            ..
        } => Some(message),
        _ => None,
    }
}
