//! # subwarp CLI
//!
//! Command-line front end over the subwarp core. It plays the role of the
//! presentation layer: it owns nothing but argument parsing and printing, and
//! drives the session/pagination/warp-target components underneath.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `subwarp subreddits` | List browsable subreddits (cached per process) |
//! | `subwarp browse <subreddit> --at <ts>` | Page through a subreddit as of a timestamp |
//! | `subwarp find-title "<query>"` | Search titles on the metadata service |
//! | `subwarp episodes <title-id>` | List a title's episodes and their warp targets |
//! | `subwarp warp-to "<query>"` | Resolve a title/episode to an anchor timestamp |
//!
//! ## Examples
//!
//! ```bash
//! # What was r/rust reading the day this anchor fell on?
//! subwarp browse rust --at 1617036992 --sort hot
//!
//! # Top of the last week as of the anchor
//! subwarp browse rust --at 1617036992 --sort top --period week
//!
//! # Browse the day after an episode aired, spoiler-free
//! subwarp warp-to "falcon and the winter soldier" --season 1 --episode 2 --subreddit marvelstudios
//! ```

use anyhow::{bail, Context, Result};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use subwarp::client::WarpClient;
use subwarp::config::{load_config, Config};
use subwarp::metadata::{Episode, MetadataClient, Title};
use subwarp::models::{RelativePeriod, SortMode, Submission};
use subwarp::names::SubredditDirectory;
use subwarp::pagination::BrowseSession;
use subwarp::session::SessionState;
use subwarp::warp_target;

/// Browse historical subreddit snapshots as of any point in time.
#[derive(Parser)]
#[command(name = "subwarp", version, about)]
struct Cli {
    /// Path to a TOML config file; defaults apply when omitted.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List subreddits the snapshot service can materialize.
    Subreddits {
        /// Case-insensitive substring filter.
        #[arg(long, default_value = "")]
        filter: String,
    },
    /// Page through a subreddit as of an anchor timestamp.
    Browse {
        subreddit: String,
        /// Anchor timestamp, Unix seconds.
        #[arg(long)]
        at: i64,
        #[arg(long, value_enum, default_value_t = SortMode::Hot)]
        sort: SortMode,
        /// Lookback window; only applies with --sort top.
        #[arg(long, value_enum)]
        period: Option<RelativePeriod>,
        /// Maximum pages to fetch.
        #[arg(long, default_value_t = 3)]
        pages: usize,
    },
    /// Search the metadata service for titles.
    FindTitle { query: String },
    /// List a title's episodes with their warp targets.
    Episodes {
        title_id: String,
        /// Only episodes of this season.
        #[arg(long)]
        season: Option<String>,
    },
    /// Resolve a title (or one of its episodes) to an anchor timestamp.
    WarpTo {
        query: String,
        #[arg(long)]
        season: Option<String>,
        #[arg(long)]
        episode: Option<i64>,
        /// Also browse this subreddit's first hot page at the resolved anchor.
        #[arg(long)]
        subreddit: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Subreddits { filter } => cmd_subreddits(&config, &filter).await,
        Command::Browse {
            subreddit,
            at,
            sort,
            period,
            pages,
        } => {
            let mut session = SessionState::new(subreddit, at, sort);
            session.set_period(period);
            cmd_browse(&config, session, pages).await
        }
        Command::FindTitle { query } => cmd_find_title(&config, &query).await,
        Command::Episodes { title_id, season } => {
            cmd_episodes(&config, &title_id, season.as_deref()).await
        }
        Command::WarpTo {
            query,
            season,
            episode,
            subreddit,
        } => cmd_warp_to(&config, &query, season.as_deref(), episode, subreddit).await,
    }
}

async fn cmd_subreddits(config: &Config, filter: &str) -> Result<()> {
    let client = WarpClient::new(&config.snapshot)?;
    let directory = SubredditDirectory::new();
    let names = directory
        .matching(&client, filter)
        .await
        .context("Failed to list subreddits")?;
    if names.is_empty() {
        println!("No subreddits found.");
        return Ok(());
    }
    for name in names {
        println!("{name}");
    }
    Ok(())
}

async fn cmd_browse(config: &Config, session: SessionState, pages: usize) -> Result<()> {
    if pages == 0 {
        bail!("--pages must be >= 1");
    }
    let client = Arc::new(WarpClient::new(&config.snapshot)?);
    let anchor = session.anchor_timestamp;
    let mut browse = BrowseSession::new(client, session);

    browse.load_first_page().await;
    // Simulate the infinite scroll: keep asking for the next page as long as
    // the controller says there is one.
    for _ in 1..pages {
        if !browse.load_next_page(0.0).await {
            break;
        }
    }

    let controller = browse.controller();
    if let Some(error) = controller.last_error() {
        bail!("Fetch failed: {error}");
    }
    if controller.items().is_empty() {
        println!("Nothing found.");
        return Ok(());
    }

    println!(
        "r/{} as of {} ({} submissions{})",
        controller.session().subreddit,
        format_ts(anchor),
        controller.items().len(),
        if controller.has_more() { ", more available" } else { "" },
    );
    for submission in controller.items() {
        print_submission(submission);
    }
    Ok(())
}

async fn cmd_find_title(config: &Config, query: &str) -> Result<()> {
    let client = MetadataClient::new(&config.metadata)?;
    let titles = client
        .search_titles(query)
        .await
        .context("Title search failed")?;
    if titles.is_empty() {
        println!("No titles found.");
        return Ok(());
    }
    for title in &titles {
        print_title(title);
    }
    Ok(())
}

async fn cmd_episodes(config: &Config, title_id: &str, season: Option<&str>) -> Result<()> {
    let client = MetadataClient::new(&config.metadata)?;
    let episodes = client
        .list_episodes(title_id)
        .await
        .context("Episode listing failed")?;
    let episodes: Vec<&Episode> = episodes
        .iter()
        .filter(|e| season.is_none() || e.season.as_deref() == season)
        .collect();
    if episodes.is_empty() {
        println!("No episodes found.");
        return Ok(());
    }
    for episode in episodes {
        print_episode(episode);
    }
    Ok(())
}

async fn cmd_warp_to(
    config: &Config,
    query: &str,
    season: Option<&str>,
    episode_number: Option<i64>,
    subreddit: Option<String>,
) -> Result<()> {
    let client = MetadataClient::new(&config.metadata)?;
    let titles = client
        .search_titles(query)
        .await
        .context("Title search failed")?;
    let Some(title) = titles.first() else {
        println!("No titles found.");
        return Ok(());
    };

    let target = if season.is_some() || episode_number.is_some() {
        let episodes = client
            .list_episodes(&title.id)
            .await
            .context("Episode listing failed")?;
        let episode = episodes
            .iter()
            .find(|e| {
                (season.is_none() || e.season.as_deref() == season)
                    && (episode_number.is_none() || e.episode_number == episode_number)
            })
            .with_context(|| format!("No matching episode for {}", title.id))?;
        warp_target::resolve_from_episode(episode)
    } else {
        warp_target::resolve_from_title(title)
    };

    // No usable release date: leave the session wherever it was.
    let Some(anchor) = target else {
        println!(
            "{} has no usable release date; not warping.",
            title.primary_title.as_deref().unwrap_or(&title.id)
        );
        return Ok(());
    };

    println!(
        "Warp target: {anchor} ({})",
        format_ts(anchor)
    );

    if let Some(subreddit) = subreddit {
        let session = SessionState::new(subreddit, anchor, SortMode::Hot);
        cmd_browse(config, session, 1).await?;
    }
    Ok(())
}

fn format_ts(ts: i64) -> String {
    match Utc.timestamp_opt(ts, 0).single() {
        Some(dt) => dt.to_rfc3339(),
        None => format!("@{ts}"),
    }
}

fn print_submission(submission: &Submission) {
    println!(
        "{:>6}  {}  {}  (u/{}, {} comments)",
        submission.score,
        submission.created_utc.format("%Y-%m-%d %H:%M"),
        submission.title,
        submission.author,
        submission.num_comments.unwrap_or(0),
    );
}

fn print_title(title: &Title) {
    let year = title
        .start_year
        .map(|y| y.to_string())
        .unwrap_or_else(|| "????".to_string());
    let warp = warp_target::resolve_from_title(title)
        .map(|ts| format!("warp {ts}"))
        .unwrap_or_else(|| "no warp target".to_string());
    println!(
        "{}  {}  ({}, {})  [{}]",
        title.id,
        title.primary_title.as_deref().unwrap_or("<untitled>"),
        year,
        title.title_type.as_deref().unwrap_or("unknown"),
        warp,
    );
}

fn print_episode(episode: &Episode) {
    let label = match (&episode.season, episode.episode_number) {
        (Some(s), Some(n)) => format!("S{s}E{n}"),
        _ => episode.id.clone(),
    };
    let date = episode
        .release_date
        .map(|d| {
            format!(
                "{:04}-{:02}-{:02}",
                d.year,
                d.month.unwrap_or(1),
                d.day.unwrap_or(1)
            )
        })
        .unwrap_or_else(|| "undated".to_string());
    let warp = warp_target::resolve_from_episode(episode)
        .map(|ts| format!("warp {ts}"))
        .unwrap_or_else(|| "no warp target".to_string());
    println!(
        "{label}  {}  {date}  [{warp}]",
        episode.title.as_deref().unwrap_or("<untitled>"),
    );
}
