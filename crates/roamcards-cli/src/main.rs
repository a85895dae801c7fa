use anyhow::{Context, Result, bail};
use clap::Parser;
use roamcards_config::Config;
use roamcards_engine::{AnkifyOptions, Graph, PagerefCloze, ParentCount, ankify_graph, load_export};
use std::io::{Write, stdout};
use std::path::PathBuf;

/// Convert blocks tagged in a Roam export into flashcard notes, one JSON object per line.
#[derive(Parser, Debug)]
#[command(name = "roamcards", version, about)]
struct Args {
    /// Roam `.json` export, or a directory holding `Roam-Export-*.json` files.
    /// Defaults to `export_path` from the config file.
    path: Option<PathBuf>,

    /// Config file to read instead of ~/.config/roamcards/config.toml
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    deck: Option<String>,

    /// Note type for question/answer blocks
    #[arg(long)]
    note_basic: Option<String>,

    /// Note type for blocks containing clozes
    #[arg(long)]
    note_cloze: Option<String>,

    /// Where the cloze goes around a lone page reference: outside, inside or base_only
    #[arg(long)]
    pageref_cloze: Option<PagerefCloze>,

    /// Blocks carrying this tag become notes
    #[arg(long)]
    tag_ankify: Option<String>,

    /// Blocks under this tag are skipped; empty to disable
    #[arg(long)]
    tag_dont_ankify: Option<String>,

    /// Ancestors above a block with this tag are never shown; empty to disable
    #[arg(long)]
    tag_ankify_root: Option<String>,

    /// Ancestors shown above the question: a number or "all"
    #[arg(long)]
    num_parents: Option<ParentCount>,

    #[arg(long)]
    include_page: bool,

    /// Levels of children shown on the back
    #[arg(long)]
    max_depth: Option<usize>,

    /// Also collect tags from `tags::` child blocks
    #[arg(long)]
    tags_from_attr: bool,

    /// Pretty-print each note
    #[arg(long)]
    pretty: bool,

    /// More logging; repeat for debug output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn non_empty(tag: String) -> Option<String> {
    if tag.is_empty() { None } else { Some(tag) }
}

/// Config values, then flags on top.
fn ankify_options(config: Config, args: &Args) -> Result<AnkifyOptions> {
    let defaults = AnkifyOptions::default();
    let pageref_cloze = match args.pageref_cloze {
        Some(mode) => mode,
        None => config.pageref_cloze.parse().context("Invalid pageref_cloze in config")?,
    };
    let num_parents = match args.num_parents {
        Some(count) => count,
        None => config
            .num_parents
            .to_string()
            .parse()
            .context("Invalid num_parents in config")?,
    };
    Ok(AnkifyOptions {
        deck: args.deck.clone().unwrap_or(config.deck),
        note_basic: args.note_basic.clone().unwrap_or(config.note_basic),
        note_cloze: args.note_cloze.clone().unwrap_or(config.note_cloze),
        pageref_cloze,
        tag_ankify: args.tag_ankify.clone().unwrap_or(config.tag_ankify),
        tag_dont_ankify: non_empty(args.tag_dont_ankify.clone().unwrap_or(config.tag_dont_ankify)),
        tag_ankify_root: non_empty(args.tag_ankify_root.clone().unwrap_or(config.tag_ankify_root)),
        num_parents,
        include_page: args.include_page || config.include_page,
        max_depth: args.max_depth.or(config.max_depth),
        tags_from_attr: args.tags_from_attr || config.tags_from_attr,
        ..defaults
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    let config_path = args.config.clone().unwrap_or_else(Config::config_path);
    log::info!("Config path: {}", config_path.display());
    let config = Config::load_from_path(&config_path)?.unwrap_or_default();

    let export_path = match args.path.clone().or_else(|| config.export_path.clone()) {
        Some(path) => path,
        None => bail!(
            "No export path provided and none set in {}",
            config_path.display()
        ),
    };
    let options = ankify_options(config, &args)?;

    let pages = load_export(&export_path)
        .with_context(|| format!("Failed to load Roam export from {}", export_path.display()))?;
    let graph = Graph::from_pages(pages);
    let report = ankify_graph(&graph, options);

    let mut out = stdout().lock();
    for note in &report.notes {
        let line = if args.pretty {
            serde_json::to_string_pretty(note)?
        } else {
            serde_json::to_string(note)?
        };
        writeln!(out, "{line}")?;
    }

    if !report.failed.is_empty() {
        log::warn!("{} blocks could not be converted", report.failed.len());
    }
    Ok(())
}
