mod logging;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Args as ClapArgs, Parser, Subcommand};
use serde::Serialize;

use paper_trail::content::{ContentItem, ContentSources, normalize_corpus, tag_index};
use paper_trail::graph::{assemble_graph, search_nodes};
use paper_trail::{GraphConfig, ThreadGraphContext};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Raise log verbosity (repeatable).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Build the thread graph and its layout.
    Graph {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[command(flatten)]
        overrides: Overrides,
    },
    /// Count tag usage across the corpus.
    Tags {
        #[command(flatten)]
        corpus: CorpusArgs,
    },
    /// Fuzzy-search items by title or slug.
    Search {
        #[command(flatten)]
        corpus: CorpusArgs,
        query: String,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// List the threads touching one item.
    Threads {
        #[command(flatten)]
        corpus: CorpusArgs,
        #[command(flatten)]
        overrides: Overrides,
        id: String,
    },
}

#[derive(Debug, ClapArgs)]
struct CorpusArgs {
    /// JSON file with `essays`, `field_notes`, `projects` and `shelf` lists.
    #[arg(long)]
    corpus: PathBuf,
}

#[derive(Debug, ClapArgs)]
struct Overrides {
    /// JSON config file; flags below take precedence.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    max_pairs: Option<usize>,
    #[arg(long)]
    fan_out: Option<usize>,
    #[arg(long)]
    width: Option<f32>,
    #[arg(long)]
    height: Option<f32>,
    #[arg(long)]
    iterations: Option<usize>,
}

impl Overrides {
    fn resolve(&self) -> Result<GraphConfig> {
        let mut config = match &self.config {
            Some(path) => GraphConfig::load(path)?,
            None => GraphConfig::default(),
        };

        if let Some(max_pairs) = self.max_pairs {
            config.threads.max_pairs = max_pairs;
        }
        if let Some(fan_out) = self.fan_out {
            config.threads.fan_out_cap = fan_out;
        }
        if let Some(width) = self.width {
            config.layout.width = width;
        }
        if let Some(height) = self.height {
            config.layout.height = height;
        }
        if let Some(iterations) = self.iterations {
            config.layout.iterations = iterations;
        }
        Ok(config)
    }

    fn context(&self) -> Result<ThreadGraphContext> {
        ThreadGraphContext::new(self.resolve()?).context("invalid graph configuration")
    }
}

fn load_items(path: &Path) -> Result<Vec<ContentItem>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read corpus file {}", path.display()))?;
    let sources = ContentSources::from_json(&raw)
        .with_context(|| format!("failed to parse corpus file {}", path.display()))?;
    Ok(normalize_corpus(&sources))
}

fn emit<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = if pretty {
        serde_json::to_writer_pretty(&mut out, value)
    } else {
        serde_json::to_writer(&mut out, value)
    };
    written.context("failed to write JSON output")?;
    writeln!(out).context("failed to write JSON output")
}

#[derive(Serialize)]
struct SearchHit<'a> {
    id: &'a str,
    title: &'a str,
    href: &'a str,
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Graph { corpus, overrides } => {
            let context = overrides.context()?;
            let items = load_items(&corpus.corpus)?;
            let built = context.build(&items)?;
            emit(&built, args.pretty)
        }
        Command::Tags { corpus } => {
            let items = load_items(&corpus.corpus)?;
            emit(&tag_index(&items), args.pretty)
        }
        Command::Search {
            corpus,
            query,
            limit,
        } => {
            let items = load_items(&corpus.corpus)?;
            let graph = assemble_graph(&items, &[]);
            let hits = search_nodes(&graph, &query, limit)
                .into_iter()
                .map(|node| SearchHit {
                    id: &node.id,
                    title: &node.title,
                    href: &node.href,
                })
                .collect::<Vec<_>>();
            emit(&hits, args.pretty)
        }
        Command::Threads {
            corpus,
            overrides,
            id,
        } => {
            let context = overrides.context()?;
            let items = load_items(&corpus.corpus)?;
            let built = context.build(&items)?;
            if built.graph.node(&id).is_none() {
                return Err(anyhow!("no published item with id {id}"));
            }
            emit(&built.threads_for(&id), args.pretty)
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);
    run(args)
}
