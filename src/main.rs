use clap::{Args as ClapArgs, Parser, Subcommand};
use ideaflow::loader;
use ideaflow::prelude::*;
use ideaflow::selectors::location_counts;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Incrementally filter a civic idea dataset
#[derive(Parser, Debug)]
#[command(name = "ideaflow")]
#[command(about = "Filter idea datasets and summarize pipeline stages")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print matching ideas as JSON, one per line
    Filter {
        /// Path to the idea dataset (JSON array)
        dataset: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Log the size of every partial result
        #[arg(long)]
        progress: bool,
    },

    /// Print stage bucket sizes and per-borough counts for matching ideas
    Stages {
        /// Path to the idea dataset (JSON array)
        dataset: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(ClapArgs, Debug)]
struct FilterArgs {
    /// Case-insensitive substring of the idea's solution text
    #[arg(short, long)]
    keyword: Option<String>,

    /// Borough: brooklyn, bronx, manhattan, queens, staten island
    #[arg(short, long)]
    borough: Option<String>,

    /// Required impact area (repeatable; all must match)
    #[arg(short, long = "topic")]
    topics: Vec<String>,

    /// Required audience (repeatable; all must match)
    #[arg(short, long = "audience")]
    audiences: Vec<String>,

    /// Stage: submitted, BA or ballot
    #[arg(long, default_value = "submitted")]
    stage: String,

    /// Stage rule for the BA filter: observed or narrative
    #[arg(long, default_value = "observed")]
    stage_rule: String,

    /// Records per slice (default: 100, or IDEAFLOW_SLICE_SIZE env var)
    #[arg(long)]
    slice_size: Option<usize>,

    /// Pause between slices in milliseconds (default: 50, or IDEAFLOW_DELAY_MS env var)
    #[arg(long)]
    delay_ms: Option<u64>,
}

impl FilterArgs {
    fn spec(&self) -> anyhow::Result<FilterSpecification> {
        let borough = self
            .borough
            .as_deref()
            .map(str::parse::<Borough>)
            .transpose()?;

        Ok(FilterSpecification::new()
            .with_keyword(self.keyword.as_deref())
            .with_borough(borough)
            .with_topic_tags(self.topics.iter().cloned())
            .with_audience_tags(self.audiences.iter().cloned())
            .with_stage(self.stage.parse()?))
    }

    fn config(&self) -> anyhow::Result<SchedulerConfig> {
        // Flag first, then environment variable, then default
        let mut builder = SchedulerConfigBuilder::new().stage_rule_str(&self.stage_rule)?;

        if let Some(size) = self
            .slice_size
            .or_else(|| env_number("IDEAFLOW_SLICE_SIZE"))
        {
            builder = builder.slice_size(size);
        }

        if let Some(ms) = self.delay_ms.or_else(|| env_number("IDEAFLOW_DELAY_MS")) {
            builder = builder.delay_ms(ms);
        }

        Ok(builder.build()?)
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|s| s.parse().ok())
}

fn print_available_commands() {
    println!("Available commands:");
    println!("  filter  Print matching ideas as JSON, one per line");
    println!("  stages  Print stage bucket sizes and per-borough counts");
}

/// Load the dataset into a fresh store with the requested filter applied
async fn open_store(dataset: &Path, filter: &FilterArgs) -> anyhow::Result<IdeaStore> {
    let mut store = IdeaStore::new(filter.config()?);
    store.set_filter(filter.spec()?);

    let state = loader::load_state_from_path(dataset).await;
    if let LoadState::Failed(reason) = &state {
        return Err(Error::DatasetUnavailable(reason.clone()).into());
    }
    store.set_load_state(state);

    Ok(store)
}

async fn run_filter_command(cmd: Command) -> anyhow::Result<()> {
    let Command::Filter {
        dataset,
        filter,
        progress,
    } = cmd
    else {
        unreachable!()
    };

    let store = open_store(&dataset, &filter).await?;

    if progress {
        let generation = store.scheduler().generation();
        let mut receiver = store.subscribe();
        loop {
            let (matched, done) = {
                let current = receiver.borrow_and_update();
                (
                    current.len(),
                    current.generation() == generation && current.is_complete(),
                )
            };
            info!(matched, "Partial result");
            if done {
                break;
            }
            receiver.changed().await?;
        }
    }

    let result = store.wait_for_completion().await?;
    for idea in result.iter() {
        println!("{}", serde_json::to_string(idea)?);
    }

    Ok(())
}

async fn run_stages_command(cmd: Command) -> anyhow::Result<()> {
    let Command::Stages { dataset, filter } = cmd else {
        unreachable!()
    };

    let store = open_store(&dataset, &filter).await?;
    let result = store.wait_for_completion().await?;

    let summary = serde_json::json!({
        "filter": result.spec(),
        "counts": classify_result(&result).counts(),
        "boroughs": location_counts(result.iter()),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ideaflow=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match args.command {
        Some(cmd @ Command::Filter { .. }) => run_filter_command(cmd).await,
        Some(cmd @ Command::Stages { .. }) => run_stages_command(cmd).await,
        None => {
            print_available_commands();
            Ok(())
        }
    }
}
