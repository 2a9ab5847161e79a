use chainscope_api::SearchTarget;
use chainscope_core::{
    ChainSearcher, RankedChain, SearchConfig, SearchError, SearchStats, Snapshot, rank_chains,
};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{Table, Tabled, settings::Style};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Snapshot JSON describing the indexed code and the completion scope
    #[arg(long, value_name = "FILE")]
    pub snapshot: PathBuf,

    /// Type the completed expression must have (the element type with --array or --iterable)
    #[arg(long, value_name = "TYPE")]
    pub target: String,

    /// Look for an array of TYPE
    #[arg(long, conflicts_with = "iterable")]
    pub array: bool,

    /// Look for a CONTAINER iterating over TYPE
    #[arg(long, value_name = "CONTAINER")]
    pub iterable: Option<String>,

    /// Search configuration JSON; flags below override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub max_length: Option<usize>,

    #[arg(long)]
    pub max_results: Option<usize>,

    /// Minimum may-happen-before confidence, between 0 and 1
    #[arg(long)]
    pub threshold: Option<f64>,

    #[arg(long)]
    pub filter_ratio: Option<f64>,

    /// Print the ranked chains and search statistics as JSON
    #[arg(long)]
    pub json: bool,
}

impl SearchArgs {
    pub fn search_target(&self) -> SearchTarget {
        match (&self.iterable, self.array) {
            (Some(container), _) => {
                SearchTarget::iterable_of(container.as_str(), self.target.as_str())
            }
            (None, true) => SearchTarget::array_of(self.target.as_str()),
            (None, false) => SearchTarget::value(self.target.as_str()),
        }
    }

    pub fn search_config(&self) -> chainscope_core::Result<SearchConfig> {
        let mut config = match &self.config {
            Some(path) => SearchConfig::from_json_file(path)?,
            None => SearchConfig::default(),
        };
        if let Some(max_length) = self.max_length {
            config = config.with_max_chain_length(max_length);
        }
        if let Some(max_results) = self.max_results {
            config = config.with_max_results(max_results);
        }
        if let Some(threshold) = self.threshold {
            config = config.with_probability_threshold(threshold);
        }
        if let Some(ratio) = self.filter_ratio {
            config = config.with_filter_ratio(ratio);
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Tabled)]
struct ChainRow {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Chain")]
    chain: String,
    #[tabled(rename = "Weight")]
    weight: u64,
    #[tabled(rename = "Len")]
    length: usize,
    #[tabled(rename = "Unresolved")]
    unreachable: usize,
    #[tabled(rename = "In scope")]
    in_context: usize,
}

#[derive(Serialize)]
struct Report<'a> {
    target: String,
    chains: &'a [RankedChain],
    stats: &'a SearchStats,
}

pub async fn run(args: SearchArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = args.search_config()?;
    let target = args.search_target();
    let snapshot = Snapshot::from_json_file(&args.snapshot)?;

    info!(
        "Searching chains for {} in {}",
        target,
        args.snapshot.display()
    );

    let cancel = CancellationToken::new();
    let interrupt = {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, cancelling search");
                cancel.cancel();
            }
        })
    };

    let worker_target = target.clone();
    let result = tokio::task::spawn_blocking(move || {
        let index = snapshot.index();
        let context = snapshot.context();
        let outcome = ChainSearcher::new(config).search_with_stats(
            &worker_target,
            &context,
            &index,
            &cancel,
        )?;
        let ranked = rank_chains(outcome.chains, &worker_target, &context);
        Ok::<_, SearchError>((ranked, outcome.stats))
    })
    .await?;
    interrupt.abort();

    let (ranked, stats) = result?;
    info!("Found {} chain(s) for {}", ranked.len(), target);

    if args.json {
        let report = Report {
            target: target.to_string(),
            chains: &ranked,
            stats: &stats,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if ranked.is_empty() {
        println!("No chains found for {}.", target);
        return Ok(());
    }

    let rows: Vec<ChainRow> = ranked
        .iter()
        .enumerate()
        .map(|(i, r)| ChainRow {
            rank: i + 1,
            chain: r.chain.to_string(),
            weight: r.chain.weight(),
            length: r.chain.len(),
            unreachable: r.score.unreachable_parameters,
            in_context: r.score.parameters_in_context,
        })
        .collect();
    println!("{}", Table::new(rows).with(Style::psql()));
    println!(
        "\n{} iteration(s), {} index lookup(s){}",
        stats.iterations,
        stats.index_queries,
        if stats.early_stop { ", stopped early" } else { "" }
    );

    Ok(())
}
