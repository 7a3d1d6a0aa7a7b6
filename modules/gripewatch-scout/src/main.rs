use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gripewatch_common::{ComplaintResult, FanOut, Query, ScoutConfig};
use gripewatch_scout::{sort_for_display, ComplaintSearch};

#[derive(Parser)]
#[command(name = "gripewatch")]
#[command(about = "Search public sources for complaints about a company or product")]
#[command(version)]
struct Cli {
    /// Company, product or service to search for
    query: Vec<String>,

    /// Maximum number of results (overrides GRIPEWATCH_MAX_RESULTS)
    #[arg(short = 'n', long)]
    max_results: Option<usize>,

    /// Query every source at once instead of one after another
    #[arg(long)]
    concurrent: bool,

    /// Print results as a JSON array
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("gripewatch=info".parse()?);
    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let cli = Cli::parse();

    let mut config = ScoutConfig::from_env()?;
    if cli.concurrent {
        config.fan_out = FanOut::Concurrent;
    }
    config.log_summary();

    let raw_query = cli.query.join(" ");
    if Query::parse(&raw_query).is_none() {
        println!("No query submitted.");
        return Ok(());
    }

    let max_results = cli.max_results.unwrap_or(config.max_results);
    let search = ComplaintSearch::from_config(&config)?;
    let mut results = search.search(&raw_query, max_results).await;
    sort_for_display(&mut results);

    info!(count = results.len(), "Printing results");
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print_grouped(&raw_query, &results);
    }

    Ok(())
}

fn print_grouped(query: &str, results: &[ComplaintResult]) {
    println!("Complaints about \"{}\" ({} found)", query.trim(), results.len());

    let mut current: Option<&str> = None;
    for result in results {
        if current != Some(result.category.as_str()) {
            println!();
            println!("== {} ==", result.category);
            current = Some(result.category.as_str());
        }
        let c = &result.candidate;
        println!("- {} [{}]", c.title, c.source);
        if !c.excerpt.is_empty() {
            println!("  {}", c.excerpt);
        }
        if !c.url.is_empty() {
            println!("  {}", c.url);
        }
    }
}
