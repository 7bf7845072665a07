use std::path::PathBuf;

use anyhow::Context;
use clap::{ArgGroup, Args, Parser, Subcommand};

mod cohort;
mod filter;
mod models;
mod report;
mod source;

use filter::FilterSet;
use models::ApiPayload;

#[derive(Parser)]
#[command(name = "ad-cohort-hits")]
#[command(about = "Weekly launch-cohort hit rate tracker for ad creatives", long_about = None)]
#[command(group(
    ArgGroup::new("snapshot")
        .args(["json", "csv"])
        .multiple(false)
))]
struct Cli {
    /// Read the payload from a local JSON snapshot instead of the API
    #[arg(long, global = true, value_name = "FILE")]
    json: Option<PathBuf>,
    /// Read flat ad-week rows from a CSV export instead of the API
    #[arg(long, global = true, value_name = "FILE")]
    csv: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FilterArgs {
    /// Campaign name at launch
    #[arg(long, default_value = filter::ALL)]
    campaign: String,
    /// Ad name at launch
    #[arg(long, default_value = filter::ALL)]
    ad: String,
    /// Editor tag embedded in the ad name
    #[arg(long, default_value = filter::ALL)]
    editor: String,
    /// Angle tag embedded in the ad name
    #[arg(long, default_value = filter::ALL)]
    angle: String,
    /// Creative strategist tag embedded in the ad name
    #[arg(long, default_value = filter::ALL)]
    strategist: String,
    /// Ad type tag embedded in the ad name
    #[arg(long, default_value = filter::ALL)]
    ad_type: String,
}

impl From<FilterArgs> for FilterSet {
    fn from(args: FilterArgs) -> Self {
        Self {
            campaign: args.campaign,
            ad: args.ad,
            editor: args.editor,
            angle: args.angle,
            strategist: args.strategist,
            ad_type: args.ad_type,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the population summary and the cohort grid
    Show {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// List distinct filter options present in the data
    Options,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let payload = load_payload(&cli).await?;

    match cli.command {
        Commands::Show { filters, limit } => {
            let filter_set = FilterSet::from(filters);
            let rows = filter::apply_filters(&payload.rows, &filter_set);
            let summaries = cohort::summarize_cohorts(&rows, cohort::evaluation_date());

            if summaries.is_empty() {
                println!("No cohort rows for this selection.");
                return Ok(());
            }

            let totals = cohort::reduce_totals(&summaries);
            println!("Selection: {}", filter_set.describe());
            println!(
                "Assets {} | hits {} | wk1 {:.1}% wk2 {:.1}% wk3 {:.1}% wk4 {:.1}%",
                totals.total_assets,
                totals.hits,
                totals.week1,
                totals.week2,
                totals.week3,
                totals.week4
            );
            for summary in summaries.iter().take(limit) {
                println!(
                    "- {} | assets {} | hits {} | wk1 {:.1}% wk2 {:.1}% wk3 {:.1}% wk4 {:.1}%",
                    summary.cohort_week,
                    summary.total_assets,
                    summary.hits,
                    summary.week1,
                    summary.week2,
                    summary.week3,
                    summary.week4
                );
            }
        }
        Commands::Report { filters, out } => {
            let filter_set = FilterSet::from(filters);
            let rows = filter::apply_filters(&payload.rows, &filter_set);
            let summaries = cohort::summarize_cohorts(&rows, cohort::evaluation_date());
            let totals = cohort::reduce_totals(&summaries);
            let report = report::build_report(
                &filter_set.describe(),
                &payload.generated_at,
                &summaries,
                &totals,
            );
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Options => {
            println!("Campaigns:");
            for option in filter::campaign_options(&payload.rows) {
                println!("- {option}");
            }
            println!();
            println!("Ads:");
            for option in filter::ad_options(&payload.rows) {
                println!("- {option}");
            }
        }
    }

    Ok(())
}

async fn load_payload(cli: &Cli) -> anyhow::Result<ApiPayload> {
    if let Some(path) = &cli.json {
        println!("Loading rows from {}...", path.display());
        return source::load_json(path);
    }

    if let Some(path) = &cli.csv {
        println!("Importing rows from {}...", path.display());
        let rows = source::import_csv(path)?;
        return Ok(ApiPayload {
            generated_at: String::new(),
            count: rows.len() as u64,
            rows,
        });
    }

    let url = std::env::var("AD_WEEKS_URL")
        .context("AD_WEEKS_URL must point at the ad-weeks endpoint (or pass --json/--csv)")?;
    println!("Fetching rows from {url}...");
    source::fetch_payload(&url).await
}
