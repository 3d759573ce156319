use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use wayfarer_core::{
    CompanionType, DateRange, FlowKind, Interest, Location, QuickAction, TripParameters, TripStyle,
};
use wayfarer_currency::{format_amount, CurrencyRequest, CurrencyService, HttpRateProvider};
use wayfarer_observability::{init_tracing, AppMetrics};
use wayfarer_planner::{GenerationConfig, PlanningSession, TripPlanner};
use wayfarer_storage::Store;

#[derive(Debug, Parser)]
#[command(name = "wayfarer")]
#[command(about = "Wayfarer trip planning CLI")]
struct Cli {
    #[arg(long, env = "WAYFARER_DATABASE_URL")]
    database_url: Option<String>,

    #[arg(long, env = "WAYFARER_CURRENCY_API_URL")]
    currency_api_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the step registry of a flow.
    Steps {
        #[arg(long, default_value = "quick")]
        flow: String,
    },
    /// Synthesize an itinerary without a session.
    Synthesize {
        #[arg(long)]
        destination: String,
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
        #[arg(long = "interest")]
        interests: Vec<String>,
        #[arg(long, default_value_t = 2)]
        travelers: u32,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run the quick flow end to end and confirm the plan.
    Quick {
        #[arg(long)]
        destination: String,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
        #[arg(long, default_value = "couple")]
        companion: String,
        #[arg(long = "style", default_value = "culture")]
        styles: Vec<String>,
        #[arg(long, default_value = "cli-user")]
        user: String,
        #[arg(long, default_value_t = 7)]
        seed: u64,
    },
    /// Convert an amount between currencies.
    Convert {
        #[arg(long)]
        amount: f64,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },
    /// List stored plans for a user.
    Plans {
        #[arg(long)]
        user: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("wayfarer_cli");
    let cli = Cli::parse();

    let seed = match &cli.command {
        Command::Quick { seed, .. } => Some(*seed),
        Command::Synthesize { seed, .. } => *seed,
        _ => None,
    };
    let planner = build_planner(&cli, seed).await?;

    match cli.command {
        Command::Steps { flow } => {
            let kind = FlowKind::parse(&flow).context("invalid --flow value")?;
            for (index, step) in kind.steps().iter().enumerate() {
                let marker = if step.optional { " (optional)" } else { "" };
                println!("{:>2}. {:<16} {}{}", index + 1, step.id, step.title, marker);
            }
        }
        Command::Synthesize {
            destination,
            start,
            end,
            interests,
            travelers,
            seed,
        } => {
            let interests = interests
                .iter()
                .map(|value| {
                    Interest::parse(value).with_context(|| format!("invalid --interest `{}`", value))
                })
                .collect::<Result<Vec<_>>>()?;

            let params = TripParameters {
                destination: Some(destination),
                dates: DateRange::new(start, end),
                interests,
                travelers: travelers.max(1),
                ..TripParameters::default()
            };
            let content = planner.synthesize(&params, seed);
            println!("{}", serde_json::to_string_pretty(&content)?);
        }
        Command::Quick {
            destination,
            start,
            end,
            companion,
            styles,
            user,
            seed: _,
        } => {
            let companion =
                CompanionType::parse(&companion).context("invalid --companion value")?;
            let styles = styles
                .iter()
                .map(|value| {
                    TripStyle::parse(value).with_context(|| format!("invalid --style `{}`", value))
                })
                .collect::<Result<Vec<_>>>()?;

            let session = planner.open_session(FlowKind::Quick, &user);
            run_quick_flow(&session, destination, start, end, companion, styles).await?;
        }
        Command::Convert { amount, from, to } => {
            let response = planner
                .exchange(CurrencyRequest::Convert {
                    amount,
                    from_currency: from,
                    to_currency: to,
                })
                .await?;
            if let wayfarer_currency::CurrencyData::Conversion(result) = &response.data {
                println!(
                    "{} = {} (rate {}, source {:?})",
                    format_amount(result.from.amount, &result.from.currency),
                    format_amount(result.to.amount, &result.to.currency),
                    result.to.rate,
                    response.meta.source
                );
            }
        }
        Command::Plans { user } => {
            let plans = planner.list_plans(&user).await?;
            println!("{}", serde_json::to_string_pretty(&plans)?);
        }
    }

    Ok(())
}

async fn run_quick_flow(
    session: &PlanningSession<Store>,
    destination: String,
    start: NaiveDate,
    end: NaiveDate,
    companion: CompanionType,
    styles: Vec<TripStyle>,
) -> Result<()> {
    let mut actions = vec![
        QuickAction::SetDestination {
            destination: Some(Location::named(destination)),
        },
        QuickAction::SetDates {
            start: Some(start),
            end: Some(end),
        },
        QuickAction::SetCompanion {
            companion: Some(companion),
        },
    ];
    actions.extend(styles.into_iter().map(|style| QuickAction::ToggleStyle { style }));

    for action in actions {
        session.edit(serde_json::to_value(action)?)?;
        session.next();
    }
    while session.next().moved {}

    let view = session.view();
    if !view.workflow.ready {
        bail!("quick flow is incomplete at step `{}`", view.workflow.step_id);
    }

    let handle = session.start_generation()?;
    let mut progress = handle.progress();
    let watcher = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let status = *progress.borrow();
            eprintln!("[{:>3}%] {}", status.progress, status.message());
        }
    });
    let status = handle.wait().await;
    watcher.abort();
    if !status.is_generating && session.generated_content().is_none() {
        bail!("itinerary generation stopped before completing");
    }

    let confirmed = session.confirm_plan().await?;
    println!("{}", serde_json::to_string_pretty(&confirmed)?);
    Ok(())
}

async fn build_planner(cli: &Cli, seed: Option<u64>) -> Result<TripPlanner<Store>> {
    let metrics = AppMetrics::shared();

    let store = match cli.database_url.as_deref() {
        Some(database_url) => Store::sqlite(database_url).await?,
        None => Store::memory(),
    };

    let currency = match cli.currency_api_url.as_deref() {
        Some(url) => CurrencyService::new(HttpRateProvider::new(url, Duration::from_secs(6))?),
        None => CurrencyService::offline(),
    };

    let generation = GenerationConfig {
        tick: Duration::from_millis(20),
        step: 20,
        seed,
    };

    Ok(TripPlanner::new(Arc::new(store), currency, metrics, generation))
}
