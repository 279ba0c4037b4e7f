//! CLI for the Stand With Crypto backend services.

mod pipeline;
mod server;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use swc_db::{queries, DbPool};
use swc_matching::{DdhqCandidate, DtsiPerson};
use swc_messaging::{
    EventSink, HttpEventSink, NoopEventSink, SendSmsPayload, SmsClient, SmsOptInResult,
    SmsOptInService, TwilioConfig, TwilioSmsClient,
};
use swc_telemetry::{init_logging, LogFormat, Metrics};
use tracing::{info, warn};

use crate::pipeline::run_match;
use crate::server::AppState;

#[derive(Parser)]
#[command(name = "swc")]
#[command(about = "Stand With Crypto backend: candidate matching, user actions and messaging")]
struct Cli {
    /// Log level
    #[arg(long, global = true, env = "SWC_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log output format (json or pretty)
    #[arg(long, global = true, default_value = "json")]
    log_format: LogFormat,

    /// Database path
    #[arg(long, global = true, env = "SWC_DATABASE_PATH", default_value = "swc.db")]
    database_path: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate,
    /// Match DTSI people against DDHQ candidates
    MatchCandidates {
        /// DTSI people JSON file
        #[arg(long)]
        dtsi: PathBuf,

        /// DDHQ candidates file (.json or .csv)
        #[arg(long)]
        ddhq: PathBuf,

        /// Persist matched pairs to the database
        #[arg(long, default_value = "false")]
        store: bool,

        /// Sample output path for audit logs
        #[arg(long)]
        sample_output_path: Option<PathBuf>,
    },
    /// Print total donations in USD
    SumDonations,
    /// Opt a user in to SMS with the given phone number
    OptInSms {
        #[arg(long)]
        user_id: String,

        #[arg(long)]
        phone_number: String,

        #[command(flatten)]
        events: EventArgs,
    },
    /// Send a single SMS
    SendSms {
        /// Destination in E.164 format
        #[arg(long)]
        to: String,

        #[arg(long)]
        body: String,
    },
    /// Start the HTTP API
    Serve {
        /// API bind address
        #[arg(long, default_value = "0.0.0.0:9090")]
        bind_address: String,

        #[command(flatten)]
        events: EventArgs,
    },
}

#[derive(clap::Args)]
struct EventArgs {
    /// Workflow event ingest URL; events are dropped when unset
    #[arg(long, env = "SWC_EVENT_ENDPOINT")]
    event_endpoint: Option<String>,

    /// CRM campaign for default subscribers
    #[arg(long, env = "CAPITOL_CANARY_SUBSCRIBER_CAMPAIGN_ID", default_value = "0")]
    subscriber_campaign_id: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is normal outside local development.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref(), cli.log_format)?;

    match cli.command {
        Commands::Migrate => {
            open_db(&cli.database_path).await?;
            info!("Database at {} is up to date", cli.database_path);
        }
        Commands::MatchCandidates {
            dtsi,
            ddhq,
            store,
            sample_output_path,
        } => {
            let people: Vec<DtsiPerson> = read_json(&dtsi)?;
            let candidates = read_candidates(&ddhq)?;
            let db = if store {
                Some(open_db(&cli.database_path).await?)
            } else {
                None
            };
            let metrics = Metrics::new()?;
            let report = run_match(
                &people,
                &candidates,
                &metrics,
                db.as_ref(),
                sample_output_path.as_deref(),
            )
            .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::SumDonations => {
            let db = open_db(&cli.database_path).await?;
            let totals = queries::sum_donations(&db).await?;
            println!("{}", serde_json::to_string_pretty(&totals)?);
        }
        Commands::OptInSms {
            user_id,
            phone_number,
            events,
        } => {
            let db = open_db(&cli.database_path).await?;
            let metrics = Metrics::new()?;
            let service = SmsOptInService::new(
                db,
                event_sink(&events, &metrics),
                events.subscriber_campaign_id,
            );
            match service
                .update_user_has_opted_in_to_sms(&user_id, &phone_number)
                .await?
            {
                SmsOptInResult::Updated { user } => {
                    info!(user_id = %user.id, "User opted in to SMS");
                }
                SmsOptInResult::Invalid { errors } => {
                    anyhow::bail!("invalid input: {}", serde_json::to_string(&errors)?);
                }
            }
        }
        Commands::SendSms { to, body } => {
            let metrics = Metrics::new()?;
            let client = TwilioSmsClient::new(TwilioConfig::from_env()?, metrics);
            let sent = client.send_sms(&SendSmsPayload::new(to, body)).await?;
            println!("{}", serde_json::to_string_pretty(&sent)?);
        }
        Commands::Serve {
            bind_address,
            events,
        } => {
            let db = open_db(&cli.database_path).await?;
            let metrics = Metrics::new()?;
            let opt_in = SmsOptInService::new(
                db.clone(),
                event_sink(&events, &metrics),
                events.subscriber_campaign_id,
            );
            let state = AppState {
                db,
                metrics,
                opt_in: Arc::new(opt_in),
            };
            server::serve(&bind_address, state).await?;
        }
    }

    Ok(())
}

async fn open_db(path: &str) -> anyhow::Result<DbPool> {
    let db = DbPool::new(path).await?;
    db.migrate().await?;
    Ok(db)
}

fn event_sink(args: &EventArgs, metrics: &Metrics) -> Arc<dyn EventSink> {
    match &args.event_endpoint {
        Some(endpoint) => Arc::new(HttpEventSink::new(endpoint, metrics.clone())),
        None => {
            warn!("No event endpoint configured, workflow events will be dropped");
            Arc::new(NoopEventSink)
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let value = serde_json::from_reader(std::io::BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(value)
}

fn read_candidates(path: &Path) -> anyhow::Result<Vec<DdhqCandidate>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return read_json(path);
    }

    info!("Importing candidates from {}", path.display());
    let mut reader = csv::Reader::from_path(path)?;
    let mut candidates = Vec::new();
    for result in reader.deserialize() {
        let candidate: DdhqCandidate = result?;
        candidates.push(candidate);
    }
    info!("Imported {} candidates", candidates.len());
    Ok(candidates)
}
