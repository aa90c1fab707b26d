use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use axum_prometheus::PrometheusMetricLayer;
use clap::{Args, Parser, Subcommand};
use ewco_grants::config::AppConfig;
use ewco_grants::error::AppError;
use ewco_grants::telemetry;
use ewco_grants::workflows::ewco::{
    application_router, BenefitCategory, GrantApplicationService, InMemoryRepository,
    PaymentBreakdown, PaymentEngine, PaymentInput,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
struct AppState {
    readiness: Arc<AtomicBool>,
    metrics: PrometheusHandle,
}

#[derive(Parser, Debug)]
#[command(
    name = "EWCO Grants Service",
    about = "Run the woodland-creation grant application service or estimate payments from the command line",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Grant payment estimation tools
    Payments {
        #[command(subcommand)]
        command: PaymentsCommand,
    },
}

#[derive(Args, Debug, Default)]
struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    port: Option<u16>,
}

#[derive(Subcommand, Debug)]
enum PaymentsCommand {
    /// Print an itemized payment estimate for a proposed woodland
    Estimate(EstimateArgs),
}

#[derive(Args, Debug)]
struct EstimateArgs {
    /// Land area in hectares
    #[arg(long)]
    area: f64,
    /// Additional benefit category (none, carbon, biodiversity, water, flood, access, multiple)
    #[arg(long, value_parser = parse_benefit, default_value = "none")]
    benefit: BenefitCategory,
    /// Land qualifies as low sensitivity
    #[arg(long)]
    low_sensitivity: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run_cli().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

async fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => run_server(args).await,
        Command::Payments {
            command: PaymentsCommand::Estimate(args),
        } => run_estimate(args),
    }
}

fn parse_benefit(raw: &str) -> Result<BenefitCategory, String> {
    raw.parse::<BenefitCategory>().map_err(|err| err.to_string())
}

async fn run_server(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let state = AppState {
        readiness: readiness_flag.clone(),
        metrics: prometheus_handle,
    };

    let repository = Arc::new(InMemoryRepository::default());
    let service = Arc::new(GrantApplicationService::new(repository));

    let app = Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .with_state(state)
        .merge(application_router(service))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "grants service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let engine = PaymentEngine::default();
    let input = PaymentInput {
        area_hectares: args.area,
        low_sensitivity: args.low_sensitivity,
        benefit: args.benefit,
    };
    let breakdown = engine.calculate(&input)?;
    render_estimate(&input, &breakdown);
    Ok(())
}

fn render_estimate(input: &PaymentInput, breakdown: &PaymentBreakdown) {
    println!("EWCO payment estimate");
    println!(
        "Land area {} ha, benefit category '{}', {} sensitivity land",
        input.area_hectares,
        input.benefit.label(),
        if input.low_sensitivity { "low" } else { "standard" }
    );
    println!();
    println!("Standard capital costs      £{:>12.2}", breakdown.standard_capital);
    println!("Annual maintenance (15 yr)  £{:>12.2}", breakdown.annual_maintenance);
    println!("Low sensitivity payment     £{:>12.2}", breakdown.low_sensitivity_payment);
    println!("Additional contributions    £{:>12.2}", breakdown.additional_contributions);
    println!("Nature recovery premium     £{:>12.2}", breakdown.nature_recovery_premium);
    println!("Total                       £{:>12.2}", breakdown.total);
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
