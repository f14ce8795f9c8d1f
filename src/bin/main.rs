use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use treasury_dashboard::aggregator::Aggregator;
use treasury_dashboard::server::{self, ServerState};
use treasury_dashboard::vendor::{zapper::Zapper, zerion::Zerion};

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = "127.0.0.1:8080")]
    address: String,
    /// Treasury wallet whose positions the dashboard shows.
    #[arg(long, default_value = "0xf5307a74d1550739ef81c6488dc5c7a6a53e5ac2")]
    wallet: String,
    /// Credential for the Zapper balances API. Leaving it unset degrades
    /// the aggregated-app section instead of failing startup.
    #[arg(long, env = "ZAPPER_API_KEY")]
    zapper_api_key: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "treasury_dashboard=debug,tower_http=debug,reqwest=debug".into()
        }))
        .with(fmt::layer())
        .init();

    let args = Args::parse();

    let aggregator = Aggregator::new(Zerion::new(), Zapper::new(args.zapper_api_key));

    server::start(
        args.address,
        ServerState {
            aggregator,
            wallet: args.wallet,
        },
    )
    .await
}
