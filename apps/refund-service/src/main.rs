//! # mall-refund
//!
//! Runs one refund or order operation against a local database and prints
//! the JSON envelope.
//!
//! ## Exit Codes
//! - `0` - `success: true`
//! - `1` - the operation was rejected or failed
//! - `2` - bad command line or configuration

use std::process::ExitCode;
use std::sync::Arc;

use mall_db::Database;
use mall_refund_service::cli::{self, CliError, Command};
use mall_refund_service::{telemetry, ApiReply, RefundApi, ServiceConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    telemetry::init_tracing();

    let args = match cli::parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(CliError::Help) => {
            println!("{}", cli::USAGE);
            return ExitCode::SUCCESS;
        }
        Err(CliError::Usage(message)) => {
            eprintln!("error: {message}\n\n{}", cli::USAGE);
            return ExitCode::from(2);
        }
    };

    let mut config = match ServiceConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };
    if let Some(path) = args.db_path {
        config.db_path = path;
    }

    info!(path = %config.db_path.display(), "Opening database");
    let db = match Database::new(config.db_config()).await {
        Ok(db) => db,
        Err(e) => {
            error!(error = %e, "Failed to open database");
            return ExitCode::FAILURE;
        }
    };

    let catalog = config.catalog_lookup(Arc::new(db.products()));
    let api = RefundApi::new(db.clone(), catalog);
    let caller = &args.caller;

    let reply = match args.command {
        Command::Orders => api.list_orders(caller).await,
        Command::Order { order_id } => api.order_detail(caller, &order_id).await,
        Command::Ledger { order_id } => api.list_refunds(caller, &order_id).await,
        Command::Refund { order_id, body } => api.create_refund(caller, &order_id, body).await,
    };

    print_reply(&reply);
    db.close().await;

    if reply.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn print_reply(reply: &ApiReply) {
    match serde_json::to_string_pretty(&reply.body) {
        Ok(json) => println!("{json}"),
        Err(e) => error!(error = %e, "Failed to render reply"),
    }
}
