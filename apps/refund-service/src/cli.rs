//! # `mall-refund` Command Line
//!
//! ## Usage
//! ```bash
//! mall-refund --user alice orders
//! mall-refund --user alice order <ORDER_ID>
//! mall-refund --user alice refund <ORDER_ID> --product prod-mug --quantity 2 --reason "chipped"
//! mall-refund --user alice ledger <ORDER_ID>
//! mall-refund --user admin --admin orders
//! ```

use std::path::PathBuf;

use crate::api::RefundRequestBody;
use crate::orders::Caller;

pub const USAGE: &str = "\
Mall Refunds CLI

Usage: mall-refund [OPTIONS] --user <USER> <COMMAND>

Commands:
  orders                        List orders visible to the caller
  order <ORDER_ID>              Show one order
  refund <ORDER_ID>             Request a refund
      --product <ID>            Product to refund
      --quantity <N>            Units to refund
      --reason <TEXT>           Why the refund is requested
  ledger <ORDER_ID>             Show the refunds of an order

Options:
  -u, --user <USER>             Authenticated user id
      --admin                   Act with admin visibility
  -d, --db <PATH>               Database file (overrides MALL_DB_PATH)
  -h, --help                    Show this help message";

/// A parsed subcommand.
#[derive(Debug, Clone)]
pub enum Command {
    Orders,
    Order { order_id: String },
    Refund { order_id: String, body: RefundRequestBody },
    Ledger { order_id: String },
}

/// Parsed command line.
#[derive(Debug, Clone)]
pub struct CliArgs {
    pub db_path: Option<PathBuf>,
    pub caller: Caller,
    pub command: Command,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CliError {
    #[error("help requested")]
    Help,

    #[error("{0}")]
    Usage(String),
}

/// Parses arguments, excluding the program name.
pub fn parse_args<I, S>(args: I) -> Result<CliArgs, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut args = args.into_iter().map(Into::into);

    let mut db_path = None;
    let mut user = None;
    let mut is_admin = false;
    let mut product = None;
    let mut quantity = None;
    let mut reason = None;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--help" | "-h" => return Err(CliError::Help),
            "--db" | "-d" => db_path = Some(PathBuf::from(value(&mut args, &arg)?)),
            "--user" | "-u" => user = Some(value(&mut args, &arg)?),
            "--admin" => is_admin = true,
            "--product" => product = Some(value(&mut args, &arg)?),
            "--quantity" => {
                let raw = value(&mut args, &arg)?;
                let parsed = raw
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| CliError::Usage(format!("--quantity must be an integer, got '{raw}'")))?;
                quantity = Some(parsed);
            }
            "--reason" => reason = Some(value(&mut args, &arg)?),
            other if other.starts_with('-') => {
                return Err(CliError::Usage(format!("unknown option '{other}'")));
            }
            _ => positional.push(arg),
        }
    }

    let user = user.ok_or_else(|| CliError::Usage("--user is required".to_string()))?;
    let caller = Caller {
        user_id: user,
        is_admin,
    };

    let mut positional = positional.into_iter();
    let name = positional
        .next()
        .ok_or_else(|| CliError::Usage("missing command".to_string()))?;

    let mut order_id = || {
        positional
            .next()
            .ok_or_else(|| CliError::Usage(format!("'{name}' needs an ORDER_ID")))
    };

    let command = match name.as_str() {
        "orders" => Command::Orders,
        "order" => Command::Order {
            order_id: order_id()?,
        },
        "ledger" => Command::Ledger {
            order_id: order_id()?,
        },
        "refund" => Command::Refund {
            order_id: order_id()?,
            body: RefundRequestBody {
                product_id: product,
                quantity,
                reason,
            },
        },
        other => return Err(CliError::Usage(format!("unknown command '{other}'"))),
    };

    Ok(CliArgs {
        db_path,
        caller,
        command,
    })
}

fn value(args: &mut impl Iterator<Item = String>, flag: &str) -> Result<String, CliError> {
    args.next()
        .ok_or_else(|| CliError::Usage(format!("{flag} needs a value")))
}
