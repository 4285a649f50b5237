use chrono::NaiveDateTime;
use clap::Args;
use pomoset_core::window::{available_seconds, WindowStatus};
use pomoset_core::resolve_deadline;
use serde_json::json;

use super::{at_or_now, parse_at};

#[derive(Args)]
pub struct WindowArgs {
    /// Local time to evaluate (default: now)
    #[arg(long, value_parser = parse_at)]
    at: Option<NaiveDateTime>,
}

pub fn run(args: WindowArgs) -> Result<(), Box<dyn std::error::Error>> {
    let now = at_or_now(args.at);
    let status = resolve_deadline(now);
    let available = match &status {
        WindowStatus::Open { deadline, .. } => Some(available_seconds(now, *deadline)),
        WindowStatus::Unavailable => None,
    };
    let out = json!({
        "at": now,
        "window": status,
        "available_secs": available,
    });
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
