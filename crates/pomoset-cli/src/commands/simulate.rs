use chrono::NaiveDateTime;
use clap::Args;
use pomoset_core::simulation::{self, Scenario};

use super::parse_at;

#[derive(Args)]
pub struct SimulateArgs {
    /// Local start time, e.g. "2024-05-06 10:00:00"
    #[arg(long, value_parser = parse_at)]
    at: NaiveDateTime,
    /// Number of one-second ticks to run
    #[arg(long, default_value = "3600")]
    ticks: u64,
    /// Resume after each session end once this many seconds have passed
    #[arg(long)]
    idle: Option<u64>,
}

pub fn run(args: SimulateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut scenario = Scenario::new(args.at, args.ticks);
    if let Some(idle) = args.idle {
        scenario = scenario.with_auto_resume(idle);
    }

    let report = simulation::run(&scenario)?;
    for event in &report.events {
        println!("{}", serde_json::to_string(event)?);
    }
    if let Some(at) = report.stopped_out_of_work_at {
        eprintln!("stopped: out of work at {at}");
    }
    eprintln!(
        "{} session(s) completed over {} set(s)",
        report.sessions_completed, report.sets_started
    );
    println!("{}", report.snapshot.display);
    Ok(())
}
