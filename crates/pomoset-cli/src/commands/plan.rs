use chrono::NaiveDateTime;
use clap::Args;
use pomoset_core::timer::solve_pause_unit;
use pomoset_core::{CoreError, ResolvedSet, Session, SessionPlan};
use serde_json::{json, Value};

use super::{at_or_now, parse_at};

#[derive(Args)]
pub struct PlanArgs {
    /// Local time the set would start at (default: now)
    #[arg(long, value_parser = parse_at, conflicts_with = "total_secs")]
    at: Option<NaiveDateTime>,
    /// Solve for a fixed number of seconds instead of a work window
    #[arg(long)]
    total_secs: Option<u64>,
}

fn sessions(plan: &SessionPlan, pause_unit: f64, targets: [u64; 4]) -> Vec<Value> {
    Session::ALL
        .into_iter()
        .zip(targets)
        .map(|(session, target)| {
            let spec = plan.spec(session);
            json!({
                "session": session.number(),
                "focus_secs": f64::from(spec.focus_multiplier) * pause_unit,
                "pause_secs": f64::from(spec.pause_multiplier) * pause_unit,
                "pause": session.pause_phase().label(),
                "target_secs": target,
                "pause_threshold_secs": plan.pause_threshold(session, pause_unit),
            })
        })
        .collect()
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let plan = SessionPlan::default();

    let out = match args.total_secs {
        Some(total) => {
            let pause_unit = solve_pause_unit(&plan, total as f64, &[0; 3], &[])?;
            let targets = plan.targets(pause_unit);
            json!({
                "total_secs": total,
                "pause_unit": pause_unit,
                "sessions": sessions(&plan, pause_unit, targets),
            })
        }
        None => {
            let now = at_or_now(args.at);
            let set = ResolvedSet::resolve(&plan, now)?.ok_or(CoreError::OutOfWork { at: now })?;
            json!({
                "window": set.window,
                "deadline": set.deadline,
                "started_at": set.started_at,
                "total_secs": set.total_secs,
                "pause_unit": set.pause_unit,
                "sessions": sessions(&plan, set.pause_unit, set.targets),
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}
