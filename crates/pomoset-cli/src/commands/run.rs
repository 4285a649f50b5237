//! Interactive session: the ticker runs in the background while commands
//! arrive one per line on stdin.

use std::sync::Arc;

use pomoset_core::{
    BellNotifier, Config, CoreError, LogNotifier, Notifier, SystemClock, TimerService,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

const HELP: &str = "commands: toggle | remaining | status | quit";

fn notifiers(config: &Config) -> Vec<Arc<dyn Notifier>> {
    let mut notifiers: Vec<Arc<dyn Notifier>> = Vec::new();
    if config.notifications.enabled {
        notifiers.push(Arc::new(LogNotifier));
        if config.notifications.bell {
            notifiers.push(Arc::new(BellNotifier));
        }
    }
    notifiers
}

/// Handle one input line. Returns `false` when the session should end.
async fn handle(service: &TimerService, line: &str) -> Result<bool, CoreError> {
    match line {
        "" => {}
        "toggle" | "t" => match service.toggle().await {
            Ok(_) => println!("{}", service.remaining().await),
            Err(e @ CoreError::OutOfWork { .. }) => println!("{e}"),
            Err(e @ CoreError::DegenerateEquation(_)) => eprintln!("error: {e}"),
            Err(e) => return Err(e),
        },
        "remaining" | "r" => println!("{}", service.remaining().await),
        "status" | "s" => println!("{}", serde_json::to_string_pretty(&service.snapshot().await)?),
        "quit" | "q" => return Ok(false),
        other => {
            warn!(command = other, "unknown command");
            eprintln!("{HELP}");
        }
    }
    Ok(true)
}

async fn serve(service: TimerService) -> Result<(), CoreError> {
    service.start().await;
    eprintln!("{HELP}");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break Ok(());
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => match handle(&service, line.trim()).await {
                    Ok(true) => {}
                    Ok(false) => break Ok(()),
                    Err(e) => break Err(e),
                },
                Ok(None) => break Ok(()),
                Err(e) => break Err(CoreError::Io(e)),
            },
        }
    };

    service.shutdown().await;
    result
}

pub fn run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let service = TimerService::new(Arc::new(SystemClock))
        .with_tick_interval(config.tick_interval())
        .with_notifiers(notifiers(config));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(service))?;
    Ok(())
}
