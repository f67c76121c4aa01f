//! Status command implementation

use crate::api::types::StatusReport;
use crate::cli::output::{format_status, format_status_json};
use crate::cli::StatusArgs;
use crate::client::{ArkClient, StatusContext};
use std::time::Duration;

fn render(report: &StatusReport, json: bool) -> Result<String, Box<dyn std::error::Error>> {
    if json {
        Ok(format_status_json(report)?)
    } else {
        Ok(format_status(report))
    }
}

/// Handle `ark status` command
///
/// Prints the report; fails when the upstream is offline so scripts can
/// branch on the exit code.
pub async fn handle_status(args: &StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let client = ArkClient::new(&args.relay.url);

    if let Some(secs) = args.watch {
        return watch_status(client, Duration::from_secs(secs.max(1)), args.json).await;
    }

    let report = client.check_status().await;
    println!("{}", render(&report, args.json)?);

    if report.is_online() {
        Ok(())
    } else {
        Err("upstream is offline".into())
    }
}

/// Print the status, then every change, until interrupted.
async fn watch_status(
    client: ArkClient,
    period: Duration,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let context = StatusContext::start(client, Some(period)).await;
    let mut receiver = context.subscribe();

    let initial = receiver.borrow_and_update().clone();
    println!("{}", render(&initial, json)?);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = receiver.changed() => {
                if changed.is_err() {
                    break;
                }
                let report = receiver.borrow_and_update().clone();
                println!("{}", render(&report, json)?);
            }
        }
    }

    context.shutdown().await;
    Ok(())
}
