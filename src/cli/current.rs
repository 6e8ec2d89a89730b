//! Current command: the active node and its delay.

use crate::cli::{build_runtime, output, CurrentArgs};
use crate::engine::SelectionEngine;
use serde_json::json;

pub async fn run_current(args: &CurrentArgs) -> anyhow::Result<()> {
    let runtime = build_runtime(&args.config, None)?;
    let group = &runtime.config.controller.group;

    let current = match runtime.client.current_proxy(group).await {
        Ok(current) => current,
        Err(e) => {
            tracing::warn!(error = %e, "current proxy check failed");
            None
        }
    };
    let Some(current) = current else {
        if args.json {
            println!(
                "{}",
                output::to_ascii_json(&json!({"error": "current proxy not found"}))
            );
        } else {
            println!("Current proxy not found");
        }
        return Ok(());
    };

    // Current-node lookup must not be hidden by the candidate filter.
    let engine = SelectionEngine::new(
        &runtime.client,
        &runtime.prober,
        &runtime.config.selection,
        &runtime.config.probe,
        group,
    );
    let (_, unfiltered) = engine.fetch_snapshots().await;

    match unfiltered.delay_of(&current) {
        Some(delay) => {
            if args.json {
                println!(
                    "{}",
                    output::to_ascii_json(&json!({"name": current, "delay_ms": delay}))
                );
            } else {
                println!("{}ms\t{}", delay, output::sanitize_name(&current));
            }
        }
        None => {
            if args.json {
                println!(
                    "{}",
                    output::to_ascii_json(&json!({"name": current, "delay_ms": null}))
                );
            } else {
                println!("delay unavailable\t{}", output::sanitize_name(&current));
            }
        }
    }
    Ok(())
}
