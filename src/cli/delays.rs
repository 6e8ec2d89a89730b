//! Delays command: print the fastest nodes of the group.

use crate::cli::{build_runtime, output, DelaysArgs};
use crate::engine::SelectionEngine;

/// Only the fastest nodes are worth showing; the tail is noise.
const DISPLAY_LIMIT: usize = 10;

pub async fn run_delays(args: &DelaysArgs) -> anyhow::Result<()> {
    let runtime = build_runtime(&args.config, None)?;
    let engine = SelectionEngine::new(
        &runtime.client,
        &runtime.prober,
        &runtime.config.selection,
        &runtime.config.probe,
        &runtime.config.controller.group,
    );

    let (snapshot, _) = engine.fetch_snapshots().await;
    let entries: Vec<_> = snapshot.entries().iter().take(DISPLAY_LIMIT).cloned().collect();

    if entries.is_empty() {
        if args.json {
            println!("[]");
        } else {
            println!("No delay data returned");
        }
        return Ok(());
    }

    if args.json {
        println!("{}", output::format_delays_json(&entries));
    } else {
        println!("{}", output::format_delays_table(&entries));
    }
    Ok(())
}
