//! Select command: one decision cycle.

use crate::cli::{build_runtime, output, SelectArgs};
use crate::engine::SelectionEngine;

pub async fn run_select(args: &SelectArgs) -> anyhow::Result<()> {
    let runtime = build_runtime(&args.config, None)?;
    let engine = SelectionEngine::new(
        &runtime.client,
        &runtime.prober,
        &runtime.config.selection,
        &runtime.config.probe,
        &runtime.config.controller.group,
    );

    let verdict = engine.evaluate(args.dry_run).await;
    println!("{}", output::render_cycle(verdict.as_ref(), args.json));
    Ok(())
}
