//! Monitor command: the long-running decision loop.

use crate::cli::{build_runtime, output, MonitorArgs};
use crate::engine::SelectionEngine;
use crate::monitor::{shutdown_signal, Monitor};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub async fn run_monitor(args: &MonitorArgs) -> anyhow::Result<()> {
    let runtime = build_runtime(&args.config, args.log_level.as_deref())?;
    let engine = SelectionEngine::new(
        &runtime.client,
        &runtime.prober,
        &runtime.config.selection,
        &runtime.config.probe,
        &runtime.config.controller.group,
    );
    let monitor = Monitor::new(
        &engine,
        Duration::from_secs(runtime.config.monitor.interval_seconds),
        args.dry_run,
    );

    let cancel = CancellationToken::new();
    tokio::spawn(shutdown_signal(cancel.clone()));

    let json = args.json;
    monitor
        .run(cancel, |verdict| {
            println!("{}", output::render_cycle(verdict.as_ref(), json));
        })
        .await;

    Ok(())
}
