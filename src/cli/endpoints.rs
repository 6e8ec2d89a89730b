//! Endpoints command: probe configured endpoints through the tunnel.

use crate::cli::{build_runtime, output, EndpointsArgs};
use serde_json::json;

pub async fn run_endpoints(args: &EndpointsArgs) -> anyhow::Result<()> {
    let runtime = build_runtime(&args.config, None)?;

    if runtime.config.probe.endpoint_urls.is_empty() {
        anyhow::bail!("probe.endpoint_urls is empty");
    }
    if runtime.config.probe.proxy_addr().is_none() {
        anyhow::bail!("probe.proxy_addr is empty");
    }

    let current = match runtime
        .client
        .current_proxy(&runtime.config.controller.group)
        .await
    {
        Ok(current) => current,
        Err(e) => {
            tracing::warn!(error = %e, "current proxy check failed");
            None
        }
    };

    let results = runtime
        .prober
        .verify_all(&runtime.config.probe.endpoint_urls)
        .await;
    let all_reachable = results.iter().all(|r| r.reachable);

    if args.json {
        println!(
            "{}",
            output::to_ascii_json(&json!({
                "current": current,
                "current_found": current.is_some(),
                "all_reachable": all_reachable,
                "endpoints": results,
            }))
        );
    } else {
        let current_text = current
            .as_deref()
            .map(output::sanitize_name)
            .unwrap_or_else(|| "unknown".to_string());
        let status = if all_reachable { "ok" } else { "degraded" };
        println!("current\t{}\t{}", current_text, status);
        println!("{}", output::format_endpoints_table(&results));
    }
    Ok(())
}
