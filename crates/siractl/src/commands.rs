//! One-shot commands: status, resolve, doctor.

use anyhow::{bail, Result};
use console::style;
use sira_common::{Alert, AlertKind, DashboardConfig, Snapshot};
use std::time::Instant;

use crate::client::{ClientError, SiraClient};
use crate::tui::render::{format_count, format_timestamp, sanitize, MAX_SECTION_ROWS};
use crate::tui::state::StatsView;

fn kind_tag(kind: AlertKind) -> console::StyledObject<&'static str> {
    match kind {
        AlertKind::Error => style("error").red(),
        AlertKind::Warning => style("warning").yellow(),
        AlertKind::Success => style("success").green(),
        AlertKind::Info | AlertKind::Unknown => style("info").cyan(),
    }
}

fn print_alert(alert: &Alert) {
    let title = alert
        .title
        .as_deref()
        .map(sanitize)
        .unwrap_or_else(|| "System alert".to_string());
    println!(
        "  [{}] #{} {}  {}",
        kind_tag(alert.kind),
        alert.id,
        title,
        style(format_timestamp(alert.created_at.as_deref())).dim()
    );
    if let Some(description) = &alert.description {
        println!("      {}", style(sanitize(description)).dim());
    }
}

fn print_stats(stats: &StatsView) {
    println!("{}", style("Headline:").bold());
    println!(
        "  Instruments: {}   Identifications: {}   Avg time: {}   Accuracy: {}",
        format_count(stats.registered_instruments),
        format_count(stats.successful_identifications),
        sanitize(&stats.avg_time),
        sanitize(&stats.accuracy),
    );
    println!(
        "  Today: {} identifications, {} avg, {} accuracy, {} active users",
        format_count(stats.identifications_today),
        sanitize(&stats.avg_time_today),
        sanitize(&stats.accuracy_today),
        format_count(stats.active_users),
    );
}

fn print_sections(snapshot: &Snapshot) {
    if let Some(alerts) = &snapshot.alerts {
        println!();
        println!("{}", style(format!("Alerts ({}):", alerts.len())).bold());
        if alerts.is_empty() {
            println!("  {}", style("No active alerts").green());
        }
        for alert in alerts.iter().take(MAX_SECTION_ROWS) {
            print_alert(alert);
        }
    }

    if let Some(procedures) = &snapshot.procedures {
        println!();
        println!("{}", style("Procedures:").bold());
        println!(
            "  total {}   active {}   completed {}",
            procedures.total, procedures.active, procedures.completed
        );
    }

    if let Some(instruments) = &snapshot.instruments {
        println!();
        println!(
            "{}",
            style(format!(
                "Instrument categories ({} registered):",
                format_count(instruments.total)
            ))
            .bold()
        );
        if instruments.categories.is_empty() {
            println!("  {}", style("No categories recorded").dim());
        }
        for category in instruments.categories.iter().take(MAX_SECTION_ROWS) {
            println!("  {}: {}", sanitize(&category.name), format_count(category.count));
        }
    }

    if let Some(counts) = &snapshot.recent_counts {
        println!();
        println!("{}", style("Recent counts:").bold());
        if counts.is_empty() {
            println!("  {}", style("No recent counts").dim());
        }
        for count in counts.iter().take(MAX_SECTION_ROWS) {
            let name = count
                .procedure_name
                .as_deref()
                .map(sanitize)
                .unwrap_or_else(|| "Count".to_string());
            println!(
                "  {} [{}]  {} instruments  {}",
                name,
                count.status.label(),
                count.total_instruments.unwrap_or(0),
                style(format_timestamp(count.created_at.as_deref())).dim()
            );
        }
    }

    if let Some(sets) = &snapshot.instrument_sets {
        println!();
        println!("{}", style("Surgical sets:").bold());
        if sets.is_empty() {
            println!("  {}", style("No sets available").dim());
        }
        for set in sets.iter().take(MAX_SECTION_ROWS) {
            let status = if set.active {
                style("active").green()
            } else {
                style("inactive").dim()
            };
            println!(
                "  {} ({})  {}  {} instruments",
                sanitize(&set.name),
                set.category.as_deref().map(sanitize).unwrap_or_else(|| "General".to_string()),
                status,
                set.total_instruments.unwrap_or(0)
            );
        }
    }
}

/// One aggregate fetch, printed to stdout.
pub async fn status(config: &DashboardConfig) -> Result<()> {
    let client = SiraClient::new(config)?;

    println!("{}", style("Sira Dashboard").bold());
    println!("{}", style(format!("Backend: {}", client.base_url())).dim());
    println!();

    let mut stats = StatsView::default();
    match client.snapshot().await {
        Ok(snapshot) => {
            if let Some(general) = &snapshot.general {
                stats.merge(general);
            }
            print_stats(&stats);
            print_sections(&snapshot);
        }
        Err(error) => {
            println!(
                "{} backend unreachable ({error}), showing fallback data",
                style("warning:").yellow().bold()
            );
            println!();
            print_stats(&stats);
        }
    }
    Ok(())
}

/// Resolve one alert and list what remains active.
pub async fn resolve(config: &DashboardConfig, id: u64) -> Result<()> {
    let client = SiraClient::new(config)?;

    if let Err(error) = client.resolve_alert(id).await {
        bail!("failed to resolve alert {id}: {error}");
    }
    println!("{} alert {} resolved", style("ok:").green().bold(), id);

    match client.active_alerts().await {
        Ok(alerts) if alerts.is_empty() => println!("No active alerts remain."),
        Ok(alerts) => {
            println!("{} active alerts remain:", alerts.len());
            for alert in alerts.iter().take(MAX_SECTION_ROWS) {
                print_alert(alert);
            }
        }
        Err(error) => println!(
            "{} could not list remaining alerts: {error}",
            style("warning:").yellow().bold()
        ),
    }
    Ok(())
}

fn report_probe(name: &str, started: Instant, result: Result<(), ClientError>) -> bool {
    let elapsed = started.elapsed().as_millis();
    match result {
        Ok(()) => {
            println!("  {}  {} ({} ms)", style("OK  ").green().bold(), name, elapsed);
            true
        }
        Err(error) => {
            println!("  {}  {} ({})", style("FAIL").red().bold(), name, error);
            false
        }
    }
}

/// Probe every backend endpoint once and report per-endpoint health.
pub async fn doctor(config: &DashboardConfig) -> Result<()> {
    let client = SiraClient::new(config)?;

    println!("{}", style("Sira Backend Probe").bold());
    println!("{}", style(format!("Backend: {}", client.base_url())).dim());
    println!();

    let mut failures = 0;

    let t = Instant::now();
    let r = client.combined().await.map(|_| ());
    if !report_probe("GET /api/dashboard/completo", t, r) {
        failures += 1;
    }

    let t = Instant::now();
    let r = client.general_stats().await.map(|_| ());
    if !report_probe("GET /api/dashboard/stats", t, r) {
        failures += 1;
    }

    let t = Instant::now();
    let r = client.active_alerts().await.map(|_| ());
    if !report_probe("GET /api/alertas/activas", t, r) {
        failures += 1;
    }

    let t = Instant::now();
    let r = client.instrument_stats().await.map(|_| ());
    if !report_probe("GET /api/instrumentos/estadisticas", t, r) {
        failures += 1;
    }

    let t = Instant::now();
    let r = client.procedure_stats().await.map(|_| ());
    if !report_probe("GET /api/procedimientos/estadisticas", t, r) {
        failures += 1;
    }

    let t = Instant::now();
    let r = client.recent_counts().await.map(|_| ());
    if !report_probe("GET /api/conteos/recientes", t, r) {
        failures += 1;
    }

    let t = Instant::now();
    let r = client.active_sets().await.map(|_| ());
    if !report_probe("GET /api/sets/activos", t, r) {
        failures += 1;
    }

    println!();
    if failures > 0 {
        bail!("{failures} of 7 probes failed");
    }
    println!("{}", style("All probes passed.").green().bold());
    Ok(())
}
