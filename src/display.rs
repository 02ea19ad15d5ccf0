//! Colored terminal output for the admin CLI.

use std::io::{self, Write};

use owo_colors::OwoColorize;

use crate::routes::Route;
use crate::stats::{AggregateReport, Health, RouteReport};

/// Widest pair name shown in the route table.
const NAME_WIDTH: usize = 32;

/// Truncate a string to `max_len` characters, adding an ellipsis if cut.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        "...".to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    }
}

/// Plain-text row for one route: position, name, status, cached priority.
#[must_use]
pub fn format_route_row(position: usize, route: &Route) -> String {
    let status = if route.active_status {
        "active"
    } else {
        "inactive"
    };
    let priority = if route.is_positioned() {
        route.priority.to_string()
    } else {
        "-".to_string()
    };
    format!(
        "{:>3}  {:<width$}  {:<8}  {}",
        position + 1,
        truncate(&route.pair_name, NAME_WIDTH),
        status,
        priority,
        width = NAME_WIDTH
    )
}

/// Format a rate as a percentage with two decimals.
#[must_use]
pub fn format_rate(rate: f64) -> String {
    format!("{rate:.2}%")
}

fn health_tag(health: Health) -> String {
    let tag = format!("[{}]", health.label().to_uppercase());
    match health {
        Health::Healthy => tag.green().bold().to_string(),
        Health::Neutral => tag.yellow().bold().to_string(),
        Health::Danger => tag.red().bold().to_string(),
    }
}

/// Print the route table in display order.
pub fn print_routes(routes: &[Route]) {
    if routes.is_empty() {
        println!("{}", "No country pairs configured.".dimmed());
        return;
    }
    println!(
        "{}",
        format!(
            "{:>3}  {:<width$}  {:<8}  PRIORITY",
            "#",
            "PAIR",
            "STATUS",
            width = NAME_WIDTH
        )
        .bold()
    );
    for (i, route) in routes.iter().enumerate() {
        let row = format_route_row(i, route);
        if route.active_status {
            println!("{row}");
        } else {
            println!("{}", row.dimmed());
        }
    }
    let _ = io::stdout().flush();
}

/// Print overall delivery stats.
pub fn print_aggregate(report: &AggregateReport) {
    let s = &report.stats;
    println!("{} Overall delivery", health_tag(report.health));
    println!("  sent:     {}", s.total_sms_sent);
    println!("  failed:   {}", s.total_sms_failed);
    println!("  success:  {}", format_rate(s.overall_success_rate).green());
    println!("  failure:  {}", format_rate(s.overall_failure_rate).red());
    println!(
        "  {}",
        report
            .fetched_at
            .format("as of %Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .dimmed()
    );
    let _ = io::stdout().flush();
}

/// Print one route's delivery stats.
pub fn print_route_stats(report: &RouteReport) {
    let s = &report.stats;
    println!("{} {}", health_tag(report.health), report.pair_name.cyan());
    println!("  sent:     {}", s.total_sms_sent);
    println!("  failed:   {}", s.total_sms_failed);
    println!("  success:  {}", format_rate(s.total_rate_of_success).green());
    println!("  failure:  {}", format_rate(s.total_rate_of_failure).red());
    let _ = io::stdout().flush();
}

/// Print a success line.
pub fn print_ok(message: &str) {
    println!("{} {}", "[OK]".green().bold(), message);
    let _ = io::stdout().flush();
}

/// Print an error message to stderr.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "[ERROR]".red().bold(), message);
}
