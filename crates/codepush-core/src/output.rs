//! Output formatting for command results
//!
//! JSON mode pretty-prints with 2-space indentation in struct field order, and
//! packages in the order the service sent them.
//! Text mode renders bordered tables; every field shown in JSON has a place in
//! the corresponding table.

use chrono::{Local, TimeZone};
use console::{measure_text_width, pad_str, style, Alignment};
use serde::Serialize;

use crate::types::{AccessKey, App, CollaboratorMap, Deployment, Package, PackageMetrics};

/// Pretty-print a value as 2-space indented JSON
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Render epoch milliseconds in local time, e.g. `Tue Nov 10 2015 15:59:56 GMT-0800`
///
/// Only the numeric offset is shown; chrono has no zone display names.
pub fn format_date(millis: i64) -> String {
    match Local.timestamp_millis_opt(millis).single() {
        Some(date) => date.format("%a %b %d %Y %H:%M:%S GMT%z").to_string(),
        None => millis.to_string(),
    }
}

/// A bordered text table with multi-line cells
#[derive(Debug, Default)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    fn widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| measure_text_width(h)).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate().take(widths.len()) {
                let widest = cell.lines().map(measure_text_width).max().unwrap_or(0);
                widths[i] = widths[i].max(widest);
            }
        }
        widths
    }

    fn border(widths: &[usize], left: char, middle: char, right: char) -> String {
        let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        format!("{left}{}{right}", segments.join(&middle.to_string()))
    }

    fn render_row(widths: &[usize], cells: &[String], out: &mut Vec<String>) {
        let height = cells.iter().map(|c| c.lines().count().max(1)).max().unwrap_or(1);
        for line in 0..height {
            let parts: Vec<String> = widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    let text = cells
                        .get(i)
                        .and_then(|cell| cell.lines().nth(line))
                        .unwrap_or("");
                    format!(" {} ", pad_str(text, *width, Alignment::Left, None))
                })
                .collect();
            out.push(format!("│{}│", parts.join("│")));
        }
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let mut out = vec![Self::border(&widths, '┌', '┬', '┐')];

        let headers: Vec<String> = self
            .headers
            .iter()
            .map(|h| style(h).cyan().to_string())
            .collect();
        Self::render_row(&widths, &headers, &mut out);

        for row in &self.rows {
            out.push(Self::border(&widths, '├', '┼', '┤'));
            Self::render_row(&widths, row, &mut out);
        }

        out.push(Self::border(&widths, '└', '┴', '┘'));
        out.join("\n")
    }
}

pub fn access_key_table(keys: &[AccessKey], now_millis: i64) -> String {
    let mut table = Table::new(["Name", "Created", "Expires"]);
    for key in keys {
        let expires = if key.expires <= now_millis {
            style(format!("{} (expired)", format_date(key.expires)))
                .dim()
                .to_string()
        } else {
            format_date(key.expires)
        };
        table.add_row(vec![
            key.friendly_name.clone(),
            format_date(key.created_time),
            expires,
        ]);
    }
    table.render()
}

pub fn app_table(apps: &[App]) -> String {
    let mut table = Table::new(["Name", "Deployments"]);
    for app in apps {
        let owner_note = app
            .collaborators
            .iter()
            .find(|(_, props)| props.is_owner() && !props.is_current_account())
            .map(|(email, _)| format!(" ({email})"))
            .unwrap_or_default();
        let deployments = app.deployments.as_deref().unwrap_or_default().join(", ");
        table.add_row(vec![format!("{}{}", app.name, owner_note), deployments]);
    }
    table.render()
}

pub fn collaborator_table(collaborators: &CollaboratorMap) -> String {
    let mut table = Table::new(["E-mail Address"]);
    for (email, props) in collaborators {
        let mut cell = email.clone();
        if props.is_owner() {
            cell.push_str(&style(" (Owner)").magenta().to_string());
        }
        if props.is_current_account() {
            cell.push_str(&style(" (You)").green().to_string());
        }
        table.add_row(vec![cell]);
    }
    table.render()
}

pub fn deployment_table(deployments: &[Deployment], display_keys: bool) -> String {
    let mut headers = vec!["Name"];
    if display_keys {
        headers.push("Deployment Key");
    }
    headers.extend(["Update Metadata", "Install Metrics"]);

    let mut table = Table::new(headers);
    for deployment in deployments {
        let mut row = vec![deployment.name.clone()];
        if display_keys {
            row.push(deployment.key.clone().unwrap_or_default());
        }
        match &deployment.package {
            Some(package) => {
                row.push(package_metadata(package));
                row.push(metrics_summary(package.metrics().as_ref()));
            }
            None => {
                row.push(style("No updates released").magenta().to_string());
                row.push(style("No installs recorded").magenta().to_string());
            }
        }
        table.add_row(row);
    }
    table.render()
}

/// Names and keys only, shown after an app is created
pub fn deployment_key_table(deployments: &[Deployment]) -> String {
    let mut table = Table::new(["Name", "Deployment Key"]);
    for deployment in deployments {
        table.add_row(vec![
            deployment.name.clone(),
            deployment.key.clone().unwrap_or_default(),
        ]);
    }
    table.render()
}

pub fn history_table(history: &[Package], display_author: bool) -> String {
    let mut headers = vec![
        "Label",
        "Release Time",
        "App Version",
        "Mandatory",
        "Description",
        "Install Metrics",
    ];
    if display_author {
        headers.push("Released By");
    }

    let mut table = Table::new(headers);
    for package in history {
        let mut label = package.label().unwrap_or_default().to_string();
        if package.is_disabled() {
            label = style(format!("{label} (disabled)")).dim().to_string();
        }
        if let Some(origin) = release_origin(package) {
            label.push('\n');
            label.push_str(&style(origin).dim().to_string());
        }

        let mut row = vec![
            label,
            release_time(package),
            package.app_version().to_string(),
            yes_no(package.is_mandatory()).to_string(),
            package.description().unwrap_or_default().to_string(),
            metrics_summary(package.metrics().as_ref()),
        ];
        if display_author {
            row.push(package.released_by().unwrap_or_default().to_string());
        }
        table.add_row(row);
    }
    table.render()
}

/// Multi-line summary of a release for the deployment table
pub fn package_metadata(package: &Package) -> String {
    let mut lines = vec![
        format!("Label: {}", package.label().unwrap_or_default()),
        format!("App Version: {}", package.app_version()),
        format!("Mandatory: {}", yes_no(package.is_mandatory())),
        format!("Release Time: {}", release_time(package)),
    ];
    if let Some(rollout) = package.rollout().filter(|r| *r < 100) {
        lines.push(format!("Rollout: {rollout}%"));
    }
    if package.is_disabled() {
        lines.push("Disabled: Yes".to_string());
    }
    if let Some(description) = package.description().filter(|d| !d.is_empty()) {
        lines.push(format!("Description: {description}"));
    }
    if let Some(author) = package.released_by() {
        lines.push(format!("Released By: {author}"));
    }
    lines.join("\n")
}

/// Active percentage, totals and rollbacks for one release
pub fn metrics_summary(metrics: Option<&PackageMetrics>) -> String {
    let Some(metrics) = metrics else {
        return style("No installs recorded").magenta().to_string();
    };

    let percent = if metrics.total_active == 0 {
        0.0
    } else {
        metrics.active as f64 / metrics.total_active as f64 * 100.0
    };
    let percent = format!("{:.2}", percent)
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string();

    let mut lines = vec![format!(
        "Active: {}% ({} of {})",
        percent, metrics.active, metrics.total_active
    )];

    let installed = metrics.installed.unwrap_or(0);
    let pending = metrics.pending();
    if pending > 0 {
        lines.push(format!("Total: {installed} ({pending} pending)"));
    } else {
        lines.push(format!("Total: {installed}"));
    }

    if let Some(failed) = metrics.failed.filter(|f| *f > 0) {
        lines.push(style(format!("Rollbacks: {failed}")).red().to_string());
    }

    lines.join("\n")
}

fn release_origin(package: &Package) -> Option<String> {
    match package.release_method() {
        Some("Promote") => Some(format!(
            "(Promoted {} from \"{}\")",
            package.original_label().unwrap_or_default(),
            package.original_deployment().unwrap_or_default()
        )),
        Some("Rollback") => Some(format!(
            "(Rolled back {} to {})",
            package.label().unwrap_or_default(),
            package.original_label().unwrap_or_default()
        )),
        _ => None,
    }
}

fn release_time(package: &Package) -> String {
    package.upload_time().map(format_date).unwrap_or_default()
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}
