use std::cmp::Ordering;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};

use dqa_model::{IssueReport, Severity, ValidationReport};

pub fn print_report(report: &ValidationReport) {
    println!(
        "Message: {}",
        report.message_key.as_deref().unwrap_or("(no control id)")
    );
    if report.issues.is_empty() {
        println!("No issues found.");
        return;
    }
    println!("{}", issue_table(report));
    println!(
        "{} error(s), {} warning(s), {} accepted",
        report.error_count(),
        report.warning_count(),
        report.accept_count()
    );
}

pub fn print_report_json(report: &ValidationReport) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Issues ordered by severity, then position, keeping discovery order otherwise.
pub fn issue_table(report: &ValidationReport) -> Table {
    let mut issues: Vec<&IssueReport> = report.issues.iter().collect();
    issues.sort_by(|a, b| {
        let severity = severity_rank(b.severity).cmp(&severity_rank(a.severity));
        if severity != Ordering::Equal {
            return severity;
        }
        a.position_id.cmp(&b.position_id)
    });
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Pos"),
        header_cell("Severity"),
        header_cell("Class"),
        header_cell("Issue"),
        header_cell("Message"),
        header_cell("Received"),
        header_cell("Code"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 0, CellAlignment::Right);
    align_column(&mut table, 1, CellAlignment::Center);
    for issue in issues {
        table.add_row(vec![
            Cell::new(issue.position_id),
            severity_cell(issue.severity),
            Cell::new(issue.class.label()),
            Cell::new(&issue.key),
            Cell::new(&issue.message),
            optional_cell(issue.received_value.as_deref()),
            optional_cell(issue.code_value.as_deref()),
        ]);
    }
    table
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
    if table.column_count() >= 7 {
        table.set_constraints(vec![
            ColumnConstraint::LowerBoundary(Width::Fixed(3)),
            ColumnConstraint::LowerBoundary(Width::Fixed(7)),
            ColumnConstraint::LowerBoundary(Width::Fixed(8)),
            ColumnConstraint::UpperBoundary(Width::Percentage(30)),
            ColumnConstraint::UpperBoundary(Width::Percentage(35)),
        ]);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn severity_cell(severity: Severity) -> Cell {
    match severity {
        Severity::Error => Cell::new("ERROR")
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        Severity::Warning => Cell::new("WARN").fg(Color::Yellow),
        Severity::Accept => dim_cell("ACCEPT"),
    }
}

fn severity_rank(severity: Severity) -> u8 {
    match severity {
        Severity::Error => 3,
        Severity::Warning => 2,
        Severity::Accept => 1,
    }
}

fn optional_cell(value: Option<&str>) -> Cell {
    match value {
        Some(value) if !value.is_empty() => Cell::new(value),
        _ => dim_cell("-"),
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
