use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDateTime};
use comfy_table::Table;
use tracing::{debug, info, info_span};

use dqa_model::{Field, IssueType, Message, ValidationReport};
use dqa_standards::{load_reference_data, standards_root};
use dqa_validate::{SectionRegistry, Validator, ValidatorOptions};

use crate::cli::{IssuesArgs, ValidateArgs};
use crate::summary::{apply_table_style, header_cell};

/// A validated message together with its report.
#[derive(Debug)]
pub struct ValidateOutcome {
    /// The message after normalization, with its issues attached.
    pub message: Message,
    pub report: ValidationReport,
}

pub fn run_validate(args: &ValidateArgs) -> Result<ValidateOutcome> {
    let span = info_span!("validate", path = %args.message.display());
    let _guard = span.enter();
    let start = Instant::now();

    let standards_dir = args.standards.clone().unwrap_or_else(standards_root);
    let reference = load_reference_data(&standards_dir)
        .with_context(|| format!("load reference data from {}", standards_dir.display()))?;
    let options = match &args.config {
        Some(path) => ValidatorOptions::load(path)
            .with_context(|| format!("load validator options from {}", path.display()))?,
        None => ValidatorOptions::default(),
    };
    debug!(
        overrides = options.severity_overrides.len(),
        "validator options ready"
    );

    let mut message = read_message(&args.message, args.received.as_deref())?;
    let validator = Validator::new(Arc::new(reference), SectionRegistry::standard(), options);
    let report = validator
        .validate(args.profile, &mut message)
        .context("validate message")?;

    info!(
        errors = report.error_count(),
        warnings = report.warning_count(),
        duration_ms = start.elapsed().as_millis(),
        "validation complete"
    );
    Ok(ValidateOutcome { message, report })
}

/// Read a parsed message, optionally replacing its receipt timestamp.
pub fn read_message(path: &Path, received: Option<&str>) -> Result<Message> {
    let content =
        fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let mut value: serde_json::Value =
        serde_json::from_str(&content).with_context(|| format!("parse {}", path.display()))?;
    if let Some(received) = received {
        let received = parse_received(received)?;
        let object = value
            .as_object_mut()
            .ok_or_else(|| anyhow!("{} does not hold a message object", path.display()))?;
        object.insert(
            "received_date".to_string(),
            serde_json::to_value(received).context("encode receipt timestamp")?,
        );
    }
    serde_json::from_value(value).with_context(|| format!("decode message {}", path.display()))
}

/// Accepts RFC 3339 or a bare `YYYY-MM-DDTHH:MM:SS` local timestamp.
fn parse_received(raw: &str) -> Result<NaiveDateTime> {
    if let Ok(stamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(stamp.naive_local());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .with_context(|| format!("invalid receipt timestamp: {raw}"))
}

pub fn run_issues(args: &IssuesArgs) -> Result<()> {
    let table = if args.fields {
        field_table()
    } else {
        issue_type_table()
    };
    println!("{table}");
    Ok(())
}

fn issue_type_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Issue type"),
        header_cell("Phrase"),
        header_cell("Class"),
        header_cell("Default severity"),
    ]);
    apply_table_style(&mut table);
    for issue_type in IssueType::all() {
        let class = issue_type.class();
        table.add_row(vec![
            issue_type.name(),
            issue_type.phrase(),
            class.label(),
            class.default_severity().label(),
        ]);
    }
    table
}

fn field_table() -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Code table"),
    ]);
    apply_table_style(&mut table);
    for field in Field::all() {
        table.add_row(vec![
            field.name(),
            field.label(),
            field.code_table().map_or("-", |code_table| code_table.key()),
        ]);
    }
    table
}
