//! Message header (MSH) rules.

use chrono::Duration;

use dqa_model::{Field, IssueType, MessageHeader};

use crate::context::ValidationContext;
use crate::error::Result;
use crate::sections::SectionRegistry;

const MESSAGE_TYPE: &str = "VXU";
const MESSAGE_TRIGGER: &str = "V04";
const MESSAGE_STRUCTURE: &str = "VXU_V04";
/// Versions whose message type already implies the structure.
const STRUCTURE_IMPLIED_VERSIONS: &[&str] = &["2.3.1", "2.4"];

/// Validate the header and return the message key (control id), if any.
pub(crate) fn validate_header(
    header: &mut MessageHeader,
    registry: &SectionRegistry,
    ctx: &mut ValidationContext<'_>,
) -> Result<Option<String>> {
    ctx.not_empty(&header.receiving_application, Field::Hl7MshReceivingApplication);
    ctx.not_empty(&header.receiving_facility, Field::Hl7MshReceivingFacility);
    ctx.not_empty(&header.sending_application, Field::Hl7MshSendingApplication);
    registry.validate_header(header, ctx)?;

    ctx.handle_code(&mut header.ack_type_application, Field::Hl7MshAppAckType)?;
    ctx.handle_code(&mut header.ack_type_accept, Field::Hl7MshAcceptAckType)?;

    let message_key = ctx
        .not_empty(&header.message_control, Field::Hl7MshMessageControlId)
        .then(|| header.message_control.clone());

    if ctx.present(header.message_date.as_ref(), Field::Hl7MshMessageDate)
        && let Some(message_date) = header.message_date
    {
        let leeway = Duration::hours(ctx.options().message_date_leeway_hours);
        if ctx.received_date() < message_date - leeway {
            ctx.register(Field::Hl7MshMessageDate, IssueType::IsInFuture);
        }
    }

    validate_message_type(header, ctx);

    ctx.handle_code(&mut header.processing_status, Field::Hl7MshProcessingId)?;
    let processing = match header.processing_status.code.as_str() {
        "T" => Some(IssueType::IsValuedAsTraining),
        "P" => Some(IssueType::IsValuedAsProduction),
        "D" => Some(IssueType::IsValuedAsDebug),
        _ => None,
    };
    if let Some(issue_type) = processing {
        ctx.register(Field::Hl7MshProcessingId, issue_type);
    }

    if ctx.not_empty(&header.message_version, Field::Hl7MshVersion) {
        let version = header.message_version.as_str();
        let issue_type = if version.starts_with("2.5") {
            IssueType::IsValuedAs2_5
        } else if version.starts_with("2.3") {
            IssueType::IsValuedAs2_3_1
        } else if version.starts_with("2.4") {
            IssueType::IsValuedAs2_4
        } else {
            IssueType::IsUnrecognized
        };
        ctx.register(Field::Hl7MshVersion, issue_type);
    }

    ctx.handle_code(&mut header.country, Field::Hl7MshCountryCode)?;
    ctx.handle_code(&mut header.character_set, Field::Hl7MshCharacterSet)?;
    ctx.handle_code(&mut header.character_set_alt, Field::Hl7MshAltCharacterSet)?;
    Ok(message_key)
}

fn validate_message_type(header: &MessageHeader, ctx: &mut ValidationContext<'_>) {
    if !ctx.not_empty(&header.message_type, Field::Hl7MshMessageType) {
        return;
    }
    if header.message_type != MESSAGE_TYPE {
        ctx.register(Field::Hl7MshMessageType, IssueType::IsUnrecognized);
    }
    if !ctx.not_empty(&header.message_trigger, Field::Hl7MshMessageTrigger) {
        return;
    }
    if header.message_trigger != MESSAGE_TRIGGER {
        ctx.register(Field::Hl7MshMessageTrigger, IssueType::IsUnrecognized);
    }
    if !STRUCTURE_IMPLIED_VERSIONS.contains(&header.message_version.as_str())
        && ctx.not_empty(&header.message_structure, Field::Hl7MshMessageStructure)
        && header.message_structure != MESSAGE_STRUCTURE
    {
        ctx.register(Field::Hl7MshMessageStructure, IssueType::IsUnrecognized);
    }
}
