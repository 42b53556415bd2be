//! Message-level orchestration of the rule sections.

use std::sync::Arc;
use std::time::Instant;

use chrono::{NaiveDateTime, Utc};
use tracing::{debug, info, info_span};

use dqa_model::{Field, IssueType, Message, ValidationReport};
use dqa_standards::ReferenceData;

use crate::config::ValidatorOptions;
use crate::context::{PATIENT_POSITION, ValidationContext};
use crate::error::Result;
use crate::header::validate_header;
use crate::next_of_kin::validate_next_of_kin;
use crate::patient::validate_patient;
use crate::resolver::CodeResolver;
use crate::sections::SectionRegistry;
use crate::store::{CodeStore, QualityCollector};
use crate::vaccination::validate_vaccination;

/// Validates immunization update messages against shared reference data.
///
/// One validator serves any number of submitter profiles and threads; code
/// resolution is cached per profile.
#[derive(Debug)]
pub struct Validator {
    reference: Arc<ReferenceData>,
    registry: SectionRegistry,
    options: ValidatorOptions,
    resolver: CodeResolver,
    now: Option<NaiveDateTime>,
}

impl Validator {
    pub fn new(
        reference: Arc<ReferenceData>,
        registry: SectionRegistry,
        options: ValidatorOptions,
    ) -> Self {
        Self {
            reference,
            registry,
            options,
            resolver: CodeResolver::default(),
            now: None,
        }
    }

    /// Persist received codes to `store` instead of memory.
    pub fn with_store(mut self, store: Arc<dyn CodeStore>) -> Self {
        self.resolver = CodeResolver::new(store);
        self
    }

    pub fn with_quality_collector(mut self, collector: Arc<dyn QualityCollector>) -> Self {
        self.resolver = self.resolver.with_collector(collector);
        self
    }

    /// Pin the clock used for age checks.
    pub fn with_now(mut self, now: NaiveDateTime) -> Self {
        self.now = Some(now);
        self
    }

    pub fn resolver(&self) -> &CodeResolver {
        &self.resolver
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    /// Run every rule over `message` for the submitter `profile_id`.
    ///
    /// Values derived by an earlier pass are reset first, so validating the
    /// same message twice gives the same result. `message.issues` is replaced
    /// by this pass's issues in the order found, and the message is
    /// normalized in place. The report carries the effective severity of
    /// each issue.
    ///
    /// # Errors
    ///
    /// Fails only when the code store or resolver cache fails.
    pub fn validate(&self, profile_id: u64, message: &mut Message) -> Result<ValidationReport> {
        let span = info_span!(
            "validate_message",
            profile_id,
            received = %message.received_date,
        );
        let _guard = span.enter();
        let start = Instant::now();

        reset_derived(message);
        let now = self.now.unwrap_or_else(|| Utc::now().naive_utc());
        let mut ctx = ValidationContext::new(
            &self.reference,
            &self.options,
            &self.resolver,
            profile_id,
            message.received_date,
            now,
        );

        message.message_key = validate_header(&mut message.header, &self.registry, &mut ctx)?;
        debug!(issues = ctx.issues().len(), "header validated");

        let message_date = message.header.message_date;
        validate_patient(&mut message.patient, message_date, &self.registry, &mut ctx)?;
        debug!(issues = ctx.issues().len(), "patient validated");

        for (index, next_of_kin) in message.next_of_kins.iter_mut().enumerate() {
            if next_of_kin.skipped {
                continue;
            }
            ctx.set_position(next_of_kin.position_id);
            validate_next_of_kin(next_of_kin, index, &mut message.patient, &mut ctx)?;
        }
        ctx.set_position(PATIENT_POSITION);
        if message.patient.responsible_party.is_none() {
            ctx.register(Field::PatientGuardianResponsibleParty, IssueType::IsMissing);
        }
        debug!(
            next_of_kins = message.next_of_kins.len(),
            issues = ctx.issues().len(),
            "next of kin validated"
        );

        for vaccination in &mut message.vaccinations {
            if vaccination.skipped {
                continue;
            }
            ctx.set_position(vaccination.position_id);
            validate_vaccination(vaccination, &mut message.patient, &self.registry, &mut ctx)?;
        }
        debug!(
            vaccinations = message.vaccinations.len(),
            issues = ctx.issues().len(),
            "vaccinations validated"
        );

        message.issues = ctx.into_issues();
        let report = ValidationReport::new(
            message.message_key.clone(),
            &message.issues,
            &self.options.severity_overrides,
        );
        info!(
            message_key = report.message_key.as_deref().unwrap_or(""),
            issues = report.issues.len(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            duration_ms = start.elapsed().as_millis(),
            "message validated"
        );
        Ok(report)
    }
}

/// Clear everything a pass derives rather than reads.
fn reset_derived(message: &mut Message) {
    message.message_key = None;
    message.issues.clear();
    let patient = &mut message.patient;
    patient.under_aged = None;
    patient.responsible_party = None;
    patient.immunities.clear();
    for vaccination in &mut message.vaccinations {
        vaccination.administered = false;
        vaccination.vaccine_cvx = None;
        vaccination.vis_list.clear();
    }
}
