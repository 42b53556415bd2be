//! Per-pass validation state.

use chrono::NaiveDateTime;

use dqa_model::{
    CodeContext, CodeReceived, CodeStatus, CodeTable, CodedEntity, Field, Id, IssueFound,
    IssueType, PotentialIssue,
};
use dqa_standards::ReferenceData;

use crate::config::ValidatorOptions;
use crate::error::{Result, ValidateError};
use crate::resolver::CodeResolver;

/// Position of the patient record; next-of-kin and vaccination records
/// carry their own.
pub const PATIENT_POSITION: u32 = 1;

/// State shared by every rule of one validation pass.
///
/// Holds the reference data, the clock, the position of the record being
/// validated, and the issues registered so far in order.
pub struct ValidationContext<'a> {
    reference: &'a ReferenceData,
    options: &'a ValidatorOptions,
    resolver: &'a CodeResolver,
    profile_id: u64,
    received_date: NaiveDateTime,
    now: NaiveDateTime,
    position_id: u32,
    issues: Vec<IssueFound>,
}

impl<'a> ValidationContext<'a> {
    pub fn new(
        reference: &'a ReferenceData,
        options: &'a ValidatorOptions,
        resolver: &'a CodeResolver,
        profile_id: u64,
        received_date: NaiveDateTime,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            reference,
            options,
            resolver,
            profile_id,
            received_date,
            now,
            position_id: PATIENT_POSITION,
            issues: Vec::new(),
        }
    }

    pub fn reference(&self) -> &'a ReferenceData {
        self.reference
    }

    pub fn options(&self) -> &'a ValidatorOptions {
        self.options
    }

    pub fn profile_id(&self) -> u64 {
        self.profile_id
    }

    pub fn received_date(&self) -> NaiveDateTime {
        self.received_date
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    pub fn position_id(&self) -> u32 {
        self.position_id
    }

    pub fn set_position(&mut self, position_id: u32) {
        self.position_id = position_id;
    }

    pub fn issues(&self) -> &[IssueFound] {
        &self.issues
    }

    pub fn into_issues(self) -> Vec<IssueFound> {
        self.issues
    }

    pub fn has_issue(&self, field: Field, issue_type: IssueType) -> bool {
        self.issues.iter().any(|found| found.is(field, issue_type))
    }

    pub fn register(&mut self, field: Field, issue_type: IssueType) {
        self.register_with_code(field, issue_type, None);
    }

    pub fn register_with_code(
        &mut self,
        field: Field,
        issue_type: IssueType,
        code: Option<&CodeReceived>,
    ) {
        self.issues.push(IssueFound {
            issue: PotentialIssue::new(field, issue_type),
            position_id: self.position_id,
            code: code.cloned(),
        });
    }

    /// True when `value` is present; registers `field` missing otherwise.
    pub fn not_empty(&mut self, value: &str, field: Field) -> bool {
        self.not_empty_if(value, field, true)
    }

    /// Like [`Self::not_empty`], registering only when `report` is set.
    pub fn not_empty_if(&mut self, value: &str, field: Field, report: bool) -> bool {
        if value.is_empty() {
            if report {
                self.register(field, IssueType::IsMissing);
            }
            return false;
        }
        true
    }

    /// Presence check for optional values such as dates.
    pub fn present<T>(&mut self, value: Option<&T>, field: Field) -> bool {
        if value.is_none() {
            self.register(field, IssueType::IsMissing);
            return false;
        }
        true
    }

    /// Resolve a value against the table mapped to `field`.
    pub fn resolve(
        &mut self,
        value: &str,
        label: &str,
        field: Field,
        context: Option<&CodeContext>,
    ) -> Result<CodeReceived> {
        let table = code_table(field)?;
        self.resolve_in(value, label, table, context)
    }

    pub fn resolve_in(
        &mut self,
        value: &str,
        label: &str,
        table: CodeTable,
        context: Option<&CodeContext>,
    ) -> Result<CodeReceived> {
        self.resolver.resolve(
            self.profile_id,
            self.reference.codes(),
            value,
            label,
            table,
            context,
        )
    }

    /// Resolve a coded field and register its status issues.
    pub fn handle_code(&mut self, entity: &mut CodedEntity, field: Field) -> Result<()> {
        self.handle_code_with(entity, field, true, None)
    }

    /// Resolve a coded field.
    ///
    /// An empty code is reported missing. A valid code has its canonical value
    /// written back; other statuses register the matching issue. When
    /// `report` is false only the resolution is attached.
    pub fn handle_code_with(
        &mut self,
        entity: &mut CodedEntity,
        field: Field,
        report: bool,
        context: Option<&CodeContext>,
    ) -> Result<()> {
        entity.resolved = None;
        if entity.code.is_empty() {
            if report {
                self.register(field, IssueType::IsMissing);
            }
            return Ok(());
        }
        let code = self.resolve(&entity.code, &entity.text, field, context)?;
        if code.status == CodeStatus::Valid {
            entity.code = code.code_value.clone();
        } else if report {
            self.register_status(field, &code);
        }
        entity.resolved = Some(code);
        Ok(())
    }

    /// Resolve an identifier; the person's name is used as the label.
    pub fn handle_id(&mut self, id: &mut Id, field: Field, report: bool) -> Result<()> {
        id.resolved = None;
        if id.number.is_empty() {
            if report {
                self.register(field, IssueType::IsMissing);
            }
            return Ok(());
        }
        let label = id.name.full_name();
        let code = self.resolve(&id.number, &label, field, None)?;
        if code.status == CodeStatus::Valid {
            id.number = code.code_value.clone();
        } else if report {
            self.register_status(field, &code);
        }
        id.resolved = Some(code);
        Ok(())
    }

    fn register_status(&mut self, field: Field, code: &CodeReceived) {
        let issue_type = match code.status {
            CodeStatus::Valid => return,
            CodeStatus::Invalid => IssueType::IsInvalid,
            CodeStatus::Deprecated => IssueType::IsDeprecated,
            CodeStatus::Ignored => IssueType::IsIgnored,
            CodeStatus::Unrecognized => IssueType::IsUnrecognized,
        };
        self.register_with_code(field, issue_type, Some(code));
    }
}

fn code_table(field: Field) -> Result<CodeTable> {
    field.code_table().ok_or(ValidateError::UnmappedField {
        field: field.name(),
    })
}
