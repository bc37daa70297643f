use crate::form::fields::{FieldId, FormValues};
use crate::form::steps::StepDefinition;

/// Capability interface for surfacing validation failures. The production
/// implementation focuses the offending prompt and prints a warning; tests
/// record the reports instead.
pub trait ValidationSink {
    fn report_error(&mut self, field: FieldId, message: &str);
}

/// Sink that records every report, for assertions in tests.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub reports: Vec<(FieldId, String)>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ValidationSink for RecordingSink {
    fn report_error(&mut self, field: FieldId, message: &str) {
        self.reports.push((field, message.to_string()));
    }
}

/// First validation failure found on a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    pub field: FieldId,
    pub message: String,
}

/// Checks a step in document order: required single-value fields first, then
/// mutually-exclusive choice groups. Stops at the first failure, which is
/// also reported through the sink.
pub fn validate_step(
    step: &StepDefinition,
    values: &FormValues,
    sink: &mut dyn ValidationSink,
) -> Result<(), ValidationFailure> {
    for &field in step.required_fields {
        if values.is_blank(field) {
            let message = format!("Please fill out the {} field.", field.label());
            sink.report_error(field, &message);
            return Err(ValidationFailure { field, message });
        }
    }

    for group in step.choice_groups {
        if group.options.is_empty() {
            continue;
        }
        if values.is_blank(group.field) {
            let message = "Please select an option.".to_string();
            sink.report_error(group.field, &message);
            return Err(ValidationFailure {
                field: group.field,
                message,
            });
        }
    }

    Ok(())
}
