//! The multi-step intake form: field registry, step catalog, goal-driven
//! step plans, validation, navigation, and submission assembly.

pub mod fields;
pub mod navigation;
pub mod plan;
pub mod steps;
pub mod submission;
pub mod validate;

pub use fields::{FieldId, FormValues};
pub use navigation::{ControlState, FormController, Transition};
pub use plan::{resolve_plan, StepPlan};
pub use steps::{step_catalog, ChoiceGroup, StepDefinition, PAYMENT_STEP_INDEX};
pub use submission::{assemble, SubmissionRecord};
pub use validate::{validate_step, RecordingSink, ValidationFailure, ValidationSink};
