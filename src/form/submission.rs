use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{PricingCatalog, ServiceGoal};
use crate::errors::Result;
use crate::form::fields::{FieldId, FormValues};

/// Flattened snapshot of the whole form at submit time, plus derived fields.
/// Fields on skipped steps stay empty strings. Built once on the
/// payment-success path and handed straight to the lead sink; `paymentStatus`
/// is an assumed-true label, not evidence of success.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    pub lead_id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub country_of_residence: String,
    pub primary_goal: String,
    pub service_type: String,
    pub fee_paid: String,
    pub education_level: String,
    pub field_of_study: String,
    pub has_acceptance_letter: String,
    pub work_experience: String,
    pub occupation: String,
    pub mgmt_experience: String,
    pub sponsor_relationship: String,
    pub sponsor_status: String,
    pub proof_of_funds: String,
    pub net_worth: String,
    pub additional_notes: String,
    pub timestamp: String,
    pub payment_status: String,
}

/// Builds the submission record from the live field values, regardless of
/// which steps were visible. `feePaid` comes from the catalog for the
/// current goal; the timestamp is UTC ISO-8601.
pub fn assemble(
    values: &FormValues,
    goal: ServiceGoal,
    catalog: &PricingCatalog,
    now: DateTime<Utc>,
) -> Result<SubmissionRecord> {
    let fee_paid = catalog.price_for(goal)?.display_price();
    let field = |id: FieldId| values.get(id).to_string();

    Ok(SubmissionRecord {
        lead_id: Uuid::new_v4(),
        full_name: field(FieldId::FullName),
        email: field(FieldId::Email),
        phone: field(FieldId::Phone),
        country_of_residence: field(FieldId::CountryOfResidence),
        primary_goal: field(FieldId::PrimaryGoal),
        service_type: goal.label().to_string(),
        fee_paid,
        education_level: field(FieldId::EducationLevel),
        field_of_study: field(FieldId::FieldOfStudy),
        has_acceptance_letter: field(FieldId::HasAcceptanceLetter),
        work_experience: field(FieldId::WorkExperience),
        occupation: field(FieldId::Occupation),
        mgmt_experience: field(FieldId::MgmtExperience),
        sponsor_relationship: field(FieldId::SponsorRelationship),
        sponsor_status: field(FieldId::SponsorStatus),
        proof_of_funds: field(FieldId::ProofOfFunds),
        net_worth: field(FieldId::NetWorth),
        additional_notes: field(FieldId::AdditionalNotes),
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        payment_status: "Paid".to_string(),
    })
}
