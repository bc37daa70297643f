use crate::form::fields::FieldId;

/// Index of the payment step. Every plan ends here.
pub const PAYMENT_STEP_INDEX: usize = 7;

/// A mutually-exclusive choice group: exactly one option must be selected
/// before the step validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChoiceGroup {
    pub field: FieldId,
    pub options: &'static [&'static str],
}

/// Declarative description of one form step: which single-value fields must
/// be filled and which choice groups must have a selection.
#[derive(Debug, Clone, Copy)]
pub struct StepDefinition {
    pub index: usize,
    pub title: &'static str,
    pub required_fields: &'static [FieldId],
    pub choice_groups: &'static [ChoiceGroup],
}

const GOAL_OPTIONS: &[&str] = &[
    "Work in Canada",
    "Study in Canada",
    "Join Family",
    "Visit Canada",
    "Invest/Start a Business",
    "Work Permit",
];

const YES_NO: &[&str] = &["Yes", "No"];

const SPONSOR_RELATIONSHIPS: &[&str] =
    &["Spouse or Partner", "Parent", "Child", "Sibling", "No Sponsor"];

const SPONSOR_STATUSES: &[&str] = &["Canadian Citizen", "Permanent Resident", "Not applicable"];

/// Ordered catalog of every possible form step. Plans select an ordered
/// subset of these indices; steps 0 and 1 are common to every plan and the
/// payment step closes each of them.
static STEP_CATALOG: [StepDefinition; 8] = [
    StepDefinition {
        index: 0,
        title: "Contact information",
        required_fields: &[
            FieldId::FullName,
            FieldId::Email,
            FieldId::Phone,
            FieldId::CountryOfResidence,
        ],
        choice_groups: &[],
    },
    StepDefinition {
        index: 1,
        title: "Immigration goal",
        required_fields: &[],
        choice_groups: &[ChoiceGroup {
            field: FieldId::PrimaryGoal,
            options: GOAL_OPTIONS,
        }],
    },
    StepDefinition {
        index: 2,
        title: "Education background",
        required_fields: &[FieldId::EducationLevel, FieldId::FieldOfStudy],
        choice_groups: &[],
    },
    StepDefinition {
        index: 3,
        title: "Work experience",
        required_fields: &[
            FieldId::WorkExperience,
            FieldId::Occupation,
            FieldId::MgmtExperience,
        ],
        choice_groups: &[],
    },
    StepDefinition {
        index: 4,
        title: "Study & sponsorship",
        required_fields: &[],
        choice_groups: &[
            ChoiceGroup {
                field: FieldId::HasAcceptanceLetter,
                options: YES_NO,
            },
            ChoiceGroup {
                field: FieldId::SponsorRelationship,
                options: SPONSOR_RELATIONSHIPS,
            },
            ChoiceGroup {
                field: FieldId::SponsorStatus,
                options: SPONSOR_STATUSES,
            },
        ],
    },
    StepDefinition {
        index: 5,
        title: "Financial profile",
        required_fields: &[FieldId::ProofOfFunds, FieldId::NetWorth],
        choice_groups: &[],
    },
    StepDefinition {
        index: 6,
        title: "Additional information",
        required_fields: &[],
        choice_groups: &[],
    },
    StepDefinition {
        index: 7,
        title: "Payment",
        required_fields: &[],
        choice_groups: &[],
    },
];

/// The full step catalog, in index order.
pub fn step_catalog() -> &'static [StepDefinition; 8] {
    &STEP_CATALOG
}

/// Looks up a step by catalog index.
pub fn step(index: usize) -> Option<&'static StepDefinition> {
    STEP_CATALOG.get(index)
}

/// Fixed option lists for single-value fields that are presented as
/// dropdowns rather than free text. Fields not listed here take free text.
pub fn select_options(field: FieldId) -> Option<&'static [&'static str]> {
    match field {
        FieldId::CountryOfResidence => Some(&[
            "Nigeria",
            "India",
            "Philippines",
            "United States",
            "United Kingdom",
            "United Arab Emirates",
            "Other",
        ]),
        FieldId::EducationLevel => Some(&[
            "High School",
            "College Diploma",
            "Bachelor's Degree",
            "Master's Degree",
            "Doctorate",
        ]),
        FieldId::WorkExperience => Some(&[
            "None",
            "Less than 1 year",
            "1-3 years",
            "4-6 years",
            "7+ years",
        ]),
        FieldId::MgmtExperience => Some(&["None", "1-2 years", "3-5 years", "6+ years"]),
        FieldId::ProofOfFunds => Some(&[
            "Under C$10,000",
            "C$10,000 - C$25,000",
            "C$25,000 - C$50,000",
            "Over C$50,000",
        ]),
        FieldId::NetWorth => Some(&[
            "Under C$100,000",
            "C$100,000 - C$500,000",
            "C$500,000 - C$1,000,000",
            "Over C$1,000,000",
        ]),
        _ => None,
    }
}
