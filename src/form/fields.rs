use std::collections::BTreeMap;
use std::fmt;

/// Closed enumeration of every tracked form field. Using an enum instead of
/// string identifiers means an unknown field cannot survive past compile
/// time, and the wire key and human label live next to the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldId {
    FullName,
    Email,
    Phone,
    CountryOfResidence,
    PrimaryGoal,
    EducationLevel,
    FieldOfStudy,
    HasAcceptanceLetter,
    WorkExperience,
    Occupation,
    MgmtExperience,
    SponsorRelationship,
    SponsorStatus,
    ProofOfFunds,
    NetWorth,
    AdditionalNotes,
}

impl FieldId {
    pub const ALL: [FieldId; 16] = [
        FieldId::FullName,
        FieldId::Email,
        FieldId::Phone,
        FieldId::CountryOfResidence,
        FieldId::PrimaryGoal,
        FieldId::EducationLevel,
        FieldId::FieldOfStudy,
        FieldId::HasAcceptanceLetter,
        FieldId::WorkExperience,
        FieldId::Occupation,
        FieldId::MgmtExperience,
        FieldId::SponsorRelationship,
        FieldId::SponsorStatus,
        FieldId::ProofOfFunds,
        FieldId::NetWorth,
        FieldId::AdditionalNotes,
    ];

    /// Wire key used in the submission record.
    pub fn key(&self) -> &'static str {
        match self {
            FieldId::FullName => "fullName",
            FieldId::Email => "email",
            FieldId::Phone => "phone",
            FieldId::CountryOfResidence => "countryOfResidence",
            FieldId::PrimaryGoal => "primaryGoal",
            FieldId::EducationLevel => "educationLevel",
            FieldId::FieldOfStudy => "fieldOfStudy",
            FieldId::HasAcceptanceLetter => "hasAcceptanceLetter",
            FieldId::WorkExperience => "workExperience",
            FieldId::Occupation => "occupation",
            FieldId::MgmtExperience => "mgmtExperience",
            FieldId::SponsorRelationship => "sponsorRelationship",
            FieldId::SponsorStatus => "sponsorStatus",
            FieldId::ProofOfFunds => "proofOfFunds",
            FieldId::NetWorth => "netWorth",
            FieldId::AdditionalNotes => "additionalNotes",
        }
    }

    /// Human-facing label, used in prompts and validation messages.
    pub fn label(&self) -> &'static str {
        match self {
            FieldId::FullName => "Full Name",
            FieldId::Email => "Email Address",
            FieldId::Phone => "Phone Number",
            FieldId::CountryOfResidence => "Country of Residence",
            FieldId::PrimaryGoal => "Primary Goal",
            FieldId::EducationLevel => "Education Level",
            FieldId::FieldOfStudy => "Field of Study",
            FieldId::HasAcceptanceLetter => "Acceptance Letter",
            FieldId::WorkExperience => "Work Experience",
            FieldId::Occupation => "Occupation",
            FieldId::MgmtExperience => "Management Experience",
            FieldId::SponsorRelationship => "Sponsor Relationship",
            FieldId::SponsorStatus => "Sponsor Status",
            FieldId::ProofOfFunds => "Proof of Funds",
            FieldId::NetWorth => "Net Worth",
            FieldId::AdditionalNotes => "Additional Notes",
        }
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Live values for every tracked field. Absent fields read as the empty
/// string, matching the snapshot semantics of the submission assembler.
#[derive(Debug, Clone, Default)]
pub struct FormValues {
    values: BTreeMap<FieldId, String>,
}

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: FieldId) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: FieldId, value: impl Into<String>) {
        self.values.insert(field, value.into());
    }

    pub fn clear(&mut self, field: FieldId) {
        self.values.remove(&field);
    }

    /// True when the stored value is empty or whitespace-only.
    pub fn is_blank(&self, field: FieldId) -> bool {
        self.get(field).trim().is_empty()
    }
}
