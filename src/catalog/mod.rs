//! Service goals and the fixed pricing catalog attached to them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::{IntakeError, Result};

/// The applicant's primary immigration objective. Drives both the step plan
/// and the quoted fee.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ServiceGoal {
    #[serde(rename = "Work in Canada")]
    WorkInCanada,
    #[serde(rename = "Study in Canada")]
    StudyInCanada,
    #[serde(rename = "Join Family")]
    JoinFamily,
    #[serde(rename = "Visit Canada")]
    VisitCanada,
    #[serde(rename = "Invest/Start a Business")]
    InvestOrBusiness,
    #[serde(rename = "Work Permit")]
    WorkPermit,
}

impl ServiceGoal {
    /// Every goal, in presentation order.
    pub const ALL: [ServiceGoal; 6] = [
        ServiceGoal::WorkInCanada,
        ServiceGoal::StudyInCanada,
        ServiceGoal::JoinFamily,
        ServiceGoal::VisitCanada,
        ServiceGoal::InvestOrBusiness,
        ServiceGoal::WorkPermit,
    ];

    /// Canonical display label. Labels are also the wire form of the goal.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceGoal::WorkInCanada => "Work in Canada",
            ServiceGoal::StudyInCanada => "Study in Canada",
            ServiceGoal::JoinFamily => "Join Family",
            ServiceGoal::VisitCanada => "Visit Canada",
            ServiceGoal::InvestOrBusiness => "Invest/Start a Business",
            ServiceGoal::WorkPermit => "Work Permit",
        }
    }
}

impl Default for ServiceGoal {
    fn default() -> Self {
        ServiceGoal::WorkPermit
    }
}

impl fmt::Display for ServiceGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ServiceGoal {
    type Err = IntakeError;

    fn from_str(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        ServiceGoal::ALL
            .iter()
            .find(|goal| goal.label().eq_ignore_ascii_case(trimmed))
            .copied()
            .ok_or_else(|| IntakeError::UnknownGoal(trimmed.to_string()))
    }
}

/// One row of the pricing catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PricingEntry {
    pub goal: ServiceGoal,
    /// Price in minor currency units (CAD cents).
    pub price_minor_units: i64,
    pub description: String,
}

impl PricingEntry {
    fn new(goal: ServiceGoal, price_minor_units: i64, description: &str) -> Self {
        Self {
            goal,
            price_minor_units,
            description: description.to_string(),
        }
    }

    /// Price rendered for display and for the `feePaid` record field.
    pub fn display_price(&self) -> String {
        format_minor_units(self.price_minor_units)
    }
}

/// Immutable goal-to-price mapping. Every goal has exactly one entry; the
/// invariant is checked at construction so lookups cannot silently miss.
#[derive(Debug, Clone)]
pub struct PricingCatalog {
    entries: HashMap<ServiceGoal, PricingEntry>,
}

static STANDARD_CATALOG: Lazy<PricingCatalog> = Lazy::new(|| {
    PricingCatalog::new(vec![
        PricingEntry::new(
            ServiceGoal::WorkInCanada,
            500_000,
            "Express Entry & Provincial Nominee Programs",
        ),
        PricingEntry::new(
            ServiceGoal::StudyInCanada,
            275_000,
            "Study Permit & Educational Institution Support",
        ),
        PricingEntry::new(
            ServiceGoal::JoinFamily,
            500_000,
            "Family Sponsorship & Spousal Applications",
        ),
        PricingEntry::new(
            ServiceGoal::VisitCanada,
            125_000,
            "Visitor Visa & Temporary Residence",
        ),
        PricingEntry::new(
            ServiceGoal::InvestOrBusiness,
            900_000,
            "Business Class Immigration & Investment Programs",
        ),
        PricingEntry::new(
            ServiceGoal::WorkPermit,
            250_000,
            "Work Permit Application Support",
        ),
    ])
    .expect("standard pricing catalog covers every goal")
});

impl PricingCatalog {
    /// Builds a catalog, rejecting duplicate or missing goals.
    pub fn new(rows: Vec<PricingEntry>) -> Result<Self> {
        let mut entries = HashMap::new();
        for row in rows {
            let goal = row.goal;
            if entries.insert(goal, row).is_some() {
                return Err(IntakeError::Config(format!(
                    "duplicate pricing entry for `{}`",
                    goal
                )));
            }
        }
        for goal in ServiceGoal::ALL {
            if !entries.contains_key(&goal) {
                return Err(IntakeError::UnknownGoal(goal.label().to_string()));
            }
        }
        Ok(Self { entries })
    }

    /// The production catalog, loaded once.
    pub fn standard() -> &'static PricingCatalog {
        &STANDARD_CATALOG
    }

    /// Looks up the entry for a goal. The enumeration is closed, so a miss
    /// indicates a construction bug rather than user input.
    pub fn price_for(&self, goal: ServiceGoal) -> Result<&PricingEntry> {
        self.entries
            .get(&goal)
            .ok_or_else(|| IntakeError::UnknownGoal(goal.label().to_string()))
    }
}

/// Formats minor units as a Canadian-dollar display string, e.g. `C$5,000.00`.
pub fn format_minor_units(minor_units: i64) -> String {
    let dollars = minor_units / 100;
    let cents = (minor_units % 100).abs();
    format!("C${}.{:02}", group_digits(&dollars.to_string()), cents)
}

fn group_digits(digits: &str) -> String {
    let (sign, body) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let mut grouped = String::new();
    let mut count = 0;
    for ch in body.chars().rev() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, ',');
        }
        grouped.insert(0, ch);
        count += 1;
    }
    format!("{}{}", sign, grouped)
}
