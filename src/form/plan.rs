use crate::catalog::ServiceGoal;
use crate::form::steps::{step, StepDefinition};

/// Ordered sequence of step-catalog indices applicable to one goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
    indices: Vec<usize>,
}

impl StepPlan {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Catalog index at a plan position, if the position is in bounds.
    pub fn index_at(&self, position: usize) -> Option<usize> {
        self.indices.get(position).copied()
    }

    /// Step definition at a plan position, if the position is in bounds.
    pub fn step_at(&self, position: usize) -> Option<&'static StepDefinition> {
        self.index_at(position).and_then(step)
    }

    pub fn last_position(&self) -> usize {
        self.indices.len().saturating_sub(1)
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

/// Resolves the fixed `goal → ordered step indices` table. Every plan starts
/// with the common intro steps and ends with the payment step.
pub fn resolve_plan(goal: ServiceGoal) -> StepPlan {
    let indices: &[usize] = match goal {
        ServiceGoal::WorkInCanada => &[0, 1, 2, 3, 4, 5, 6, 7],
        ServiceGoal::StudyInCanada => &[0, 1, 2, 4, 5, 6, 7],
        ServiceGoal::InvestOrBusiness => &[0, 1, 2, 3, 5, 6, 7],
        ServiceGoal::JoinFamily => &[0, 1, 2, 4, 6, 7],
        ServiceGoal::VisitCanada => &[0, 1, 6, 7],
        ServiceGoal::WorkPermit => &[0, 1, 2, 3, 5, 6, 7],
    };
    StepPlan {
        indices: indices.to_vec(),
    }
}
