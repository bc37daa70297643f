use tracing::{debug, error};

use crate::catalog::{PricingCatalog, PricingEntry, ServiceGoal};
use crate::errors::Result;
use crate::form::fields::{FieldId, FormValues};
use crate::form::plan::{resolve_plan, StepPlan};
use crate::form::steps::StepDefinition;
use crate::form::validate::{validate_step, ValidationSink};

/// Outcome of a forward transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Validation failed, or the current position does not map to a step.
    Blocked,
    /// Moved forward to a non-terminal step.
    Advanced,
    /// Moved forward onto the payment step; the gateway should be notified.
    ReachedPayment(ServiceGoal),
    /// Already at the last position; nothing to do.
    AtEnd,
}

/// Position-derived availability of the prev/next/submit controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub show_prev: bool,
    pub show_next: bool,
    pub show_submit: bool,
}

/// Owns the navigation state of one intake form: the live field values, the
/// step plan for the currently selected goal, and the cursor into that plan.
///
/// The cursor is deliberately NOT remapped when the goal changes and the
/// plan shrinks; the position may then reference no step at all. Accessors
/// return `Option` for that case and `next` refuses to move. This mirrors
/// the shipped behavior and is covered by a regression test; clamping it is
/// a product decision, not a code one.
#[derive(Debug, Clone)]
pub struct FormController {
    values: FormValues,
    catalog: PricingCatalog,
    plan: StepPlan,
    current_index: usize,
    current_goal: ServiceGoal,
}

impl FormController {
    /// Initializes the controller with the default goal so the first render
    /// is valid before any interaction.
    pub fn new(catalog: PricingCatalog) -> Self {
        let goal = ServiceGoal::default();
        Self {
            values: FormValues::new(),
            catalog,
            plan: resolve_plan(goal),
            current_index: 0,
            current_goal: goal,
        }
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn set_field(&mut self, field: FieldId, value: impl Into<String>) {
        self.values.set(field, value);
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn plan(&self) -> &StepPlan {
        &self.plan
    }

    pub fn current_goal(&self) -> ServiceGoal {
        self.current_goal
    }

    pub fn catalog(&self) -> &PricingCatalog {
        &self.catalog
    }

    /// Step under the cursor, if the cursor is within the current plan.
    pub fn current_step(&self) -> Option<&'static StepDefinition> {
        self.plan.step_at(self.current_index)
    }

    /// Pricing entry for the currently selected goal.
    pub fn pricing(&self) -> Result<&PricingEntry> {
        self.catalog.price_for(self.current_goal)
    }

    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.current_index, self.plan.len())
    }

    pub fn controls(&self) -> ControlState {
        let last = self.plan.last_position();
        ControlState {
            show_prev: self.current_index > 0,
            show_next: self.current_index < last,
            show_submit: self.current_index == last,
        }
    }

    /// Advances one step if the current step validates. Leaving the
    /// goal-selection step recomputes the plan first, so branching takes
    /// effect immediately.
    pub fn next(&mut self, sink: &mut dyn ValidationSink) -> Transition {
        let Some(step) = self.current_step() else {
            error!(
                position = self.current_index,
                plan_len = self.plan.len(),
                "cursor references no step in the active plan"
            );
            return Transition::Blocked;
        };

        if validate_step(step, &self.values, sink).is_err() {
            return Transition::Blocked;
        }

        if self.current_index == 1 {
            self.recalculate_plan();
        }

        let last = self.plan.last_position();
        if self.current_index >= last {
            return Transition::AtEnd;
        }

        self.current_index += 1;
        debug!(position = self.current_index, "advanced to next step");

        if self.current_index == last {
            Transition::ReachedPayment(self.current_goal)
        } else {
            Transition::Advanced
        }
    }

    /// Moves one step back. Returns false at the first step. Landing back on
    /// the goal-selection step recomputes the plan, mirroring the forward
    /// recompute point.
    pub fn prev(&mut self) -> bool {
        if self.current_index == 0 {
            return false;
        }
        self.current_index -= 1;
        if self.current_index == 1 {
            self.recalculate_plan();
        }
        debug!(position = self.current_index, "moved to previous step");
        true
    }

    /// Reacts to the goal selector changing: recomputes the plan and the
    /// displayed pricing immediately, independent of next/prev. The cursor
    /// is left untouched.
    pub fn goal_changed(&mut self) {
        self.recalculate_plan();
    }

    fn recalculate_plan(&mut self) {
        let raw = self.values.get(FieldId::PrimaryGoal);
        let goal = if raw.trim().is_empty() {
            ServiceGoal::default()
        } else {
            match raw.parse::<ServiceGoal>() {
                Ok(goal) => goal,
                Err(err) => {
                    error!(%err, "ignoring unrecognized goal selection");
                    return;
                }
            }
        };
        self.current_goal = goal;
        self.plan = resolve_plan(goal);
        debug!(goal = %goal, plan_len = self.plan.len(), "recalculated step plan");
    }
}

/// Progress through a plan as a percentage: 0 at the first position, 100 at
/// the last, and 0 for a degenerate single-step plan.
pub fn progress_percent(position: usize, plan_len: usize) -> f64 {
    if plan_len > 1 {
        position as f64 / (plan_len - 1) as f64 * 100.0
    } else {
        0.0
    }
}
