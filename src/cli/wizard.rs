//! Interactive assessment wizard: drives the intake session step by step,
//! surfacing validation, payment, and submission outcomes.

use crate::cli::{io, output};
use crate::config::Config;
use crate::errors::Result;
use crate::form::fields::FieldId;
use crate::form::steps::select_options;
use crate::form::validate::ValidationSink;
use crate::gateway::{HttpPaymentGateway, PaymentGateway};
use crate::session::{AdvanceEvent, IntakeSession, SubmitOutcome};
use crate::sink::{HttpLeadSink, LeadSink};

/// Production validation sink: prints the reason and points at the field
/// that needs attention, the terminal stand-in for focusing an input.
pub struct CliValidationSink;

impl ValidationSink for CliValidationSink {
    fn report_error(&mut self, field: FieldId, message: &str) {
        output::warning(message);
        output::detail(format!("Check the {} field.", field.label()));
    }
}

enum StepAction {
    Continue,
    Back,
    Exit,
}

const SUCCESS_MESSAGE: &str = "Thank you! Your payment has been processed and we've received \
your information. We will contact you within 2 business days to schedule your consultation.";

const SINK_FAILURE_MESSAGE: &str = "Your payment was processed successfully. However, there \
was an issue recording your details. Please contact us directly at your earliest convenience.";

/// Builds the HTTP collaborators from configuration and runs the wizard.
pub fn run_assessment(config: &Config) -> Result<()> {
    let gateway = HttpPaymentGateway::new(&config.gateway_url, &config.confirm_url)?;
    let sink = HttpLeadSink::new(&config.sink_url)?;
    let controller = crate::form::navigation::FormController::new(
        crate::catalog::PricingCatalog::standard().clone(),
    );
    run_with(IntakeSession::new(controller, gateway, sink))
}

/// Wizard loop over an already-wired session.
pub fn run_with<G: PaymentGateway, L: LeadSink>(mut session: IntakeSession<G, L>) -> Result<()> {
    let mut sink = CliValidationSink;

    loop {
        let Some(step) = session.controller().current_step() else {
            output::error("The assessment is in an inconsistent position; please restart.");
            return Ok(());
        };
        let position = session.controller().current_index();
        let total = session.controller().plan().len();
        let percent = session.controller().progress_percent().round();

        output::section(format!("Step {} of {} — {}", position + 1, total, step.title));
        output::detail(format!("Progress: {percent}%"));
        if let Ok(entry) = session.controller().pricing() {
            output::detail(format!(
                "Selected service: {} — {} ({})",
                session.controller().current_goal(),
                entry.display_price(),
                entry.description
            ));
        }

        if session.controller().controls().show_submit {
            if !payment_step(&mut session)? {
                continue;
            }
            return Ok(());
        }

        prompt_step_fields(&mut session, step)?;

        match step_action(&session)? {
            StepAction::Continue => match session.advance(&mut sink)? {
                AdvanceEvent::Blocked => {}
                AdvanceEvent::Moved | AdvanceEvent::AtEnd => {}
                AdvanceEvent::PaymentReady => {
                    io::print_info("Payment is ready below.");
                }
                AdvanceEvent::PaymentInitFailed(reason) => {
                    io::print_warning(format!(
                        "Could not initialize payment: {reason}. Go back and return to this \
step to try again."
                    ));
                }
            },
            StepAction::Back => {
                if !session.back() {
                    io::print_warning("Already at the first step.");
                }
            }
            StepAction::Exit => {
                io::print_info("Assessment cancelled. Nothing was submitted.");
                return Ok(());
            }
        }
    }
}

fn prompt_step_fields<G: PaymentGateway, L: LeadSink>(
    session: &mut IntakeSession<G, L>,
    step: &'static crate::form::steps::StepDefinition,
) -> Result<()> {
    for &field in step.required_fields {
        let current = session.controller().values().get(field).to_string();
        let value = match select_options(field) {
            Some(options) => io::prompt_select(field.label(), options, &current)?,
            None => io::prompt_text(field.label(), &current)?,
        };
        session.set_field(field, value);
    }

    for group in step.choice_groups {
        let current = session.controller().values().get(group.field).to_string();
        let value = io::prompt_select(group.field.label(), group.options, &current)?;
        session.set_field(group.field, value);
        if group.field == FieldId::PrimaryGoal {
            // Branching and pricing react to the selector immediately.
            session.goal_changed();
        }
    }

    // Optional free-text on the additional-information step.
    if step.index == 6 {
        let current = session
            .controller()
            .values()
            .get(FieldId::AdditionalNotes)
            .to_string();
        let notes = io::prompt_text(FieldId::AdditionalNotes.label(), &current)?;
        session.set_field(FieldId::AdditionalNotes, notes);
    }

    Ok(())
}

fn step_action<G: PaymentGateway, L: LeadSink>(session: &IntakeSession<G, L>) -> Result<StepAction> {
    let controls = session.controller().controls();
    let mut options = vec!["Continue"];
    if controls.show_prev {
        options.push("Back");
    }
    options.push("Exit assessment");

    let choice = io::prompt_select("Next action", &options, "Continue")?;
    Ok(match choice.as_str() {
        "Back" => StepAction::Back,
        "Exit assessment" => StepAction::Exit,
        _ => StepAction::Continue,
    })
}

/// Payment step interaction. Returns true once the flow is finished.
fn payment_step<G: PaymentGateway, L: LeadSink>(
    session: &mut IntakeSession<G, L>,
) -> Result<bool> {
    if let Ok(entry) = session.controller().pricing() {
        output::detail(format!("Amount due: {}", entry.display_price()));
    }

    let choice = io::prompt_select(
        "Payment",
        &["Pay & Submit", "Back", "Exit assessment"],
        "Pay & Submit",
    )?;
    match choice.as_str() {
        "Back" => {
            session.back();
            return Ok(false);
        }
        "Exit assessment" => {
            io::print_info("Assessment cancelled. Nothing was submitted.");
            return Ok(true);
        }
        _ => {}
    }

    match session.submit()? {
        SubmitOutcome::NotReady => {
            io::print_warning("Payment system not ready. Please wait a moment and try again.");
            Ok(false)
        }
        SubmitOutcome::AlreadyInFlight => {
            io::print_info("Your submission is already being processed.");
            Ok(true)
        }
        SubmitOutcome::PaymentFailed(reason) => {
            io::print_warning(format!("Payment failed: {reason}. You can try again."));
            Ok(false)
        }
        SubmitOutcome::Completed(record) => {
            io::print_success("Payment Successful!");
            io::print_info(SUCCESS_MESSAGE);
            output::detail(format!("Reference: {}", record.lead_id));
            Ok(true)
        }
        SubmitOutcome::CompletedWithSinkError { record, .. } => {
            io::print_success("Payment Successful!");
            io::print_warning(SINK_FAILURE_MESSAGE);
            output::detail(format!("Reference: {}", record.lead_id));
            Ok(true)
        }
    }
}
