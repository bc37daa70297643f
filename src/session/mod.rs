//! One intake session: the form controller wired to the payment gateway and
//! lead sink, with the submission outcome policy applied.

use chrono::Utc;
use tracing::{info, warn};

use crate::errors::Result;
use crate::form::fields::FieldId;
use crate::form::navigation::{FormController, Transition};
use crate::form::submission::{assemble, SubmissionRecord};
use crate::form::validate::ValidationSink;
use crate::gateway::{PaymentGateway, PaymentIntent};
use crate::sink::LeadSink;

/// Outcome of one forward navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceEvent {
    /// Validation blocked the move; the sink already carries the reason.
    Blocked,
    /// Moved onto a non-terminal step.
    Moved,
    /// Moved onto the payment step and the intent was created.
    PaymentReady,
    /// Moved onto the payment step but intent creation failed; navigating
    /// away and back retries it.
    PaymentInitFailed(String),
    /// Already at the last step.
    AtEnd,
}

/// Outcome of a submission request. Payment success always outranks a
/// downstream sink failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// No payment intent exists yet.
    NotReady,
    /// A submission is already in flight or has completed.
    AlreadyInFlight,
    /// Confirmation failed; collected data is retained and retry is allowed.
    PaymentFailed(String),
    /// Payment confirmed and the lead record persisted.
    Completed(SubmissionRecord),
    /// Payment confirmed but the lead record could not be persisted.
    CompletedWithSinkError {
        record: SubmissionRecord,
        error: String,
    },
}

/// Drives one applicant through the form, payment, and lead hand-off.
pub struct IntakeSession<G: PaymentGateway, L: LeadSink> {
    controller: FormController,
    gateway: G,
    sink: L,
    intent: Option<PaymentIntent>,
    submit_in_flight: bool,
}

impl<G: PaymentGateway, L: LeadSink> IntakeSession<G, L> {
    pub fn new(controller: FormController, gateway: G, sink: L) -> Self {
        Self {
            controller,
            gateway,
            sink,
            intent: None,
            submit_in_flight: false,
        }
    }

    pub fn controller(&self) -> &FormController {
        &self.controller
    }

    pub fn set_field(&mut self, field: FieldId, value: impl Into<String>) {
        self.controller.set_field(field, value);
    }

    pub fn goal_changed(&mut self) {
        self.controller.goal_changed();
    }

    pub fn has_intent(&self) -> bool {
        self.intent.is_some()
    }

    /// Validated forward navigation. Arriving on the payment step notifies
    /// the gateway; every arrival creates a fresh intent, so returning to
    /// earlier steps and coming back simply re-initializes payment.
    pub fn advance(&mut self, sink: &mut dyn ValidationSink) -> Result<AdvanceEvent> {
        match self.controller.next(sink) {
            Transition::Blocked => Ok(AdvanceEvent::Blocked),
            Transition::Advanced => Ok(AdvanceEvent::Moved),
            Transition::AtEnd => Ok(AdvanceEvent::AtEnd),
            Transition::ReachedPayment(goal) => {
                let amount = self.controller.pricing()?.price_minor_units;
                match self.gateway.create_intent(goal.label(), amount) {
                    Ok(intent) => {
                        info!(goal = %goal, "payment intent created");
                        self.intent = Some(intent);
                        Ok(AdvanceEvent::PaymentReady)
                    }
                    Err(err) => {
                        warn!(%err, "payment intent creation failed");
                        self.intent = None;
                        Ok(AdvanceEvent::PaymentInitFailed(err.to_string()))
                    }
                }
            }
        }
    }

    /// Unvalidated backward navigation.
    pub fn back(&mut self) -> bool {
        self.controller.prev()
    }

    /// Confirms the payment and hands the assembled record to the lead sink.
    /// Re-entrant calls are refused while a submission is in flight; there
    /// is no cancellation once confirmation has started.
    pub fn submit(&mut self) -> Result<SubmitOutcome> {
        if self.submit_in_flight {
            return Ok(SubmitOutcome::AlreadyInFlight);
        }
        let Some(intent) = self.intent.clone() else {
            return Ok(SubmitOutcome::NotReady);
        };

        self.submit_in_flight = true;

        if let Err(err) = self.gateway.confirm(&intent.client_secret) {
            warn!(%err, "payment confirmation failed");
            self.submit_in_flight = false;
            return Ok(SubmitOutcome::PaymentFailed(err.to_string()));
        }

        let record = assemble(
            self.controller.values(),
            self.controller.current_goal(),
            self.controller.catalog(),
            Utc::now(),
        )?;

        match self.sink.submit(&record) {
            Ok(()) => {
                info!(lead_id = %record.lead_id, "lead record persisted");
                Ok(SubmitOutcome::Completed(record))
            }
            Err(err) => {
                // Payment already went through; surface success regardless.
                warn!(%err, "lead sink rejected the record after payment");
                Ok(SubmitOutcome::CompletedWithSinkError {
                    record,
                    error: err.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PricingCatalog;
    use crate::errors::IntakeError;
    use crate::form::validate::RecordingSink;
    use crate::gateway::PaymentIntent;

    struct ScriptedGateway {
        create_results: Vec<Result<PaymentIntent>>,
        confirm_results: Vec<Result<()>>,
    }

    impl ScriptedGateway {
        fn new(create_results: Vec<Result<PaymentIntent>>, confirm_results: Vec<Result<()>>) -> Self {
            Self {
                create_results,
                confirm_results,
            }
        }
    }

    impl PaymentGateway for ScriptedGateway {
        fn create_intent(
            &mut self,
            _service_type: &str,
            _amount_minor_units: i64,
        ) -> Result<PaymentIntent> {
            self.create_results.remove(0)
        }

        fn confirm(&mut self, _client_secret: &str) -> Result<()> {
            self.confirm_results.remove(0)
        }
    }

    struct StubSink {
        fail: bool,
    }

    impl LeadSink for StubSink {
        fn submit(&mut self, _record: &SubmissionRecord) -> Result<()> {
            if self.fail {
                Err(IntakeError::Sink("sheet quota exceeded".into()))
            } else {
                Ok(())
            }
        }
    }

    fn secret() -> Result<PaymentIntent> {
        Ok(PaymentIntent {
            client_secret: "pi_123_secret".into(),
        })
    }

    fn session_at_payment(
        gateway: ScriptedGateway,
        sink: StubSink,
    ) -> IntakeSession<ScriptedGateway, StubSink> {
        let controller = FormController::new(PricingCatalog::standard().clone());
        let mut session = IntakeSession::new(controller, gateway, sink);
        let mut vsink = RecordingSink::new();
        session.set_field(FieldId::FullName, "Amara Obi");
        session.set_field(FieldId::Email, "amara@example.com");
        session.set_field(FieldId::Phone, "+1 555 0100");
        session.set_field(FieldId::CountryOfResidence, "Nigeria");
        session.advance(&mut vsink).unwrap();
        session.set_field(FieldId::PrimaryGoal, "Visit Canada");
        session.advance(&mut vsink).unwrap();
        session.advance(&mut vsink).unwrap();
        session
    }

    #[test]
    fn submit_before_intent_is_refused() {
        let gateway = ScriptedGateway::new(vec![], vec![]);
        let sink = StubSink { fail: false };
        let controller = FormController::new(PricingCatalog::standard().clone());
        let mut session = IntakeSession::new(controller, gateway, sink);
        assert_eq!(session.submit().unwrap(), SubmitOutcome::NotReady);
    }

    #[test]
    fn failed_intent_creation_is_retried_on_rearrival() {
        let gateway = ScriptedGateway::new(
            vec![Err(IntakeError::Gateway("proxy down".into())), secret()],
            vec![],
        );
        let sink = StubSink { fail: false };
        let mut session = session_at_payment(gateway, sink);
        assert!(!session.has_intent());

        let mut vsink = RecordingSink::new();
        session.back();
        let event = session.advance(&mut vsink).unwrap();
        assert_eq!(event, AdvanceEvent::PaymentReady);
        assert!(session.has_intent());
    }

    #[test]
    fn payment_failure_allows_retry_and_keeps_data() {
        let gateway = ScriptedGateway::new(
            vec![secret()],
            vec![Err(IntakeError::Gateway("card declined".into())), Ok(())],
        );
        let sink = StubSink { fail: false };
        let mut session = session_at_payment(gateway, sink);

        let outcome = session.submit().unwrap();
        assert!(matches!(outcome, SubmitOutcome::PaymentFailed(_)));
        assert_eq!(session.controller().values().get(FieldId::FullName), "Amara Obi");

        let outcome = session.submit().unwrap();
        match outcome {
            SubmitOutcome::Completed(record) => {
                assert_eq!(record.full_name, "Amara Obi");
                assert_eq!(record.fee_paid, "C$1,250.00");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn sink_failure_still_reports_payment_success() {
        let gateway = ScriptedGateway::new(vec![secret()], vec![Ok(())]);
        let sink = StubSink { fail: true };
        let mut session = session_at_payment(gateway, sink);

        let outcome = session.submit().unwrap();
        match outcome {
            SubmitOutcome::CompletedWithSinkError { record, error } => {
                assert_eq!(record.payment_status, "Paid");
                assert!(error.contains("sheet quota exceeded"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn completed_submission_blocks_reentry() {
        let gateway = ScriptedGateway::new(vec![secret()], vec![Ok(())]);
        let sink = StubSink { fail: false };
        let mut session = session_at_payment(gateway, sink);

        assert!(matches!(
            session.submit().unwrap(),
            SubmitOutcome::Completed(_)
        ));
        assert_eq!(session.submit().unwrap(), SubmitOutcome::AlreadyInFlight);
    }
}
