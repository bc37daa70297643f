//! End-to-end intake flows driven through the session with scripted
//! collaborators: goal branching, pricing, payment hand-off, and the
//! submission outcome policy.

use std::cell::RefCell;
use std::rc::Rc;

use intake_core::catalog::{PricingCatalog, ServiceGoal};
use intake_core::errors::{IntakeError, Result};
use intake_core::form::{FieldId, FormController, RecordingSink, SubmissionRecord};
use intake_core::gateway::{PaymentGateway, PaymentIntent};
use intake_core::session::{AdvanceEvent, IntakeSession, SubmitOutcome};
use intake_core::sink::LeadSink;

#[derive(Clone, Default)]
struct GatewayLog {
    create_calls: Rc<RefCell<Vec<(String, i64)>>>,
    confirm_calls: Rc<RefCell<usize>>,
}

struct MockGateway {
    log: GatewayLog,
    fail_create: bool,
    fail_confirm: bool,
}

impl MockGateway {
    fn new(log: GatewayLog) -> Self {
        Self {
            log,
            fail_create: false,
            fail_confirm: false,
        }
    }
}

impl PaymentGateway for MockGateway {
    fn create_intent(
        &mut self,
        service_type: &str,
        amount_minor_units: i64,
    ) -> Result<PaymentIntent> {
        self.log
            .create_calls
            .borrow_mut()
            .push((service_type.to_string(), amount_minor_units));
        if self.fail_create {
            Err(IntakeError::Gateway("proxy unavailable".into()))
        } else {
            Ok(PaymentIntent {
                client_secret: "pi_test_secret".into(),
            })
        }
    }

    fn confirm(&mut self, _client_secret: &str) -> Result<()> {
        *self.log.confirm_calls.borrow_mut() += 1;
        if self.fail_confirm {
            Err(IntakeError::Gateway("card declined".into()))
        } else {
            Ok(())
        }
    }
}

#[derive(Clone, Default)]
struct SinkLog {
    records: Rc<RefCell<Vec<SubmissionRecord>>>,
}

struct MockSink {
    log: SinkLog,
    fail: bool,
}

impl LeadSink for MockSink {
    fn submit(&mut self, record: &SubmissionRecord) -> Result<()> {
        self.log.records.borrow_mut().push(record.clone());
        if self.fail {
            Err(IntakeError::Sink("sheet quota exceeded".into()))
        } else {
            Ok(())
        }
    }
}

fn new_session(
    gateway: MockGateway,
    sink: MockSink,
) -> IntakeSession<MockGateway, MockSink> {
    let controller = FormController::new(PricingCatalog::standard().clone());
    IntakeSession::new(controller, gateway, sink)
}

fn fill_contact(session: &mut IntakeSession<MockGateway, MockSink>) {
    session.set_field(FieldId::FullName, "Amara Obi");
    session.set_field(FieldId::Email, "amara@example.com");
    session.set_field(FieldId::Phone, "+1 555 0100");
    session.set_field(FieldId::CountryOfResidence, "Nigeria");
}

fn choose_goal(session: &mut IntakeSession<MockGateway, MockSink>, goal: &str) {
    session.set_field(FieldId::PrimaryGoal, goal);
    session.goal_changed();
}

#[test]
fn visit_canada_flow_creates_one_intent_and_submits() {
    let gateway_log = GatewayLog::default();
    let sink_log = SinkLog::default();
    let mut session = new_session(
        MockGateway::new(gateway_log.clone()),
        MockSink {
            log: sink_log.clone(),
            fail: false,
        },
    );
    let mut vsink = RecordingSink::new();

    fill_contact(&mut session);
    assert_eq!(session.advance(&mut vsink).unwrap(), AdvanceEvent::Moved);

    choose_goal(&mut session, "Visit Canada");
    assert_eq!(session.controller().plan().len(), 4);
    assert_eq!(
        session.controller().pricing().unwrap().display_price(),
        "C$1,250.00"
    );

    assert_eq!(session.advance(&mut vsink).unwrap(), AdvanceEvent::Moved);
    assert_eq!(
        session.advance(&mut vsink).unwrap(),
        AdvanceEvent::PaymentReady
    );
    assert_eq!(session.controller().current_index(), 3);
    assert_eq!(session.controller().progress_percent(), 100.0);

    let creates = gateway_log.create_calls.borrow();
    assert_eq!(creates.len(), 1, "intent created exactly once");
    assert_eq!(creates[0], ("Visit Canada".to_string(), 125_000));
    drop(creates);

    match session.submit().unwrap() {
        SubmitOutcome::Completed(record) => {
            assert_eq!(record.service_type, "Visit Canada");
            assert_eq!(record.fee_paid, "C$1,250.00");
            assert_eq!(record.payment_status, "Paid");
        }
        other => panic!("unexpected outcome: {other:?}"),
    }

    assert_eq!(*gateway_log.confirm_calls.borrow(), 1);
    let records = sink_log.records.borrow();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].full_name, "Amara Obi");
    assert_eq!(records[0].education_level, "", "skipped steps stay empty");
}

#[test]
fn validation_blocks_advance_until_fields_are_filled() {
    let mut session = new_session(
        MockGateway::new(GatewayLog::default()),
        MockSink {
            log: SinkLog::default(),
            fail: false,
        },
    );
    let mut vsink = RecordingSink::new();

    assert_eq!(session.advance(&mut vsink).unwrap(), AdvanceEvent::Blocked);
    assert_eq!(session.controller().current_index(), 0);
    assert_eq!(vsink.reports.len(), 1);
    assert_eq!(vsink.reports[0].0, FieldId::FullName);
    assert!(vsink.reports[0].1.contains("Full Name"));

    fill_contact(&mut session);
    assert_eq!(session.advance(&mut vsink).unwrap(), AdvanceEvent::Moved);
}

#[test]
fn goal_change_deep_in_the_form_preserves_the_cursor() {
    let mut session = new_session(
        MockGateway::new(GatewayLog::default()),
        MockSink {
            log: SinkLog::default(),
            fail: false,
        },
    );
    let mut vsink = RecordingSink::new();

    fill_contact(&mut session);
    session.advance(&mut vsink).unwrap();
    choose_goal(&mut session, "Work in Canada");
    session.advance(&mut vsink).unwrap();
    session.set_field(FieldId::EducationLevel, "Master's Degree");
    session.set_field(FieldId::FieldOfStudy, "Nursing");
    session.advance(&mut vsink).unwrap();
    session.set_field(FieldId::WorkExperience, "7+ years");
    session.set_field(FieldId::Occupation, "Registered Nurse");
    session.set_field(FieldId::MgmtExperience, "None");
    session.advance(&mut vsink).unwrap();
    assert_eq!(session.controller().current_index(), 4);

    choose_goal(&mut session, "Visit Canada");

    assert_eq!(session.controller().plan().len(), 4);
    assert_eq!(session.controller().current_index(), 4, "cursor not remapped");
    assert!(session.controller().current_step().is_none());
    assert_eq!(session.advance(&mut vsink).unwrap(), AdvanceEvent::Blocked);
}

#[test]
fn work_permit_default_plan_reaches_payment() {
    let gateway_log = GatewayLog::default();
    let mut session = new_session(
        MockGateway::new(gateway_log.clone()),
        MockSink {
            log: SinkLog::default(),
            fail: false,
        },
    );
    let mut vsink = RecordingSink::new();

    fill_contact(&mut session);
    session.advance(&mut vsink).unwrap();
    // Keep the default goal by confirming the pre-selected option.
    choose_goal(&mut session, "Work Permit");
    session.advance(&mut vsink).unwrap();
    session.set_field(FieldId::EducationLevel, "College Diploma");
    session.set_field(FieldId::FieldOfStudy, "Welding");
    session.advance(&mut vsink).unwrap();
    session.set_field(FieldId::WorkExperience, "4-6 years");
    session.set_field(FieldId::Occupation, "Welder");
    session.set_field(FieldId::MgmtExperience, "None");
    session.advance(&mut vsink).unwrap();
    session.set_field(FieldId::ProofOfFunds, "C$10,000 - C$25,000");
    session.set_field(FieldId::NetWorth, "Under C$100,000");
    session.advance(&mut vsink).unwrap();
    assert_eq!(
        session.advance(&mut vsink).unwrap(),
        AdvanceEvent::PaymentReady
    );

    let creates = gateway_log.create_calls.borrow();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0], ("Work Permit".to_string(), 250_000));
}

#[test]
fn sink_failure_after_payment_reports_success_with_support_notice() {
    let sink_log = SinkLog::default();
    let mut session = new_session(
        MockGateway::new(GatewayLog::default()),
        MockSink {
            log: sink_log.clone(),
            fail: true,
        },
    );
    let mut vsink = RecordingSink::new();

    fill_contact(&mut session);
    session.advance(&mut vsink).unwrap();
    choose_goal(&mut session, "Visit Canada");
    session.advance(&mut vsink).unwrap();
    session.advance(&mut vsink).unwrap();

    match session.submit().unwrap() {
        SubmitOutcome::CompletedWithSinkError { record, error } => {
            assert_eq!(record.payment_status, "Paid");
            assert!(error.contains("sheet quota exceeded"));
        }
        other => panic!("unexpected outcome: {other:?}"),
    }
    assert_eq!(sink_log.records.borrow().len(), 1, "record was still posted");
}

#[test]
fn declined_payment_keeps_data_and_never_reaches_the_sink() {
    let sink_log = SinkLog::default();
    let gateway = MockGateway {
        log: GatewayLog::default(),
        fail_create: false,
        fail_confirm: true,
    };
    let mut session = new_session(
        gateway,
        MockSink {
            log: sink_log.clone(),
            fail: false,
        },
    );
    let mut vsink = RecordingSink::new();

    fill_contact(&mut session);
    session.advance(&mut vsink).unwrap();
    choose_goal(&mut session, "Visit Canada");
    session.advance(&mut vsink).unwrap();
    session.advance(&mut vsink).unwrap();

    assert!(matches!(
        session.submit().unwrap(),
        SubmitOutcome::PaymentFailed(_)
    ));
    assert!(sink_log.records.borrow().is_empty());
    assert_eq!(
        session.controller().values().get(FieldId::FullName),
        "Amara Obi"
    );
}

#[test]
fn intent_creation_failure_surfaces_and_blocks_submission() {
    let gateway = MockGateway {
        log: GatewayLog::default(),
        fail_create: true,
        fail_confirm: false,
    };
    let mut session = new_session(
        gateway,
        MockSink {
            log: SinkLog::default(),
            fail: false,
        },
    );
    let mut vsink = RecordingSink::new();

    fill_contact(&mut session);
    session.advance(&mut vsink).unwrap();
    choose_goal(&mut session, "Visit Canada");
    session.advance(&mut vsink).unwrap();

    match session.advance(&mut vsink).unwrap() {
        AdvanceEvent::PaymentInitFailed(reason) => {
            assert!(reason.contains("proxy unavailable"));
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(!session.has_intent());
    assert_eq!(session.submit().unwrap(), SubmitOutcome::NotReady);
}

#[test]
fn every_goal_prices_and_plans_consistently() {
    let expected: [(ServiceGoal, usize, &str); 6] = [
        (ServiceGoal::WorkInCanada, 8, "C$5,000.00"),
        (ServiceGoal::StudyInCanada, 7, "C$2,750.00"),
        (ServiceGoal::JoinFamily, 6, "C$5,000.00"),
        (ServiceGoal::VisitCanada, 4, "C$1,250.00"),
        (ServiceGoal::InvestOrBusiness, 7, "C$9,000.00"),
        (ServiceGoal::WorkPermit, 7, "C$2,500.00"),
    ];
    for (goal, plan_len, price) in expected {
        let mut session = new_session(
            MockGateway::new(GatewayLog::default()),
            MockSink {
                log: SinkLog::default(),
                fail: false,
            },
        );
        session.set_field(FieldId::PrimaryGoal, goal.label());
        session.goal_changed();
        assert_eq!(session.controller().plan().len(), plan_len, "plan for {goal}");
        assert_eq!(
            session.controller().pricing().unwrap().display_price(),
            price,
            "price for {goal}"
        );
    }
}
