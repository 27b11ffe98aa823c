//! FSM unit tests

use extdeploy::deploy::fsm::{DeploymentFsm, TargetEvent, TargetState};

#[test]
fn test_fsm_initial_state() {
    let fsm = DeploymentFsm::new();
    assert_eq!(fsm.state(), TargetState::Pending);
    assert!(fsm.error().is_none());
    assert!(fsm.failed_at().is_none());
}

#[test]
fn test_fsm_deploy_success_flow() {
    let mut fsm = DeploymentFsm::new();

    // Pending -> Checked
    fsm.process(TargetEvent::Checked).unwrap();
    assert_eq!(fsm.state(), TargetState::Checked);

    // Checked -> Submitted -> Polling
    fsm.process(TargetEvent::Submitted).unwrap();
    fsm.process(TargetEvent::PollStarted).unwrap();
    assert_eq!(fsm.state(), TargetState::Polling);

    // Polling -> Trusting -> Done
    fsm.process(TargetEvent::TaskSucceeded).unwrap();
    fsm.process(TargetEvent::Trusted).unwrap();
    assert_eq!(fsm.state(), TargetState::Done);
    assert!(fsm.state().is_terminal());
}

#[test]
fn test_fsm_failure_records_stage() {
    let mut fsm = DeploymentFsm::new();

    fsm.process(TargetEvent::Checked).unwrap();
    fsm.process(TargetEvent::Submitted).unwrap();
    fsm.process(TargetEvent::PollStarted).unwrap();
    fsm.process(TargetEvent::Fail("task t1 failed".to_string()))
        .unwrap();

    assert_eq!(fsm.state(), TargetState::Failed);
    assert_eq!(fsm.error(), Some("task t1 failed"));
    assert_eq!(fsm.failed_at(), Some(TargetState::Polling));
}

#[test]
fn test_fsm_failure_from_pending() {
    let mut fsm = DeploymentFsm::new();
    fsm.process(TargetEvent::Fail("lookup failed".to_string()))
        .unwrap();
    assert_eq!(fsm.failed_at(), Some(TargetState::Pending));
}

#[test]
fn test_fsm_terminal_states_are_final() {
    let mut fsm = DeploymentFsm::new();
    fsm.process(TargetEvent::Fail("boom".to_string())).unwrap();

    assert!(fsm.process(TargetEvent::Checked).is_err());
    assert!(fsm.process(TargetEvent::Fail("again".to_string())).is_err());
    assert_eq!(fsm.error(), Some("boom"));
}

#[test]
fn test_fsm_invalid_transition() {
    let mut fsm = DeploymentFsm::new();

    // Cannot trust before the task finished
    let result = fsm.process(TargetEvent::Trusted);
    assert!(result.is_err());
    assert_eq!(fsm.state(), TargetState::Pending);

    // Cannot skip the lookup
    assert!(fsm.process(TargetEvent::Submitted).is_err());
}
