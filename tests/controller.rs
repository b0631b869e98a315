//! Tests for run ownership: start, stop, toggle and emergency stop.
mod common;
use common::*;
use macrobot::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_start_then_stop_interrupts_delay() {
    let backend = Arc::new(RecordingBackend::sleeping());
    let controller = controller(Arc::clone(&backend));

    let action = controller
        .start(Arc::new(delayed_click_document("start")))
        .unwrap();
    assert_eq!(action, ControlAction::Started);
    assert!(controller.is_running());
    assert_eq!(controller.active_start_node().as_deref(), Some("start"));

    thread::sleep(Duration::from_millis(150));
    let stopped_at = Instant::now();
    assert!(controller.stop());

    let outcome = controller.wait().unwrap();
    assert_eq!(outcome, Some(RunOutcome::Stopped));
    assert!(stopped_at.elapsed() < Duration::from_millis(150));
    assert!(backend.effects().is_empty());
    assert!(!controller.is_running());
}

#[test]
fn test_run_to_completion() {
    let backend = Arc::new(RecordingBackend::new());
    let controller = controller(Arc::clone(&backend));

    controller
        .start(Arc::new(delayed_click_document("start")))
        .unwrap();
    assert_eq!(controller.wait().unwrap(), Some(RunOutcome::Completed));
    assert_eq!(backend.effects(), vec![Action::Click(MouseButton::Left, false)]);
    assert_eq!(controller.active_start_node(), None);
}

#[test]
fn test_toggle_same_document_stops_it() {
    let backend = Arc::new(RecordingBackend::sleeping());
    let controller = controller(Arc::clone(&backend));
    let doc = Arc::new(delayed_click_document("start"));

    assert_eq!(controller.toggle(Arc::clone(&doc)).unwrap(), ControlAction::Started);
    thread::sleep(Duration::from_millis(50));
    assert_eq!(controller.toggle(Arc::clone(&doc)).unwrap(), ControlAction::Stopped);

    assert_eq!(controller.wait().unwrap(), Some(RunOutcome::Stopped));
    assert!(backend.effects().is_empty());
}

#[test]
fn test_toggle_different_document_is_refused() {
    let backend = Arc::new(RecordingBackend::sleeping());
    let controller = controller(Arc::clone(&backend));

    controller
        .toggle(Arc::new(delayed_click_document("first")))
        .unwrap();
    let action = controller
        .toggle(Arc::new(delayed_click_document("second")))
        .unwrap();

    assert_eq!(
        action,
        ControlAction::Refused {
            active_start_node: "first".to_string()
        }
    );
    // The active run was not interrupted.
    assert_eq!(controller.active_start_node().as_deref(), Some("first"));
    assert_eq!(controller.wait().unwrap(), Some(RunOutcome::Completed));
    assert_eq!(backend.effects(), vec![Action::Click(MouseButton::Left, false)]);
}

#[test]
fn test_toggle_other_document_with_same_start_id_is_refused() {
    // Separately edited macros all number their first node `node-0`.
    let backend = Arc::new(RecordingBackend::sleeping());
    let controller = controller(Arc::clone(&backend));
    let first = Arc::new(delayed_click_document("node-0"));
    let second = Arc::new(document(
        vec![start("node-0"), Node::new("node-1", NodeKind::KeyPress).with_value("Key", "a")],
        chain(&["node-0", "node-1"]),
        "node-0",
    ));

    assert_eq!(controller.toggle(Arc::clone(&first)).unwrap(), ControlAction::Started);
    assert_eq!(
        controller.toggle(second).unwrap(),
        ControlAction::Refused {
            active_start_node: "node-0".to_string()
        }
    );

    // A rebuilt copy of the same macro is a different document as well.
    let rebuilt = Arc::new(delayed_click_document("node-0"));
    assert!(matches!(
        controller.toggle(rebuilt).unwrap(),
        ControlAction::Refused { .. }
    ));

    assert_eq!(controller.wait().unwrap(), Some(RunOutcome::Completed));
    assert_eq!(backend.effects(), vec![Action::Click(MouseButton::Left, false)]);
}

#[test]
fn test_toggle_clone_of_active_document_stops_it() {
    let backend = Arc::new(RecordingBackend::sleeping());
    let controller = controller(Arc::clone(&backend));
    let doc = delayed_click_document("start");

    controller.toggle(Arc::new(doc.clone())).unwrap();
    assert_eq!(controller.toggle(Arc::new(doc)).unwrap(), ControlAction::Stopped);
    assert_eq!(controller.wait().unwrap(), Some(RunOutcome::Stopped));
}

#[test]
fn test_start_while_running_is_refused() {
    let backend = Arc::new(RecordingBackend::sleeping());
    let controller = controller(Arc::clone(&backend));
    let doc = Arc::new(delayed_click_document("start"));

    controller.start(Arc::clone(&doc)).unwrap();
    assert!(matches!(
        controller.start(Arc::clone(&doc)).unwrap(),
        ControlAction::Refused { .. }
    ));

    controller.stop();
    controller.wait().unwrap();
}

#[test]
fn test_restart_after_finish() {
    let backend = Arc::new(RecordingBackend::new());
    let controller = controller(Arc::clone(&backend));
    let doc = Arc::new(delayed_click_document("start"));

    controller.start(Arc::clone(&doc)).unwrap();
    while controller.is_running() {
        thread::sleep(Duration::from_millis(5));
    }
    // The finished run does not block a new one.
    assert_eq!(controller.toggle(Arc::clone(&doc)).unwrap(), ControlAction::Started);
    assert_eq!(controller.wait().unwrap(), Some(RunOutcome::Completed));
    assert_eq!(backend.effects().len(), 2);
}

#[test]
fn test_emergency_stop() {
    let backend = Arc::new(RecordingBackend::sleeping());
    let controller = controller(Arc::clone(&backend));

    controller
        .start(Arc::new(delayed_click_document("start")))
        .unwrap();
    thread::sleep(Duration::from_millis(30));
    controller.emergency_stop();

    assert_eq!(controller.wait().unwrap(), Some(RunOutcome::Stopped));
    assert!(backend.effects().is_empty());
}

#[test]
fn test_stop_and_wait_when_idle() {
    let controller = controller(Arc::new(RecordingBackend::new()));
    assert!(!controller.stop());
    controller.emergency_stop();
    assert!(!controller.is_running());
    assert_eq!(controller.wait().unwrap(), None);
}

#[test]
fn test_fault_is_reported_by_wait() {
    let backend = Arc::new(RecordingBackend::failing_clicks());
    let controller = controller(Arc::clone(&backend));

    controller
        .start(Arc::new(delayed_click_document("start")))
        .unwrap();
    match controller.wait() {
        Err(ControllerError::Fault(fault)) => assert_eq!(fault.node_id, "start_click"),
        other => panic!("expected a node fault, got {:?}", other),
    }
    // The fault releases the controller.
    assert!(!controller.is_running());
}

#[test]
fn test_concurrent_toggles_start_one_run() {
    let backend = Arc::new(RecordingBackend::sleeping());
    let controller = Arc::new(controller(Arc::clone(&backend)));

    let handles: Vec<_> = ["a", "b", "c", "d"]
        .into_iter()
        .map(|id| {
            let controller = Arc::clone(&controller);
            let doc = Arc::new(delayed_click_document(id));
            thread::spawn(move || controller.toggle(doc).unwrap())
        })
        .collect();
    let actions: Vec<ControlAction> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let started = actions
        .iter()
        .filter(|a| **a == ControlAction::Started)
        .count();
    assert_eq!(started, 1, "{:?}", actions);

    controller.stop();
    assert_eq!(controller.wait().unwrap(), Some(RunOutcome::Stopped));
}
