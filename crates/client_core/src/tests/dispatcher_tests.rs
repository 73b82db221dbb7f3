use super::*;
use crate::{
    error::{DashboardError, ErrorKind},
    test_support::{server_error, ScriptedControlPlane},
    view::MemoryView,
};
use shared::protocol::ToggleDetectionResponse;

struct Harness {
    dispatcher: CommandDispatcher,
    toggle: Arc<DetectionToggle>,
    view: Arc<MemoryView>,
    requests: Arc<tokio::sync::Mutex<Vec<ToggleDetectionRequest>>>,
    events: broadcast::Receiver<ClientEvent>,
}

fn harness(control_plane: ScriptedControlPlane, policy: TogglePolicy) -> Harness {
    let requests = control_plane.toggle_requests.clone();
    let toggle = Arc::new(DetectionToggle::default());
    let view = Arc::new(MemoryView::new());
    let (events_tx, events) = broadcast::channel(16);
    let dispatcher = CommandDispatcher::new(
        Arc::new(control_plane),
        Arc::clone(&toggle),
        view.clone(),
        events_tx,
        policy,
    );
    Harness {
        dispatcher,
        toggle,
        view,
        requests,
        events,
    }
}

fn label(view: &MemoryView) -> Option<String> {
    view.element(ElementId::ToggleDetection).text
}

#[tokio::test]
async fn click_while_running_relabels_immediately_and_sends_stop() {
    let h = harness(ScriptedControlPlane::default(), TogglePolicy::default());
    h.dispatcher.render_label();
    assert_eq!(label(&h.view).as_deref(), Some("Stop Detection"));

    let pending = h.dispatcher.toggle_detection();

    // Visible before the request has had a chance to run.
    assert_eq!(label(&h.view).as_deref(), Some("Start Detection"));
    assert!(!h.toggle.is_running());

    pending.await.expect("delivery task");
    let requests = h.requests.lock().await;
    assert_eq!(requests.as_slice(), &[ToggleDetectionRequest::new(false)]);
}

#[tokio::test]
async fn second_click_sends_start() {
    let h = harness(ScriptedControlPlane::default(), TogglePolicy::default());

    h.dispatcher.toggle_detection().await.expect("first");
    h.dispatcher.toggle_detection().await.expect("second");

    assert!(h.toggle.is_running());
    assert_eq!(label(&h.view).as_deref(), Some("Stop Detection"));
    let requests = h.requests.lock().await;
    assert_eq!(
        requests.as_slice(),
        &[
            ToggleDetectionRequest::new(false),
            ToggleDetectionRequest::new(true)
        ]
    );
}

#[tokio::test]
async fn acknowledgement_is_reported_with_server_status() {
    let mut h = harness(
        ScriptedControlPlane::with_toggles([Ok(ToggleDetectionResponse {
            status: Some("Detection stopped.".to_string()),
        })]),
        TogglePolicy::default(),
    );

    h.dispatcher.toggle_detection().await.expect("delivery");

    assert_eq!(
        h.events.recv().await.expect("sent"),
        ClientEvent::ToggleSent { running: false }
    );
    assert_eq!(
        h.events.recv().await.expect("ack"),
        ClientEvent::ToggleAcknowledged {
            running: false,
            server_status: Some("Detection stopped.".to_string()),
        }
    );
}

#[tokio::test]
async fn failed_request_keeps_optimistic_state_by_default() {
    let mut h = harness(
        ScriptedControlPlane::with_toggles([Err(server_error())]),
        TogglePolicy::default(),
    );

    h.dispatcher.toggle_detection().await.expect("delivery");

    assert!(!h.toggle.is_running());
    assert_eq!(label(&h.view).as_deref(), Some("Start Detection"));

    let _sent = h.events.recv().await.expect("sent");
    match h.events.recv().await.expect("diagnostic") {
        ClientEvent::Diagnostic(diagnostic) => {
            assert_eq!(diagnostic.source, DiagnosticSource::Toggle);
            assert_eq!(diagnostic.kind, ErrorKind::Protocol);
        }
        other => panic!("unexpected event: {other:?}"),
    }
    assert!(h.events.try_recv().is_err());
}

#[tokio::test]
async fn reconcile_policy_reverts_failed_toggle() {
    let mut h = harness(
        ScriptedControlPlane::with_toggles([Err(DashboardError::Unavailable)]),
        TogglePolicy {
            reconcile_on_failure: true,
        },
    );

    h.dispatcher.toggle_detection().await.expect("delivery");

    assert!(h.toggle.is_running());
    assert_eq!(label(&h.view).as_deref(), Some("Stop Detection"));

    let _sent = h.events.recv().await.expect("sent");
    let _diagnostic = h.events.recv().await.expect("diagnostic");
    assert_eq!(
        h.events.recv().await.expect("reverted"),
        ClientEvent::ToggleReverted { running: true }
    );
}

#[tokio::test]
async fn reconcile_policy_leaves_newer_local_state_alone() {
    let h = harness(
        ScriptedControlPlane::with_toggles([Err(DashboardError::Unavailable)]),
        TogglePolicy {
            reconcile_on_failure: true,
        },
    );

    let pending = h.dispatcher.toggle_detection();
    h.toggle.set(true);
    pending.await.expect("delivery");

    // The failed request carried `false`; local state moved on, so no revert.
    assert!(h.toggle.is_running());
    assert_eq!(label(&h.view).as_deref(), Some("Start Detection"));
}

#[tokio::test]
async fn reconcile_policy_ignores_failure_of_superseded_click() {
    let h = harness(
        ScriptedControlPlane::with_toggles([
            Err(DashboardError::Unavailable),
            Ok(ToggleDetectionResponse::default()),
            Ok(ToggleDetectionResponse::default()),
        ]),
        TogglePolicy {
            reconcile_on_failure: true,
        },
    );
    let mut events = h.events.resubscribe();

    // Three quick clicks send false, true, false. The first send fails only
    // after the third click, when the cell holds `false` again.
    let pending = [
        h.dispatcher.toggle_detection(),
        h.dispatcher.toggle_detection(),
        h.dispatcher.toggle_detection(),
    ];
    for handle in pending {
        handle.await.expect("delivery");
    }

    assert_eq!(
        h.requests.lock().await.as_slice(),
        &[
            ToggleDetectionRequest::new(false),
            ToggleDetectionRequest::new(true),
            ToggleDetectionRequest::new(false),
        ]
    );
    assert!(!h.toggle.is_running());
    assert_eq!(label(&h.view).as_deref(), Some("Start Detection"));
    while let Ok(event) = events.try_recv() {
        assert!(
            !matches!(event, ClientEvent::ToggleReverted { .. }),
            "unexpected revert: {event:?}"
        );
    }
}
