//! Integration tests for session lifecycle, queries and wire format.

use chrono::Duration;

use ovenctl::Error;
use ovenctl::session::{SessionId, SessionStatus, StartSession};

use crate::mock_hw::{Rig, start_request};

fn owned(owner: &str, target: f32) -> StartSession {
    let mut req = start_request(None, target, 1);
    req.owner = Some(owner.to_owned());
    req
}

#[test]
fn one_active_session_per_owner() {
    let rig = Rig::new();
    let first = rig.sessions.start_exclusive(owned("alice", 180.0)).unwrap();

    match rig.sessions.start_exclusive(owned("alice", 200.0)) {
        Err(Error::ConcurrentActiveSession { owner, existing }) => {
            assert_eq!(owner.as_deref(), Some("alice"));
            assert_eq!(existing, first);
        }
        other => panic!("expected a conflict, got {other:?}"),
    }

    // Another owner is unaffected.
    rig.sessions.start_exclusive(owned("bob", 200.0)).unwrap();

    // Once finished, the owner may start again.
    rig.sessions.complete(first).unwrap();
    rig.sessions.start_exclusive(owned("alice", 160.0)).unwrap();
}

#[test]
fn active_lookup_prefers_newest_start() {
    let rig = Rig::new();
    let older = rig.sessions.start(start_request(None, 180.0, 1)).unwrap();
    rig.clock.advance(Duration::seconds(30));
    let newer = rig.sessions.start(start_request(None, 200.0, 1)).unwrap();

    assert_eq!(rig.sessions.get_active(None).unwrap().unwrap().id, newer);

    rig.sessions.pause(newer).unwrap();
    assert_eq!(rig.sessions.get_active(None).unwrap().unwrap().id, older);
}

#[test]
fn full_lifecycle_and_stats() {
    let rig = Rig::new();
    let a = rig.sessions.start(start_request(None, 180.0, 1)).unwrap();
    let b = rig.sessions.start(start_request(None, 200.0, 1)).unwrap();
    let c = rig.sessions.start(start_request(None, 220.0, 1)).unwrap();

    rig.clock.advance(Duration::minutes(20));
    rig.sessions.complete(a).unwrap();
    rig.sessions.pause(b).unwrap();
    rig.clock.advance(Duration::minutes(10));
    rig.sessions.cancel(b).unwrap();

    let stats = rig.sessions.stats().unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.active, 1);
    assert_eq!(stats.completed, 1);
    assert_eq!(stats.cancelled, 1);
    assert_eq!(stats.total_cook_secs, 20 * 60 + 30 * 60);

    // Terminal sessions refuse every further action.
    for res in [
        rig.sessions.pause(a),
        rig.sessions.resume(a),
        rig.sessions.complete(a),
        rig.sessions.cancel(a),
    ] {
        assert!(matches!(
            res,
            Err(Error::InvalidTransition { from: SessionStatus::Completed, .. })
        ));
    }
    assert!(rig.sessions.get(c).unwrap().end_time.is_none());
}

#[test]
fn list_is_newest_first_and_limited() {
    let rig = Rig::new();
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(rig.sessions.start(start_request(None, 150.0 + i as f32, 1)).unwrap());
        rig.clock.advance(Duration::seconds(1));
    }
    rig.sessions.cancel(ids[1]).unwrap();

    let listed: Vec<SessionId> = rig
        .sessions
        .list(None, Some(3))
        .unwrap()
        .into_iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(listed, vec![ids[4], ids[3], ids[2]]);

    let active = rig.sessions.list(Some(SessionStatus::Active), None).unwrap();
    assert_eq!(active.len(), 4);
    assert!(active.iter().all(|s| s.status == SessionStatus::Active));
}

#[test]
fn operations_on_unknown_session_report_not_found() {
    let rig = Rig::new();
    let ghost = SessionId(404);
    assert!(matches!(rig.sessions.get(ghost), Err(Error::NotFound(id)) if id == ghost));
    assert!(matches!(rig.sessions.pause(ghost), Err(Error::NotFound(_))));
    assert!(matches!(rig.sessions.advance_phase(ghost), Err(Error::NotFound(_))));
}

#[test]
fn session_serialises_with_camel_case_fields() {
    let rig = Rig::new();
    let id = rig.sessions.start(start_request(Some("bread"), 250.0, 3)).unwrap();
    let json = serde_json::to_value(rig.sessions.get(id).unwrap()).unwrap();

    assert_eq!(json["recipeId"], "bread");
    assert_eq!(json["targetTemp"], 250.0);
    assert_eq!(json["totalPhases"], 3);
    assert_eq!(json["currentPhase"], 0);
    assert_eq!(json["status"], "active");
    assert_eq!(json["mode"], "timer");
    assert!(json["endTime"].is_null());
}
