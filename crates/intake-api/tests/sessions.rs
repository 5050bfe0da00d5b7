use jiff::{SignedDuration, Timestamp};
use uuid::Uuid;

use intake_api::state::Sessions;
use intake_core::store::FormStore;

fn at(minutes: i64) -> Timestamp {
    Timestamp::from_second(1_718_445_600).unwrap() + SignedDuration::from_mins(minutes)
}

fn store() -> FormStore {
    FormStore::new(jiff::civil::date(2024, 6, 15))
}

#[test]
fn sweep_drops_only_idle_sessions() {
    let mut sessions = Sessions::new(SignedDuration::from_mins(30));
    let idle = Uuid::new_v4();
    let active = Uuid::new_v4();
    sessions.insert(idle, store(), at(0));
    sessions.insert(active, store(), at(0));

    assert!(sessions.get_mut(active, at(20)).is_some());
    assert_eq!(sessions.sweep(at(40)), 1);
    assert_eq!(sessions.len(), 1);
    assert!(sessions.get_mut(idle, at(40)).is_none());
    assert!(sessions.get_mut(active, at(40)).is_some());
}

#[test]
fn expired_session_is_gone_before_any_sweep() {
    let mut sessions = Sessions::new(SignedDuration::from_mins(30));
    let id = Uuid::new_v4();
    sessions.insert(id, store(), at(0));

    assert!(sessions.get_mut(id, at(30)).is_some());
    assert!(sessions.get_mut(id, at(61)).is_none());
    assert!(sessions.is_empty());
}

#[test]
fn removed_session_returns_its_store() {
    let mut sessions = Sessions::new(SignedDuration::from_mins(30));
    let id = Uuid::new_v4();
    sessions.insert(id, store(), at(0));

    assert!(sessions.remove(id).is_some());
    assert!(sessions.remove(id).is_none());
    assert_eq!(sessions.sweep(at(0)), 0);
}
