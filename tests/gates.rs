//! Sliding-window behaviour of the attempt gates.
//! Run with: `cargo test --features mocks --test gates`

#![cfg(feature = "mocks")]
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use chrono::Duration;
use portcullis::gate::registry::{EMAIL_VERIFICATION, LOGIN, PASSWORD_RESET, REGISTRATION};
use portcullis::{
    AttemptGate, FileStore, GateConfig, GateRegistry, InMemoryStore, KeyValueStore, MockClock,
    PortcullisConfig,
};

fn login_gate(store: Arc<dyn KeyValueStore>, clock: Arc<MockClock>) -> AttemptGate {
    AttemptGate::with_clock(
        "login",
        GateConfig::new(5, Duration::minutes(15)).storage_key("app:login"),
        store,
        clock,
    )
    .unwrap()
}

// =============================================================================
// Window arithmetic
// =============================================================================

#[test]
fn five_attempts_block_until_the_window_passes() {
    let clock = Arc::new(MockClock::new());
    let gate = login_gate(Arc::new(InMemoryStore::new()), clock.clone());

    for _ in 0..5 {
        assert!(gate.record_attempt(Some("a@x.com")));
    }

    clock.advance(Duration::minutes(1));
    let status = gate.check_limit(Some("a@x.com"));
    assert!(!status.allowed);
    assert_eq!(status.remaining_attempts, 0);
    assert_eq!(status.reset_in_formatted, "14m 0s");

    clock.advance(Duration::minutes(15));
    let status = gate.check_limit(Some("a@x.com"));
    assert!(status.allowed);
    assert_eq!(status.remaining_attempts, 5);
}

#[test]
fn attempts_spread_inside_the_window_still_block() {
    let clock = Arc::new(MockClock::new());
    let gate = login_gate(Arc::new(InMemoryStore::new()), clock.clone());

    // just under the window between each attempt, but all five inside it
    for _ in 0..5 {
        gate.record_attempt(Some("a@x.com"));
        clock.advance(Duration::minutes(2) + Duration::seconds(59));
    }

    assert!(!gate.check_limit(Some("a@x.com")).allowed);
}

#[test]
fn burst_across_a_minute_boundary_is_not_doubled() {
    let clock = Arc::new(MockClock::new());
    let gate = AttemptGate::with_clock(
        "api",
        GateConfig::per_minute(3).storage_key("app:api"),
        Arc::new(InMemoryStore::new()),
        clock.clone(),
    )
    .unwrap();

    for _ in 0..3 {
        gate.record_attempt(None);
    }

    // a fixed bucket would have reset by now; the sliding window has not
    clock.advance(Duration::seconds(50));
    assert!(!gate.check_limit(None).allowed);

    clock.advance(Duration::seconds(11));
    assert!(gate.check_limit(None).allowed);
}

#[test]
fn reset_countdown_reaches_now() {
    let clock = Arc::new(MockClock::new());
    let gate = login_gate(Arc::new(InMemoryStore::new()), clock.clone());

    for _ in 0..5 {
        gate.record_attempt(Some("a@x.com"));
    }

    let mut seen = Vec::new();
    for _ in 0..16 {
        let status = gate.check_limit(Some("a@x.com"));
        seen.push((status.reset_in, status.reset_in_formatted));
        clock.advance(Duration::minutes(1));
    }

    assert!(seen.windows(2).all(|pair| pair[1].0 <= pair[0].0));
    assert_eq!(seen[0].1, "15m 0s");
    assert_eq!(seen[15].1, "now");
}

// =============================================================================
// Isolation and persistence
// =============================================================================

#[test]
fn gates_never_influence_each_other() {
    let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let registry = GateRegistry::standard(store).unwrap();

    for _ in 0..10 {
        registry.record(PASSWORD_RESET, Some("a@x.com")).unwrap();
    }

    assert!(!registry.check(PASSWORD_RESET, Some("a@x.com")).unwrap().allowed);
    for name in [LOGIN, REGISTRATION, EMAIL_VERIFICATION] {
        let status = registry.check(name, Some("a@x.com")).unwrap();
        assert!(status.allowed, "{name} was affected");
    }
}

#[test]
fn attempts_survive_a_reload() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(MockClock::new());

    {
        let store = Arc::new(FileStore::new(dir.path()).unwrap());
        let gate = login_gate(store, clock.clone());
        for _ in 0..5 {
            gate.record_attempt(Some("a@x.com"));
        }
    }

    let store = Arc::new(FileStore::new(dir.path()).unwrap());
    let gate = login_gate(store, clock.clone());
    assert!(!gate.check_limit(Some("a@x.com")).allowed);
}

#[test]
fn namespaced_registries_keep_separate_counters() {
    let store: Arc<dyn KeyValueStore> = Arc::new(InMemoryStore::new());
    let clock = Arc::new(MockClock::new());

    let profile = |name: &str| {
        let config = PortcullisConfig {
            namespace: Some(name.to_owned()),
            ..PortcullisConfig::default()
        };
        GateRegistry::from_config_with_clock(Arc::clone(&store), &config, clock.clone()).unwrap()
    };

    let alice = profile("alice");
    let bob = profile("bob");

    for _ in 0..5 {
        alice.record(LOGIN, Some("shared@x.com")).unwrap();
    }

    assert!(!alice.check(LOGIN, Some("shared@x.com")).unwrap().allowed);
    assert!(bob.check(LOGIN, Some("shared@x.com")).unwrap().allowed);
}

#[test]
fn full_store_fails_open() {
    let clock = Arc::new(MockClock::new());
    let gate = login_gate(Arc::new(InMemoryStore::with_quota(64)), clock);

    let mut recorded = 0;
    for _ in 0..10 {
        if gate.record_attempt(Some("a@x.com")) {
            recorded += 1;
        }
    }

    assert!(recorded < 5);
    assert!(gate.check_limit(Some("a@x.com")).allowed);
}
