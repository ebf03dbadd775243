//! End-to-end scenarios for the GateService → FSM → ports pipeline.
//!
//! Each test drives the service cycle by cycle with scripted presence
//! readings and verifier traffic, then asserts on the recorded gate and
//! display calls.  The simulated clock advances 100 ms per cycle plus any
//! delay the service issues.

use crate::mock_hw::Rig;

use gatekeeper::app::events::AppEvent;
use gatekeeper::config::GateConfig;
use gatekeeper::fsm::GateState;
use gatekeeper::fsm::context::GatePosition;
use gatekeeper::link::protocol::CAR_DETECTED;

fn screen(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

/// Absent, then present: leaves the rig in AwaitingVerification with the
/// request issued at t = 100 ms.
fn arrive(rig: &mut Rig) {
    assert_eq!(rig.cycle_with(false), GateState::Idle);
    assert_eq!(rig.cycle_with(true), GateState::AwaitingVerification);
}

// ── Boot ─────────────────────────────────────────────────────

#[test]
fn boot_closes_gate_and_shows_ready() {
    let rig = Rig::new();
    assert_eq!(rig.service.state(), GateState::Idle);
    assert_eq!(rig.hw.gate_calls(), [GatePosition::Closed]);
    assert_eq!(rig.hw.screens(), [screen(&["Car Park System", "Ready"])]);
    assert_eq!(rig.sink.events, [AppEvent::Started(GateState::Idle)]);
}

// ── Full access cycle ────────────────────────────────────────

#[test]
fn granted_vehicle_passes_through_full_cycle() {
    let mut rig = Rig::new();
    arrive(&mut rig);

    rig.verifier.reply_next(b"OK ABC123\n");
    assert_eq!(rig.cycle_with(true), GateState::GateOpen);
    assert_eq!(rig.cycle_with(true), GateState::GateOpen);
    assert_eq!(rig.cycle_with(false), GateState::GateClosing);
    assert_eq!(rig.cycle(), GateState::Idle);

    assert_eq!(
        rig.state_changes(),
        [
            (GateState::Idle, GateState::AwaitingVerification),
            (GateState::AwaitingVerification, GateState::GateOpen),
            (GateState::GateOpen, GateState::GateClosing),
            (GateState::GateClosing, GateState::Idle),
        ]
    );
    assert_eq!(
        rig.hw.gate_calls(),
        [GatePosition::Closed, GatePosition::Open, GatePosition::Closed]
    );
    assert_eq!(
        rig.hw.screens(),
        [
            screen(&["Car Park System", "Ready"]),
            screen(&["Car Detected", "Checking..."]),
            screen(&["Access", "Granted"]),
            screen(&["Closing"]),
            screen(&["Ready"]),
        ]
    );
    assert_eq!(rig.verifier.sent, [CAR_DETECTED.to_vec()]);
    assert!(rig.timer.delays.contains(&1000), "closing pause must be issued");
}

#[test]
fn denied_vehicle_never_moves_gate() {
    let mut rig = Rig::new();
    arrive(&mut rig);

    rig.verifier.reply_next(b"NO\n");
    assert_eq!(rig.cycle_with(true), GateState::Idle);
    assert_eq!(rig.hw.last_screen(), Some(screen(&["Access", "Denied"])));
    assert_eq!(rig.hw.gate_calls(), [GatePosition::Closed]);

    // Still parked: no new request until the vehicle leaves and returns.
    for _ in 0..20 {
        assert_eq!(rig.cycle_with(true), GateState::Idle);
    }
    assert_eq!(rig.verifier.sent.len(), 1);

    rig.cycle_with(false);
    assert_eq!(rig.cycle_with(true), GateState::AwaitingVerification);
    assert_eq!(rig.verifier.sent.len(), 2);
}

// ── Timeout ──────────────────────────────────────────────────

#[test]
fn silent_verifier_times_out_once_without_actuation() {
    let mut rig = Rig::new();
    arrive(&mut rig);

    // Cycles 3..=51 run at t = 200..=5000 ms: elapsed < 5000.
    for cycle in 3..=51 {
        assert_eq!(
            rig.cycle_with(true),
            GateState::AwaitingVerification,
            "cycle {cycle}"
        );
    }
    // Cycle 52 at t = 5100 ms: elapsed == 5000.
    assert_eq!(rig.cycle_with(true), GateState::Idle);
    assert_eq!(rig.hw.last_screen(), Some(screen(&["Timeout"])));
    assert_eq!(
        rig.sink.events.iter().filter(|e| matches!(e, AppEvent::VerificationTimedOut { .. })).count(),
        1
    );
    assert!(
        rig.sink
            .events
            .contains(&AppEvent::VerificationTimedOut { elapsed_ms: 5000 })
    );

    for _ in 0..100 {
        assert_eq!(rig.cycle_with(true), GateState::Idle);
    }
    assert_eq!(rig.hw.gate_calls(), [GatePosition::Closed]);
    assert_eq!(rig.verifier.sent.len(), 1);
    assert_eq!(
        rig.state_changes(),
        [
            (GateState::Idle, GateState::AwaitingVerification),
            (GateState::AwaitingVerification, GateState::Idle),
        ]
    );
}

#[test]
fn valid_reply_on_deadline_cycle_wins() {
    let mut rig = Rig::new();
    arrive(&mut rig);
    for _ in 3..=51 {
        rig.cycle_with(true);
    }

    rig.verifier.reply_next(b"OK\n");
    assert_eq!(rig.cycle_with(true), GateState::GateOpen);
    assert_eq!(
        rig.sink.count(|e| matches!(e, AppEvent::VerificationTimedOut { .. })),
        0
    );
}

#[test]
fn deadline_survives_clock_wrap() {
    let mut rig = Rig::with_config(GateConfig::default(), u32::MAX - 2000);
    arrive(&mut rig);
    for _ in 3..=51 {
        assert_eq!(rig.cycle_with(true), GateState::AwaitingVerification);
    }
    assert_eq!(rig.cycle_with(true), GateState::Idle);
}

#[test]
fn shorter_configured_deadline() {
    let config = GateConfig {
        verify_timeout_ms: 1000,
        ..GateConfig::default()
    };
    let mut rig = Rig::with_config(config, 0);
    arrive(&mut rig);
    for _ in 3..=11 {
        assert_eq!(rig.cycle_with(true), GateState::AwaitingVerification);
    }
    assert_eq!(rig.cycle_with(true), GateState::Idle);
}

// ── Reply handling ───────────────────────────────────────────

#[test]
fn unrecognised_reply_is_shown_and_ignored() {
    let mut rig = Rig::new();
    arrive(&mut rig);

    rig.verifier.reply_next(b"XYZ\r\n");
    assert_eq!(rig.cycle_with(true), GateState::AwaitingVerification);
    assert_eq!(
        rig.hw.last_screen(),
        Some(screen(&["Car Detected", "Checking...", "XYZ"]))
    );
    assert_eq!(rig.sink.count(|e| *e == AppEvent::ReplyIgnored), 1);

    rig.verifier.reply_next(b"ok\n");
    assert_eq!(rig.cycle_with(true), GateState::AwaitingVerification);

    rig.verifier.reply_next(b"OK\n");
    assert_eq!(rig.cycle_with(true), GateState::GateOpen);
}

#[test]
fn reply_while_idle_is_discarded() {
    let mut rig = Rig::new();

    rig.verifier.reply_next(b"OK\n");
    assert_eq!(rig.cycle_with(false), GateState::Idle);

    // A reply landing on the arrival cycle predates the request.
    rig.verifier.reply_next(b"OK\n");
    assert_eq!(rig.cycle_with(true), GateState::AwaitingVerification);
    assert_eq!(rig.cycle_with(true), GateState::AwaitingVerification);

    assert_eq!(rig.hw.gate_calls(), [GatePosition::Closed]);
}

#[test]
fn receive_is_bounded_every_cycle() {
    let mut rig = Rig::new();
    arrive(&mut rig);
    rig.cycle();
    assert_eq!(rig.verifier.receive_timeouts, [100, 100, 100]);
}

// ── Request retries ──────────────────────────────────────────

#[test]
fn request_retries_after_failed_attempts() {
    let mut rig = Rig::new();
    rig.verifier.fail_sends(2);
    arrive(&mut rig);

    assert_eq!(rig.verifier.send_attempts, 3);
    assert_eq!(rig.verifier.sent, [CAR_DETECTED.to_vec()]);
    assert_eq!(rig.timer.delays, [20, 20]);
    assert!(rig.sink.events.contains(&AppEvent::RequestSent { attempts: 3 }));
}

#[test]
fn exhausted_retries_still_await_reply() {
    let mut rig = Rig::new();
    rig.verifier.fail_sends(5);
    arrive(&mut rig);

    assert_eq!(rig.verifier.send_attempts, 5);
    assert!(rig.verifier.sent.is_empty());
    assert_eq!(rig.timer.delays, [20, 20, 20, 20]);
    assert!(rig.sink.events.contains(&AppEvent::RequestFailed { attempts: 5 }));

    rig.verifier.reply_next(b"OK\n");
    assert_eq!(rig.cycle_with(true), GateState::GateOpen);
}

// ── Presence edges ───────────────────────────────────────────

#[test]
fn presence_changes_while_awaiting_are_not_observed() {
    let mut rig = Rig::new();
    arrive(&mut rig);

    assert_eq!(rig.cycle_with(false), GateState::AwaitingVerification);
    assert_eq!(rig.cycle_with(true), GateState::AwaitingVerification);
    assert_eq!(rig.verifier.sent.len(), 1);
    assert_eq!(rig.service.request().map(|r| r.issued_at_ms), Some(100));
}

#[test]
fn gate_stays_open_while_vehicle_present() {
    let mut rig = Rig::new();
    arrive(&mut rig);
    rig.verifier.reply_next(b"OK\n");
    rig.cycle_with(true);

    for _ in 0..50 {
        assert_eq!(rig.cycle_with(true), GateState::GateOpen);
    }
    assert_eq!(
        rig.hw.gate_calls(),
        [GatePosition::Closed, GatePosition::Open]
    );
}

#[test]
fn single_cycle_glitch_triggers_request() {
    let mut rig = Rig::new();
    rig.cycle_with(false);
    assert_eq!(rig.cycle_with(true), GateState::AwaitingVerification);
    rig.cycle_with(false);
    assert_eq!(rig.verifier.sent.len(), 1);
}
