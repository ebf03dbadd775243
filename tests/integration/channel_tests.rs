//! Integration tests for the serial verifier channel, over the host UART
//! loopback, and for the full service stack built from real adapters.

use std::cell::Cell;
use std::convert::Infallible;
use std::rc::Rc;

use crate::mock_hw::{RecordingSink, SimTimer};

use gatekeeper::adapters::hardware::HardwareAdapter;
use gatekeeper::app::events::AppEvent;
use gatekeeper::app::ports::VerifierPort;
use gatekeeper::app::service::GateService;
use gatekeeper::config::GateConfig;
use gatekeeper::drivers::display::StatusDisplay;
use gatekeeper::drivers::servo::GateServo;
use gatekeeper::drivers::uart::Uart;
use gatekeeper::fsm::GateState;
use gatekeeper::fsm::context::GatePosition;
use gatekeeper::link::channel::{RetryPolicy, SerialVerifierChannel, send_with_retry};
use gatekeeper::link::protocol::CAR_DETECTED;
use gatekeeper::sensors::presence::PresenceSensor;

/// Presence line the test flips from outside the adapter.
#[derive(Clone, Default)]
struct SharedPin(Rc<Cell<bool>>);

impl embedded_hal::digital::ErrorType for SharedPin {
    type Error = Infallible;
}

impl embedded_hal::digital::InputPin for SharedPin {
    fn is_high(&mut self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&mut self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

fn channel() -> SerialVerifierChannel<Uart> {
    SerialVerifierChannel::new(Uart::new(), 100)
}

// ── Channel over UART loopback ───────────────────────────────

#[test]
fn replies_are_split_at_newlines() {
    let mut ch = channel();
    ch.link_mut().inject_rx(b"OK\nNO\n");

    assert_eq!(ch.try_receive(100).as_deref(), Some(&b"OK\n"[..]));
    assert_eq!(ch.try_receive(100).as_deref(), Some(&b"NO\n"[..]));
    assert_eq!(ch.try_receive(100), None);
}

#[test]
fn overlong_reply_is_cut_to_buffer() {
    let mut ch = channel();
    ch.link_mut().inject_rx(b"OK 0123456789ABCDEFGHIJ\n");

    let first = ch.try_receive(100).unwrap();
    assert_eq!(first.len(), 20);
    assert!(first.starts_with(b"OK "));
}

#[test]
fn retry_over_uart_delivers_once() {
    let mut ch = channel();
    let mut timer = SimTimer::starting_at(0);
    ch.link_mut().fail_next_writes(4);

    let report = send_with_retry(
        &mut ch,
        &mut timer,
        CAR_DETECTED,
        RetryPolicy {
            attempts: 5,
            backoff_ms: 20,
        },
    );

    assert!(report.delivered);
    assert_eq!(report.attempts, 5);
    assert_eq!(timer.delays, [20, 20, 20, 20]);
    assert_eq!(ch.link_mut().take_tx(), CAR_DETECTED);
}

// ── Full stack with real adapters ────────────────────────────

#[test]
fn real_adapters_complete_access_cycle() {
    let config = GateConfig::default();
    let line = SharedPin::default();
    let mut hw = HardwareAdapter::new(
        PresenceSensor::new(line.clone()),
        GateServo::new(&config),
        StatusDisplay::new(),
    );
    let mut verifier = channel();
    let mut timer = SimTimer::starting_at(0);
    let mut sink = RecordingSink::new();
    let mut service = GateService::new(config);

    service.start(&mut hw, &mut sink);
    assert_eq!(hw.servo().position(), Some(GatePosition::Closed));

    let mut step = |present: bool,
                    hw: &mut HardwareAdapter<SharedPin>,
                    verifier: &mut SerialVerifierChannel<Uart>,
                    timer: &mut SimTimer,
                    sink: &mut RecordingSink| {
        line.0.set(present);
        service.tick(hw, verifier, timer, sink);
        timer.advance(100);
        service.state()
    };

    assert_eq!(step(true, &mut hw, &mut verifier, &mut timer, &mut sink), GateState::AwaitingVerification);
    assert_eq!(verifier.link_mut().take_tx(), CAR_DETECTED);
    assert_eq!(
        hw.display().lines().collect::<Vec<_>>(),
        ["Car Detected", "Checking..."]
    );

    verifier.link_mut().inject_rx(b"OK\r\n");
    assert_eq!(step(true, &mut hw, &mut verifier, &mut timer, &mut sink), GateState::GateOpen);
    assert_eq!(hw.servo().position(), Some(GatePosition::Open));

    assert_eq!(step(false, &mut hw, &mut verifier, &mut timer, &mut sink), GateState::GateClosing);
    assert_eq!(hw.servo().position(), Some(GatePosition::Closed));

    assert_eq!(step(false, &mut hw, &mut verifier, &mut timer, &mut sink), GateState::Idle);
    assert_eq!(hw.display().lines().collect::<Vec<_>>(), ["Ready"]);

    assert!(sink.events.contains(&AppEvent::RequestSent { attempts: 1 }));
}
