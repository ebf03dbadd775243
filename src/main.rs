//! Gatekeeper Firmware: Main Entry Point
//!
//! Hexagonal architecture with a fixed-rate control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          SerialVerifierChannel   SystemTimer  │
//! │  (Presence+Gate+Display)  (VerifierPort / UART1)  (Clock+Delay)│
//! │  LogEventSink (EventSink)                                      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              GateService (pure logic)                  │    │
//! │  │  Edge detector · FSM · Verifier handshake              │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use embedded_hal::delay::DelayNs;
use esp_idf_svc::hal::gpio::{AnyInputPin, AnyOutputPin};
use esp_idf_svc::hal::i2c::{I2cConfig, I2cDriver};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::hal::uart::{self, UartDriver};
use esp_idf_svc::hal::units::Hertz;
use log::info;

use gatekeeper::adapters::hardware::HardwareAdapter;
use gatekeeper::adapters::log_sink::LogEventSink;
use gatekeeper::adapters::time::SystemTimer;
use gatekeeper::app::service::GateService;
use gatekeeper::config::GateConfig;
use gatekeeper::drivers::display::StatusDisplay;
use gatekeeper::drivers::hw_init::{self, GpioInput, HwInitError};
use gatekeeper::drivers::servo::GateServo;
use gatekeeper::drivers::uart::Uart;
use gatekeeper::link::channel::SerialVerifierChannel;
use gatekeeper::pins;
use gatekeeper::sensors::presence::PresenceSensor;

type Board = HardwareAdapter<GpioInput>;
type Verifier = SerialVerifierChannel<Uart>;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Gatekeeper v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = GateConfig::default();
    config.validate()?;

    // ── 3. Initialise hardware peripherals ────────────────────
    let peripherals = Peripherals::take()?;
    let (mut hw, mut verifier) = match bring_up(peripherals, &config) {
        Ok(parts) => parts,
        Err(e) => {
            // Peripheral init failure is critical; log and halt.
            log::error!("HAL init failed: {}, halting", e);
            #[allow(clippy::empty_loop)]
            loop {}
        }
    };

    // ── 4. Start the service ──────────────────────────────────
    let mut timer = SystemTimer::new();
    let mut log_sink = LogEventSink::new();
    let mut service = GateService::new(config);
    service.start(&mut hw, &mut log_sink);

    // ── 5. Control loop ───────────────────────────────────────
    let interval_ms = service.config().control_loop_interval_ms;
    info!("Entering control loop ({} ms cycle)", interval_ms);
    loop {
        service.tick(&mut hw, &mut verifier, &mut timer, &mut log_sink);
        timer.delay_ms(interval_ms);
    }
}

/// Configure every peripheral and wrap it in its driver.
fn bring_up(peripherals: Peripherals, config: &GateConfig) -> Result<(Board, Verifier), HwInitError> {
    hw_init::init_peripherals(config)?;

    // Pin handles must match the numbers in `pins`.
    let io = peripherals.pins;
    let (uart_tx, uart_rx) = (io.gpio17, io.gpio18);
    let (sda, scl) = (io.gpio8, io.gpio9);

    let uart_config = uart::config::Config::new().baudrate(Hertz(config.uart_baud_rate));
    let uart = UartDriver::new(
        peripherals.uart1,
        uart_tx,
        uart_rx,
        AnyInputPin::none(),
        AnyOutputPin::none(),
        &uart_config,
    )
    .map_err(|e| HwInitError::UartInitFailed(e.code()))?;
    info!(
        "UART1 ready at {} baud (TX GPIO{}, RX GPIO{})",
        config.uart_baud_rate,
        pins::VERIFIER_UART_TX_GPIO,
        pins::VERIFIER_UART_RX_GPIO
    );

    let i2c_config = I2cConfig::new().baudrate(Hertz(pins::DISPLAY_I2C_FREQ_HZ));
    let i2c = I2cDriver::new(peripherals.i2c0, sda, scl, &i2c_config).map_err(|e| {
        log::error!("I2C0 init failed: {}", e);
        HwInitError::DisplayInitFailed
    })?;
    info!(
        "I2C0 ready (SDA GPIO{}, SCL GPIO{})",
        pins::DISPLAY_I2C_SDA_GPIO,
        pins::DISPLAY_I2C_SCL_GPIO
    );

    let hw = HardwareAdapter::new(
        PresenceSensor::new(GpioInput::new(pins::PRESENCE_GPIO)),
        GateServo::new(config),
        StatusDisplay::new(i2c)?,
    );
    let verifier = SerialVerifierChannel::new(Uart::new(uart), config.send_attempt_timeout_ms);

    Ok((hw, verifier))
}
