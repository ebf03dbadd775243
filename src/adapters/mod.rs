//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                  |
//! |------------|---------------|------------------------------|
//! | `hardware` | PresencePort  | GPIO presence input          |
//! |            | GatePort      | LEDC PWM servo               |
//! |            | DisplayPort   | SSD1306 over I2C             |
//! | `log_sink` | EventSink     | Serial log output            |
//! | `time`     | Clock         | ESP32 system timer           |
//! |            | DelayNs       | FreeRTOS delays              |
//!
//! The `VerifierPort` adapter lives with the protocol in
//! [`crate::link::channel`].

pub mod hardware;
pub mod log_sink;
pub mod time;
