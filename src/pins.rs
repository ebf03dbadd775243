//! GPIO / peripheral pin assignments for the gate controller board
//! (ESP32-S3 DevKitC).
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Vehicle presence sensor
// ---------------------------------------------------------------------------

/// Digital input: HIGH while a vehicle occupies the bay.
pub const PRESENCE_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Gate barrier servo
// ---------------------------------------------------------------------------

/// LEDC PWM output to the servo signal line.
pub const SERVO_PWM_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Verifier link (UART1, 115200 8-N-1)
// ---------------------------------------------------------------------------

pub const VERIFIER_UART_TX_GPIO: i32 = 17;
pub const VERIFIER_UART_RX_GPIO: i32 = 18;

// ---------------------------------------------------------------------------
// Status panel (SSD1306 on I2C0)
// ---------------------------------------------------------------------------

pub const DISPLAY_I2C_SDA_GPIO: i32 = 8;
pub const DISPLAY_I2C_SCL_GPIO: i32 = 9;
/// I2C bus clock for the panel.
pub const DISPLAY_I2C_FREQ_HZ: u32 = 400_000;
