//! One-shot hardware peripheral initialization.
//!
//! Configures the presence input and the servo LEDC timer/channel using
//! raw ESP-IDF sys calls. Called once from `main()` before the control
//! loop starts.  The UART and I2C drivers are owned objects built in
//! `main()` from the peripheral singletons.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

use crate::config::GateConfig;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed,
    UartInitFailed(i32),
    DisplayInitFailed,
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed       => write!(f, "LEDC timer/channel config failed"),
            Self::UartInitFailed(rc)   => write!(f, "UART driver install failed (rc={})", rc),
            Self::DisplayInitFailed    => write!(f, "SSD1306 panel init failed"),
        }
    }
}

#[cfg(target_os = "espidf")]
use log::info;

#[cfg(target_os = "espidf")]
use crate::pins;

#[cfg(target_os = "espidf")]
pub fn init_peripherals(config: &GateConfig) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_gpio_inputs()?;
        init_ledc(config)?;
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(config: &GateConfig) -> Result<(), HwInitError> {
    log::info!(
        "hw_init(sim): peripheral init skipped (servo {} Hz)",
        servo_freq_hz(config)
    );
    Ok(())
}

/// LEDC timer frequency for the configured servo period.
pub fn servo_freq_hz(config: &GateConfig) -> u32 {
    1_000_000 / config.servo_period_us.max(1)
}

// ── GPIO Inputs ───────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_gpio_inputs() -> Result<(), HwInitError> {
    // Sensor output is push-pull; pull-down keeps a disconnected sensor
    // reading as "no vehicle".
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::PRESENCE_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_ENABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 { return Err(HwInitError::GpioConfigFailed(ret)); }

    info!("hw_init: presence input on GPIO{}", pins::PRESENCE_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_read(pin: i32) -> bool {
    // SAFETY: gpio_get_level is a read-only register access on an
    // already-configured input pin; safe to call from main context.
    (unsafe { gpio_get_level(pin) }) != 0
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_read(_pin: i32) -> bool {
    sim::presence()
}

// ── LEDC PWM ─────────────────────────────────────────────────

/// Duty resolution of the servo timer.
pub const SERVO_DUTY_BITS: u32 = 14;
/// Full-scale duty value at [`SERVO_DUTY_BITS`].
pub const SERVO_DUTY_MAX: u32 = (1 << SERVO_DUTY_BITS) - 1;

pub const LEDC_CH_SERVO: u32 = 0;

#[cfg(target_os = "espidf")]
unsafe fn init_ledc(config: &GateConfig) -> Result<(), HwInitError> {
    // Timer 0: gate servo (14-bit)
    // SAFETY: Called from single main-task context via init_peripherals().
    let timer0 = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_14_BIT,
        freq_hz: servo_freq_hz(config),
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    if unsafe { ledc_timer_config(&timer0) } != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed);
    }

    // Channel 0: servo signal, idle low until the first set_gate()
    let ret = unsafe { ledc_channel_config(&ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel: LEDC_CH_SERVO,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        gpio_num: pins::SERVO_PWM_GPIO,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    }) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::LedcInitFailed);
    }

    info!(
        "hw_init: LEDC configured (servo=CH0 on GPIO{}, {} Hz)",
        pins::SERVO_PWM_GPIO,
        servo_freq_hz(config)
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn ledc_set_duty(channel: u32, duty: u32) {
    // SAFETY: LEDC channels were configured in init_ledc(); duty register
    // writes are race-free since only the main loop calls this function.
    unsafe {
        esp_idf_svc::sys::ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty);
        esp_idf_svc::sys::ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set_duty(_channel: u32, _duty: u32) {}

// ── Presence input pin ────────────────────────────────────────

/// `embedded_hal` view of a raw, already-configured input GPIO.
pub struct GpioInput {
    gpio: i32,
}

impl GpioInput {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }
}

impl embedded_hal::digital::ErrorType for GpioInput {
    type Error = core::convert::Infallible;
}

impl embedded_hal::digital::InputPin for GpioInput {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(gpio_read(self.gpio))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!gpio_read(self.gpio))
    }
}

// ── Host simulation ───────────────────────────────────────────

/// In-memory stand-in for the presence line.
#[cfg(not(target_os = "espidf"))]
pub mod sim {
    use core::sync::atomic::{AtomicBool, Ordering};

    static PRESENCE: AtomicBool = AtomicBool::new(false);

    pub fn set_presence(present: bool) {
        PRESENCE.store(present, Ordering::Relaxed);
    }

    pub fn presence() -> bool {
        PRESENCE.load(Ordering::Relaxed)
    }
}
