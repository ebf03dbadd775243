//! Verifier UART (115200 8-N-1).
//!
//! Implements [`SerialLink`] with bounded blocking calls only.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: wraps an `esp-idf-hal` `UartDriver`; millisecond bounds are
//! converted to FreeRTOS ticks, rounding up.
//! On host/test: an in-memory loopback where tests inject inbound bytes and
//! collect outbound ones.

use crate::error::LinkError;
use crate::link::transport::SerialLink;

#[cfg(target_os = "espidf")]
use esp_idf_svc::hal::uart::UartDriver;

#[cfg(not(target_os = "espidf"))]
use std::collections::VecDeque;

#[cfg(target_os = "espidf")]
pub struct Uart {
    driver: UartDriver<'static>,
}

#[cfg(target_os = "espidf")]
impl Uart {
    pub fn new(driver: UartDriver<'static>) -> Self {
        Self { driver }
    }
}

/// Millisecond bound to scheduler ticks, rounded up so a short non-zero
/// bound never collapses to a zero-tick poll.
pub fn ms_to_ticks(ms: u32, tick_hz: u32) -> u32 {
    let ticks = (u64::from(ms) * u64::from(tick_hz)).div_ceil(1000);
    u32::try_from(ticks).unwrap_or(u32::MAX)
}

#[cfg(target_os = "espidf")]
fn ticks(ms: u32) -> u32 {
    ms_to_ticks(ms, esp_idf_svc::sys::configTICK_RATE_HZ)
}

#[cfg(target_os = "espidf")]
impl SerialLink for Uart {
    fn write(&mut self, data: &[u8], timeout_ms: u32) -> Result<usize, LinkError> {
        let n = self.driver.write(data).map_err(|e| {
            log::debug!("uart: write failed: {}", e);
            LinkError::WriteFailed
        })?;
        self.driver
            .wait_tx_done(ticks(timeout_ms))
            .map_err(|_| LinkError::TxTimeout)?;
        Ok(n)
    }

    fn read(&mut self, buf: &mut [u8], timeout_ms: u32) -> Result<usize, LinkError> {
        self.driver.read(buf, ticks(timeout_ms)).map_err(|e| {
            log::debug!("uart: read failed: {}", e);
            LinkError::ReadFailed
        })
    }
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
pub struct Uart {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    fail_writes: usize,
}

#[cfg(not(target_os = "espidf"))]
impl Uart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if the verifier had sent them.
    pub fn inject_rx(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes);
    }

    /// Everything written so far; clears the record.
    pub fn take_tx(&mut self) -> Vec<u8> {
        core::mem::take(&mut self.tx)
    }

    /// Make the next `count` writes fail.
    pub fn fail_next_writes(&mut self, count: usize) {
        self.fail_writes = count;
    }
}

#[cfg(not(target_os = "espidf"))]
impl SerialLink for Uart {
    fn write(&mut self, data: &[u8], _timeout_ms: u32) -> Result<usize, LinkError> {
        if self.fail_writes > 0 {
            self.fail_writes -= 1;
            return Err(LinkError::WriteFailed);
        }
        self.tx.extend_from_slice(data);
        Ok(data.len())
    }

    fn read(&mut self, buf: &mut [u8], _timeout_ms: u32) -> Result<usize, LinkError> {
        let n = buf.len().min(self.rx.len());
        for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..n)) {
            *slot = byte;
        }
        Ok(n)
    }
}
