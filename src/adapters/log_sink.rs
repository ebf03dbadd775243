//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART0 / USB-CDC in production).

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::RequestSent { attempts } => {
                info!("VERIFY | request sent (attempts={})", attempts);
            }
            AppEvent::RequestFailed { attempts } => {
                warn!("VERIFY | request undelivered (attempts={})", attempts);
            }
            AppEvent::ReplyIgnored => {
                info!("VERIFY | unrecognised reply ignored");
            }
            AppEvent::VerificationTimedOut { elapsed_ms } => {
                warn!("VERIFY | timed out after {} ms", elapsed_ms);
            }
        }
    }
}
