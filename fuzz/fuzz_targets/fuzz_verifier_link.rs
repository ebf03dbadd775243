//! Fuzz target: verifier receive path
//!
//! Pushes arbitrary inbound byte streams through the UART loopback and the
//! message channel, then through the reply parser and display sanitiser.
//! Asserts that no message exceeds the receive buffer, that framing stops
//! at the first newline, and that the displayed text stays printable.
//!
//! cargo fuzz run fuzz_verifier_link

#![no_main]

use gatekeeper::app::ports::VerifierPort;
use gatekeeper::drivers::uart::Uart;
use gatekeeper::link::channel::SerialVerifierChannel;
use gatekeeper::link::protocol::{RX_BUFFER_LEN, VerifierReply, parse_reply, printable};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut channel = SerialVerifierChannel::new(Uart::new(), 100);
    channel.link_mut().inject_rx(data);

    let mut consumed = 0usize;
    while let Some(message) = channel.try_receive(100) {
        assert!(!message.is_empty());
        assert!(message.len() <= RX_BUFFER_LEN, "message exceeds receive buffer");
        if let Some(nl) = message.iter().position(|&b| b == b'\n') {
            assert_eq!(nl, message.len() - 1, "bytes after newline in one message");
        }
        assert_eq!(&data[consumed..consumed + message.len()], &message[..]);
        consumed += message.len();

        let reply = parse_reply(&message);
        if reply == VerifierReply::Grant {
            assert!(message.starts_with(b"OK"));
        }

        let text = printable(&message);
        assert!(text.chars().all(|c| c == ' ' || c.is_ascii_graphic()));
    }
    assert_eq!(consumed, data.len(), "receive path dropped bytes");
});
