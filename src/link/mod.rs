//! # UDP Link Module
//!
//! Best-effort datagram transport between the transmitter and the
//! receiver, one control frame per packet.
//!
//! This module handles:
//! - Fire-and-forget frame sending from the transmitter
//! - Receiving datagrams with a fixed timeout on the receiver
//!
//! There is no session, handshake, sequencing or retransmission: loss
//! and reordering are expected and tolerated. The receive timeout is
//! the failsafe trigger, handled as ordinary control flow rather than
//! an error.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::UdpSocket;
use tokio::time::timeout;
use tracing::{debug, info};

use crate::error::{RcLinkError, Result};
use crate::proto::FRAME_LEN;

/// Receive buffer size.
///
/// Larger than a frame on purpose: an oversized datagram must arrive
/// intact so it can be rejected by length, not silently truncated down
/// to a plausible 8 bytes.
const RECV_BUF_LEN: usize = 64;

/// Transmitter-side frame sender.
///
/// Wraps a connected, blocking UDP socket. Sends are fire-and-forget:
/// a failed send drops that frame and the caller moves on to the next
/// input batch.
pub struct FrameSender {
    socket: std::net::UdpSocket,
    target: SocketAddr,
}

impl FrameSender {
    /// Creates a sender aimed at the receiver endpoint.
    ///
    /// Binds an ephemeral local port and connects the socket so
    /// connection-refused style errors surface on `send_frame`.
    ///
    /// # Arguments
    ///
    /// * `address` - Receiver IP address
    /// * `port` - Receiver UDP port
    ///
    /// # Errors
    ///
    /// Returns `Link` error if the socket cannot be created or the
    /// target address does not parse.
    pub fn connect(address: &str, port: u16) -> Result<Self> {
        let target: SocketAddr = format!("{}:{}", address, port)
            .parse()
            .map_err(|e| RcLinkError::Link(format!("Invalid target {}:{}: {}", address, port, e)))?;

        let socket = std::net::UdpSocket::bind("0.0.0.0:0")
            .map_err(|e| RcLinkError::Link(format!("Failed to create UDP socket: {}", e)))?;
        socket
            .connect(target)
            .map_err(|e| RcLinkError::Link(format!("Failed to connect to {}: {}", target, e)))?;

        info!("UDP sender ready, target {}", target);
        Ok(Self { socket, target })
    }

    /// Sends one control frame, fire-and-forget.
    ///
    /// # Errors
    ///
    /// Returns `Link` error if the OS rejects the send. The caller is
    /// expected to log and continue; the next frame supersedes this one.
    pub fn send_frame(&self, frame: &[u8; FRAME_LEN]) -> Result<()> {
        self.socket
            .send(frame)
            .map_err(|e| RcLinkError::Link(format!("Failed to send frame: {}", e)))?;

        debug!("Sent control frame ({} bytes)", frame.len());
        Ok(())
    }

    /// The receiver endpoint this sender is aimed at.
    pub fn target(&self) -> SocketAddr {
        self.target
    }
}

/// Receiver-side frame receiver with a fixed receive timeout.
pub struct FrameReceiver {
    socket: UdpSocket,
    recv_timeout: Duration,
}

impl FrameReceiver {
    /// Binds the receiver endpoint.
    ///
    /// # Arguments
    ///
    /// * `address` - Local IP address to bind
    /// * `port` - Local UDP port to bind
    /// * `recv_timeout` - Per-attempt receive deadline (the failsafe window)
    ///
    /// # Errors
    ///
    /// Returns `Link` error if the bind fails. Bind failure is fatal at
    /// startup; the receiver never enters its loop without a socket.
    pub async fn bind(address: &str, port: u16, recv_timeout: Duration) -> Result<Self> {
        let socket = UdpSocket::bind((address, port))
            .await
            .map_err(|e| RcLinkError::Link(format!("Failed to bind {}:{}: {}", address, port, e)))?;

        Ok(Self {
            socket,
            recv_timeout,
        })
    }

    /// Waits for the next datagram, up to the receive timeout.
    ///
    /// Returns `Ok(Some((payload, sender)))` for a received datagram,
    /// or `Ok(None)` when the window expired with nothing received -
    /// the watchdog's failsafe trigger, not an error.
    ///
    /// # Errors
    ///
    /// Returns `Link` error only for socket-level receive failures.
    pub async fn recv_frame(&self) -> Result<Option<(Vec<u8>, SocketAddr)>> {
        let mut buf = [0u8; RECV_BUF_LEN];

        match timeout(self.recv_timeout, self.socket.recv_from(&mut buf)).await {
            Ok(Ok((len, addr))) => {
                debug!("Received {} bytes from {}", len, addr);
                Ok(Some((buf[..len].to_vec(), addr)))
            }
            Ok(Err(e)) => Err(RcLinkError::Link(format!("Failed to receive: {}", e))),
            Err(_elapsed) => Ok(None),
        }
    }

    /// The locally bound address.
    ///
    /// # Errors
    ///
    /// Returns `Link` error if the socket cannot report its address.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket
            .local_addr()
            .map_err(|e| RcLinkError::Link(format!("Failed to read local address: {}", e)))
    }

    /// The configured receive timeout.
    pub fn recv_timeout(&self) -> Duration {
        self.recv_timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_TIMEOUT: Duration = Duration::from_millis(100);

    async fn local_pair() -> (FrameSender, FrameReceiver) {
        let receiver = FrameReceiver::bind("127.0.0.1", 0, TEST_TIMEOUT)
            .await
            .unwrap();
        let port = receiver.local_addr().unwrap().port();
        let sender = FrameSender::connect("127.0.0.1", port).unwrap();
        (sender, receiver)
    }

    #[test]
    fn test_connect_rejects_invalid_address() {
        let result = FrameSender::connect("not-an-address", 1337);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_send_and_receive_frame() {
        let (sender, receiver) = local_pair().await;

        let frame = [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0x00];
        sender.send_frame(&frame).unwrap();

        let received = receiver.recv_frame().await.unwrap();
        let (payload, _addr) = received.expect("Expected a datagram, got timeout");
        assert_eq!(payload, frame);
    }

    #[tokio::test]
    async fn test_recv_times_out_on_silence() {
        let receiver = FrameReceiver::bind("127.0.0.1", 0, Duration::from_millis(20))
            .await
            .unwrap();

        let outcome = receiver.recv_frame().await.unwrap();
        assert!(outcome.is_none());
    }

    #[tokio::test]
    async fn test_each_datagram_carries_one_frame() {
        let (sender, receiver) = local_pair().await;

        sender.send_frame(&[0u8; 8]).unwrap();
        sender
            .send_frame(&[0, 0, 0, 0, 0, 1, 2, 3])
            .unwrap();

        let (first, _) = receiver.recv_frame().await.unwrap().unwrap();
        let (second, _) = receiver.recv_frame().await.unwrap().unwrap();

        assert_eq!(first.len(), 8);
        assert_eq!(second, vec![0, 0, 0, 0, 0, 1, 2, 3]);
    }

    #[tokio::test]
    async fn test_oversized_datagram_arrives_intact_for_rejection() {
        let receiver = FrameReceiver::bind("127.0.0.1", 0, TEST_TIMEOUT)
            .await
            .unwrap();
        let addr = receiver.local_addr().unwrap();

        let raw = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
        raw.send_to(&[0u8; 12], addr).unwrap();

        let (payload, _) = receiver.recv_frame().await.unwrap().unwrap();
        // Length is preserved so the decoder can reject it
        assert_eq!(payload.len(), 12);
        assert!(crate::proto::decoder::decode_frame(&payload).is_err());
    }

    #[test]
    fn test_sender_reports_target() {
        let sender = FrameSender::connect("127.0.0.1", 1337).unwrap();
        assert_eq!(sender.target().port(), 1337);
    }
}
