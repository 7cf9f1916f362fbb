//! Manager channel
//!
//! A thin typed wrapper over an unbounded word channel. The reactor owns the
//! receiving side; every other party (delivery attempts, input workers, the
//! engine handle, the buffering layer) holds a cloned [`ManagerSender`].
//!
//! A word send is atomic and sends from one sender are received in order,
//! which is the only guarantee the engine's cross-thread contract needs.

use tokio::sync::mpsc;

use crate::error::{Result, SignalError};
use crate::word::Signal;

/// The engine's notification channel: one reader, many writers
pub struct ManagerChannel {
    sender: ManagerSender,
    receiver: Option<mpsc::UnboundedReceiver<u64>>,
}

impl ManagerChannel {
    /// Create a new manager channel
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            sender: ManagerSender { tx },
            receiver: Some(rx),
        }
    }

    /// Get a cloneable sender
    #[inline]
    pub fn sender(&self) -> ManagerSender {
        self.sender.clone()
    }

    /// Take the receiving side
    ///
    /// The reactor calls this exactly once before entering its loop.
    ///
    /// # Errors
    ///
    /// Returns an error if the receiver was already taken.
    pub fn take_receiver(&mut self) -> Result<mpsc::UnboundedReceiver<u64>> {
        self.receiver.take().ok_or(SignalError::ReceiverTaken)
    }
}

impl Default for ManagerChannel {
    fn default() -> Self {
        Self::new()
    }
}

/// Sending side of the manager channel
#[derive(Clone)]
pub struct ManagerSender {
    tx: mpsc::UnboundedSender<u64>,
}

impl ManagerSender {
    /// Encode and send a signal
    ///
    /// # Errors
    ///
    /// Returns an error if the reactor side is gone.
    #[inline]
    pub fn send(&self, signal: Signal) -> Result<()> {
        self.send_word(signal.encode())
    }

    /// Send a pre-encoded word
    ///
    /// External collaborators that already hold a well-formed word use this
    /// directly; the reactor validates on decode.
    #[inline]
    pub fn send_word(&self, word: u64) -> Result<()> {
        self.tx.send(word).map_err(|_| SignalError::ChannelClosed)
    }

    /// Check if the reactor side is gone
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl std::fmt::Debug for ManagerSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagerSender")
            .field("closed", &self.is_closed())
            .finish()
    }
}
