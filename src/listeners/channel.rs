//! Listener that forwards notifications into a bounded channel.

use super::types::{EventListener, ListenerResult};
use crate::error::NotificationError;
use crate::types::NotificationEvent;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::Arc;
use std::time::Duration;

/// Create a listener and the receiver draining it.
///
/// When the buffer is full the notification is dropped and reported as a
/// listener failure.
pub fn channel_listener(buffer_size: usize) -> (Arc<ChannelListener>, NotificationReceiver) {
    let (sender, receiver) = bounded(buffer_size);
    (
        Arc::new(ChannelListener { sender }),
        NotificationReceiver { receiver },
    )
}

pub struct ChannelListener {
    sender: Sender<NotificationEvent>,
}

impl EventListener for ChannelListener {
    fn notification_received(&self, event: &NotificationEvent) -> ListenerResult {
        match self.sender.try_send(event.clone()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(NotificationError::ListenerBufferFull.into()),
            Err(TrySendError::Disconnected(_)) => {
                Err(NotificationError::ListenerDisconnected.into())
            }
        }
    }
}

/// Receiving end of a [`ChannelListener`].
pub struct NotificationReceiver {
    receiver: Receiver<NotificationEvent>,
}

impl NotificationReceiver {
    /// Receive the next notification (blocking).
    pub fn recv(&self) -> Result<NotificationEvent, crossbeam_channel::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a notification (non-blocking).
    pub fn try_recv(&self) -> Result<NotificationEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: Duration,
    ) -> Result<NotificationEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Notifications currently buffered.
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Drain everything currently buffered.
    pub fn drain(&self) -> Vec<NotificationEvent> {
        self.receiver.try_iter().collect()
    }
}
