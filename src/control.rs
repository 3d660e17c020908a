use crate::accumulator::TotalsSnapshot;
use crossbeam_channel::Sender;
use std::sync::mpsc;
use thiserror::Error;

/// Commands the publish loop accepts from controllers.
pub(crate) enum ControlMessage<T> {
    /// Stop the publish loop.
    Stop,

    /// Reply with a snapshot of the current running totals.
    Snapshot(mpsc::SyncSender<TotalsSnapshot<T>>),
}

/// Errors from sending or receiving control messages.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ControlError {
    /// The command could not be sent; the publish loop has shut down or is overloaded.
    #[error("failed to send control message to the publish loop")]
    Send,

    /// The publish loop never replied to a snapshot request.
    #[error("failed to receive snapshot reply from the publish loop")]
    Receive,
}

/// Cheaply cloneable handle for controlling the publish loop.
#[derive(Clone)]
pub struct Controller<T> {
    control_tx: Sender<ControlMessage<T>>,
}

impl<T> Controller<T> {
    pub(crate) fn new(control_tx: Sender<ControlMessage<T>>) -> Controller<T> {
        Controller { control_tx }
    }

    /// Asks the publish loop to stop after its current iteration.
    pub fn stop(&self) -> Result<(), ControlError> {
        self.control_tx.try_send(ControlMessage::Stop).map_err(|_| ControlError::Send)
    }

    /// Fetches a snapshot of the current running totals.
    ///
    /// Pending events are drained into the totals before the snapshot is taken, so a
    /// snapshot observes everything recorded before this call.
    pub fn snapshot(&self) -> Result<TotalsSnapshot<T>, ControlError> {
        let (reply_tx, reply_rx) = mpsc::sync_channel(1);
        self.control_tx
            .try_send(ControlMessage::Snapshot(reply_tx))
            .map_err(|_| ControlError::Send)?;
        reply_rx.recv().map_err(|_| ControlError::Receive)
    }
}
