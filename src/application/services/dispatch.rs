use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::domain::JobId;

/// Envelope delivered to exactly one worker per publish.
#[derive(Debug)]
pub struct DispatchMessage {
    pub job_id: JobId,
}

/// Creates the dispatch channel decoupling submission from processing.
/// Delivery is in-memory and at-least-once from the caller's point of view:
/// a publish that returns `Ok` has been accepted for delivery to some
/// consumer, nothing more. Messages do not survive a process crash.
pub fn dispatch_channel(capacity: usize) -> (JobDispatch, JobFeed) {
    let (sender, receiver) = mpsc::channel(capacity);
    (
        JobDispatch { sender },
        JobFeed {
            receiver: Arc::new(Mutex::new(receiver)),
        },
    )
}

/// Publishing side, held by the job service.
#[derive(Clone)]
pub struct JobDispatch {
    sender: mpsc::Sender<DispatchMessage>,
}

impl JobDispatch {
    pub async fn publish(&self, job_id: JobId) -> Result<(), DispatchError> {
        self.sender
            .send(DispatchMessage { job_id })
            .await
            .map_err(|_| DispatchError::ChannelClosed)
    }
}

/// Consuming side. Clones share one receiver, so worker instances compete
/// for messages instead of each seeing every one.
#[derive(Clone)]
pub struct JobFeed {
    receiver: Arc<Mutex<mpsc::Receiver<DispatchMessage>>>,
}

impl JobFeed {
    /// Next delivery, or `None` once every publisher is gone and the queue
    /// has drained.
    pub async fn next(&self) -> Option<DispatchMessage> {
        self.receiver.lock().await.recv().await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("dispatch channel closed")]
    ChannelClosed,
}
