//! In-process implementation of the [`TaskSink`] port.

use std::future::Future;

use tokio::sync::broadcast;

use robohub_domain::error::RoboHubError;
use robohub_domain::task::TaskRequest;

use crate::ports::TaskSink;

/// Fans submitted tasks out to every subscribed worker over a tokio
/// [`broadcast`] channel.
///
/// The queue is fire-and-forget on the submitting side: `submit` succeeds
/// whether or not a worker is listening, and a worker that falls more than
/// `capacity` tasks behind loses the oldest ones. Task delivery is
/// best-effort by contract — the dispatch decision itself is returned to
/// the caller through the engine, not through this channel.
pub struct InProcessTaskQueue {
    sender: broadcast::Sender<TaskRequest>,
}

impl InProcessTaskQueue {
    /// Create a queue able to buffer `capacity` undelivered tasks per worker.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Attach a worker. Only tasks submitted after this call are delivered.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<TaskRequest> {
        self.sender.subscribe()
    }
}

impl TaskSink for InProcessTaskQueue {
    fn submit(&self, task: TaskRequest) -> impl Future<Output = Result<(), RoboHubError>> + Send {
        // send errs only with zero receivers; no worker means no delivery,
        // not a failed submission.
        let _ = self.sender.send(task);
        async { Ok(()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robohub_domain::id::{RepoId, RobotId};

    fn task_named(rule_id: &str) -> TaskRequest {
        TaskRequest::new(RepoId::new(), RobotId::new(), None, rule_id, "rule")
    }

    #[tokio::test]
    async fn should_deliver_task_to_subscriber() {
        let queue = InProcessTaskQueue::new(16);
        let mut rx = queue.subscribe();

        let submitted = task_named("r1");
        let task_id = submitted.id;
        queue.submit(submitted).await.unwrap();

        let received = rx.recv().await.unwrap();
        assert_eq!(received.id, task_id);
    }

    #[tokio::test]
    async fn should_deliver_task_to_multiple_subscribers() {
        let queue = InProcessTaskQueue::new(16);
        let mut rx1 = queue.subscribe();
        let mut rx2 = queue.subscribe();

        let submitted = task_named("r1");
        let task_id = submitted.id;
        queue.submit(submitted).await.unwrap();

        assert_eq!(rx1.recv().await.unwrap().id, task_id);
        assert_eq!(rx2.recv().await.unwrap().id, task_id);
    }

    #[tokio::test]
    async fn should_not_fail_when_no_subscribers() {
        let queue = InProcessTaskQueue::new(16);
        queue.submit(task_named("r1")).await.unwrap();
    }

    #[tokio::test]
    async fn should_drop_oldest_tasks_when_worker_lags() {
        let queue = InProcessTaskQueue::new(1);
        let mut rx = queue.subscribe();

        queue.submit(task_named("old")).await.unwrap();
        queue.submit(task_named("new")).await.unwrap();

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert_eq!(rx.recv().await.unwrap().rule_id, "new");
    }
}
