//! Task sink port — hands dispatched tasks to the execution queue.

use std::future::Future;

use robohub_domain::error::RoboHubError;
use robohub_domain::task::TaskRequest;

/// Receives one [`TaskRequest`] per dispatched action.
///
/// Whether concurrent requests against the same robot are coalesced or
/// queued separately is the implementation's policy — the engine submits
/// each action independently, in dispatch order.
pub trait TaskSink {
    /// Queue a task for execution.
    fn submit(&self, task: TaskRequest) -> impl Future<Output = Result<(), RoboHubError>> + Send;
}
