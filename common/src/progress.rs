/// Receives phase progress from the orchestrator.
///
/// Implementations are called concurrently from every node task, so any
/// counter they keep must be atomic or locked.
pub trait ProgressSink: Send + Sync {
    fn set_description(&self, description: &str);

    /// Total number of tasks in the current phase. Zero means unknown.
    fn set_tasks(&self, tasks: u64);

    /// One task finished, successfully or not.
    fn task_done(&self);

    /// Removes any progress output.
    fn clear(&self);
}

/// Progress sink that shows nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn set_description(&self, _description: &str) {}
    fn set_tasks(&self, _tasks: u64) {}
    fn task_done(&self) {}
    fn clear(&self) {}
}
