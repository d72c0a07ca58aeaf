//! Background execution of conversion jobs

use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::app::convert_interactor::ConvertInteractor;
use crate::domain::model::{JobReport, JobRequest};
use crate::engine::progress::ProgressCounters;
use crate::error::{CutError, CutResult};

/// A job running on its own task.
///
/// The task is the only writer of `counters`; the front end polls them.
pub struct JobHandle {
    counters: Arc<ProgressCounters>,
    cancel: CancellationToken,
    task: JoinHandle<CutResult<JobReport>>,
}

impl JobHandle {
    pub fn counters(&self) -> Arc<ProgressCounters> {
        Arc::clone(&self.counters)
    }

    /// Ask the job to stop; the running encoder is killed
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the job and return its report
    pub async fn join(self) -> CutResult<JobReport> {
        self.task.await.map_err(|e| CutError::TaskFailed {
            message: e.to_string(),
        })?
    }
}

/// Move `job` onto a new task and start it
pub fn spawn_job(interactor: Arc<ConvertInteractor>, job: JobRequest) -> JobHandle {
    let counters = Arc::new(ProgressCounters::new());
    let cancel = CancellationToken::new();

    let task = {
        let counters = Arc::clone(&counters);
        let cancel = cancel.clone();
        tokio::spawn(async move {
            debug!(files = job.files.len(), "Job task started");
            interactor.execute(&job, &*counters, &cancel).await
        })
    };

    JobHandle {
        counters,
        cancel,
        task,
    }
}
