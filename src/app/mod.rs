// Application layer - Use case interactors

pub mod container;
pub mod convert_interactor;
pub mod inspect_interactor;
pub mod worker;

// Re-export interactors
pub use convert_interactor::ConvertInteractor;
pub use inspect_interactor::{InspectInteractor, MediaSummary};
pub use worker::{spawn_job, JobHandle};
