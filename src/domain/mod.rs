mod job;
mod job_id;
mod job_status;
mod provider_kind;

pub use job::Job;
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use provider_kind::ProviderKind;
