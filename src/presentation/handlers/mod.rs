mod analytics;
mod health;
mod history;
mod job_status;
mod providers;
mod stream;
mod transcribe;

use serde::Serialize;

pub use analytics::{analytics_errors_handler, analytics_providers_handler, analytics_users_handler};
pub use health::health_handler;
pub use history::history_handler;
pub use job_status::job_status_handler;
pub use providers::list_providers_handler;
pub use stream::transcribe_stream_handler;
pub use transcribe::transcribe_async_handler;

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
