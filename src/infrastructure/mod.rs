pub mod llm;
pub mod notify;
pub mod observability;
pub mod persistence;
pub mod providers;
