use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub worker: WorkerSettings,
    pub providers: ProviderSettings,
    pub summarizer: SummarizerSettings,
    pub observability: ObservabilitySettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub pool_size: usize,
    pub queue_capacity: usize,
    pub max_retries: u32,
    pub retry_delay_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub openai_api_key: String,
    pub elevenlabs_api_key: String,
    pub google_api_key: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
    pub aws_transcribe_bucket: String,
}

#[derive(Debug, Clone)]
pub struct SummarizerSettings {
    pub api_key: String,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct ObservabilitySettings {
    pub environment: String,
    pub json_logs: bool,
}

impl Settings {
    /// All configuration comes from environment variables with defaults
    /// suitable for local development. Provider keys default to empty,
    /// which each backend treats as "credentials absent".
    pub fn from_env() -> Self {
        let openai_api_key = env_or("OPENAI_API_KEY", "");
        Self {
            server: ServerSettings {
                host: env_or("SERVER_HOST", "0.0.0.0"),
                port: env_parse("SERVER_PORT", 8000),
            },
            database: DatabaseSettings {
                url: env_or("DATABASE_URL", "sqlite://history.db"),
                max_connections: env_parse("DATABASE_MAX_CONNECTIONS", 5),
            },
            worker: WorkerSettings {
                pool_size: env_parse("WORKER_POOL_SIZE", 4),
                queue_capacity: env_parse("WORKER_QUEUE_CAPACITY", 64),
                max_retries: env_parse("WORKER_MAX_RETRIES", 3),
                retry_delay_secs: env_parse("WORKER_RETRY_DELAY_SECS", 10),
            },
            providers: ProviderSettings {
                openai_api_key: openai_api_key.clone(),
                elevenlabs_api_key: env_or("ELEVENLABS_API_KEY", ""),
                google_api_key: env_or("GOOGLE_API_KEY", ""),
                aws_access_key_id: env_or("AWS_ACCESS_KEY_ID", ""),
                aws_secret_access_key: env_or("AWS_SECRET_ACCESS_KEY", ""),
                aws_transcribe_bucket: env_or("AWS_TRANSCRIBE_BUCKET", "speech-proxy-demo-bucket"),
            },
            summarizer: SummarizerSettings {
                api_key: openai_api_key,
                model: env_or("SUMMARY_MODEL", "gpt-4o"),
            },
            observability: ObservabilitySettings {
                environment: env_or("APP_ENV", "development"),
                json_logs: is_json_log_format(&env_or("LOG_FORMAT", "plain")),
            },
        }
    }
}

fn is_json_log_format(value: &str) -> bool {
    value.eq_ignore_ascii_case("json")
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr + Copy>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_json_value_in_any_case_then_json_logging_is_selected() {
        assert!(is_json_log_format("json"));
        assert!(is_json_log_format("JSON"));
    }

    #[test]
    fn given_other_values_then_plain_logging_is_selected() {
        assert!(!is_json_log_format("plain"));
        assert!(!is_json_log_format(""));
        assert!(!is_json_log_format("pretty"));
    }
}
