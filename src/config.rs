/// Application-level constants
pub const APP_NAME: &str = "Pidsight";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> String {
    format!("{}=info", env!("CARGO_PKG_NAME"))
}

/// Default Ollama endpoint for the vision model call.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default vision-language model used for drawing analysis.
pub const DEFAULT_VISION_MODEL: &str = "qwen2.5vl";

/// Vision calls can take minutes on a large drawing.
pub const VISION_TIMEOUT_SECS: u64 = 300;
