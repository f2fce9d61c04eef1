// Single source of truth for all default values.

// --- Embeddings ---
pub const DEFAULT_EMBEDDING_PROVIDER: &str = "hashing";
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 384;
pub const DEFAULT_L1_CACHE_SIZE: u64 = 10_000;
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
pub const DEFAULT_OLLAMA_MODEL: &str = "nomic-embed-text";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// --- Clustering ---
pub const DEFAULT_MAX_ITERATIONS: usize = 100;
pub const DEFAULT_PRIOR_ANALYSIS_LOOKBACK: usize = 20;
pub const DEFAULT_PRIOR_MATCH_OVERLAP: f64 = 0.5;
pub const DEFAULT_LABEL_KEYWORD_COUNT: usize = 3;
pub const DEFAULT_SUMMARY_DESCRIPTION_COUNT: usize = 3;

// --- Scheduler ---
pub const DEFAULT_CRON_EXPRESSION: &str = "0 * * * *"; // hourly
pub const DEFAULT_ACTIVE_WINDOW_HOURS: i64 = 24;
pub const DEFAULT_FRESHNESS_WINDOW_HOURS: i64 = 6;
pub const DEFAULT_MIN_INSIGHTS: usize = 2;
pub const DEFAULT_MAX_CONCURRENT_FORMS: usize = 0; // unbounded
pub const MAX_WINDOW_HOURS: i64 = 24 * 365 * 10;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = true;
