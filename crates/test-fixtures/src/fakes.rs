//! Recording fakes for the pipeline's collaborators.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use insight_core::errors::{
    AiServiceError, EmbeddingError, InsightResult, NotificationError, TicketError,
};
use insight_core::models::{ClusterSummaryData, IssueTrackerConfig, TicketReference};
use insight_core::traits::{
    IEmbeddingProvider, IFormClusterer, IGenerativeModel, INotificationClient, ITicketClient,
};
use insight_core::{ClusterAnalysis, ClusteringOutcome};

use crate::builders;

fn lock<T>(m: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

// --- Embeddings ---

/// Embeds deterministically from a blake3 hash of the text and records every call.
pub struct RecordingEmbedder {
    dimensions: usize,
    calls: Mutex<Vec<String>>,
    fixed: Mutex<HashMap<String, Vec<f32>>>,
    failing: Mutex<HashSet<String>>,
}

impl RecordingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            calls: Mutex::new(Vec::new()),
            fixed: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    /// Return `vector` whenever `text` is embedded.
    pub fn with_vector(self, text: &str, vector: Vec<f32>) -> Self {
        lock(&self.fixed).insert(text.to_string(), vector);
        self
    }

    /// Fail whenever `text` is embedded.
    pub fn failing_on(self, text: &str) -> Self {
        lock(&self.failing).insert(text.to_string());
        self
    }

    /// Every text passed to `embed`, in call order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    fn hashed(&self, text: &str) -> Vec<f32> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(text.as_bytes());
        let mut reader = hasher.finalize_xof();
        let mut bytes = vec![0u8; self.dimensions];
        reader.fill(&mut bytes);
        bytes.into_iter().map(|b| b as f32 / 255.0 + 0.01).collect()
    }
}

#[async_trait]
impl IEmbeddingProvider for RecordingEmbedder {
    async fn embed(&self, text: &str) -> InsightResult<Vec<f32>> {
        lock(&self.calls).push(text.to_string());
        if lock(&self.failing).contains(text) {
            return Err(EmbeddingError::ProviderFailed {
                reason: "scripted failure".to_string(),
            }
            .into());
        }
        if let Some(v) = lock(&self.fixed).get(text) {
            return Ok(v.clone());
        }
        Ok(self.hashed(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        "recording"
    }

    fn is_available(&self) -> bool {
        true
    }
}

// --- Generative AI ---

/// Replays scripted replies in order, then repeats the fallback.
pub struct ScriptedGenerativeModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    fallback: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerativeModel {
    /// Always answers with a valid high/immediate recommendation.
    pub fn valid() -> Self {
        Self::with_fallback(Ok(
            r#"{"recommendation":"Fix the root cause","impact":"high","urgency":"immediate","cluster_summary":"AI summary"}"#
                .to_string(),
        ))
    }

    /// Always fails.
    pub fn failing() -> Self {
        Self::with_fallback(Err("service unavailable".to_string()))
    }

    pub fn with_fallback(fallback: Result<String, String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Queue a reply ahead of the fallback.
    pub fn then(self, reply: Result<String, String>) -> Self {
        lock(&self.replies).push_back(reply);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        lock(&self.prompts).clone()
    }
}

#[async_trait]
impl IGenerativeModel for ScriptedGenerativeModel {
    async fn generate(&self, prompt: &str) -> InsightResult<String> {
        lock(&self.prompts).push(prompt.to_string());
        let reply = lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        reply.map_err(|reason| AiServiceError::RequestFailed { reason }.into())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

// --- Email ---

#[derive(Debug, Clone, PartialEq)]
pub struct SentNotification {
    pub to_address: String,
    pub cluster: ClusterSummaryData,
    pub sentiment_percentage: f64,
}

/// Records sends and answers with a fixed result.
pub struct RecordingNotifier {
    result: Result<bool, String>,
    sent: Mutex<Vec<SentNotification>>,
}

impl RecordingNotifier {
    /// Confirms every send.
    pub fn confirming() -> Self {
        Self::with_result(Ok(true))
    }

    pub fn with_result(result: Result<bool, String>) -> Self {
        Self {
            result,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent(&self) -> Vec<SentNotification> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl INotificationClient for RecordingNotifier {
    async fn send(
        &self,
        to_address: &str,
        cluster: &ClusterSummaryData,
        sentiment_percentage: f64,
    ) -> InsightResult<bool> {
        lock(&self.sent).push(SentNotification {
            to_address: to_address.to_string(),
            cluster: cluster.clone(),
            sentiment_percentage,
        });
        self.result
            .clone()
            .map_err(|reason| NotificationError::SendFailed { reason }.into())
    }
}

// --- Issue tracker ---

/// Files numbered tickets (`FB-1`, `FB-2`, ...) unless told to decline.
pub struct RecordingTicketClient {
    decline: bool,
    fail: bool,
    calls: Mutex<Vec<String>>,
    counter: AtomicUsize,
}

impl RecordingTicketClient {
    pub fn accepting() -> Self {
        Self {
            decline: false,
            fail: false,
            calls: Mutex::new(Vec::new()),
            counter: AtomicUsize::new(0),
        }
    }

    pub fn declining() -> Self {
        Self {
            decline: true,
            ..Self::accepting()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::accepting()
        }
    }

    /// Analysis ids the client was asked to ticket, in call order.
    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl ITicketClient for RecordingTicketClient {
    async fn create_ticket(
        &self,
        analysis: &ClusterAnalysis,
        tracker: &IssueTrackerConfig,
    ) -> InsightResult<Option<TicketReference>> {
        lock(&self.calls).push(analysis.id.clone());
        if self.fail {
            return Err(TicketError::RequestFailed {
                reason: "tracker returned 500".to_string(),
            }
            .into());
        }
        if self.decline {
            return Ok(None);
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let ticket_id = format!("{}-{n}", tracker.project_key);
        Ok(Some(TicketReference {
            ticket_url: format!("{}/browse/{ticket_id}", tracker.base_url),
            ticket_id,
            status: None,
        }))
    }
}

// --- Form clusterer ---

/// What [`SpyClusterer`] does for one form.
#[derive(Debug, Clone)]
pub enum FormBehavior {
    /// Produce this many clusters.
    Succeed(usize),
    Insufficient(usize),
    Fail(String),
    Panic,
}

/// Records every form it is asked to cluster and acts per scripted behavior.
pub struct SpyClusterer {
    behaviors: Mutex<HashMap<String, FormBehavior>>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl SpyClusterer {
    /// Every form succeeds with one cluster.
    pub fn new() -> Self {
        Self {
            behaviors: Mutex::new(HashMap::new()),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_behavior(self, form_id: &str, behavior: FormBehavior) -> Self {
        lock(&self.behaviors).insert(form_id.to_string(), behavior);
        self
    }

    /// Sleep this long inside every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }
}

impl Default for SpyClusterer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl IFormClusterer for SpyClusterer {
    async fn cluster_form(&self, form_id: &str) -> InsightResult<ClusteringOutcome> {
        lock(&self.calls).push(form_id.to_string());
        let behavior = lock(&self.behaviors)
            .get(form_id)
            .cloned()
            .unwrap_or(FormBehavior::Succeed(1));

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        match behavior {
            FormBehavior::Succeed(n) => {
                let clusters = (0..n)
                    .map(|i| {
                        builders::analysis(
                            &builders::object_id(i as u64 + 1),
                            form_id,
                            "org",
                            Utc::now(),
                            &[],
                        )
                    })
                    .collect();
                Ok(ClusteringOutcome::Clustered {
                    form_id: form_id.to_string(),
                    total_insights: n * 2,
                    clusters,
                })
            }
            FormBehavior::Insufficient(total) => Ok(ClusteringOutcome::insufficient(form_id, total)),
            FormBehavior::Fail(reason) => Err(insight_core::errors::PersistenceError::QueryFailed {
                operation: "cluster_form".to_string(),
                reason,
            }
            .into()),
            FormBehavior::Panic => panic!("scripted panic clustering form {form_id}"),
        }
    }
}
