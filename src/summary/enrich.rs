use std::sync::Arc;
use chrono::Utc;
use log::{info, warn};
use crate::schedule::{compute_common_slots, AnalysisResult, CommonSlot, Participant};
use super::client::TextGenerator;
use super::prompt::build_prompt;

/// Summary used when no summarizer produced usable text
pub const SUMMARY_UNAVAILABLE: &str = "Unable to generate AI analysis at this time.";

/// Summary used when there is nobody to analyse
pub const NO_DATA_SUMMARY: &str = "No students data available for analysis.";

/// Attaches a generated narrative to computed common slots
///
/// The primary generator (the trusted proxy) is always tried first. The optional fallback
/// is only attempted after the primary fails, and every use of it is logged.
pub struct Enricher {
    primary: Arc<dyn TextGenerator>,
    fallback: Option<Arc<dyn TextGenerator>>,
}

impl Enricher {
    pub fn new(primary: Arc<dyn TextGenerator>) -> Self {
        Self { primary, fallback: None }
    }

    pub fn with_fallback(mut self, fallback: Arc<dyn TextGenerator>) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Computes common slots for `participants` and narrates them
    pub async fn analyze(&self, participants: &[Participant]) -> AnalysisResult {
        if participants.is_empty() {
            return AnalysisResult {
                common_slots: Vec::new(),
                ai_summary: NO_DATA_SUMMARY.to_string(),
                last_updated: Utc::now(),
            };
        }

        let common_slots = compute_common_slots(participants);
        self.enrich(participants, &common_slots).await
    }

    /// Narrates already computed `common_slots`; never fails
    pub async fn enrich(&self, participants: &[Participant], common_slots: &[CommonSlot]) -> AnalysisResult {
        let prompt = build_prompt(participants, common_slots);
        let ai_summary = self.summarize(&prompt).await;

        AnalysisResult {
            common_slots: common_slots.to_vec(),
            ai_summary,
            last_updated: Utc::now(),
        }
    }

    async fn summarize(&self, prompt: &str) -> String {
        let primary_err = match self.primary.generate(prompt).await {
            Ok(text) => {
                info!("Summary generated by {}", self.primary.name());
                return text;
            }
            Err(e) => e,
        };

        let Some(fallback) = &self.fallback else {
            warn!("Summary from {} failed, no fallback configured: {}", self.primary.name(), primary_err);
            return SUMMARY_UNAVAILABLE.to_string();
        };

        warn!(
            "Summary from {} failed ({}), falling back to {}",
            self.primary.name(),
            primary_err,
            fallback.name()
        );
        match fallback.generate(prompt).await {
            Ok(text) => {
                warn!("Summary generated by fallback {}", fallback.name());
                text
            }
            Err(e) => {
                warn!("Fallback {} failed as well: {}", fallback.name(), e);
                SUMMARY_UNAVAILABLE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use async_trait::async_trait;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use super::*;
    use crate::summary::client::{http_client, ProxyClient};
    use crate::error::SummaryError;
    use crate::schedule::{AvailabilityGrid, Day};

    /// Scripted generator that counts how often it is called
    struct Scripted {
        reply: Result<&'static str, ()>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn ok(text: &'static str) -> Arc<Self> {
            Arc::new(Self { reply: Ok(text), calls: AtomicUsize::new(0) })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self { reply: Err(()), calls: AtomicUsize::new(0) })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextGenerator for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _prompt: &str) -> Result<String, SummaryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(SummaryError::Network("connection refused".to_string())),
            }
        }
    }

    fn pair() -> Vec<Participant> {
        vec![
            Participant::new("A", AvailabilityGrid::from_slots([(Day::Monday, 0)])),
            Participant::new("B", AvailabilityGrid::from_slots([(Day::Monday, 0), (Day::Monday, 1)])),
        ]
    }

    #[tokio::test]
    async fn no_participants_skips_the_summarizer() {
        let primary = Scripted::ok("unused");
        let enricher = Enricher::new(primary.clone());

        let result = enricher.analyze(&[]).await;

        assert!(result.common_slots.is_empty());
        assert_eq!(result.ai_summary, NO_DATA_SUMMARY);
        assert_eq!(primary.calls(), 0);
    }

    #[tokio::test]
    async fn primary_summary_is_attached() {
        let primary = Scripted::ok("Monday at nine suits everyone.");
        let enricher = Enricher::new(primary.clone());

        let result = enricher.analyze(&pair()).await;

        assert_eq!(result.ai_summary, "Monday at nine suits everyone.");
        assert_eq!(result.common_slots.len(), 1);
        assert_eq!(result.common_slots[0].students, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(primary.calls(), 1);
    }

    #[tokio::test]
    async fn fallback_used_only_after_primary_fails() {
        let primary = Scripted::failing();
        let fallback = Scripted::ok("From the fallback.");
        let enricher = Enricher::new(primary.clone()).with_fallback(fallback.clone());

        let result = enricher.analyze(&pair()).await;

        assert_eq!(result.ai_summary, "From the fallback.");
        assert_eq!((primary.calls(), fallback.calls()), (1, 1));

        let healthy = Scripted::ok("Primary.");
        let untouched = Scripted::ok("Fallback.");
        let enricher = Enricher::new(healthy).with_fallback(untouched.clone());
        assert_eq!(enricher.analyze(&pair()).await.ai_summary, "Primary.");
        assert_eq!(untouched.calls(), 0);
    }

    #[tokio::test]
    async fn total_failure_still_returns_common_slots() {
        let enricher = Enricher::new(Scripted::failing()).with_fallback(Scripted::failing());

        let result = enricher.analyze(&pair()).await;

        assert_eq!(result.ai_summary, SUMMARY_UNAVAILABLE);
        assert_eq!(result.common_slots.len(), 1);
        assert_eq!((result.common_slots[0].day, result.common_slots[0].hour), (Day::Monday, 0));
    }

    #[tokio::test]
    async fn enrich_copies_slots_unchanged() {
        let enricher = Enricher::new(Scripted::failing());
        let participants = pair();
        let common = compute_common_slots(&participants);
        let before = common.clone();

        let result = enricher.enrich(&participants, &common).await;

        assert_eq!(common, before);
        assert_eq!(result.common_slots, before);
    }

    #[tokio::test]
    async fn malformed_proxy_payload_falls_back_to_placeholder() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let http = http_client(Duration::from_secs(5)).expect("http client");
        let enricher = Enricher::new(Arc::new(ProxyClient::new(mock_server.uri(), http)));

        let result = enricher.analyze(&pair()).await;

        assert_eq!(result.ai_summary, SUMMARY_UNAVAILABLE);
        assert_eq!(result.common_slots, compute_common_slots(&pair()));
        assert_eq!(result.common_slots[0].students, vec!["A".to_string(), "B".to_string()]);
    }
}
