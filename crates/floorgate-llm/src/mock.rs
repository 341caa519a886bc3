//! Mock layout provider for testing
//!
//! Behaviours are queued and consumed one per call; once the queue is empty
//! the last configured default is used.

use crate::error::{Error, Result};
use crate::proposal::LayoutProposal;
use crate::provider::{LayoutProvider, ProposalRequest};

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// What the mock does on one call
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Return this proposal
    Respond(LayoutProposal),
    /// Fail with an API error carrying this message
    Fail(String),
    /// Sleep, then return the proposal
    Delay(Duration, LayoutProposal),
    /// Never answer
    Hang,
}

/// A scripted provider that counts its calls
pub struct MockProvider {
    name: String,
    script: Mutex<VecDeque<MockBehavior>>,
    default: MockBehavior,
    calls: AtomicUsize,
    hints_seen: Mutex<Vec<Vec<String>>>,
}

impl MockProvider {
    /// A provider that always answers with `proposal`
    #[must_use]
    pub fn responding(name: impl Into<String>, proposal: LayoutProposal) -> Self {
        Self::with_default(name, MockBehavior::Respond(proposal))
    }

    /// A provider that always fails
    #[must_use]
    pub fn failing(name: impl Into<String>) -> Self {
        Self::with_default(name, MockBehavior::Fail("mock failure".to_string()))
    }

    /// A provider that never answers
    #[must_use]
    pub fn hanging(name: impl Into<String>) -> Self {
        Self::with_default(name, MockBehavior::Hang)
    }

    /// A provider with an explicit default behaviour
    #[must_use]
    pub fn with_default(name: impl Into<String>, default: MockBehavior) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            default,
            calls: AtomicUsize::new(0),
            hints_seen: Mutex::new(Vec::new()),
        }
    }

    /// Queue a behaviour for the next call
    pub fn push(&self, behavior: MockBehavior) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(behavior);
    }

    /// Number of `generate` calls so far
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Correction hints received, one entry per call
    #[must_use]
    pub fn hints_seen(&self) -> Vec<Vec<String>> {
        self.hints_seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait::async_trait]
impl LayoutProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(
        &self,
        request: &ProposalRequest,
        _timeout: Duration,
    ) -> Result<LayoutProposal> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.hints_seen
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.correction_hints.clone());

        let behavior = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.default.clone());

        match behavior {
            MockBehavior::Respond(proposal) => Ok(proposal.reissued_by(&self.name)),
            MockBehavior::Fail(message) => Err(Error::Api(message)),
            MockBehavior::Delay(delay, proposal) => {
                tokio::time::sleep(delay).await;
                Ok(proposal.reissued_by(&self.name))
            }
            MockBehavior::Hang => {
                std::future::pending::<()>().await;
                Err(Error::Timeout(0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::LayoutRequest;

    fn request() -> ProposalRequest {
        ProposalRequest::first(LayoutRequest::new("test", "us"))
    }

    #[tokio::test]
    async fn test_script_then_default() {
        let mock = MockProvider::responding("m", LayoutProposal::new("seed"));
        mock.push(MockBehavior::Fail("boom".to_string()));

        let first = tokio_test::assert_err!(mock.generate(&request(), Duration::from_secs(1)).await);
        assert!(matches!(first, Error::Api(ref m) if m == "boom"));

        let second = tokio_test::assert_ok!(mock.generate(&request(), Duration::from_secs(1)).await);
        assert_eq!(second.provider, "m");
        assert_eq!(mock.calls(), 2);
    }

    #[tokio::test]
    async fn test_records_hints() {
        let mock = MockProvider::responding("m", LayoutProposal::new("seed"));
        let correction = ProposalRequest::correction(
            LayoutRequest::new("test", "us"),
            vec!["fix the door".to_string()],
        );
        mock.generate(&correction, Duration::from_secs(1)).await.unwrap();

        assert_eq!(mock.hints_seen(), vec![vec!["fix the door".to_string()]]);
    }
}
