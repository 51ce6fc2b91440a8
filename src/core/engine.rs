use crate::core::session::{QueryStatus, Session, Settlement};
use crate::domain::ports::AnswerService;
use crate::utils::error::Result;

/// Drives a submission through a [`Session`] and an [`AnswerService`].
pub struct AskEngine<S: AnswerService> {
    service: S,
}

impl<S: AnswerService> AskEngine<S> {
    pub fn new(service: S) -> Self {
        Self { service }
    }

    /// Submit the session's current question and wait for it to settle.
    ///
    /// Guard violations (empty question, request already pending) are returned
    /// as errors without touching the network. Transport and backend failures
    /// are not errors here: they land in the session as `Failure`.
    pub async fn submit<'s>(&self, session: &'s mut Session) -> Result<&'s QueryStatus> {
        let (ticket, request) = session.begin()?;
        tracing::info!("Asking: {}", request.question);

        let outcome = self.service.ask(&request).await;
        match &outcome {
            Ok(result) => tracing::info!(
                "Answer received ({} citations, topic '{}')",
                result.citations.len(),
                result.topic
            ),
            Err(e) => {
                tracing::error!("❌ Ask failed: {} (Severity: {:?})", e, e.severity());
                tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            }
        }

        if session.settle(ticket, outcome) == Settlement::Stale {
            tracing::warn!("Response for request {} arrived after a newer one", ticket.id());
        }
        Ok(session.status())
    }
}
