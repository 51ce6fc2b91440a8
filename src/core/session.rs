use crate::domain::model::{QueryRequest, QueryResult};
use crate::utils::error::{MediqueryError, Result};

/// Identifies one submission. Only the latest ticket may settle a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Pending { ticket: RequestTicket },
    Success(QueryResult),
    Failure(String),
}

impl QueryStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, QueryStatus::Pending { .. })
    }

    pub fn result(&self) -> Option<&QueryResult> {
        match self {
            QueryStatus::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryStatus::Failure(message) => Some(message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Applied,
    /// The outcome belonged to an older submission and was dropped.
    Stale,
}

/// View state of one question/answer surface.
#[derive(Debug, Clone)]
pub struct Session {
    question: String,
    status: QueryStatus,
    last_ticket: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            question: String::new(),
            status: QueryStatus::Idle,
            last_ticket: 0,
        }
    }

    pub fn set_question(&mut self, question: impl Into<String>) {
        self.question = question.into();
    }

    pub fn status(&self) -> &QueryStatus {
        &self.status
    }

    pub fn can_submit(&self) -> bool {
        !self.question.trim().is_empty() && !self.status.is_pending()
    }

    /// Start a submission: clears the previous outcome and moves to pending.
    pub fn begin(&mut self) -> Result<(RequestTicket, QueryRequest)> {
        if self.status.is_pending() {
            return Err(MediqueryError::RequestPendingError);
        }
        let question = self.question.trim();
        if question.is_empty() {
            return Err(MediqueryError::EmptyQuestionError);
        }

        self.last_ticket += 1;
        let ticket = RequestTicket(self.last_ticket);
        let request = QueryRequest::new(question);
        self.status = QueryStatus::Pending { ticket };
        tracing::debug!(ticket = ticket.id(), "Submission started");
        Ok((ticket, request))
    }

    pub fn settle(
        &mut self,
        ticket: RequestTicket,
        outcome: Result<QueryResult>,
    ) -> Settlement {
        match self.status {
            QueryStatus::Pending { ticket: current } if current == ticket => {}
            _ => {
                tracing::debug!(ticket = ticket.id(), "Dropping stale response");
                return Settlement::Stale;
            }
        }

        self.status = match outcome {
            Ok(result) => QueryStatus::Success(result),
            Err(e) => QueryStatus::Failure(e.user_friendly_message()),
        };
        Settlement::Applied
    }

    /// Give up on the pending submission; its response will be treated as stale.
    pub fn reset(&mut self) {
        self.status = QueryStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(answer: &str) -> QueryResult {
        QueryResult {
            topic: "symptoms".to_string(),
            domain_filter: vec!["mayoclinic.org".to_string()],
            answer: answer.to_string(),
            citations: vec![],
        }
    }

    #[test]
    fn test_empty_question_cannot_submit() {
        let mut session = Session::new();
        assert!(!session.can_submit());

        session.set_question("   \n\t ");
        assert!(!session.can_submit());
        assert!(matches!(session.begin(), Err(MediqueryError::EmptyQuestionError)));
        assert_eq!(session.status(), &QueryStatus::Idle);
    }

    #[test]
    fn test_begin_trims_question_and_blocks_resubmit() {
        let mut session = Session::new();
        session.set_question("  What causes migraines?  ");

        let (_, request) = session.begin().unwrap();
        assert_eq!(request.question, "What causes migraines?");
        assert!(session.status().is_pending());
        assert!(!session.can_submit());
        assert!(matches!(session.begin(), Err(MediqueryError::RequestPendingError)));
    }

    #[test]
    fn test_success_then_new_submission_clears_result() {
        let mut session = Session::new();
        session.set_question("q");

        let (ticket, _) = session.begin().unwrap();
        assert_eq!(session.settle(ticket, Ok(result("a"))), Settlement::Applied);
        assert_eq!(session.status().result().unwrap().answer, "a");

        session.begin().unwrap();
        assert!(session.status().result().is_none());
        assert!(session.status().error().is_none());
    }

    #[test]
    fn test_failure_message_comes_from_error() {
        let mut session = Session::new();
        session.set_question("q");
        let (ticket, _) = session.begin().unwrap();

        let err = MediqueryError::StatusError {
            status: 500,
            detail: None,
        };
        session.settle(ticket, Err(err));
        assert_eq!(
            session.status().error(),
            Some("Request failed with status code 500")
        );
        assert!(session.status().result().is_none());
        assert!(session.can_submit());
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut session = Session::new();
        session.set_question("first");
        let (old, _) = session.begin().unwrap();
        session.reset();

        session.set_question("second");
        let (new, _) = session.begin().unwrap();
        assert!(new > old);

        assert_eq!(session.settle(old, Ok(result("old"))), Settlement::Stale);
        assert!(session.status().is_pending());

        assert_eq!(session.settle(new, Ok(result("new"))), Settlement::Applied);
        assert_eq!(session.status().result().unwrap().answer, "new");
    }

    #[test]
    fn test_settle_twice_is_stale() {
        let mut session = Session::new();
        session.set_question("q");
        let (ticket, _) = session.begin().unwrap();
        session.settle(ticket, Ok(result("a")));
        assert_eq!(session.settle(ticket, Ok(result("b"))), Settlement::Stale);
        assert_eq!(session.status().result().unwrap().answer, "a");
    }
}
