//! Chat session state.
//!
//! [`ChatSession`] owns the conversation, the input buffer and the loading
//! flag. A submission moves it `Idle -> Sending`; applying the settled
//! outcome moves it back to `Idle`. Every mutation bumps [`ChatSession::revision`]
//! so a front end knows when to redraw.
//!
//! Submissions are serialized: while a request is outstanding, further
//! submits are rejected with [`Submission::Busy`] and edits are ignored.

use crate::client::{ChatBackend, RequestFailure};
use crate::message::{Message, NO_RESPONSE, UNKNOWN_ERROR};
use tracing::{debug, info, warn};

/// Where the session is in the submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    Idle,
    Sending,
}

/// A request that has been accepted and must now be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingTurn {
    /// Raw input text, untrimmed.
    pub prompt: String,
}

/// Result of asking the session to submit its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Input was empty or whitespace; nothing changed.
    Empty,
    /// A request is already outstanding; nothing changed.
    Busy,
    /// The user message was appended and a request should be issued.
    Started(PendingTurn),
}

/// Conversation, input buffer and loading flag for one chat screen.
#[derive(Debug, Default)]
pub struct ChatSession {
    messages: Vec<Message>,
    input: String,
    loading: bool,
    revision: u64,
}

impl ChatSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages in arrival order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn state(&self) -> TurnState {
        if self.loading {
            TurnState::Sending
        } else {
            TurnState::Idle
        }
    }

    /// Monotonic counter bumped at every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the input buffer. Ignored while a request is outstanding.
    pub fn edit_input(&mut self, text: impl Into<String>) {
        if self.loading {
            return;
        }
        let text = text.into();
        if text != self.input {
            self.input = text;
            self.touch("input edited");
        }
    }

    /// Accept the current input as a new turn, if possible.
    pub fn begin_submit(&mut self) -> Submission {
        if self.input.trim().is_empty() {
            return Submission::Empty;
        }
        if self.loading {
            return Submission::Busy;
        }

        let prompt = self.input.clone();
        self.messages.push(Message::user(prompt.clone()));
        self.touch("user message appended");

        self.loading = true;
        self.touch("loading set");

        info!(chars = prompt.chars().count(), "turn started");
        Submission::Started(PendingTurn { prompt })
    }

    /// Apply the outcome of the outstanding request and return to idle.
    ///
    /// Returns the bot message that was appended.
    pub fn complete(&mut self, result: Result<Option<String>, RequestFailure>) -> &Message {
        let message = match result {
            Ok(reply) => {
                let text = reply
                    .filter(|r| !r.is_empty())
                    .unwrap_or_else(|| NO_RESPONSE.to_string());
                info!("turn succeeded");
                Message::bot(text)
            }
            Err(failure) => {
                warn!(error = %failure, "turn failed");
                let error = if failure.message().is_empty() {
                    UNKNOWN_ERROR
                } else {
                    failure.message()
                };
                Message::failure(error)
            }
        };
        self.messages.push(message);
        self.touch("bot message appended");

        self.loading = false;
        self.input.clear();
        self.touch("loading cleared");

        &self.messages[self.messages.len() - 1]
    }

    /// Submit the current input and wait for the backend to settle.
    ///
    /// Exactly one backend call is made per accepted submission.
    pub async fn submit(&mut self, backend: &dyn ChatBackend) -> Submission {
        let submission = self.begin_submit();
        if let Submission::Started(turn) = &submission {
            let result = backend.generate(&turn.prompt).await;
            self.complete(result);
        }
        submission
    }

    fn touch(&mut self, what: &str) {
        self.revision += 1;
        debug!(revision = self.revision, what, "session changed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Sender;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Backend returning a canned outcome and counting calls.
    struct StubBackend {
        outcome: Result<Option<String>, RequestFailure>,
        calls: AtomicUsize,
    }

    impl StubBackend {
        fn new(outcome: Result<Option<String>, RequestFailure>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatBackend for StubBackend {
        async fn generate(&self, _prompt: &str) -> Result<Option<String>, RequestFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn session_with_input(text: &str) -> ChatSession {
        let mut session = ChatSession::new();
        session.edit_input(text);
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = ChatSession::new();
        assert!(session.messages().is_empty());
        assert_eq!(session.input(), "");
        assert!(!session.is_loading());
        assert_eq!(session.state(), TurnState::Idle);
    }

    #[test]
    fn test_empty_and_whitespace_submit_is_noop() {
        for text in ["", "   ", "\n\t "] {
            let mut session = session_with_input(text);
            let revision = session.revision();

            assert_eq!(session.begin_submit(), Submission::Empty);
            assert!(session.messages().is_empty());
            assert_eq!(session.input(), text);
            assert!(!session.is_loading());
            assert_eq!(session.revision(), revision);
        }
    }

    #[test]
    fn test_begin_submit_appends_user_message_before_reply() {
        let mut session = session_with_input("hello");

        let submission = session.begin_submit();
        assert_eq!(
            submission,
            Submission::Started(PendingTurn {
                prompt: "hello".into()
            })
        );
        assert_eq!(session.messages(), &[Message::user("hello")]);
        assert!(session.is_loading());
        assert_eq!(session.state(), TurnState::Sending);
        // The buffer is only cleared once the request settles.
        assert_eq!(session.input(), "hello");
    }

    #[test]
    fn test_prompt_is_raw_input() {
        let mut session = session_with_input("  spaced out  ");
        match session.begin_submit() {
            Submission::Started(turn) => assert_eq!(turn.prompt, "  spaced out  "),
            other => panic!("unexpected submission: {other:?}"),
        }
        assert_eq!(session.messages()[0].text(), "  spaced out  ");
    }

    #[test]
    fn test_submit_while_loading_is_busy() {
        let mut session = session_with_input("first");
        assert!(matches!(session.begin_submit(), Submission::Started(_)));

        assert_eq!(session.begin_submit(), Submission::Busy);
        assert_eq!(session.messages().len(), 1);
        assert!(session.is_loading());
    }

    #[test]
    fn test_edit_ignored_while_loading() {
        let mut session = session_with_input("first");
        session.begin_submit();

        session.edit_input("second");
        assert_eq!(session.input(), "first");
    }

    #[test]
    fn test_complete_success() {
        let mut session = session_with_input("hello");
        session.begin_submit();

        let msg = session.complete(Ok(Some("hi there".into()))).clone();
        assert_eq!(msg, Message::bot("hi there"));
        assert_eq!(session.messages().len(), 2);
        assert!(!session.is_loading());
        assert_eq!(session.input(), "");
        assert_eq!(session.state(), TurnState::Idle);
    }

    #[test]
    fn test_complete_missing_or_empty_reply() {
        for reply in [None, Some(String::new())] {
            let mut session = session_with_input("hello");
            session.begin_submit();
            let msg = session.complete(Ok(reply));
            assert_eq!(msg.text(), "No response");
            assert_eq!(msg.sender(), Sender::Bot);
            assert!(msg.error().is_none());
        }
    }

    #[test]
    fn test_complete_failure() {
        let mut session = session_with_input("hello");
        session.begin_submit();

        let msg = session
            .complete(Err(RequestFailure::new("Network Error")))
            .clone();
        assert_eq!(msg.text(), "Something went wrong");
        assert_eq!(msg.error(), Some("Network Error"));
        assert_eq!(msg.sender(), Sender::Bot);
        assert!(!session.is_loading());
        assert_eq!(session.input(), "");
    }

    #[test]
    fn test_complete_failure_without_message() {
        let mut session = session_with_input("hello");
        session.begin_submit();

        let msg = session.complete(Err(RequestFailure::new("")));
        assert_eq!(msg.error(), Some("Unknown error"));
    }

    #[test]
    fn test_revision_bumps_at_each_mutation_point() {
        let mut session = ChatSession::new();
        let r0 = session.revision();

        session.edit_input("hello");
        let r1 = session.revision();
        assert!(r1 > r0);

        // Same text is not a change.
        session.edit_input("hello");
        assert_eq!(session.revision(), r1);

        session.begin_submit();
        let r2 = session.revision();
        assert_eq!(r2, r1 + 2);

        session.complete(Ok(Some("ok".into())));
        assert_eq!(session.revision(), r2 + 2);
    }

    #[test]
    fn test_messages_keep_arrival_order() {
        let mut session = ChatSession::new();
        for (prompt, reply) in [("one", "1"), ("two", "2")] {
            session.edit_input(prompt);
            session.begin_submit();
            session.complete(Ok(Some(reply.into())));
        }

        let texts: Vec<&str> = session.messages().iter().map(Message::text).collect();
        assert_eq!(texts, vec!["one", "1", "two", "2"]);
    }

    #[tokio::test]
    async fn test_submit_success_makes_one_call() {
        let backend = StubBackend::new(Ok(Some("hi there".into())));
        let mut session = session_with_input("hello");

        let submission = session.submit(&backend).await;
        assert!(matches!(submission, Submission::Started(_)));
        assert_eq!(backend.calls(), 1);
        assert_eq!(
            session.messages(),
            &[Message::user("hello"), Message::bot("hi there")]
        );
        assert!(!session.is_loading());
        assert_eq!(session.input(), "");
    }

    #[tokio::test]
    async fn test_submit_failure() {
        let backend = StubBackend::new(Err(RequestFailure::new("Network Error")));
        let mut session = session_with_input("hello");

        session.submit(&backend).await;
        assert_eq!(backend.calls(), 1);
        assert_eq!(session.messages()[1], Message::failure("Network Error"));
        assert_eq!(session.input(), "");
    }

    #[tokio::test]
    async fn test_submit_empty_makes_no_call() {
        let backend = StubBackend::new(Ok(Some("unused".into())));
        let mut session = session_with_input("   ");

        assert_eq!(session.submit(&backend).await, Submission::Empty);
        assert_eq!(backend.calls(), 0);
        assert!(session.messages().is_empty());
        assert_eq!(session.input(), "   ");
    }
}
