//! Side effects fired after a reading interval is accepted.

use crate::library::model::{BookRecord, ReaderRecord, Submission};

/// Receives every accepted submission.
pub trait SubmissionNotifier: Send + Sync {
    fn submitted(&self, reader: &ReaderRecord, book: &BookRecord, submission: &Submission);
}

/// Emits a thank-you message as a structured log event.
#[derive(Debug, Clone, Default)]
pub struct TracingNotifier;

impl SubmissionNotifier for TracingNotifier {
    fn submitted(&self, reader: &ReaderRecord, book: &BookRecord, submission: &Submission) {
        tracing::info!(
            reader = %reader.id,
            email = %reader.email,
            book = %book.id,
            interval = submission.id,
            note = %thank_you_message(reader, book),
            "interval submitted"
        );
    }
}

/// Does nothing.
#[derive(Debug, Clone, Default)]
pub struct NoopNotifier;

impl SubmissionNotifier for NoopNotifier {
    fn submitted(&self, _: &ReaderRecord, _: &BookRecord, _: &Submission) {}
}

/// The message a reader receives after submitting an interval.
pub fn thank_you_message(reader: &ReaderRecord, book: &BookRecord) -> String {
    format!(
        "Dear {}, thank you for submitting a reading interval for \"{}\".",
        reader.name, book.title
    )
}
