//! The process-wide, read-only question bank.

use std::collections::BTreeSet;

use crate::error::ExamError;
use crate::model::Question;

/// An ordered, immutable collection of questions.
///
/// Built once at startup and shared (typically as `Arc<QuestionBank>`)
/// with the sampler. There is no way to mutate it after construction.
#[derive(Debug, Clone, Default)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    /// Build a bank, rejecting records that break the record invariants.
    pub fn new(questions: Vec<Question>) -> Result<Self, ExamError> {
        for (idx, q) in questions.iter().enumerate() {
            if q.subject.trim().is_empty() {
                return Err(ExamError::Validation(format!(
                    "question #{idx} has an empty subject label"
                )));
            }
            if q.answer.trim().is_empty() {
                return Err(ExamError::Validation(format!(
                    "question #{idx} has no canonical answer"
                )));
            }
        }
        Ok(Self { questions })
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// All questions of one subject partition, in bank order.
    pub fn by_subject(&self, subject: &str) -> impl Iterator<Item = &Question> + '_ {
        let subject = subject.to_string();
        self.questions.iter().filter(move |q| q.subject == subject)
    }

    /// Distinct subject labels, sorted.
    pub fn subjects(&self) -> Vec<String> {
        self.questions
            .iter()
            .map(|q| q.subject.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}
