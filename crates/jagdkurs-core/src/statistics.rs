//! Per-subject bank statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bank::QuestionBank;
use crate::dedup::unique_by_question;
use crate::sampler::is_mc_style;

/// Counts for one subject partition.
///
/// `mc_style` and `open` are counted over the deduplicated eligible pool,
/// i.e. what the sampler actually draws from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectStats {
    pub subject: String,
    pub total: usize,
    pub eligible: usize,
    pub unique: usize,
    pub mc_style: usize,
    pub open: usize,
    pub with_alternatives: usize,
    /// Eligible questions dropped by deduplication.
    pub duplicates: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankStats {
    pub total_questions: usize,
    pub subjects: Vec<SubjectStats>,
}

impl BankStats {
    pub fn subject(&self, name: &str) -> Option<&SubjectStats> {
        self.subjects.iter().find(|s| s.subject == name)
    }
}

/// Compute statistics for every subject in the bank, sorted by name.
pub fn bank_stats(bank: &QuestionBank) -> BankStats {
    let mut grouped: BTreeMap<&str, Vec<_>> = BTreeMap::new();
    for q in bank.questions() {
        grouped.entry(q.subject.as_str()).or_default().push(q);
    }

    let subjects = grouped
        .into_iter()
        .map(|(subject, questions)| {
            let eligible: Vec<_> = questions.iter().copied().filter(|q| q.eligible).collect();
            let unique = unique_by_question(eligible.iter().copied());
            let mc_style = unique.iter().filter(|q| is_mc_style(q)).count();

            SubjectStats {
                subject: subject.to_string(),
                total: questions.len(),
                eligible: eligible.len(),
                unique: unique.len(),
                mc_style,
                open: unique.len() - mc_style,
                with_alternatives: questions.iter().filter(|q| q.has_alternatives()).count(),
                duplicates: eligible.len() - unique.len(),
            }
        })
        .collect();

    BankStats {
        total_questions: bank.len(),
        subjects,
    }
}
