//! jagdkurs-core: question bank, exam-set sampling, and answer evaluation.
//!
//! This crate holds the data model and the two algorithmic halves of the
//! system: the set sampler (bank → deduplicated pool → shaped exam set) and
//! the evaluation pipeline (heuristic scorer with an optional remote judge).

pub mod bank;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod exam;
pub mod followup;
pub mod heuristic;
pub mod model;
pub mod parser;
pub mod sampler;
pub mod statistics;
pub mod traits;

pub use bank::QuestionBank;
pub use engine::{Evaluator, JudgeSettings};
pub use error::{ExamError, JudgeError};
pub use exam::GeneratedSet;
pub use followup::FollowupResponder;
pub use model::{EvalMode, EvaluationResult, FollowupAnswer, FollowupMode, Question, Score};
pub use sampler::{ExamGenerator, SamplerConfig, COMBINED_SUBJECT};
