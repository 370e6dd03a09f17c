//! Exam-set sampler.
//!
//! Draws shape-constrained random subsets from the question bank. All
//! randomness comes from the `Rng` passed by the caller, so a seeded RNG
//! reproduces a set exactly.

use std::collections::HashSet;
use std::sync::{Arc, LazyLock};

use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;

use crate::bank::QuestionBank;
use crate::dedup::{question_key, unique_by_question};
use crate::error::ExamError;
use crate::exam::GeneratedSet;
use crate::model::Question;

/// Cross-topic subject composed from two tag/keyword filtered sub-pools.
pub const COMBINED_SUBJECT: &str = "Wildkrankheiten & Hunde";
/// Tag of the dog-handling sub-pool of [`COMBINED_SUBJECT`].
pub const DOG_TAG: &str = "hundewesen";
/// Tag of the wildlife-disease sub-pool of [`COMBINED_SUBJECT`].
pub const DISEASE_TAG: &str = "wildkrankheiten";

pub const DEFAULT_SET_SIZE: usize = 20;
pub const DEFAULT_MC_CAP: usize = 5;
pub const DEFAULT_COMPOSITE_SPLIT: usize = 10;
pub const DEFAULT_ALT_ANSWER_QUOTA: usize = 5;

static MC_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:wie lautet die korrekte antwort\?|welche aussage ist richtig\?|welche antwort ist richtig\?|was trifft zu\?|bitte wählen sie)",
    )
    .expect("valid MC pattern")
});

static DISEASE_KEYWORDS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)krank|seuche|parasiten|räude|staupe|trichinen")
        .expect("valid disease keyword pattern")
});

/// Shape constraints of generated sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerConfig {
    /// Questions per set.
    pub set_size: usize,
    /// Maximum multiple-choice-style questions per set (soft when open
    /// questions run out).
    pub mc_cap: usize,
    /// Questions drawn from each sub-pool of the combined subject.
    pub composite_split: usize,
    /// Questions with alternative answers drawn first in MC-subject sets.
    pub alt_answer_quota: usize,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            set_size: DEFAULT_SET_SIZE,
            mc_cap: DEFAULT_MC_CAP,
            composite_split: DEFAULT_COMPOSITE_SPLIT,
            alt_answer_quota: DEFAULT_ALT_ANSWER_QUOTA,
        }
    }
}

/// Whether a question's display text opens with a multiple-choice lead-in.
pub fn is_mc_style(question: &Question) -> bool {
    MC_STYLE.is_match(question.display_text().trim())
}

/// Whether a question belongs to the MC pool of its subject: it carries a
/// dedicated MC phrasing or reads as an MC question.
pub fn is_mc_tagged(question: &Question) -> bool {
    question.has_mc_text() || is_mc_style(question)
}

fn is_disease_related(question: &Question) -> bool {
    if question.has_tag(DISEASE_TAG) {
        return true;
    }
    let text = format!("{} {}", question.display_text(), question.answer);
    DISEASE_KEYWORDS.is_match(&text)
}

/// Draw `n` questions uniformly without replacement.
pub fn pick_n<'a, R: Rng + ?Sized>(pool: &[&'a Question], n: usize, rng: &mut R) -> Vec<&'a Question> {
    let mut copy = pool.to_vec();
    copy.shuffle(rng);
    copy.truncate(n);
    copy
}

/// Draw up to `total` questions, at most `mc_cap` of them MC-style while
/// open questions last, then backfill from whatever is left. The result is
/// shuffled so MC and open questions interleave.
pub fn pick_with_mc_cap<'a, R: Rng + ?Sized>(
    pool: &[&'a Question],
    total: usize,
    mc_cap: usize,
    rng: &mut R,
) -> Vec<&'a Question> {
    let (mut mc, mut open): (Vec<usize>, Vec<usize>) =
        (0..pool.len()).partition(|&i| is_mc_style(pool[i]));
    mc.shuffle(rng);
    open.shuffle(rng);

    let mut picked: Vec<usize> = mc.into_iter().take(mc_cap.min(total)).collect();
    let need_open = total - picked.len();
    picked.extend(open.into_iter().take(need_open));

    if picked.len() < total {
        let taken: HashSet<usize> = picked.iter().copied().collect();
        let mut rest: Vec<usize> = (0..pool.len()).filter(|i| !taken.contains(i)).collect();
        rest.shuffle(rng);
        let missing = total - picked.len();
        picked.extend(rest.into_iter().take(missing));
    }

    picked.shuffle(rng);
    picked.truncate(total);
    picked.into_iter().map(|i| pool[i]).collect()
}

/// Builds exam sets from a shared, read-only bank.
#[derive(Debug, Clone)]
pub struct ExamGenerator {
    bank: Arc<QuestionBank>,
    config: SamplerConfig,
}

impl ExamGenerator {
    pub fn new(bank: Arc<QuestionBank>, config: SamplerConfig) -> Self {
        Self { bank, config }
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Selectable subjects: the combined subject first, then the bank's
    /// subjects in sorted order.
    pub fn subjects(&self) -> Vec<String> {
        let mut subjects = vec![COMBINED_SUBJECT.to_string()];
        subjects.extend(
            self.bank
                .subjects()
                .into_iter()
                .filter(|s| s != COMBINED_SUBJECT),
        );
        subjects
    }

    /// Eligible, deduplicated questions of one subject, in bank order.
    pub fn eligible_pool(&self, subject: &str) -> Vec<&Question> {
        unique_by_question(self.bank.by_subject(subject).filter(|q| q.eligible))
    }

    /// Generate one exam set for `subject`.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        subject: &str,
        rng: &mut R,
    ) -> Result<GeneratedSet, ExamError> {
        if subject == COMBINED_SUBJECT {
            return self.generate_composite(rng);
        }

        let pool = self.eligible_pool(subject);
        let required = self.config.set_size;
        if pool.len() < required {
            return Err(ExamError::InsufficientPool {
                subject: subject.to_string(),
                available: pool.len(),
                required,
            });
        }

        let picked = pick_with_mc_cap(&pool, required, self.config.mc_cap, rng);
        tracing::debug!(subject, pool = pool.len(), "generated exam set");
        Ok(GeneratedSet::new(subject, picked.into_iter().cloned().collect()))
    }

    fn generate_composite<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<GeneratedSet, ExamError> {
        let split = self.config.composite_split;
        let eligible = || self.bank.questions().iter().filter(|q| q.eligible);

        let dogs = unique_by_question(eligible().filter(|q| q.has_tag(DOG_TAG)));
        let diseases = unique_by_question(eligible().filter(|q| is_disease_related(q)));
        for (label, available) in [(DOG_TAG, dogs.len()), (DISEASE_TAG, diseases.len())] {
            if available < split {
                return Err(ExamError::InsufficientPool {
                    subject: format!("{COMBINED_SUBJECT} ({label})"),
                    available,
                    required: split,
                });
            }
        }

        let picked_dogs = pick_n(&dogs, split, rng);
        let dog_keys: HashSet<String> = picked_dogs.iter().map(|q| question_key(q)).collect();
        let remaining: Vec<&Question> = diseases
            .into_iter()
            .filter(|q| !dog_keys.contains(&question_key(q)))
            .collect();
        if remaining.len() < split {
            return Err(ExamError::InsufficientPool {
                subject: format!("{COMBINED_SUBJECT} ({DISEASE_TAG})"),
                available: remaining.len(),
                required: split,
            });
        }

        let mut union = picked_dogs;
        union.extend(pick_n(&remaining, split, rng));
        union.shuffle(rng);

        let required = self.config.set_size;
        let picked = pick_with_mc_cap(&union, required, self.config.mc_cap, rng);
        if picked.len() < required {
            return Err(ExamError::InsufficientPool {
                subject: COMBINED_SUBJECT.to_string(),
                available: picked.len(),
                required,
            });
        }
        Ok(GeneratedSet::new(
            COMBINED_SUBJECT,
            picked.into_iter().cloned().collect(),
        ))
    }

    /// Generate a multiple-choice set for `subject`: questions with
    /// alternative answers first (up to the quota), the rest uniformly from
    /// the subject's MC pool.
    pub fn generate_mc_subject<R: Rng + ?Sized>(
        &self,
        subject: &str,
        rng: &mut R,
    ) -> Result<GeneratedSet, ExamError> {
        let pool: Vec<&Question> = self
            .eligible_pool(subject)
            .into_iter()
            .filter(|q| is_mc_tagged(q))
            .collect();
        let required = self.config.set_size;
        if pool.len() < required {
            return Err(ExamError::InsufficientPool {
                subject: subject.to_string(),
                available: pool.len(),
                required,
            });
        }

        let (mut with_alts, mut rest): (Vec<&Question>, Vec<&Question>) =
            pool.into_iter().partition(|q| q.has_alternatives());
        with_alts.shuffle(rng);
        let quota = self.config.alt_answer_quota.min(with_alts.len()).min(required);
        let mut picked: Vec<&Question> = with_alts.drain(..quota).collect();

        rest.extend(with_alts);
        rest.shuffle(rng);
        let missing = required - picked.len();
        picked.extend(rest.into_iter().take(missing));
        picked.shuffle(rng);

        Ok(GeneratedSet::new(subject, picked.into_iter().cloned().collect()))
    }

    /// One MC set per bank subject. The first subject that cannot fill a
    /// set aborts the batch.
    pub fn generate_mc_full<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<Vec<GeneratedSet>, ExamError> {
        self.bank
            .subjects()
            .iter()
            .map(|subject| self.generate_mc_subject(subject, rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures::question;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn open(subject: &str, i: usize) -> Question {
        question(subject, &format!("Offene Frage Nummer {i} zur Wildkunde"), "Antwort")
    }

    fn mc(subject: &str, i: usize) -> Question {
        question(
            subject,
            &format!("Welche Aussage ist richtig? Aussage Nummer {i}"),
            "Antwort",
        )
    }

    fn generator(questions: Vec<Question>) -> ExamGenerator {
        ExamGenerator::new(
            Arc::new(QuestionBank::new(questions).unwrap()),
            SamplerConfig::default(),
        )
    }

    fn keys(set: &GeneratedSet) -> HashSet<String> {
        set.questions.iter().map(question_key).collect()
    }

    #[test]
    fn mc_style_detection_is_anchored_and_case_insensitive() {
        assert!(is_mc_style(&mc("Wildkunde", 1)));
        assert!(is_mc_style(&question("W", "  bitte WÄHLEN Sie aus", "a")));
        assert!(!is_mc_style(&question("W", "Erkläre: Welche Aussage ist richtig?", "a")));
    }

    #[test]
    fn generate_respects_size_cap_and_uniqueness() {
        let mut questions: Vec<Question> = (0..12).map(|i| mc("Wildkunde", i)).collect();
        questions.extend((0..30).map(|i| open("Wildkunde", i)));
        // duplicates of the first open question
        questions.push(question("Wildkunde", "offene frage nummer 0 zur wildkunde?", "x"));
        let gen = generator(questions);
        let mut rng = StdRng::seed_from_u64(7);

        let set = gen.generate("Wildkunde", &mut rng).unwrap();
        assert_eq!(set.subject, "Wildkunde");
        assert_eq!(set.questions.len(), 20);
        assert_eq!(set.mc_count(), 5);
        assert_eq!(keys(&set).len(), 20);
    }

    #[test]
    fn seeded_rng_reproduces_and_unseeded_varies() {
        let mut questions: Vec<Question> = (0..10).map(|i| mc("Wildkunde", i)).collect();
        questions.extend((0..40).map(|i| open("Wildkunde", i)));
        let gen = generator(questions);

        let a = gen.generate("Wildkunde", &mut StdRng::seed_from_u64(1)).unwrap();
        let b = gen.generate("Wildkunde", &mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(a.questions, b.questions);

        let c = gen.generate("Wildkunde", &mut rand::thread_rng()).unwrap();
        let d = gen.generate("Wildkunde", &mut rand::thread_rng()).unwrap();
        assert_ne!(c.questions, d.questions);
    }

    #[test]
    fn pool_of_size_n_minus_one_is_insufficient() {
        let gen = generator((0..19).map(|i| open("Wildkunde", i)).collect());
        let err = gen
            .generate("Wildkunde", &mut StdRng::seed_from_u64(0))
            .unwrap_err();
        assert!(matches!(
            err,
            ExamError::InsufficientPool {
                available: 19,
                required: 20,
                ..
            }
        ));
    }

    #[test]
    fn ineligible_and_duplicate_questions_do_not_count() {
        let mut questions: Vec<Question> = (0..19).map(|i| open("Wildkunde", i)).collect();
        let mut hidden = open("Wildkunde", 99);
        hidden.eligible = false;
        questions.push(hidden);
        questions.push(question("Wildkunde", "Offene Frage Nummer 3 zur Wildkunde!", "x"));
        let gen = generator(questions);
        assert!(gen.generate("Wildkunde", &mut StdRng::seed_from_u64(0)).is_err());
    }

    #[test]
    fn backfill_with_mc_when_open_questions_run_short() {
        let mut questions: Vec<Question> = (0..15).map(|i| mc("Wildkunde", i)).collect();
        questions.extend((0..8).map(|i| open("Wildkunde", i)));
        let gen = generator(questions);

        let set = gen.generate("Wildkunde", &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(set.questions.len(), 20);
        assert_eq!(set.mc_count(), 12);
        assert_eq!(keys(&set).len(), 20);
    }

    #[test]
    fn result_interleaves_mc_and_open() {
        let mut questions: Vec<Question> = (0..5).map(|i| mc("Wildkunde", i)).collect();
        questions.extend((0..15).map(|i| open("Wildkunde", i)));
        let gen = generator(questions);

        // with a fresh shuffle the five MC questions are practically never
        // the leading block on every one of several draws
        let mut rng = StdRng::seed_from_u64(11);
        let block_ordered = (0..5)
            .map(|_| gen.generate("Wildkunde", &mut rng).unwrap())
            .all(|set| set.questions[..5].iter().all(is_mc_style));
        assert!(!block_ordered);
    }

    fn composite_bank(dogs: usize, diseases: usize) -> Vec<Question> {
        let mut questions = Vec::new();
        for i in 0..dogs {
            let mut q = question("Hundewesen", &format!("Hundefrage {i} zum Apportieren"), "a");
            q.tags = vec![DOG_TAG.into()];
            questions.push(q);
        }
        for i in 0..diseases {
            // half by tag, half by keyword only
            let mut q = if i % 2 == 0 {
                question("Wildkunde", &format!("Frage {i} zu Wildtieren"), "a")
            } else {
                question("Wildkunde", &format!("Welche Seuche Nummer {i} ist meldepflichtig?"), "a")
            };
            if i % 2 == 0 {
                q.tags = vec![DISEASE_TAG.into()];
            }
            questions.push(q);
        }
        questions
    }

    #[test]
    fn composite_draws_from_both_sub_pools() {
        let gen = generator(composite_bank(14, 14));
        let set = gen
            .generate(COMBINED_SUBJECT, &mut StdRng::seed_from_u64(5))
            .unwrap();

        assert_eq!(set.subject, COMBINED_SUBJECT);
        assert_eq!(set.questions.len(), 20);
        let dogs = set.questions.iter().filter(|q| q.has_tag(DOG_TAG)).count();
        assert_eq!(dogs, 10);
        assert_eq!(keys(&set).len(), 20);
    }

    #[test]
    fn composite_requires_minimum_per_sub_pool() {
        let gen = generator(composite_bank(9, 30));
        let err = gen
            .generate(COMBINED_SUBJECT, &mut StdRng::seed_from_u64(5))
            .unwrap_err();
        assert!(err.to_string().contains(DOG_TAG), "{err}");
    }

    #[test]
    fn composite_keyword_match_uses_answer_text() {
        let q = question("Wildkunde", "Was verursacht Trichinen?", "Fadenwürmer");
        assert!(is_disease_related(&q));
        let q = question("Wildkunde", "Welche Erkrankung?", "Räude");
        assert!(is_disease_related(&q));
        let q = question("Wildkunde", "Wie schwer wird ein Keiler?", "150 kg");
        assert!(!is_disease_related(&q));
    }

    fn overlapping_composite_bank() -> Vec<Question> {
        let dog = |prompt: String| {
            let mut q = question("Hundewesen", &prompt, "a");
            q.tags = vec![DOG_TAG.into()];
            q
        };
        let mut questions = Vec::new();
        questions.extend((0..8).map(|i| dog(format!("Hundefrage {i} zum Apportieren"))));
        // dog-tagged and disease-related by keyword
        questions.extend((0..4).map(|i| dog(format!("Hundefrage {i} zur Räude"))));
        questions.push(dog("Welche Aussage ist richtig? Räude beim Jagdhund".into()));
        questions.extend((0..2).map(|i| dog(format!("Welche Aussage ist richtig? Hund Nummer {i}"))));
        questions.extend((0..10).map(|i| {
            question("Wildkunde", &format!("Welche Seuche Nummer {i} ist meldepflichtig?"), "a")
        }));
        questions.extend((0..2).map(|i| question("Wildkunde", &format!("Was trifft zu? Staupe Nummer {i}"), "a")));
        questions
    }

    #[test]
    fn composite_never_repeats_questions_shared_by_both_sub_pools() {
        let gen = generator(overlapping_composite_bank());
        for seed in 0..25 {
            let set = gen
                .generate(COMBINED_SUBJECT, &mut StdRng::seed_from_u64(seed))
                .unwrap();
            assert_eq!(set.questions.len(), 20, "seed {seed}");
            assert_eq!(keys(&set).len(), 20, "seed {seed}");
            assert!(set.mc_count() <= DEFAULT_MC_CAP, "seed {seed}");
            let dogs = set.questions.iter().filter(|q| q.has_tag(DOG_TAG)).count();
            assert!(dogs >= 10, "seed {seed}");
        }
    }

    #[test]
    fn eligible_pool_does_not_borrow_the_subject() {
        let gen = generator(vec![
            open("Wildkunde", 1),
            open("Wildkunde", 2),
            open("Jagdrecht", 3),
        ]);
        let pool = gen.eligible_pool(&format!("Wild{}", "kunde"));
        assert_eq!(pool.len(), 2);
        assert!(pool.iter().all(|q| q.subject == "Wildkunde"));
    }

    #[test]
    fn subjects_list_combined_first() {
        let gen = generator(vec![
            open("Wildkunde", 1),
            open("Jagdrecht", 1),
            open("Waffenkunde", 1),
        ]);
        assert_eq!(
            gen.subjects(),
            vec![COMBINED_SUBJECT, "Jagdrecht", "Waffenkunde", "Wildkunde"]
        );
    }

    #[test]
    fn mc_subject_takes_alternative_quota_first() {
        let mut questions = Vec::new();
        for i in 0..8 {
            let mut q = mc("Wildkunde", i);
            q.alternative_answers = vec![format!("Variante {i}")];
            questions.push(q);
        }
        questions.extend((100..130).map(|i| mc("Wildkunde", i)));
        // open questions without MC phrasing never enter MC sets
        questions.extend((0..10).map(|i| open("Wildkunde", i)));
        let gen = generator(questions);

        let set = gen
            .generate_mc_subject("Wildkunde", &mut StdRng::seed_from_u64(9))
            .unwrap();
        assert_eq!(set.questions.len(), 20);
        assert!(set.questions.iter().all(is_mc_tagged));
        let with_alts = set.questions.iter().filter(|q| q.has_alternatives()).count();
        assert!(with_alts >= 5, "expected at least the quota, got {with_alts}");
    }

    #[test]
    fn mc_subject_counts_dedicated_mc_phrasing() {
        let questions = (0..20)
            .map(|i| {
                let mut q = open("Jagdrecht", i);
                q.mc_text = Some(format!("Was trifft zu? Variante {i}"));
                q
            })
            .collect();
        let gen = generator(questions);
        let set = gen
            .generate_mc_subject("Jagdrecht", &mut StdRng::seed_from_u64(2))
            .unwrap();
        assert_eq!(set.questions.len(), 20);
    }

    #[test]
    fn mc_full_builds_one_set_per_subject_or_fails() {
        let mut questions: Vec<Question> = (0..20).map(|i| mc("Wildkunde", i)).collect();
        questions.extend((0..25).map(|i| mc("Jagdrecht", i)));
        let gen = generator(questions.clone());

        let sets = gen.generate_mc_full(&mut StdRng::seed_from_u64(4)).unwrap();
        let subjects: Vec<&str> = sets.iter().map(|s| s.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Jagdrecht", "Wildkunde"]);

        questions.push(open("Waffenkunde", 1));
        let gen = generator(questions);
        let err = gen.generate_mc_full(&mut StdRng::seed_from_u64(4)).unwrap_err();
        assert!(err.to_string().contains("Waffenkunde"));
    }

    #[test]
    fn pick_with_mc_cap_on_short_pool_returns_everything() {
        let questions: Vec<Question> = (0..3).map(|i| open("W", i)).collect();
        let pool: Vec<&Question> = questions.iter().collect();
        let picked = pick_with_mc_cap(&pool, 20, 5, &mut StdRng::seed_from_u64(0));
        assert_eq!(picked.len(), 3);
    }
}
