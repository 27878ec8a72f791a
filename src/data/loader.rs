use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::data::model::{Explanation, Question};

// Bundled sample dataset so the binary runs with no configuration.
const SAMPLE_QUESTIONS: &str = include_str!("../../assets/questions.json");
const SAMPLE_EXPLANATIONS: &str = include_str!("../../assets/explanations.json");

/// Immutable question + answer-key collections, loaded once at startup.
/// A load failure here is fatal for the session: there is no quiz to show
/// without the dataset.
#[derive(Debug)]
pub struct Dataset {
    questions: Vec<Question>,
    explanations: HashMap<String, Explanation>,
}

impl Dataset {
    /// Load from the given JSON files, or from the bundled sample dataset
    /// when no overrides are set. The two files pair by question id, so a
    /// lone override is rejected: mixing a user file with half of the
    /// sample would only surface later as grading-time data faults.
    pub fn load(questions_path: Option<&Path>, explanations_path: Option<&Path>) -> Result<Self> {
        let (questions, explanations): (Vec<Question>, Vec<Explanation>) =
            match (questions_path, explanations_path) {
                (Some(q_path), Some(e_path)) => {
                    let content = fs::read_to_string(q_path).with_context(|| {
                        format!("failed to read questions from {}", q_path.display())
                    })?;
                    let questions = serde_json::from_str(&content).with_context(|| {
                        format!("failed to parse questions in {}", q_path.display())
                    })?;
                    let content = fs::read_to_string(e_path).with_context(|| {
                        format!("failed to read explanations from {}", e_path.display())
                    })?;
                    let explanations = serde_json::from_str(&content).with_context(|| {
                        format!("failed to parse explanations in {}", e_path.display())
                    })?;
                    (questions, explanations)
                }
                (None, None) => (
                    serde_json::from_str(SAMPLE_QUESTIONS)
                        .context("failed to parse bundled questions")?,
                    serde_json::from_str(SAMPLE_EXPLANATIONS)
                        .context("failed to parse bundled explanations")?,
                ),
                _ => bail!(
                    "questions and explanations paths must be provided together"
                ),
            };

        Self::from_parts(questions, explanations)
    }

    /// Validate and index the collections. Duplicate question ids and an
    /// empty question set are rejected here; a question with no matching
    /// explanation is not — that pairing fault surfaces at grading time.
    pub fn from_parts(questions: Vec<Question>, explanations: Vec<Explanation>) -> Result<Self> {
        if questions.is_empty() {
            bail!("dataset contains no questions");
        }

        let mut seen = HashSet::new();
        for q in &questions {
            if !seen.insert(q.question_id.as_str()) {
                bail!("duplicate question id: {}", q.question_id);
            }
        }

        let explanations = explanations
            .into_iter()
            .map(|ex| (ex.question_id.clone(), ex))
            .collect();

        Ok(Self {
            questions,
            explanations,
        })
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

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn explanation(&self, question_id: &str) -> Option<&Explanation> {
        self.explanations.get(question_id)
    }

    /// Position of a question id in original dataset order.
    pub fn position_of(&self, question_id: &str) -> Option<usize> {
        self.questions
            .iter()
            .position(|q| q.question_id == question_id)
    }
}
