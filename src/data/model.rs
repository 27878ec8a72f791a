use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Last-known verdict per question id (true = last attempt correct).
/// Insert/overwrite only; cleared only by an explicit start-over.
pub type ResultMap = BTreeMap<String, bool>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerKind {
    Single,
    Multiple,
}

impl Default for AnswerKind {
    fn default() -> Self {
        AnswerKind::Single
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Choice {
    pub label: String,
    pub text: String,
}

/// One quiz question. Field names match the JSON dataset format
/// (`questions.json`), so existing datasets load without conversion.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Question {
    pub question_id: String,
    pub question_text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub answer_type: AnswerKind,
    /// Declared number of correct labels; only meaningful for `multiple`.
    #[serde(default)]
    pub answer_count: Option<usize>,
    pub choices: Vec<Choice>,
}

impl Question {
    /// UI hint appended to the prompt for multi-select questions.
    pub fn selection_hint(&self) -> Option<String> {
        match self.answer_type {
            AnswerKind::Multiple => {
                let n = self.answer_count.unwrap_or(2);
                Some(format!("(select {n})"))
            }
            AnswerKind::Single => None,
        }
    }
}

/// Answer key + explanation for one question (`explanations.json`).
/// Pairs 1:1 with a `Question` by id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Explanation {
    pub question_id: String,
    pub correct_answers: Vec<String>,
    #[serde(default)]
    pub explanation_text: String,
}
