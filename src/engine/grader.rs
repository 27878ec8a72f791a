use std::collections::BTreeSet;

use thiserror::Error;

use crate::data::model::{Explanation, Question};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SubmitError {
    /// Validation condition: recoverable, no state is mutated.
    #[error("no answer selected")]
    EmptySelection,
    /// The working list is empty, so there is nothing to grade.
    #[error("no question is currently shown")]
    NoQuestion,
    /// Data-integrity fault: the dataset pairing is corrupt. Never masked
    /// as an incorrect verdict.
    #[error("no explanation found for question {0}")]
    MissingExplanation(String),
}

/// Compare a submitted label set against the correct-answer key.
///
/// Correct iff the two label *sets* are equal: order and duplicates in the
/// submission never affect the verdict. Pure; recording the verdict is the
/// session's job.
pub fn grade(
    question: &Question,
    submitted: &[String],
    explanation: Option<&Explanation>,
) -> Result<bool, SubmitError> {
    if submitted.is_empty() {
        return Err(SubmitError::EmptySelection);
    }
    let explanation =
        explanation.ok_or_else(|| SubmitError::MissingExplanation(question.question_id.clone()))?;

    let submitted: BTreeSet<&str> = submitted.iter().map(String::as_str).collect();
    let correct: BTreeSet<&str> = explanation
        .correct_answers
        .iter()
        .map(String::as_str)
        .collect();
    Ok(submitted == correct)
}
