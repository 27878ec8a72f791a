use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::data::model::{Question, ResultMap};

/// Working-list derivation strategy. Persisted in the session snapshot,
/// so the wire names are stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    Normal,
    WrongOnly,
    Shuffle,
}

impl Default for Mode {
    fn default() -> Self {
        Mode::Normal
    }
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Normal => "normal",
            Mode::WrongOnly => "wrong-only",
            Mode::Shuffle => "shuffle",
        }
    }
}

/// Derive the working list for `mode` as indices into `questions`.
///
/// `normal` is the full sequence in dataset order, `wrong-only` keeps only
/// questions whose last recorded verdict is incorrect (never-attempted
/// questions are excluded), and `shuffle` draws a fresh uniform permutation
/// on every call. The first two are pure functions of their inputs; shuffle
/// is intentionally non-deterministic so restudy order varies.
pub fn build(
    questions: &[Question],
    mode: Mode,
    results: &ResultMap,
    rng: &mut impl Rng,
) -> Vec<usize> {
    match mode {
        Mode::Normal => (0..questions.len()).collect(),
        Mode::WrongOnly => questions
            .iter()
            .enumerate()
            .filter(|(_, q)| results.get(&q.question_id) == Some(&false))
            .map(|(i, _)| i)
            .collect(),
        Mode::Shuffle => {
            let mut indices: Vec<usize> = (0..questions.len()).collect();
            indices.shuffle(rng);
            indices
        }
    }
}
