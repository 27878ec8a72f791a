use crate::data::model::ResultMap;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreSummary {
    pub correct: usize,
    pub incorrect: usize,
    /// Rounded percentage of the *full dataset* answered correctly, so the
    /// number reads as overall mastery regardless of the active mode.
    pub percent: u32,
}

/// Aggregate the result map. Questions with no recorded verdict count
/// toward neither bucket.
pub fn summarize(results: &ResultMap, total_questions: usize) -> ScoreSummary {
    let correct = results.values().filter(|v| **v).count();
    let incorrect = results.len() - correct;
    let percent = if total_questions == 0 {
        0
    } else {
        (correct as f64 / total_questions as f64 * 100.0).round() as u32
    };
    ScoreSummary {
        correct,
        incorrect,
        percent,
    }
}
