use rand::Rng;

use crate::data::loader::Dataset;
use crate::data::model::{Question, ResultMap};
use crate::engine::grader::{self, SubmitError};
use crate::engine::list::{self, Mode};
use crate::store::schema::SessionSnapshot;

/// The quiz session: active mode, working list, position, and accumulated
/// verdicts. All mutation goes through the transition methods below; the
/// app layer persists a snapshot after each one.
///
/// Position is `None` when the working list is empty (wrong-only with
/// nothing wrong). That is the "no question available" state, not an error.
pub struct SessionState {
    mode: Mode,
    working: Vec<usize>,
    position: Option<usize>,
    results: ResultMap,
    last_viewed: Option<String>,
}

impl SessionState {
    pub fn new(dataset: &Dataset, rng: &mut impl Rng) -> Self {
        let working = list::build(dataset.questions(), Mode::Normal, &ResultMap::new(), rng);
        let position = if working.is_empty() { None } else { Some(0) };
        let mut session = Self {
            mode: Mode::Normal,
            working,
            position,
            results: ResultMap::new(),
            last_viewed: None,
        };
        session.sync_last_viewed(dataset);
        session
    }

    /// Restore from a persisted snapshot. The working list is rebuilt from
    /// scratch, so the saved index is clamped against the current list
    /// length; a stale index never escapes this constructor.
    pub fn from_snapshot(dataset: &Dataset, snapshot: SessionSnapshot, rng: &mut impl Rng) -> Self {
        let working = list::build(dataset.questions(), snapshot.mode, &snapshot.results, rng);
        let position = if working.is_empty() {
            None
        } else {
            Some(snapshot.current_index.min(working.len() - 1))
        };
        Self {
            mode: snapshot.mode,
            working,
            position,
            results: snapshot.results,
            last_viewed: snapshot.last_viewed,
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            results: self.results.clone(),
            current_index: self.position.unwrap_or(0),
            last_viewed: self.last_viewed.clone(),
            ..SessionSnapshot::default()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn results(&self) -> &ResultMap {
        &self.results
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn list_len(&self) -> usize {
        self.working.len()
    }

    pub fn last_viewed(&self) -> Option<&str> {
        self.last_viewed.as_deref()
    }

    pub fn current_question<'a>(&self, dataset: &'a Dataset) -> Option<&'a Question> {
        let pos = self.position?;
        dataset.question(*self.working.get(pos)?)
    }

    pub fn can_advance(&self) -> bool {
        matches!(self.position, Some(p) if p + 1 < self.working.len())
    }

    pub fn can_retreat(&self) -> bool {
        matches!(self.position, Some(p) if p > 0)
    }

    /// Move to the next question. Saturates at the end of the list; the
    /// caller disables the affordance via `can_advance` instead of
    /// treating the no-op as an error.
    pub fn advance(&mut self, dataset: &Dataset) {
        if self.can_advance() {
            self.position = self.position.map(|p| p + 1);
            self.sync_last_viewed(dataset);
        }
    }

    pub fn retreat(&mut self, dataset: &Dataset) {
        if self.can_retreat() {
            self.position = self.position.map(|p| p - 1);
            self.sync_last_viewed(dataset);
        }
    }

    /// Activate a mode: rebuild the working list and reset the position to
    /// its start. Accumulated results are always preserved; only
    /// `start_over` clears them. Re-selecting `shuffle` draws a fresh
    /// permutation.
    pub fn switch_mode(&mut self, mode: Mode, dataset: &Dataset, rng: &mut impl Rng) {
        self.mode = mode;
        self.working = list::build(dataset.questions(), mode, &self.results, rng);
        self.position = if self.working.is_empty() { None } else { Some(0) };
        self.sync_last_viewed(dataset);
    }

    /// Explicit fresh start: clear all verdicts and return to the top of
    /// the normal-order list.
    pub fn start_over(&mut self, dataset: &Dataset, rng: &mut impl Rng) {
        self.results.clear();
        self.last_viewed = None;
        self.switch_mode(Mode::Normal, dataset, rng);
    }

    /// Jump back to the last-viewed question in normal mode. A no-op when
    /// nothing was viewed yet or the question is gone from the dataset.
    pub fn resume(&mut self, dataset: &Dataset, rng: &mut impl Rng) {
        let Some(pos) = self
            .last_viewed
            .as_deref()
            .and_then(|id| dataset.position_of(id))
        else {
            return;
        };
        self.mode = Mode::Normal;
        self.working = list::build(dataset.questions(), Mode::Normal, &self.results, rng);
        self.position = Some(pos);
    }

    /// Grade a submission for the current question and record the verdict
    /// (overwriting any prior one). In wrong-only mode a correct answer
    /// changes list membership, so the list is rebuilt and the position
    /// clamped; an emptied list parks the session in the
    /// no-question-available state.
    ///
    /// Errors leave the session untouched: an empty selection is a
    /// validation condition and a missing explanation is a data-integrity
    /// fault, surfaced to the caller rather than recorded as incorrect.
    pub fn submit(
        &mut self,
        dataset: &Dataset,
        submitted: &[String],
        rng: &mut impl Rng,
    ) -> Result<bool, SubmitError> {
        let question = self
            .current_question(dataset)
            .ok_or(SubmitError::NoQuestion)?;
        let question_id = question.question_id.clone();
        let explanation = dataset.explanation(&question_id);
        let correct = grader::grade(question, submitted, explanation)?;

        self.results.insert(question_id.clone(), correct);
        self.last_viewed = Some(question_id);

        if self.mode == Mode::WrongOnly {
            self.working = list::build(dataset.questions(), self.mode, &self.results, rng);
            self.position = if self.working.is_empty() {
                None
            } else {
                self.position.map(|p| p.min(self.working.len() - 1))
            };
        }

        Ok(correct)
    }

    fn sync_last_viewed(&mut self, dataset: &Dataset) {
        if let Some(q) = self.current_question(dataset) {
            self.last_viewed = Some(q.question_id.clone());
        }
    }

    #[cfg(test)]
    pub(crate) fn working_list(&self) -> &[usize] {
        &self.working
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{AnswerKind, Choice, Explanation};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn dataset(ids: &[&str]) -> Dataset {
        let questions = ids
            .iter()
            .map(|id| Question {
                question_id: id.to_string(),
                question_text: format!("question {id}"),
                image: None,
                answer_type: AnswerKind::Single,
                answer_count: None,
                choices: vec![
                    Choice {
                        label: "A".to_string(),
                        text: "right".to_string(),
                    },
                    Choice {
                        label: "B".to_string(),
                        text: "wrong".to_string(),
                    },
                ],
            })
            .collect();
        let explanations = ids
            .iter()
            .map(|id| Explanation {
                question_id: id.to_string(),
                correct_answers: vec!["A".to_string()],
                explanation_text: String::new(),
            })
            .collect();
        Dataset::from_parts(questions, explanations).unwrap()
    }

    fn rng() -> SmallRng {
        SmallRng::seed_from_u64(0)
    }

    fn answer(label: &str) -> Vec<String> {
        vec![label.to_string()]
    }

    #[test]
    fn new_session_starts_at_position_zero() {
        let ds = dataset(&["q1", "q2", "q3"]);
        let session = SessionState::new(&ds, &mut rng());
        assert_eq!(session.mode(), Mode::Normal);
        assert_eq!(session.position(), Some(0));
        assert_eq!(session.list_len(), 3);
        assert_eq!(session.last_viewed(), Some("q1"));
    }

    #[test]
    fn advance_saturates_at_last_position() {
        let ds = dataset(&["q1", "q2"]);
        let mut session = SessionState::new(&ds, &mut rng());
        session.advance(&ds);
        assert_eq!(session.position(), Some(1));
        assert!(!session.can_advance());
        session.advance(&ds);
        assert_eq!(session.position(), Some(1));
    }

    #[test]
    fn retreat_floors_at_zero() {
        let ds = dataset(&["q1", "q2"]);
        let mut session = SessionState::new(&ds, &mut rng());
        assert!(!session.can_retreat());
        session.retreat(&ds);
        assert_eq!(session.position(), Some(0));
    }

    #[test]
    fn navigation_tracks_last_viewed() {
        let ds = dataset(&["q1", "q2", "q3"]);
        let mut session = SessionState::new(&ds, &mut rng());
        session.advance(&ds);
        session.advance(&ds);
        assert_eq!(session.last_viewed(), Some("q3"));
        session.retreat(&ds);
        assert_eq!(session.last_viewed(), Some("q2"));
    }

    #[test]
    fn submit_records_verdict_and_overwrites() {
        let ds = dataset(&["q1", "q2"]);
        let mut session = SessionState::new(&ds, &mut rng());
        assert_eq!(session.submit(&ds, &answer("B"), &mut rng()), Ok(false));
        assert_eq!(session.results().get("q1"), Some(&false));
        // Second attempt overwrites
        assert_eq!(session.submit(&ds, &answer("A"), &mut rng()), Ok(true));
        assert_eq!(session.results().get("q1"), Some(&true));
        assert_eq!(session.results().len(), 1);
    }

    #[test]
    fn empty_submission_mutates_nothing() {
        let ds = dataset(&["q1"]);
        let mut session = SessionState::new(&ds, &mut rng());
        assert_eq!(
            session.submit(&ds, &[], &mut rng()),
            Err(SubmitError::EmptySelection)
        );
        assert!(session.results().is_empty());
    }

    #[test]
    fn missing_explanation_surfaces_as_error_not_verdict() {
        let questions = vec![Question {
            question_id: "q1".to_string(),
            question_text: String::new(),
            image: None,
            answer_type: AnswerKind::Single,
            answer_count: None,
            choices: vec![Choice {
                label: "A".to_string(),
                text: String::new(),
            }],
        }];
        let ds = Dataset::from_parts(questions, Vec::new()).unwrap();
        let mut session = SessionState::new(&ds, &mut rng());
        assert_eq!(
            session.submit(&ds, &answer("A"), &mut rng()),
            Err(SubmitError::MissingExplanation("q1".to_string()))
        );
        assert!(session.results().is_empty());
    }

    #[test]
    fn switch_mode_preserves_results_and_resets_position() {
        let ds = dataset(&["q1", "q2", "q3"]);
        let mut session = SessionState::new(&ds, &mut rng());
        session.submit(&ds, &answer("B"), &mut rng()).unwrap();
        session.advance(&ds);

        session.switch_mode(Mode::Normal, &ds, &mut rng());
        assert_eq!(session.position(), Some(0));
        assert_eq!(session.results().get("q1"), Some(&false));
    }

    #[test]
    fn start_over_clears_results() {
        let ds = dataset(&["q1", "q2"]);
        let mut session = SessionState::new(&ds, &mut rng());
        session.submit(&ds, &answer("B"), &mut rng()).unwrap();
        session.start_over(&ds, &mut rng());
        assert!(session.results().is_empty());
        assert_eq!(session.mode(), Mode::Normal);
        assert_eq!(session.position(), Some(0));
    }

    #[test]
    fn wrong_only_list_shrinks_when_answered_correctly() {
        let ds = dataset(&["q1", "q2", "q3", "q4"]);
        let mut session = SessionState::new(&ds, &mut rng());
        // Mark q2 and q3 wrong
        session.advance(&ds);
        session.submit(&ds, &answer("B"), &mut rng()).unwrap();
        session.advance(&ds);
        session.submit(&ds, &answer("B"), &mut rng()).unwrap();

        session.switch_mode(Mode::WrongOnly, &ds, &mut rng());
        assert_eq!(session.working_list(), &[1, 2]);
        assert_eq!(session.position(), Some(0));

        // Answer q2 correctly: it leaves the list, position clamps onto q3
        session.submit(&ds, &answer("A"), &mut rng()).unwrap();
        assert_eq!(session.working_list(), &[2]);
        assert_eq!(session.position(), Some(0));
        assert_eq!(
            session.current_question(&ds).unwrap().question_id,
            "q3"
        );

        // Answer q3 correctly too: list empties, session goes idle
        session.submit(&ds, &answer("A"), &mut rng()).unwrap();
        assert_eq!(session.list_len(), 0);
        assert_eq!(session.position(), None);
        assert!(session.current_question(&ds).is_none());
        // Mode is kept; completion is signalled by the empty list
        assert_eq!(session.mode(), Mode::WrongOnly);
    }

    #[test]
    fn wrong_only_with_no_wrong_answers_is_idle() {
        let ds = dataset(&["q1", "q2"]);
        let mut session = SessionState::new(&ds, &mut rng());
        session.switch_mode(Mode::WrongOnly, &ds, &mut rng());
        assert_eq!(session.position(), None);
        assert!(session.current_question(&ds).is_none());
        // Grading with nothing shown is rejected, not an index fault
        assert_eq!(
            session.submit(&ds, &answer("A"), &mut rng()),
            Err(SubmitError::NoQuestion)
        );
    }

    #[test]
    fn resume_jumps_to_last_viewed_in_normal_mode() {
        let ds = dataset(&["q1", "q2", "q3", "q4"]);
        let mut session = SessionState::new(&ds, &mut rng());
        session.advance(&ds);
        session.advance(&ds); // now at q3
        session.switch_mode(Mode::Shuffle, &ds, &mut rng());

        // last_viewed now tracks the shuffle head; pretend q3 was the
        // last question viewed
        let mut snapshot = session.snapshot();
        snapshot.last_viewed = Some("q3".to_string());
        let mut session = SessionState::from_snapshot(&ds, snapshot, &mut rng());

        session.resume(&ds, &mut rng());
        assert_eq!(session.mode(), Mode::Normal);
        assert_eq!(session.position(), Some(2));
        assert_eq!(session.current_question(&ds).unwrap().question_id, "q3");
    }

    #[test]
    fn resume_without_last_viewed_is_a_noop() {
        let ds = dataset(&["q1", "q2"]);
        let mut session = SessionState::new(&ds, &mut rng());
        session.switch_mode(Mode::WrongOnly, &ds, &mut rng());
        let mut snapshot = session.snapshot();
        snapshot.last_viewed = None;
        let mut session = SessionState::from_snapshot(&ds, snapshot, &mut rng());

        session.resume(&ds, &mut rng());
        assert_eq!(session.mode(), Mode::WrongOnly);
        assert_eq!(session.position(), None);
    }

    #[test]
    fn resume_with_unknown_question_is_a_noop() {
        let ds = dataset(&["q1", "q2"]);
        let mut session = SessionState::new(&ds, &mut rng());
        let mut snapshot = session.snapshot();
        snapshot.last_viewed = Some("gone".to_string());
        snapshot.mode = Mode::Shuffle;
        let mut session = SessionState::from_snapshot(&ds, snapshot, &mut rng());

        session.resume(&ds, &mut rng());
        assert_eq!(session.mode(), Mode::Shuffle);
    }

    #[test]
    fn from_snapshot_clamps_stale_index() {
        let ds = dataset(&["q1", "q2"]);
        let snapshot = SessionSnapshot {
            current_index: 99,
            ..SessionSnapshot::default()
        };
        let session = SessionState::from_snapshot(&ds, snapshot, &mut rng());
        assert_eq!(session.position(), Some(1));
    }

    #[test]
    fn from_snapshot_with_empty_working_list_is_idle() {
        let ds = dataset(&["q1"]);
        let snapshot = SessionSnapshot {
            mode: Mode::WrongOnly,
            current_index: 5,
            ..SessionSnapshot::default()
        };
        let session = SessionState::from_snapshot(&ds, snapshot, &mut rng());
        assert_eq!(session.position(), None);
    }

    #[test]
    fn snapshot_round_trip_restores_equivalent_session() {
        let ds = dataset(&["q1", "q2", "q3"]);
        let mut session = SessionState::new(&ds, &mut rng());
        session.submit(&ds, &answer("B"), &mut rng()).unwrap();
        session.advance(&ds);

        let restored = SessionState::from_snapshot(&ds, session.snapshot(), &mut rng());
        assert_eq!(restored.mode(), session.mode());
        assert_eq!(restored.position(), session.position());
        assert_eq!(restored.results(), session.results());
        assert_eq!(restored.last_viewed(), session.last_viewed());
    }
}
