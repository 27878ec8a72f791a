use std::collections::BTreeSet;
#[cfg(feature = "network")]
use std::collections::HashMap;
#[cfg(feature = "network")]
use std::sync::mpsc;
#[cfg(feature = "network")]
use std::thread;

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::config::Config;
#[cfg(feature = "network")]
use crate::data::images::ImageProvider;
use crate::data::loader::Dataset;
use crate::data::model::AnswerKind;
use crate::engine::grader::SubmitError;
use crate::engine::list::Mode;
use crate::engine::score::{self, ScoreSummary};
use crate::engine::session::SessionState;
use crate::store::json_store::JsonStore;
use crate::ui::components::menu::Menu;
use crate::ui::components::question_panel::ImageNote;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Quiz,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Back,
}

/// Grading outcome kept around for the explanation panel until the next
/// navigation or mode change.
pub struct Feedback {
    pub correct: bool,
    pub correct_labels: BTreeSet<String>,
    pub correct_answers: String,
    pub explanation: String,
}

/// Application state: the session engine plus everything the terminal
/// shell needs (screen routing, choice selection, grading feedback, image
/// availability). All user intents funnel through the methods below; each
/// state-affecting one ends in `commit`, so a crash never loses more than
/// the in-flight action.
pub struct App {
    pub screen: AppScreen,
    pub dataset: Dataset,
    pub session: SessionState,
    pub config: Config,
    pub theme: &'static Theme,
    pub menu: Menu<'static>,
    pub store: Option<JsonStore>,
    pub should_quit: bool,
    /// Choice the selection cursor is on.
    pub cursor: usize,
    /// Labels toggled for the pending submission.
    pub chosen: BTreeSet<String>,
    pub feedback: Option<Feedback>,
    /// Set when a submission with nothing selected was rejected.
    pub needs_selection: bool,
    /// Data-integrity fault message (missing explanation). Fatal for the
    /// affected question, shown instead of a verdict.
    pub data_fault: Option<String>,
    #[cfg(feature = "network")]
    image_notes: HashMap<String, ImageNote>,
    #[cfg(feature = "network")]
    image_tx: mpsc::Sender<(String, bool)>,
    #[cfg(feature = "network")]
    image_rx: mpsc::Receiver<(String, bool)>,
    rng: SmallRng,
}

impl App {
    /// `fresh` skips the persisted snapshot (the `--fresh` flag).
    pub fn new(config: Config, dataset: Dataset, store: Option<JsonStore>, fresh: bool) -> Self {
        let loaded_theme = Theme::load(&config.theme).unwrap_or_default();
        let theme: &'static Theme = Box::leak(Box::new(loaded_theme));
        let menu = Menu::new(theme);

        let mut rng = SmallRng::from_entropy();
        let session = match (&store, fresh) {
            (Some(s), false) => SessionState::from_snapshot(&dataset, s.load_snapshot(), &mut rng),
            _ => SessionState::new(&dataset, &mut rng),
        };

        #[cfg(feature = "network")]
        let (image_tx, image_rx) = mpsc::channel();

        let mut app = Self {
            screen: AppScreen::Menu,
            dataset,
            session,
            config,
            theme,
            menu,
            store,
            should_quit: false,
            cursor: 0,
            chosen: BTreeSet::new(),
            feedback: None,
            needs_selection: false,
            data_fault: None,
            #[cfg(feature = "network")]
            image_notes: HashMap::new(),
            #[cfg(feature = "network")]
            image_tx,
            #[cfg(feature = "network")]
            image_rx,
            rng,
        };
        app.request_image();
        app
    }

    pub fn score_summary(&self) -> ScoreSummary {
        score::summarize(self.session.results(), self.dataset.len())
    }

    pub fn select_mode(&mut self, mode: Mode) {
        self.session.switch_mode(mode, &self.dataset, &mut self.rng);
        self.enter_quiz();
        self.commit();
    }

    pub fn navigate(&mut self, direction: Direction) {
        match direction {
            Direction::Forward => self.session.advance(&self.dataset),
            Direction::Back => self.session.retreat(&self.dataset),
        }
        self.reset_question_ui();
        self.request_image();
        self.commit();
    }

    pub fn resume(&mut self) {
        self.session.resume(&self.dataset, &mut self.rng);
        self.enter_quiz();
        self.commit();
    }

    pub fn start_over(&mut self) {
        self.session.start_over(&self.dataset, &mut self.rng);
        self.enter_quiz();
        self.commit();
    }

    pub fn submit_answer(&mut self) {
        let labels: Vec<String> = self.chosen.iter().cloned().collect();
        match self.session.submit(&self.dataset, &labels, &mut self.rng) {
            Ok(correct) => {
                // The graded question may already have left a wrong-only
                // list, so read its key directly rather than through the
                // session position.
                let graded_id = self
                    .session
                    .last_viewed()
                    .map(str::to_string)
                    .unwrap_or_default();
                let still_shown = self
                    .session
                    .current_question(&self.dataset)
                    .is_some_and(|q| q.question_id == graded_id);
                if still_shown {
                    if let Some(ex) = self.dataset.explanation(&graded_id) {
                        self.feedback = Some(Feedback {
                            correct,
                            correct_labels: ex.correct_answers.iter().cloned().collect(),
                            correct_answers: ex.correct_answers.join(", "),
                            explanation: ex.explanation_text.clone(),
                        });
                    }
                    self.needs_selection = false;
                } else {
                    // List membership changed under the submission (a
                    // wrong-only question answered correctly); the next
                    // question must render ungraded, without the previous
                    // question's selection or highlights.
                    self.reset_question_ui();
                    self.request_image();
                }
                self.commit();
            }
            Err(SubmitError::EmptySelection) => {
                // Validation condition: report, mutate nothing, no commit
                self.needs_selection = true;
            }
            Err(err @ SubmitError::MissingExplanation(_)) => {
                self.data_fault = Some(err.to_string());
            }
            Err(SubmitError::NoQuestion) => {}
        }
    }

    pub fn cursor_next(&mut self) {
        if let Some(q) = self.session.current_question(&self.dataset)
            && !q.choices.is_empty()
        {
            self.cursor = (self.cursor + 1) % q.choices.len();
        }
    }

    pub fn cursor_prev(&mut self) {
        if let Some(q) = self.session.current_question(&self.dataset)
            && !q.choices.is_empty()
        {
            self.cursor = self.cursor.checked_sub(1).unwrap_or(q.choices.len() - 1);
        }
    }

    /// Toggle the choice under the cursor. Single-answer questions behave
    /// like radio buttons (a new selection replaces the old); multi-answer
    /// questions like checkboxes.
    pub fn toggle_choice(&mut self) {
        let Some(q) = self.session.current_question(&self.dataset) else {
            return;
        };
        let Some(choice) = q.choices.get(self.cursor) else {
            return;
        };
        let label = choice.label.clone();
        match q.answer_type {
            AnswerKind::Single => {
                self.chosen.clear();
                self.chosen.insert(label);
            }
            AnswerKind::Multiple => {
                if !self.chosen.remove(&label) {
                    self.chosen.insert(label);
                }
            }
        }
        self.needs_selection = false;
    }

    pub fn go_to_menu(&mut self) {
        self.screen = AppScreen::Menu;
    }

    fn enter_quiz(&mut self) {
        self.screen = AppScreen::Quiz;
        self.reset_question_ui();
        self.request_image();
    }

    fn reset_question_ui(&mut self) {
        self.cursor = 0;
        self.chosen.clear();
        self.feedback = None;
        self.needs_selection = false;
        self.data_fault = None;
    }

    /// Single persistence point: snapshot the session after a transition.
    /// Write failures are not surfaced mid-session; the next commit
    /// retries.
    fn commit(&self) {
        if let Some(ref store) = self.store {
            let _ = store.save_snapshot(&self.session.snapshot());
        }
    }

    /// Image note for the currently shown question, if it declares one.
    pub fn current_image_note(&self) -> Option<ImageNote> {
        let q = self.session.current_question(&self.dataset)?;
        q.image.as_ref()?;
        #[cfg(feature = "network")]
        {
            Some(
                self.image_notes
                    .get(&q.question_id)
                    .copied()
                    .unwrap_or(ImageNote::Fetching),
            )
        }
        #[cfg(not(feature = "network"))]
        {
            Some(ImageNote::Unavailable)
        }
    }

    /// Kick off a background fetch for the current question's image. The
    /// cache is keyed by question id, so a response landing after the user
    /// has moved on is recorded but not displayed (stale-response guard).
    #[cfg(feature = "network")]
    fn request_image(&mut self) {
        let Some(q) = self.session.current_question(&self.dataset) else {
            return;
        };
        let Some(ref reference) = q.image else {
            return;
        };
        if self.image_notes.contains_key(&q.question_id) {
            return;
        }
        self.image_notes
            .insert(q.question_id.clone(), ImageNote::Fetching);

        let id = q.question_id.clone();
        let reference = reference.clone();
        let token = self.config.image_token.clone();
        let tx = self.image_tx.clone();
        thread::spawn(move || {
            let provider = ImageProvider::new(token);
            let ok = provider.fetch(&reference).is_ok();
            let _ = tx.send((id, ok));
        });
    }

    #[cfg(not(feature = "network"))]
    fn request_image(&mut self) {}

    /// Drain finished image fetches (called on tick).
    #[cfg(feature = "network")]
    pub fn poll_images(&mut self) {
        while let Ok((id, ok)) = self.image_rx.try_recv() {
            let note = if ok {
                ImageNote::Available
            } else {
                ImageNote::Unavailable
            };
            self.image_notes.insert(id, note);
        }
    }

    #[cfg(not(feature = "network"))]
    pub fn poll_images(&mut self) {}
}
