use std::collections::BTreeSet;

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::data::model::Question;
use crate::ui::theme::Theme;

/// How the current question's image should be presented, if it has one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageNote {
    Available,
    Unavailable,
    Fetching,
}

/// The prompt and choice list, with the selection cursor and any toggled
/// choices. After grading, correct labels are highlighted.
pub struct QuestionPanel<'a> {
    question: &'a Question,
    chosen: &'a BTreeSet<String>,
    cursor: usize,
    correct_labels: Option<&'a BTreeSet<String>>,
    image_note: Option<ImageNote>,
    theme: &'a Theme,
}

impl<'a> QuestionPanel<'a> {
    pub fn new(
        question: &'a Question,
        chosen: &'a BTreeSet<String>,
        cursor: usize,
        correct_labels: Option<&'a BTreeSet<String>>,
        image_note: Option<ImageNote>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            question,
            chosen,
            cursor,
            correct_labels,
            image_note,
            theme,
        }
    }
}

impl Widget for QuestionPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Question ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines: Vec<Line> = Vec::new();

        let mut prompt = self.question.question_text.clone();
        if let Some(hint) = self.question.selection_hint() {
            prompt.push(' ');
            prompt.push_str(&hint);
        }
        lines.push(Line::from(Span::styled(
            prompt,
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )));

        if self.question.image.is_some() {
            let (text, color) = match self.image_note {
                Some(ImageNote::Available) => ("[image available]", colors.accent()),
                Some(ImageNote::Fetching) => ("[fetching image...]", colors.dim()),
                Some(ImageNote::Unavailable) | None => {
                    ("[image unavailable, text only]", colors.dim())
                }
            };
            lines.push(Line::from(Span::styled(text, Style::default().fg(color))));
        }

        lines.push(Line::default());

        for (i, choice) in self.question.choices.iter().enumerate() {
            let is_cursor = i == self.cursor;
            let is_chosen = self.chosen.contains(&choice.label);
            let mark = if is_chosen { "[x]" } else { "[ ]" };
            let pointer = if is_cursor { "> " } else { "  " };

            let mut style = Style::default().fg(colors.fg());
            if let Some(correct) = self.correct_labels {
                if correct.contains(&choice.label) {
                    style = Style::default().fg(colors.correct());
                } else if is_chosen {
                    style = Style::default().fg(colors.incorrect());
                }
            } else if is_cursor {
                style = Style::default()
                    .fg(colors.cursor_fg())
                    .bg(colors.cursor_bg());
            }

            lines.push(Line::from(Span::styled(
                format!("{pointer}{mark} {}: {}", choice.label, choice.text),
                style,
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
