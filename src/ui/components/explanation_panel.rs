use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

/// Verdict + answer key + explanation text, shown after grading.
pub struct ExplanationPanel<'a> {
    correct: bool,
    correct_answers: &'a str,
    explanation: &'a str,
    theme: &'a Theme,
}

impl<'a> ExplanationPanel<'a> {
    pub fn new(
        correct: bool,
        correct_answers: &'a str,
        explanation: &'a str,
        theme: &'a Theme,
    ) -> Self {
        Self {
            correct,
            correct_answers,
            explanation,
            theme,
        }
    }
}

impl Widget for ExplanationPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let (badge, badge_color) = if self.correct {
            ("✓ Correct", colors.correct())
        } else {
            ("✗ Incorrect", colors.incorrect())
        };

        let block = Block::bordered()
            .title(" Result ")
            .border_style(Style::default().fg(badge_color))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![
            Line::from(Span::styled(
                badge,
                Style::default().fg(badge_color).add_modifier(Modifier::BOLD),
            )),
            Line::from(vec![
                Span::styled("Answer: ", Style::default().fg(colors.dim())),
                Span::styled(self.correct_answers, Style::default().fg(colors.fg())),
            ]),
        ];
        if !self.explanation.is_empty() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                self.explanation,
                Style::default().fg(colors.fg()),
            )));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(inner, buf);
    }
}
