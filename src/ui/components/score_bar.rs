use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Widget};

use crate::engine::list::Mode;
use crate::engine::score::ScoreSummary;
use crate::ui::theme::Theme;

/// One-line header: mode, position within the working list, and the
/// running score.
pub struct ScoreBar<'a> {
    mode: Mode,
    position: Option<(usize, usize)>,
    summary: ScoreSummary,
    theme: &'a Theme,
}

impl<'a> ScoreBar<'a> {
    pub fn new(
        mode: Mode,
        position: Option<(usize, usize)>,
        summary: ScoreSummary,
        theme: &'a Theme,
    ) -> Self {
        Self {
            mode,
            position,
            summary,
            theme,
        }
    }
}

impl Widget for ScoreBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let position = match self.position {
            Some((current, total)) => format!("{}/{}", current + 1, total),
            None => "-/-".to_string(),
        };
        let info = format!(
            " {} | {} | correct {} / wrong {} | {}% ",
            self.mode.as_str(),
            position,
            self.summary.correct,
            self.summary.incorrect,
            self.summary.percent,
        );

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                " quizdr ",
                Style::default()
                    .fg(colors.header_fg())
                    .bg(colors.header_bg())
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                info,
                Style::default().fg(colors.dim()).bg(colors.header_bg()),
            ),
        ]))
        .style(Style::default().bg(colors.header_bg()));
        header.render(area, buf);
    }
}
