use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: vec![
                MenuItem {
                    key: "1".to_string(),
                    label: "Normal".to_string(),
                    description: "All questions in dataset order".to_string(),
                },
                MenuItem {
                    key: "2".to_string(),
                    label: "Wrong only".to_string(),
                    description: "Retry questions you last answered incorrectly".to_string(),
                },
                MenuItem {
                    key: "3".to_string(),
                    label: "Shuffle".to_string(),
                    description: "All questions in a fresh random order".to_string(),
                },
                MenuItem {
                    key: "r".to_string(),
                    label: "Resume".to_string(),
                    description: "Jump back to the last question you viewed".to_string(),
                },
                MenuItem {
                    key: "x".to_string(),
                    label: "Start over".to_string(),
                    description: "Clear all recorded answers".to_string(),
                },
            ],
            selected: 0,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" quizdr ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let constraints: Vec<Constraint> =
            self.items.iter().map(|_| Constraint::Length(2)).collect();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(inner);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let marker = if is_selected { "> " } else { "  " };

            let label_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            let lines = vec![
                Line::from(vec![
                    Span::styled(marker, label_style),
                    Span::styled(format!("[{}] ", item.key), label_style),
                    Span::styled(item.label.clone(), label_style),
                ]),
                Line::from(Span::styled(
                    format!("      {}", item.description),
                    Style::default().fg(colors.dim()),
                )),
            ];
            Paragraph::new(lines).render(layout[i], buf);
        }
    }
}
