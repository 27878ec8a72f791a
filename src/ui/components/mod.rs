pub mod explanation_panel;
pub mod menu;
pub mod question_panel;
pub mod score_bar;
