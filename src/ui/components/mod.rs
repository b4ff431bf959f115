pub mod countdown_bar;
pub mod feedback_view;
pub mod question_card;
pub mod status_panel;
