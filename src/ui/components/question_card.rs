use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::quiz::Question;
use crate::session::selection::BlankSelection;
use crate::ui::theme::Theme;

const EMPTY_BLANK: &str = "________";
const OPTION_COLUMNS: usize = 2;

pub struct QuestionCard<'a> {
    question: &'a Question,
    selection: &'a BlankSelection,
    cursor: usize,
    is_last: bool,
    can_advance: bool,
    theme: &'a Theme,
}

impl<'a> QuestionCard<'a> {
    pub fn new(
        question: &'a Question,
        selection: &'a BlankSelection,
        cursor: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            question,
            selection,
            cursor,
            is_last: false,
            can_advance: false,
            theme,
        }
    }

    pub fn last(mut self, is_last: bool) -> Self {
        self.is_last = is_last;
        self
    }

    pub fn can_advance(mut self, can_advance: bool) -> Self {
        self.can_advance = can_advance;
        self
    }
}

/// One piece of the sentence: plain text or the blank at `index`.
#[derive(Debug, PartialEq, Eq)]
enum Piece<'a> {
    Text(&'a str),
    Blank { index: usize, word: Option<&'a str> },
}

fn sentence_pieces<'a>(question: &'a Question, selection: &'a BlankSelection) -> Vec<Piece<'a>> {
    let segments = question.segments();
    let last = segments.len().saturating_sub(1);
    let mut pieces = Vec::with_capacity(segments.len() * 2);
    for (i, segment) in segments.into_iter().enumerate() {
        if !segment.is_empty() {
            pieces.push(Piece::Text(segment));
        }
        if i < last {
            pieces.push(Piece::Blank {
                index: i,
                word: selection.blank(i),
            });
        }
    }
    pieces
}

impl Widget for QuestionCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let option_rows = self.question.options.len().div_ceil(OPTION_COLUMNS) as u16;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Min(3),
                Constraint::Length(option_rows + 1),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            "Fill in the blanks with the correct words in order:",
            Style::default().fg(colors.text_muted()),
        )))
        .render(layout[0], buf);

        let sentence: Vec<Span> = sentence_pieces(self.question, self.selection)
            .into_iter()
            .map(|piece| match piece {
                Piece::Text(text) => Span::styled(text, Style::default().fg(colors.fg())),
                Piece::Blank { word: Some(w), .. } => Span::styled(
                    format!("[{w}]"),
                    Style::default()
                        .fg(colors.blank_filled())
                        .add_modifier(Modifier::BOLD),
                ),
                Piece::Blank { word: None, .. } => {
                    Span::styled(EMPTY_BLANK, Style::default().fg(colors.blank()))
                }
            })
            .collect();
        Paragraph::new(Line::from(sentence))
            .wrap(Wrap { trim: false })
            .render(layout[1], buf);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(1); option_rows as usize])
            .split(layout[2]);
        for (row_idx, row_area) in rows.iter().enumerate() {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![
                    Constraint::Ratio(1, OPTION_COLUMNS as u32);
                    OPTION_COLUMNS
                ])
                .split(*row_area);
            for (col_idx, col_area) in cols.iter().enumerate() {
                let idx = row_idx * OPTION_COLUMNS + col_idx;
                let Some(word) = self.question.options.get(idx) else {
                    continue;
                };
                let selected = self.selection.contains(word);
                let focused = idx == self.cursor;

                let mut style = if selected {
                    Style::default()
                        .fg(colors.option_selected_fg())
                        .bg(colors.option_selected_bg())
                } else {
                    Style::default().fg(colors.fg())
                };
                if focused {
                    style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
                }
                let marker = if focused { ">" } else { " " };
                let label = if idx < 9 {
                    format!("{} {}. {word}", marker, idx + 1)
                } else {
                    format!("{marker}    {word}")
                };
                Paragraph::new(Line::from(vec![Span::styled(label, style)]))
                    .style(Style::default().fg(if focused {
                        colors.option_cursor()
                    } else {
                        colors.fg()
                    }))
                    .render(*col_area, buf);
            }
        }

        let action = if self.is_last {
            "[Enter] Finish Quiz"
        } else {
            "[Enter] Next Question"
        };
        let action_style = if self.can_advance {
            Style::default()
                .fg(colors.success())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(colors.text_muted())
        };
        let filled = format!(
            "  {}/{} blanks filled",
            self.selection.len(),
            self.selection.capacity()
        );
        Paragraph::new(Line::from(vec![
            Span::styled(action, action_style),
            Span::styled(filled, Style::default().fg(colors.text_muted())),
        ]))
        .render(layout[3], buf);
    }
}
