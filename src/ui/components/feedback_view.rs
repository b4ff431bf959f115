use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::scoring::{FeedbackError, FeedbackReport, FeedbackRow};
use crate::quiz::BLANK_MARKER;
use crate::ui::theme::Theme;

pub struct FeedbackView<'a> {
    pub report: &'a Result<FeedbackReport, FeedbackError>,
    pub scroll: usize,
    pub theme: &'a Theme,
}

impl<'a> FeedbackView<'a> {
    pub fn new(
        report: &'a Result<FeedbackReport, FeedbackError>,
        scroll: usize,
        theme: &'a Theme,
    ) -> Self {
        Self {
            report,
            scroll,
            theme,
        }
    }
}

fn row_lines<'a>(number: usize, row: &'a FeedbackRow, theme: &Theme) -> Vec<Line<'a>> {
    let colors = &theme.colors;
    let answer = if row.answer.is_empty() {
        "(no answer)".to_string()
    } else {
        row.answer.join(", ")
    };
    let (mark, mark_color) = if row.correct {
        ("correct", colors.success())
    } else {
        ("wrong", colors.error())
    };

    let mut lines = vec![
        Line::from(vec![
            Span::styled(
                format!("Q{number}: "),
                Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                row.question.replace(BLANK_MARKER, "____"),
                Style::default().fg(colors.fg()),
            ),
            Span::styled(
                format!("  #{}", row.question_id),
                Style::default().fg(colors.text_muted()),
            ),
        ]),
        Line::from(vec![
            Span::styled("    Your answer: ", Style::default().fg(colors.text_muted())),
            Span::styled(answer, Style::default().fg(colors.fg())),
            Span::styled(format!("  ({mark})"), Style::default().fg(mark_color)),
        ]),
    ];
    if !row.correct {
        lines.push(Line::from(vec![
            Span::styled("    Correct: ", Style::default().fg(colors.text_muted())),
            Span::styled(row.correct_answer.join(", "), Style::default().fg(colors.error())),
        ]));
    }
    lines.push(Line::default());
    lines
}

impl Widget for FeedbackView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Feedback ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let report = match self.report {
            Ok(report) => report,
            Err(err) => {
                let msg = format!("Error: {err}.");
                Paragraph::new(Line::from(Span::styled(
                    msg,
                    Style::default().fg(colors.error()).add_modifier(Modifier::BOLD),
                )))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(inner, buf);
                return;
            }
        };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            format!("Score: {} / {}", report.score(), report.total()),
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let lines: Vec<Line> = report
            .rows
            .iter()
            .enumerate()
            .skip(self.scroll)
            .flat_map(|(i, row)| row_lines(i + 1, row, self.theme))
            .collect();
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .render(layout[1], buf);
    }
}
