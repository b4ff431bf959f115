use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::ui::theme::Theme;

/// Full-screen message box for the non-question states.
pub enum StatusKind<'a> {
    Loading { source: &'a str },
    Error { message: &'a str },
    Completed { score: u32, max_score: u32 },
}

pub struct StatusPanel<'a> {
    kind: StatusKind<'a>,
    theme: &'a Theme,
}

impl<'a> StatusPanel<'a> {
    pub fn new(kind: StatusKind<'a>, theme: &'a Theme) -> Self {
        Self { kind, theme }
    }
}

impl Widget for StatusPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(colors.text_muted());

        let (title, border, lines) = match self.kind {
            StatusKind::Loading { source } => (
                " Loading ",
                colors.accent(),
                vec![
                    Line::from(Span::styled("Loading questions...", bold(colors.accent()))),
                    Line::default(),
                    Line::from(Span::styled(format!("from {source}"), muted)),
                ],
            ),
            StatusKind::Error { message } => (
                " Error ",
                colors.error(),
                vec![
                    Line::from(Span::styled(
                        "Failed to load questions. Please try again.",
                        bold(colors.error()),
                    )),
                    Line::default(),
                    Line::from(Span::styled(message.to_string(), muted)),
                    Line::default(),
                    Line::from(Span::styled("[r] Retry  [q] Quit", bold(colors.accent()))),
                ],
            ),
            StatusKind::Completed { score, max_score } => (
                " Quiz Completed ",
                colors.success(),
                vec![
                    Line::from(Span::styled("Quiz Completed!", bold(colors.success()))),
                    Line::default(),
                    Line::from(vec![
                        Span::styled("Your final score: ", Style::default().fg(colors.fg())),
                        Span::styled(score.to_string(), bold(colors.accent())),
                        Span::styled(" out of ", Style::default().fg(colors.fg())),
                        Span::styled(max_score.to_string(), bold(colors.accent())),
                    ]),
                    Line::default(),
                    Line::from(Span::styled(
                        "[r] Restart Quiz  [f] Feedback  [q] Quit",
                        bold(colors.accent()),
                    )),
                ],
            ),
        };

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let top_pad = inner.height.saturating_sub(lines.len() as u16) / 2;
        let body = Rect::new(
            inner.x,
            inner.y + top_pad,
            inner.width,
            inner.height - top_pad,
        );
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(body, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(kind: StatusKind, width: u16, height: u16) -> String {
        let theme = Theme::default();
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        StatusPanel::new(kind, &theme).render(area, &mut buf);
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_completed_panel_shows_final_score() {
        let text = rendered(StatusKind::Completed { score: 3, max_score: 7 }, 60, 9);
        assert!(text.contains("Quiz Completed!"));
        assert!(text.contains("Your final score: 3 out of 7"));
        assert!(text.contains("[f] Feedback"));
    }

    #[test]
    fn test_error_panel_offers_retry() {
        let text = rendered(StatusKind::Error { message: "status 500" }, 60, 10);
        assert!(text.contains("status 500"));
        assert!(text.contains("[r] Retry"));
    }
}
