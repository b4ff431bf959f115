use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Widget};

use crate::session::timer::Countdown;
use crate::ui::theme::Theme;

pub struct CountdownBar<'a> {
    pub time_left: u32,
    pub ratio: f64,
    pub warning: bool,
    pub theme: &'a Theme,
}

impl<'a> CountdownBar<'a> {
    pub fn new(countdown: &Countdown, warning_threshold: u32, theme: &'a Theme) -> Self {
        Self {
            time_left: countdown.time_left(),
            ratio: countdown.ratio().clamp(0.0, 1.0),
            warning: countdown.is_warning(warning_threshold),
            theme,
        }
    }
}

impl Widget for CountdownBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let bar_color = if self.warning {
            colors.warning()
        } else {
            colors.bar_filled()
        };

        let block = Block::bordered()
            .title(" Time remaining ")
            .title_bottom(format!(" {}s ", self.time_left))
            .title_style(Style::default().fg(bar_color).add_modifier(Modifier::BOLD))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled_width = (self.ratio * inner.width as f64) as u16;
        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().bg(bar_color)
            } else {
                Style::default().bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }
    }
}
