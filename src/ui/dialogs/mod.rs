//! Overlay dialogs.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::wizard::{SubmitOutcome, SUCCESS_MESSAGE};

/// Helper to create a centered rect using up certain percentage of the
/// available rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Modal presentation of a submission result.
///
/// The same machine outcome also feeds the inline banner; which of the
/// two is shown is a configuration choice.
pub struct ResultDialog {
    pub visible: bool,
    outcome: Option<SubmitOutcome>,
}

impl ResultDialog {
    pub fn new() -> Self {
        Self {
            visible: false,
            outcome: None,
        }
    }

    pub fn show(&mut self, outcome: SubmitOutcome) {
        self.outcome = Some(outcome);
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.outcome = None;
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }
        let Some(outcome) = &self.outcome else {
            return;
        };

        let (title, message, color) = match outcome {
            SubmitOutcome::Success => (" Request sent ", SUCCESS_MESSAGE.to_string(), Color::Green),
            SubmitOutcome::Failure(reason) => {
                (" Submission failed ", reason.clone(), Color::Red)
            }
        };

        let area = centered_rect(60, 30, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([Constraint::Min(2), Constraint::Length(1)])
            .split(inner);

        let body = Paragraph::new(message)
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Center);
        frame.render_widget(body, chunks[0]);

        let hint = Paragraph::new(Line::from(vec![
            Span::styled(
                "Enter",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" close", Style::default().fg(Color::Gray)),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(hint, chunks[1]);
    }
}

impl Default for ResultDialog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialog_show_and_hide() {
        let mut dialog = ResultDialog::new();
        assert!(!dialog.visible);

        dialog.show(SubmitOutcome::Success);
        assert!(dialog.visible);

        dialog.hide();
        assert!(!dialog.visible);
        assert!(dialog.outcome.is_none());
    }

    #[test]
    fn test_centered_rect_is_inside_parent() {
        let parent = Rect::new(0, 0, 100, 40);
        let rect = centered_rect(60, 30, parent);

        assert!(rect.x >= parent.x);
        assert!(rect.y >= parent.y);
        assert!(rect.right() <= parent.right());
        assert!(rect.bottom() <= parent.bottom());
    }
}
