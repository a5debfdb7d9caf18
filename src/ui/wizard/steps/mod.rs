//! Shared chrome for the step screens: outer frame, stepper header,
//! progress gauge, result banner and key hints.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use super::WizardScreen;
use crate::wizard::Step;

mod contact;
mod project;
mod property;

impl WizardScreen {
    /// Draw the outer frame and header, returning the body area.
    pub(crate) fn render_chrome(&self, frame: &mut Frame) -> Rect {
        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(
                    "RenoQuote",
                    Style::default()
                        .fg(Color::LightBlue)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" - Request a renovation quote "),
            ]))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(frame.area());
        frame.render_widget(block, frame.area());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(1), // Step titles
                Constraint::Length(1), // Progress gauge
                Constraint::Length(1), // Spacing
                Constraint::Min(8),    // Step body
                Constraint::Length(1), // Result banner
                Constraint::Length(1), // Key hints
            ])
            .split(inner);

        self.render_stepper(frame, chunks[0]);
        self.render_gauge(frame, chunks[1]);
        self.render_banner(frame, chunks[4]);
        self.render_footer(frame, chunks[5]);

        chunks[3]
    }

    fn render_stepper(&self, frame: &mut Frame, area: Rect) {
        let current = self.machine.step().number();
        let mut spans = Vec::new();
        for step in [Step::Project, Step::Property, Step::Contact] {
            let reached = step.number() <= current;
            let style = if reached {
                Style::default()
                    .fg(Color::LightBlue)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(
                format!("{}. {}", step.number(), step.title()),
                style,
            ));
            if step != Step::Contact {
                spans.push(Span::raw("    "));
            }
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
            area,
        );
    }

    fn render_gauge(&self, frame: &mut Frame, area: Rect) {
        let percent = match self.machine.step() {
            Step::Project => 33,
            Step::Property => 66,
            Step::Contact => 100,
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::LightBlue).bg(Color::Black))
            .percent(percent)
            .label(format!("{percent}%"));
        frame.render_widget(gauge, area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        if self.machine.is_submitting() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "Sending...",
                    Style::default().fg(Color::Yellow),
                )))
                .alignment(Alignment::Center),
                area,
            );
            return;
        }

        let can_advance = self.machine.can_advance();
        let on_contact = self.machine.step() == Step::Contact;
        let enter_label = if on_contact { " send request  " } else { " continue  " };
        let enter_style = if can_advance {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let enter_text_style = if can_advance {
            Style::default().fg(Color::Gray)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let hints = Line::from(vec![
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::styled(" next field  ", Style::default().fg(Color::Gray)),
            Span::styled("Enter", enter_style),
            Span::styled(enter_label, enter_text_style),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" back  ", Style::default().fg(Color::Gray)),
            Span::styled("F2", Style::default().fg(Color::Yellow)),
            Span::styled(" reviews", Style::default().fg(Color::Gray)),
        ]);
        frame.render_widget(Paragraph::new(hints).alignment(Alignment::Center), area);
    }
}
