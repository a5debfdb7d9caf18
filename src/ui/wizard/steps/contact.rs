//! Step 3 rendering: contact details, referral, consent

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::draft::ReferralSource;
use crate::ui::wizard::{FieldId, WizardScreen};

impl WizardScreen {
    pub(crate) fn render_contact_step(&mut self, frame: &mut Frame) {
        let body = self.render_chrome(frame);
        let draft = self.machine.draft();

        let has_other_referral = draft.referral == ReferralSource::Other;

        let mut constraints = vec![
            Constraint::Length(1), // Name
            Constraint::Length(1), // Email
            Constraint::Length(1), // Phone
            Constraint::Length(1), // Spacing
            Constraint::Length(1), // Preferred contact
            Constraint::Length(1), // Referral
        ];
        if has_other_referral {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1)); // Spacing
        constraints.push(Constraint::Length(1)); // Consent
        constraints.push(Constraint::Length(2)); // Privacy note
        constraints.push(Constraint::Min(0));

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(body);
        let mut row = 0;
        let mut next = || {
            let area = rows[row];
            row += 1;
            area
        };

        self.render_text_row(frame, next(), FieldId::Name, &draft.name, "");
        self.render_text_row(frame, next(), FieldId::Email, &draft.email, "you@example.com");
        self.render_text_row(frame, next(), FieldId::Phone, &draft.phone, "+351 ...");
        next(); // spacing

        self.render_enum_row(
            frame,
            next(),
            FieldId::PreferredContact,
            draft.preferred_contact.label(),
        );
        self.render_enum_row(frame, next(), FieldId::Referral, draft.referral.label());
        if has_other_referral {
            self.render_text_row(
                frame,
                next(),
                FieldId::ReferralOther,
                &draft.referral_other,
                "e.g. trade fair, billboard, YouTube",
            );
        }
        next(); // spacing

        // Consent toggle
        let consent_focused = self.is_focused(FieldId::Consent);
        let label_style = if consent_focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let (box_mark, box_color) = if draft.consent {
            ("[x]", Color::Green)
        } else {
            ("[ ]", Color::DarkGray)
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    if consent_focused { "> " } else { "  " },
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(box_mark, Style::default().fg(box_color)),
                Span::raw(" "),
                Span::styled("I agree to be contacted about my request", label_style),
            ])),
            next(),
        );

        frame.render_widget(
            Paragraph::new(vec![
                Line::from(Span::styled(
                    "Your progress is saved automatically on this device.",
                    Style::default().fg(Color::DarkGray),
                )),
                Line::from(Span::styled(
                    "By sending you accept our terms and privacy policy.",
                    Style::default().fg(Color::DarkGray),
                )),
            ]),
            next(),
        );
    }
}
