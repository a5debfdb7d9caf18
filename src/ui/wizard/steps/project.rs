//! Step 1 rendering: project title, services, property type, description

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::draft::{PropertyType, ServiceTag};
use crate::ui::wizard::{FieldId, WizardScreen};

impl WizardScreen {
    pub(crate) fn render_project_step(&mut self, frame: &mut Frame) {
        let body = self.render_chrome(frame);
        let draft = self.machine.draft().clone();

        let has_other_service = draft.has_service(ServiceTag::Other);
        let has_other_property = draft.property_type == PropertyType::Other;

        let mut constraints = vec![
            Constraint::Length(1), // Title
            Constraint::Length(1), // Services label
            Constraint::Length(6), // Services checklist
        ];
        if has_other_service {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1)); // Property type
        if has_other_property {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Length(1)); // Description label
        constraints.push(Constraint::Min(4)); // Description editor

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

        self.render_text_row(
            frame,
            next(),
            FieldId::Title,
            &draft.title,
            "e.g. Full renovation of a 2-bedroom in Sintra",
        );

        // Services checklist
        let services_focused = self.is_focused(FieldId::Services);
        let label_style = if services_focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        frame.render_widget(
            ratatui::widgets::Paragraph::new(Line::from(vec![
                Span::styled(
                    if services_focused { "> " } else { "  " },
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled("Requested services (Space to toggle):", label_style),
            ])),
            next(),
        );

        let items: Vec<ListItem> = ServiceTag::all()
            .iter()
            .map(|tag| {
                let selected = draft.has_service(*tag);
                let checkbox = if selected { "[x]" } else { "[ ]" };
                ListItem::new(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        checkbox,
                        Style::default().fg(if selected {
                            Color::Green
                        } else {
                            Color::DarkGray
                        }),
                    ),
                    Span::raw(" "),
                    Span::styled(
                        tag.label(),
                        Style::default().fg(if selected { Color::White } else { Color::Gray }),
                    ),
                ]))
            })
            .collect();
        let highlight = if services_focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        };
        let list = List::new(items)
            .highlight_style(highlight)
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, next(), &mut self.service_state);

        if has_other_service {
            self.render_text_row(
                frame,
                next(),
                FieldId::OtherService,
                &draft.other_service,
                "e.g. wall demolition, suspended ceiling, HVAC",
            );
        }

        self.render_enum_row(
            frame,
            next(),
            FieldId::PropertyType,
            draft.property_type.label(),
        );

        if has_other_property {
            self.render_text_row(
                frame,
                next(),
                FieldId::PropertyOther,
                &draft.property_other,
                "What kind of property?",
            );
        }

        // Description editor
        let description_focused = self.is_focused(FieldId::Description);
        let desc_label_style = if description_focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        frame.render_widget(
            ratatui::widgets::Paragraph::new(Line::from(vec![
                Span::styled(
                    if description_focused { "> " } else { "  " },
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled("Project description (10 characters minimum):", desc_label_style),
            ])),
            next(),
        );

        self.description.set_cursor_line_style(Style::default());
        self.description.set_cursor_style(if description_focused {
            Style::default().add_modifier(Modifier::REVERSED)
        } else {
            Style::default()
        });
        self.description.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if description_focused {
                    Color::Cyan
                } else {
                    Color::DarkGray
                })),
        );
        frame.render_widget(&self.description, next());
    }
}
