//! Step 2 rendering: address, scope numbers, budget, timeline, access

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::ui::wizard::{FieldId, WizardScreen};

impl WizardScreen {
    pub(crate) fn render_property_step(&mut self, frame: &mut Frame) {
        let body = self.render_chrome(frame);
        let draft = self.machine.draft();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Address
                Constraint::Length(1), // City
                Constraint::Length(1), // Postal code
                Constraint::Length(1), // Spacing
                Constraint::Length(1), // Area
                Constraint::Length(1), // Bedrooms
                Constraint::Length(1), // Bathrooms
                Constraint::Length(1), // Spacing
                Constraint::Length(1), // Budget
                Constraint::Length(1), // Timeline
                Constraint::Length(1), // Site access
                Constraint::Length(1), // Spacing
                Constraint::Length(1), // Attachments
                Constraint::Min(0),
            ])
            .split(body);

        self.render_text_row(
            frame,
            rows[0],
            FieldId::Address,
            &draft.address,
            "Street, number, floor",
        );
        self.render_text_row(frame, rows[1], FieldId::City, &draft.city, "");
        self.render_text_row(
            frame,
            rows[2],
            FieldId::PostalCode,
            &draft.postal_code,
            "xxxx-xxx",
        );

        self.render_text_row(frame, rows[4], FieldId::Area, &draft.area, "e.g. 85");
        self.render_text_row(frame, rows[5], FieldId::Bedrooms, &draft.bedrooms, "e.g. 2");
        self.render_text_row(
            frame,
            rows[6],
            FieldId::Bathrooms,
            &draft.bathrooms,
            "e.g. 1",
        );

        self.render_enum_row(frame, rows[8], FieldId::Budget, draft.budget.label());
        self.render_enum_row(frame, rows[9], FieldId::Timeline, draft.timeline.label());
        self.render_enum_row(
            frame,
            rows[10],
            FieldId::SiteAccess,
            draft.site_access.label(),
        );

        self.render_text_row(
            frame,
            rows[12],
            FieldId::Attachments,
            &self.attachments_input,
            "Paths separated by ';' (plans, photos); not kept between sessions",
        );
    }
}
