//! The three-step quote wizard screen.
//!
//! Holds the state machine plus the purely visual state around it:
//! which field has focus, the highlight inside the services list, and
//! the multi-line description editor. Keys mutate the draft through
//! the machine so every edit is autosaved.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{ListState, Paragraph},
    Frame,
};
use std::path::PathBuf;
use tui_textarea::TextArea;

use crate::config::ResultPresentation;
use crate::draft::{
    BudgetRange, ContactChannel, PropertyType, QuoteDraft, ReferralSource, ServiceTag,
    SiteAccess, Timeline,
};
use crate::wizard::{QuoteWizard, Step, SubmitOutcome, SUCCESS_MESSAGE};

pub mod steps;

/// Requests the screen cannot satisfy on its own
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardEvent {
    /// Enter on the contact step: the app must run the submission
    SubmitRequested,
    /// Esc: go back a step, or leave the app from step 1
    Back,
}

/// Focusable fields across all steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldId {
    Title,
    Services,
    OtherService,
    PropertyType,
    PropertyOther,
    Description,
    Address,
    City,
    PostalCode,
    Area,
    Bedrooms,
    Bathrooms,
    Budget,
    Timeline,
    SiteAccess,
    Attachments,
    Name,
    Email,
    Phone,
    PreferredContact,
    Referral,
    ReferralOther,
    Consent,
}

impl FieldId {
    pub(crate) fn label(self) -> &'static str {
        match self {
            FieldId::Title => "Project title",
            FieldId::Services => "Services",
            FieldId::OtherService => "Other service",
            FieldId::PropertyType => "Property type",
            FieldId::PropertyOther => "Which property",
            FieldId::Description => "Project description",
            FieldId::Address => "Street address",
            FieldId::City => "City",
            FieldId::PostalCode => "Postal code",
            FieldId::Area => "Area (m2)",
            FieldId::Bedrooms => "Bedrooms",
            FieldId::Bathrooms => "Bathrooms",
            FieldId::Budget => "Estimated budget",
            FieldId::Timeline => "Desired timeline",
            FieldId::SiteAccess => "Site access",
            FieldId::Attachments => "Attachments",
            FieldId::Name => "Name",
            FieldId::Email => "Email",
            FieldId::Phone => "Phone / WhatsApp",
            FieldId::PreferredContact => "Preferred contact",
            FieldId::Referral => "How did you hear about us",
            FieldId::ReferralOther => "Heard about us (other)",
            FieldId::Consent => "Consent to be contacted",
        }
    }

    fn is_enum(self) -> bool {
        matches!(
            self,
            FieldId::PropertyType
                | FieldId::Budget
                | FieldId::Timeline
                | FieldId::SiteAccess
                | FieldId::PreferredContact
                | FieldId::Referral
        )
    }
}

pub struct WizardScreen {
    pub machine: QuoteWizard,
    presentation: ResultPresentation,
    /// Index into the current step's field list
    focus: usize,
    /// Highlight within the services checklist
    pub(crate) service_state: ListState,
    /// Multi-line editor for the project description
    pub(crate) description: TextArea<'static>,
    /// Semicolon-separated attachment paths as typed
    pub(crate) attachments_input: String,
}

impl WizardScreen {
    pub fn new(machine: QuoteWizard, presentation: ResultPresentation) -> Self {
        let mut service_state = ListState::default();
        service_state.select(Some(0));

        let description = TextArea::from(machine.draft().description.lines());
        let attachments_input = join_paths(&machine.draft().attachments);

        Self {
            machine,
            presentation,
            focus: 0,
            service_state,
            description,
            attachments_input,
        }
    }

    pub fn presentation(&self) -> ResultPresentation {
        self.presentation
    }

    /// Fields of the current step. Elaboration fields appear only while
    /// their "other" choice is active.
    pub(crate) fn fields(&self) -> Vec<FieldId> {
        let draft = self.machine.draft();
        match self.machine.step() {
            Step::Project => {
                let mut fields = vec![FieldId::Title, FieldId::Services];
                if draft.has_service(ServiceTag::Other) {
                    fields.push(FieldId::OtherService);
                }
                fields.push(FieldId::PropertyType);
                if draft.property_type == PropertyType::Other {
                    fields.push(FieldId::PropertyOther);
                }
                fields.push(FieldId::Description);
                fields
            }
            Step::Property => vec![
                FieldId::Address,
                FieldId::City,
                FieldId::PostalCode,
                FieldId::Area,
                FieldId::Bedrooms,
                FieldId::Bathrooms,
                FieldId::Budget,
                FieldId::Timeline,
                FieldId::SiteAccess,
                FieldId::Attachments,
            ],
            Step::Contact => {
                let mut fields = vec![
                    FieldId::Name,
                    FieldId::Email,
                    FieldId::Phone,
                    FieldId::PreferredContact,
                    FieldId::Referral,
                ];
                if draft.referral == ReferralSource::Other {
                    fields.push(FieldId::ReferralOther);
                }
                fields.push(FieldId::Consent);
                fields
            }
        }
    }

    pub(crate) fn focused_field(&self) -> FieldId {
        let fields = self.fields();
        fields[self.focus.min(fields.len() - 1)]
    }

    fn focus_next(&mut self) {
        let len = self.fields().len();
        if self.focus + 1 < len {
            self.focus += 1;
        }
    }

    fn focus_prev(&mut self) {
        if self.focus > 0 {
            self.focus -= 1;
        }
    }

    /// Retreat a step; false means we were already on step 1.
    pub fn go_back(&mut self) -> bool {
        if self.machine.retreat() {
            self.focus = 0;
            true
        } else {
            false
        }
    }

    /// Rebuild the visual state from the draft, e.g. after a successful
    /// submission reset the editor and attachment buffer.
    pub fn sync_from_draft(&mut self) {
        self.focus = 0;
        self.description = TextArea::from(self.machine.draft().description.lines());
        self.attachments_input = join_paths(&self.machine.draft().attachments);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<WizardEvent> {
        // Conditional fields may have vanished since the last keypress
        let field_count = self.fields().len();
        if self.focus >= field_count {
            self.focus = field_count - 1;
        }
        let field = self.focused_field();

        match key.code {
            KeyCode::Esc => return Some(WizardEvent::Back),
            KeyCode::Tab => {
                self.focus_next();
                return None;
            }
            KeyCode::BackTab => {
                self.focus_prev();
                return None;
            }
            // Enter inside the description editor inserts a newline
            KeyCode::Enter if field != FieldId::Description => {
                if self.machine.step() == Step::Contact {
                    return Some(WizardEvent::SubmitRequested);
                }
                if self.machine.advance() {
                    self.focus = 0;
                }
                return None;
            }
            _ => {}
        }

        match field {
            FieldId::Services => self.handle_services_key(key.code),
            FieldId::Description => {
                self.description.input(key);
                let text = self.description.lines().join("\n");
                self.machine.update(|d| d.description = text);
            }
            FieldId::Consent => {
                if matches!(
                    key.code,
                    KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right
                ) {
                    self.machine.update(|d| d.consent = !d.consent);
                }
            }
            FieldId::Attachments => self.handle_attachments_key(key.code),
            id if id.is_enum() => match key.code {
                KeyCode::Left | KeyCode::Up => self.cycle_enum(id, false),
                KeyCode::Right | KeyCode::Down => self.cycle_enum(id, true),
                _ => {}
            },
            id => self.handle_text_key(id, key.code),
        }

        None
    }

    fn handle_services_key(&mut self, code: KeyCode) {
        let len = ServiceTag::all().len();
        match code {
            KeyCode::Up => {
                let i = self
                    .service_state
                    .selected()
                    .map_or(0, |i| if i == 0 { len - 1 } else { i - 1 });
                self.service_state.select(Some(i));
            }
            KeyCode::Down => {
                let i = self.service_state.selected().map_or(0, |i| (i + 1) % len);
                self.service_state.select(Some(i));
            }
            KeyCode::Char(' ') => {
                if let Some(i) = self.service_state.selected() {
                    if let Some(tag) = ServiceTag::all().get(i) {
                        self.machine.toggle_service(*tag);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_attachments_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.attachments_input.push(c),
            KeyCode::Backspace => {
                self.attachments_input.pop();
            }
            _ => return,
        }
        let paths = parse_paths(&self.attachments_input);
        self.machine.update(|d| d.attachments = paths);
    }

    fn handle_text_key(&mut self, id: FieldId, code: KeyCode) {
        match code {
            KeyCode::Char(c) => self.machine.update(|d| {
                if let Some(text) = field_text_mut(d, id) {
                    text.push(c);
                }
            }),
            KeyCode::Backspace => self.machine.update(|d| {
                if let Some(text) = field_text_mut(d, id) {
                    text.pop();
                }
            }),
            KeyCode::Up => self.focus_prev(),
            KeyCode::Down => self.focus_next(),
            _ => {}
        }
    }

    fn cycle_enum(&mut self, id: FieldId, forward: bool) {
        self.machine.update(|d| match id {
            FieldId::PropertyType => {
                d.property_type = cycle(PropertyType::all(), d.property_type, forward);
            }
            FieldId::Budget => d.budget = cycle(BudgetRange::all(), d.budget, forward),
            FieldId::Timeline => d.timeline = cycle(Timeline::all(), d.timeline, forward),
            FieldId::SiteAccess => {
                d.site_access = cycle(SiteAccess::all(), d.site_access, forward);
            }
            FieldId::PreferredContact => {
                d.preferred_contact = cycle(ContactChannel::all(), d.preferred_contact, forward);
            }
            FieldId::Referral => d.referral = cycle(ReferralSource::all(), d.referral, forward),
            _ => {}
        });
    }

    // ─── Rendering helpers shared by the step renderers ─────────────────────

    pub(crate) fn is_focused(&self, id: FieldId) -> bool {
        self.focused_field() == id
    }

    /// One-line text field: label, value, trailing cursor when focused
    pub(crate) fn render_text_row(
        &self,
        frame: &mut Frame,
        area: Rect,
        id: FieldId,
        value: &str,
        placeholder: &str,
    ) {
        let focused = self.is_focused(id);
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let mut spans = vec![
            Span::styled(if focused { "> " } else { "  " }, Style::default().fg(Color::Cyan)),
            Span::styled(format!("{}: ", id.label()), label_style),
        ];

        if value.is_empty() && !focused {
            spans.push(Span::styled(
                placeholder.to_string(),
                Style::default().fg(Color::DarkGray),
            ));
        } else {
            spans.push(Span::styled(
                value.to_string(),
                Style::default().fg(if focused { Color::White } else { Color::Gray }),
            ));
            if focused {
                spans.push(Span::styled("▏", Style::default().fg(Color::Cyan)));
            }
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// One-line enum field rendered as "< value >"
    pub(crate) fn render_enum_row(&self, frame: &mut Frame, area: Rect, id: FieldId, value: &str) {
        let focused = self.is_focused(id);
        let label_style = if focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let value_style = if focused {
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let line = Line::from(vec![
            Span::styled(if focused { "> " } else { "  " }, Style::default().fg(Color::Cyan)),
            Span::styled(format!("{}: ", id.label()), label_style),
            Span::styled(if focused { "◄ " } else { "  " }, Style::default().fg(Color::DarkGray)),
            Span::styled(value.to_string(), value_style),
            Span::styled(if focused { " ►" } else { "  " }, Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    /// Inline banner with the last submission outcome, when enabled
    pub(crate) fn render_banner(&self, frame: &mut Frame, area: Rect) {
        if self.presentation != ResultPresentation::Banner {
            return;
        }
        let Some(outcome) = self.machine.outcome() else {
            return;
        };

        let (text, color) = match outcome {
            SubmitOutcome::Success => (SUCCESS_MESSAGE.to_string(), Color::Green),
            SubmitOutcome::Failure(reason) => (reason.clone(), Color::Red),
        };
        let line = Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        frame.render_widget(Paragraph::new(line), area);
    }

    pub fn render(&mut self, frame: &mut Frame) {
        match self.machine.step() {
            Step::Project => self.render_project_step(frame),
            Step::Property => self.render_property_step(frame),
            Step::Contact => self.render_contact_step(frame),
        }
    }
}

/// Pick the neighbor of `current` inside `all`, wrapping at both ends.
fn cycle<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
    let len = all.len();
    let idx = all.iter().position(|v| *v == current).unwrap_or(0);
    let next = if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    };
    all[next]
}

fn field_text_mut(draft: &mut QuoteDraft, id: FieldId) -> Option<&mut String> {
    match id {
        FieldId::Title => Some(&mut draft.title),
        FieldId::OtherService => Some(&mut draft.other_service),
        FieldId::PropertyOther => Some(&mut draft.property_other),
        FieldId::Address => Some(&mut draft.address),
        FieldId::City => Some(&mut draft.city),
        FieldId::PostalCode => Some(&mut draft.postal_code),
        FieldId::Area => Some(&mut draft.area),
        FieldId::Bedrooms => Some(&mut draft.bedrooms),
        FieldId::Bathrooms => Some(&mut draft.bathrooms),
        FieldId::Name => Some(&mut draft.name),
        FieldId::Email => Some(&mut draft.email),
        FieldId::Phone => Some(&mut draft.phone),
        FieldId::ReferralOther => Some(&mut draft.referral_other),
        _ => None,
    }
}

fn parse_paths(input: &str) -> Vec<PathBuf> {
    input
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
        .collect()
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
