use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io;
use std::time::Duration;

use crate::api::reviews::ReviewsClient;
use crate::api::submit::SubmissionClient;
use crate::config::{Config, ResultPresentation};
use crate::draft::QuoteDraft;
use crate::ui::{ResultDialog, ReviewsScreen, WizardEvent, WizardScreen};
use crate::wizard::{QuoteWizard, SubmitOutcome};

/// Work the key handler cannot do synchronously
enum AppAction {
    Submit,
    OpenReviews,
}

pub struct App {
    screen: WizardScreen,
    result_dialog: ResultDialog,
    reviews: ReviewsScreen,
    submission: SubmissionClient,
    reviews_client: ReviewsClient,
    refresh_rate_ms: u64,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let draft = QuoteDraft::load(&config);
        if draft.is_persisted() {
            tracing::info!("Restored saved draft");
        }

        let machine = QuoteWizard::new(draft);
        let screen = WizardScreen::new(machine, config.ui.result_presentation);
        let submission = SubmissionClient::new(&config)?;
        let reviews_client = ReviewsClient::new(&config)?;
        let reviews = ReviewsScreen::new(config.reviews.limit);

        Ok(Self {
            screen,
            result_dialog: ResultDialog::new(),
            reviews,
            submission,
            reviews_client,
            refresh_rate_ms: config.ui.refresh_rate_ms,
            should_quit: false,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(self.refresh_rate_ms);

        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        if let Some(action) = self.handle_key(key) {
                            self.run_action(action, &mut terminal).await?;
                        }
                    }
                }
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        Ok(())
    }

    fn render(&mut self, frame: &mut Frame) {
        self.screen.render(frame);
        self.reviews.render(frame);
        self.result_dialog.render(frame);
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        // Result dialog takes priority
        if self.result_dialog.visible {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.result_dialog.hide();
                self.screen.machine.clear_outcome();
            }
            return None;
        }

        // Reviews browser
        if self.reviews.visible {
            match key.code {
                KeyCode::Esc | KeyCode::Char('q') => self.reviews.hide(),
                KeyCode::Left | KeyCode::Char('h') => self.reviews.prev(),
                KeyCode::Right | KeyCode::Char('l') => self.reviews.next(),
                _ => {}
            }
            return None;
        }

        if key.code == KeyCode::F(2) {
            return Some(AppAction::OpenReviews);
        }

        match self.screen.handle_key(key) {
            Some(WizardEvent::SubmitRequested) => Some(AppAction::Submit),
            Some(WizardEvent::Back) => {
                // Esc on step 1 leaves the app; the draft is autosaved
                if !self.screen.go_back() {
                    self.should_quit = true;
                }
                None
            }
            None => None,
        }
    }

    async fn run_action(
        &mut self,
        action: AppAction,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        match action {
            AppAction::Submit => {
                if self.screen.machine.begin_submit() {
                    // Show the in-flight state before the await
                    terminal.draw(|f| self.render(f))?;
                    let result = self.submission.send(self.screen.machine.draft()).await;
                    self.screen.machine.finish_submit(result);
                }
                self.present_outcome();
            }
            AppAction::OpenReviews => {
                let summary = self.reviews_client.fetch_or_fallback().await;
                self.reviews.show(summary);
            }
        }
        Ok(())
    }

    /// Reflect the submission outcome in the configured presentation.
    fn present_outcome(&mut self) {
        let Some(outcome) = self.screen.machine.outcome().cloned() else {
            return;
        };

        if outcome == SubmitOutcome::Success {
            // The machine reset the draft; drop the stale editor state
            self.screen.sync_from_draft();
        }

        if self.screen.presentation() == ResultPresentation::Dialog {
            self.result_dialog.show(outcome);
        }
    }
}
