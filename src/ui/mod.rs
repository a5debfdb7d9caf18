//! Terminal rendering: the wizard steps, overlay dialogs, and the
//! reviews browser.

pub mod dialogs;
pub mod reviews;
pub mod wizard;

pub use dialogs::ResultDialog;
pub use reviews::ReviewsScreen;
pub use wizard::{WizardEvent, WizardScreen};
