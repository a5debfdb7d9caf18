use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use renoquote::api::reviews::ReviewsClient;
use renoquote::api::submit::SubmissionClient;
use renoquote::app::App;
use renoquote::config::Config;
use renoquote::draft::QuoteDraft;
use renoquote::logging;
use renoquote::validate;
use renoquote::wizard::{QuoteWizard, Step, SubmitOutcome, SUCCESS_MESSAGE};

#[derive(Parser)]
#[command(name = "renoquote")]
#[command(about = "Compose and submit home-renovation quote requests")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the saved draft and its validation status
    Show,

    /// Submit the saved draft without opening the wizard
    Submit {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Discard the saved draft
    Clear,

    /// Fetch and print customer reviews
    Reviews,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    // TUI mode is the default when no subcommand is given
    let is_tui_mode = cli.command.is_none();

    // Initialize logging (file-based for TUI, stderr for CLI)
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Some(Commands::Show) => {
            cmd_show(&config);
        }
        Some(Commands::Submit { yes }) => {
            cmd_submit(&config, yes).await?;
        }
        Some(Commands::Clear) => {
            cmd_clear(&config)?;
        }
        Some(Commands::Reviews) => {
            cmd_reviews(&config).await?;
        }
        None => {
            run_tui(config, logging_handle.log_file_path).await?;
        }
    }

    Ok(())
}

async fn run_tui(config: Config, log_file_path: Option<PathBuf>) -> Result<()> {
    let mut app = App::new(config)?;
    let result = app.run().await;

    // Print log file path on exit if logs were written
    if let Some(log_path) = log_file_path {
        if log_path.exists() {
            if let Ok(metadata) = log_path.metadata() {
                if metadata.len() > 0 {
                    eprintln!("Session log: {}", log_path.display());
                }
            }
        }
    }

    result
}

fn cmd_show(config: &Config) {
    let draft = QuoteDraft::load(config);

    if !draft.is_persisted() {
        println!("No saved draft");
        return;
    }

    println!("Saved draft");
    println!("{}", "─".repeat(60));
    print_field("Title", &draft.title);
    print_field(
        "Services",
        &draft
            .services
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", "),
    );
    print_field("Other service", &draft.other_service);
    print_field("Property type", draft.property_type.label());
    print_field("Property details", &draft.property_other);
    print_field("Description", &draft.description);
    print_field("Address", &draft.address);
    print_field("City", &draft.city);
    print_field("Postal code", &draft.postal_code);
    print_field("Area (m2)", &draft.area);
    print_field("Bedrooms", &draft.bedrooms);
    print_field("Bathrooms", &draft.bathrooms);
    print_field("Budget", draft.budget.label());
    print_field("Timeline", draft.timeline.label());
    print_field("Site access", draft.site_access.label());
    print_field("Name", &draft.name);
    print_field("Email", &draft.email);
    print_field("Phone", &draft.phone);
    print_field("Preferred contact", draft.preferred_contact.label());
    print_field("Heard about us", draft.referral.label());
    print_field("Consent", if draft.consent { "yes" } else { "no" });

    println!();
    for step in [Step::Project, Step::Property, Step::Contact] {
        let status = if validate::step_valid(&draft, step) {
            "complete"
        } else {
            "incomplete"
        };
        println!("Step {} ({}): {}", step.number(), step.title(), status);
    }
}

fn print_field(label: &str, value: &str) {
    if !value.trim().is_empty() {
        println!("  {label}: {value}");
    }
}

async fn cmd_submit(config: &Config, skip_confirm: bool) -> Result<()> {
    let draft = QuoteDraft::load(config);

    if !draft.is_persisted() {
        println!("No saved draft to submit");
        return Ok(());
    }

    // Refuse early with a per-step report instead of a backend rejection
    let incomplete: Vec<Step> = [Step::Project, Step::Property, Step::Contact]
        .into_iter()
        .filter(|step| !validate::step_valid(&draft, *step))
        .collect();
    if !incomplete.is_empty() {
        println!("Draft is not ready to submit:");
        for step in incomplete {
            println!("  Step {} ({}) is incomplete", step.number(), step.title());
        }
        println!("Run the wizard to finish it, or 'renoquote show' for details");
        return Ok(());
    }

    if !skip_confirm {
        println!("Submit this quote request?");
        println!();
        println!("  Title:   {}", draft.title);
        println!("  Name:    {}", draft.name);
        println!("  Email:   {}", draft.email);
        println!();
        print!("Confirm? [y/N] ");

        use std::io::{self, Write};
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled");
            return Ok(());
        }
    }

    let client = SubmissionClient::new(config)?;
    let mut machine = QuoteWizard::new(draft);
    machine.submit(&client).await;

    match machine.outcome() {
        Some(SubmitOutcome::Success) => println!("{SUCCESS_MESSAGE}"),
        Some(SubmitOutcome::Failure(reason)) => println!("Submission failed: {reason}"),
        None => println!("Nothing was submitted"),
    }

    Ok(())
}

fn cmd_clear(config: &Config) -> Result<()> {
    let draft = QuoteDraft::load(config);

    if draft.is_persisted() {
        draft.clear_persisted()?;
        println!("Saved draft discarded");
    } else {
        println!("No saved draft");
    }

    Ok(())
}

async fn cmd_reviews(config: &Config) -> Result<()> {
    let client = ReviewsClient::new(config)?;
    let summary = client.fetch_or_fallback().await;

    if summary.is_fallback {
        println!("{} (local testimonials)", summary.name);
    } else {
        let rating = summary
            .rating
            .map(|r| format!("{r:.1} *"))
            .unwrap_or_default();
        let count = summary
            .count
            .map(|c| format!("{c} reviews"))
            .unwrap_or_default();
        println!("{} {} {}", summary.name, rating, count);
        if let Some(url) = &summary.maps_url {
            println!("{url}");
        }
    }
    println!("{}", "─".repeat(60));

    for review in summary.usable_reviews(client.limit()) {
        let stars = review.rating.map_or(String::new(), |r| {
            let r = usize::from(r.min(5));
            format!(" {}{}", "★".repeat(r), "☆".repeat(5 - r))
        });
        let date = review.publish_time.clone().unwrap_or_default();
        println!("{}{} {}", review.author, stars, date);
        println!("  {}", review.text);
        println!();
    }

    Ok(())
}
