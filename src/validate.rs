//! Step validation predicates.
//!
//! Pure functions over the draft, recomputed on demand. Validity is
//! never stored, so it cannot drift from the field values.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::draft::{PropertyType, QuoteDraft, ServiceTag};
use crate::wizard::Step;

/// Basic "local@domain.tld" shape, no whitespace in either part
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid"));

pub fn step_valid(draft: &QuoteDraft, step: Step) -> bool {
    match step {
        Step::Project => project_step_valid(draft),
        Step::Property => property_step_valid(draft),
        Step::Contact => contact_step_valid(draft),
    }
}

/// Step 1: services chosen, a meaningful title and description, and an
/// elaboration when the property type is "other".
pub fn project_step_valid(draft: &QuoteDraft) -> bool {
    let has_services = !draft.services.is_empty()
        || (draft.has_service(ServiceTag::Other) && !draft.other_service.trim().is_empty());
    let title_ok = draft.title.trim().len() >= 3;
    let description_ok = draft.description.trim().len() >= 10;
    let property_ok =
        draft.property_type != PropertyType::Other || draft.property_other.trim().len() >= 2;

    has_services && title_ok && description_ok && property_ok
}

/// Step 2: a locatable address and, when given, numeric scope fields.
pub fn property_step_valid(draft: &QuoteDraft) -> bool {
    let address_ok = draft.address.trim().len() >= 5
        && draft.city.trim().len() >= 2
        && draft.postal_code.trim().len() >= 4;
    let numbers_ok = optional_number_ok(&draft.area)
        && optional_number_ok(&draft.bedrooms)
        && optional_number_ok(&draft.bathrooms);

    address_ok && numbers_ok
}

/// Step 3: reachable contact details and explicit consent.
pub fn contact_step_valid(draft: &QuoteDraft) -> bool {
    let name_ok = draft.name.trim().len() >= 2;
    let email_ok = is_email(&draft.email);
    let phone_ok = digit_count(&draft.phone) >= 6;
    let consent_ok = draft.consent;

    name_ok && email_ok && phone_ok && consent_ok
}

pub fn is_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Digits remaining after stripping formatting ("+351 912-345" -> 9)
pub fn digit_count(value: &str) -> usize {
    value.chars().filter(char::is_ascii_digit).count()
}

/// Empty is fine; otherwise the value must parse as a finite number.
fn optional_number_ok(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || trimmed.parse::<f64>().is_ok_and(f64::is_finite)
}
