use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::config::Config;

/// Renovation services a client can request a quote for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceTag {
    Kitchen,
    Bathroom,
    Flooring,
    Painting,
    Electrical,
    Plumbing,
    Carpentry,
    Insulation,
    Windows,
    Outdoor,
    Other,
}

impl ServiceTag {
    pub fn all() -> &'static [ServiceTag] {
        &[
            ServiceTag::Kitchen,
            ServiceTag::Bathroom,
            ServiceTag::Flooring,
            ServiceTag::Painting,
            ServiceTag::Electrical,
            ServiceTag::Plumbing,
            ServiceTag::Carpentry,
            ServiceTag::Insulation,
            ServiceTag::Windows,
            ServiceTag::Outdoor,
            ServiceTag::Other,
        ]
    }

    /// Wire value sent to the form backend
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceTag::Kitchen => "kitchen",
            ServiceTag::Bathroom => "bathroom",
            ServiceTag::Flooring => "flooring",
            ServiceTag::Painting => "painting",
            ServiceTag::Electrical => "electrical",
            ServiceTag::Plumbing => "plumbing",
            ServiceTag::Carpentry => "carpentry",
            ServiceTag::Insulation => "insulation",
            ServiceTag::Windows => "windows",
            ServiceTag::Outdoor => "outdoor",
            ServiceTag::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceTag::Kitchen => "Kitchen",
            ServiceTag::Bathroom => "Bathroom",
            ServiceTag::Flooring => "Flooring",
            ServiceTag::Painting => "Painting",
            ServiceTag::Electrical => "Electrical",
            ServiceTag::Plumbing => "Plumbing",
            ServiceTag::Carpentry => "Carpentry",
            ServiceTag::Insulation => "Insulation",
            ServiceTag::Windows => "Windows & doors",
            ServiceTag::Outdoor => "Outdoor (terrace/garden)",
            ServiceTag::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[default]
    Apartment,
    House,
    Commercial,
    Other,
}

impl PropertyType {
    pub fn all() -> &'static [PropertyType] {
        &[
            PropertyType::Apartment,
            PropertyType::House,
            PropertyType::Commercial,
            PropertyType::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "apartment",
            PropertyType::House => "house",
            PropertyType::Commercial => "commercial",
            PropertyType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::House => "House",
            PropertyType::Commercial => "Commercial",
            PropertyType::Other => "Other",
        }
    }
}

/// Estimated budget brackets shown in the wizard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BudgetRange {
    #[serde(rename = "under10k")]
    Under10k,
    #[default]
    #[serde(rename = "10to25")]
    From10To25,
    #[serde(rename = "25to50")]
    From25To50,
    #[serde(rename = "50to100")]
    From50To100,
    #[serde(rename = "over100")]
    Over100,
}

impl BudgetRange {
    pub fn all() -> &'static [BudgetRange] {
        &[
            BudgetRange::Under10k,
            BudgetRange::From10To25,
            BudgetRange::From25To50,
            BudgetRange::From50To100,
            BudgetRange::Over100,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetRange::Under10k => "under10k",
            BudgetRange::From10To25 => "10to25",
            BudgetRange::From25To50 => "25to50",
            BudgetRange::From50To100 => "50to100",
            BudgetRange::Over100 => "over100",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BudgetRange::Under10k => "Below 10,000 EUR",
            BudgetRange::From10To25 => "10,000 - 25,000 EUR",
            BudgetRange::From25To50 => "25,000 - 50,000 EUR",
            BudgetRange::From50To100 => "50,000 - 100,000 EUR",
            BudgetRange::Over100 => "Above 100,000 EUR",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "asap")]
    Asap,
    #[default]
    #[serde(rename = "1to3")]
    OneToThree,
    #[serde(rename = "3to6")]
    ThreeToSix,
    #[serde(rename = "6plus")]
    SixPlus,
}

impl Timeline {
    pub fn all() -> &'static [Timeline] {
        &[
            Timeline::Asap,
            Timeline::OneToThree,
            Timeline::ThreeToSix,
            Timeline::SixPlus,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Timeline::Asap => "asap",
            Timeline::OneToThree => "1to3",
            Timeline::ThreeToSix => "3to6",
            Timeline::SixPlus => "6plus",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Timeline::Asap => "As soon as possible",
            Timeline::OneToThree => "1-3 months",
            Timeline::ThreeToSix => "3-6 months",
            Timeline::SixPlus => "6+ months",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteAccess {
    #[default]
    Occupied,
    Empty,
    Undecided,
}

impl SiteAccess {
    pub fn all() -> &'static [SiteAccess] {
        &[SiteAccess::Occupied, SiteAccess::Empty, SiteAccess::Undecided]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SiteAccess::Occupied => "occupied",
            SiteAccess::Empty => "empty",
            SiteAccess::Undecided => "undecided",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SiteAccess::Occupied => "Property is occupied",
            SiteAccess::Empty => "Property is empty",
            SiteAccess::Undecided => "Not decided yet",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactChannel {
    #[default]
    Email,
    Phone,
    Whatsapp,
}

impl ContactChannel {
    pub fn all() -> &'static [ContactChannel] {
        &[
            ContactChannel::Email,
            ContactChannel::Phone,
            ContactChannel::Whatsapp,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactChannel::Email => "email",
            ContactChannel::Phone => "phone",
            ContactChannel::Whatsapp => "whatsapp",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ContactChannel::Email => "Email",
            ContactChannel::Phone => "Phone call",
            ContactChannel::Whatsapp => "WhatsApp",
        }
    }
}

/// How the client heard about the company
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferralSource {
    #[default]
    Google,
    Instagram,
    Friend,
    Repeat,
    Other,
}

impl ReferralSource {
    pub fn all() -> &'static [ReferralSource] {
        &[
            ReferralSource::Google,
            ReferralSource::Instagram,
            ReferralSource::Friend,
            ReferralSource::Repeat,
            ReferralSource::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReferralSource::Google => "google",
            ReferralSource::Instagram => "instagram",
            ReferralSource::Friend => "friend",
            ReferralSource::Repeat => "repeat",
            ReferralSource::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReferralSource::Google => "Google",
            ReferralSource::Instagram => "Instagram",
            ReferralSource::Friend => "Friend / referral",
            ReferralSource::Repeat => "Returning client",
            ReferralSource::Other => "Other",
        }
    }
}

/// The in-progress quote request.
///
/// Every field defaults so that a stored draft merges over the empty
/// draft field-by-field: restored values win, absent fields keep their
/// defaults. Attachments are never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QuoteDraft {
    // Step 1 - project & services
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub services: Vec<ServiceTag>,
    #[serde(default)]
    pub other_service: String,
    #[serde(default)]
    pub property_type: PropertyType,
    #[serde(default)]
    pub property_other: String,
    #[serde(default)]
    pub description: String,

    // Step 2 - property & scope
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub postal_code: String,
    /// Area in square meters, kept as entered and validated as numeric
    #[serde(default)]
    pub area: String,
    #[serde(default)]
    pub bedrooms: String,
    #[serde(default)]
    pub bathrooms: String,
    #[serde(default)]
    pub budget: BudgetRange,
    #[serde(default)]
    pub timeline: Timeline,
    #[serde(default)]
    pub site_access: SiteAccess,
    /// Files to attach on submit; not serializable, so never persisted
    #[serde(skip)]
    pub attachments: Vec<PathBuf>,

    // Step 3 - contact
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub preferred_contact: ContactChannel,
    #[serde(default)]
    pub referral: ReferralSource,
    #[serde(default)]
    pub referral_other: String,
    #[serde(default)]
    pub consent: bool,

    /// Anti-automation trap. Hidden from the wizard; a non-empty value
    /// marks the submission as automated and it is rejected locally.
    #[serde(default)]
    pub company_trap: String,

    #[serde(skip)]
    store_path: PathBuf,
}

impl QuoteDraft {
    /// Load the saved draft, or start empty when there is none.
    ///
    /// Malformed stored data is discarded silently; the wizard must
    /// never fail to start because of a bad autosave.
    pub fn load(config: &Config) -> Self {
        let store_path = config.draft_path();

        let mut draft = match fs::read_to_string(&store_path) {
            Ok(contents) => match serde_json::from_str::<QuoteDraft>(&contents) {
                Ok(draft) => draft,
                Err(e) => {
                    tracing::warn!(error = %e, "Stored draft is malformed, starting empty");
                    QuoteDraft::default()
                }
            },
            Err(_) => QuoteDraft::default(),
        };

        draft.store_path = store_path;
        draft
    }

    /// Persist the draft to its slot. Attachments are excluded via serde.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.store_path.parent() {
            fs::create_dir_all(parent).context("Failed to create draft directory")?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(&self.store_path, contents).context("Failed to write draft file")?;
        Ok(())
    }

    /// Remove the persisted slot, if any.
    pub fn clear_persisted(&self) -> Result<()> {
        match fs::remove_file(&self.store_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove draft file"),
        }
    }

    /// Reset to the empty draft, keeping the storage slot binding.
    pub fn reset(&mut self) {
        let store_path = std::mem::take(&mut self.store_path);
        *self = QuoteDraft::default();
        self.store_path = store_path;
    }

    /// Add the tag if absent, remove it if present.
    pub fn toggle_service(&mut self, tag: ServiceTag) {
        if self.services.contains(&tag) {
            self.services.retain(|t| *t != tag);
        } else {
            self.services.push(tag);
        }
    }

    pub fn has_service(&self, tag: ServiceTag) -> bool {
        self.services.contains(&tag)
    }

    /// Whether the persisted slot currently exists on disk.
    pub fn is_persisted(&self) -> bool {
        self.store_path.exists()
    }

    #[cfg(test)]
    pub(crate) fn with_store_path(store_path: PathBuf) -> Self {
        Self {
            store_path,
            ..Self::default()
        }
    }

    #[cfg(test)]
    pub(crate) fn store_path(&self) -> &std::path::Path {
        &self.store_path
    }
}
