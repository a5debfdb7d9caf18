//! Submission of a finished draft to the third-party form backend.
//!
//! The draft is flattened into multipart fields, posted, and the
//! response reduced to success or a human-readable failure reason. The
//! transport sits behind a trait so the submission path can be
//! exercised without a network.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::api::error::{ApiError, GENERIC_REJECTION};
use crate::config::{Config, FormConfig};
use crate::draft::{PropertyType, QuoteDraft, ReferralSource};

/// One outbound multipart field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadField {
    Text { name: String, value: String },
    Attachment { name: String, path: PathBuf },
}

impl PayloadField {
    fn text(name: &str, value: impl Into<String>) -> Self {
        PayloadField::Text {
            name: name.to_string(),
            value: value.into(),
        }
    }
}

/// Raw response handed back by a transport
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Seam between the submission logic and the actual HTTP stack
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    async fn post(
        &self,
        endpoint: &str,
        fields: Vec<PayloadField>,
    ) -> Result<TransportResponse, ApiError>;
}

/// Flatten the draft into its wire fields.
///
/// Optional fields are omitted when empty; elaborations ride along only
/// when their "other" choice is active. Metadata fields carry the
/// subject line, reply-to address and rendering hint the backend
/// understands.
pub fn build_payload(draft: &QuoteDraft, form: &FormConfig) -> Vec<PayloadField> {
    let mut fields = Vec::new();

    fields.push(PayloadField::text("projectTitle", &draft.title));
    fields.push(PayloadField::text(
        "services",
        draft
            .services
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    ));
    if !draft.other_service.trim().is_empty() {
        fields.push(PayloadField::text("otherService", &draft.other_service));
    }

    fields.push(PayloadField::text(
        "propertyType",
        draft.property_type.as_str(),
    ));
    if draft.property_type == PropertyType::Other && !draft.property_other.trim().is_empty() {
        fields.push(PayloadField::text("propertyOther", &draft.property_other));
    }
    fields.push(PayloadField::text(
        "projectDescription",
        &draft.description,
    ));

    fields.push(PayloadField::text("address", &draft.address));
    fields.push(PayloadField::text("city", &draft.city));
    fields.push(PayloadField::text("postalCode", &draft.postal_code));
    if !draft.area.trim().is_empty() {
        fields.push(PayloadField::text("areaM2", &draft.area));
    }
    if !draft.bedrooms.trim().is_empty() {
        fields.push(PayloadField::text("bedrooms", &draft.bedrooms));
    }
    if !draft.bathrooms.trim().is_empty() {
        fields.push(PayloadField::text("bathrooms", &draft.bathrooms));
    }
    fields.push(PayloadField::text("budgetRange", draft.budget.as_str()));
    fields.push(PayloadField::text("timeline", draft.timeline.as_str()));
    fields.push(PayloadField::text("siteAccess", draft.site_access.as_str()));

    for path in &draft.attachments {
        fields.push(PayloadField::Attachment {
            name: "attachments".to_string(),
            path: path.clone(),
        });
    }

    fields.push(PayloadField::text("name", &draft.name));
    fields.push(PayloadField::text("email", &draft.email));
    fields.push(PayloadField::text("phone", &draft.phone));
    fields.push(PayloadField::text(
        "preferredContact",
        draft.preferred_contact.as_str(),
    ));
    fields.push(PayloadField::text("howHeard", draft.referral.as_str()));
    if draft.referral == ReferralSource::Other && !draft.referral_other.trim().is_empty() {
        fields.push(PayloadField::text("howHeardOther", &draft.referral_other));
    }
    fields.push(PayloadField::text(
        "consent",
        if draft.consent { "yes" } else { "no" },
    ));

    fields.push(PayloadField::text("summary", summary_block(draft)));

    fields.push(PayloadField::text(
        "_subject",
        format!("{} {}", form.subject_prefix, draft.title),
    ));
    fields.push(PayloadField::text("_replyto", &draft.email));
    fields.push(PayloadField::text("_template", &form.template));

    fields
}

/// One readable block with every populated field, so the request is
/// legible in the operator's inbox without the table rendering.
pub fn summary_block(draft: &QuoteDraft) -> String {
    let mut lines = Vec::new();
    let mut push = |label: &str, value: &str| {
        if !value.trim().is_empty() {
            lines.push(format!("{label}: {value}"));
        }
    };

    push("Project", &draft.title);
    push(
        "Services",
        &draft
            .services
            .iter()
            .map(|s| s.label())
            .collect::<Vec<_>>()
            .join(", "),
    );
    push("Other service", &draft.other_service);
    push("Property type", draft.property_type.label());
    push("Property details", &draft.property_other);
    push("Description", &draft.description);
    push("Address", &draft.address);
    push("City", &draft.city);
    push("Postal code", &draft.postal_code);
    push("Area (m2)", &draft.area);
    push("Bedrooms", &draft.bedrooms);
    push("Bathrooms", &draft.bathrooms);
    push("Budget", draft.budget.label());
    push("Timeline", draft.timeline.label());
    push("Site access", draft.site_access.label());
    push("Name", &draft.name);
    push("Email", &draft.email);
    push("Phone", &draft.phone);
    push("Preferred contact", draft.preferred_contact.label());
    push("Heard about us", draft.referral.label());
    push("Heard about us (other)", &draft.referral_other);
    push("Consent", if draft.consent { "yes" } else { "no" });

    lines.join("\n")
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

/// Pull a human-readable reason out of a rejection body.
///
/// Preference order: structured error list, single error field, raw
/// text. Structured bodies that carry no message yield nothing rather
/// than leaking JSON at the user.
pub fn extract_failure_reason(body: &str) -> Option<String> {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = serde_json::from_str::<ErrorBody>(trimmed) {
        let messages: Vec<String> = parsed
            .errors
            .iter()
            .filter_map(|e| e.message.as_deref())
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from)
            .collect();
        if !messages.is_empty() {
            return Some(messages.join("; "));
        }
        if let Some(error) = parsed.error {
            let error = error.trim().to_string();
            if !error.is_empty() {
                return Some(error);
            }
        }
        return None;
    }

    Some(trimmed.to_string())
}

/// Transport backed by reqwest multipart
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("renoquote/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SubmissionTransport for HttpTransport {
    async fn post(
        &self,
        endpoint: &str,
        fields: Vec<PayloadField>,
    ) -> Result<TransportResponse, ApiError> {
        let mut multipart = reqwest::multipart::Form::new();

        for field in fields {
            match field {
                PayloadField::Text { name, value } => {
                    multipart = multipart.text(name, value);
                }
                PayloadField::Attachment { name, path } => {
                    let bytes = tokio::fs::read(&path).await.map_err(|e| {
                        ApiError::attachment(path.display().to_string(), e.to_string())
                    })?;
                    let file_name = path
                        .file_name()
                        .map_or_else(|| "attachment".to_string(), |n| {
                            n.to_string_lossy().to_string()
                        });
                    multipart =
                        multipart.part(name, reqwest::multipart::Part::bytes(bytes).file_name(file_name));
                }
            }
        }

        let response = self
            .client
            .post(endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(multipart)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        Ok(TransportResponse { status, body })
    }
}

/// Sends a draft to the configured endpoint and reduces the response to
/// accepted or a failure with a displayable reason.
#[derive(Clone)]
pub struct SubmissionClient {
    endpoint: String,
    form: FormConfig,
    transport: Arc<dyn SubmissionTransport>,
}

impl SubmissionClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Ok(Self::with_transport(config, Arc::new(HttpTransport::new()?)))
    }

    /// Client over an arbitrary transport; used by tests to simulate
    /// endpoint behavior without a network.
    pub fn with_transport(config: &Config, transport: Arc<dyn SubmissionTransport>) -> Self {
        Self {
            endpoint: config.form.endpoint.clone(),
            form: config.form.clone(),
            transport,
        }
    }

    pub async fn send(&self, draft: &QuoteDraft) -> Result<(), ApiError> {
        let fields = build_payload(draft, &self.form);
        tracing::info!(endpoint = %self.endpoint, fields = fields.len(), "Submitting quote request");

        let response = self.transport.post(&self.endpoint, fields).await?;

        if response.is_success() {
            return Ok(());
        }

        let reason = extract_failure_reason(&response.body)
            .unwrap_or_else(|| GENERIC_REJECTION.to_string());
        Err(ApiError::rejected(response.status, reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{ContactChannel, ServiceTag};

    fn form_config() -> FormConfig {
        FormConfig::default()
    }

    fn sample_draft() -> QuoteDraft {
        let mut draft = QuoteDraft::default();
        draft.title = "Kitchen remodel".to_string();
        draft.services = vec![ServiceTag::Kitchen, ServiceTag::Plumbing];
        draft.description = "New cabinets and sink relocation".to_string();
        draft.address = "Rua das Flores 12".to_string();
        draft.city = "Porto".to_string();
        draft.postal_code = "4000-123".to_string();
        draft.area = "85".to_string();
        draft.name = "Ana Martins".to_string();
        draft.email = "ana@example.com".to_string();
        draft.phone = "912345678".to_string();
        draft.preferred_contact = ContactChannel::Whatsapp;
        draft.consent = true;
        draft
    }

    fn text_value<'a>(fields: &'a [PayloadField], name: &str) -> Option<&'a str> {
        fields.iter().find_map(|f| match f {
            PayloadField::Text { name: n, value } if n == name => Some(value.as_str()),
            _ => None,
        })
    }

    #[test]
    fn test_payload_maps_core_fields() {
        let fields = build_payload(&sample_draft(), &form_config());

        assert_eq!(text_value(&fields, "projectTitle"), Some("Kitchen remodel"));
        assert_eq!(text_value(&fields, "services"), Some("kitchen, plumbing"));
        assert_eq!(text_value(&fields, "propertyType"), Some("apartment"));
        assert_eq!(text_value(&fields, "areaM2"), Some("85"));
        assert_eq!(text_value(&fields, "budgetRange"), Some("10to25"));
        assert_eq!(text_value(&fields, "preferredContact"), Some("whatsapp"));
        assert_eq!(text_value(&fields, "consent"), Some("yes"));
    }

    #[test]
    fn test_payload_omits_empty_optionals() {
        let mut draft = sample_draft();
        draft.area = String::new();
        draft.bedrooms = "   ".to_string();
        let fields = build_payload(&draft, &form_config());

        assert_eq!(text_value(&fields, "areaM2"), None);
        assert_eq!(text_value(&fields, "bedrooms"), None);
        assert_eq!(text_value(&fields, "otherService"), None);
        assert_eq!(text_value(&fields, "propertyOther"), None);
        assert_eq!(text_value(&fields, "howHeardOther"), None);
    }

    #[test]
    fn test_payload_metadata_fields() {
        let fields = build_payload(&sample_draft(), &form_config());

        let subject = text_value(&fields, "_subject").unwrap();
        assert!(subject.ends_with("Kitchen remodel"));
        assert_eq!(text_value(&fields, "_replyto"), Some("ana@example.com"));
        assert_eq!(text_value(&fields, "_template"), Some("table"));
    }

    #[test]
    fn test_payload_elaborations_follow_other_choices() {
        let mut draft = sample_draft();
        draft.property_type = PropertyType::Other;
        draft.property_other = "Warehouse loft".to_string();
        draft.referral = ReferralSource::Other;
        draft.referral_other = "Trade fair".to_string();

        let fields = build_payload(&draft, &form_config());
        assert_eq!(text_value(&fields, "propertyOther"), Some("Warehouse loft"));
        assert_eq!(text_value(&fields, "howHeardOther"), Some("Trade fair"));
    }

    #[test]
    fn test_payload_repeats_attachment_field_name() {
        let mut draft = sample_draft();
        draft.attachments = vec![PathBuf::from("/tmp/a.pdf"), PathBuf::from("/tmp/b.jpg")];

        let fields = build_payload(&draft, &form_config());
        let attachment_names: Vec<_> = fields
            .iter()
            .filter_map(|f| match f {
                PayloadField::Attachment { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(attachment_names, vec!["attachments", "attachments"]);
    }

    #[test]
    fn test_summary_block_skips_empty_fields() {
        let draft = sample_draft();
        let summary = summary_block(&draft);

        assert!(summary.contains("Project: Kitchen remodel"));
        assert!(summary.contains("Services: Kitchen, Plumbing"));
        assert!(!summary.contains("Bedrooms"));
        assert!(!summary.contains("Other service"));
    }

    #[test]
    fn test_reason_prefers_structured_error_list() {
        let body = r#"{"errors":[{"message":"Invalid email"}]}"#;
        assert_eq!(
            extract_failure_reason(body),
            Some("Invalid email".to_string())
        );
    }

    #[test]
    fn test_reason_joins_multiple_structured_errors() {
        let body = r#"{"errors":[{"message":"Invalid email"},{"message":"Missing name"}]}"#;
        assert_eq!(
            extract_failure_reason(body),
            Some("Invalid email; Missing name".to_string())
        );
    }

    #[test]
    fn test_reason_falls_back_to_error_field() {
        let body = r#"{"error":"Form not found"}"#;
        assert_eq!(
            extract_failure_reason(body),
            Some("Form not found".to_string())
        );
    }

    #[test]
    fn test_reason_falls_back_to_raw_text() {
        assert_eq!(
            extract_failure_reason("Service unavailable"),
            Some("Service unavailable".to_string())
        );
    }

    #[test]
    fn test_reason_none_for_empty_or_messageless_bodies() {
        assert_eq!(extract_failure_reason(""), None);
        assert_eq!(extract_failure_reason("   "), None);
        assert_eq!(extract_failure_reason("{}"), None);
        assert_eq!(extract_failure_reason(r#"{"errors":[]}"#), None);
    }
}
