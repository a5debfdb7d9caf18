//! Customer reviews feed.
//!
//! Fetches the business rating summary and review list from the
//! configured endpoint. When the endpoint is unreachable or yields
//! nothing usable, a fixed set of local testimonials stands in so the
//! carousel is never empty.

use serde::Deserialize;

use crate::api::error::ApiError;
use crate::config::Config;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub author: String,
    #[serde(default)]
    pub profile_photo_url: Option<String>,
    #[serde(default)]
    pub rating: Option<u8>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub publish_time: Option<String>,
}

impl Review {
    /// A review with no text renders as an empty card; skip it.
    pub fn is_usable(&self) -> bool {
        !self.text.trim().is_empty()
    }

    fn local(author: &str, rating: u8, text: &str, publish_time: &str) -> Self {
        Self {
            author: author.to_string(),
            profile_photo_url: None,
            rating: Some(rating),
            text: text.to_string(),
            publish_time: Some(publish_time.to_string()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewSummary {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub maps_url: Option<String>,
    #[serde(default)]
    pub reviews: Vec<Review>,
    /// True when this summary is the built-in testimonial list rather
    /// than live endpoint data
    #[serde(skip)]
    pub is_fallback: bool,
}

impl ReviewSummary {
    /// Usable reviews, capped to the display limit.
    pub fn usable_reviews(&self, limit: usize) -> Vec<&Review> {
        self.reviews
            .iter()
            .filter(|r| r.is_usable())
            .take(limit)
            .collect()
    }

    pub fn has_usable_reviews(&self) -> bool {
        self.reviews.iter().any(Review::is_usable)
    }

    /// The built-in testimonial list shown when the endpoint yields
    /// nothing usable.
    pub fn fallback() -> Self {
        Self {
            name: "Client testimonials".to_string(),
            rating: None,
            count: None,
            maps_url: None,
            is_fallback: true,
            reviews: vec![
                Review::local(
                    "Ana M.",
                    5,
                    "Very professional team. They kept to the schedule and left everything \
                     clean. My kitchen looks brand new!",
                    "2025-07-12",
                ),
                Review::local(
                    "Joao R.",
                    5,
                    "Bathroom renovation with no surprises in the budget. Loved the finishes \
                     and the communication.",
                    "2025-06-28",
                ),
                Review::local(
                    "Catarina S.",
                    4,
                    "Impeccable interior painting. The care taken protecting the furniture \
                     showed excellent attention to detail.",
                    "2025-05-15",
                ),
                Review::local(
                    "Miguel T.",
                    5,
                    "Floor and door replacement: fast and precise work. Transparent quote \
                     from the start.",
                    "2025-04-02",
                ),
                Review::local(
                    "Rita L.",
                    5,
                    "They renovated the living room and opened up the kitchen. Followed the \
                     whole process and suggested smart solutions.",
                    "2025-03-10",
                ),
                Review::local(
                    "Pedro A.",
                    4,
                    "Excellent value for money. I will hire them again for the balcony and \
                     the laundry room.",
                    "2025-02-21",
                ),
            ],
        }
    }
}

pub struct ReviewsClient {
    endpoint: String,
    limit: usize,
    client: reqwest::Client,
}

impl ReviewsClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("renoquote/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::network(e.to_string()))?;
        Ok(Self {
            endpoint: config.reviews.endpoint.clone(),
            limit: config.reviews.limit,
            client,
        })
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub async fn fetch(&self) -> Result<ReviewSummary, ApiError> {
        let response = self.client.get(&self.endpoint).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let reason = crate::api::submit::extract_failure_reason(&body)
                .unwrap_or_else(|| "Failed to load reviews".to_string());
            return Err(ApiError::rejected(status.as_u16(), reason));
        }

        let summary = response.json::<ReviewSummary>().await?;
        Ok(summary)
    }

    /// Fetch live reviews, falling back to the local testimonials on
    /// any error or when nothing usable comes back.
    pub async fn fetch_or_fallback(&self) -> ReviewSummary {
        match self.fetch().await {
            Ok(summary) if summary.has_usable_reviews() => summary,
            Ok(_) => {
                tracing::info!("Reviews endpoint returned no usable reviews, using fallback");
                ReviewSummary::fallback()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch reviews, using fallback");
                ReviewSummary::fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_reviews_are_unusable() {
        let payload = r#"{
            "name": "RenoHome",
            "rating": 4.8,
            "count": 37,
            "mapsUrl": "https://maps.example.com/renohome",
            "reviews": [
                {"author": "A", "text": "Great work"},
                {"author": "B", "text": "   "},
                {"author": "C", "text": ""}
            ]
        }"#;
        let summary: ReviewSummary = serde_json::from_str(payload).unwrap();

        assert_eq!(summary.name, "RenoHome");
        assert_eq!(summary.count, Some(37));
        let usable = summary.usable_reviews(12);
        assert_eq!(usable.len(), 1);
        assert_eq!(usable[0].author, "A");
    }

    #[test]
    fn test_usable_reviews_respects_limit() {
        let mut summary = ReviewSummary::fallback();
        summary.reviews.truncate(6);
        assert_eq!(summary.usable_reviews(3).len(), 3);
    }

    #[test]
    fn test_fallback_is_flagged_and_populated() {
        let fallback = ReviewSummary::fallback();
        assert!(fallback.is_fallback);
        assert!(fallback.has_usable_reviews());
        assert!(fallback.reviews.iter().all(Review::is_usable));
        assert!(fallback.reviews.iter().all(|r| r.rating.is_some()));
    }

    #[test]
    fn test_payload_fields_are_optional() {
        let summary: ReviewSummary = serde_json::from_str(r#"{"name":"X"}"#).unwrap();
        assert!(summary.reviews.is_empty());
        assert!(summary.rating.is_none());
        assert!(!summary.has_usable_reviews());
    }

    #[test]
    fn test_review_camel_case_fields() {
        let review: Review = serde_json::from_str(
            r#"{"author":"A","profilePhotoUrl":"https://x/p.jpg","rating":5,"text":"ok","publishTime":"2025-01-01"}"#,
        )
        .unwrap();
        assert_eq!(review.profile_photo_url.as_deref(), Some("https://x/p.jpg"));
        assert_eq!(review.publish_time.as_deref(), Some("2025-01-01"));
    }
}
