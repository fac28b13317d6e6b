//! Event Entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketType {
    Free,
    Paid,
}

impl Default for TicketType {
    fn default() -> Self {
        Self::Free
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// TSID as Crockford Base32 string
    #[serde(rename = "_id")]
    pub id: String,

    /// Globally unique, derived from the title at creation, never
    /// regenerated afterwards.
    pub slug: String,

    pub title: String,
    pub description: String,
    pub location: String,
    pub hosted_by: String,

    pub start_date: DateTime<Utc>,

    /// Must be >= start_date when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,

    /// 0 means unlimited.
    #[serde(default)]
    pub capacity: u32,

    #[serde(default)]
    pub ticket_type: TicketType,

    /// 0 unless ticket_type is Paid.
    #[serde(default)]
    pub price: f64,

    /// Reference to a stored image asset, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Owning organiser, immutable after creation.
    pub organiser_id: String,

    #[serde(default)]
    pub is_approved: bool,

    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.start_date < now
    }

    pub fn is_unlimited(&self) -> bool {
        self.capacity == 0
    }
}

/// Validated input for creating or updating an event.
#[derive(Debug, Clone)]
pub struct EventDetails {
    pub title: String,
    pub description: String,
    pub location: String,
    pub hosted_by: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub capacity: u32,
    pub ticket_type: TicketType,
    pub price: f64,
    pub image: Option<String>,
}

impl EventDetails {
    /// Required fields must be non-empty and the schedule ordered.
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("title", &self.title),
            ("description", &self.description),
            ("location", &self.location),
            ("hostedBy", &self.hosted_by),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(AppError::validation(format!("Missing required field: {field}")));
            }
        }
        if let Some(end) = self.end_date {
            if end < self.start_date {
                return Err(AppError::InvalidSchedule);
            }
        }
        Ok(())
    }

    /// Paid events keep their price; free events are forced to 0.
    pub fn effective_price(&self) -> f64 {
        match self.ticket_type {
            TicketType::Paid => self.price,
            TicketType::Free => 0.0,
        }
    }
}

/// Slugify a title: lowercase, alphanumerics kept, everything else
/// collapsed into single dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut last_dash = true;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("event");
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn details(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> EventDetails {
        EventDetails {
            title: "Spring Fest".to_string(),
            description: "A festival".to_string(),
            location: "Park".to_string(),
            hosted_by: "Parks Dept".to_string(),
            start_date: start,
            end_date: end,
            capacity: 0,
            ticket_type: TicketType::Free,
            price: 0.0,
            image: None,
        }
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Spring Fest"), "spring-fest");
        assert_eq!(slugify("Rust & Friends 2026!"), "rust-friends-2026");
        assert_eq!(slugify("  --  "), "event");
    }

    #[test]
    fn test_schedule_validation() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 18, 0, 0).unwrap();
        let earlier = Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap();

        assert!(details(start, None).validate().is_ok());
        assert!(details(start, Some(start)).validate().is_ok());
        assert!(matches!(
            details(start, Some(earlier)).validate(),
            Err(AppError::InvalidSchedule)
        ));
    }

    #[test]
    fn test_required_fields() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 18, 0, 0).unwrap();
        let mut d = details(start, None);
        d.title = "   ".to_string();
        assert!(matches!(d.validate(), Err(AppError::Validation { .. })));
    }

    #[test]
    fn test_free_events_have_zero_price() {
        let start = Utc.with_ymd_and_hms(2026, 9, 1, 18, 0, 0).unwrap();
        let mut d = details(start, None);
        d.price = 25.0;
        assert_eq!(d.effective_price(), 0.0);

        d.ticket_type = TicketType::Paid;
        assert_eq!(d.effective_price(), 25.0);
    }
}
