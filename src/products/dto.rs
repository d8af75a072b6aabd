use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, UtcOffset};

use super::repo_types::{ExpiryType, NewProduct, Product, ProductChanges};

/// Body of `POST /products`. The owner comes from the token, never from here.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductPayload {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: i32,
    #[serde(default, deserialize_with = "expiry_date::deserialize")]
    pub expiry_date: Option<OffsetDateTime>,
    #[serde(default, rename = "type")]
    pub expiry_type: String,
    #[serde(default)]
    pub is_notified: Option<bool>,
}

impl ProductPayload {
    /// `None` if a required field is missing; call after validation.
    pub fn into_new_product(self, user_id: i64) -> Option<NewProduct> {
        Some(NewProduct {
            user_id,
            expiry_date: self.expiry_date?,
            expiry_type: self.expiry_type.parse().ok()?,
            is_notified: self.is_notified?,
            name: self.name,
            description: self.description,
            quantity: self.quantity,
        })
    }
}

/// Body of `PUT /products/:product_id`; absent fields stay unchanged.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "expiry_date::deserialize")]
    pub expiry_date: Option<OffsetDateTime>,
    #[serde(default, rename = "type")]
    pub expiry_type: Option<String>,
    #[serde(default)]
    pub is_notified: Option<bool>,
}

impl ProductPatch {
    pub fn into_changes(self) -> ProductChanges {
        ProductChanges {
            name: self.name,
            description: self.description,
            quantity: self.quantity,
            expiry_date: self.expiry_date,
            expiry_type: self.expiry_type.and_then(|t| t.parse().ok()),
            is_notified: self.is_notified,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub quantity: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub expiry_date: OffsetDateTime,
    #[serde(rename = "type")]
    pub expiry_type: ExpiryType,
    pub is_notified: bool,
    pub days_left: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ProductResponse {
    /// `days_left` counts UTC calendar days from `today`; negative once overdue.
    pub fn project(p: Product, today: Date) -> Self {
        Self {
            days_left: days_left(p.expiry_date, today),
            id: p.id,
            name: p.name,
            description: p.description,
            quantity: p.quantity,
            expiry_date: p.expiry_date,
            expiry_type: p.expiry_type,
            is_notified: p.is_notified,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

pub fn days_left(expiry_date: OffsetDateTime, today: Date) -> i64 {
    (expiry_date.to_offset(UtcOffset::UTC).date() - today).whole_days()
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
/// An empty string counts as absent.
mod expiry_date {
    use serde::{Deserialize, Deserializer};
    use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        parse(raw).map(Some).map_err(serde::de::Error::custom)
    }

    fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
        OffsetDateTime::parse(raw, &Rfc3339).or_else(|_| {
            Date::parse(raw, format_description!("[year]-[month]-[day]"))
                .map(|d| d.midnight().assume_utc())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};
    use time::Duration;

    fn product(expiry_date: OffsetDateTime) -> Product {
        let now = OffsetDateTime::now_utc();
        Product {
            id: 1,
            user_id: 9,
            name: "milk".into(),
            description: "2L".into(),
            quantity: 1,
            expiry_date,
            expiry_type: ExpiryType::UseBy,
            is_notified: false,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }

    #[test]
    fn days_left_counts_calendar_days() {
        let today = date!(2024 - 03 - 10);
        assert_eq!(days_left(datetime!(2024-03-17 0:00 UTC), today), 7);
        assert_eq!(days_left(datetime!(2024-03-17 23:59 UTC), today), 7);
        assert_eq!(days_left(datetime!(2024-03-10 12:00 UTC), today), 0);
        assert_eq!(days_left(datetime!(2024-03-07 8:00 UTC), today), -3);
    }

    #[test]
    fn days_left_uses_utc_date_of_offset_timestamps() {
        let today = date!(2024 - 03 - 10);
        // 2024-03-12 01:00 +09:00 is 2024-03-11 16:00 UTC.
        assert_eq!(days_left(datetime!(2024-03-12 1:00 +9), today), 1);
    }

    #[test]
    fn days_left_from_now() {
        let now = OffsetDateTime::now_utc();
        let resp = ProductResponse::project(product(now + Duration::days(5)), now.date());
        assert_eq!(resp.days_left, 5);
        let resp = ProductResponse::project(product(now - Duration::days(2)), now.date());
        assert_eq!(resp.days_left, -2);
    }

    #[test]
    fn response_drops_owner_and_renames_type() {
        let resp = ProductResponse::project(product(datetime!(2024-03-17 0:00 UTC)), date!(2024 - 03 - 10));
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("user_id").is_none());
        assert_eq!(json["type"], "use_by");
        assert_eq!(json["expiry_date"], "2024-03-17T00:00:00Z");
        assert_eq!(json["days_left"], 7);
    }

    #[test]
    fn payload_accepts_date_only_and_rfc3339() {
        let p: ProductPayload = serde_json::from_value(serde_json::json!({
            "name": "eggs",
            "quantity": 6,
            "expiry_date": "2024-05-01",
            "type": "best_before",
            "is_notified": false
        }))
        .unwrap();
        assert_eq!(p.expiry_date, Some(datetime!(2024-05-01 0:00 UTC)));

        let p: ProductPayload = serde_json::from_value(serde_json::json!({
            "expiry_date": "2024-05-01T10:30:00+09:00"
        }))
        .unwrap();
        assert_eq!(p.expiry_date, Some(datetime!(2024-05-01 10:30 +9)));
    }

    #[test]
    fn payload_treats_missing_and_empty_as_absent() {
        let p: ProductPayload = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(p.expiry_date.is_none());
        assert!(p.is_notified.is_none());

        let p: ProductPayload =
            serde_json::from_value(serde_json::json!({ "expiry_date": "" })).unwrap();
        assert!(p.expiry_date.is_none());
    }

    #[test]
    fn payload_rejects_unparseable_dates() {
        let res: Result<ProductPayload, _> =
            serde_json::from_value(serde_json::json!({ "expiry_date": "next tuesday" }));
        assert!(res.is_err());
    }

    #[test]
    fn into_new_product_requires_complete_payload() {
        let full = ProductPayload {
            name: "milk".into(),
            description: String::new(),
            quantity: 1,
            expiry_date: Some(datetime!(2024-03-17 0:00 UTC)),
            expiry_type: "use_by".into(),
            is_notified: Some(true),
        };
        let new = full.clone().into_new_product(3).unwrap();
        assert_eq!(new.user_id, 3);
        assert_eq!(new.expiry_type, ExpiryType::UseBy);
        assert!(new.is_notified);

        let missing = ProductPayload { is_notified: None, ..full };
        assert!(missing.into_new_product(3).is_none());
    }
}
