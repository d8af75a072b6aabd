use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use time::OffsetDateTime;

/// How strict the printed date is: quality (`best_before`) or safety (`use_by`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "expiry_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ExpiryType {
    BestBefore,
    UseBy,
}

impl ExpiryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpiryType::BestBefore => "best_before",
            ExpiryType::UseBy => "use_by",
        }
    }
}

impl fmt::Display for ExpiryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown expiry type: {0}")]
pub struct UnknownExpiryType(String);

impl FromStr for ExpiryType {
    type Err = UnknownExpiryType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "best_before" => Ok(ExpiryType::BestBefore),
            "use_by" => Ok(ExpiryType::UseBy),
            other => Err(UnknownExpiryType(other.to_owned())),
        }
    }
}

/// Product record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i64,
    pub user_id: i64, // owner, part of every lookup predicate
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub expiry_date: OffsetDateTime,
    pub expiry_type: ExpiryType,
    pub is_notified: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub deleted_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub user_id: i64,
    pub name: String,
    pub description: String,
    pub quantity: i32,
    pub expiry_date: OffsetDateTime,
    pub expiry_type: ExpiryType,
    pub is_notified: bool,
}

/// Column updates; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub expiry_date: Option<OffsetDateTime>,
    pub expiry_type: Option<ExpiryType>,
    pub is_notified: Option<bool>,
}
