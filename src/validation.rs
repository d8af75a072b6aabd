use std::fmt;
use std::str::FromStr;

use lazy_static::lazy_static;
use regex::Regex;

use crate::auth::dto::{LoginRequest, SignUpRequest};
use crate::products::dto::{ProductPatch, ProductPayload};
use crate::products::repo_types::ExpiryType;

const MAX_TEXT_LEN: usize = 30;
const MIN_PASSWORD_LEN: usize = 6;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@(?:[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?\.)+[A-Za-z]{2,}$"
    )
    .expect("email pattern compiles");
}

/// A single rule violation on one input field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

/// Every violated field of one input, sorted by field name.
///
/// Renders as `"<field>: <message>; <field>: <message>."`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    fn check(&mut self, field: &'static str, outcome: Option<&'static str>) {
        if let Some(message) = outcome {
            self.errors.push(FieldError { field, message });
        }
    }

    fn into_result(mut self) -> Result<(), Self> {
        if self.errors.is_empty() {
            return Ok(());
        }
        self.errors.sort_by(|a, b| a.field.cmp(b.field));
        Err(self)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        f.write_str(".")
    }
}

impl std::error::Error for ValidationErrors {}

pub fn validate_sign_up(req: &SignUpRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.check("email", email(&req.email));
    errors.check("password", password(&req.password));
    errors.check("name", name(&req.name));
    errors.into_result()
}

/// Same as sign-up minus `name`, which login ignores.
pub fn validate_login(req: &LoginRequest) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.check("email", email(&req.email));
    errors.check("password", password(&req.password));
    errors.into_result()
}

pub fn validate_product(p: &ProductPayload) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.check("name", name(&p.name));
    errors.check("quantity", quantity(p.quantity));
    errors.check(
        "expiry_date",
        p.expiry_date.is_none().then_some("expiry date is required"),
    );
    errors.check("type", expiry_type(&p.expiry_type));
    errors.check(
        "is_notified",
        p.is_notified.is_none().then_some("is notified is required"),
    );
    errors.into_result()
}

/// Partial update: absent fields are skipped, present ones follow the create rules.
pub fn validate_product_patch(p: &ProductPatch) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if let Some(v) = &p.name {
        errors.check("name", name(v));
    }
    if let Some(v) = p.quantity {
        errors.check("quantity", quantity(v));
    }
    if let Some(v) = &p.expiry_type {
        errors.check("type", expiry_type(v));
    }
    errors.into_result()
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn email(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some("email is required")
    } else if char_len(value) > MAX_TEXT_LEN {
        Some("limited max 30 char")
    } else if !EMAIL_RE.is_match(value) {
        Some("is not valid email format")
    } else {
        None
    }
}

fn password(value: &str) -> Option<&'static str> {
    let len = char_len(value);
    if len == 0 {
        Some("password is required")
    } else if !(MIN_PASSWORD_LEN..=MAX_TEXT_LEN).contains(&len) {
        Some("limited min 6 max 30 char")
    } else {
        None
    }
}

fn name(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some("name is required")
    } else if char_len(value) > MAX_TEXT_LEN {
        Some("limited max 30 char")
    } else {
        None
    }
}

fn quantity(value: i32) -> Option<&'static str> {
    if value == 0 {
        Some("quantity is required")
    } else if value < 1 {
        Some("quantity must be greater than 0")
    } else {
        None
    }
}

fn expiry_type(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some("type is required")
    } else if ExpiryType::from_str(value).is_err() {
        Some("invalid type")
    } else {
        None
    }
}
