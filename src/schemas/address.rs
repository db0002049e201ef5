use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::address;

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let len = phone.chars().count();
    let valid = (7..=20).contains(&len)
        && phone
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'));
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("phone")
            .with_message("Phone may only contain digits, spaces and + - ( )".into()))
    }
}

pub fn validate_zip_code(zip: &str) -> Result<(), ValidationError> {
    if zip.len() == 5 && zip.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("zip_code")
            .with_message("Zip code must be exactly 5 digits".into()))
    }
}

#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAddress {
    #[validate(length(min = 1, max = 100, message = "Label must be 1 to 100 characters"))]
    pub label: String,
    #[validate(length(min = 2, max = 200, message = "Full name must be 2 to 200 characters"))]
    pub full_name: String,
    #[validate(custom(function = validate_phone))]
    pub phone: String,
    #[validate(length(min = 1, max = 200, message = "Street must be 1 to 200 characters"))]
    pub street: String,
    #[validate(length(min = 1, max = 100, message = "City must be 1 to 100 characters"))]
    pub city: String,
    #[validate(length(min = 1, max = 100, message = "State must be 1 to 100 characters"))]
    pub state: String,
    #[validate(custom(function = validate_zip_code))]
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

fn default_country() -> String {
    "México".to_string()
}

/// Updates replace the whole address, so the same fields are required again
#[derive(Debug, Clone, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAddress {
    #[validate(length(min = 1, max = 100, message = "Label must be 1 to 100 characters"))]
    pub label: String,
    #[validate(length(min = 2, max = 200, message = "Full name must be 2 to 200 characters"))]
    pub full_name: String,
    #[validate(custom(function = validate_phone))]
    pub phone: String,
    #[validate(length(min = 1, max = 200, message = "Street must be 1 to 200 characters"))]
    pub street: String,
    #[validate(length(min = 1, max = 100, message = "City must be 1 to 100 characters"))]
    pub city: String,
    #[validate(length(min = 1, max = 100, message = "State must be 1 to 100 characters"))]
    pub state: String,
    #[validate(custom(function = validate_zip_code))]
    pub zip_code: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub is_default: bool,
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressResponse {
    pub id: i64,
    pub user_id: i64,
    pub label: String,
    pub full_name: String,
    pub phone: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<address::Model> for AddressResponse {
    fn from(address: address::Model) -> Self {
        Self {
            id: address.id,
            user_id: address.user_id,
            label: address.label,
            full_name: address.full_name,
            phone: address.phone,
            street: address.street,
            city: address.city,
            state: address.state,
            zip_code: address.zip_code,
            country: address.country,
            is_default: address.is_default,
            created_at: address.created_at,
            updated_at: address.updated_at,
        }
    }
}
