//! Request validation for product payloads.

use crate::error::{AppError, FieldErrors};
use crate::store::{ProductFields, NAME_MAX_CHARS};
use serde_json::{Map, Value};
use utoipa::ToSchema;

pub const NAME_REQUIRED: &str = "The name field is required.";
pub const NAME_STRING: &str = "The name must be a string.";
pub const NAME_TOO_LONG: &str = "The name may not be greater than 255 characters.";
pub const NAME_TAKEN: &str = "The name has already been taken.";
pub const PRICE_REQUIRED: &str = "The price field is required.";
pub const PRICE_INTEGER: &str = "The price must be an integer.";

/// A validated create/update body.
#[derive(Debug, Clone, PartialEq, Eq, ToSchema)]
pub struct ProductInput {
    /// Unique product name, at most 255 characters.
    pub name: String,
    /// Integer price; strings holding an integer are accepted too.
    pub price: i64,
}

impl From<ProductInput> for ProductFields {
    fn from(input: ProductInput) -> Self {
        ProductFields {
            name: input.name,
            price: input.price,
        }
    }
}

pub struct ProductValidator;

impl ProductValidator {
    /// Check `name` and `price` together and report every failing field at once.
    pub fn validate(body: &Map<String, Value>) -> Result<ProductInput, AppError> {
        let mut errors = FieldErrors::new();
        let name = validate_name(body.get("name"), &mut errors);
        let price = validate_price(body.get("price"), &mut errors);
        match (name, price) {
            (Some(name), Some(price)) if errors.is_empty() => Ok(ProductInput { name, price }),
            _ => Err(AppError::Validation(errors)),
        }
    }
}

fn validate_name(v: Option<&Value>, errors: &mut FieldErrors) -> Option<String> {
    match v {
        None | Some(Value::Null) => {
            errors.add("name", NAME_REQUIRED);
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add("name", NAME_REQUIRED);
            None
        }
        Some(Value::String(s)) if s.chars().count() > NAME_MAX_CHARS => {
            errors.add("name", NAME_TOO_LONG);
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.add("name", NAME_STRING);
            None
        }
    }
}

fn validate_price(v: Option<&Value>, errors: &mut FieldErrors) -> Option<i64> {
    let parsed = match v {
        None | Some(Value::Null) => {
            errors.add("price", PRICE_REQUIRED);
            return None;
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.add("price", PRICE_REQUIRED);
            return None;
        }
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        Some(_) => None,
    };
    if parsed.is_none() {
        errors.add("price", PRICE_INTEGER);
    }
    parsed
}

/// `42.0` counts as an integer; fractions and values outside `i64` do not.
fn integral(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then_some(f as i64)
}
