//! Domain model for the shop backend.
//!
//! # Responsibility
//! - Define the persisted record shapes (products, reviews, carts, to-dos).
//! - Keep field-level validation next to the data it guards.
//!
//! # Invariants
//! - Identifiers are assigned by storage; `None` means "not persisted yet".
//! - Audit timestamps (`reg_date`, `mod_date`) are stamped by storage only.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod cart;
pub mod product;
pub mod review;
pub mod todo;

/// Field-level validation failure raised before any SQL mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty or whitespace only.
    BlankField(&'static str),
    /// Product price below zero.
    NegativePrice(i64),
    /// Review rating outside `MIN_STAR..=MAX_STAR`.
    StarOutOfRange(u8),
    /// Product image ordinals must run `0..n` in list order.
    ImageOrdinal { expected: u32, found: u32 },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "field `{field}` must not be blank"),
            Self::NegativePrice(price) => write!(f, "price must not be negative, got {price}"),
            Self::StarOutOfRange(star) => write!(
                f,
                "star must be within {}..={}, got {star}",
                review::MIN_STAR,
                review::MAX_STAR
            ),
            Self::ImageOrdinal { expected, found } => {
                write!(f, "image ordinal {found} found where {expected} was expected")
            }
        }
    }
}

impl Error for ValidationError {}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}
