//! Review model.
//!
//! # Invariants
//! - Every review points at exactly one product through `pno`.
//! - `star` stays within `MIN_STAR..=MAX_STAR`.

use super::product::ProductId;
use super::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

pub type ReviewId = i64;

pub const MIN_STAR: u8 = 1;
pub const MAX_STAR: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub rno: Option<ReviewId>,
    pub content: String,
    pub reviewer: String,
    pub star: u8,
    pub pno: ProductId,
    /// Epoch milliseconds, stamped on insert.
    pub reg_date: Option<i64>,
    /// Epoch milliseconds, refreshed on every update.
    pub mod_date: Option<i64>,
}

impl Review {
    pub fn new(
        pno: ProductId,
        reviewer: impl Into<String>,
        content: impl Into<String>,
        star: u8,
    ) -> Self {
        Self {
            rno: None,
            content: content.into(),
            reviewer: reviewer.into(),
            star,
            pno,
            reg_date: None,
            mod_date: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("reviewer", &self.reviewer)?;
        if !(MIN_STAR..=MAX_STAR).contains(&self.star) {
            return Err(ValidationError::StarOutOfRange(self.star));
        }
        Ok(())
    }

    pub fn change_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn change_star(&mut self, star: u8) {
        self.star = star;
    }
}
