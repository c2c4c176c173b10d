//! Product and product image model.
//!
//! # Invariants
//! - `images` is ordered by `ino` ascending and `ino` values are `0..n`.
//! - The image with `ino == 0` is the cover image.

use super::{require_text, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ProductId = i64;

/// Ordinal of the cover image.
pub const COVER_INO: u32 = 0;

static UNSAFE_FILENAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("valid filename regex"));

/// Image attached to a product, keyed by its ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub ino: u32,
    pub filename: String,
}

impl ProductImage {
    pub fn new(ino: u32, filename: impl Into<String>) -> Self {
        Self {
            ino,
            filename: filename.into(),
        }
    }

    /// Builds the collision-free name an uploaded file is stored under.
    ///
    /// Path separators and other unsafe characters in `original` are
    /// collapsed to `_`.
    pub fn stored_filename(original: &str) -> String {
        let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
        let sanitized = UNSAFE_FILENAME_RE.replace_all(base.trim(), "_");
        format!("{}_{}", Uuid::new_v4(), sanitized)
    }

    pub fn is_cover(&self) -> bool {
        self.ino == COVER_INO
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub pno: Option<ProductId>,
    pub pname: String,
    /// Price in minor currency units.
    pub price: i64,
    pub description: Option<String>,
    pub register_id: String,
    pub images: Vec<ProductImage>,
}

impl Product {
    pub fn new(pname: impl Into<String>, price: i64, register_id: impl Into<String>) -> Self {
        Self {
            pno: None,
            pname: pname.into(),
            price,
            description: None,
            register_id: register_id.into(),
            images: Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("pname", &self.pname)?;
        require_text("register_id", &self.register_id)?;
        if self.price < 0 {
            return Err(ValidationError::NegativePrice(self.price));
        }
        for (expected, image) in (0u32..).zip(&self.images) {
            if image.ino != expected {
                return Err(ValidationError::ImageOrdinal {
                    expected,
                    found: image.ino,
                });
            }
        }
        Ok(())
    }

    pub fn change_name(&mut self, pname: impl Into<String>) {
        self.pname = pname.into();
    }

    pub fn change_price(&mut self, price: i64) {
        self.price = price;
    }

    pub fn change_description(&mut self, description: Option<String>) {
        self.description = description;
    }

    /// Appends an image; the first image added becomes the cover.
    pub fn add_image(&mut self, filename: impl Into<String>) {
        let ino = u32::try_from(self.images.len()).unwrap_or(u32::MAX);
        self.images.push(ProductImage::new(ino, filename));
    }

    pub fn clear_images(&mut self) {
        self.images.clear();
    }

    pub fn cover_image(&self) -> Option<&ProductImage> {
        self.images.iter().find(|image| image.is_cover())
    }
}

#[cfg(test)]
mod tests {
    use super::{Product, ProductImage};
    use crate::model::ValidationError;

    #[test]
    fn add_image_assigns_sequential_ordinals_and_first_is_cover() {
        let mut product = Product::new("desk", 12_000, "user1");
        product.add_image("a.png");
        product.add_image("b.png");

        let inos: Vec<u32> = product.images.iter().map(|image| image.ino).collect();
        assert_eq!(inos, vec![0, 1]);
        assert_eq!(product.cover_image().map(|image| image.filename.as_str()), Some("a.png"));

        product.clear_images();
        product.add_image("c.png");
        assert_eq!(product.images[0].ino, 0);
    }

    #[test]
    fn validate_rejects_blank_name_and_negative_price() {
        let blank = Product::new("  ", 10, "user1");
        assert_eq!(blank.validate(), Err(ValidationError::BlankField("pname")));

        let negative = Product::new("chair", -1, "user1");
        assert_eq!(negative.validate(), Err(ValidationError::NegativePrice(-1)));

        let mut gap = Product::new("lamp", 5_000, "user1");
        gap.images.push(ProductImage::new(1, "side.png"));
        assert_eq!(
            gap.validate(),
            Err(ValidationError::ImageOrdinal {
                expected: 0,
                found: 1
            })
        );
    }

    #[test]
    fn stored_filename_is_prefixed_and_sanitized() {
        let first = ProductImage::stored_filename("../photos/my cover.png");
        let second = ProductImage::stored_filename("../photos/my cover.png");

        assert!(first.ends_with("_my_cover.png"));
        assert!(!first.contains('/'));
        assert_ne!(first, second);
    }
}
