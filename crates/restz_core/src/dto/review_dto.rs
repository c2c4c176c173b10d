use crate::model::product::ProductId;
use crate::model::review::{Review, ReviewId};
use serde::{Deserialize, Serialize};

/// Review projection that carries the product id but not the product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDto {
    pub rno: Option<ReviewId>,
    pub content: String,
    pub reviewer: String,
    pub star: u8,
    pub reg_date: Option<i64>,
    pub mod_date: Option<i64>,
    pub pno: ProductId,
}

impl ReviewDto {
    /// Converts back into an entity for persistence.
    ///
    /// Audit timestamps are dropped; storage stamps them.
    pub fn to_entity(&self) -> Review {
        Review {
            rno: self.rno,
            content: self.content.clone(),
            reviewer: self.reviewer.clone(),
            star: self.star,
            pno: self.pno,
            reg_date: None,
            mod_date: None,
        }
    }
}

impl From<&Review> for ReviewDto {
    fn from(review: &Review) -> Self {
        Self {
            rno: review.rno,
            content: review.content.clone(),
            reviewer: review.reviewer.clone(),
            star: review.star,
            reg_date: review.reg_date,
            mod_date: review.mod_date,
            pno: review.pno,
        }
    }
}

impl From<Review> for ReviewDto {
    fn from(review: Review) -> Self {
        Self {
            rno: review.rno,
            content: review.content,
            reviewer: review.reviewer,
            star: review.star,
            reg_date: review.reg_date,
            mod_date: review.mod_date,
            pno: review.pno,
        }
    }
}
