//! Review use-case service.
//!
//! # Invariants
//! - `modify` only changes content and star; reviewer and product are fixed
//!   once a review exists.

use super::{read_back, ServiceError, ServiceResult};
use crate::dto::review_dto::ReviewDto;
use crate::model::product::ProductId;
use crate::model::review::ReviewId;
use crate::repo::page::{Page, PageRequest};
use crate::repo::review_repo::ReviewRepository;
use crate::repo::RepoResult;
use log::info;

/// Review service facade over repository implementations.
pub struct ReviewService<R: ReviewRepository> {
    repo: R,
}

impl<R: ReviewRepository> ReviewService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a new review and returns it as persisted.
    pub fn register(&self, dto: &ReviewDto) -> ServiceResult<ReviewDto> {
        let mut review = dto.to_entity();
        review.rno = None;
        let rno = self.repo.create_review(&review)?;
        info!("event=review_register module=service status=ok rno={rno} pno={}", review.pno);

        let stored = read_back(self.repo.get_review(rno), "registered review not found")?;
        Ok(ReviewDto::from(stored))
    }

    pub fn read(&self, rno: ReviewId) -> ServiceResult<ReviewDto> {
        self.repo
            .get_review(rno)?
            .map(ReviewDto::from)
            .ok_or(ServiceError::NotFound {
                table: "tbl_review",
                id: rno,
            })
    }

    /// Applies content and star from `dto` to the stored review.
    pub fn modify(&self, dto: &ReviewDto) -> ServiceResult<ReviewDto> {
        let rno = dto.rno.ok_or(ServiceError::InconsistentState(
            "review modification without rno",
        ))?;
        let mut review = self.repo.get_review(rno)?.ok_or(ServiceError::NotFound {
            table: "tbl_review",
            id: rno,
        })?;

        review.change_content(dto.content.clone());
        review.change_star(dto.star);
        self.repo.update_review(&review)?;

        let stored = read_back(self.repo.get_review(rno), "modified review not found")?;
        Ok(ReviewDto::from(stored))
    }

    pub fn remove(&self, rno: ReviewId) -> ServiceResult<()> {
        self.repo.delete_review(rno)?;
        info!("event=review_remove module=service status=ok rno={rno}");
        Ok(())
    }

    pub fn list(&self, pno: ProductId, request: &PageRequest) -> RepoResult<Page<ReviewDto>> {
        self.repo.list_reviews_by_product(pno, request)
    }
}
