//! Review repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `tbl_review`.
//! - Eager variants that join the owning product (and its images) in the
//!   same query instead of a second lookup.
//! - Per-product review pages projected to `ReviewDto`.
//!
//! # Invariants
//! - `reg_date` is stamped on insert and `mod_date` on every update by SQL,
//!   never taken from the caller.
//! - A review for a missing product is rejected by the foreign key.

use super::page::{count_to_total, Direction, Page, PageRequest, SortColumns};
use super::product_repo::{image_from_row, product_from_row};
use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::dto::review_dto::ReviewDto;
use crate::model::product::{Product, ProductId};
use crate::model::review::{Review, ReviewId};
use rusqlite::{params, Connection, Row};

const REVIEW_SELECT_SQL: &str = "SELECT
    r.rno AS rno,
    r.content AS content,
    r.reviewer AS reviewer,
    r.star AS star,
    r.pno AS pno,
    r.reg_date AS reg_date,
    r.mod_date AS mod_date
FROM tbl_review r";

const REVIEW_PRODUCT_SELECT_SQL: &str = "SELECT
    r.rno AS rno,
    r.content AS content,
    r.reviewer AS reviewer,
    r.star AS star,
    r.reg_date AS reg_date,
    r.mod_date AS mod_date,
    p.pno AS pno,
    p.pname AS pname,
    p.price AS price,
    p.description AS description,
    p.register_id AS register_id";

const REVIEW_SORT: SortColumns = SortColumns {
    columns: &[
        ("rno", "r.rno"),
        ("star", "r.star"),
        ("reviewer", "r.reviewer"),
        ("regDate", "r.reg_date"),
        ("modDate", "r.mod_date"),
    ],
    default: ("r.rno", Direction::Desc),
    tiebreak: "r.rno",
};

/// Review loaded together with its owning product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewWithProduct {
    pub review: Review,
    pub product: Product,
}

/// Repository interface for review operations.
pub trait ReviewRepository {
    /// Inserts a review and returns its generated `rno`.
    fn create_review(&self, review: &Review) -> RepoResult<ReviewId>;
    /// Loads the review alone; the product is fetched separately on demand.
    fn get_review(&self, rno: ReviewId) -> RepoResult<Option<Review>>;
    /// Loads the review and its product (without images) in one query.
    fn get_review_with_product(&self, rno: ReviewId) -> RepoResult<Option<ReviewWithProduct>>;
    /// Loads the review, its product and every product image in one query.
    fn get_review_with_product_images(
        &self,
        rno: ReviewId,
    ) -> RepoResult<Option<ReviewWithProduct>>;
    /// Persists content and star of an existing review.
    fn update_review(&self, review: &Review) -> RepoResult<()>;
    fn delete_review(&self, rno: ReviewId) -> RepoResult<()>;
    fn review_exists(&self, rno: ReviewId) -> RepoResult<bool>;
    /// Pages the reviews of one product, newest `rno` first unless sorted.
    fn list_reviews_by_product(
        &self,
        pno: ProductId,
        request: &PageRequest,
    ) -> RepoResult<Page<ReviewDto>>;
}

/// SQLite-backed review repository.
pub struct SqliteReviewRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReviewRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["tbl_review", "tbl_product", "tbl_product_image"])?;
        Ok(Self { conn })
    }
}

impl ReviewRepository for SqliteReviewRepository<'_> {
    fn create_review(&self, review: &Review) -> RepoResult<ReviewId> {
        review.validate()?;

        self.conn.execute(
            "INSERT INTO tbl_review (content, reviewer, star, pno)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                review.content.as_str(),
                review.reviewer.as_str(),
                review.star,
                review.pno,
            ],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn get_review(&self, rno: ReviewId) -> RepoResult<Option<Review>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REVIEW_SELECT_SQL} WHERE r.rno = ?1;"))?;
        let mut rows = stmt.query([rno])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(review_from_row(row)?));
        }
        Ok(None)
    }

    fn get_review_with_product(&self, rno: ReviewId) -> RepoResult<Option<ReviewWithProduct>> {
        let mut stmt = self.conn.prepare(&format!(
            "{REVIEW_PRODUCT_SELECT_SQL}
             FROM tbl_review r
             INNER JOIN tbl_product p ON p.pno = r.pno
             WHERE r.rno = ?1;"
        ))?;
        let mut rows = stmt.query([rno])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(ReviewWithProduct {
                review: review_from_row(row)?,
                product: product_from_row(row)?,
            }));
        }
        Ok(None)
    }

    fn get_review_with_product_images(
        &self,
        rno: ReviewId,
    ) -> RepoResult<Option<ReviewWithProduct>> {
        let mut stmt = self.conn.prepare(&format!(
            "{REVIEW_PRODUCT_SELECT_SQL},
                i.ino AS ino,
                i.filename AS filename
             FROM tbl_review r
             INNER JOIN tbl_product p ON p.pno = r.pno
             LEFT JOIN tbl_product_image i ON i.pno = p.pno
             WHERE r.rno = ?1
             ORDER BY i.ino ASC;"
        ))?;
        let mut rows = stmt.query([rno])?;
        let mut loaded: Option<ReviewWithProduct> = None;
        while let Some(row) = rows.next()? {
            if loaded.is_none() {
                loaded = Some(ReviewWithProduct {
                    review: review_from_row(row)?,
                    product: product_from_row(row)?,
                });
            }
            if let (Some(image), Some(entry)) = (image_from_row(row)?, loaded.as_mut()) {
                entry.product.images.push(image);
            }
        }
        Ok(loaded)
    }

    fn update_review(&self, review: &Review) -> RepoResult<()> {
        let rno = review.rno.ok_or(RepoError::NotPersisted("tbl_review"))?;
        review.validate()?;

        let changed = self.conn.execute(
            "UPDATE tbl_review
             SET
                content = ?1,
                star = ?2,
                mod_date = (strftime('%s', 'now') * 1000)
             WHERE rno = ?3;",
            params![review.content.as_str(), review.star, rno],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "tbl_review",
                id: rno,
            });
        }

        Ok(())
    }

    fn delete_review(&self, rno: ReviewId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tbl_review WHERE rno = ?1;", [rno])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "tbl_review",
                id: rno,
            });
        }
        Ok(())
    }

    fn review_exists(&self, rno: ReviewId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tbl_review WHERE rno = ?1);",
            [rno],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list_reviews_by_product(
        &self,
        pno: ProductId,
        request: &PageRequest,
    ) -> RepoResult<Page<ReviewDto>> {
        let order_by = REVIEW_SORT.order_by(request.sort.as_ref())?;
        let mut stmt = self.conn.prepare(&format!(
            "{REVIEW_SELECT_SQL}
             WHERE r.pno = ?1
             ORDER BY {order_by}
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let mut rows = stmt.query(params![pno, request.limit(), request.offset()])?;
        let mut content = Vec::new();
        while let Some(row) = rows.next()? {
            content.push(ReviewDto::from(review_from_row(row)?));
        }

        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM tbl_review WHERE pno = ?1;",
            [pno],
            |row| row.get(0),
        )?;
        Ok(Page::new(content, request, count_to_total(count)?))
    }
}

fn review_from_row(row: &Row<'_>) -> RepoResult<Review> {
    let star: i64 = row.get("star")?;
    let star = u8::try_from(star).map_err(|_| {
        RepoError::InvalidData(format!("invalid star value `{star}` in tbl_review.star"))
    })?;

    Ok(Review {
        rno: Some(row.get("rno")?),
        content: row.get("content")?,
        reviewer: row.get("reviewer")?,
        star,
        pno: row.get("pno")?,
        reg_date: Some(row.get("reg_date")?),
        mod_date: Some(row.get("mod_date")?),
    })
}
