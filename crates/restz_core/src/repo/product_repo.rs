//! Product repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - CRUD over `tbl_product` with its `tbl_product_image` collection.
//! - Paginated product listings: cover-image projection, full detail via
//!   per-product image queries, full detail via one join per page, and the
//!   cover listing with review counts.
//!
//! # Invariants
//! - A product and its image set are written in one transaction.
//! - Images are always returned ordered by `ino` ascending.
//! - Cover listings only include products that own an `ino = 0` image, and
//!   their totals count the same join.

use super::page::{count_to_total, Direction, Page, PageRequest, SortColumns};
use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::dto::product_dto::{ProductDto, ProductListDto};
use crate::model::product::{Product, ProductId, ProductImage, COVER_INO};
use log::debug;
use rusqlite::{params, Connection, Row};

const PRODUCT_SELECT_SQL: &str = "SELECT
    p.pno AS pno,
    p.pname AS pname,
    p.price AS price,
    p.description AS description,
    p.register_id AS register_id
FROM tbl_product p";

const COVER_JOIN_SQL: &str = "FROM tbl_product p
INNER JOIN tbl_product_image i ON i.pno = p.pno AND i.ino = ?1";

const PRODUCT_SORT: SortColumns = SortColumns {
    columns: &[
        ("pno", "p.pno"),
        ("pname", "p.pname"),
        ("price", "p.price"),
        ("registerId", "p.register_id"),
    ],
    default: ("p.pno", Direction::Desc),
    tiebreak: "p.pno",
};

const REVIEW_COUNT_SORT: SortColumns = SortColumns {
    columns: &[
        ("pno", "p.pno"),
        ("pname", "p.pname"),
        ("price", "p.price"),
        ("registerId", "p.register_id"),
        ("reviewCount", "review_count"),
    ],
    default: ("p.pno", Direction::Desc),
    tiebreak: "p.pno",
};

/// Repository interface for products and their images.
pub trait ProductRepository {
    /// Inserts the product and all of its images; returns the new `pno`.
    fn create_product(&self, product: &Product) -> RepoResult<ProductId>;
    /// Loads the product row only; `images` is left empty.
    fn get_product(&self, pno: ProductId) -> RepoResult<Option<Product>>;
    fn get_product_with_images(&self, pno: ProductId) -> RepoResult<Option<Product>>;
    /// Updates product fields and replaces the full image set.
    fn update_product(&self, product: &Product) -> RepoResult<()>;
    fn delete_product(&self, pno: ProductId) -> RepoResult<()>;
    fn product_exists(&self, pno: ProductId) -> RepoResult<bool>;
    /// Products joined to their cover image, projected to list rows.
    fn list(&self, request: &PageRequest) -> RepoResult<Page<ProductListDto>>;
    /// Product page followed by one image query per product.
    fn list_with_all_images(&self, request: &PageRequest) -> RepoResult<Page<ProductDto>>;
    /// Product page joined to all images in a single query.
    fn list_with_all_images_fetch(&self, request: &PageRequest) -> RepoResult<Page<ProductDto>>;
    /// Cover listing plus the number of reviews per product.
    fn list_with_review_count(&self, request: &PageRequest) -> RepoResult<Page<ProductListDto>>;
}

/// SQLite-backed product repository.
pub struct SqliteProductRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProductRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["tbl_product", "tbl_product_image"])?;
        Ok(Self { conn })
    }
}

impl ProductRepository for SqliteProductRepository<'_> {
    fn create_product(&self, product: &Product) -> RepoResult<ProductId> {
        product.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO tbl_product (pname, price, description, register_id)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                product.pname.as_str(),
                product.price,
                product.description.as_deref(),
                product.register_id.as_str(),
            ],
        )?;
        let pno = tx.last_insert_rowid();
        insert_images(&tx, pno, &product.images)?;
        tx.commit()?;

        Ok(pno)
    }

    fn get_product(&self, pno: ProductId) -> RepoResult<Option<Product>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PRODUCT_SELECT_SQL} WHERE p.pno = ?1;"))?;
        let mut rows = stmt.query([pno])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(product_from_row(row)?));
        }
        Ok(None)
    }

    fn get_product_with_images(&self, pno: ProductId) -> RepoResult<Option<Product>> {
        let Some(mut product) = self.get_product(pno)? else {
            return Ok(None);
        };
        product.images = load_images(self.conn, pno)?;
        Ok(Some(product))
    }

    fn update_product(&self, product: &Product) -> RepoResult<()> {
        let pno = product.pno.ok_or(RepoError::NotPersisted("tbl_product"))?;
        product.validate()?;

        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE tbl_product
             SET
                pname = ?1,
                price = ?2,
                description = ?3,
                register_id = ?4
             WHERE pno = ?5;",
            params![
                product.pname.as_str(),
                product.price,
                product.description.as_deref(),
                product.register_id.as_str(),
                pno,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "tbl_product",
                id: pno,
            });
        }

        tx.execute("DELETE FROM tbl_product_image WHERE pno = ?1;", [pno])?;
        insert_images(&tx, pno, &product.images)?;
        tx.commit()?;

        Ok(())
    }

    fn delete_product(&self, pno: ProductId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tbl_product WHERE pno = ?1;", [pno])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "tbl_product",
                id: pno,
            });
        }
        Ok(())
    }

    fn product_exists(&self, pno: ProductId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM tbl_product WHERE pno = ?1);",
            [pno],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn list(&self, request: &PageRequest) -> RepoResult<Page<ProductListDto>> {
        let order_by = PRODUCT_SORT.order_by(request.sort.as_ref())?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT
                p.pno AS pno,
                p.pname AS pname,
                p.price AS price,
                p.register_id AS register_id,
                i.filename AS pimage
             {COVER_JOIN_SQL}
             ORDER BY {order_by}
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let mut rows = stmt.query(params![COVER_INO, request.limit(), request.offset()])?;
        let mut content = Vec::new();
        while let Some(row) = rows.next()? {
            content.push(list_dto_from_row(row, false)?);
        }

        let total = self.count_cover_rows()?;
        Ok(Page::new(content, request, total))
    }

    fn list_with_all_images(&self, request: &PageRequest) -> RepoResult<Page<ProductDto>> {
        let order_by = PRODUCT_SORT.order_by(request.sort.as_ref())?;
        let mut stmt = self.conn.prepare(&format!(
            "{PRODUCT_SELECT_SQL}
             ORDER BY {order_by}
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![request.limit(), request.offset()])?;
        let mut products = Vec::new();
        while let Some(row) = rows.next()? {
            products.push(product_from_row(row)?);
        }

        for product in &mut products {
            if let Some(pno) = product.pno {
                product.images = load_images(self.conn, pno)?;
            }
        }

        let total = self.count_products()?;
        let content = products.iter().map(ProductDto::from).collect();
        Ok(Page::new(content, request, total))
    }

    fn list_with_all_images_fetch(&self, request: &PageRequest) -> RepoResult<Page<ProductDto>> {
        let order_by = PRODUCT_SORT.order_by(request.sort.as_ref())?;
        // The page is cut on products first so image rows cannot shift the
        // LIMIT/OFFSET window.
        let mut stmt = self.conn.prepare(&format!(
            "SELECT
                p.pno AS pno,
                p.pname AS pname,
                p.price AS price,
                p.description AS description,
                p.register_id AS register_id,
                i.ino AS ino,
                i.filename AS filename
             FROM (
                SELECT * FROM tbl_product p
                ORDER BY {order_by}
                LIMIT ?1 OFFSET ?2
             ) p
             LEFT JOIN tbl_product_image i ON i.pno = p.pno
             ORDER BY {order_by}, i.ino ASC;"
        ))?;
        let mut rows = stmt.query(params![request.limit(), request.offset()])?;
        let mut products: Vec<Product> = Vec::new();
        let mut row_count = 0usize;
        while let Some(row) = rows.next()? {
            row_count += 1;
            let pno: ProductId = row.get("pno")?;
            let starts_new = products.last().map_or(true, |last| last.pno != Some(pno));
            if starts_new {
                products.push(product_from_row(row)?);
            }
            if let (Some(image), Some(product)) = (image_from_row(row)?, products.last_mut()) {
                product.images.push(image);
            }
        }
        debug!(
            "event=product_list_fetch module=repo status=ok rows={} products={}",
            row_count,
            products.len()
        );

        let total = self.count_products()?;
        let content = products.iter().map(ProductDto::from).collect();
        Ok(Page::new(content, request, total))
    }

    fn list_with_review_count(&self, request: &PageRequest) -> RepoResult<Page<ProductListDto>> {
        let order_by = REVIEW_COUNT_SORT.order_by(request.sort.as_ref())?;
        let mut stmt = self.conn.prepare(&format!(
            "SELECT
                p.pno AS pno,
                p.pname AS pname,
                p.price AS price,
                p.register_id AS register_id,
                i.filename AS pimage,
                (SELECT COUNT(*) FROM tbl_review r WHERE r.pno = p.pno) AS review_count
             {COVER_JOIN_SQL}
             ORDER BY {order_by}
             LIMIT ?2 OFFSET ?3;"
        ))?;
        let mut rows = stmt.query(params![COVER_INO, request.limit(), request.offset()])?;
        let mut content = Vec::new();
        while let Some(row) = rows.next()? {
            content.push(list_dto_from_row(row, true)?);
        }

        let total = self.count_cover_rows()?;
        Ok(Page::new(content, request, total))
    }
}

impl SqliteProductRepository<'_> {
    fn count_products(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM tbl_product;", [], |row| row.get(0))?;
        count_to_total(count)
    }

    fn count_cover_rows(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) {COVER_JOIN_SQL};"),
            [COVER_INO],
            |row| row.get(0),
        )?;
        count_to_total(count)
    }
}

/// Maps the product columns (`pno`, `pname`, `price`, `description`,
/// `register_id`) of a row; images are left empty.
pub(crate) fn product_from_row(row: &Row<'_>) -> RepoResult<Product> {
    Ok(Product {
        pno: Some(row.get("pno")?),
        pname: row.get("pname")?,
        price: row.get("price")?,
        description: row.get("description")?,
        register_id: row.get("register_id")?,
        images: Vec::new(),
    })
}

/// Maps nullable `ino`/`filename` columns produced by an image left join.
pub(crate) fn image_from_row(row: &Row<'_>) -> RepoResult<Option<ProductImage>> {
    let ino: Option<u32> = row.get("ino")?;
    let filename: Option<String> = row.get("filename")?;
    match (ino, filename) {
        (Some(ino), Some(filename)) => Ok(Some(ProductImage { ino, filename })),
        (None, None) => Ok(None),
        (ino, _) => Err(RepoError::InvalidData(format!(
            "product image row with ino {ino:?} has no filename"
        ))),
    }
}

pub(crate) fn load_images(conn: &Connection, pno: ProductId) -> RepoResult<Vec<ProductImage>> {
    let mut stmt = conn.prepare(
        "SELECT ino, filename
         FROM tbl_product_image
         WHERE pno = ?1
         ORDER BY ino ASC;",
    )?;
    let mut rows = stmt.query([pno])?;
    let mut images = Vec::new();
    while let Some(row) = rows.next()? {
        images.push(ProductImage {
            ino: row.get("ino")?,
            filename: row.get("filename")?,
        });
    }
    Ok(images)
}

fn insert_images(conn: &Connection, pno: ProductId, images: &[ProductImage]) -> RepoResult<()> {
    let mut stmt = conn.prepare(
        "INSERT INTO tbl_product_image (pno, ino, filename)
         VALUES (?1, ?2, ?3);",
    )?;
    for image in images {
        stmt.execute(params![pno, image.ino, image.filename.as_str()])?;
    }
    Ok(())
}

fn list_dto_from_row(row: &Row<'_>, with_review_count: bool) -> RepoResult<ProductListDto> {
    let review_count = if with_review_count {
        Some(row.get("review_count")?)
    } else {
        None
    };
    Ok(ProductListDto {
        pno: row.get("pno")?,
        pname: row.get("pname")?,
        price: row.get("price")?,
        register_id: row.get("register_id")?,
        pimage: row.get("pimage")?,
        review_count,
    })
}
