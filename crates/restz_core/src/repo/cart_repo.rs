//! Cart repository contracts and SQLite implementation.

use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::cart::{Cart, CartId};
use crate::model::require_text;
use rusqlite::{Connection, Row};

const CART_SELECT_SQL: &str = "SELECT
    cno,
    customer,
    reg_date,
    mod_date
FROM tbl_cart";

/// Repository interface for customer carts.
pub trait CartRepository {
    fn create_cart(&self, customer: &str) -> RepoResult<CartId>;
    fn get_cart(&self, cno: CartId) -> RepoResult<Option<Cart>>;
    /// Returns the customer's newest cart.
    fn find_by_customer(&self, customer: &str) -> RepoResult<Option<Cart>>;
    /// Refreshes `mod_date` after the cart contents changed.
    fn touch_cart(&self, cno: CartId) -> RepoResult<()>;
    fn delete_cart(&self, cno: CartId) -> RepoResult<()>;
}

/// SQLite-backed cart repository.
pub struct SqliteCartRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCartRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["tbl_cart"])?;
        Ok(Self { conn })
    }
}

impl CartRepository for SqliteCartRepository<'_> {
    fn create_cart(&self, customer: &str) -> RepoResult<CartId> {
        require_text("customer", customer)?;

        self.conn
            .execute("INSERT INTO tbl_cart (customer) VALUES (?1);", [customer])?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_cart(&self, cno: CartId) -> RepoResult<Option<Cart>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{CART_SELECT_SQL} WHERE cno = ?1;"))?;
        let mut rows = stmt.query([cno])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(cart_from_row(row)?));
        }
        Ok(None)
    }

    fn find_by_customer(&self, customer: &str) -> RepoResult<Option<Cart>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CART_SELECT_SQL}
             WHERE customer = ?1
             ORDER BY cno DESC
             LIMIT 1;"
        ))?;
        let mut rows = stmt.query([customer])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(cart_from_row(row)?));
        }
        Ok(None)
    }

    fn touch_cart(&self, cno: CartId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tbl_cart
             SET mod_date = (strftime('%s', 'now') * 1000)
             WHERE cno = ?1;",
            [cno],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "tbl_cart",
                id: cno,
            });
        }
        Ok(())
    }

    fn delete_cart(&self, cno: CartId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM tbl_cart WHERE cno = ?1;", [cno])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "tbl_cart",
                id: cno,
            });
        }
        Ok(())
    }
}

fn cart_from_row(row: &Row<'_>) -> RepoResult<Cart> {
    Ok(Cart {
        cno: row.get("cno")?,
        customer: row.get("customer")?,
        reg_date: row.get("reg_date")?,
        mod_date: row.get("mod_date")?,
    })
}
