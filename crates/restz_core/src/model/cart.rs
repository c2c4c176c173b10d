//! Shopping cart model.

use serde::{Deserialize, Serialize};

pub type CartId = i64;

/// Cart owned by one customer; audit timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub cno: CartId,
    pub customer: String,
    pub reg_date: i64,
    pub mod_date: i64,
}
