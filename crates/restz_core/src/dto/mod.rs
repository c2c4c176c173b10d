//! Transfer objects exposed to callers outside the persistence boundary.
//!
//! # Responsibility
//! - Translate between persisted entities and API-facing shapes.
//! - Fix the serialized field names (camelCase) used by outer layers.

pub mod product_dto;
pub mod review_dto;
pub mod todo_dto;
