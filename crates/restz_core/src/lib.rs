//! Persistence core for the restz shop backend.
//! Products, product images, reviews, carts and to-dos on SQLite, with
//! paginated listings and DTO projections.

pub mod db;
pub mod dto;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use dto::product_dto::{ProductDto, ProductListDto};
pub use dto::review_dto::ReviewDto;
pub use dto::todo_dto::TodoDto;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::cart::{Cart, CartId};
pub use model::product::{Product, ProductId, ProductImage, COVER_INO};
pub use model::review::{Review, ReviewId};
pub use model::todo::{MemberId, Todo, TodoId};
pub use model::ValidationError;
pub use repo::cart_repo::{CartRepository, SqliteCartRepository};
pub use repo::page::{Direction, Page, PageRequest, Sort};
pub use repo::product_repo::{ProductRepository, SqliteProductRepository};
pub use repo::review_repo::{ReviewRepository, ReviewWithProduct, SqliteReviewRepository};
pub use repo::todo_repo::{SqliteTodoRepository, TodoRepository};
pub use repo::{RepoError, RepoResult};
pub use service::product_service::ProductService;
pub use service::review_service::ReviewService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
