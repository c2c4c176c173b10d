use restz_core::db::open_db_in_memory;
use restz_core::{
    PageRequest, Product, ProductId, ProductRepository, RepoError, Review, ReviewDto, ReviewId,
    ReviewRepository, Sort, SqliteProductRepository, SqliteReviewRepository,
};
use rusqlite::Connection;

#[test]
fn insert_assigns_strictly_increasing_ids() {
    let conn = open_db_in_memory().unwrap();
    let pno = seed_product(&conn);
    let repo = SqliteReviewRepository::try_new(&conn).unwrap();

    let mut previous: ReviewId = 0;
    for i in 1..=10 {
        let review = Review::new(pno, format!("user{i}"), format!("review test {i}"), 5);
        let rno = repo.create_review(&review).unwrap();
        assert!(rno > previous);
        assert_eq!(rno, i);
        previous = rno;
    }

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM tbl_review;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 10);
}

#[test]
fn get_returns_stored_fields_and_timestamps() {
    let conn = open_db_in_memory().unwrap();
    let pno = seed_product(&conn);
    seed_reviews(&conn, pno, 10);
    let repo = SqliteReviewRepository::try_new(&conn).unwrap();

    let review = repo.get_review(5).unwrap().unwrap();
    assert_eq!(review.rno, Some(5));
    assert_eq!(review.content, "review test 5");
    assert_eq!(review.reviewer, "user5");
    assert_eq!(review.star, 5);
    assert_eq!(review.pno, pno);
    assert!(review.reg_date.unwrap() > 0);
    assert_eq!(review.reg_date, review.mod_date);

    assert!(repo.get_review(99).unwrap().is_none());
}

#[test]
fn eager_product_join_matches_separate_product_fetch() {
    let conn = open_db_in_memory().unwrap();
    let pno = seed_product(&conn);
    seed_reviews(&conn, pno, 10);
    let reviews = SqliteReviewRepository::try_new(&conn).unwrap();
    let products = SqliteProductRepository::try_new(&conn).unwrap();

    let lazy_review = reviews.get_review(5).unwrap().unwrap();
    let lazy_product = products.get_product(lazy_review.pno).unwrap().unwrap();

    let joined = reviews.get_review_with_product(5).unwrap().unwrap();
    assert_eq!(joined.review, lazy_review);
    assert_eq!(joined.product.pno, Some(1));
    assert_eq!(joined.product.price, 1000);
    assert_eq!(joined.product.pno, lazy_product.pno);
    assert_eq!(joined.product.price, lazy_product.price);
    assert!(joined.product.images.is_empty());

    assert!(reviews.get_review_with_product(99).unwrap().is_none());
}

#[test]
fn eager_product_images_join_returns_cover_first() {
    let conn = open_db_in_memory().unwrap();
    let pno = seed_product(&conn);
    seed_reviews(&conn, pno, 10);
    let repo = SqliteReviewRepository::try_new(&conn).unwrap();

    let loaded = repo.get_review_with_product_images(5).unwrap().unwrap();
    assert_eq!(loaded.review.rno, Some(5));
    assert_eq!(loaded.product.pno, Some(1));
    assert_eq!(loaded.product.price, 1000);
    assert_eq!(loaded.product.images.len(), 2);
    assert_eq!(loaded.product.images[0].ino, 0);
    assert_eq!(loaded.product.images[0].filename, "product1_cover.png");
    assert_eq!(loaded.product.images[1].ino, 1);

    assert!(repo.get_review_with_product_images(99).unwrap().is_none());
}

#[test]
fn eager_product_images_join_handles_product_without_images() {
    let conn = open_db_in_memory().unwrap();
    let products = SqliteProductRepository::try_new(&conn).unwrap();
    let pno = products
        .create_product(&Product::new("bare", 500, "user00"))
        .unwrap();
    let repo = SqliteReviewRepository::try_new(&conn).unwrap();
    let rno = repo
        .create_review(&Review::new(pno, "user1", "no pictures", 3))
        .unwrap();

    let loaded = repo.get_review_with_product_images(rno).unwrap().unwrap();
    assert_eq!(loaded.product.pname, "bare");
    assert!(loaded.product.images.is_empty());
}

#[test]
fn update_changes_content_and_star() {
    let conn = open_db_in_memory().unwrap();
    let pno = seed_product(&conn);
    seed_reviews(&conn, pno, 10);
    let repo = SqliteReviewRepository::try_new(&conn).unwrap();

    let mut review = repo.get_review(5).unwrap().unwrap();
    review.change_content("review update test");
    review.change_star(1);
    repo.update_review(&review).unwrap();

    let reloaded = repo.get_review(5).unwrap().unwrap();
    assert_eq!(reloaded.content, "review update test");
    assert_eq!(reloaded.star, 1);
    assert_eq!(reloaded.reviewer, "user5");
    assert!(reloaded.mod_date >= reloaded.reg_date);
}

#[test]
fn update_rejects_missing_and_unsaved_reviews() {
    let conn = open_db_in_memory().unwrap();
    let pno = seed_product(&conn);
    let repo = SqliteReviewRepository::try_new(&conn).unwrap();

    let unsaved = Review::new(pno, "user1", "draft", 4);
    let err = repo.update_review(&unsaved).unwrap_err();
    assert!(matches!(err, RepoError::NotPersisted("tbl_review")));

    let mut missing = unsaved.clone();
    missing.rno = Some(42);
    let err = repo.update_review(&missing).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            table: "tbl_review",
            id: 42
        }
    ));
}

#[test]
fn validation_blocks_out_of_range_star() {
    let conn = open_db_in_memory().unwrap();
    let pno = seed_product(&conn);
    let repo = SqliteReviewRepository::try_new(&conn).unwrap();

    let err = repo
        .create_review(&Review::new(pno, "user1", "too good", 6))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn delete_makes_exists_false() {
    let conn = open_db_in_memory().unwrap();
    let pno = seed_product(&conn);
    seed_reviews(&conn, pno, 10);
    let repo = SqliteReviewRepository::try_new(&conn).unwrap();

    assert!(repo.review_exists(4).unwrap());
    repo.delete_review(4).unwrap();
    assert!(!repo.review_exists(4).unwrap());

    let err = repo.delete_review(4).unwrap_err();
    assert!(matches!(err, RepoError::NotFound { id: 4, .. }));
}

#[test]
fn review_for_missing_product_is_rejected_by_foreign_key() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteReviewRepository::try_new(&conn).unwrap();

    let err = repo
        .create_review(&Review::new(777, "user1", "orphan", 3))
        .unwrap_err();
    assert!(matches!(err, RepoError::Db(_)));
}

#[test]
fn list_pages_reviews_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let pno = seed_product(&conn);
    seed_reviews(&conn, pno, 10);
    let repo = SqliteReviewRepository::try_new(&conn).unwrap();
    repo.delete_review(4).unwrap();

    let request = PageRequest::of(0, 5).with_sort(Sort::desc("rno"));
    let page = repo.list_reviews_by_product(pno, &request).unwrap();
    assert_eq!(page.total_elements, 9);
    assert_eq!(page.total_pages(), 2);
    assert_eq!(page.number, 0);
    assert_eq!(page.size, 5);
    assert_eq!(page.content.len(), 5);
    let rnos: Vec<_> = page.content.iter().map(|dto| dto.rno.unwrap()).collect();
    assert_eq!(rnos, vec![10, 9, 8, 7, 6]);

    let second = repo
        .list_reviews_by_product(pno, &PageRequest::of(1, 5))
        .unwrap();
    let rnos: Vec<_> = second.content.iter().map(|dto| dto.rno.unwrap()).collect();
    assert_eq!(rnos, vec![5, 3, 2, 1]);
    assert!(second.is_last());
}

#[test]
fn list_only_includes_requested_product() {
    let conn = open_db_in_memory().unwrap();
    let first = seed_product(&conn);
    let second = seed_product(&conn);
    seed_reviews(&conn, first, 3);
    seed_reviews(&conn, second, 2);
    let repo = SqliteReviewRepository::try_new(&conn).unwrap();

    let page = repo
        .list_reviews_by_product(second, &PageRequest::default())
        .unwrap();
    assert_eq!(page.total_elements, 2);
    assert!(page.content.iter().all(|dto| dto.pno == second));

    let empty = repo
        .list_reviews_by_product(999, &PageRequest::default())
        .unwrap();
    assert_eq!(empty.total_elements, 0);
    assert!(empty.content.is_empty());
}

#[test]
fn list_rejects_unknown_sort_property() {
    let conn = open_db_in_memory().unwrap();
    let pno = seed_product(&conn);
    let repo = SqliteReviewRepository::try_new(&conn).unwrap();

    let request = PageRequest::of(0, 5).with_sort(Sort::asc("rno; DELETE FROM tbl_review"));
    let err = repo.list_reviews_by_product(pno, &request).unwrap_err();
    assert!(matches!(err, RepoError::InvalidSort(_)));
}

#[test]
fn review_dto_serializes_with_camel_case_fields() {
    let conn = open_db_in_memory().unwrap();
    let pno = seed_product(&conn);
    seed_reviews(&conn, pno, 1);
    let repo = SqliteReviewRepository::try_new(&conn).unwrap();

    let dto = ReviewDto::from(repo.get_review(1).unwrap().unwrap());
    let json = serde_json::to_value(&dto).unwrap();
    assert_eq!(json["rno"], 1);
    assert_eq!(json["pno"], pno);
    assert!(json.get("regDate").is_some());
    assert!(json.get("modDate").is_some());

    let entity = dto.to_entity();
    assert_eq!(entity.rno, Some(1));
    assert!(entity.reg_date.is_none());
}

#[test]
fn repository_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    let result = SqliteReviewRepository::try_new(&conn);
    assert!(matches!(
        result,
        Err(RepoError::UninitializedConnection {
            actual_version: 0,
            ..
        })
    ));
}

fn seed_product(conn: &Connection) -> ProductId {
    let repo = SqliteProductRepository::try_new(conn).unwrap();
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM tbl_product;", [], |row| row.get(0))
        .unwrap();
    let name = format!("product{}", count + 1);
    let mut product = Product::new(name.clone(), 1000, "user00");
    product.add_image(format!("{name}_cover.png"));
    product.add_image(format!("{name}_side.png"));
    repo.create_product(&product).unwrap()
}

fn seed_reviews(conn: &Connection, pno: ProductId, count: i64) {
    let repo = SqliteReviewRepository::try_new(conn).unwrap();
    for i in 1..=count {
        let review = Review::new(pno, format!("user{i}"), format!("review test {i}"), 5);
        repo.create_review(&review).unwrap();
    }
}
