use restz_core::db::open_db_in_memory;
use restz_core::{
    CartRepository, PageRequest, RepoError, SqliteCartRepository, SqliteTodoRepository, Todo,
    TodoRepository, ValidationError,
};

#[test]
fn todo_create_get_and_update_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let mut todo = Todo::new(1, "write report", "user1");
    todo.change_due_date(Some(1_700_000_000_000));
    let tno = repo.create_todo(&todo).unwrap();

    let mut loaded = repo.get_todo(tno).unwrap().unwrap();
    assert_eq!(loaded.tno, Some(tno));
    assert_eq!(loaded.title, "write report");
    assert_eq!(loaded.due_date, Some(1_700_000_000_000));
    assert!(!loaded.complete);

    loaded.change_title("write final report");
    loaded.change_complete(true);
    repo.update_todo(&loaded).unwrap();

    let reloaded = repo.get_todo(tno).unwrap().unwrap();
    assert_eq!(reloaded.title, "write final report");
    assert!(reloaded.complete);
}

#[test]
fn get_todo_dto_returns_members_newest_todo() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    repo.create_todo(&Todo::new(1, "first", "user1")).unwrap();
    repo.create_todo(&Todo::new(2, "other member", "user2"))
        .unwrap();
    let newest = repo.create_todo(&Todo::new(1, "second", "user1")).unwrap();

    let dto = repo.get_todo_dto(1).unwrap().unwrap();
    assert_eq!(dto.tno, Some(newest));
    assert_eq!(dto.title, "second");
    assert_eq!(dto.mno, 1);

    assert!(repo.get_todo_dto(99).unwrap().is_none());
}

#[test]
fn list_all_is_newest_id_first_and_paginated() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    for i in 1..=5 {
        repo.create_todo(&Todo::new(i % 2, format!("todo {i}"), "user1"))
            .unwrap();
    }

    let first = repo.list_all(&PageRequest::of(0, 2)).unwrap();
    let tnos: Vec<_> = first.content.iter().map(|todo| todo.tno.unwrap()).collect();
    assert_eq!(tnos, vec![5, 4]);
    assert_eq!(first.total_elements, 5);
    assert_eq!(first.total_pages(), 3);

    let last = repo.list_all(&PageRequest::of(2, 2)).unwrap();
    let tnos: Vec<_> = last.content.iter().map(|todo| todo.tno.unwrap()).collect();
    assert_eq!(tnos, vec![1]);
    assert!(last.is_last());
}

#[test]
fn todo_delete_and_validation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();

    let err = repo.create_todo(&Todo::new(1, "  ", "user1")).unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankField("title"))
    ));

    let tno = repo.create_todo(&Todo::new(1, "disposable", "user1")).unwrap();
    repo.delete_todo(tno).unwrap();
    assert!(repo.get_todo(tno).unwrap().is_none());
    assert!(matches!(
        repo.delete_todo(tno).unwrap_err(),
        RepoError::NotFound {
            table: "tbl_todo",
            ..
        }
    ));
}

#[test]
fn cart_lifecycle_by_customer() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCartRepository::try_new(&conn).unwrap();

    let first = repo.create_cart("user1").unwrap();
    let other = repo.create_cart("user2").unwrap();
    let newest = repo.create_cart("user1").unwrap();
    assert!(first < other && other < newest);

    let cart = repo.find_by_customer("user1").unwrap().unwrap();
    assert_eq!(cart.cno, newest);
    assert_eq!(cart.customer, "user1");
    assert!(cart.reg_date > 0);
    assert!(repo.find_by_customer("nobody").unwrap().is_none());

    repo.touch_cart(first).unwrap();
    let touched = repo.get_cart(first).unwrap().unwrap();
    assert!(touched.mod_date >= touched.reg_date);

    repo.delete_cart(newest).unwrap();
    assert!(repo.get_cart(newest).unwrap().is_none());
    assert_eq!(repo.find_by_customer("user1").unwrap().unwrap().cno, first);
    assert!(matches!(
        repo.touch_cart(newest).unwrap_err(),
        RepoError::NotFound { .. }
    ));
}

#[test]
fn cart_requires_customer() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCartRepository::try_new(&conn).unwrap();

    let err = repo.create_cart("").unwrap_err();
    assert!(matches!(
        err,
        RepoError::Validation(ValidationError::BlankField("customer"))
    ));
}

#[test]
fn list_all_pages_consistently_for_unnormalized_requests() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteTodoRepository::try_new(&conn).unwrap();
    for i in 1..=250 {
        repo.create_todo(&Todo::new(1, format!("todo {i}"), "user1"))
            .unwrap();
    }

    let request: PageRequest =
        serde_json::from_str(r#"{"page":1,"size":500,"sort":null}"#).unwrap();
    let page = repo.list_all(&request).unwrap();
    assert_eq!(page.number, 1);
    assert_eq!(page.size, 100);
    assert_eq!(page.total_pages(), 3);
    let tnos: Vec<_> = page.content.iter().map(|todo| todo.tno.unwrap()).collect();
    assert_eq!(tnos, (51..=150).rev().collect::<Vec<_>>());

    let literal = PageRequest {
        page: 2,
        size: 0,
        sort: None,
    };
    let page = repo.list_all(&literal).unwrap();
    assert_eq!(page.size, 10);
    assert_eq!(page.content.len(), 10);
    assert_eq!(page.content[0].tno, Some(230));
}
