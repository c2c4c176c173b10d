use crate::model::todo::{MemberId, Todo, TodoId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoDto {
    pub tno: Option<TodoId>,
    pub mno: MemberId,
    pub title: String,
    pub writer: String,
    pub due_date: Option<i64>,
    pub complete: bool,
}

impl TodoDto {
    pub fn to_entity(&self) -> Todo {
        Todo {
            tno: self.tno,
            mno: self.mno,
            title: self.title.clone(),
            writer: self.writer.clone(),
            due_date: self.due_date,
            complete: self.complete,
        }
    }
}

impl From<Todo> for TodoDto {
    fn from(todo: Todo) -> Self {
        Self {
            tno: todo.tno,
            mno: todo.mno,
            title: todo.title,
            writer: todo.writer,
            due_date: todo.due_date,
            complete: todo.complete,
        }
    }
}
