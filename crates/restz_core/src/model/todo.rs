//! To-do model.

use super::{require_text, ValidationError};
use serde::{Deserialize, Serialize};

pub type TodoId = i64;
pub type MemberId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub tno: Option<TodoId>,
    /// Owning member.
    pub mno: MemberId,
    pub title: String,
    pub writer: String,
    /// Epoch milliseconds.
    pub due_date: Option<i64>,
    pub complete: bool,
}

impl Todo {
    pub fn new(mno: MemberId, title: impl Into<String>, writer: impl Into<String>) -> Self {
        Self {
            tno: None,
            mno,
            title: title.into(),
            writer: writer.into(),
            due_date: None,
            complete: false,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("title", &self.title)?;
        require_text("writer", &self.writer)
    }

    pub fn change_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn change_due_date(&mut self, due_date: Option<i64>) {
        self.due_date = due_date;
    }

    pub fn change_complete(&mut self, complete: bool) {
        self.complete = complete;
    }
}
