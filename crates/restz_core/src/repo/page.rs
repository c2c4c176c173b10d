//! Paging and sorting primitives.
//!
//! # Invariants
//! - The effective page size is always within `1..=MAX_PAGE_SIZE`, however
//!   the request was built (`of`, deserialized, or a struct literal).
//! - Sort properties are entity property names; each repository maps them
//!   to SQL through a fixed whitelist, so caller text never reaches SQL.

use super::{RepoError, RepoResult};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

static SORT_PARAM_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*([A-Za-z_][A-Za-z0-9_]*)\s*(?:,\s*(?i:(asc|desc)))?\s*$")
        .expect("valid sort regex")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub property: String,
    pub direction: Direction,
}

impl Sort {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }

    /// Parses the `property[,asc|desc]` query-string form.
    ///
    /// Direction defaults to ascending. Returns `None` for malformed input.
    pub fn parse(value: &str) -> Option<Self> {
        let caps = SORT_PARAM_RE.captures(value)?;
        let property = caps.get(1)?.as_str().to_string();
        let direction = match caps.get(2).map(|m| m.as_str().to_ascii_lowercase()) {
            Some(dir) if dir == "desc" => Direction::Desc,
            _ => Direction::Asc,
        };
        Some(Self {
            property,
            direction,
        })
    }
}

/// Zero-based page index, page size and optional sort.
///
/// Deserialized requests go through the same size normalization as
/// [`PageRequest::of`]; missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "PageRequestParams")]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    /// Size `0` falls back to `DEFAULT_PAGE_SIZE`; larger sizes clamp to
    /// `MAX_PAGE_SIZE`.
    pub fn of(page: u32, size: u32) -> Self {
        Self {
            page,
            size: normalize_page_size(size),
            sort: None,
        }
    }

    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page) * self.limit()
    }

    pub fn limit(&self) -> i64 {
        i64::from(normalize_page_size(self.size))
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::of(0, DEFAULT_PAGE_SIZE)
    }
}

#[derive(Deserialize)]
struct PageRequestParams {
    #[serde(default)]
    page: u32,
    #[serde(default)]
    size: u32,
    #[serde(default)]
    sort: Option<Sort>,
}

impl From<PageRequestParams> for PageRequest {
    fn from(value: PageRequestParams) -> Self {
        Self {
            sort: value.sort,
            ..Self::of(value.page, value.size)
        }
    }
}

/// One page of results plus the totals of the whole filtered set.
///
/// Serializes with the derived `totalPages`, `first` and `last` next to the
/// stored fields; deserialization ignores them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based page index.
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            number: request.page,
            size: normalize_page_size(request.size),
            total_elements,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total_elements.div_ceil(u64::from(self.size.max(1)))
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.number) + 1 < self.total_pages()
    }

    pub fn is_first(&self) -> bool {
        self.number == 0
    }

    pub fn is_last(&self) -> bool {
        !self.has_next()
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            number: self.number,
            size: self.size,
            total_elements: self.total_elements,
        }
    }
}

impl<T: Serialize> Serialize for Page<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Page", 7)?;
        state.serialize_field("content", &self.content)?;
        state.serialize_field("number", &self.number)?;
        state.serialize_field("size", &self.size)?;
        state.serialize_field("totalElements", &self.total_elements)?;
        state.serialize_field("totalPages", &self.total_pages())?;
        state.serialize_field("first", &self.is_first())?;
        state.serialize_field("last", &self.is_last())?;
        state.end()
    }
}

/// Whitelisted mapping from entity property names to SQL expressions.
pub(crate) struct SortColumns {
    pub columns: &'static [(&'static str, &'static str)],
    /// Used when the request carries no sort.
    pub default: (&'static str, Direction),
    /// Unique key appended so page boundaries stay deterministic.
    pub tiebreak: &'static str,
}

impl SortColumns {
    /// Builds the `ORDER BY` body for `sort`.
    pub fn order_by(&self, sort: Option<&Sort>) -> RepoResult<String> {
        let (column, direction) = match sort {
            None => self.default,
            Some(sort) => {
                let column = self
                    .columns
                    .iter()
                    .find(|(property, _)| *property == sort.property)
                    .map(|(_, column)| *column)
                    .ok_or_else(|| RepoError::InvalidSort(sort.property.clone()))?;
                (column, sort.direction)
            }
        };

        if column == self.tiebreak {
            return Ok(format!("{column} {}", direction.as_sql()));
        }
        Ok(format!(
            "{column} {}, {} {}",
            direction.as_sql(),
            self.tiebreak,
            direction.as_sql()
        ))
    }
}

pub(crate) fn count_to_total(count: i64) -> RepoResult<u64> {
    u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative row count {count}")))
}

fn normalize_page_size(size: u32) -> u32 {
    match size {
        0 => DEFAULT_PAGE_SIZE,
        value if value > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
        value => value,
    }
}
