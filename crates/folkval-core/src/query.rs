//! Query types for [`crate::store::PropositionStore::query_propositions`].
//!
//! Sortable and filterable columns are a fixed allow-list rendered to SQL by
//! the backend through [`Column::as_sql`] — caller strings are never
//! interpolated into a statement. Filter values are always bound parameters.

use chrono::NaiveDate;
use serde::Deserialize;

/// A column of the propositions table that may be filtered or ordered on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
  Id,
  Updated,
  UpVotes,
  DownVotes,
  Title,
  Url,
  PubDate,
}

impl Column {
  /// The SQL identifier for this column.
  pub fn as_sql(self) -> &'static str {
    match self {
      Column::Id => "id",
      Column::Updated => "updated",
      Column::UpVotes => "upvotes",
      Column::DownVotes => "downvotes",
      Column::Title => "title",
      Column::Url => "url",
      Column::PubDate => "pub_date",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
  #[default]
  Asc,
  Desc,
}

impl SortDirection {
  pub fn as_sql(self) -> &'static str {
    match self {
      SortDirection::Asc => "ASC",
      SortDirection::Desc => "DESC",
    }
  }
}

/// A value a filter compares against. The backend binds these as SQL
/// parameters; dates are compared in their ISO-8601 text form.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
  Integer(i64),
  Text(String),
  Date(NaiveDate),
}

impl From<i64> for FieldValue {
  fn from(v: i64) -> Self { FieldValue::Integer(v) }
}

impl From<&str> for FieldValue {
  fn from(v: &str) -> Self { FieldValue::Text(v.to_owned()) }
}

impl From<NaiveDate> for FieldValue {
  fn from(v: NaiveDate) -> Self { FieldValue::Date(v) }
}

/// A single comparison against one column.
///
/// `IN` and `LIKE` are not supported; `Between` is inclusive on both ends.
#[derive(Debug, Clone, PartialEq)]
pub enum Comparison {
  Lt(FieldValue),
  Gt(FieldValue),
  Le(FieldValue),
  Ge(FieldValue),
  Eq(FieldValue),
  Ne(FieldValue),
  Between(FieldValue, FieldValue),
}

impl Comparison {
  /// The SQL comparison operator, without its operands.
  pub fn operator_sql(&self) -> &'static str {
    match self {
      Comparison::Lt(_) => "<",
      Comparison::Gt(_) => ">",
      Comparison::Le(_) => "<=",
      Comparison::Ge(_) => ">=",
      Comparison::Eq(_) => "=",
      Comparison::Ne(_) => "<>",
      Comparison::Between(_, _) => "BETWEEN",
    }
  }
}

/// A filter over exactly one column. Only one filter is supported per query
/// — a deliberate simplification, not a general query builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
  pub column:     Column,
  pub comparison: Comparison,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
  pub column:    Column,
  pub direction: SortDirection,
}

/// Parameters for `query_propositions`. An empty (default) query returns
/// all propositions.
#[derive(Debug, Clone, Default)]
pub struct PropositionQuery {
  pub filter: Option<Filter>,
  pub order:  Option<Ordering>,
  pub limit:  Option<u32>,
}
