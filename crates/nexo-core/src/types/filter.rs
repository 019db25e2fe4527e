//! Row filters and queries in the hosted store's query dialect.
//!
//! A [`Filter`] is a conjunction of column predicates. The REST backend
//! renders it to query-string pairs (`parent_id=eq.<id>`,
//! `folder_id=is.null`, `id=in.("a","b")`); the in-memory backend evaluates
//! it against JSON rows with [`Filter::matches`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Filter comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality.
    Eq,
    /// `IS NULL` check.
    IsNull,
    /// `IN` list membership.
    In,
}

/// A filter operand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A scalar compared by its textual form.
    String(String),
    /// A list of values (for the `In` operator).
    StringList(Vec<String>),
    /// No operand (for `IsNull`).
    Null,
}

/// A single filter condition on a named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterField {
    /// The column name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The value to compare against.
    pub value: FilterValue,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: FilterValue) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl ToString) -> Self {
        Self::new(field, FilterOp::Eq, FilterValue::String(value.to_string()))
    }

    /// Shorthand for an `IS NULL` filter.
    pub fn is_null(field: impl Into<String>) -> Self {
        Self::new(field, FilterOp::IsNull, FilterValue::Null)
    }

    /// Shorthand for an `IN (...)` filter.
    pub fn in_list<I, T>(field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        Self::new(
            field,
            FilterOp::In,
            FilterValue::StringList(values.into_iter().map(|v| v.to_string()).collect()),
        )
    }

    /// Render as a `(column, operator.operand)` query-string pair.
    pub fn to_query_pair(&self) -> (String, String) {
        let rendered = match (&self.op, &self.value) {
            (FilterOp::Eq, FilterValue::String(v)) => format!("eq.{v}"),
            (FilterOp::IsNull, _) => "is.null".to_string(),
            (FilterOp::In, FilterValue::StringList(values)) => {
                let quoted: Vec<String> = values
                    .iter()
                    .map(|v| format!("\"{}\"", v.replace('"', "\\\"")))
                    .collect();
                format!("in.({})", quoted.join(","))
            }
            (FilterOp::Eq, other) | (FilterOp::In, other) => {
                format!("eq.{}", scalar_text(other))
            }
        };
        (self.field.clone(), rendered)
    }

    /// Evaluate this predicate against a JSON row.
    pub fn matches(&self, row: &Value) -> bool {
        let cell = row.get(&self.field).unwrap_or(&Value::Null);
        match (&self.op, &self.value) {
            (FilterOp::IsNull, _) => cell.is_null(),
            (FilterOp::Eq, FilterValue::String(v)) => cell_text(cell).as_deref() == Some(v),
            (FilterOp::In, FilterValue::StringList(values)) => match cell_text(cell) {
                Some(text) => values.iter().any(|v| *v == text),
                None => false,
            },
            _ => false,
        }
    }
}

fn scalar_text(value: &FilterValue) -> String {
    match value {
        FilterValue::String(s) => s.clone(),
        FilterValue::StringList(list) => list.join(","),
        FilterValue::Null => "null".to_string(),
    }
}

fn cell_text(cell: &Value) -> Option<String> {
    match cell {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// A conjunction of filter fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    /// All predicates that must hold.
    pub fields: Vec<FilterField>,
}

impl Filter {
    /// An empty filter (matches every row).
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality predicate.
    pub fn eq(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push(FilterField::eq(field, value));
        self
    }

    /// Add an `IS NULL` predicate.
    pub fn is_null(mut self, field: impl Into<String>) -> Self {
        self.fields.push(FilterField::is_null(field));
        self
    }

    /// Add an `IN` predicate.
    pub fn in_list<I, T>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: ToString,
    {
        self.fields.push(FilterField::in_list(field, values));
        self
    }

    /// Equality when `value` is present, `IS NULL` otherwise.
    ///
    /// Folder and file listings use this for the nullable parent column.
    pub fn eq_or_null<T: ToString>(self, field: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(v) => self.eq(field, v),
            None => self.is_null(field),
        }
    }

    /// Whether no predicate is set.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render every predicate as query-string pairs.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.fields.iter().map(FilterField::to_query_pair).collect()
    }

    /// Evaluate the conjunction against a JSON row.
    pub fn matches(&self, row: &Value) -> bool {
        self.fields.iter().all(|f| f.matches(row))
    }
}

/// Sort direction for ordered selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Ascending (A → Z).
    #[default]
    Asc,
    /// Descending (Z → A).
    Desc,
}

impl SortDirection {
    /// Return the query-string keyword.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// A select request: filter, projection and ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Row filter.
    pub filter: Filter,
    /// Projected columns (`*` when `None`).
    pub columns: Option<String>,
    /// Ordering column and direction.
    pub order: Option<(String, SortDirection)>,
}

impl Query {
    /// Select every column of rows matching `filter`.
    pub fn filtered(filter: Filter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    /// Restrict the projection to the given comma-separated columns.
    pub fn columns(mut self, columns: impl Into<String>) -> Self {
        self.columns = Some(columns.into());
        self
    }

    /// Order ascending by `column`.
    pub fn order_by(mut self, column: impl Into<String>) -> Self {
        self.order = Some((column.into(), SortDirection::Asc));
        self
    }

    /// Render projection, ordering and filters as query-string pairs.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![(
            "select".to_string(),
            self.columns.clone().unwrap_or_else(|| "*".to_string()),
        )];
        if let Some((column, direction)) = &self.order {
            pairs.push(("order".to_string(), format!("{column}.{}", direction.as_str())));
        }
        pairs.extend(self.filter.to_query_pairs());
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_renders_query_pairs() {
        let query = Query::filtered(Filter::new().eq("parent_id", "abc").is_null("folder_id"))
            .order_by("name");
        assert_eq!(
            query.to_query_pairs(),
            vec![
                ("select".to_string(), "*".to_string()),
                ("order".to_string(), "name.asc".to_string()),
                ("parent_id".to_string(), "eq.abc".to_string()),
                ("folder_id".to_string(), "is.null".to_string()),
            ]
        );
    }

    #[test]
    fn test_in_list_is_quoted() {
        let (col, value) = FilterField::in_list("id", ["a", "b"]).to_query_pair();
        assert_eq!(col, "id");
        assert_eq!(value, "in.(\"a\",\"b\")");
    }

    #[test]
    fn test_matches_rows() {
        let row = json!({ "id": "1", "parent_id": null, "is_private": true });
        assert!(Filter::new().is_null("parent_id").matches(&row));
        assert!(Filter::new().eq("is_private", true).matches(&row));
        assert!(Filter::new().in_list("id", ["0", "1"]).matches(&row));
        assert!(!Filter::new().eq("parent_id", "1").matches(&row));
        assert!(Filter::new().matches(&row));
    }

    #[test]
    fn test_eq_or_null() {
        let none: Option<&str> = None;
        assert_eq!(
            Filter::new().eq_or_null("parent_id", none),
            Filter::new().is_null("parent_id")
        );
        assert_eq!(
            Filter::new().eq_or_null("parent_id", Some("x")),
            Filter::new().eq("parent_id", "x")
        );
    }
}
