//! Builder for `recordInsights` aggregation fragments
//!
//! See <https://docs.tilotech.io/tilores/api/#record-insights>

use super::node::{FieldNode, Selection, Value};
use crate::error::{TiloresError, TiloresResult};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Type whose field names a whitelist describes
const RECORD_TYPE: &str = "Record";

/// Sort direction of a frequency distribution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Asc,
    #[default]
    Desc,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Asc => f.write_str("ASC"),
            Direction::Desc => f.write_str("DESC"),
        }
    }
}

/// Accumulates the sub-aggregations of one `recordInsights` field.
///
/// With a whitelist every referenced field name is checked when the
/// aggregation is added, so unknown names fail locally instead of on the
/// server. Without one the caller is responsible for the names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordInsights {
    alias: Option<String>,
    whitelist: Option<Arc<HashSet<String>>>,
    selections: Vec<Selection>,
}

impl RecordInsights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Only accept the given record field names
    pub fn with_whitelist<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.whitelist = Some(Arc::new(fields.into_iter().map(Into::into).collect()));
        self
    }

    pub(crate) fn with_shared_whitelist(mut self, whitelist: Arc<HashSet<String>>) -> Self {
        self.whitelist = Some(whitelist);
        self
    }

    /// Most (or least) frequent values of a field.
    ///
    /// The service's defaults are `top = 1` and [`Direction::Desc`].
    pub fn frequency_distribution(
        mut self,
        field_name: &str,
        alias: Option<&str>,
        top: i64,
        direction: Direction,
    ) -> TiloresResult<Self> {
        self.validate(field_name)?;
        let node = FieldNode::new("frequencyDistribution")
            .with_alias(alias.map(str::to_string).unwrap_or_else(|| default_alias(field_name)))
            .with_argument("field", field_name)
            .with_argument("top", top)
            .with_argument("direction", Value::enum_value(direction.to_string()))
            .with_selections(vec![
                Selection::field("value"),
                Selection::field("frequency"),
                Selection::field("percentage"),
            ]);
        self.selections.push(node.into());
        Ok(self)
    }

    /// Values of the most recent record, ordered by a time field
    pub fn newest(
        self,
        sort_by_field_name: &str,
        alias: &str,
        values: Vec<Selection>,
    ) -> TiloresResult<Self> {
        self.ordered("newest", sort_by_field_name, alias, values)
    }

    /// Values of the oldest record, ordered by a time field
    pub fn oldest(
        self,
        sort_by_field_name: &str,
        alias: &str,
        values: Vec<Selection>,
    ) -> TiloresResult<Self> {
        self.ordered("oldest", sort_by_field_name, alias, values)
    }

    fn ordered(
        mut self,
        name: &str,
        sort_by_field_name: &str,
        alias: &str,
        values: Vec<Selection>,
    ) -> TiloresResult<Self> {
        self.validate(sort_by_field_name)?;
        self.validate_values(&values)?;
        let node = FieldNode::new(name)
            .with_alias(alias)
            .with_argument("field", sort_by_field_name)
            .with_selections(values);
        self.selections.push(node.into());
        Ok(self)
    }

    /// All values of a field across the entity's records
    pub fn values(self, field_name: &str, alias: Option<&str>) -> TiloresResult<Self> {
        self.listing("values", field_name, alias)
    }

    /// Distinct values of a field across the entity's records
    pub fn values_distinct(self, field_name: &str, alias: Option<&str>) -> TiloresResult<Self> {
        self.listing("valuesDistinct", field_name, alias)
    }

    fn listing(mut self, name: &str, field_name: &str, alias: Option<&str>) -> TiloresResult<Self> {
        self.validate(field_name)?;
        let node = FieldNode::new(name)
            .with_alias(alias.map(str::to_string).unwrap_or_else(|| default_alias(field_name)))
            .with_argument("field", field_name);
        self.selections.push(node.into());
        Ok(self)
    }

    fn validate(&self, field_name: &str) -> TiloresResult<()> {
        match self.whitelist {
            Some(ref whitelist) if !whitelist.contains(field_name) => {
                Err(TiloresError::unknown_field(RECORD_TYPE, field_name))
            }
            _ => Ok(()),
        }
    }

    /// Fields are checked by name. Fragments are transparent and their
    /// direct fields are checked instead of the type condition.
    fn validate_values(&self, values: &[Selection]) -> TiloresResult<()> {
        for value in values {
            match value {
                Selection::Field(field) => self.validate(&field.name)?,
                Selection::InlineFragment { selections, .. } => self.validate_values(selections)?,
            }
        }
        Ok(())
    }

    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }

    /// The finished `recordInsights { ... }` node
    pub fn into_selection(self) -> Selection {
        let mut node = FieldNode::new("recordInsights").with_selections(self.selections);
        node.alias = self.alias;
        node.into()
    }
}

/// Aliases must be plain names, so path separators become underscores
fn default_alias(field_name: &str) -> String {
    field_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}
