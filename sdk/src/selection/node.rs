//! Selection nodes: the requested-fields tree of a query

use std::fmt::{self, Write};

/// Literal or variable passed as a field argument
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Rendered as a quoted string literal
    String(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
    /// Rendered bare, e.g. `DESC`
    Enum(String),
    /// Rendered as `$name`
    Variable(String),
    Object(Vec<Argument>),
    List(Vec<Value>),
    Null,
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Value::String(value.into())
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Value::Variable(name.into())
    }

    pub fn enum_value(value: impl Into<String>) -> Self {
        Value::Enum(value.into())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => {
                let quoted = serde_json::to_string(s).map_err(|_| fmt::Error)?;
                f.write_str(&quoted)
            }
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Enum(e) => f.write_str(e),
            Value::Variable(name) => write!(f, "${}", name),
            Value::Object(arguments) => {
                f.write_char('{')?;
                write_arguments(f, arguments)?;
                f.write_char('}')
            }
            Value::List(values) => {
                f.write_char('[')?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", value)?;
                }
                f.write_char(']')
            }
            Value::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// A `name: value` argument pair
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: Value,
}

impl Argument {
    pub fn new(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

fn write_arguments(f: &mut impl Write, arguments: &[Argument]) -> fmt::Result {
    for (index, argument) in arguments.iter().enumerate() {
        if index > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}: {}", argument.name, argument.value)?;
    }
    Ok(())
}

/// A requested field with optional alias, arguments and sub-selection
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    pub name: String,
    pub alias: Option<String>,
    pub arguments: Vec<Argument>,
    pub selections: Vec<Selection>,
}

impl FieldNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            arguments: Vec::new(),
            selections: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.arguments.push(Argument::new(name, value));
        self
    }

    pub fn with_selections(mut self, selections: Vec<Selection>) -> Self {
        self.selections = selections;
        self
    }

    pub fn with_selection(mut self, selection: impl Into<Selection>) -> Self {
        self.selections.push(selection.into());
        self
    }

    /// A field without arguments or sub-selection
    pub fn is_bare(&self) -> bool {
        self.alias.is_none() && self.arguments.is_empty() && self.selections.is_empty()
    }
}

/// One entry of a selection set
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Field(FieldNode),
    /// `... on Type { ... }`, used for union members
    InlineFragment {
        type_condition: String,
        selections: Vec<Selection>,
    },
}

impl Selection {
    /// A bare field selection
    pub fn field(name: impl Into<String>) -> Self {
        Selection::Field(FieldNode::new(name))
    }

    /// A field with a nested selection set
    pub fn nested(name: impl Into<String>, selections: Vec<Selection>) -> Self {
        Selection::Field(FieldNode::new(name).with_selections(selections))
    }

    pub fn inline_fragment(type_condition: impl Into<String>, selections: Vec<Selection>) -> Self {
        Selection::InlineFragment {
            type_condition: type_condition.into(),
            selections,
        }
    }

    /// Field name, or the type condition of an inline fragment
    pub fn name(&self) -> &str {
        match self {
            Selection::Field(field) => &field.name,
            Selection::InlineFragment { type_condition, .. } => type_condition,
        }
    }

    pub fn selections(&self) -> &[Selection] {
        match self {
            Selection::Field(field) => &field.selections,
            Selection::InlineFragment { selections, .. } => selections,
        }
    }

    /// Render this selection as an indented block of query text
    pub fn render(&self, indent: usize) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_to(&mut out, indent);
        out
    }

    pub(crate) fn write_to(&self, out: &mut String, indent: usize) -> fmt::Result {
        let pad = "  ".repeat(indent);
        out.push_str(&pad);
        match self {
            Selection::Field(field) => {
                if let Some(ref alias) = field.alias {
                    write!(out, "{}: ", alias)?;
                }
                out.push_str(&field.name);
                if !field.arguments.is_empty() {
                    out.push('(');
                    write_arguments(out, &field.arguments)?;
                    out.push(')');
                }
            }
            Selection::InlineFragment { type_condition, .. } => {
                write!(out, "... on {}", type_condition)?;
            }
        }
        write_block(out, self.selections(), indent)?;
        out.push('\n');
        Ok(())
    }
}

/// Write ` { ... }` for a non-empty selection set
pub(crate) fn write_block(out: &mut String, selections: &[Selection], indent: usize) -> fmt::Result {
    if selections.is_empty() {
        return Ok(());
    }
    out.push_str(" {\n");
    for selection in selections {
        selection.write_to(out, indent + 1)?;
    }
    out.push_str(&"  ".repeat(indent));
    out.push('}');
    Ok(())
}

impl From<&str> for Selection {
    fn from(name: &str) -> Self {
        Selection::field(name)
    }
}

impl From<String> for Selection {
    fn from(name: String) -> Self {
        Selection::field(name)
    }
}

impl From<FieldNode> for Selection {
    fn from(field: FieldNode) -> Self {
        Selection::Field(field)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.render(0).trim_end())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_bare_field() {
        assert_eq!(Selection::field("id").to_string(), "id");
    }

    #[test]
    fn test_render_nested_with_arguments() {
        let selection: Selection = FieldNode::new("frequencyDistribution")
            .with_alias("firstName")
            .with_argument("field", "firstName")
            .with_argument("top", 3)
            .with_argument("direction", Value::enum_value("DESC"))
            .with_selection("value")
            .into();

        assert_eq!(
            selection.to_string(),
            "firstName: frequencyDistribution(field: \"firstName\", top: 3, direction: DESC) {\n  value\n}"
        );
    }

    #[test]
    fn test_render_object_argument_and_fragment() {
        let selection: Selection = FieldNode::new("search")
            .with_argument(
                "input",
                Value::Object(vec![Argument::new("parameters", Value::variable("params"))]),
            )
            .with_selection(Selection::inline_fragment(
                "Coupon",
                vec![Selection::field("code")],
            ))
            .into();

        assert_eq!(
            selection.to_string(),
            "search(input: {parameters: $params}) {\n  ... on Coupon {\n    code\n  }\n}"
        );
    }

    #[test]
    fn test_string_values_are_escaped() {
        assert_eq!(Value::string("say \"hi\"").to_string(), "\"say \\\"hi\\\"\"");
        assert_eq!(
            Value::List(vec![Value::Int(1), Value::Null]).to_string(),
            "[1, null]"
        );
    }
}
