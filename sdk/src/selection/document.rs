//! Query documents: an operation header wrapped around a selection tree

use super::node::{Selection, write_block};
use std::fmt;

/// A typed operation variable, e.g. `$params: SearchParams!`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDefinition {
    pub name: String,
    pub type_name: String,
}

/// A named GraphQL query operation
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub name: String,
    pub variables: Vec<VariableDefinition>,
    pub selections: Vec<Selection>,
}

impl Operation {
    pub fn query(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            selections: Vec::new(),
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.variables.push(VariableDefinition {
            name: name.into(),
            type_name: type_name.into(),
        });
        self
    }

    pub fn with_selection(mut self, selection: impl Into<Selection>) -> Self {
        self.selections.push(selection.into());
        self
    }

    /// Render the operation as query text
    pub fn render(&self) -> String {
        let mut out = format!("query {}", self.name);
        if !self.variables.is_empty() {
            let variables: Vec<String> = self
                .variables
                .iter()
                .map(|v| format!("${}: {}", v.name, v.type_name))
                .collect();
            out.push('(');
            out.push_str(&variables.join(", "));
            out.push(')');
        }
        if self.selections.is_empty() {
            out.push_str(" {\n}");
        } else {
            // Writing into a String cannot fail
            let _ = write_block(&mut out, &self.selections, 0);
        }
        out
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
