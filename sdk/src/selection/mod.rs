//! Query selections: nodes, documents, masks and the insights builder

pub mod document;
pub mod insights;
pub mod mask;
pub mod node;

pub use document::{Operation, VariableDefinition};
pub use insights::{Direction, RecordInsights};
pub use mask::{MaskField, MaskFieldKind, MaskId, MaskInstance, MaskSet, MaskType, project};
pub use node::{Argument, FieldNode, Selection, Value};
