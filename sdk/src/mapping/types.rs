//! Host-side types synthesized from the schema

use std::collections::HashMap;
use std::fmt;

/// Identity of a mapped type inside a [`TypeRegistry`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

impl TypeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Host primitive for a schema scalar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    String,
    Int,
    Boolean,
    Float,
    Time,
    Date,
    DateTime,
}

impl Primitive {
    /// Resolve a scalar name to its host primitive
    pub fn from_scalar(name: &str) -> Option<Self> {
        match name {
            "String" | "ID" => Some(Primitive::String),
            "Int" => Some(Primitive::Int),
            "Boolean" => Some(Primitive::Boolean),
            "Float" => Some(Primitive::Float),
            "Time" => Some(Primitive::Time),
            "Date" => Some(Primitive::Date),
            "DateTime" => Some(Primitive::DateTime),
            _ => None,
        }
    }

    /// Rust type used when generating source code
    pub fn rust_type(&self) -> &'static str {
        match self {
            Primitive::String => "String",
            Primitive::Int => "i64",
            Primitive::Boolean => "bool",
            Primitive::Float => "f64",
            Primitive::Time => "chrono::NaiveTime",
            Primitive::Date => "chrono::NaiveDate",
            Primitive::DateTime => "chrono::DateTime<chrono::Utc>",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Primitive::String => "String",
            Primitive::Int => "Int",
            Primitive::Boolean => "Boolean",
            Primitive::Float => "Float",
            Primitive::Time => "Time",
            Primitive::Date => "Date",
            Primitive::DateTime => "DateTime",
        };
        write!(f, "{}", name)
    }
}

/// Type of a member in a mapped record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostType {
    Primitive(Primitive),
    Named(TypeId),
    List(Box<HostType>),
    Optional(Box<HostType>),
}

impl HostType {
    pub fn optional(inner: HostType) -> Self {
        HostType::Optional(Box::new(inner))
    }

    pub fn list(inner: HostType) -> Self {
        HostType::List(Box::new(inner))
    }

    /// The type with all `List` and `Optional` wrappers removed
    pub fn base(&self) -> &HostType {
        match self {
            HostType::List(inner) | HostType::Optional(inner) => inner.base(),
            other => other,
        }
    }

    /// The named type at the base, if any
    pub fn named(&self) -> Option<TypeId> {
        match self.base() {
            HostType::Named(id) => Some(*id),
            _ => None,
        }
    }
}

/// Which schema kind a record was mapped from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Object,
    Interface,
    InputObject,
}

/// A member of a mapped record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MappedField {
    pub name: String,
    /// Type without the optionality of the field itself
    pub ty: HostType,
    pub required: bool,
    pub description: Option<String>,
}

impl MappedField {
    /// The member's full type, wrapped in `Optional` unless required
    pub fn host_type(&self) -> HostType {
        if self.required {
            self.ty.clone()
        } else {
            HostType::optional(self.ty.clone())
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecordType {
    pub name: String,
    pub kind: RecordKind,
    pub description: Option<String>,
    pub fields: Vec<MappedField>,
    /// False while the record is a placeholder whose fields are still being mapped
    pub complete: bool,
}

impl RecordType {
    pub(crate) fn placeholder(name: &str, kind: RecordKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            description: None,
            fields: Vec::new(),
            complete: false,
        }
    }

    pub fn get_field(&self, name: &str) -> Option<&MappedField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumType {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<String>,
}

/// Sum type over the records of a union
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnionType {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<TypeId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MappedType {
    Record(RecordType),
    Enum(EnumType),
    Union(UnionType),
}

impl MappedType {
    pub fn name(&self) -> &str {
        match self {
            MappedType::Record(r) => &r.name,
            MappedType::Enum(e) => &e.name,
            MappedType::Union(u) => &u.name,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            MappedType::Record(r) => r.description.as_deref(),
            MappedType::Enum(e) => e.description.as_deref(),
            MappedType::Union(u) => u.description.as_deref(),
        }
    }

    pub fn as_record(&self) -> Option<&RecordType> {
        match self {
            MappedType::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            MappedType::Enum(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_union(&self) -> Option<&UnionType> {
        match self {
            MappedType::Union(u) => Some(u),
            _ => None,
        }
    }
}

/// Arena of mapped types, keyed by schema type name.
///
/// Holds at most one definition per name. Entries are never removed, so a
/// [`TypeId`] stays valid for the registry's lifetime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypeRegistry {
    definitions: Vec<MappedType>,
    by_name: HashMap<String, TypeId>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, definition: MappedType) -> TypeId {
        let id = TypeId(self.definitions.len());
        self.by_name.insert(definition.name().to_string(), id);
        self.definitions.push(definition);
        id
    }

    pub(crate) fn get_mut(&mut self, id: TypeId) -> &mut MappedType {
        &mut self.definitions[id.0]
    }

    /// Look up a type id by schema name
    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// Get a mapped type by id
    pub fn get(&self, id: TypeId) -> &MappedType {
        &self.definitions[id.0]
    }

    /// Get a mapped type by schema name
    pub fn get_by_name(&self, name: &str) -> Option<&MappedType> {
        self.lookup(name).map(|id| self.get(id))
    }

    /// Get a record by id, if the type is a record
    pub fn record(&self, id: TypeId) -> Option<&RecordType> {
        self.get(id).as_record()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// All types in registration order
    pub fn iter(&self) -> impl Iterator<Item = (TypeId, &MappedType)> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(index, definition)| (TypeId(index), definition))
    }

    /// Render a host type the way it reads in schema terms, e.g. `[String]` or `Record?`
    pub fn describe(&self, ty: &HostType) -> String {
        match ty {
            HostType::Primitive(p) => p.to_string(),
            HostType::Named(id) => self.get(*id).name().to_string(),
            HostType::List(inner) => format!("[{}]", self.describe(inner)),
            HostType::Optional(inner) => format!("{}?", self.describe(inner)),
        }
    }
}
