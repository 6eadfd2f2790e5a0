//! Schema loading from a GraphQL introspection response

use super::types::{FieldDescriptor, Schema, TypeDescriptor, TypeKind, TypeRef};
use crate::error::{TiloresError, TiloresResult};
use serde::Deserialize;

/// Introspection query sent to the API to discover its schema
pub const INTROSPECTION_QUERY: &str = r#"query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    types { ...FullType }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    type { ...TypeRef }
  }
  inputFields {
    name
    description
    type { ...TypeRef }
  }
  enumValues(includeDeprecated: true) {
    name
  }
  possibleTypes {
    ...TypeRef
  }
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
            }
          }
        }
      }
    }
  }
}"#;

#[derive(Debug, Deserialize)]
struct IntrospectionData {
    #[serde(rename = "__schema")]
    schema: IntrospectionSchema,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionSchema {
    query_type: Option<NamedTypeRef>,
    mutation_type: Option<NamedTypeRef>,
    types: Vec<FullType>,
}

#[derive(Debug, Deserialize)]
struct NamedTypeRef {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FullType {
    kind: TypeKind,
    name: Option<String>,
    description: Option<String>,
    fields: Option<Vec<InputValue>>,
    input_fields: Option<Vec<InputValue>>,
    enum_values: Option<Vec<EnumValue>>,
    possible_types: Option<Vec<WrappedTypeRef>>,
}

/// Fields and input fields share the same shape for our purposes
#[derive(Debug, Deserialize)]
struct InputValue {
    name: String,
    description: Option<String>,
    #[serde(rename = "type")]
    field_type: WrappedTypeRef,
}

#[derive(Debug, Deserialize)]
struct EnumValue {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WrappedTypeRef {
    kind: TypeKind,
    name: Option<String>,
    of_type: Option<Box<WrappedTypeRef>>,
}

impl WrappedTypeRef {
    fn to_type_ref(&self) -> TiloresResult<TypeRef> {
        match self.kind {
            TypeKind::NonNull => Ok(TypeRef::non_null(self.inner()?.to_type_ref()?)),
            TypeKind::List => Ok(TypeRef::list(self.inner()?.to_type_ref()?)),
            _ => self
                .name
                .clone()
                .map(TypeRef::Named)
                .ok_or_else(|| TiloresError::schema(format!("{} type reference without a name", self.kind))),
        }
    }

    fn inner(&self) -> TiloresResult<&WrappedTypeRef> {
        self.of_type
            .as_deref()
            .ok_or_else(|| TiloresError::schema(format!("{} wrapper without an inner type", self.kind)))
    }
}

impl Schema {
    /// Build a schema from an introspection result.
    ///
    /// Accepts the whole response (`{"data": {"__schema": ...}}`) or just its `data` member.
    pub fn from_introspection(value: serde_json::Value) -> TiloresResult<Schema> {
        let data = match value {
            serde_json::Value::Object(mut map) if map.contains_key("data") => {
                map.remove("data").unwrap_or_default()
            }
            other => other,
        };

        let data: IntrospectionData = serde_json::from_value(data)
            .map_err(|e| TiloresError::schema(format!("Invalid introspection result: {}", e)))?;

        let mut schema = Schema::new();
        schema.query_type = data.schema.query_type.map(|t| t.name);
        schema.mutation_type = data.schema.mutation_type.map(|t| t.name);

        for full_type in data.schema.types {
            let Some(name) = full_type.name.clone() else {
                continue;
            };
            // Introspection meta types are never mapped
            if name.starts_with("__") {
                continue;
            }
            schema.add_type(convert_type(name, full_type)?);
        }

        Ok(schema)
    }
}

fn convert_type(name: String, full_type: FullType) -> TiloresResult<TypeDescriptor> {
    let mut descriptor =
        TypeDescriptor::new(full_type.kind, name).with_description(full_type.description);

    let fields = full_type
        .fields
        .into_iter()
        .chain(full_type.input_fields)
        .flatten();
    for field in fields {
        let mut field_descriptor = FieldDescriptor::new(field.name, field.field_type.to_type_ref()?);
        field_descriptor.description = field.description;
        descriptor.add_field(field_descriptor);
    }

    descriptor.enum_values = full_type
        .enum_values
        .unwrap_or_default()
        .into_iter()
        .map(|v| v.name)
        .collect();

    for member in full_type.possible_types.unwrap_or_default() {
        if let Some(member_name) = member.name {
            descriptor.possible_types.push(member_name);
        }
    }

    Ok(descriptor)
}
