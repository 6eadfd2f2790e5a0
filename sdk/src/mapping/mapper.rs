//! Recursive mapping of schema types into a [`TypeRegistry`]

use super::types::{
    EnumType, HostType, MappedField, MappedType, Primitive, RecordKind, RecordType, TypeId,
    TypeRegistry, UnionType,
};
use crate::error::{TiloresError, TiloresResult};
use crate::schema::{Schema, TypeDescriptor, TypeKind, TypeRef};
use tracing::{debug, trace};

/// Designated query input/output roots of a Tilores schema
pub const ROOT_TYPES: [&str; 3] = ["Record", "RecordInput", "SearchParams"];

/// One mapping session over a schema.
///
/// Every visited named type is registered before its fields are mapped, so
/// a field pointing back at an enclosing type resolves to the same
/// [`TypeId`] instead of recursing.
pub struct TypeMapper<'a> {
    schema: &'a Schema,
    registry: TypeRegistry,
}

impl<'a> TypeMapper<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            registry: TypeRegistry::new(),
        }
    }

    /// Map the Tilores root types and everything they reach
    pub fn generate(self) -> TiloresResult<TypeRegistry> {
        self.generate_roots(&ROOT_TYPES)
    }

    /// Map the given root types and everything they reach
    pub fn generate_roots(mut self, roots: &[&str]) -> TiloresResult<TypeRegistry> {
        for root in roots {
            self.map_record(root)?;
        }
        debug!(
            "Mapped {} types from {} root types",
            self.registry.len(),
            roots.len()
        );
        Ok(self.registry)
    }

    /// Map a field type, returning whether it is required and its host type
    pub fn map_type(&mut self, type_ref: &TypeRef) -> TiloresResult<(bool, HostType)> {
        match type_ref {
            TypeRef::NonNull(inner) => {
                let (_, ty) = self.map_type(inner)?;
                Ok((true, ty))
            }
            TypeRef::List(inner) => {
                let (inner_required, inner_ty) = self.map_type(inner)?;
                let inner_ty = if inner_required {
                    inner_ty
                } else {
                    HostType::optional(inner_ty)
                };
                Ok((false, HostType::list(inner_ty)))
            }
            TypeRef::Named(name) => Ok((false, self.map_named(name)?)),
        }
    }

    /// Map an object, interface or input object by name
    pub fn map_record(&mut self, name: &str) -> TiloresResult<TypeId> {
        if let Some(id) = self.registry.lookup(name) {
            trace!("Type '{}' already mapped", name);
            return Ok(id);
        }

        let descriptor = self.descriptor(name)?;
        let kind = match descriptor.kind {
            TypeKind::Object => RecordKind::Object,
            TypeKind::Interface => RecordKind::Interface,
            TypeKind::InputObject => RecordKind::InputObject,
            other => return Err(unsupported_kind(name, other)),
        };

        let id = self
            .registry
            .insert(MappedType::Record(RecordType::placeholder(name, kind)));
        debug!("Registered record type '{}'", name);

        let mut fields = Vec::with_capacity(descriptor.fields.len());
        for field in &descriptor.fields {
            let (required, ty) = self.map_type(&field.field_type)?;
            fields.push(MappedField {
                name: field.name.clone(),
                ty,
                required,
                description: field.description.clone(),
            });
        }

        if let MappedType::Record(record) = self.registry.get_mut(id) {
            record.fields = fields;
            record.description = descriptor.description.clone();
            record.complete = true;
        }

        Ok(id)
    }

    fn map_named(&mut self, name: &str) -> TiloresResult<HostType> {
        let descriptor = self.descriptor(name)?;
        match descriptor.kind {
            TypeKind::Scalar => Primitive::from_scalar(name)
                .map(HostType::Primitive)
                .ok_or_else(|| TiloresError::UnsupportedScalar {
                    name: name.to_string(),
                }),
            TypeKind::Enum => Ok(HostType::Named(self.map_enum(descriptor))),
            TypeKind::Union => Ok(HostType::Named(self.map_union(descriptor)?)),
            TypeKind::Object | TypeKind::Interface | TypeKind::InputObject => {
                Ok(HostType::Named(self.map_record(name)?))
            }
            other => Err(unsupported_kind(name, other)),
        }
    }

    fn map_enum(&mut self, descriptor: &TypeDescriptor) -> TypeId {
        if let Some(id) = self.registry.lookup(&descriptor.name) {
            return id;
        }

        debug!("Registered enum type '{}'", descriptor.name);
        self.registry.insert(MappedType::Enum(EnumType {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            values: descriptor.enum_values.clone(),
        }))
    }

    fn map_union(&mut self, descriptor: &TypeDescriptor) -> TiloresResult<TypeId> {
        if let Some(id) = self.registry.lookup(&descriptor.name) {
            return Ok(id);
        }

        // Registered empty first so members referring back to the union resolve
        let id = self.registry.insert(MappedType::Union(UnionType {
            name: descriptor.name.clone(),
            description: descriptor.description.clone(),
            members: Vec::new(),
        }));

        let mut members = Vec::with_capacity(descriptor.possible_types.len());
        for member in &descriptor.possible_types {
            members.push(self.map_record(member)?);
        }

        debug!(
            "Registered union type '{}' over {} members",
            descriptor.name,
            members.len()
        );
        if let MappedType::Union(union) = self.registry.get_mut(id) {
            union.members = members;
        }
        Ok(id)
    }

    fn descriptor(&self, name: &str) -> TiloresResult<&'a TypeDescriptor> {
        self.schema
            .get_type(name)
            .ok_or_else(|| TiloresError::unknown_type(name))
    }
}

fn unsupported_kind(name: &str, kind: TypeKind) -> TiloresError {
    TiloresError::UnsupportedKind {
        name: name.to_string(),
        kind: kind.to_string(),
    }
}

impl TypeRegistry {
    /// Map the Tilores root types of a schema in a fresh session
    pub fn from_schema(schema: &Schema) -> TiloresResult<TypeRegistry> {
        TypeMapper::new(schema).generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldDescriptor;

    fn person_schema() -> Schema {
        Schema::from_sdl(
            r#"
            type Address { street: String house: String city: String }
            type Person { id: ID! name: String home: Address work: Address }
            type Company { hq: Address! staff: [Person] }
            type Unused { id: ID! }
            "#,
        )
        .unwrap()
    }

    #[test]
    fn test_shared_reference_has_single_identity() {
        let schema = person_schema();
        let registry = TypeMapper::new(&schema)
            .generate_roots(&["Person", "Company"])
            .unwrap();

        let address = registry.lookup("Address").unwrap();
        let person = registry.record(registry.lookup("Person").unwrap()).unwrap();
        let company = registry.record(registry.lookup("Company").unwrap()).unwrap();

        assert_eq!(person.get_field("home").unwrap().ty.named(), Some(address));
        assert_eq!(person.get_field("work").unwrap().ty.named(), Some(address));
        assert_eq!(company.get_field("hq").unwrap().ty.named(), Some(address));
        assert!(!registry.contains("Unused"));
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let schema = person_schema();
        let first = TypeMapper::new(&schema).generate_roots(&["Company"]).unwrap();
        let second = TypeMapper::new(&schema).generate_roots(&["Company"]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_self_reference_terminates() {
        let schema = Schema::from_sdl(
            "type Node { id: ID! parent: Node children: [Node!]! }",
        )
        .unwrap();
        let registry = TypeMapper::new(&schema).generate_roots(&["Node"]).unwrap();

        let node_id = registry.lookup("Node").unwrap();
        let node = registry.record(node_id).unwrap();
        assert!(node.complete);
        assert_eq!(node.get_field("parent").unwrap().ty, HostType::Named(node_id));
        assert_eq!(
            node.get_field("children").unwrap().ty,
            HostType::list(HostType::Named(node_id))
        );
        assert!(node.get_field("children").unwrap().required);
    }

    #[test]
    fn test_list_nullability() {
        let schema = Schema::from_sdl(
            "type Record { a: [String] b: [String!] c: [String!]! d: Int! }",
        )
        .unwrap();
        let registry = TypeMapper::new(&schema).generate_roots(&["Record"]).unwrap();
        let record = registry.record(registry.lookup("Record").unwrap()).unwrap();
        let string = HostType::Primitive(Primitive::String);

        let a = record.get_field("a").unwrap();
        assert_eq!(a.ty, HostType::list(HostType::optional(string.clone())));
        assert!(!a.required);

        let b = record.get_field("b").unwrap();
        assert_eq!(b.ty, HostType::list(string.clone()));
        assert_eq!(b.host_type(), HostType::optional(HostType::list(string.clone())));

        let c = record.get_field("c").unwrap();
        assert!(c.required);
        assert_eq!(c.host_type(), HostType::list(string));

        let d = record.get_field("d").unwrap();
        assert_eq!(d.host_type(), HostType::Primitive(Primitive::Int));
    }

    #[test]
    fn test_unknown_scalar_fails() {
        let schema = Schema::from_sdl("scalar Money type Record { price: Money }").unwrap();
        let err = TypeMapper::new(&schema).generate_roots(&["Record"]).unwrap_err();
        assert_eq!(
            err,
            TiloresError::UnsupportedScalar {
                name: "Money".to_string()
            }
        );
        assert!(err.to_string().contains("Money"));
    }

    #[test]
    fn test_missing_root_fails() {
        let schema = Schema::from_sdl("type Record { id: ID! }").unwrap();
        let err = TypeMapper::new(&schema).generate().unwrap_err();
        assert_eq!(err, TiloresError::unknown_type("RecordInput"));
    }

    #[test]
    fn test_unknown_kind_fails() {
        let mut schema = Schema::new();
        schema.add_type(TypeDescriptor::new(TypeKind::Unknown, "Mystery"));
        let mut record = TypeDescriptor::new(TypeKind::Object, "Record");
        record.add_field(FieldDescriptor::new("m", TypeRef::named("Mystery")));
        schema.add_type(record);

        let err = TypeMapper::new(&schema).generate_roots(&["Record"]).unwrap_err();
        assert!(err.is_mapping_error());
        assert!(err.to_string().contains("Mystery"));
    }

    #[test]
    fn test_enum_and_union() {
        let schema = Schema::from_sdl(
            r#"
            "Seasons of the year"
            enum Season { SPRING SUMMER AUTUMN WINTER }
            type Coupon { code: String season: Season }
            type Voucher { amount: Float season: Season! }
            union Discount = Voucher | Coupon
            type Record { discount: Discount seasons: [Season] }
            "#,
        )
        .unwrap();
        let registry = TypeMapper::new(&schema).generate_roots(&["Record"]).unwrap();

        let season = registry.get_by_name("Season").unwrap().as_enum().unwrap();
        assert_eq!(season.values, vec!["SPRING", "SUMMER", "AUTUMN", "WINTER"]);
        assert_eq!(season.description.as_deref(), Some("Seasons of the year"));

        let discount = registry.get_by_name("Discount").unwrap().as_union().unwrap();
        let members: Vec<&str> = discount
            .members
            .iter()
            .map(|id| registry.get(*id).name())
            .collect();
        assert_eq!(members, vec!["Voucher", "Coupon"]);

        // Both members share the single enum definition
        let season_id = registry.lookup("Season");
        let coupon = registry.record(registry.lookup("Coupon").unwrap()).unwrap();
        let voucher = registry.record(registry.lookup("Voucher").unwrap()).unwrap();
        assert_eq!(coupon.get_field("season").unwrap().ty.named(), season_id);
        assert_eq!(voucher.get_field("season").unwrap().ty.named(), season_id);
    }

    #[test]
    fn test_union_member_must_be_object() {
        let mut schema = Schema::new();
        let mut union = TypeDescriptor::new(TypeKind::Union, "Bad");
        union.possible_types = vec!["String".to_string()];
        schema.add_type(union);
        let mut record = TypeDescriptor::new(TypeKind::Object, "Record");
        record.add_field(FieldDescriptor::new("bad", TypeRef::named("Bad")));
        schema.add_type(record);

        let err = TypeMapper::new(&schema).generate_roots(&["Record"]).unwrap_err();
        assert!(matches!(err, TiloresError::UnsupportedKind { ref name, .. } if name == "String"));
    }

    #[test]
    fn test_union_cycle_terminates() {
        let schema = Schema::from_sdl(
            "union Contact = Postal type Postal { city: String back: Contact } type Record { c: Contact }",
        )
        .unwrap();
        let registry = TypeMapper::new(&schema).generate_roots(&["Record"]).unwrap();

        let contact = registry.lookup("Contact").unwrap();
        let postal = registry.record(registry.lookup("Postal").unwrap()).unwrap();
        assert_eq!(postal.get_field("back").unwrap().ty.named(), Some(contact));
        assert_eq!(registry.get(contact).as_union().unwrap().members.len(), 1);
    }
}
