//! Selection masks: boolean mirrors of mapped records
//!
//! Every record in a [`TypeRegistry`] gets a [`MaskType`] with the same
//! field names. Leaf fields become flags and record-typed fields become
//! nested masks. A filled [`MaskInstance`] projects to the minimal
//! selection set that covers exactly the flagged fields.

use super::node::Selection;
use crate::error::{TiloresError, TiloresResult};
use crate::mapping::{HostType, MappedType, TypeId, TypeRegistry};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Identity of a mask type inside a [`MaskSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskFieldKind {
    /// Selected or not
    Flag,
    /// A record or union valued field with its own mask
    Nested(MaskId),
    /// A union member, projected as an inline fragment
    Fragment(MaskId),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaskField {
    pub name: String,
    pub kind: MaskFieldKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MaskType {
    pub name: String,
    pub fields: Vec<MaskField>,
}

impl MaskType {
    pub fn get_field(&self, name: &str) -> Option<&MaskField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Arena of mask types, one per mapped record or union
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskSet {
    masks: Vec<MaskType>,
    by_type: HashMap<TypeId, MaskId>,
    by_name: HashMap<String, MaskId>,
}

impl MaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive masks for every record and union in the registry
    pub fn build(registry: &TypeRegistry) -> TiloresResult<MaskSet> {
        let mut set = MaskSet::new();
        for (id, definition) in registry.iter() {
            if !matches!(definition, MappedType::Enum(_)) {
                set.derive(registry, id)?;
            }
        }
        debug!("Derived {} mask types", set.masks.len());
        Ok(set)
    }

    /// Derive the mask type of a record or union, memoized by type id
    pub fn derive(&mut self, registry: &TypeRegistry, id: TypeId) -> TiloresResult<MaskId> {
        if let Some(mask_id) = self.by_type.get(&id) {
            trace!("Mask for '{}' already derived", registry.get(id).name());
            return Ok(*mask_id);
        }

        let definition = registry.get(id);
        if let MappedType::Enum(enum_type) = definition {
            return Err(TiloresError::UnsupportedKind {
                name: enum_type.name.clone(),
                kind: "ENUM".to_string(),
            });
        }

        let mask_id = MaskId(self.masks.len());
        self.masks.push(MaskType {
            name: definition.name().to_string(),
            fields: Vec::new(),
        });
        self.by_type.insert(id, mask_id);
        self.by_name.insert(definition.name().to_string(), mask_id);

        let fields = match definition {
            MappedType::Record(record) => {
                let mut fields = Vec::with_capacity(record.fields.len());
                for field in &record.fields {
                    let kind = match field.ty.base() {
                        HostType::Named(target)
                            if !matches!(registry.get(*target), MappedType::Enum(_)) =>
                        {
                            MaskFieldKind::Nested(self.derive(registry, *target)?)
                        }
                        _ => MaskFieldKind::Flag,
                    };
                    fields.push(MaskField {
                        name: field.name.clone(),
                        kind,
                    });
                }
                fields
            }
            MappedType::Union(union) => {
                let mut fields = Vec::with_capacity(union.members.len());
                for member in &union.members {
                    fields.push(MaskField {
                        name: registry.get(*member).name().to_string(),
                        kind: MaskFieldKind::Fragment(self.derive(registry, *member)?),
                    });
                }
                fields
            }
            MappedType::Enum(_) => Vec::new(),
        };

        self.masks[mask_id.0].fields = fields;
        Ok(mask_id)
    }

    pub fn get(&self, id: MaskId) -> &MaskType {
        &self.masks[id.0]
    }

    /// Look up a mask by the name of its mapped type
    pub fn lookup(&self, name: &str) -> Option<MaskId> {
        self.by_name.get(name).copied()
    }

    /// Look up the mask derived for a mapped type
    pub fn for_type(&self, id: TypeId) -> Option<MaskId> {
        self.by_type.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.masks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.masks.is_empty()
    }
}

/// A caller-filled mask declaring which fields to query.
///
/// Unset fields count as not selected.
#[derive(Debug, Clone)]
pub struct MaskInstance {
    set: Arc<MaskSet>,
    mask: MaskId,
    flags: HashMap<String, bool>,
    nested: HashMap<String, MaskInstance>,
}

impl PartialEq for MaskInstance {
    fn eq(&self, other: &Self) -> bool {
        self.mask == other.mask && self.flags == other.flags && self.nested == other.nested
    }
}

impl MaskInstance {
    /// An instance with nothing selected
    pub fn new(set: Arc<MaskSet>, type_name: &str) -> TiloresResult<Self> {
        let mask = set
            .lookup(type_name)
            .ok_or_else(|| TiloresError::unknown_type(type_name))?;
        Ok(Self::empty(set, mask))
    }

    /// Build an instance from a JSON object shaped like the mask,
    /// e.g. `{"id": true, "addr": {"street": true}}`
    pub fn from_json(
        set: Arc<MaskSet>,
        type_name: &str,
        value: &serde_json::Value,
    ) -> TiloresResult<Self> {
        let mut instance = Self::new(set, type_name)?;
        instance.apply_json(value)?;
        Ok(instance)
    }

    fn empty(set: Arc<MaskSet>, mask: MaskId) -> Self {
        Self {
            set,
            mask,
            flags: HashMap::new(),
            nested: HashMap::new(),
        }
    }

    pub fn mask_type(&self) -> &MaskType {
        self.set.get(self.mask)
    }

    pub fn type_name(&self) -> &str {
        &self.mask_type().name
    }

    fn field_kind(&self, field: &str) -> TiloresResult<MaskFieldKind> {
        self.mask_type()
            .get_field(field)
            .map(|f| f.kind)
            .ok_or_else(|| TiloresError::unknown_field(self.type_name(), field))
    }

    /// Set a leaf field's flag
    pub fn set(&mut self, field: &str, selected: bool) -> TiloresResult<&mut Self> {
        match self.field_kind(field)? {
            MaskFieldKind::Flag => {
                self.flags.insert(field.to_string(), selected);
                Ok(self)
            }
            _ => Err(TiloresError::invalid_mask(
                self.type_name(),
                field,
                "expected a nested mask, not a flag",
            )),
        }
    }

    /// Select a leaf field
    pub fn select(&mut self, field: &str) -> TiloresResult<&mut Self> {
        self.set(field, true)
    }

    /// Nested mask of a record or union field, created empty on first access
    pub fn nested(&mut self, field: &str) -> TiloresResult<&mut MaskInstance> {
        let target = match self.field_kind(field)? {
            MaskFieldKind::Nested(id) | MaskFieldKind::Fragment(id) => id,
            MaskFieldKind::Flag => {
                return Err(TiloresError::invalid_mask(
                    self.type_name(),
                    field,
                    "expected a flag, not a nested mask",
                ));
            }
        };

        let set = self.set.clone();
        Ok(self
            .nested
            .entry(field.to_string())
            .or_insert_with(|| MaskInstance::empty(set, target)))
    }

    /// Select a leaf by dotted path, e.g. `"addr.street"`
    pub fn select_path(&mut self, path: &str) -> TiloresResult<&mut Self> {
        match path.split_once('.') {
            None => self.select(path),
            Some((head, rest)) => {
                self.nested(head)?.select_path(rest)?;
                Ok(self)
            }
        }
    }

    /// Merge a JSON object into this instance.
    ///
    /// Booleans set flags, objects fill nested masks and `null` is ignored.
    pub fn apply_json(&mut self, value: &serde_json::Value) -> TiloresResult<&mut Self> {
        let object = value.as_object().ok_or_else(|| {
            TiloresError::invalid_mask(self.type_name(), "", "mask must be a JSON object")
        })?;

        for (field, field_value) in object {
            match field_value {
                serde_json::Value::Null => {
                    self.field_kind(field)?;
                }
                serde_json::Value::Bool(selected) => {
                    self.set(field, *selected)?;
                }
                serde_json::Value::Object(_) => {
                    self.nested(field)?.apply_json(field_value)?;
                }
                other => {
                    return Err(TiloresError::invalid_mask(
                        self.type_name(),
                        field,
                        format!("expected a boolean or an object, got {}", other),
                    ));
                }
            }
        }
        Ok(self)
    }

    pub fn is_selected(&self, field: &str) -> bool {
        self.flags.get(field).copied().unwrap_or(false)
    }

    pub fn get_nested(&self, field: &str) -> Option<&MaskInstance> {
        self.nested.get(field)
    }

    /// The minimal selection set implied by this mask, in declared field order
    pub fn project(&self) -> Vec<Selection> {
        let mut selections = Vec::new();

        for field in &self.mask_type().fields {
            match field.kind {
                MaskFieldKind::Flag => {
                    if self.is_selected(&field.name) {
                        selections.push(Selection::field(&field.name));
                    }
                }
                MaskFieldKind::Nested(_) | MaskFieldKind::Fragment(_) => {
                    let children = self
                        .nested
                        .get(&field.name)
                        .map(MaskInstance::project)
                        .unwrap_or_default();
                    if children.is_empty() {
                        continue;
                    }
                    if matches!(field.kind, MaskFieldKind::Fragment(_)) {
                        selections.push(Selection::inline_fragment(&field.name, children));
                    } else {
                        selections.push(Selection::nested(&field.name, children));
                    }
                }
            }
        }

        selections
    }
}

/// Project a mask instance into its selection set
pub fn project(mask: &MaskInstance) -> Vec<Selection> {
    mask.project()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::TypeMapper;
    use crate::schema::Schema;
    use serde_json::json;

    fn mask_set(sdl: &str, roots: &[&str]) -> Arc<MaskSet> {
        let schema = Schema::from_sdl(sdl).unwrap();
        let registry = TypeMapper::new(&schema).generate_roots(roots).unwrap();
        Arc::new(MaskSet::build(&registry).unwrap())
    }

    fn record_masks() -> Arc<MaskSet> {
        mask_set(
            r#"
            type Address { street: String! house: String! city: String! }
            type Record { id: ID! firstName: String! lastName: String! age: Int! addr: Address! }
            "#,
            &["Record"],
        )
    }

    #[test]
    fn test_derive_mask_shape() {
        let set = record_masks();
        let record = set.get(set.lookup("Record").unwrap());
        let address = set.lookup("Address").unwrap();

        let names: Vec<&str> = record.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["id", "firstName", "lastName", "age", "addr"]);
        assert_eq!(record.get_field("age").unwrap().kind, MaskFieldKind::Flag);
        assert_eq!(record.get_field("addr").unwrap().kind, MaskFieldKind::Nested(address));
    }

    #[test]
    fn test_empty_mask_projects_nothing() {
        let set = record_masks();
        for name in ["Record", "Address"] {
            let mask = MaskInstance::new(set.clone(), name).unwrap();
            assert!(project(&mask).is_empty());
        }
    }

    #[test]
    fn test_project_selected_fields() {
        let set = record_masks();
        let mask = MaskInstance::from_json(
            set,
            "Record",
            &json!({
                "id": true,
                "firstName": false,
                "lastName": true,
                "age": false,
                "addr": { "street": true, "house": false, "city": true }
            }),
        )
        .unwrap();

        assert_eq!(
            mask.project(),
            vec![
                Selection::field("id"),
                Selection::field("lastName"),
                Selection::nested(
                    "addr",
                    vec![Selection::field("street"), Selection::field("city")]
                ),
            ]
        );
    }

    #[test]
    fn test_composite_without_selection_is_omitted() {
        let set = record_masks();
        let mut mask = MaskInstance::new(set, "Record").unwrap();
        mask.select("id").unwrap();
        mask.nested("addr").unwrap().set("street", false).unwrap().set("house", false).unwrap();

        assert_eq!(mask.project(), vec![Selection::field("id")]);
    }

    #[test]
    fn test_projection_follows_declared_order() {
        let set = record_masks();
        let mut mask = MaskInstance::new(set, "Record").unwrap();
        mask.select_path("addr.city").unwrap();
        mask.select("age").unwrap().select("id").unwrap();

        let projected = mask.project();
        let names: Vec<&str> = projected.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["id", "age", "addr"]);
    }

    #[test]
    fn test_unknown_and_mismatched_fields() {
        let set = record_masks();
        let mut mask = MaskInstance::new(set.clone(), "Record").unwrap();

        assert_eq!(
            mask.select("middleName").unwrap_err(),
            TiloresError::unknown_field("Record", "middleName")
        );
        assert!(matches!(
            mask.select("addr"),
            Err(TiloresError::InvalidMask { .. })
        ));
        assert!(matches!(
            mask.nested("id"),
            Err(TiloresError::InvalidMask { .. })
        ));
        assert!(MaskInstance::from_json(set.clone(), "Record", &json!({"id": 1})).is_err());
        assert!(MaskInstance::from_json(set, "Nope", &json!({})).is_err());
    }

    #[test]
    fn test_cyclic_record_mask() {
        let set = mask_set("type Node { id: ID! parent: Node }", &["Node"]);
        let node = set.lookup("Node").unwrap();
        assert_eq!(
            set.get(node).get_field("parent").unwrap().kind,
            MaskFieldKind::Nested(node)
        );

        let mut mask = MaskInstance::new(set, "Node").unwrap();
        mask.select_path("parent.parent.id").unwrap();
        assert_eq!(
            mask.project(),
            vec![Selection::nested(
                "parent",
                vec![Selection::nested("parent", vec![Selection::field("id")])]
            )]
        );
    }

    #[test]
    fn test_union_field_projects_fragments() {
        let set = mask_set(
            r#"
            enum Kind { A B }
            type Coupon { code: String kind: Kind }
            type Voucher { amount: Float }
            union Discount = Coupon | Voucher
            type Record { id: ID! discounts: [Discount] }
            "#,
            &["Record"],
        );

        let record = set.get(set.lookup("Record").unwrap());
        let discount = set.lookup("Discount").unwrap();
        assert_eq!(
            record.get_field("discounts").unwrap().kind,
            MaskFieldKind::Nested(discount)
        );

        let mask = MaskInstance::from_json(
            set,
            "Record",
            &json!({ "discounts": { "Coupon": { "code": true, "kind": true }, "Voucher": { "amount": false } } }),
        )
        .unwrap();

        assert_eq!(
            mask.project(),
            vec![Selection::nested(
                "discounts",
                vec![Selection::inline_fragment(
                    "Coupon",
                    vec![Selection::field("code"), Selection::field("kind")]
                )]
            )]
        );
    }
}
