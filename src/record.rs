//! Record descriptions: the per-type field lists the decoding engine walks.
//!
//! A record is a struct that implements [`Record`] by listing its fields, in
//! declaration order, through a [`Fields`] collector. Each entry binds a name
//! and tag metadata to an accessor and records what kind of field it is:
//!
//! | Method | Field kind | Key path |
//! |--------|------------|----------|
//! | [`leaf`](Fields::leaf) | any [`Decode`] value | adds the field's name |
//! | [`nested`](Fields::nested) / [`nested_opt`](Fields::nested_opt) | a record / `Option` of a record | adds the field's name |
//! | [`embedded`](Fields::embedded) / [`embedded_opt`](Fields::embedded_opt) | a record promoted into the parent | adds nothing |
//! | [`anonymous`](Fields::anonymous) | an embedded non-record | always an error |
//!
//! ```ignore
//! impl Record for ServerConfig {
//!     fn describe(fields: &mut Fields<Self>) {
//!         fields.embedded("common", |c| &mut c.common);
//!         fields.leaf("port", |c| &mut c.port);
//!         fields.leaf("allowed_ips", |c| &mut c.allowed_ips).delimiter(";");
//!         fields.nested("database", |c| &mut c.database).rename("db");
//!         fields.leaf("cache", |c| &mut c.cache).skip();
//!     }
//! }
//! ```
//!
//! Descriptions are built once per record type and cached by the
//! [`Decoder`](crate::Decoder) that first decodes it.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::convert::{self, Context, Decode};
use crate::error::ConvertError;
use crate::walk::{Pass, Path};

/// Effective name that excludes a field from decoding.
pub const SKIP: &str = "-";

/// Tag keys understood by the crate itself.
pub mod tag {
    /// Replaces the declared name as the field's key segment.
    pub const RENAME: &str = "rename";
    /// Separator for sequence fields (default `,`).
    pub const DELIMITER: &str = "delimiter";
    /// Value used by [`DefaultValue`](crate::DefaultValue) when the key is missing.
    pub const DEFAULT: &str = "default";
    /// Timestamp pattern or alias for the built-in timestamp parsers.
    pub const LAYOUT: &str = "layout";
}

/// A struct that can be decoded field by field.
pub trait Record: Sized + 'static {
    /// List this record's fields in declaration order.
    fn describe(fields: &mut Fields<Self>);
}

/// Per-field tag metadata: an ordered list of `key = value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tags(Vec<(&'static str, &'static str)>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, replacing any earlier value.
    pub fn with(mut self, key: &'static str, value: &'static str) -> Self {
        self.set(key, value);
        self
    }

    pub(crate) fn set(&mut self, key: &'static str, value: &'static str) {
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Look up a tag. A present but empty tag returns `Some("")`.
    pub fn get(&self, key: &str) -> Option<&'static str> {
        self.0.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    pub fn rename(&self) -> Option<&'static str> {
        self.get(tag::RENAME)
    }

    pub fn delimiter(&self) -> Option<&'static str> {
        self.get(tag::DELIMITER).filter(|d| !d.is_empty())
    }

    pub fn default_value(&self) -> Option<&'static str> {
        self.get(tag::DEFAULT)
    }

    pub fn layout(&self) -> Option<&'static str> {
        self.get(tag::LAYOUT)
    }
}

/// One field of a record.
pub struct Field<R> {
    name: &'static str,
    type_name: &'static str,
    tags: Tags,
    settable: bool,
    pub(crate) kind: FieldKind<R>,
}

impl<R> Field<R> {
    /// Declared name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Declared type, as reported by [`std::any::type_name`].
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn tags(&self) -> &Tags {
        &self.tags
    }

    pub fn is_settable(&self) -> bool {
        self.settable
    }

    /// The name used as key segment: the rename tag, else the declared name.
    pub fn effective_name(&self) -> &'static str {
        self.tags.rename().unwrap_or(self.name)
    }

    pub fn is_skipped(&self) -> bool {
        self.effective_name() == SKIP
    }

    pub fn rename(&mut self, name: &'static str) -> &mut Self {
        self.tag(tag::RENAME, name)
    }

    /// Exclude the field from decoding: it is never looked up and never errors.
    pub fn skip(&mut self) -> &mut Self {
        self.rename(SKIP)
    }

    pub fn delimiter(&mut self, delimiter: &'static str) -> &mut Self {
        self.tag(tag::DELIMITER, delimiter)
    }

    pub fn default_value(&mut self, value: &'static str) -> &mut Self {
        self.tag(tag::DEFAULT, value)
    }

    pub fn layout(&mut self, layout: &'static str) -> &mut Self {
        self.tag(tag::LAYOUT, layout)
    }

    /// Set an arbitrary tag, e.g. a hint for a custom parser.
    pub fn tag(&mut self, key: &'static str, value: &'static str) -> &mut Self {
        self.tags.set(key, value);
        self
    }

    /// Mark the field as not settable. It is silently left alone, like a
    /// private field the decoder cannot reach.
    pub fn read_only(&mut self) -> &mut Self {
        self.settable = false;
        self
    }
}

/// Collector handed to [`Record::describe`].
pub struct Fields<R> {
    fields: Vec<Field<R>>,
}

impl<R: Record> Fields<R> {
    fn push(
        &mut self,
        name: &'static str,
        type_name: &'static str,
        kind: FieldKind<R>,
    ) -> &mut Field<R> {
        let index = self.fields.len();
        self.fields.push(Field {
            name,
            type_name,
            tags: Tags::new(),
            settable: true,
            kind,
        });
        &mut self.fields[index]
    }

    /// A value converted from a single key.
    pub fn leaf<T: Decode>(
        &mut self,
        name: &'static str,
        access: fn(&mut R) -> &mut T,
    ) -> &mut Field<R> {
        let kind = FieldKind::Leaf(Box::new(LeafFn(access)));
        self.push(name, std::any::type_name::<T>(), kind)
    }

    /// A nested record whose fields are keyed under this field's name.
    ///
    /// If a custom parser is registered for `T`, the field is decoded as a
    /// single leaf instead.
    pub fn nested<T: Record>(
        &mut self,
        name: &'static str,
        access: fn(&mut R) -> &mut T,
    ) -> &mut Field<R> {
        let kind = FieldKind::Nested(Box::new(NestedFn(access)));
        self.push(name, std::any::type_name::<T>(), kind)
    }

    /// Like [`nested`](Self::nested), allocating `T::default()` when the
    /// field is `None`.
    pub fn nested_opt<T: Record + Default>(
        &mut self,
        name: &'static str,
        access: fn(&mut R) -> &mut Option<T>,
    ) -> &mut Field<R> {
        self.push(
            name,
            std::any::type_name::<Option<T>>(),
            FieldKind::Nested(Box::new(OptionalNestedFn(access))),
        )
    }

    /// A record whose fields are promoted into this record's key namespace.
    pub fn embedded<T: Record>(
        &mut self,
        name: &'static str,
        access: fn(&mut R) -> &mut T,
    ) -> &mut Field<R> {
        let kind = FieldKind::Embedded(Box::new(NestedFn(access)));
        self.push(name, std::any::type_name::<T>(), kind)
    }

    /// Like [`embedded`](Self::embedded), allocating `T::default()` when the
    /// field is `None`.
    pub fn embedded_opt<T: Record + Default>(
        &mut self,
        name: &'static str,
        access: fn(&mut R) -> &mut Option<T>,
    ) -> &mut Field<R> {
        self.push(
            name,
            std::any::type_name::<Option<T>>(),
            FieldKind::Embedded(Box::new(OptionalNestedFn(access))),
        )
    }

    /// An embedded field whose type is not a record. Such a field has no
    /// keys to promote and is reported as an unsupported anonymous type on
    /// every decode.
    pub fn anonymous<T: 'static>(
        &mut self,
        name: &'static str,
        _access: fn(&mut R) -> &mut T,
    ) -> &mut Field<R> {
        self.push(name, std::any::type_name::<T>(), FieldKind::Anonymous)
    }
}

pub(crate) enum FieldKind<R> {
    Leaf(Box<dyn LeafAccess<R>>),
    Nested(Box<dyn NestedAccess<R>>),
    Embedded(Box<dyn NestedAccess<R>>),
    Anonymous,
}

pub(crate) trait LeafAccess<R>: Send + Sync {
    fn assign(&self, record: &mut R, input: &str, cx: &Context<'_>) -> Result<(), ConvertError>;
}

pub(crate) trait NestedAccess<R>: Send + Sync {
    /// Registry identity of the record type.
    fn type_key(&self) -> TypeId;

    /// Walk the nested record, allocating it first if it is absent.
    fn walk(&self, record: &mut R, pass: &mut Pass<'_>, path: &mut Path);

    /// Store a value produced by a custom parser. Returns `false` if the
    /// value has another type.
    fn store(&self, record: &mut R, value: Box<dyn Any + Send>) -> bool;
}

struct LeafFn<R, T>(fn(&mut R) -> &mut T);

impl<R: 'static, T: Decode> LeafAccess<R> for LeafFn<R, T> {
    fn assign(&self, record: &mut R, input: &str, cx: &Context<'_>) -> Result<(), ConvertError> {
        convert::convert((self.0)(record), input, cx)
    }
}

struct NestedFn<R, T>(fn(&mut R) -> &mut T);

impl<R: 'static, T: Record> NestedAccess<R> for NestedFn<R, T> {
    fn type_key(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn walk(&self, record: &mut R, pass: &mut Pass<'_>, path: &mut Path) {
        pass.walk((self.0)(record), path);
    }

    fn store(&self, record: &mut R, value: Box<dyn Any + Send>) -> bool {
        match value.downcast::<T>() {
            Ok(value) => {
                *(self.0)(record) = *value;
                true
            }
            Err(_) => false,
        }
    }
}

struct OptionalNestedFn<R, T>(fn(&mut R) -> &mut Option<T>);

impl<R: 'static, T: Record + Default> NestedAccess<R> for OptionalNestedFn<R, T> {
    fn type_key(&self) -> TypeId {
        TypeId::of::<T>()
    }

    fn walk(&self, record: &mut R, pass: &mut Pass<'_>, path: &mut Path) {
        let nested = (self.0)(record).get_or_insert_with(T::default);
        pass.walk(nested, path);
    }

    fn store(&self, record: &mut R, value: Box<dyn Any + Send>) -> bool {
        match value.downcast::<T>() {
            Ok(value) => {
                *(self.0)(record) = Some(*value);
                true
            }
            Err(_) => false,
        }
    }
}

/// The described fields of one record type.
pub struct Schema<R> {
    type_name: &'static str,
    fields: Vec<Field<R>>,
}

impl<R: Record> Schema<R> {
    pub fn describe() -> Self {
        let mut fields = Fields { fields: Vec::new() };
        R::describe(&mut fields);
        Self {
            type_name: std::any::type_name::<R>(),
            fields: fields.fields,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[Field<R>] {
        &self.fields
    }
}

/// Schemas already described, keyed by record type.
#[derive(Default)]
pub(crate) struct Schemas {
    cache: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl Schemas {
    pub fn get<R: Record>(&self) -> Arc<Schema<R>> {
        let id = TypeId::of::<R>();
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned();
        if let Some(schema) = cached
            && let Ok(schema) = schema.downcast::<Schema<R>>()
        {
            return schema;
        }

        let schema = Arc::new(Schema::<R>::describe());
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, schema.clone());
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{Inner, Primitives, Structure};

    #[test]
    fn describe_keeps_declaration_order() {
        let schema = Schema::<Primitives>::describe();
        let names: Vec<_> = schema.fields().iter().map(Field::name).collect();
        assert_eq!(&names[..3], &["flag", "int", "int8"]);
    }

    #[test]
    fn rename_changes_effective_name_only() {
        let schema = Schema::<Structure>::describe();
        let field = schema
            .fields()
            .iter()
            .find(|f| f.name() == "not_yet_renamed")
            .unwrap();
        assert_eq!(field.effective_name(), "renamed");
        assert!(!field.is_skipped());
    }

    #[test]
    fn skip_uses_sentinel() {
        let schema = Schema::<Structure>::describe();
        let field = schema.fields().iter().find(|f| f.name() == "ignored").unwrap();
        assert_eq!(field.effective_name(), SKIP);
        assert!(field.is_skipped());
    }

    #[test]
    fn read_only_clears_settable() {
        let schema = Schema::<Structure>::describe();
        let field = schema.fields().iter().find(|f| f.name() == "private").unwrap();
        assert!(!field.is_settable());
    }

    #[test]
    fn type_name_is_recorded() {
        let schema = Schema::<Inner>::describe();
        assert_eq!(schema.fields()[0].type_name(), "alloc::string::String");
        assert!(schema.type_name().ends_with("Inner"));
    }

    #[test]
    fn tags_last_write_wins() {
        let tags = Tags::new().with(tag::DELIMITER, ",").with(tag::DELIMITER, ";");
        assert_eq!(tags.delimiter(), Some(";"));
    }

    #[test]
    fn empty_default_is_present() {
        let tags = Tags::new().with(tag::DEFAULT, "");
        assert_eq!(tags.default_value(), Some(""));
    }

    #[test]
    fn empty_delimiter_is_ignored() {
        let tags = Tags::new().with(tag::DELIMITER, "");
        assert_eq!(tags.delimiter(), None);
    }

    #[test]
    fn schemas_are_cached_per_type() {
        let schemas = Schemas::default();
        let first = schemas.get::<Inner>();
        let second = schemas.get::<Inner>();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
