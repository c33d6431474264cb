//! The normalization engine.
//!
//! Only fields that declare a normalizer are touched. `null` and `undefined`
//! are never normalized; arrays and maps are normalized element by element.

use modelbind_schema::{NormalizeContext, Normalizer, Record, Value};

use crate::assign::Binder;
use crate::options::FieldSelector;

impl Binder<'_> {
    /// Normalizes the selected fields of `target` in place.
    ///
    /// Each field is handled by the class level that declares it. Fields the
    /// schema does not know are left alone.
    pub fn normalize<'t>(&self, target: &'t mut Record, fields: &FieldSelector) -> &'t mut Record {
        let names: Vec<String> = match fields {
            FieldSelector::All => target.field_names().map(str::to_string).collect(),
            FieldSelector::One(name) => vec![name.clone()],
            FieldSelector::Many(names) => names.clone(),
        };
        for name in &names {
            self.normalize_field(target, name);
        }
        target
    }

    fn normalize_field(&self, target: &mut Record, name: &str) {
        let schema = self.registry().schema(target.class_name());
        let Some(level) = schema.declaring_class(name) else {
            return;
        };
        let Some(field) = level.own_field(name) else {
            return;
        };
        let Some(normalizer) = &field.normalizer else {
            return;
        };
        let Some(slot) = target.get_mut(name) else {
            return;
        };
        if slot.is_nullish() {
            return;
        }

        let ctx = NormalizeContext {
            class: level.name(),
            field: name,
            element_type: field.element_type.as_ref(),
        };
        *slot = match std::mem::take(slot) {
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.apply(normalizer, item, &ctx))
                    .collect(),
            ),
            Value::Map(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, self.apply(normalizer, v, &ctx)))
                    .collect(),
            ),
            other => self.apply(normalizer, other, &ctx),
        };
    }

    fn apply(&self, normalizer: &Normalizer, value: Value, ctx: &NormalizeContext<'_>) -> Value {
        match normalizer {
            Normalizer::Default => self.default_normalize(value),
            Normalizer::Custom(f) => f(value, ctx),
        }
    }

    /// Trims strings, recurses into collections, and normalizes records
    /// through their own schema.
    pub fn default_normalize(&self, value: Value) -> Value {
        match value {
            Value::String(s) => {
                let trimmed = s.trim();
                if trimmed.len() == s.len() {
                    Value::String(s)
                } else {
                    Value::String(trimmed.to_string())
                }
            }
            Value::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(|item| self.default_normalize(item))
                    .collect(),
            ),
            Value::Map(map) => Value::Map(
                map.into_iter()
                    .map(|(k, v)| (k, self.default_normalize(v)))
                    .collect(),
            ),
            Value::Record(mut record) => {
                self.normalize(&mut record, &FieldSelector::All);
                Value::Record(record)
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use modelbind_schema::{BuiltinType, ClassBuilder, FieldSchema, SchemaRegistry, TypeRef};

    use super::*;

    fn registry() -> SchemaRegistry {
        let r = SchemaRegistry::new();
        r.register(ClassBuilder::model("Tag").field(FieldSchema::new("label").normalized()))
            .unwrap();
        r.register(
            ClassBuilder::model("Post")
                .field(FieldSchema::new("title").normalized())
                .field(FieldSchema::new("body"))
                .field(FieldSchema::new("tags").array_of(TypeRef::class("Tag")).normalized())
                .field(
                    FieldSchema::new("code")
                        .of_type(BuiltinType::String)
                        .normalize_with(|v, _| match v {
                            Value::String(s) => Value::String(s.to_uppercase()),
                            other => other,
                        }),
                )
                .field(FieldSchema::new("keywords").array_of(BuiltinType::String).normalize_with(
                    |v, ctx| {
                        assert_eq!(ctx.element_type, Some(&TypeRef::Builtin(BuiltinType::String)));
                        v
                    },
                )),
        )
        .unwrap();
        r.register(
            ClassBuilder::model("Article")
                .extends("Post")
                .field(FieldSchema::new("summary").normalized()),
        )
        .unwrap();
        r
    }

    fn post(class: &str) -> Record {
        let mut tag = Record::new("Tag");
        tag.set("label", "  rust ");
        let mut p = Record::new(class);
        p.set("title", "  Hello ");
        p.set("body", "  untouched ");
        p.set("tags", vec![Value::Record(tag), Value::Null]);
        p.set("code", "ab");
        p.set("keywords", vec![Value::from("x")]);
        p
    }

    #[test]
    fn test_normalize_all() {
        let r = registry();
        let binder = Binder::new(&r);
        let mut p = post("Post");
        binder.normalize(&mut p, &FieldSelector::All);

        assert_eq!(p.value("title"), &Value::from("Hello"));
        assert_eq!(p.value("body"), &Value::from("  untouched "));
        assert_eq!(p.value("code"), &Value::from("AB"));
        let tags = p.value("tags").as_array().unwrap();
        assert_eq!(tags[0].get("label"), Some(&Value::from("rust")));
        assert_eq!(tags[1], Value::Null);
    }

    #[test]
    fn test_normalize_selected_fields() {
        let r = registry();
        let binder = Binder::new(&r);
        let mut p = post("Post");
        binder.normalize(&mut p, &FieldSelector::from("title"));
        assert_eq!(p.value("title"), &Value::from("Hello"));
        assert_eq!(p.value("code"), &Value::from("ab"));

        let mut p = post("Post");
        binder.normalize(&mut p, &FieldSelector::Many(vec!["code".into(), "missing".into()]));
        assert_eq!(p.value("title"), &Value::from("  Hello "));
        assert_eq!(p.value("code"), &Value::from("AB"));
    }

    #[test]
    fn test_inherited_fields_use_declaring_level() {
        let r = registry();
        let binder = Binder::new(&r);
        let mut a = post("Article");
        a.set("summary", " short ");
        binder.normalize(&mut a, &FieldSelector::All);
        assert_eq!(a.value("title"), &Value::from("Hello"));
        assert_eq!(a.value("summary"), &Value::from("short"));
    }

    #[test]
    fn test_nullish_values_preserved() {
        let r = registry();
        let binder = Binder::new(&r);
        let mut p = Record::new("Post");
        p.set("title", Value::Null);
        p.set("code", Value::Undefined);
        binder.normalize(&mut p, &FieldSelector::All);
        assert_eq!(p.value("title"), &Value::Null);
        assert_eq!(p.value("code"), &Value::Undefined);
    }

    #[test]
    fn test_default_normalize_maps() {
        let r = registry();
        let binder = Binder::new(&r);
        let v: Value = [("a", Value::from(" x ")), ("b", Value::from(1))].into_iter().collect();
        let n = binder.default_normalize(v);
        assert_eq!(n.get("a"), Some(&Value::from("x")));
        assert_eq!(n.get("b"), Some(&Value::from(1)));
    }
}
