//! Per-call options for assignment and normalization.

use std::collections::HashMap;

use modelbind_core::naming::{self, NamingStyle};
use modelbind_core::Settings;
use modelbind_schema::TypeRef;

/// Options controlling one call to [`Binder::assign`](crate::Binder::assign)
/// or [`Binder::create`](crate::Binder::create).
///
/// # Examples
///
/// ```
/// use modelbind_bind::AssignOptions;
/// use modelbind_core::NamingStyle;
/// use modelbind_schema::{BuiltinType, TypeRef};
///
/// let opts = AssignOptions::default()
///     .convert_naming(true)
///     .source_naming(NamingStyle::LowerHyphen)
///     .with_type("profile.age", BuiltinType::Int);
/// assert_eq!(opts.source_key("firstName"), "first-name");
/// assert_eq!(opts.types.get("profile.age"), Some(&TypeRef::Builtin(BuiltinType::Int)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignOptions {
    /// Normalize each record once its fields are merged.
    pub normalize: bool,
    /// Translate field names into the source naming style when reading source keys.
    pub convert_naming: bool,
    /// The naming style of source keys.
    pub source_naming: NamingStyle,
    /// The naming style of record field names.
    pub target_naming: NamingStyle,
    /// Declared-type overrides keyed by dotted field path.
    pub types: HashMap<String, TypeRef>,
    /// Element-type overrides keyed by dotted field path.
    pub element_types: HashMap<String, TypeRef>,
}

impl Default for AssignOptions {
    fn default() -> Self {
        Self {
            normalize: true,
            convert_naming: false,
            source_naming: NamingStyle::LowerUnderscore,
            target_naming: NamingStyle::LowerCamel,
            types: HashMap::new(),
            element_types: HashMap::new(),
        }
    }
}

impl AssignOptions {
    /// Builds options from the `assign` section of the settings.
    pub fn from_settings(settings: &Settings) -> Self {
        let assign = &settings.assign;
        Self {
            normalize: assign.normalize,
            convert_naming: assign.convert_naming,
            source_naming: assign.source_naming,
            target_naming: assign.target_naming,
            ..Self::default()
        }
    }

    pub fn normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn convert_naming(mut self, convert: bool) -> Self {
        self.convert_naming = convert;
        self
    }

    pub fn source_naming(mut self, style: NamingStyle) -> Self {
        self.source_naming = style;
        self
    }

    pub fn target_naming(mut self, style: NamingStyle) -> Self {
        self.target_naming = style;
        self
    }

    /// Overrides the declared type of the field at `path`.
    pub fn with_type(mut self, path: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.types.insert(path.into(), ty.into());
        self
    }

    /// Overrides the element type of the collection field at `path`.
    pub fn with_element_type(mut self, path: impl Into<String>, ty: impl Into<TypeRef>) -> Self {
        self.element_types.insert(path.into(), ty.into());
        self
    }

    /// The key under which `field` is looked up on the source.
    pub fn source_key(&self, field: &str) -> String {
        if self.convert_naming {
            naming::convert(field, self.target_naming, self.source_naming)
        } else {
            field.to_string()
        }
    }

    /// The `(from, to)` styles for renaming source keys into record keys.
    pub fn rename(&self) -> Option<(NamingStyle, NamingStyle)> {
        self.convert_naming
            .then_some((self.source_naming, self.target_naming))
    }
}

/// Which fields [`Binder::normalize`](crate::Binder::normalize) visits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldSelector {
    /// Every field present on the record.
    #[default]
    All,
    /// A single field.
    One(String),
    /// The listed fields.
    Many(Vec<String>),
}

impl From<&str> for FieldSelector {
    fn from(name: &str) -> Self {
        if name == "*" {
            Self::All
        } else {
            Self::One(name.to_string())
        }
    }
}

impl From<Vec<String>> for FieldSelector {
    fn from(names: Vec<String>) -> Self {
        Self::Many(names)
    }
}

impl From<&[&str]> for FieldSelector {
    fn from(names: &[&str]) -> Self {
        Self::Many(names.iter().map(|n| (*n).to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelbind_schema::BuiltinType;

    #[test]
    fn test_defaults() {
        let opts = AssignOptions::default();
        assert!(opts.normalize);
        assert!(!opts.convert_naming);
        assert_eq!(opts.source_naming, NamingStyle::LowerUnderscore);
        assert_eq!(opts.target_naming, NamingStyle::LowerCamel);
        assert_eq!(opts, AssignOptions::from_settings(&Settings::default()));
    }

    #[test]
    fn test_source_key_and_rename() {
        let plain = AssignOptions::default();
        assert_eq!(plain.source_key("firstName"), "firstName");
        assert_eq!(plain.rename(), None);

        let converting = AssignOptions::default().convert_naming(true);
        assert_eq!(converting.source_key("firstName"), "first_name");
        assert_eq!(
            converting.rename(),
            Some((NamingStyle::LowerUnderscore, NamingStyle::LowerCamel))
        );
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.assign.normalize = false;
        settings.assign.source_naming = NamingStyle::UpperUnderscore;
        let opts = AssignOptions::from_settings(&settings);
        assert!(!opts.normalize);
        assert_eq!(opts.source_naming, NamingStyle::UpperUnderscore);
    }

    #[test]
    fn test_overrides() {
        let opts = AssignOptions::default()
            .with_type("a", BuiltinType::Int)
            .with_element_type("b.c", TypeRef::class("Tag"));
        assert_eq!(opts.types.len(), 1);
        assert_eq!(opts.element_types.get("b.c"), Some(&TypeRef::class("Tag")));
    }

    #[test]
    fn test_field_selector_from() {
        assert_eq!(FieldSelector::from("*"), FieldSelector::All);
        assert_eq!(FieldSelector::from("name"), FieldSelector::One("name".into()));
        let many: &[&str] = &["a", "b"];
        assert_eq!(
            FieldSelector::from(many),
            FieldSelector::Many(vec!["a".into(), "b".into()])
        );
    }
}
