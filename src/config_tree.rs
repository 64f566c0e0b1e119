//! Hierarchical configuration tree.
//!
//! Responsibility:
//! - Load configuration layers with figment (JSON file, then `Section__Key`
//!   environment variables) into one `serde_json::Value` tree
//! - Navigate `:`-separated section paths, matching keys case-insensitively
//! - Read leaves as strings or string arrays
//!
//! Arrays may be real JSON arrays or objects keyed by index (`"0"`, `"1"`, ...),
//! which is what flat key/value sources produce.

use std::path::Path;

use figment::{
    Figment, Metadata, Profile, Provider,
    providers::{Env, Format, Json},
    value::{Dict, Map as ProfileMap, Value as FigmentValue},
};
use serde_json::{Map, Value};

use crate::error::ConfigError;

pub const PATH_SEPARATOR: char = ':';

/// Separator used in environment variable names in place of `:`.
pub const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigTree {
    root: Value,
}

impl ConfigTree {
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Self::from_figment(&Figment::from(CaseFolded(Json::string(s))))
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_figment(&Figment::from(json_file(path.as_ref())?))
    }

    /// Environment variables named `<section>__...` (case-insensitive), with
    /// `__` standing for the `:` path separator. The section is kept, so
    /// `SecurityHeaders__XFrameOption` lands at `SecurityHeaders:XFrameOption`.
    pub fn from_env(section: &str) -> Result<Self, ConfigError> {
        Self::from_figment(&Figment::from(env_provider(section)))
    }

    /// JSON file (optional) overlaid by `<section>__*` environment variables.
    pub fn load(file: Option<&Path>, section: &str) -> Result<Self, ConfigError> {
        Self::from_figment(&Self::figment(file, section)?)
    }

    /// The layered figment behind [`ConfigTree::load`], for callers that want
    /// to merge further providers before extracting.
    pub fn figment(file: Option<&Path>, section: &str) -> Result<Figment, ConfigError> {
        let mut figment = Figment::new();
        if let Some(path) = file {
            figment = figment.merge(json_file(path)?);
        }
        Ok(figment.merge(env_provider(section)))
    }

    pub fn from_figment(figment: &Figment) -> Result<Self, ConfigError> {
        Ok(Self::new(figment.extract::<Value>()?))
    }

    /// Builds a tree from flat `Section:Key:0 = value` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut root = Value::Object(Map::new());
        for (key, value) in pairs {
            let segments: Vec<&str> = key
                .as_ref()
                .split(PATH_SEPARATOR)
                .filter(|s| !s.is_empty())
                .collect();
            insert_path(&mut root, &segments, Value::String(value.into()));
        }
        Self::new(root)
    }

    pub fn root(&self) -> ConfigSection<'_> {
        ConfigSection {
            key: "",
            value: &self.root,
        }
    }

    /// Section at `path`, or `None` if it does not exist.
    pub fn section(&self, path: &str) -> Option<ConfigSection<'_>> {
        path.split(PATH_SEPARATOR)
            .filter(|s| !s.is_empty())
            .try_fold(self.root(), |section, key| section.child(key))
            .filter(ConfigSection::exists)
    }
}

/// Borrowed view of one node of a [`ConfigTree`].
#[derive(Debug, Clone, Copy)]
pub struct ConfigSection<'a> {
    key: &'a str,
    value: &'a Value,
}

impl<'a> ConfigSection<'a> {
    pub fn key(&self) -> &'a str {
        self.key
    }

    /// A section exists when it carries a value or has children.
    pub fn exists(&self) -> bool {
        match self.value {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            Value::Array(items) => !items.is_empty(),
            _ => true,
        }
    }

    /// Child with the given key, compared case-insensitively.
    pub fn child(&self, key: &str) -> Option<ConfigSection<'a>> {
        let map = self.value.as_object()?;
        map.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(k, v)| ConfigSection { key: k, value: v })
    }

    /// Child matched ignoring ASCII case and `_`/`-` separators, used to bind
    /// settings fields (`XFrameOption` == `x_frame_option`).
    pub fn field(&self, name: &str) -> Option<ConfigSection<'a>> {
        let wanted = field_key(name);
        let map = self.value.as_object()?;
        map.iter()
            .find(|(k, _)| field_key(k) == wanted)
            .map(|(k, v)| ConfigSection { key: k, value: v })
            .filter(ConfigSection::exists)
    }

    pub fn children(&self) -> Vec<ConfigSection<'a>> {
        match self.value {
            Value::Object(map) => map
                .iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| ConfigSection { key: k, value: v })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Scalar leaf rendered as a string.
    pub fn as_string(&self) -> Option<String> {
        scalar_to_string(self.value)
    }

    /// Leaf read as a list of strings.
    pub fn as_string_array(&self) -> Option<Vec<String>> {
        match self.value {
            Value::Array(items) => Some(items.iter().filter_map(scalar_to_string).collect()),
            Value::Object(map) => {
                let mut indexed = map
                    .iter()
                    .map(|(k, v)| k.parse::<usize>().ok().map(|i| (i, v)))
                    .collect::<Option<Vec<_>>>()?;
                indexed.sort_by_key(|(i, _)| *i);
                Some(
                    indexed
                        .into_iter()
                        .filter_map(|(_, v)| scalar_to_string(v))
                        .collect(),
                )
            }
            Value::Null => None,
            scalar => scalar_to_string(scalar).map(|s| vec![s]),
        }
    }
}

fn field_key(key: &str) -> String {
    key.chars()
        .filter(|c| *c != '_' && *c != '-')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn insert_path(node: &mut Value, segments: &[&str], leaf: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = leaf;
        return;
    };

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    let Value::Object(map) = node else {
        return;
    };

    let existing = map
        .keys()
        .find(|k| k.eq_ignore_ascii_case(head))
        .cloned()
        .unwrap_or_else(|| head.to_string());
    let child = map.entry(existing).or_insert(Value::Null);
    insert_path(child, rest, leaf);
}

fn json_file(path: &Path) -> Result<CaseFolded<figment::providers::Data<Json>>, ConfigError> {
    // figment treats a missing file as empty; a configured path must exist.
    if !path.is_file() {
        return Err(ConfigError::Read {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    }
    Ok(CaseFolded(Json::file(path)))
}

fn env_provider(section: &str) -> CaseFolded<Env> {
    let prefix = format!("{}{ENV_SEPARATOR}", section.to_ascii_lowercase());
    CaseFolded(
        Env::raw()
            .filter(move |key| key.as_str().to_ascii_lowercase().starts_with(&prefix))
            .split(ENV_SEPARATOR),
    )
}

/// Lowercases every key of the wrapped provider. figment merges dictionaries
/// by exact key, so every layer is folded for overrides to land on the right
/// entry.
struct CaseFolded<P>(P);

impl<P: Provider> Provider for CaseFolded<P> {
    fn metadata(&self) -> Metadata {
        self.0.metadata()
    }

    fn data(&self) -> Result<ProfileMap<Profile, Dict>, figment::Error> {
        Ok(self
            .0
            .data()?
            .into_iter()
            .map(|(profile, dict)| (profile, fold_dict(dict)))
            .collect())
    }

    fn profile(&self) -> Option<Profile> {
        self.0.profile()
    }
}

fn fold_dict(dict: Dict) -> Dict {
    dict.into_iter()
        .map(|(k, v)| (k.to_ascii_lowercase(), fold_value(v)))
        .collect()
}

fn fold_value(value: FigmentValue) -> FigmentValue {
    match value {
        FigmentValue::Dict(tag, dict) => FigmentValue::Dict(tag, fold_dict(dict)),
        FigmentValue::Array(tag, items) => {
            FigmentValue::Array(tag, items.into_iter().map(fold_value).collect())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn section_lookup_is_case_insensitive() {
        let tree = ConfigTree::new(json!({ "SecurityHeaders": { "XFrameOption": "deny" } }));
        let section = tree.section("securityheaders:xframeoption").unwrap();
        assert_eq!(section.as_string().as_deref(), Some("deny"));
    }

    #[test]
    fn empty_sections_do_not_exist() {
        let tree = ConfigTree::new(json!({ "A": {}, "B": [], "C": null }));
        assert!(tree.section("A").is_none());
        assert!(tree.section("B").is_none());
        assert!(tree.section("C").is_none());
        assert!(tree.section("D").is_none());
    }

    #[test]
    fn flat_pairs_build_indexed_arrays() {
        let tree = ConfigTree::from_pairs([
            ("SecurityHeaders:ClearSiteData:1", "cookies"),
            ("SecurityHeaders:ClearSiteData:0", "cache"),
            ("SecurityHeaders:XFrameOption", "sameorigin"),
        ]);

        let values = tree
            .section("SecurityHeaders:ClearSiteData")
            .and_then(|s| s.as_string_array())
            .unwrap();
        assert_eq!(values, ["cache", "cookies"]);
    }

    #[test]
    fn field_lookup_ignores_separators() {
        let tree = ConfigTree::new(json!({ "x_frame_option": "deny" }));
        let field = tree.root().field("XFrameOption").unwrap();
        assert_eq!(field.as_string().as_deref(), Some("deny"));
    }

    #[test]
    fn scalars_render_as_strings() {
        let tree = ConfigTree::new(json!({ "flag": true, "n": 3, "list": ["a", 1] }));
        assert_eq!(tree.section("flag").unwrap().as_string().as_deref(), Some("true"));
        assert_eq!(tree.section("n").unwrap().as_string().as_deref(), Some("3"));
        assert_eq!(
            tree.section("list").unwrap().as_string_array().unwrap(),
            ["a", "1"]
        );
    }

    #[test]
    fn env_vars_use_double_underscore_separator() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("SecurityHeaders__XFrameOption", "deny");
            jail.set_env("SecurityHeaders__ClearSiteData__0", "cache");
            jail.set_env("OTHER__XFrameOption", "sameorigin");

            let tree = ConfigTree::from_env("SecurityHeaders").unwrap();
            assert!(tree.section("OTHER").is_none());
            assert_eq!(
                tree.section("SecurityHeaders:XFrameOption")
                    .and_then(|s| s.as_string())
                    .as_deref(),
                Some("deny")
            );
            assert_eq!(
                tree.section("SecurityHeaders:ClearSiteData")
                    .and_then(|s| s.as_string_array())
                    .unwrap(),
                ["cache"]
            );
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file_and_keeps_siblings() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "appsettings.json",
                r#"{ "SecurityHeaders": { "XFrameOption": "deny", "ReferrerPolicy": "origin" } }"#,
            )?;
            jail.set_env("SECURITYHEADERS__XFRAMEOPTION", "sameorigin");

            let tree =
                ConfigTree::load(Some(Path::new("appsettings.json")), "SecurityHeaders").unwrap();
            let section = tree.section("SecurityHeaders").unwrap();
            assert_eq!(
                section.child("XFrameOption").unwrap().as_string().as_deref(),
                Some("sameorigin")
            );
            assert_eq!(
                section.child("ReferrerPolicy").unwrap().as_string().as_deref(),
                Some("origin")
            );
            Ok(())
        });
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = ConfigTree::from_json_file("does-not-exist.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        let err = ConfigTree::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
