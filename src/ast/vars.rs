//! Declared variables: an insertion-ordered name → value mapping.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_yaml::Value;

use super::error::DecodeError;
use super::node::{as_mapping, scalar_text, text_field, untag};
use super::path::NodePath;
use crate::deepcopy::{self, DeepCopy};

/// A single declared variable.
///
/// Static variables carry `value`. Dynamic ones carry `sh` (a command whose
/// output becomes the value once the engine resolves it into `live`) or
/// `reference` (a template reference resolved by the engine).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Var {
    /// Static value as written in the configuration.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Value resolved at runtime; overrides `value` when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<Value>,
    /// Shell command producing the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sh: Option<String>,
    /// Reference to another variable.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    /// Directory the `sh` command runs in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

impl Var {
    /// A static variable holding `value`.
    #[must_use]
    pub fn from_value(value: impl Into<Value>) -> Self {
        Self { value: Some(value.into()), ..Self::default() }
    }

    /// A dynamic variable whose value comes from running `sh`.
    #[must_use]
    pub fn from_sh(sh: impl Into<String>) -> Self {
        Self { sh: Some(sh.into()), ..Self::default() }
    }

    /// Returns `true` for an `sh` variable the engine has not resolved yet.
    #[must_use]
    pub fn is_unresolved(&self) -> bool {
        self.live.is_none() && self.sh.as_deref().is_some_and(|sh| !sh.is_empty())
    }

    /// Decodes one variable node.
    ///
    /// A mapping must be keyed by `sh`, `ref` or `map`; any other node is a
    /// static value.
    ///
    /// # Errors
    ///
    /// Returns a decode error for a mapping with an unknown variable kind.
    pub fn decode(node: &Value, path: &NodePath) -> Result<Self, DecodeError> {
        let Some(map) = as_mapping(node) else {
            return Ok(Self { value: Some(untag(node).clone()), ..Self::default() });
        };

        let first_key = map.keys().next().and_then(scalar_text).unwrap_or_default();
        match first_key.as_str() {
            "sh" | "ref" | "map" => {
                let sh = text_field(map, "sh", path)?;
                let reference = text_field(map, "ref", path)?;
                let dir = text_field(map, "dir", path)?;
                let value = map.get("map").map(|v| untag(v).clone());
                Ok(Self { value, live: None, sh, reference, dir })
            }
            other => Err(DecodeError::new(path).with_message(format!(
                "\"{other}\" is not a valid variable type. Try \"sh\", \"ref\", \"map\" or using a scalar value"
            ))),
        }
    }
}

/// Insertion-ordered collection of declared variables.
///
/// Setting a name that already exists replaces its value and keeps its
/// original position, so names are unique by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Vars {
    entries: IndexMap<String, Var>,
}

impl Vars {
    /// An empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, replacing any previous definition in place.
    pub fn set(&mut self, name: impl Into<String>, var: Var) {
        self.entries.insert(name.into(), var);
    }

    /// Looks up a variable by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Var> {
        self.entries.get(name)
    }

    /// Number of variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no variables are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates variables in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Var)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sets every variable of `other` on top of `self`, in `other`'s order.
    pub fn merge(&mut self, other: &Vars) {
        for (name, var) in other.iter() {
            self.set(name, var.clone());
        }
    }

    /// Flattens the collection into plain values, ready for templating or
    /// environment composition.
    ///
    /// Unresolved `sh` variables are left out. A resolved `live` value wins
    /// over the static one; a variable with neither yields `Null`.
    #[must_use]
    pub fn to_cache_map(&self) -> IndexMap<String, Value> {
        self.entries
            .iter()
            .filter(|(_, var)| !var.is_unresolved())
            .map(|(name, var)| {
                let value = var.live.as_ref().or(var.value.as_ref()).cloned().unwrap_or(Value::Null);
                (name.clone(), value)
            })
            .collect()
    }

    /// Decodes a `vars:` or `env:` mapping. Null decodes as empty.
    ///
    /// # Errors
    ///
    /// Returns a decode error when the node is not a mapping or one of its
    /// variables fails to decode.
    pub fn decode(node: &Value, path: &NodePath) -> Result<Self, DecodeError> {
        if untag(node).is_null() {
            return Ok(Self::new());
        }
        let Some(map) = as_mapping(node) else {
            return Err(DecodeError::new(path).with_type_message("vars", node));
        };

        let mut vars = Self::new();
        for (key, value) in map {
            let Some(name) = scalar_text(key) else {
                return Err(DecodeError::new(path).with_type_message("variable name", key));
            };
            let var = Var::decode(value, &path.key(&name))?;
            vars.set(name, var);
        }
        Ok(vars)
    }
}

impl DeepCopy for Vars {
    fn deep_copy(&self) -> Self {
        Self { entries: deepcopy::map(&self.entries) }
    }
}

impl<'de> Deserialize<'de> for Vars {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let node = Value::deserialize(deserializer)?;
        Self::decode(&node, &NodePath::root()).map_err(serde::de::Error::custom)
    }
}

impl<K: Into<String>> FromIterator<(K, Var)> for Vars {
    fn from_iter<I: IntoIterator<Item = (K, Var)>>(iter: I) -> Self {
        let mut vars = Self::new();
        for (name, var) in iter {
            vars.set(name, var);
        }
        vars
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(yaml: &str) -> Result<Vars, DecodeError> {
        let node: Value = serde_yaml::from_str(yaml).unwrap();
        Vars::decode(&node, &NodePath::root().key("vars"))
    }

    #[test]
    fn keeps_declaration_order() {
        let vars = decode("{ZED: 1, ALPHA: two, MID: true}").unwrap();
        let names: Vec<&str> = vars.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["ZED", "ALPHA", "MID"]);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut vars: Vars =
            [("A", Var::from_value("1")), ("B", Var::from_value("2"))].into_iter().collect();
        vars.set("A", Var::from_value("3"));

        let map = vars.to_cache_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get_index(0), Some((&"A".to_string(), &Value::from("3"))));
    }

    #[test]
    fn decodes_dynamic_variables() {
        let vars = decode("{REV: {sh: git rev-parse HEAD}, OTHER: {ref: .REV}, M: {map: {k: v}}}")
            .unwrap();

        assert_eq!(vars.get("REV").unwrap().sh.as_deref(), Some("git rev-parse HEAD"));
        assert_eq!(vars.get("OTHER").unwrap().reference.as_deref(), Some(".REV"));
        assert!(vars.get("M").unwrap().value.as_ref().is_some_and(Value::is_mapping));
    }

    #[test]
    fn rejects_unknown_variable_kind() {
        let err = decode("{X: {shell: ls}}").unwrap_err();
        assert_eq!(err.path.to_string(), "vars.X");
        assert!(err.message.contains("\"shell\" is not a valid variable type"));
    }

    #[test]
    fn rejects_non_mapping() {
        let err = decode("[a, b]").unwrap_err();
        assert_eq!(err.message, "cannot unmarshal !!seq into vars");
    }

    #[test]
    fn null_decodes_as_empty() {
        assert!(decode("~").unwrap().is_empty());
    }

    #[test]
    fn cache_map_skips_unresolved_sh_and_prefers_live() {
        let mut vars = Vars::new();
        vars.set("STATIC", Var::from_value(1));
        vars.set("PENDING", Var::from_sh("date"));
        let mut resolved = Var::from_sh("whoami");
        resolved.live = Some(Value::from("root"));
        vars.set("RESOLVED", resolved);
        vars.set("REF", Var { reference: Some(".X".into()), ..Var::default() });

        let map = vars.to_cache_map();
        let names: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(names, ["STATIC", "RESOLVED", "REF"]);
        assert_eq!(map["RESOLVED"], Value::from("root"));
        assert_eq!(map["REF"], Value::Null);
    }

    #[test]
    fn merge_overrides_and_appends() {
        let mut base: Vars =
            [("A", Var::from_value("1")), ("B", Var::from_value("2"))].into_iter().collect();
        let top: Vars =
            [("B", Var::from_value("20")), ("C", Var::from_value("3"))].into_iter().collect();
        base.merge(&top);

        let map = base.to_cache_map();
        let pairs: Vec<(&str, &Value)> = map.iter().map(|(k, v)| (k.as_str(), v)).collect();
        assert_eq!(
            pairs,
            [("A", &Value::from("1")), ("B", &Value::from("20")), ("C", &Value::from("3"))]
        );
    }

    #[test]
    fn deserializes_through_serde() {
        let vars: Vars = serde_yaml::from_str("{GREETING: hello}").unwrap();
        assert_eq!(vars.get("GREETING").unwrap().value, Some(Value::from("hello")));
    }
}
