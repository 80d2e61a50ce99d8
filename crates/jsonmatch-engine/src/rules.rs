//! Ignore and business-key rules.
//!
//! Both rule sets are trees shaped like the compared objects: each entry maps
//! an attribute name to either `true` (a leaf: apply at this attribute and
//! everything below it) or another mapping (descend further). Arrays do not
//! add a level; their elements share the node of the array attribute.
//!
//! Rules are validated once, before any comparison runs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use jsonmatch_types::json_pointer;

use crate::error::{EngineResult, MatchError};

static EMPTY: ConfigNode = ConfigNode::Branch(BTreeMap::new());
static LEAF: ConfigNode = ConfigNode::Leaf;

/// One node of a validated rule tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum ConfigNode {
    /// Applies here and below.
    Leaf,
    /// Applies to the listed attributes only.
    Branch(BTreeMap<String, ConfigNode>),
}

impl Default for ConfigNode {
    fn default() -> Self {
        Self::empty()
    }
}

impl ConfigNode {
    /// A tree that marks nothing.
    pub fn empty() -> Self {
        Self::Branch(BTreeMap::new())
    }

    pub fn leaf() -> Self {
        Self::Leaf
    }

    /// Build a branch from `(attribute, node)` pairs.
    pub fn branch<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, ConfigNode)>,
        S: Into<String>,
    {
        Self::Branch(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Validate a raw rule tree.
    ///
    /// The root must be a mapping (`null` stands for the empty tree). Every
    /// value below it must be `true` or a mapping.
    pub fn parse(raw: &serde_json::Value) -> EngineResult<Self> {
        match raw {
            serde_json::Value::Null => Ok(Self::empty()),
            serde_json::Value::Object(map) => parse_branch(map, &mut Vec::new()),
            other => Err(MatchError::invalid_rule(
                "/",
                format!("rule tree must be a mapping, found {}", json_kind(other)),
            )),
        }
    }

    /// Returns `true` if the tree marks nothing.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Branch(entries) if entries.is_empty())
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf)
    }

    /// Whether the rule has an entry for `attr`. A leaf covers everything.
    pub fn has(&self, attr: &str) -> bool {
        match self {
            Self::Leaf => true,
            Self::Branch(entries) => entries.contains_key(attr),
        }
    }

    /// Whether the rule applies to the whole subtree under `attr`.
    pub fn is_leaf_at(&self, attr: &str) -> bool {
        match self {
            Self::Leaf => true,
            Self::Branch(entries) => entries.get(attr).is_some_and(ConfigNode::is_leaf),
        }
    }

    /// Whether the rule covers `attr` as a whole rather than naming
    /// attributes below it.
    pub fn covers(&self, attr: &str) -> bool {
        self.has(attr) && self.child(attr).is_terminal()
    }

    /// The rule narrowed to `attr`; the empty tree if it has no entry.
    pub fn child(&self, attr: &str) -> &ConfigNode {
        match self {
            Self::Leaf => &LEAF,
            Self::Branch(entries) => entries.get(attr).unwrap_or(&EMPTY),
        }
    }

    /// Attribute names listed at this level. A leaf lists none.
    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        let entries = match self {
            Self::Leaf => None,
            Self::Branch(entries) => Some(entries),
        };
        entries.into_iter().flat_map(|e| e.keys().map(String::as_str))
    }

    /// Leaf or empty branch: marks its attribute without naming children.
    fn is_terminal(&self) -> bool {
        self.is_leaf() || self.is_empty()
    }
}

fn parse_branch<'a>(
    map: &'a serde_json::Map<String, serde_json::Value>,
    path: &mut Vec<&'a str>,
) -> EngineResult<ConfigNode> {
    let mut entries = BTreeMap::new();
    for (attr, raw) in map {
        path.push(attr);
        let node = match raw {
            serde_json::Value::Bool(true) => ConfigNode::Leaf,
            serde_json::Value::Object(inner) => parse_branch(inner, path)?,
            other => {
                return Err(MatchError::invalid_rule(
                    json_pointer(path.iter()),
                    format!(
                        "expected `true` or a nested mapping, found {}",
                        json_kind(other)
                    ),
                ))
            }
        };
        path.pop();
        entries.insert(attr.clone(), node);
    }
    Ok(ConfigNode::Branch(entries))
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean `false`",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "a mapping",
    }
}

impl TryFrom<serde_json::Value> for ConfigNode {
    type Error = MatchError;

    fn try_from(raw: serde_json::Value) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}

impl From<ConfigNode> for serde_json::Value {
    fn from(node: ConfigNode) -> Self {
        match node {
            ConfigNode::Leaf => serde_json::Value::Bool(true),
            ConfigNode::Branch(entries) => serde_json::Value::Object(
                entries.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

/// A validated pair of ignore and business-key trees.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchRules {
    ignored: ConfigNode,
    business_key: ConfigNode,
}

impl MatchRules {
    /// Pair two rule trees, rejecting attributes claimed by both.
    pub fn new(ignored: ConfigNode, business_key: ConfigNode) -> EngineResult<Self> {
        check_disjoint(&ignored, &business_key, &mut Vec::new())?;
        Ok(Self {
            ignored,
            business_key,
        })
    }

    /// No ignores, no business key.
    pub fn none() -> Self {
        Self::default()
    }

    /// Parse and validate raw trees; a missing tree is empty.
    pub fn from_json(
        ignored: Option<&serde_json::Value>,
        business_key: Option<&serde_json::Value>,
    ) -> EngineResult<Self> {
        let ignored = ignored.map(ConfigNode::parse).transpose()?.unwrap_or_default();
        let business_key = business_key
            .map(ConfigNode::parse)
            .transpose()?
            .unwrap_or_default();
        Self::new(ignored, business_key)
    }

    pub fn ignored(&self) -> &ConfigNode {
        &self.ignored
    }

    pub fn business_key(&self) -> &ConfigNode {
        &self.business_key
    }
}

fn check_disjoint<'a>(
    ignored: &'a ConfigNode,
    business_key: &'a ConfigNode,
    path: &mut Vec<&'a str>,
) -> EngineResult<()> {
    match (ignored, business_key) {
        (ConfigNode::Branch(ign), ConfigNode::Branch(key)) => {
            for (attr, ign_child) in ign {
                let Some(key_child) = key.get(attr) else {
                    continue;
                };
                path.push(attr);
                if ign_child.is_terminal() && key_child.is_terminal() {
                    return Err(MatchError::ConflictingRule {
                        path: json_pointer(path.iter()),
                    });
                }
                check_disjoint(ign_child, key_child, path)?;
                path.pop();
            }
            Ok(())
        }
        (ConfigNode::Leaf, ConfigNode::Leaf) => Err(MatchError::ConflictingRule {
            path: json_pointer(path.iter()),
        }),
        // A whole-subtree rule on one side and named attributes on the other.
        _ => Ok(()),
    }
}
