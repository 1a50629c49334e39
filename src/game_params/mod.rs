//! Read-only access to the raw `GameParams` object graph.
//!
//! The graph is one huge JSON object keyed by opaque entity names
//! (`PJSB018_Mikasa_1902`, ...). [`RawGraph`] indexes it and is passed
//! explicitly to every unpacker that needs cross-entity lookups;
//! [`NodeRef`] is the typed field accessor used in place of ad-hoc value
//! inspection, so schema drift surfaces as an error naming the node and
//! field instead of silently wrong output.

pub mod keys;
pub mod types;

use serde_json::{Map, Value};

use crate::error::{Error, ErrorKind, IResult, failure_from_kind};
use types::GameParamId;

/// The raw graph. Immutable for the duration of a run; owned by the caller.
#[derive(Debug)]
pub struct RawGraph {
    root: Map<String, Value>,
}

impl RawGraph {
    pub fn from_value(root: Value) -> IResult<Self> {
        match root {
            Value::Object(root) => Ok(Self { root }),
            _ => Err(failure_from_kind(ErrorKind::InvalidGameParamsData)),
        }
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.root.contains_key(key)
    }

    /// Look up a node by its entity key. Non-object entries resolve to `None`.
    pub fn get(&self, key: &str) -> Option<NodeRef<'_>> {
        let (name, value) = self.root.get_key_value(key)?;
        let fields = value.as_object()?;
        Some(NodeRef {
            name: name.as_str(),
            fields,
        })
    }

    /// Iterate every object-valued top-level node, in key order.
    pub fn iter(&self) -> impl Iterator<Item = NodeRef<'_>> {
        self.root.iter().filter_map(|(name, value)| {
            value.as_object().map(|fields| NodeRef {
                name: name.as_str(),
                fields,
            })
        })
    }

    /// Resolve a raw entity key to its numeric ID.
    ///
    /// Returns `None` for keys no longer present in the graph, which is how
    /// stale succession/exclusion references get dropped.
    pub fn id_of(&self, key: &str) -> Option<GameParamId> {
        self.get(key)?.get(keys::PARAM_ID)?.as_u64()
    }
}

/// Borrowed view over one raw node (or nested dict) with typed field access.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    name: &'a str,
    fields: &'a Map<String, Value>,
}

impl<'a> NodeRef<'a> {
    pub fn new(name: &'a str, fields: &'a Map<String, Value>) -> Self {
        Self { name, fields }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn fields(&self) -> &'a Map<String, Value> {
        self.fields
    }

    pub fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields.get(field)
    }

    fn missing(&self, field: &str) -> Error {
        failure_from_kind(ErrorKind::MissingField {
            node: self.name.to_string(),
            field: field.to_string(),
        })
    }

    fn mistyped(&self, field: &str, expected: &'static str) -> Error {
        failure_from_kind(ErrorKind::UnexpectedFieldType {
            node: self.name.to_string(),
            field: field.to_string(),
            expected,
        })
    }

    pub fn f64(&self, field: &str) -> IResult<f64> {
        self.get(field)
            .ok_or_else(|| self.missing(field))?
            .as_f64()
            .ok_or_else(|| self.mistyped(field, "number"))
    }

    pub fn i64(&self, field: &str) -> IResult<i64> {
        self.get(field)
            .ok_or_else(|| self.missing(field))?
            .as_i64()
            .ok_or_else(|| self.mistyped(field, "integer"))
    }

    pub fn u64(&self, field: &str) -> IResult<u64> {
        self.get(field)
            .ok_or_else(|| self.missing(field))?
            .as_u64()
            .ok_or_else(|| self.mistyped(field, "unsigned integer"))
    }

    pub fn bool(&self, field: &str) -> IResult<bool> {
        self.get(field)
            .ok_or_else(|| self.missing(field))?
            .as_bool()
            .ok_or_else(|| self.mistyped(field, "bool"))
    }

    pub fn str(&self, field: &str) -> IResult<&'a str> {
        self.get(field)
            .ok_or_else(|| self.missing(field))?
            .as_str()
            .ok_or_else(|| self.mistyped(field, "string"))
    }

    pub fn list(&self, field: &str) -> IResult<&'a Vec<Value>> {
        self.get(field)
            .ok_or_else(|| self.missing(field))?
            .as_array()
            .ok_or_else(|| self.mistyped(field, "list"))
    }

    /// A list whose entries are all strings (ammo lists, tag lists, ...).
    pub fn str_list(&self, field: &str) -> IResult<Vec<String>> {
        self.list(field)?
            .iter()
            .map(|v| {
                v.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| self.mistyped(field, "list of strings"))
            })
            .collect()
    }

    /// A field that must be present, with no constraint on its shape.
    pub fn require(&self, field: &str) -> IResult<&'a Value> {
        self.get(field).ok_or_else(|| self.missing(field))
    }

    pub fn dict(&self, field: &str) -> IResult<NodeRef<'a>> {
        let (name, value) = self
            .fields
            .get_key_value(field)
            .ok_or_else(|| self.missing(field))?;
        let fields = value
            .as_object()
            .ok_or_else(|| self.mistyped(field, "dict"))?;
        Ok(NodeRef {
            name: name.as_str(),
            fields,
        })
    }

    /// A nested dict that may legitimately be absent (or a scalar).
    pub fn opt_dict(&self, field: &str) -> Option<NodeRef<'a>> {
        let (name, value) = self.fields.get_key_value(field)?;
        let fields = value.as_object()?;
        Some(NodeRef {
            name: name.as_str(),
            fields,
        })
    }

    /// Iterate all fields, in key order.
    pub fn entries(&self) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate only the object-valued fields (structural sub-nodes), in key
    /// order. Scalar metadata fields are skipped.
    pub fn dict_entries(&self) -> impl Iterator<Item = NodeRef<'a>> {
        self.fields.iter().filter_map(|(name, value)| {
            value.as_object().map(|fields| NodeRef {
                name: name.as_str(),
                fields,
            })
        })
    }

    pub fn typeinfo(&self) -> IResult<Typeinfo<'a>> {
        let typeinfo = self.dict(keys::TYPEINFO)?;
        Ok(Typeinfo {
            category: typeinfo.str(keys::TYPEINFO_TYPE)?,
            nation: typeinfo.str(keys::TYPEINFO_NATION)?,
            species: typeinfo.str(keys::TYPEINFO_SPECIES)?,
        })
    }

    /// Clone this node back into an owned value, for raw passthrough fields.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// The `typeinfo` descriptor carried by every raw node.
#[derive(Clone, Copy, Debug)]
pub struct Typeinfo<'a> {
    pub category: &'a str,
    pub nation: &'a str,
    pub species: &'a str,
}
