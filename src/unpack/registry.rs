//! Run-wide accumulators and language tables.
//!
//! Both registries are owned by the run controller and passed by reference
//! through the call chain, so independent runs (different graph snapshots,
//! different locale sets) never share state.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::warn;

use crate::error::{ErrorKind, IResult};

/// Locales the app ships with.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "ja", "zh_sg", "zh_tw"];

/// Display-name sentinel for modifiers no candidate key resolves.
pub const UNKNOWN_MODIFIER_NAME: &str = "UNKNOWN!!!";

/// Master language table for one locale: language key -> display string.
pub type LangTable = BTreeMap<String, String>;

/// The set of language keys referenced by any unpacker during the run.
///
/// Deduplicated and ordered, so the extracted language subsets are
/// reproducible across runs.
#[derive(Debug, Default)]
pub struct LangKeys(BTreeSet<String>);

impl LangKeys {
    pub fn add(&mut self, key: impl Into<String>) {
        self.0.insert(key.into());
    }

    pub fn extend<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(keys.into_iter().map(Into::into));
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Named numeric gameplay-effect values aggregated across all source
/// entities (upgrades, consumables, crew skills, camouflages).
#[derive(Debug, Default)]
pub struct Modifiers(BTreeMap<String, Value>);

impl Modifiers {
    pub fn record(&mut self, key: &str, value: &Value) {
        self.0.insert(key.to_string(), value.clone());
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Build the final modifier table: every recorded `key -> value` plus a
    /// derived `<key>_name` display string.
    ///
    /// Each name is resolved against the English master table through a
    /// fixed candidate chain (`IDS_PARAMS_MODIFIER_<KEY>`, then
    /// `..._DESTROYER`, then `IDS_<KEY>`); when all three miss, the name is
    /// the [`UNKNOWN_MODIFIER_NAME`] sentinel rather than an error.
    pub fn resolve_names(&self, english: &LangTable) -> BTreeMap<String, Value> {
        let mut resolved = self.0.clone();
        for key in self.0.keys() {
            let upper = key.to_uppercase();
            let candidates = [
                format!("IDS_PARAMS_MODIFIER_{upper}"),
                format!("IDS_PARAMS_MODIFIER_{upper}_DESTROYER"),
                format!("IDS_{upper}"),
            ];
            let name = candidates
                .iter()
                .find_map(|candidate| english.get(candidate))
                .cloned()
                .unwrap_or_else(|| UNKNOWN_MODIFIER_NAME.to_string());
            resolved.insert(format!("{key}_name"), Value::String(name));
        }
        resolved
    }
}

/// The per-locale master string tables loaded for the run.
///
/// The English table is mandatory (it drives modifier-name resolution and
/// the prefix scan); the other supported locales are optional.
#[derive(Debug)]
pub struct LangTables {
    english: LangTable,
    others: BTreeMap<String, LangTable>,
}

impl LangTables {
    pub fn new(mut tables: BTreeMap<String, LangTable>) -> IResult<Self> {
        let english = tables
            .remove("en")
            .ok_or_else(|| ErrorKind::MissingLocale("en".to_string()))?;
        Ok(Self {
            english,
            others: tables,
        })
    }

    pub fn english(&self) -> &LangTable {
        &self.english
    }

    pub fn locale(&self, code: &str) -> Option<&LangTable> {
        if code == "en" {
            Some(&self.english)
        } else {
            self.others.get(code)
        }
    }

    /// Iterate all loaded locales in code order ("en" sorts first).
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LangTable)> {
        std::iter::once(("en", &self.english))
            .chain(self.others.iter().map(|(code, table)| (code.as_str(), table)))
    }

    /// Extract the per-locale subset of every referenced key.
    ///
    /// A key missing from one locale's master table is logged and omitted
    /// for that locale only.
    pub fn subset(&self, keys: &LangKeys) -> BTreeMap<String, LangTable> {
        let mut subsets = BTreeMap::new();
        for (code, table) in self.iter() {
            let mut subset = LangTable::new();
            for key in keys.iter() {
                match table.get(key) {
                    Some(value) => {
                        subset.insert(key.to_string(), value.clone());
                    }
                    None => warn!(locale = code, key, "missing language key"),
                }
            }
            subsets.insert(code.to_string(), subset);
        }
        subsets
    }
}
