//! Small pure helpers shared by the unpackers.

use serde::Serialize;

use crate::error::IResult;
use crate::game_params::NodeRef;

/// Display rounding used across records, one decimal place.
pub fn round1(v: f64) -> f64 {
    round_to(v, 1)
}

pub fn round_to(v: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (v * factor).round() / factor
}

/// Format a language key from a raw identifier: `IDS_` + uppercased.
pub fn ids(key: &str) -> String {
    format!("IDS_{}", key.to_uppercase())
}

/// True when `text` starts with any of the given prefixes.
pub fn has_prefix(text: &str, prefixes: &[&str]) -> bool {
    prefixes.iter().any(|p| text.starts_with(p))
}

/// A record plus the number of identical physical instances it stands for.
///
/// Multiple gun mounts, torpedo launchers or aura guns with identical
/// derived attributes are collapsed into one `Counted` record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Counted<T> {
    #[serde(flatten)]
    pub inner: T,
    pub count: u32,
}

/// Merge equal instances into one record carrying a count.
///
/// The sum of counts over the result always equals `items.len()`.
pub fn merge_counted<T: PartialEq>(items: Vec<T>) -> Vec<Counted<T>> {
    let mut merged: Vec<Counted<T>> = Vec::new();
    for item in items {
        match merged.iter_mut().find(|m| m.inner == item) {
            Some(existing) => existing.count += 1,
            None => merged.push(Counted {
                inner: item,
                count: 1,
            }),
        }
    }
    merged
}

/// One consumable slot entry: the ability param name and its variant.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Consumable {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Unpack an abilities-slot mapping (`ShipAbilities` / `PlaneAbilities`)
/// into ordered `{name, type}` lists. Empty slots produce no entry.
pub fn unpack_consumables(slots: NodeRef<'_>) -> IResult<Vec<Vec<Consumable>>> {
    let mut consumables = Vec::new();
    for slot in slots.dict_entries() {
        let abilities = slot.list("abils")?;
        if abilities.is_empty() {
            continue;
        }

        let mut entries = Vec::with_capacity(abilities.len());
        for pair in abilities {
            let pair = pair
                .as_array()
                .filter(|p| p.len() == 2)
                .and_then(|p| Some((p[0].as_str()?, p[1].as_str()?)));
            let Some((name, kind)) = pair else {
                return Err(crate::error::ErrorKind::UnexpectedFieldType {
                    node: slot.name().to_string(),
                    field: "abils".to_string(),
                    expected: "list of [name, type] pairs",
                }
                .into());
            };
            entries.push(Consumable {
                name: name.to_string(),
                kind: kind.to_string(),
            });
        }
        consumables.push(entries);
    }
    Ok(consumables)
}
