//! Unpacks abilities (consumables): smoke generators, sonar, radar, speed
//! boosts and friends. Every non-empty value of every sub-ability dict is
//! also recorded into the run's modifier table.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{ErrorKind, IResult};
use crate::game_params::NodeRef;
use crate::game_params::keys;
use crate::game_params::types::GameParamId;
use crate::unpack::helpers::ids;
use crate::unpack::registry::{LangKeys, Modifiers};

/// Alternate display name/description pair, keyed by an icon-id override.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AlterNames {
    pub name: String,
    pub description: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AbilityRecord {
    pub nation: String,
    #[serde(rename = "costCR", skip_serializing_if = "Option::is_none")]
    pub cost_cr: Option<i64>,
    #[serde(rename = "costGold", skip_serializing_if = "Option::is_none")]
    pub cost_gold: Option<i64>,
    pub name: String,
    pub id: GameParamId,
    pub description: String,
    pub icon: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub alter: BTreeMap<String, AlterNames>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub abilities: BTreeMap<String, Map<String, Value>>,
}

/// Sub-ability keys carrying no gameplay information for the app.
fn is_filtered_key(key: &str) -> bool {
    matches!(
        key,
        "SpecialSoundID" | "group" | "preparationTime" | "descIDs" | "titleIDs"
    ) || key.contains("Effect")
}

pub fn unpack_ability(
    ability: NodeRef<'_>,
    lang_keys: &mut LangKeys,
    modifiers: &mut Modifiers,
) -> IResult<AbilityRecord> {
    let typeinfo = ability.typeinfo()?;
    let param_key = ability.name();

    let upper = param_key.to_uppercase();
    let name = format!("IDS_DOCK_CONSUME_TITLE_{upper}");
    let description = format!("IDS_DOCK_CONSUME_DESCRIPTION_{upper}");
    lang_keys.add(name.clone());
    lang_keys.add(description.clone());

    let mut record = AbilityRecord {
        nation: typeinfo.nation.to_string(),
        cost_cr: Some(ability.i64(keys::COST_CR)?).filter(|cost| *cost > 0),
        cost_gold: Some(ability.i64(keys::COST_GOLD)?).filter(|cost| *cost > 0),
        name,
        id: ability.u64(keys::PARAM_ID)?,
        description,
        icon: param_key.to_string(),
        alter: BTreeMap::new(),
        filter: None,
        kind: None,
        abilities: BTreeMap::new(),
    };

    for variant in ability.dict_entries() {
        if variant.name() == keys::TYPEINFO {
            continue;
        }

        let mut current = Map::new();
        for (key, value) in variant.entries() {
            if value.is_null() || value.as_str().is_some_and(str::is_empty) {
                continue;
            }
            if is_filtered_key(key) {
                continue;
            }

            if key == "iconIDs" {
                let icon = value.as_str().ok_or_else(|| ErrorKind::UnexpectedFieldType {
                    node: variant.name().to_string(),
                    field: "iconIDs".to_string(),
                    expected: "string",
                })?;
                let icon_upper = icon.to_uppercase();
                let icon_name = format!("IDS_DOCK_CONSUME_TITLE_{icon_upper}");
                let icon_description = format!("IDS_DOCK_CONSUME_DESCRIPTION_{icon_upper}");
                lang_keys.add(icon_name.clone());
                lang_keys.add(icon_description.clone());
                record.alter.insert(
                    icon.to_string(),
                    AlterNames {
                        name: icon_name,
                        description: icon_description,
                    },
                );
            }

            modifiers.record(key, value);

            if key == "consumableType" {
                // The variant set shares one consumable type; write it once.
                if record.kind.is_none() {
                    let kind_upper = value.as_str().map(str::to_uppercase).ok_or_else(|| {
                        ErrorKind::UnexpectedFieldType {
                            node: variant.name().to_string(),
                            field: "consumableType".to_string(),
                            expected: "string",
                        }
                    })?;
                    let kind = format!("IDS_BATTLEHINT_TYPE_CONSUMABLE_{kind_upper}");
                    lang_keys.add(kind.clone());
                    record.filter = Some(kind_upper);
                    record.kind = Some(kind);
                }
                continue;
            }

            if key == "fightersName" {
                let fighters = value.as_str().ok_or_else(|| ErrorKind::UnexpectedFieldType {
                    node: variant.name().to_string(),
                    field: "fightersName".to_string(),
                    expected: "string",
                })?;
                current.insert(key.to_string(), Value::String(ids(fighters)));
                continue;
            }

            // The main battery reload booster family mislabels its reload
            // coefficient as `boostCoeff`.
            let key = if param_key.contains("_ArtilleryBooster") && key == "boostCoeff" {
                "gmShotDelay"
            } else {
                key
            };
            current.insert(key.to_string(), value.clone());
        }

        if !current.is_empty() {
            record.abilities.insert(variant.name().to_string(), current);
        }
    }

    Ok(record)
}
