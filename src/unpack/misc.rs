//! The smaller category unpackers: achievements, exteriors (flags and
//! camouflages), modernizations (upgrades), the Japanese ship alias table
//! and crew skill collection.

use std::collections::BTreeMap;

use convert_case::{Case, Casing};
use serde::Serialize;
use serde_json::Value;
use tracing::warn;

use crate::error::{ErrorKind, IResult};
use crate::game_params::keys;
use crate::game_params::types::{GameParamId, Species};
use crate::game_params::{NodeRef, RawGraph};
use crate::unpack::helpers::ids;
use crate::unpack::registry::{LangKeys, LangTable, Modifiers};

/// The crew every non-unique commander shares; its skill table becomes the
/// `skills` artifact.
pub const DEFAULT_CREW: &str = "PAW001_DefaultCrew";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AchievementRecord {
    pub icon: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub battle_types: Value,
    pub id: GameParamId,
    pub constants: Value,
}

pub fn unpack_achievement(
    achievement: NodeRef<'_>,
    lang_keys: &mut LangKeys,
) -> IResult<AchievementRecord> {
    let ui_name = achievement.str("uiName")?.to_uppercase();
    let name = format!("IDS_ACHIEVEMENT_{ui_name}");
    let description = format!("IDS_ACHIEVEMENT_DESCRIPTION_{ui_name}");
    lang_keys.add(name.clone());
    lang_keys.add(description.clone());

    Ok(AchievementRecord {
        icon: ui_name,
        name,
        description,
        battle_types: achievement.require("battleTypes")?.clone(),
        id: achievement.u64(keys::PARAM_ID)?,
        constants: achievement.require("constants")?.clone(),
    })
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExteriorRecord {
    #[serde(rename = "type")]
    pub species: String,
    pub id: GameParamId,
    pub name: String,
    pub icon: String,
    #[serde(rename = "costCR", skip_serializing_if = "Option::is_none")]
    pub cost_cr: Option<i64>,
    #[serde(rename = "costGold", skip_serializing_if = "Option::is_none")]
    pub cost_gold: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifiers: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Unpack a flag, camouflage or permanent camouflage. Ensigns are never
/// shipped to the app and unpack to `None`.
pub fn unpack_exterior(
    exterior: NodeRef<'_>,
    lang_keys: &mut LangKeys,
    modifiers: &mut Modifiers,
) -> IResult<Option<ExteriorRecord>> {
    let typeinfo = exterior.typeinfo()?;
    let species = Species::from_name(typeinfo.species);
    if species.known().is_some_and(|s| s.is_ensign()) {
        return Ok(None);
    }

    let name = ids(exterior.name());
    lang_keys.add(name.clone());

    // Camouflages lost their modifiers in the 0.11.6 update; the field is
    // optional here.
    let exterior_modifiers = exterior
        .opt_dict("modifiers")
        .filter(|dict| !dict.fields().is_empty());
    if let Some(dict) = exterior_modifiers {
        for (key, value) in dict.entries() {
            modifiers.record(key, value);
        }
    }

    let description = species
        .known()
        .is_some_and(|s| s.is_flags())
        .then(|| format!("{name}_DESCRIPTION"));
    if let Some(description) = &description {
        lang_keys.add(description.clone());
    }

    Ok(Some(ExteriorRecord {
        species: typeinfo.species.to_string(),
        id: exterior.u64(keys::PARAM_ID)?,
        name,
        icon: exterior.name().to_string(),
        cost_cr: Some(exterior.i64(keys::COST_CR)?).filter(|cost| *cost >= 0),
        cost_gold: Some(exterior.i64(keys::COST_GOLD)?).filter(|cost| *cost >= 0),
        modifiers: exterior_modifiers.map(|dict| dict.to_value()),
        description,
    }))
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModernizationRecord {
    pub slot: i64,
    pub id: GameParamId,
    pub name: String,
    pub icon: String,
    pub description: String,
    #[serde(rename = "costCR")]
    pub cost_cr: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub special: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<Value>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub ship_types: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nation: Option<Value>,
    pub modifiers: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ships: Vec<GameParamId>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excludes: Vec<GameParamId>,
}

/// Unpack a ship upgrade. Slots below zero are internal-only and unpack to
/// `None`. Ship restriction lists are resolved to numeric IDs, with stale
/// keys dropped.
pub fn unpack_modernization(
    modernization: NodeRef<'_>,
    graph: &RawGraph,
    lang_keys: &mut LangKeys,
    modifiers: &mut Modifiers,
) -> IResult<Option<(String, ModernizationRecord)>> {
    let slot = modernization.i64("slot")?;
    if slot < 0 {
        return Ok(None);
    }

    let param_name = modernization.str(keys::PARAM_NAME)?;
    let upper = param_name.to_uppercase();
    let name = format!("IDS_TITLE_{upper}");
    let description = format!("IDS_DESC_{upper}");
    lang_keys.add(name.clone());
    lang_keys.add(description.clone());

    let tags = modernization.str_list("tags")?;
    let unique = tags.first().is_some_and(|tag| tag == "unique");
    let special = tags.first().is_some_and(|tag| tag == "special");

    let upgrade_modifiers = modernization.dict("modifiers")?;
    for (key, value) in upgrade_modifiers.entries() {
        modifiers.record(key, value);
    }

    let resolve_ids = |field: &str| -> IResult<Vec<GameParamId>> {
        Ok(modernization
            .str_list(field)?
            .iter()
            .filter_map(|key| graph.id_of(key))
            .collect())
    };

    let non_empty_list = |field: &'static str| -> IResult<Option<Value>> {
        let list = modernization.list(field)?;
        Ok((!list.is_empty()).then(|| Value::Array(list.clone())))
    };

    let record = ModernizationRecord {
        slot,
        id: modernization.u64(keys::PARAM_ID)?,
        name,
        icon: param_name.to_string(),
        description,
        cost_cr: modernization.i64(keys::COST_CR)?,
        unique: unique.then_some(true),
        special: special.then_some(true),
        level: non_empty_list("shiplevel")?,
        ship_types: non_empty_list("shiptype")?,
        nation: non_empty_list("nation")?,
        modifiers: upgrade_modifiers.to_value(),
        ships: resolve_ids("ships")?,
        excludes: resolve_ids("excludes")?,
    };
    Ok(Some((param_name.to_string(), record)))
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AliasRecord {
    pub alias: String,
}

/// Resolve a Japanese ship's display alias from the `zh_sg` master table.
pub fn unpack_alias(ship: NodeRef<'_>, table: &LangTable) -> IResult<Option<AliasRecord>> {
    let index = ship.str(keys::PARAM_INDEX)?;
    let key = ids(index);
    match table.get(&key) {
        Some(alias) => Ok(Some(AliasRecord {
            alias: alias.clone(),
        })),
        None => {
            warn!(ship = ship.name(), key, "missing alias key");
            Ok(None)
        }
    }
}

/// Capture a crew into the commander-skills table when it is the shared
/// default or a unique commander, and collect every skill's modifiers.
pub fn collect_crew(
    crew: NodeRef<'_>,
    commander_skills: &mut BTreeMap<String, Value>,
    modifiers: &mut Modifiers,
) -> IResult<()> {
    if crew.name() == DEFAULT_CREW {
        commander_skills.insert(crew.name().to_string(), crew.to_value());
        return Ok(());
    }

    if crew.dict("CrewPersonality")?.bool("isUnique")? {
        commander_skills.insert(crew.name().to_string(), crew.to_value());
    }

    for skill in crew.dict("Skills")?.dict_entries() {
        let skill_modifiers = skill.dict("modifiers")?;
        for (key, value) in skill_modifiers.entries() {
            modifiers.record(key, value);
        }
    }
    Ok(())
}

/// Build the `skills` artifact from the default crew's skill table, deriving
/// each skill's language keys from its UpperCamelCase internal name.
pub fn build_skills(default_crew: &Value) -> IResult<BTreeMap<String, Value>> {
    let skills = default_crew
        .get("Skills")
        .and_then(Value::as_object)
        .ok_or_else(|| ErrorKind::MissingField {
            node: DEFAULT_CREW.to_string(),
            field: "Skills".to_string(),
        })?;

    let mut table = BTreeMap::new();
    for (skill_key, skill) in skills {
        let mut skill = skill.clone();
        let Some(fields) = skill.as_object_mut() else {
            return Err(ErrorKind::UnexpectedFieldType {
                node: DEFAULT_CREW.to_string(),
                field: skill_key.to_string(),
                expected: "dict",
            }
            .into());
        };
        let upper = skill_key.to_case(Case::UpperSnake);
        fields.insert(
            "name".to_string(),
            Value::String(format!("IDS_SKILL_{upper}")),
        );
        fields.insert(
            "description".to_string(),
            Value::String(format!("IDS_SKILL_DESC_{upper}")),
        );
        table.insert(skill_key.clone(), skill);
    }
    Ok(table)
}
