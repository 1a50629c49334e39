//! The assembled artifact set produced by one run.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::IResult;
use crate::game_params::types::GameParamId;
use crate::unpack::ability::AbilityRecord;
use crate::unpack::aircraft::AircraftRecord;
use crate::unpack::misc::{AchievementRecord, AliasRecord, ExteriorRecord, ModernizationRecord};
use crate::unpack::projectile::ProjectileRecord;
use crate::unpack::registry::LangTable;
use crate::unpack::ship::ShipRecord;

/// Distinct nation and ship-subtype lists gathered during the ship scan.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct GameInfo {
    pub regions: Vec<String>,
    pub types: Vec<String>,
}

/// Compact per-ship lookup entry for list views.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShipIndexEntry {
    pub index: String,
    pub tier: i64,
}

/// Every table produced by a run, still in memory. Serialization happens at
/// the boundary, after the transform is complete.
#[derive(Debug, Default)]
pub struct GeneratedData {
    pub ships: BTreeMap<GameParamId, ShipRecord>,
    pub achievements: BTreeMap<String, AchievementRecord>,
    pub exteriors: BTreeMap<String, ExteriorRecord>,
    pub modernizations: BTreeMap<String, ModernizationRecord>,
    pub projectiles: BTreeMap<String, ProjectileRecord>,
    pub aircrafts: BTreeMap<String, AircraftRecord>,
    pub abilities: BTreeMap<String, AbilityRecord>,
    pub alias: BTreeMap<GameParamId, AliasRecord>,
    pub ship_index: BTreeMap<GameParamId, ShipIndexEntry>,
    pub commander_skills: BTreeMap<String, Value>,
    pub skills: BTreeMap<String, Value>,
    pub modifiers: BTreeMap<String, Value>,
    pub game_info: GameInfo,
    pub lang: BTreeMap<String, LangTable>,
}

/// The merged single-file artifact, borrowing every category table.
#[derive(Serialize)]
struct Merged<'a> {
    ships: &'a BTreeMap<GameParamId, ShipRecord>,
    achievements: &'a BTreeMap<String, AchievementRecord>,
    exteriors: &'a BTreeMap<String, ExteriorRecord>,
    modernizations: &'a BTreeMap<String, ModernizationRecord>,
    projectiles: &'a BTreeMap<String, ProjectileRecord>,
    aircrafts: &'a BTreeMap<String, AircraftRecord>,
    abilities: &'a BTreeMap<String, AbilityRecord>,
    alias: &'a BTreeMap<GameParamId, AliasRecord>,
    skills: &'a BTreeMap<String, Value>,
    game: &'a GameInfo,
}

impl GeneratedData {
    /// The combined artifact aggregating every category plus game metadata.
    pub fn merged(&self) -> IResult<Value> {
        Ok(serde_json::to_value(Merged {
            ships: &self.ships,
            achievements: &self.achievements,
            exteriors: &self.exteriors,
            modernizations: &self.modernizations,
            projectiles: &self.projectiles,
            aircrafts: &self.aircrafts,
            abilities: &self.abilities,
            alias: &self.alias,
            skills: &self.skills,
            game: &self.game_info,
        })?)
    }

    /// All output artifacts as `(file name, compact JSON)` pairs, in a fixed
    /// order.
    pub fn artifacts(&self) -> IResult<Vec<(&'static str, String)>> {
        Ok(vec![
            ("ships.json", serde_json::to_string(&self.ships)?),
            ("achievements.json", serde_json::to_string(&self.achievements)?),
            ("exteriors.json", serde_json::to_string(&self.exteriors)?),
            (
                "modernizations.json",
                serde_json::to_string(&self.modernizations)?,
            ),
            ("projectiles.json", serde_json::to_string(&self.projectiles)?),
            ("aircrafts.json", serde_json::to_string(&self.aircrafts)?),
            ("abilities.json", serde_json::to_string(&self.abilities)?),
            ("alias.json", serde_json::to_string(&self.alias)?),
            ("ship_index.json", serde_json::to_string(&self.ship_index)?),
            ("modifiers.json", serde_json::to_string(&self.modifiers)?),
            ("game_info.json", serde_json::to_string(&self.game_info)?),
            (
                "commander_skills.json",
                serde_json::to_string(&self.commander_skills)?,
            ),
            ("skills.json", serde_json::to_string(&self.skills)?),
            ("lang.json", serde_json::to_string(&self.lang)?),
            ("wowsinfo.json", serde_json::to_string(&self.merged()?)?),
        ])
    }
}
