//! The run controller: a single pass over the raw graph routing every node
//! to its category unpacker, followed by final assembly of the language
//! subsets, the modifier table and the merged artifact.

use itertools::Itertools;
use tracing::{info, warn};

use crate::error::{ErrorKind, IResult};
use crate::game_params::RawGraph;
use crate::game_params::types::ParamType;
use crate::unpack::ability::unpack_ability;
use crate::unpack::aircraft::unpack_aircraft;
use crate::unpack::helpers::has_prefix;
use crate::unpack::misc::{
    self, build_skills, collect_crew, unpack_achievement, unpack_alias, unpack_exterior,
    unpack_modernization,
};
use crate::unpack::output::{GameInfo, GeneratedData, ShipIndexEntry};
use crate::unpack::projectile::unpack_projectile;
use crate::unpack::registry::{LangKeys, LangTables, Modifiers};
use crate::unpack::ship::unpack_ship;

/// English-master prefixes whose every key is shipped to the app.
const LANG_KEY_PREFIXES: &[&str] = &[
    "IDS_PARAMS_MODIFIER_",
    "IDS_MODULE_TYPE_",
    "IDS_CAROUSEL_APPLIED_",
    "IDS_SHIP_PARAM_",
    "IDS_SKILL_",
    "IDS_DOCK_RAGE_MODE_",
];

/// App-level strings that no unpacker references directly.
const EXTRA_LANG_KEYS: &[&str] = &[
    "IDS_SPECTATE_SWITCH_SHIP",
    "IDS_MODERNIZATIONS",
    "IDS_MODULE_TYPE_ABILITIES",
    // units
    "IDS_SECOND",
    "IDS_KILOMETER",
    "IDS_KILOGRAMM",
    "IDS_KNOT",
    "IDS_METER_SECOND",
    "IDS_MILLIMETER",
    "IDS_METER",
    "IDS_UNITS",
    "IDS_UNITS_SECOND",
    // generic strings
    "IDS_SHIPS",
    "IDS_BATTLES",
];

/// Drives one full normalization run over a raw graph.
///
/// Owns the run-wide accumulators for its lifetime, so concurrent or
/// repeated runs over different snapshots cannot leak state into each
/// other.
pub struct Generator<'a> {
    graph: &'a RawGraph,
    langs: &'a LangTables,
}

impl<'a> Generator<'a> {
    pub fn new(graph: &'a RawGraph, langs: &'a LangTables) -> Self {
        Self { graph, langs }
    }

    pub fn generate(&self) -> IResult<GeneratedData> {
        let mut data = GeneratedData::default();
        let mut lang_keys = LangKeys::default();
        let mut modifiers = Modifiers::default();

        for node in self.graph.iter() {
            let typeinfo = node.typeinfo()?;
            let Some(category) = ParamType::from_name(typeinfo.category) else {
                continue;
            };

            match category {
                ParamType::Ship => {
                    let record = unpack_ship(node, self.graph, &mut lang_keys)?;
                    data.ship_index.insert(
                        record.id,
                        ShipIndexEntry {
                            index: record.index.clone(),
                            tier: record.tier,
                        },
                    );
                    if typeinfo.nation == "Japan" {
                        match self.langs.locale("zh_sg") {
                            Some(table) => {
                                if let Some(alias) = unpack_alias(node, table)? {
                                    data.alias.insert(record.id, alias);
                                }
                            }
                            None => warn!(ship = node.name(), "no zh_sg table for aliases"),
                        }
                    }
                    data.ships.insert(record.id, record);
                }
                ParamType::Achievement => {
                    let record = unpack_achievement(node, &mut lang_keys)?;
                    data.achievements.insert(node.name().to_string(), record);
                }
                ParamType::Exterior => {
                    if let Some(record) = unpack_exterior(node, &mut lang_keys, &mut modifiers)? {
                        data.exteriors.insert(node.name().to_string(), record);
                    }
                }
                ParamType::Modernization => {
                    if let Some((key, record)) =
                        unpack_modernization(node, self.graph, &mut lang_keys, &mut modifiers)?
                    {
                        data.modernizations.insert(key, record);
                    }
                }
                ParamType::Crew => {
                    collect_crew(node, &mut data.commander_skills, &mut modifiers)?;
                }
                // Gun params duplicate what the ship components already carry.
                ParamType::Gun => {}
                ParamType::Projectile => {
                    let record = unpack_projectile(node, &mut lang_keys)?;
                    data.projectiles.insert(node.name().to_string(), record);
                }
                ParamType::Aircraft => {
                    let record = unpack_aircraft(node, &mut lang_keys)?;
                    data.aircrafts.insert(node.name().to_string(), record);
                }
                ParamType::Ability => {
                    let record = unpack_ability(node, &mut lang_keys, &mut modifiers)?;
                    data.abilities.insert(node.name().to_string(), record);
                }
            }
        }

        // An empty ship table means the graph's shape is not what this
        // engine was built against.
        if data.ships.is_empty() {
            return Err(ErrorKind::NoShips.into());
        }

        info!(ships = data.ships.len(), "unpacked ships");
        info!(achievements = data.achievements.len(), "unpacked achievements");
        info!(exteriors = data.exteriors.len(), "unpacked exteriors");
        info!(
            modernizations = data.modernizations.len(),
            "unpacked modernizations"
        );
        info!(projectiles = data.projectiles.len(), "unpacked projectiles");
        info!(aircrafts = data.aircrafts.len(), "unpacked aircraft");
        info!(abilities = data.abilities.len(), "unpacked abilities");
        info!(alias = data.alias.len(), "unpacked aliases");
        info!(modifiers = modifiers.len(), "collected modifiers");

        data.game_info = GameInfo {
            regions: data
                .ships
                .values()
                .map(|ship| ship.region.clone())
                .unique()
                .sorted()
                .collect(),
            types: data
                .ships
                .values()
                .map(|ship| ship.species.clone())
                .unique()
                .sorted()
                .collect(),
        };

        let default_crew = data.commander_skills.get(misc::DEFAULT_CREW).ok_or_else(|| {
            ErrorKind::MissingField {
                node: "GameParams".to_string(),
                field: misc::DEFAULT_CREW.to_string(),
            }
        })?;
        data.skills = build_skills(default_crew)?;
        info!(skills = data.skills.len(), "unpacked skills");

        data.modifiers = modifiers.resolve_names(self.langs.english());

        for key in self.langs.english().keys() {
            if has_prefix(key, LANG_KEY_PREFIXES) {
                lang_keys.add(key.clone());
            }
        }
        lang_keys.extend(EXTRA_LANG_KEYS.iter().copied());
        info!(lang_keys = lang_keys.len(), "referenced language keys");

        data.lang = self.langs.subset(&lang_keys);

        Ok(data)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::unpack::registry::LangTable;
    use serde_json::{Value, json};
    use std::collections::BTreeMap;

    fn test_langs() -> LangTables {
        let mut tables = BTreeMap::new();
        tables.insert(
            "en".to_string(),
            LangTable::from([
                ("IDS_PASD021".to_string(), "Test Ship".to_string()),
                ("IDS_FOO".to_string(), "Foo".to_string()),
                ("IDS_SKILL_SOME_SKILL".to_string(), "Some Skill".to_string()),
                (
                    "IDS_PARAMS_MODIFIER_GMSHOTDELAY".to_string(),
                    "Reload".to_string(),
                ),
            ]),
        );
        tables.insert(
            "ja".to_string(),
            LangTable::from([("IDS_PASD021".to_string(), "テスト艦".to_string())]),
        );
        LangTables::new(tables).unwrap()
    }

    fn test_graph(with_ship: bool) -> RawGraph {
        let mut root = json!({
            "PAW001_DefaultCrew": {
                "typeinfo": {"type": "Crew", "nation": "USA", "species": "Common"},
                "CrewPersonality": {"isUnique": false},
                "Skills": {"SomeSkill": {"modifiers": {"GMShotDelay": 0.9}}},
            },
        });
        if with_ship {
            root["PASD021_Ship"] = json!({
                "id": 3751786480u64,
                "index": "PASD021",
                "level": 7,
                "isPaperShip": false,
                "group": "start",
                "permoflages": [],
                "typeinfo": {"type": "Ship", "nation": "USA", "species": "Destroyer"},
                "ShipAbilities": {},
                "ShipUpgradeInfo": {
                    "costXP": 0,
                    "costGold": 0,
                    "costCR": 0,
                    "PASD021_Engine": {
                        "ucType": "_Engine",
                        "prev": "",
                        "components": {"engine": ["E_Top"]},
                    },
                },
                "E_Top": {"speedCoef": 0.1},
            });
            root["PASD021_Engine"] = json!({"costCR": 0, "costXP": 0});
        }
        RawGraph::from_value(root).unwrap()
    }

    #[test]
    fn empty_ship_table_is_fatal() {
        let graph = test_graph(false);
        let langs = test_langs();
        let err = Generator::new(&graph, &langs).generate().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::NoShips));
    }

    #[test]
    fn ships_feed_game_info_and_ship_index() {
        let graph = test_graph(true);
        let langs = test_langs();
        let data = Generator::new(&graph, &langs).generate().unwrap();
        assert_eq!(data.game_info.regions, vec!["USA"]);
        assert_eq!(data.game_info.types, vec!["Destroyer"]);
        assert_eq!(data.ship_index[&3751786480].index, "PASD021");
        assert_eq!(data.ship_index[&3751786480].tier, 7);
    }

    #[test]
    fn language_subsets_omit_missing_keys_per_locale() {
        let graph = test_graph(true);
        let langs = test_langs();
        let data = Generator::new(&graph, &langs).generate().unwrap();
        assert_eq!(data.lang["en"].get("IDS_PASD021").unwrap(), "Test Ship");
        assert_eq!(data.lang["ja"].get("IDS_PASD021").unwrap(), "テスト艦");
        // IDS_PASD021_DESCR is referenced but present in neither table.
        assert!(!data.lang["en"].contains_key("IDS_PASD021_DESCR"));
        // Prefix-matched keys come along even though nothing referenced them.
        assert_eq!(
            data.lang["en"].get("IDS_SKILL_SOME_SKILL").unwrap(),
            "Some Skill"
        );
    }

    #[test]
    fn modifier_table_has_resolved_names() {
        let graph = test_graph(true);
        let langs = test_langs();
        let data = Generator::new(&graph, &langs).generate().unwrap();
        assert_eq!(data.modifiers["GMShotDelay"], json!(0.9));
        assert_eq!(data.modifiers["GMShotDelay_name"], json!("Reload"));
    }

    #[test]
    fn skills_artifact_comes_from_the_default_crew() {
        let graph = test_graph(true);
        let langs = test_langs();
        let data = Generator::new(&graph, &langs).generate().unwrap();
        assert_eq!(
            data.skills["SomeSkill"]["name"],
            json!("IDS_SKILL_SOME_SKILL")
        );
        assert!(data.commander_skills.contains_key("PAW001_DefaultCrew"));
    }

    #[test]
    fn runs_are_deterministic() {
        let graph = test_graph(true);
        let langs = test_langs();
        let first = Generator::new(&graph, &langs).generate().unwrap();
        let second = Generator::new(&graph, &langs).generate().unwrap();
        let first: Vec<(&str, String)> = first.artifacts().unwrap();
        let second: Vec<(&str, String)> = second.artifacts().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn merged_artifact_aggregates_every_category() {
        let graph = test_graph(true);
        let langs = test_langs();
        let data = Generator::new(&graph, &langs).generate().unwrap();
        let merged = data.merged().unwrap();
        for key in [
            "ships",
            "achievements",
            "exteriors",
            "modernizations",
            "projectiles",
            "aircrafts",
            "abilities",
            "alias",
            "skills",
            "game",
        ] {
            assert!(merged.get(key).is_some(), "missing {key}");
        }
        assert_eq!(
            merged["ships"]["3751786480"]["name"],
            Value::String("IDS_PASD021".to_string())
        );
    }
}
