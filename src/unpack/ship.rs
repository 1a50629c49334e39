//! Unpacks one ship: identity, consumable slots, and the recursive walk of
//! its upgrade module tree.
//!
//! The upgrade tree is a mapping of module key -> module descriptor where
//! each descriptor back-references the previous module of its slot through
//! `prev`. Module order inside a slot is recovered by walking that chain to
//! the root. The final record keeps two views over the same data: `modules`
//! (upgrade-path and economy) and `components` (physical systems), because
//! the app needs both lenses.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ErrorKind, IResult};
use crate::game_params::keys::{self, ComponentType};
use crate::game_params::types::GameParamId;
use crate::game_params::{NodeRef, RawGraph};
use crate::unpack::component::{Component, unpack_component};
use crate::unpack::helpers::{Consumable, ids, unpack_consumables};
use crate::unpack::registry::LangKeys;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModuleCost {
    #[serde(rename = "costCR")]
    pub cost_cr: i64,
    #[serde(rename = "costXP")]
    pub cost_xp: i64,
}

/// One module of the upgrade tree, in the economic/ordering view.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ModuleInfo {
    pub cost: ModuleCost,
    /// Position within the module's upgrade slot; chain root is 0.
    pub index: u32,
    /// The raw component-category -> component-name lists of this module.
    pub components: Value,
    pub name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct ShipRecord {
    pub name: String,
    pub description: String,
    pub year: String,
    #[serde(rename = "paperShip")]
    pub paper_ship: bool,
    pub id: GameParamId,
    pub index: String,
    pub tier: i64,
    pub region: String,
    #[serde(rename = "type")]
    pub species: String,
    #[serde(rename = "regionID")]
    pub region_id: String,
    #[serde(rename = "typeID")]
    pub species_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub permoflages: Vec<String>,
    pub group: String,
    pub consumables: Vec<Vec<Consumable>>,
    #[serde(rename = "costXP")]
    pub cost_xp: i64,
    #[serde(rename = "costGold")]
    pub cost_gold: i64,
    #[serde(rename = "costCR")]
    pub cost_cr: i64,
    #[serde(rename = "nextShips", skip_serializing_if = "Vec::is_empty")]
    pub next_ships: Vec<GameParamId>,
    /// Upgrade-tree view, grouped by module type tag.
    pub modules: BTreeMap<String, Vec<ModuleInfo>>,
    /// Physical-system view, keyed by component name.
    pub components: BTreeMap<String, Component>,
}

/// Unpack one raw ship node. The full graph is needed to resolve module
/// costs and succession targets.
pub fn unpack_ship(
    ship: NodeRef<'_>,
    graph: &RawGraph,
    lang_keys: &mut LangKeys,
) -> IResult<ShipRecord> {
    let index = ship.str(keys::PARAM_INDEX)?;
    let id = ship.u64(keys::PARAM_ID)?;

    let name = ids(index);
    let description = format!("{name}_DESCR");
    let year = format!("{name}_YEAR");
    lang_keys.add(name.clone());
    lang_keys.add(description.clone());
    lang_keys.add(year.clone());

    let typeinfo = ship.typeinfo()?;
    let region_id = ids(typeinfo.nation);
    let species_id = ids(typeinfo.species);
    lang_keys.add(region_id.clone());
    lang_keys.add(species_id.clone());

    let consumables = unpack_consumables(ship.dict(keys::SHIP_ABILITIES)?)?;

    let upgrade_info = ship.dict(keys::SHIP_UPGRADE_INFO)?;

    let mut next_ships = Vec::new();
    let mut module_tree: BTreeMap<String, Vec<ModuleInfo>> = BTreeMap::new();
    let mut component_tree: BTreeMap<String, Component> = BTreeMap::new();

    // Scalar entries of ShipUpgradeInfo (the ship-level costs) are skipped
    // by the dict-only iteration.
    for module in upgrade_info.dict_entries() {
        // The top-level cost table and the upgrade tree must agree.
        let module_cost = graph
            .get(module.name())
            .ok_or_else(|| ErrorKind::ModuleCostNotFound(module.name().to_string()))?;
        let cost = ModuleCost {
            cost_cr: module_cost.i64(keys::COST_CR)?,
            cost_xp: module_cost.i64(keys::COST_XP)?,
        };

        let module_type = module.str(keys::UC_TYPE)?;
        let module_index = chain_index(upgrade_info, module)?;

        // Any module may name successor ships, not just hulls.
        if let Some(successors) = module.get(keys::NEXT_SHIPS).and_then(Value::as_array) {
            for successor in successors {
                let Some(successor) = successor.as_str() else {
                    continue;
                };
                match graph.id_of(successor) {
                    Some(ship_id) => next_ships.push(ship_id),
                    // Deleted ships leave stale keys behind.
                    None => debug!(ship = module.name(), successor, "dropping stale next ship"),
                }
            }
        }

        let components = module.dict(keys::COMPONENTS)?;
        for (component_key, component_list) in components.entries() {
            let component_list = component_list.as_array().ok_or_else(|| {
                ErrorKind::UnexpectedFieldType {
                    node: module.name().to_string(),
                    field: keys::COMPONENTS.to_string(),
                    expected: "lists of component names",
                }
            })?;
            if component_list.is_empty() {
                continue;
            }

            let kind = ComponentType::from_key(component_key)
                .into_known()
                .ok_or_else(|| ErrorKind::UnknownModuleType(component_key.to_string()))?;

            for component_name in component_list {
                let Some(component_name) = component_name.as_str() else {
                    continue;
                };
                // The same component appears on several modules; unpack once.
                if component_tree.contains_key(component_name) {
                    continue;
                }
                if let Some(component) = unpack_component(ship, component_name, kind, lang_keys)? {
                    component_tree.insert(component_name.to_string(), component);
                }
            }
        }

        let module_name = ids(module.name());
        lang_keys.add(module_name.clone());
        module_tree
            .entry(module_type.to_string())
            .or_default()
            .push(ModuleInfo {
                cost,
                index: module_index,
                components: components.to_value(),
                name: module_name,
            });
    }

    Ok(ShipRecord {
        name,
        description,
        year,
        paper_ship: ship.bool("isPaperShip")?,
        id,
        index: index.to_string(),
        tier: ship.i64("level")?,
        region: typeinfo.nation.to_string(),
        species: typeinfo.species.to_string(),
        region_id,
        species_id,
        permoflages: ship.str_list("permoflages")?,
        group: ship.str("group")?.to_string(),
        consumables,
        cost_xp: upgrade_info.i64(keys::COST_XP)?,
        cost_gold: upgrade_info.i64(keys::COST_GOLD)?,
        cost_cr: upgrade_info.i64(keys::COST_CR)?,
        next_ships,
        modules: module_tree,
        components: component_tree,
    })
}

/// Count hops from `module` back to its upgrade chain's root.
fn chain_index(upgrade_info: NodeRef<'_>, module: NodeRef<'_>) -> IResult<u32> {
    let mut index = 0;
    let mut prev = module.str(keys::PREV)?;
    while !prev.is_empty() {
        prev = upgrade_info.dict(prev)?.str(keys::PREV)?;
        index += 1;
    }
    Ok(index)
}

#[cfg(test)]
mod test {
    use super::*;
    use serde_json::json;

    fn engine(coef: f64) -> Value {
        json!({"speedCoef": coef})
    }

    fn test_ship(next_ships: Value) -> Value {
        json!({
            "id": 3751786480u64,
            "index": "PASD021",
            "level": 7,
            "isPaperShip": false,
            "group": "start",
            "permoflages": [],
            "typeinfo": {"type": "Ship", "nation": "USA", "species": "Destroyer"},
            "ShipAbilities": {
                "AbilitySlot0": {"abils": [["PCY009_CrashCrew", "CrashCrew"]], "slot": 0},
            },
            "ShipUpgradeInfo": {
                "costXP": 12000,
                "costGold": 0,
                "costCR": 1400000,
                "PASD021_Engine_Stock": {
                    "ucType": "_Engine",
                    "prev": "",
                    "components": {"engine": ["E_Stock"]},
                    "nextShips": next_ships,
                },
                "PASD021_Engine_Top": {
                    "ucType": "_Engine",
                    "prev": "PASD021_Engine_Stock",
                    "components": {"engine": ["E_Top"], "torpedoes": []},
                },
            },
            "E_Stock": engine(0.0),
            "E_Top": engine(0.1),
        })
    }

    fn test_graph(next_ships: Value) -> RawGraph {
        RawGraph::from_value(json!({
            "PASD021_Ship": test_ship(next_ships),
            "PASD021_Engine_Stock": {"costCR": 0, "costXP": 0},
            "PASD021_Engine_Top": {"costCR": 150000, "costXP": 1200},
            "PASD022_Next": {"id": 3751786481u64},
        }))
        .unwrap()
    }

    fn unpack(graph: &RawGraph) -> IResult<ShipRecord> {
        let ship = graph.get("PASD021_Ship").unwrap();
        let mut lang_keys = LangKeys::default();
        unpack_ship(ship, graph, &mut lang_keys)
    }

    #[test]
    fn identity_and_costs() {
        let graph = test_graph(json!([]));
        let record = unpack(&graph).unwrap();
        assert_eq!(record.id, 3751786480);
        assert_eq!(record.name, "IDS_PASD021");
        assert_eq!(record.description, "IDS_PASD021_DESCR");
        assert_eq!(record.tier, 7);
        assert_eq!(record.region, "USA");
        assert_eq!(record.species_id, "IDS_DESTROYER");
        assert_eq!(record.cost_cr, 1400000);
        assert_eq!(record.consumables.len(), 1);
    }

    #[test]
    fn chain_index_counts_hops_to_root() {
        let graph = test_graph(json!([]));
        let record = unpack(&graph).unwrap();
        let engines = &record.modules["_Engine"];
        assert_eq!(engines.len(), 2);
        let by_name: BTreeMap<&str, u32> =
            engines.iter().map(|m| (m.name.as_str(), m.index)).collect();
        assert_eq!(by_name["IDS_PASD021_ENGINE_STOCK"], 0);
        assert_eq!(by_name["IDS_PASD021_ENGINE_TOP"], 1);
    }

    #[test]
    fn stale_next_ships_are_dropped() {
        let graph = test_graph(json!(["PASD022_Next", "PRSD309_Pr_48"]));
        let record = unpack(&graph).unwrap();
        assert_eq!(record.next_ships, vec![3751786481]);
    }

    #[test]
    fn empty_components_are_discarded() {
        let graph = test_graph(json!([]));
        let record = unpack(&graph).unwrap();
        // The stock engine has a zero speed coefficient and unpacks empty.
        assert!(!record.components.contains_key("E_Stock"));
        assert!(record.components.contains_key("E_Top"));
    }

    #[test]
    fn missing_cost_entry_is_fatal() {
        // No cost entry for the stock engine module.
        let graph = RawGraph::from_value(json!({
            "PASD021_Ship": test_ship(json!([])),
            "PASD021_Engine_Top": {"costCR": 150000, "costXP": 1200},
        }))
        .unwrap();
        let err = unpack(&graph).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::ModuleCostNotFound(ref key) if key == "PASD021_Engine_Stock")
        );
    }

    #[test]
    fn unknown_module_type_is_fatal() {
        let mut ship = test_ship(json!([]));
        ship["ShipUpgradeInfo"]["PASD021_Engine_Stock"]["components"] =
            json!({"mysteryModule": ["M_Stock"]});
        let graph = RawGraph::from_value(json!({
            "PASD021_Ship": ship,
            "PASD021_Engine_Stock": {"costCR": 0, "costXP": 0},
            "PASD021_Engine_Top": {"costCR": 150000, "costXP": 1200},
        }))
        .unwrap();
        let err = unpack(&graph).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownModuleType(ref tag) if tag == "mysteryModule"));
    }
}
