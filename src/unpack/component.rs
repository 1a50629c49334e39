//! Unpacks one physical ship component (hull, battery, launcher, ...) from
//! the raw module dict it lives in.
//!
//! Dispatch is a closed match over [`ComponentType`]; a tag outside the
//! enumerated set aborts the run. Several recognized tags (radars, lasers,
//! directors, ...) deliberately unpack to nothing.

use serde::Serialize;
use serde_json::Value;

use crate::error::{ErrorKind, IResult};
use crate::game_params::keys::{self, ComponentType};
use crate::game_params::NodeRef;
use crate::unpack::helpers::{Counted, ids, merge_counted, round1, round_to};
use crate::unpack::registry::LangKeys;

/// Rescales the raw rudder shift time to the in-client value.
const RUDDER_TIME_DIVISOR: f64 = 1.305;

/// Multiplier from the raw per-bubble damage to the displayed value.
const BUBBLE_DAMAGE_FACTOR: f64 = 7.0;

/// One gun or torpedo launcher scanned from an `HP_` mount entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Weapon {
    pub reload: f64,
    pub rotation: f64,
    pub each: u32,
    pub ammo: Vec<String>,
    #[serde(rename = "vertSector", skip_serializing_if = "Option::is_none")]
    pub vert_sector: Option<f64>,
}

/// One anti-air gun referenced by a ranged aura.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuraGun {
    pub ammo: String,
    pub each: u32,
    pub reload: f64,
    pub name: String,
}

/// The area-damage "black cloud" shape of an air-defense aura.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bubbles {
    pub inner: i64,
    pub outer: i64,
    pub rof: f64,
    #[serde(rename = "minRange")]
    pub min_range: f64,
    #[serde(rename = "maxRange")]
    pub max_range: f64,
    #[serde(rename = "hitChance")]
    pub hit_chance: f64,
    #[serde(rename = "spawnTime")]
    pub spawn_time: f64,
    pub damage: f64,
}

/// A ranged anti-air aura.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AuraInfo {
    #[serde(rename = "minRange")]
    pub min_range: f64,
    #[serde(rename = "maxRange")]
    pub max_range: f64,
    #[serde(rename = "hitChance")]
    pub hit_chance: f64,
    pub damage: f64,
    pub rof: f64,
    pub dps: f64,
    pub guns: Vec<Counted<AuraGun>>,
}

/// All air-defense auras found on one module, bucketed by range band.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct AirDefense {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bubbles: Option<Bubbles>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub far: Vec<AuraInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub medium: Vec<AuraInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub near: Vec<AuraInfo>,
}

impl AirDefense {
    pub fn is_empty(&self) -> bool {
        self.bubbles.is_none()
            && self.far.is_empty()
            && self.medium.is_empty()
            && self.near.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Concealment {
    pub sea: f64,
    pub plane: f64,
    #[serde(rename = "seaInSmoke")]
    pub sea_in_smoke: f64,
    #[serde(rename = "planeInSmoke")]
    pub plane_in_smoke: f64,
    pub submarine: f64,
    #[serde(rename = "seaFireCoeff")]
    pub sea_fire_coeff: f64,
    #[serde(rename = "planeFireCoeff")]
    pub plane_fire_coeff: f64,
    #[serde(
        rename = "coeffSeaUnderwaterDepths",
        skip_serializing_if = "Option::is_none"
    )]
    pub coeff_sea_underwater: Option<f64>,
    #[serde(
        rename = "coeffPlanUnderwaterDepths",
        skip_serializing_if = "Option::is_none"
    )]
    pub coeff_plane_underwater: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Mobility {
    pub speed: f64,
    #[serde(rename = "speedUnderwater", skip_serializing_if = "Option::is_none")]
    pub speed_underwater: Option<f64>,
    #[serde(rename = "turningRadius")]
    pub turning_radius: f64,
    #[serde(rename = "rudderTime")]
    pub rudder_time: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SubmarineBattery {
    pub capacity: f64,
    pub regen: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HullComponent {
    pub health: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protection: Option<f64>,
    pub visibility: Concealment,
    pub mobility: Mobility,
    #[serde(rename = "submarineBattery", skip_serializing_if = "Option::is_none")]
    pub submarine_battery: Option<SubmarineBattery>,
}

/// Main battery and secondary battery share this shape; both also double as
/// air-defense sources.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Battery {
    pub range: f64,
    pub sigma: f64,
    pub guns: Vec<Counted<Weapon>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub burst: Option<Value>,
    #[serde(flatten)]
    pub air_defense: AirDefense,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TorpedoLauncher {
    #[serde(rename = "singleShot")]
    pub single_shot: bool,
    pub launchers: Vec<Counted<Weapon>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AirSupport {
    pub plane: String,
    pub name: String,
    pub reload: f64,
    pub range: f64,
    #[serde(rename = "chargesNum")]
    pub charges: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepthCharges {
    pub reload: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ammo: Option<String>,
    pub bombs: i64,
    pub groups: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Pinger {
    pub reload: f64,
    pub range: f64,
    #[serde(rename = "lifeTime1")]
    pub lifetime1: f64,
    #[serde(rename = "lifeTime2")]
    pub lifetime2: f64,
    pub speed: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Engine {
    #[serde(rename = "speedCoef")]
    pub speed_coef: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Specials {
    #[serde(rename = "rageMode")]
    pub rage_mode: Value,
}

/// The unpacked representation of one named component.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Component {
    Hull(HullComponent),
    Battery(Battery),
    TorpedoLauncher(TorpedoLauncher),
    AirDefense(AirDefense),
    AirSupport(AirSupport),
    DepthCharges(DepthCharges),
    Pinger(Pinger),
    Engine(Engine),
    Specials(Specials),
    /// Raw sub-structure substituted as-is (fire control, plane squadrons).
    Raw(Value),
}

/// Unpack the component named `component_name` on `ship`, dispatching on the
/// module type tag. Returns `None` for components that unpack to nothing.
pub fn unpack_component(
    ship: NodeRef<'_>,
    component_name: &str,
    kind: ComponentType,
    lang_keys: &mut LangKeys,
) -> IResult<Option<Component>> {
    let module = ship.dict(component_name)?;
    let component = match kind {
        ComponentType::Hull => Some(Component::Hull(unpack_hull(module)?)),
        ComponentType::Artillery => {
            let burst = module.get("BurstArtilleryModule").cloned();
            Some(Component::Battery(unpack_battery(module, burst, lang_keys)?))
        }
        ComponentType::Atba => Some(Component::Battery(unpack_battery(module, None, lang_keys)?)),
        ComponentType::Torpedoes => Some(Component::TorpedoLauncher(TorpedoLauncher {
            single_shot: module.bool("useOneShot")?,
            launchers: unpack_weapons(module)?,
        })),
        ComponentType::AirDefense => {
            let air_defense = unpack_air_defense(module, lang_keys)?;
            (!air_defense.is_empty()).then_some(Component::AirDefense(air_defense))
        }
        ComponentType::AirSupport => {
            let plane = module.str("planeName")?;
            let name = ids(plane);
            lang_keys.add(name.clone());
            Some(Component::AirSupport(AirSupport {
                plane: plane.to_string(),
                name,
                reload: module.f64("reloadTime")?,
                range: round1(module.f64(keys::MAX_DIST)? / 1000.0),
                charges: module.i64("chargesNum")?,
            }))
        }
        ComponentType::DepthCharges => Some(Component::DepthCharges(unpack_depth_charges(module)?)),
        ComponentType::FireControl => {
            let raw = module.to_value();
            (!raw_is_empty(&raw)).then_some(Component::Raw(raw))
        }
        ComponentType::TorpedoBomber
        | ComponentType::DiveBomber
        | ComponentType::Fighter
        | ComponentType::SkipBomber => {
            let planes = module
                .get("planes")
                .ok_or_else(|| ErrorKind::MissingField {
                    node: module.name().to_string(),
                    field: "planes".to_string(),
                })?
                .clone();
            (!raw_is_empty(&planes)).then_some(Component::Raw(planes))
        }
        ComponentType::Pinger => Some(Component::Pinger(unpack_pinger(module)?)),
        ComponentType::Engine => {
            let speed_coef = module.f64("speedCoef")?;
            (speed_coef != 0.0).then_some(Component::Engine(Engine { speed_coef }))
        }
        ComponentType::Specials => module
            .get("RageMode")
            .cloned()
            .map(|rage_mode| Component::Specials(Specials { rage_mode })),
        // Recognized tags with no modeled fields.
        ComponentType::FlightControl
        | ComponentType::AirArmament
        | ComponentType::Radars
        | ComponentType::ChargeLasers
        | ComponentType::Waves
        | ComponentType::AxisLaser
        | ComponentType::Abilities
        | ComponentType::Directors
        | ComponentType::Finders
        | ComponentType::Wcs => None,
    };
    Ok(component)
}

fn raw_is_empty(value: &Value) -> bool {
    match value {
        Value::Object(map) => map.is_empty(),
        Value::Array(list) => list.is_empty(),
        _ => false,
    }
}

fn unpack_hull(module: NodeRef<'_>) -> IResult<HullComponent> {
    let health = module.f64("health")?;

    let flood_nodes = module.list("floodNodes")?;
    let flood_probability = flood_nodes
        .first()
        .and_then(Value::as_array)
        .and_then(|node| node.first())
        .and_then(Value::as_f64)
        .ok_or_else(|| ErrorKind::UnexpectedFieldType {
            node: module.name().to_string(),
            field: "floodNodes".to_string(),
            expected: "non-empty list of number lists",
        })?;
    // Values below 1 mean no meaningful torpedo protection.
    let protection = 100.0 - flood_probability * 3.0 * 100.0;
    let protection = (protection >= 1.0).then_some(round1(protection));

    let submarine_battery = module.opt_dict("SubmarineBattery");

    let visibility = Concealment {
        sea: round1(module.f64("visibilityFactor")?),
        plane: round1(module.f64("visibilityFactorByPlane")?),
        sea_in_smoke: round1(module.f64("visibilityCoefGKInSmoke")?),
        plane_in_smoke: round1(module.f64("visibilityCoefGKByPlane")?),
        submarine: round1(
            module
                .dict("visibilityFactorsBySubmarine")?
                .f64("PERISCOPE")?,
        ),
        sea_fire_coeff: module.f64("visibilityCoefFire")?,
        plane_fire_coeff: module.f64("visibilityCoefFireByPlane")?,
        coeff_sea_underwater: submarine_battery
            .map(|_| module.f64("visibilityCoeffUnderwaterDepths"))
            .transpose()?,
        coeff_plane_underwater: submarine_battery
            .map(|_| module.f64("visibilityCoeffUnderwaterDepths"))
            .transpose()?,
    };

    let speed = module.f64("maxSpeed")?;
    let speed_underwater = if submarine_battery.is_some() {
        let buoyancy_states = module.dict("buoyancyStates")?;
        match buoyancy_states.get("DEEP_WATER_INVUL") {
            Some(state) => {
                let offset = state
                    .as_array()
                    .and_then(|s| s.get(1))
                    .and_then(Value::as_f64)
                    .ok_or_else(|| ErrorKind::UnexpectedFieldType {
                        node: buoyancy_states.name().to_string(),
                        field: "DEEP_WATER_INVUL".to_string(),
                        expected: "list with a numeric speed offset",
                    })?;
                Some(round1(speed * offset))
            }
            None => None,
        }
    } else {
        None
    };

    let mobility = Mobility {
        speed,
        speed_underwater,
        turning_radius: module.f64("turningRadius")?,
        rudder_time: round1(module.f64("rudderTime")? / RUDDER_TIME_DIVISOR),
    };

    let submarine_battery = submarine_battery
        .map(|battery| {
            Ok::<_, crate::error::Error>(SubmarineBattery {
                capacity: battery.f64("capacity")?,
                regen: battery.f64("regenRate")?,
            })
        })
        .transpose()?;

    Ok(HullComponent {
        health,
        protection,
        visibility,
        mobility,
        submarine_battery,
    })
}

fn unpack_battery(
    module: NodeRef<'_>,
    burst: Option<Value>,
    lang_keys: &mut LangKeys,
) -> IResult<Battery> {
    Ok(Battery {
        range: module.f64(keys::MAX_DIST)?,
        sigma: module.f64("sigmaCount")?,
        guns: unpack_weapons(module)?,
        burst,
        air_defense: unpack_air_defense(module, lang_keys)?,
    })
}

/// Scan every `HP_` mount entry of a module and merge identical guns or
/// torpedo launchers into counted records.
pub fn unpack_weapons(module: NodeRef<'_>) -> IResult<Vec<Counted<Weapon>>> {
    let mut weapons = Vec::new();
    for (mount_key, value) in module.entries() {
        if !mount_key.contains(keys::HP_PREFIX) {
            continue;
        }

        let mount = value
            .as_object()
            .map(|fields| NodeRef::new(mount_key, fields))
            .ok_or_else(|| ErrorKind::UnexpectedFieldType {
                node: module.name().to_string(),
                field: mount_key.to_string(),
                expected: "dict",
            })?;

        let rotation_speed = mount
            .list("rotationSpeed")?
            .first()
            .and_then(Value::as_f64)
            .ok_or_else(|| ErrorKind::UnexpectedFieldType {
                node: mount.name().to_string(),
                field: "rotationSpeed".to_string(),
                expected: "non-empty number list",
            })?;
        // Upper bound of the elevation sector, used for AP penetration.
        let vert_sector = match mount.get("vertSector") {
            Some(sector) => Some(
                sector
                    .as_array()
                    .and_then(|s| s.get(1))
                    .and_then(Value::as_f64)
                    .ok_or_else(|| ErrorKind::UnexpectedFieldType {
                        node: mount.name().to_string(),
                        field: "vertSector".to_string(),
                        expected: "list with two numbers",
                    })?,
            ),
            None => None,
        };

        weapons.push(Weapon {
            reload: mount.f64(keys::SHOT_DELAY)?,
            rotation: 180.0 / rotation_speed,
            each: mount.f64(keys::NUM_BARRELS)? as u32,
            ammo: mount.str_list(keys::AMMO_LIST)?,
            vert_sector,
        });
    }
    Ok(merge_counted(weapons))
}

/// Scan a module for air-defense auras and bucket them by range band.
///
/// A zero-area-damage aura is the area "bubble"; anything else is a ranged
/// gun aura whose DPS derives from damage over period.
pub fn unpack_air_defense(module: NodeRef<'_>, lang_keys: &mut LangKeys) -> IResult<AirDefense> {
    let mut air_defense = AirDefense::default();
    for aura in module.dict_entries() {
        let Some(kind) = aura.get("type").and_then(Value::as_str) else {
            continue;
        };
        if !matches!(kind, "far" | "medium" | "near") {
            continue;
        }

        let min_range = aura.f64("minDistance")? / 1000.0;
        let max_range = aura.f64("maxDistance")? / 1000.0;

        let damage = aura.f64("areaDamage")?;
        if damage == 0.0 {
            air_defense.bubbles = Some(Bubbles {
                inner: aura.f64("innerBubbleCount")? as i64,
                outer: aura.f64("outerBubbleCount")? as i64,
                rof: aura.f64(keys::SHOT_DELAY)?,
                min_range,
                max_range,
                hit_chance: aura.f64("hitChance")?,
                spawn_time: aura.f64("shotTravelTime")?,
                damage: aura.f64("bubbleDamage")? * BUBBLE_DAMAGE_FACTOR,
            });
            continue;
        }

        let period = aura.f64("areaDamagePeriod")?;
        if damage == 0.0 {
            return Err(ErrorKind::ZeroDamageAura(aura.name().to_string()).into());
        }
        let dps = round1(damage / period);

        let mut guns = Vec::new();
        for gun_key in aura.str_list("guns")? {
            let gun = module.dict(&gun_key)?;
            let gun_name = gun.str(keys::PARAM_NAME)?;
            let name = ids(gun_name);
            lang_keys.add(name.clone());
            guns.push(AuraGun {
                ammo: gun_name.to_string(),
                each: gun.f64(keys::NUM_BARRELS)? as u32,
                reload: gun.f64(keys::SHOT_DELAY)?,
                name,
            });
        }

        let info = AuraInfo {
            min_range,
            max_range,
            hit_chance: aura.f64("hitChance")?,
            damage,
            rof: round_to(period, 2),
            dps,
            guns: merge_counted(guns),
        };

        if aura.name().contains("Far") {
            air_defense.far.push(info);
        } else if aura.name().contains("Med") {
            air_defense.medium.push(info);
        } else if aura.name().contains("Near") {
            air_defense.near.push(info);
        } else {
            return Err(ErrorKind::UnknownAuraBucket(aura.name().to_string()).into());
        }
    }
    Ok(air_defense)
}

fn unpack_depth_charges(module: NodeRef<'_>) -> IResult<DepthCharges> {
    let reload = module.f64("reloadTime")?;
    let mut ammo = None;
    let mut total_bombs = 0i64;
    for launcher in module.dict_entries() {
        if total_bombs == 0 {
            // Mixed-ammo racks keep only the first launcher's ammo type.
            ammo = Some(
                launcher
                    .str_list(keys::AMMO_LIST)?
                    .into_iter()
                    .next()
                    .ok_or_else(|| ErrorKind::UnexpectedFieldType {
                        node: launcher.name().to_string(),
                        field: keys::AMMO_LIST.to_string(),
                        expected: "non-empty list",
                    })?,
            );
        }
        total_bombs += launcher.f64("numBombs")? as i64;
    }
    total_bombs *= module.i64("numShots")?;
    Ok(DepthCharges {
        reload,
        ammo,
        bombs: total_bombs,
        groups: module.i64("maxPacks")?,
    })
}

fn unpack_pinger(module: NodeRef<'_>) -> IResult<Pinger> {
    let sectors = module.list("sectorParams")?;
    if sectors.len() != 2 {
        return Err(ErrorKind::PingerSectorCount(sectors.len()).into());
    }
    let lifetime = |index: usize| -> IResult<f64> {
        sectors[index]
            .as_object()
            .and_then(|sector| sector.get("lifetime"))
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                ErrorKind::UnexpectedFieldType {
                    node: module.name().to_string(),
                    field: "sectorParams".to_string(),
                    expected: "list of dicts with a numeric lifetime",
                }
                .into()
            })
    };

    let wave_speed = module
        .list("waveParams")?
        .first()
        .and_then(Value::as_object)
        .and_then(|params| params.get("waveSpeed"))
        .and_then(Value::as_array)
        .and_then(|speeds| speeds.first())
        .and_then(Value::as_f64)
        .ok_or_else(|| ErrorKind::UnexpectedFieldType {
            node: module.name().to_string(),
            field: "waveParams".to_string(),
            expected: "list of dicts with a waveSpeed list",
        })?;

    Ok(Pinger {
        reload: module.f64("waveReloadTime")?,
        range: module.f64("waveDistance")?,
        lifetime1: lifetime(0)?,
        lifetime2: lifetime(1)?,
        speed: wave_speed,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game_params::RawGraph;
    use serde_json::json;

    fn hull_fields(flood: f64) -> Value {
        json!({
            "health": 17100.0,
            "floodNodes": [[flood, 0.5, 180.0]],
            "visibilityFactor": 6.7,
            "visibilityFactorByPlane": 4.1,
            "visibilityCoefGKInSmoke": 2.1,
            "visibilityCoefGKByPlane": 1.8,
            "visibilityFactorsBySubmarine": {"PERISCOPE": 5.2, "DEEP": 0.0},
            "visibilityCoefFire": 2.0,
            "visibilityCoefFireByPlane": 3.0,
            "maxSpeed": 35.5,
            "turningRadius": 610.0,
            "rudderTime": 7.7,
        })
    }

    fn ship_with(component: &str, fields: Value) -> RawGraph {
        RawGraph::from_value(json!({"PASD001_Ship": {(component): fields}})).unwrap()
    }

    fn unpack(
        graph: &RawGraph,
        component: &str,
        kind: ComponentType,
    ) -> IResult<Option<Component>> {
        let ship = graph.get("PASD001_Ship").unwrap();
        let mut lang_keys = LangKeys::default();
        unpack_component(ship, component, kind, &mut lang_keys)
    }

    #[test]
    fn hull_torpedo_protection_gates() {
        // 100 - 0.002 * 300 = 99.4, included
        let graph = ship_with("A_Hull", hull_fields(0.002));
        let Some(Component::Hull(hull)) = unpack(&graph, "A_Hull", ComponentType::Hull).unwrap()
        else {
            panic!("expected hull");
        };
        assert_eq!(hull.protection, Some(99.4));
        assert_eq!(hull.mobility.rudder_time, round1(7.7 / 1.305));
        assert!(hull.submarine_battery.is_none());
        assert!(hull.visibility.coeff_sea_underwater.is_none());

        // 100 - 0.005 * 300 = 98.5, still included
        let graph = ship_with("A_Hull", hull_fields(0.005));
        let Some(Component::Hull(hull)) = unpack(&graph, "A_Hull", ComponentType::Hull).unwrap()
        else {
            panic!("expected hull");
        };
        assert_eq!(hull.protection, Some(98.5));

        // 100 - 0.34 * 300 < 1, omitted entirely
        let graph = ship_with("A_Hull", hull_fields(0.34));
        let Some(Component::Hull(hull)) = unpack(&graph, "A_Hull", ComponentType::Hull).unwrap()
        else {
            panic!("expected hull");
        };
        assert_eq!(hull.protection, None);
    }

    #[test]
    fn submarine_hull_extras() {
        let mut fields = hull_fields(0.002);
        let extra = fields.as_object_mut().unwrap();
        extra.insert(
            "SubmarineBattery".to_string(),
            json!({"capacity": 240.0, "regenRate": 0.5}),
        );
        extra.insert(
            "buoyancyStates".to_string(),
            json!({"DEEP_WATER_INVUL": [2.0, 0.4], "PERISCOPE": [1.0, 0.8]}),
        );
        extra.insert("visibilityCoeffUnderwaterDepths".to_string(), json!(0.1));

        let graph = ship_with("A_Hull", fields);
        let Some(Component::Hull(hull)) = unpack(&graph, "A_Hull", ComponentType::Hull).unwrap()
        else {
            panic!("expected hull");
        };
        assert_eq!(hull.mobility.speed_underwater, Some(round1(35.5 * 0.4)));
        let battery = hull.submarine_battery.unwrap();
        assert_eq!(battery.capacity, 240.0);
        assert_eq!(battery.regen, 0.5);
        assert_eq!(hull.visibility.coeff_sea_underwater, Some(0.1));
    }

    fn artillery_fields() -> Value {
        json!({
            "maxDist": 12500.0,
            "sigmaCount": 2.0,
            "HP_AGM_1": {
                "shotDelay": 30.0,
                "rotationSpeed": [6.0],
                "numBarrels": 2,
                "ammoList": ["PJSA001_HE", "PJSA002_AP"],
                "vertSector": [-5.0, 45.0],
            },
            "HP_AGM_2": {
                "shotDelay": 30.0,
                "rotationSpeed": [6.0],
                "numBarrels": 2,
                "ammoList": ["PJSA001_HE", "PJSA002_AP"],
                "vertSector": [-5.0, 45.0],
            },
            "HP_AGM_3": {
                "shotDelay": 22.0,
                "rotationSpeed": [6.0],
                "numBarrels": 3,
                "ammoList": ["PJSA001_HE"],
            },
        })
    }

    #[test]
    fn battery_guns_are_merged() {
        let graph = ship_with("AB1_Artillery", artillery_fields());
        let Some(Component::Battery(battery)) =
            unpack(&graph, "AB1_Artillery", ComponentType::Artillery).unwrap()
        else {
            panic!("expected battery");
        };
        assert_eq!(battery.range, 12500.0);
        assert_eq!(battery.guns.len(), 2);
        let total: u32 = battery.guns.iter().map(|g| g.count).sum();
        assert_eq!(total, 3);
        assert_eq!(battery.guns[0].inner.rotation, 30.0);
        assert_eq!(battery.guns[0].inner.vert_sector, Some(45.0));
        assert!(battery.burst.is_none());
        assert!(battery.air_defense.is_empty());
    }

    #[test]
    fn ranged_aura_and_bubble() {
        let fields = json!({
            "AuraFar1": {
                "type": "far",
                "minDistance": 100.0,
                "maxDistance": 5200.0,
                "areaDamage": 123.0,
                "areaDamagePeriod": 2.86,
                "hitChance": 0.75,
                "guns": ["HP_AA_1", "HP_AA_2"],
            },
            "AuraNear1": {
                "type": "near",
                "minDistance": 0.0,
                "maxDistance": 3100.0,
                "areaDamage": 0.0,
                "innerBubbleCount": 4,
                "outerBubbleCount": 2,
                "shotDelay": 5.0,
                "hitChance": 0.9,
                "shotTravelTime": 3.0,
                "bubbleDamage": 1000.0,
            },
            "HP_AA_1": {"name": "AA_25mm", "numBarrels": 2, "shotDelay": 1.0},
            "HP_AA_2": {"name": "AA_25mm", "numBarrels": 2, "shotDelay": 1.0},
        });
        let graph = ship_with("AAD", fields);
        let Some(Component::AirDefense(ad)) =
            unpack(&graph, "AAD", ComponentType::AirDefense).unwrap()
        else {
            panic!("expected air defense");
        };

        let bubbles = ad.bubbles.as_ref().unwrap();
        assert_eq!(bubbles.damage, 7000.0);
        assert_eq!(bubbles.inner, 4);
        assert_eq!(bubbles.min_range, 0.0);
        assert_eq!(bubbles.max_range, 3.1);

        assert_eq!(ad.far.len(), 1);
        let far = &ad.far[0];
        assert_eq!(far.dps, round1(123.0 / 2.86));
        assert_eq!(far.rof, 2.86);
        assert_eq!(far.guns.len(), 1);
        assert_eq!(far.guns[0].count, 2);
        assert_eq!(far.guns[0].inner.name, "IDS_AA_25MM");
        assert!(ad.medium.is_empty());
    }

    #[test]
    fn aura_outside_all_buckets_is_fatal() {
        let fields = json!({
            "AuraMystery": {
                "type": "far",
                "minDistance": 100.0,
                "maxDistance": 5200.0,
                "areaDamage": 123.0,
                "areaDamagePeriod": 2.86,
                "hitChance": 0.75,
                "guns": [],
            },
        });
        let graph = ship_with("AAD", fields);
        let err = unpack(&graph, "AAD", ComponentType::AirDefense).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownAuraBucket(ref key) if key == "AuraMystery"));
    }

    #[test]
    fn depth_charges_total_bombs() {
        let fields = json!({
            "reloadTime": 40.0,
            "numShots": 2,
            "maxPacks": 2,
            "HP_DC_1": {"ammoList": ["PWDC001"], "numBombs": 2},
            "HP_DC_2": {"ammoList": ["PWDC002"], "numBombs": 3},
        });
        let graph = ship_with("DCharges", fields);
        let Some(Component::DepthCharges(dc)) =
            unpack(&graph, "DCharges", ComponentType::DepthCharges).unwrap()
        else {
            panic!("expected depth charges");
        };
        // (2 + 3) * 2 shots; ammo comes from the first launcher only
        assert_eq!(dc.bombs, 10);
        assert_eq!(dc.ammo.as_deref(), Some("PWDC001"));
        assert_eq!(dc.groups, 2);
    }

    #[test]
    fn pinger_requires_two_sectors() {
        let fields = json!({
            "waveReloadTime": 10.0,
            "waveDistance": 6000.0,
            "sectorParams": [{"lifetime": 40.0}],
            "waveParams": [{"waveSpeed": [500.0]}],
        });
        let graph = ship_with("Pinger", fields);
        let err = unpack(&graph, "Pinger", ComponentType::Pinger).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::PingerSectorCount(1)));

        let fields = json!({
            "waveReloadTime": 10.0,
            "waveDistance": 6000.0,
            "sectorParams": [{"lifetime": 40.0}, {"lifetime": 110.0}],
            "waveParams": [{"waveSpeed": [500.0]}],
        });
        let graph = ship_with("Pinger", fields);
        let Some(Component::Pinger(pinger)) =
            unpack(&graph, "Pinger", ComponentType::Pinger).unwrap()
        else {
            panic!("expected pinger");
        };
        assert_eq!(pinger.lifetime1, 40.0);
        assert_eq!(pinger.lifetime2, 110.0);
        assert_eq!(pinger.speed, 500.0);
    }

    #[test]
    fn zero_speed_engine_unpacks_to_nothing() {
        let graph = ship_with("AB1_Engine", json!({"speedCoef": 0.0}));
        assert!(unpack(&graph, "AB1_Engine", ComponentType::Engine)
            .unwrap()
            .is_none());

        let graph = ship_with("AB1_Engine", json!({"speedCoef": 0.05}));
        let Some(Component::Engine(engine)) =
            unpack(&graph, "AB1_Engine", ComponentType::Engine).unwrap()
        else {
            panic!("expected engine");
        };
        assert_eq!(engine.speed_coef, 0.05);
    }

    #[test]
    fn unmodeled_tags_unpack_to_nothing() {
        let graph = ship_with("AB1_Radars", json!({"anything": 1}));
        assert!(unpack(&graph, "AB1_Radars", ComponentType::Radars)
            .unwrap()
            .is_none());
    }

    #[test]
    fn squadron_planes_pass_through() {
        let graph = ship_with("AB1_TorpedoBomber", json!({"planes": ["PAUB001_Plane"]}));
        let Some(Component::Raw(planes)) =
            unpack(&graph, "AB1_TorpedoBomber", ComponentType::TorpedoBomber).unwrap()
        else {
            panic!("expected raw planes");
        };
        assert_eq!(planes, json!(["PAUB001_Plane"]));
    }
}
