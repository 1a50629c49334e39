//! Unpacks aircraft. Squadron planes (fighters, bombers, skip bombers,
//! scouts, dive bombers) carry the full rework sub-record; airships and
//! auxiliaries are header-only.

use bon::Builder;
use serde::Serialize;

use crate::error::{ErrorKind, IResult};
use crate::game_params::NodeRef;
use crate::game_params::keys;
use crate::game_params::types::Species;
use crate::recognized::Recognized;
use crate::unpack::helpers::{Consumable, ids, unpack_consumables};
use crate::unpack::registry::LangKeys;

/// Carrier-rework squadron data, present when the plane has a hangar.
#[derive(Clone, Debug, PartialEq, Serialize, Builder)]
pub struct Squadron {
    #[serde(rename = "restoreTime")]
    pub restore_time: f64,
    #[serde(rename = "maxAircraft")]
    pub max_aircraft: i64,
    pub attacker: i64,
    #[serde(rename = "attackCount")]
    pub attack_count: i64,
    pub cooldown: f64,
    #[serde(rename = "minSpeed")]
    pub min_speed: f64,
    #[serde(rename = "maxSpeed")]
    pub max_speed: f64,
    #[serde(rename = "boostTime")]
    pub boost_time: f64,
    #[serde(rename = "boostReload", skip_serializing_if = "Option::is_none")]
    pub boost_reload: Option<f64>,
    #[serde(rename = "bombName")]
    pub bomb_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumables: Option<Vec<Vec<Consumable>>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Builder)]
pub struct AircraftRecord {
    #[serde(rename = "type")]
    pub species: String,
    pub nation: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<f64>,
    #[serde(rename = "totalPlanes", skip_serializing_if = "Option::is_none")]
    pub total_planes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aircraft: Option<Squadron>,
}

pub fn unpack_aircraft(
    aircraft: NodeRef<'_>,
    lang_keys: &mut LangKeys,
) -> IResult<AircraftRecord> {
    let typeinfo = aircraft.typeinfo()?;
    let name = ids(aircraft.name());
    lang_keys.add(name.clone());

    let species = match Species::from_name(typeinfo.species) {
        Recognized::Known(species) => species,
        Recognized::Unknown(raw) => return Err(ErrorKind::UnknownAircraftType(raw).into()),
    };

    let mut record = AircraftRecord::builder()
        .species(typeinfo.species.to_string())
        .nation(typeinfo.nation.to_string())
        .name(name)
        .build();

    match species {
        Species::Fighter | Species::Bomber | Species::Skip | Species::Scout | Species::Dive => {
            let hangar = aircraft.dict("hangarSettings")?;
            let max_aircraft = hangar.i64("maxValue")?;
            record.health = Some(aircraft.f64("maxHealth")?);
            record.total_planes = Some(aircraft.i64("numPlanesInSquadron")?);
            record.visibility = Some(aircraft.f64("visibilityFactor")?);
            record.speed = Some(aircraft.f64("speedMoveWithBomb")?);

            if max_aircraft > 0 {
                let boost_time = aircraft.f64("maxForsageAmount")?;
                // Super carriers have no boost regeneration at all.
                let boost_regen = aircraft.f64("forsageRegeneration")?;
                let boost_reload = (boost_regen != 0.0).then(|| boost_time / boost_regen);

                let consumables = unpack_consumables(aircraft.dict(keys::PLANE_ABILITIES)?)?;
                let consumables = (!consumables.is_empty()).then_some(consumables);

                record.aircraft = Some(
                    Squadron::builder()
                        .restore_time(hangar.f64("timeToRestore")?)
                        .max_aircraft(max_aircraft)
                        .attacker(aircraft.i64("attackerSize")?)
                        .attack_count(aircraft.i64("attackCount")?)
                        .cooldown(aircraft.f64("attackCooldown")?)
                        .min_speed(aircraft.f64("speedMin")?)
                        .max_speed(aircraft.f64("speedMax")?)
                        .boost_time(boost_time)
                        .maybe_boost_reload(boost_reload)
                        .bomb_name(aircraft.str("bombName")?.to_string())
                        .maybe_consumables(consumables)
                        .build(),
                );
            }
        }
        // Recognized but not modeled.
        Species::Airship | Species::Auxiliary => {}
        other => return Err(ErrorKind::UnknownAircraftType(other.name().to_string()).into()),
    }

    Ok(record)
}
