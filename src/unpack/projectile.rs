//! Unpacks projectiles: shells, bombs, rockets, torpedoes and depth
//! charges. Dispatch over the species tag is closed; Mine, Laser,
//! PlaneTracer and Wave are recognized but produce header-only records.

use bon::Builder;
use serde::Serialize;

use crate::error::{ErrorKind, IResult};
use crate::game_params::NodeRef;
use crate::game_params::types::Species;
use crate::recognized::Recognized;
use crate::unpack::helpers::ids;
use crate::unpack::registry::LangKeys;

/// Overmatch divisor: a shell overmatches armor thinner than
/// `caliber / 14.3`.
const OVERMATCH_DIVISOR: f64 = 14.3;

/// Inputs for client-side AP penetration curves.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApInfo {
    pub diameter: f64,
    pub weight: f64,
    pub drag: f64,
    pub velocity: f64,
    pub krupp: f64,
}

/// Shared shape for shell-like projectiles (artillery, bombs, skip bombs,
/// rockets).
#[derive(Clone, Debug, PartialEq, Serialize, Builder)]
pub struct ShellInfo {
    #[serde(rename = "ammoType")]
    pub ammo_type: String,
    pub speed: f64,
    pub weight: f64,
    #[serde(rename = "penSAP", skip_serializing_if = "Option::is_none")]
    pub pen_sap: Option<f64>,
    #[serde(rename = "penHE", skip_serializing_if = "Option::is_none")]
    pub pen_he: Option<f64>,
    pub damage: f64,
    #[serde(rename = "burnChance", skip_serializing_if = "Option::is_none")]
    pub burn_chance: Option<f64>,
    #[serde(rename = "ricochetAngle", skip_serializing_if = "Option::is_none")]
    pub ricochet_angle: Option<f64>,
    #[serde(rename = "ricochetAlways", skip_serializing_if = "Option::is_none")]
    pub ricochet_always: Option<f64>,
    pub diameter: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ap: Option<ApInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overmatch: Option<u32>,
    #[serde(rename = "fuseTime", skip_serializing_if = "Option::is_none")]
    pub fuse_time: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Builder)]
pub struct TorpedoInfo {
    pub speed: f64,
    pub visibility: f64,
    pub range: f64,
    #[serde(rename = "floodChance")]
    pub flood_chance: f64,
    #[serde(rename = "alphaDamage")]
    pub alpha_damage: f64,
    pub damage: f64,
    #[serde(rename = "deepWater")]
    pub deep_water: bool,
    #[serde(rename = "ignoreClasses", skip_serializing_if = "Vec::is_empty")]
    pub ignore_classes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DepthChargeInfo {
    pub damage: f64,
    #[serde(rename = "burnChance")]
    pub burn_chance: f64,
    #[serde(rename = "floodChance")]
    pub flood_chance: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ProjectileData {
    Torpedo(TorpedoInfo),
    Shell(ShellInfo),
    DepthCharge(DepthChargeInfo),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProjectileRecord {
    #[serde(rename = "type")]
    pub species: String,
    pub nation: String,
    pub name: String,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub data: Option<ProjectileData>,
}

pub fn unpack_projectile(
    projectile: NodeRef<'_>,
    lang_keys: &mut LangKeys,
) -> IResult<ProjectileRecord> {
    let typeinfo = projectile.typeinfo()?;
    let name = ids(projectile.name());
    lang_keys.add(name.clone());

    let species = match Species::from_name(typeinfo.species) {
        Recognized::Known(species) => species,
        Recognized::Unknown(raw) => {
            return Err(ErrorKind::UnknownProjectileType(raw).into());
        }
    };

    let data = match species {
        Species::Torpedo => Some(ProjectileData::Torpedo(unpack_torpedo(projectile)?)),
        Species::Artillery | Species::Bomb | Species::SkipBomb | Species::Rocket => {
            Some(ProjectileData::Shell(unpack_shell(projectile)?))
        }
        Species::DepthCharge => Some(ProjectileData::DepthCharge(DepthChargeInfo {
            damage: projectile.f64("alphaDamage")?,
            burn_chance: projectile.f64("burnProb")?,
            flood_chance: projectile.f64("uwCritical")? * 100.0,
        })),
        // Recognized but not yet modeled: header fields only.
        Species::Mine | Species::Laser | Species::PlaneTracer | Species::Wave => None,
        other => return Err(ErrorKind::UnknownProjectileType(other.name().to_string()).into()),
    };

    Ok(ProjectileRecord {
        species: typeinfo.species.to_string(),
        nation: typeinfo.nation.to_string(),
        name,
        data,
    })
}

fn unpack_torpedo(projectile: NodeRef<'_>) -> IResult<TorpedoInfo> {
    Ok(TorpedoInfo::builder()
        .speed(projectile.f64("speed")?)
        .visibility(projectile.f64("visibilityFactor")?)
        .range(projectile.f64("maxDist")?)
        .flood_chance(projectile.f64("uwCritical")? * 100.0)
        .alpha_damage(projectile.f64("alphaDamage")?)
        .damage(projectile.f64("damage")?)
        .deep_water(projectile.bool("isDeepWater")?)
        .ignore_classes(projectile.str_list("ignoreClasses")?)
        .build())
}

/// Unpack a shell-like projectile. Penetration and fire fields are included
/// only when meaningful; AP rounds additionally carry the penetration-input
/// sub-record and the overmatch threshold.
fn unpack_shell(projectile: NodeRef<'_>) -> IResult<ShellInfo> {
    let ammo_type = projectile.str("ammoType")?;
    let diameter = projectile.f64("bulletDiametr")?;

    let pen_sap = Some(projectile.f64("alphaPiercingCS")?).filter(|pen| *pen > 0.0);
    let pen_he = Some(projectile.f64("alphaPiercingHE")?).filter(|pen| *pen > 0.0);
    // AP and SAP cannot start fires.
    let burn_chance = Some(projectile.f64("burnProb")?).filter(|chance| *chance > 0.0);

    // Above 90 degrees the shell can never ricochet; both angles are
    // omitted together.
    let ricochet_angle = Some(projectile.f64("bulletRicochetAt")?).filter(|angle| *angle <= 90.0);
    let ricochet_always = match ricochet_angle {
        Some(_) => Some(projectile.f64("bulletAlwaysRicochetAt")?),
        None => None,
    };

    let mut shell = ShellInfo::builder()
        .ammo_type(ammo_type.to_string())
        .speed(projectile.f64("bulletSpeed")?)
        .weight(projectile.f64("bulletMass")?)
        .maybe_pen_sap(pen_sap)
        .maybe_pen_he(pen_he)
        .damage(projectile.f64("alphaDamage")?)
        .maybe_burn_chance(burn_chance)
        .maybe_ricochet_angle(ricochet_angle)
        .maybe_ricochet_always(ricochet_always)
        .diameter(diameter)
        .build();

    if ammo_type == "AP" {
        shell.ap = Some(ApInfo {
            diameter,
            weight: projectile.f64("bulletMass")?,
            drag: projectile.f64("bulletAirDrag")?,
            velocity: projectile.f64("bulletSpeed")?,
            krupp: projectile.f64("bulletKrupp")?,
        });
        // The client compares against the threshold directly, so the
        // fraction truncates rather than rounds.
        shell.overmatch = Some((diameter * 1000.0 / OVERMATCH_DIVISOR) as u32);
        shell.fuse_time = Some(projectile.f64("bulletDetonator")?);
    }

    Ok(shell)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::game_params::RawGraph;
    use serde_json::json;

    fn shell_node(ammo_type: &str, diameter: f64, ricochet: f64) -> serde_json::Value {
        json!({
            "typeinfo": {"type": "Projectile", "nation": "Japan", "species": "Artillery"},
            "ammoType": ammo_type,
            "bulletSpeed": 805.0,
            "bulletMass": 1460.0,
            "alphaPiercingCS": 0.0,
            "alphaPiercingHE": 0.0,
            "alphaDamage": 14800.0,
            "burnProb": 0.0,
            "bulletRicochetAt": ricochet,
            "bulletAlwaysRicochetAt": 60.0,
            "bulletDiametr": diameter,
            "bulletAirDrag": 0.292,
            "bulletKrupp": 2574.0,
            "bulletDetonator": 0.033,
        })
    }

    fn unpack(node: serde_json::Value) -> IResult<ProjectileRecord> {
        let graph = RawGraph::from_value(json!({"PJSA001_Test": node})).unwrap();
        let mut lang_keys = LangKeys::default();
        unpack_projectile(graph.get("PJSA001_Test").unwrap(), &mut lang_keys)
    }

    #[test]
    fn ap_overmatch_truncates() {
        let record = unpack(shell_node("AP", 0.305, 45.0)).unwrap();
        let Some(ProjectileData::Shell(shell)) = record.data else {
            panic!("expected shell");
        };
        assert_eq!(shell.overmatch, Some(21));
        assert!(shell.ap.is_some());
        assert_eq!(shell.fuse_time, Some(0.033));
        assert_eq!(shell.ricochet_angle, Some(45.0));
        assert_eq!(shell.ricochet_always, Some(60.0));
        // Zero-valued penetrations and burn chance stay out of the record.
        assert!(shell.pen_he.is_none());
        assert!(shell.burn_chance.is_none());
    }

    #[test]
    fn high_ricochet_angle_is_omitted() {
        let record = unpack(shell_node("HE", 0.152, 91.0)).unwrap();
        let Some(ProjectileData::Shell(shell)) = record.data else {
            panic!("expected shell");
        };
        assert!(shell.ricochet_angle.is_none());
        assert!(shell.ricochet_always.is_none());
        assert!(shell.ap.is_none());
        assert!(shell.overmatch.is_none());
    }

    #[test]
    fn torpedo_fields() {
        let record = unpack(json!({
            "typeinfo": {"type": "Projectile", "nation": "Japan", "species": "Torpedo"},
            "speed": 67.0,
            "visibilityFactor": 1.7,
            "maxDist": 666.65,
            "uwCritical": 0.33,
            "alphaDamage": 7233.0,
            "damage": 14400.0,
            "isDeepWater": true,
            "ignoreClasses": ["Destroyer", "Cruiser"],
        }))
        .unwrap();
        let Some(ProjectileData::Torpedo(torpedo)) = record.data else {
            panic!("expected torpedo");
        };
        assert_eq!(torpedo.flood_chance, 33.0);
        assert!(torpedo.deep_water);
        assert_eq!(torpedo.ignore_classes.len(), 2);
    }

    #[test]
    fn unmodeled_species_keep_header_only() {
        let record = unpack(json!({
            "typeinfo": {"type": "Projectile", "nation": "Japan", "species": "Mine"},
        }))
        .unwrap();
        assert!(record.data.is_none());
        assert_eq!(record.species, "Mine");
        assert_eq!(record.name, "IDS_PJSA001_TEST");
    }

    #[test]
    fn unknown_species_is_fatal() {
        let err = unpack(json!({
            "typeinfo": {"type": "Projectile", "nation": "Japan", "species": "Phaser"},
        }))
        .unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnknownProjectileType(ref tag) if tag == "Phaser"));
    }
}
