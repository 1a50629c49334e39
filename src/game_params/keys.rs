//! Constants for GameParams dictionary keys.

use crate::recognized::Recognized;

// typeinfo keys
pub const TYPEINFO: &str = "typeinfo";
pub const TYPEINFO_TYPE: &str = "type";
pub const TYPEINFO_NATION: &str = "nation";
pub const TYPEINFO_SPECIES: &str = "species";

// Param identity keys
pub const PARAM_ID: &str = "id";
pub const PARAM_INDEX: &str = "index";
pub const PARAM_NAME: &str = "name";

// Ship top-level keys
pub const SHIP_UPGRADE_INFO: &str = "ShipUpgradeInfo";
pub const SHIP_ABILITIES: &str = "ShipAbilities";
pub const PLANE_ABILITIES: &str = "PlaneAbilities";

// Upgrade dict keys
pub const UC_TYPE: &str = "ucType";
pub const PREV: &str = "prev";
pub const NEXT_SHIPS: &str = "nextShips";
pub const COMPONENTS: &str = "components";

// Economic cost keys
pub const COST_CR: &str = "costCR";
pub const COST_GOLD: &str = "costGold";
pub const COST_XP: &str = "costXP";

// HP_ mount prefix
pub const HP_PREFIX: &str = "HP_";

// Data field keys
pub const AMMO_LIST: &str = "ammoList";
pub const MAX_DIST: &str = "maxDist";
pub const SHOT_DELAY: &str = "shotDelay";
pub const NUM_BARRELS: &str = "numBarrels";

/// Module type tags, as keyed inside an upgrade's `components` mapping.
///
/// The set is closed: `from_key` preserves an unrecognized tag so the
/// component dispatch can abort the run naming it, rather than skipping
/// silently over game data whose shape has drifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ComponentType {
    #[serde(rename = "hull")]
    Hull,
    #[serde(rename = "artillery")]
    Artillery,
    #[serde(rename = "atba")]
    Atba,
    #[serde(rename = "torpedoes")]
    Torpedoes,
    #[serde(rename = "airDefense")]
    AirDefense,
    #[serde(rename = "airSupport")]
    AirSupport,
    #[serde(rename = "depthCharges")]
    DepthCharges,
    #[serde(rename = "fireControl")]
    FireControl,
    #[serde(rename = "flightControl")]
    FlightControl,
    #[serde(rename = "torpedoBomber")]
    TorpedoBomber,
    #[serde(rename = "diveBomber")]
    DiveBomber,
    #[serde(rename = "fighter")]
    Fighter,
    #[serde(rename = "skipBomber")]
    SkipBomber,
    #[serde(rename = "pinger")]
    Pinger,
    #[serde(rename = "engine")]
    Engine,
    #[serde(rename = "specials")]
    Specials,
    #[serde(rename = "airArmament")]
    AirArmament,
    #[serde(rename = "radars")]
    Radars,
    #[serde(rename = "chargeLasers")]
    ChargeLasers,
    #[serde(rename = "waves")]
    Waves,
    #[serde(rename = "axisLaser")]
    AxisLaser,
    #[serde(rename = "abilities")]
    Abilities,
    #[serde(rename = "directors")]
    Directors,
    #[serde(rename = "finders")]
    Finders,
    #[serde(rename = "wcs")]
    Wcs,
}

impl ComponentType {
    pub fn from_key(key: &str) -> Recognized<Self> {
        match key {
            "hull" => Recognized::Known(Self::Hull),
            "artillery" => Recognized::Known(Self::Artillery),
            "atba" => Recognized::Known(Self::Atba),
            "torpedoes" => Recognized::Known(Self::Torpedoes),
            "airDefense" => Recognized::Known(Self::AirDefense),
            "airSupport" => Recognized::Known(Self::AirSupport),
            "depthCharges" => Recognized::Known(Self::DepthCharges),
            "fireControl" => Recognized::Known(Self::FireControl),
            "flightControl" => Recognized::Known(Self::FlightControl),
            "torpedoBomber" => Recognized::Known(Self::TorpedoBomber),
            "diveBomber" => Recognized::Known(Self::DiveBomber),
            "fighter" => Recognized::Known(Self::Fighter),
            "skipBomber" => Recognized::Known(Self::SkipBomber),
            "pinger" => Recognized::Known(Self::Pinger),
            "engine" => Recognized::Known(Self::Engine),
            "specials" => Recognized::Known(Self::Specials),
            "airArmament" => Recognized::Known(Self::AirArmament),
            "radars" => Recognized::Known(Self::Radars),
            "chargeLasers" => Recognized::Known(Self::ChargeLasers),
            "waves" => Recognized::Known(Self::Waves),
            "axisLaser" => Recognized::Known(Self::AxisLaser),
            "abilities" => Recognized::Known(Self::Abilities),
            "directors" => Recognized::Known(Self::Directors),
            "finders" => Recognized::Known(Self::Finders),
            "wcs" => Recognized::Known(Self::Wcs),
            other => Recognized::Unknown(other.to_string()),
        }
    }

    /// The raw string key used in GameParams dictionaries.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Hull => "hull",
            Self::Artillery => "artillery",
            Self::Atba => "atba",
            Self::Torpedoes => "torpedoes",
            Self::AirDefense => "airDefense",
            Self::AirSupport => "airSupport",
            Self::DepthCharges => "depthCharges",
            Self::FireControl => "fireControl",
            Self::FlightControl => "flightControl",
            Self::TorpedoBomber => "torpedoBomber",
            Self::DiveBomber => "diveBomber",
            Self::Fighter => "fighter",
            Self::SkipBomber => "skipBomber",
            Self::Pinger => "pinger",
            Self::Engine => "engine",
            Self::Specials => "specials",
            Self::AirArmament => "airArmament",
            Self::Radars => "radars",
            Self::ChargeLasers => "chargeLasers",
            Self::Waves => "waves",
            Self::AxisLaser => "axisLaser",
            Self::Abilities => "abilities",
            Self::Directors => "directors",
            Self::Finders => "finders",
            Self::Wcs => "wcs",
        }
    }
}

impl std::fmt::Display for ComponentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn key_round_trips() {
        for key in ["hull", "atba", "depthCharges", "wcs"] {
            let ct = ComponentType::from_key(key).into_known().unwrap();
            assert_eq!(ct.key(), key);
        }
    }

    #[test]
    fn unknown_tag_is_preserved() {
        let parsed = ComponentType::from_key("mysteryModule");
        assert_eq!(parsed.into_unknown().unwrap(), "mysteryModule");
    }
}
