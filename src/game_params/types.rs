use variantly::Variantly;

use crate::recognized::Recognized;

/// Numeric ID assigned to every GameParams entity.
pub type GameParamId = u64;

/// Top-level entity categories the engine consumes.
///
/// `typeinfo.type` values outside this set are skipped by the dispatcher;
/// the raw graph carries many categories (missions, dog tags, weather, ...)
/// with no normalized representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Ship,
    Achievement,
    Exterior,
    Modernization,
    Crew,
    Gun,
    Projectile,
    Aircraft,
    Ability,
}

impl ParamType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Ship" => Some(Self::Ship),
            "Achievement" => Some(Self::Achievement),
            "Exterior" => Some(Self::Exterior),
            "Modernization" => Some(Self::Modernization),
            "Crew" => Some(Self::Crew),
            "Gun" => Some(Self::Gun),
            "Projectile" => Some(Self::Projectile),
            "Aircraft" => Some(Self::Aircraft),
            "Ability" => Some(Self::Ability),
            _ => None,
        }
    }
}

/// `typeinfo.species` values meaningful to the engine.
///
/// Ship classes, projectile subtypes, aircraft subtypes and exterior
/// subtypes share the species namespace in the raw graph. Dispatch sites
/// match on the variants they consume and convert anything else into a
/// typed fatal error (projectiles, aircraft) or pass the raw string
/// through (ships, exteriors).
#[derive(Clone, Copy, Debug, Variantly, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Species {
    AirCarrier,
    Airship,
    Artillery,
    Auxiliary,
    Battleship,
    Bomb,
    Bomber,
    Camouflage,
    Cruiser,
    DepthCharge,
    Destroyer,
    Dive,
    Ensign,
    Fighter,
    Flags,
    Laser,
    MSkin,
    Mine,
    Permoflage,
    PlaneTracer,
    Rocket,
    Scout,
    Skip,
    SkipBomb,
    Skin,
    Submarine,
    Torpedo,
    Wave,
}

impl Species {
    pub fn from_name(name: &str) -> Recognized<Self> {
        match name {
            "AirCarrier" => Recognized::Known(Self::AirCarrier),
            "Airship" => Recognized::Known(Self::Airship),
            "Artillery" => Recognized::Known(Self::Artillery),
            "Auxiliary" => Recognized::Known(Self::Auxiliary),
            "Battleship" => Recognized::Known(Self::Battleship),
            "Bomb" => Recognized::Known(Self::Bomb),
            "Bomber" => Recognized::Known(Self::Bomber),
            "Camouflage" => Recognized::Known(Self::Camouflage),
            "Cruiser" => Recognized::Known(Self::Cruiser),
            "DepthCharge" => Recognized::Known(Self::DepthCharge),
            "Destroyer" => Recognized::Known(Self::Destroyer),
            "Dive" => Recognized::Known(Self::Dive),
            "Ensign" => Recognized::Known(Self::Ensign),
            "Fighter" => Recognized::Known(Self::Fighter),
            "Flags" => Recognized::Known(Self::Flags),
            "Laser" => Recognized::Known(Self::Laser),
            "MSkin" => Recognized::Known(Self::MSkin),
            "Mine" => Recognized::Known(Self::Mine),
            "Permoflage" => Recognized::Known(Self::Permoflage),
            "PlaneTracer" => Recognized::Known(Self::PlaneTracer),
            "Rocket" => Recognized::Known(Self::Rocket),
            "Scout" => Recognized::Known(Self::Scout),
            "Skip" => Recognized::Known(Self::Skip),
            "SkipBomb" => Recognized::Known(Self::SkipBomb),
            "Skin" => Recognized::Known(Self::Skin),
            "Submarine" => Recognized::Known(Self::Submarine),
            "Torpedo" => Recognized::Known(Self::Torpedo),
            "Wave" => Recognized::Known(Self::Wave),
            other => Recognized::Unknown(other.to_string()),
        }
    }

    pub const fn name(&self) -> &'static str {
        match self {
            Self::AirCarrier => "AirCarrier",
            Self::Airship => "Airship",
            Self::Artillery => "Artillery",
            Self::Auxiliary => "Auxiliary",
            Self::Battleship => "Battleship",
            Self::Bomb => "Bomb",
            Self::Bomber => "Bomber",
            Self::Camouflage => "Camouflage",
            Self::Cruiser => "Cruiser",
            Self::DepthCharge => "DepthCharge",
            Self::Destroyer => "Destroyer",
            Self::Dive => "Dive",
            Self::Ensign => "Ensign",
            Self::Fighter => "Fighter",
            Self::Flags => "Flags",
            Self::Laser => "Laser",
            Self::MSkin => "MSkin",
            Self::Mine => "Mine",
            Self::Permoflage => "Permoflage",
            Self::PlaneTracer => "PlaneTracer",
            Self::Rocket => "Rocket",
            Self::Scout => "Scout",
            Self::Skip => "Skip",
            Self::SkipBomb => "SkipBomb",
            Self::Skin => "Skin",
            Self::Submarine => "Submarine",
            Self::Torpedo => "Torpedo",
            Self::Wave => "Wave",
        }
    }
}

impl std::fmt::Display for Species {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn species_name_round_trips() {
        for name in ["Torpedo", "SkipBomb", "AirCarrier", "Ensign"] {
            let species = Species::from_name(name).into_known().unwrap();
            assert_eq!(species.name(), name);
        }
    }

    #[test]
    fn unconsumed_categories_are_none() {
        assert!(ParamType::from_name("Mission").is_none());
        assert!(ParamType::from_name("DogTagItem").is_none());
        assert_eq!(ParamType::from_name("Ship"), Some(ParamType::Ship));
    }
}
