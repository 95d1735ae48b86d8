//! Resolution of engine-configured unit shorthands into [`UnitClass`] values.

use serde::Deserialize;
use thiserror::Error;

use crate::UnitClass;

/// Subset of the engine's match configuration consumed by the agent.
#[derive(Clone, Debug, Deserialize)]
pub struct GameConfig {
    /// Unit descriptors, listed in the engine's fixed class order.
    #[serde(rename = "unitInformation")]
    pub unit_information: Vec<UnitInformation>,
}

/// Engine description of a single unit type.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitInformation {
    /// Opaque short code the engine uses to refer to the unit.
    pub shorthand: String,
    /// Attack radius before upgrades.
    #[serde(default)]
    pub attack_range: f64,
    /// Damage dealt per hit to mobile units.
    #[serde(default)]
    pub attack_damage_walker: f64,
    /// Overrides applied once the unit has been upgraded.
    #[serde(default)]
    pub upgrade: Option<UpgradeInformation>,
}

/// Fields that change when a unit is upgraded.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeInformation {
    /// Attack radius after the upgrade, if it changes.
    #[serde(default)]
    pub attack_range: Option<f64>,
}

/// Errors raised while resolving the unit catalog at match start.
#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    /// The configuration listed fewer unit types than the agent understands.
    #[error("engine configuration lists {found} unit types, expected {expected}")]
    MissingUnits {
        /// Number of descriptors present.
        found: usize,
        /// Number of descriptors required.
        expected: usize,
    },
    /// Two unit types share a shorthand, making resolution ambiguous.
    #[error("shorthand '{0}' is assigned to more than one unit type")]
    DuplicateShorthand(String),
    /// A shorthand observed during play does not name any configured unit.
    #[error("unknown unit shorthand '{0}'")]
    UnknownShorthand(String),
}

/// Combat statistics for a unit class.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UnitStats {
    /// Attack radius before upgrades.
    pub attack_range: f64,
    /// Attack radius once upgraded.
    pub upgraded_attack_range: f64,
    /// Damage dealt per hit to mobile units.
    pub damage_to_mobile: f64,
}

/// Unit shorthands and statistics resolved once from the engine configuration.
#[derive(Clone, Debug)]
pub struct UnitCatalog {
    shorthands: [String; 6],
    stats: [UnitStats; 6],
}

impl UnitCatalog {
    /// Resolves the catalog from the engine configuration.
    ///
    /// The engine lists unit types in the same order as [`UnitClass::ALL`];
    /// any extra trailing descriptors are ignored.
    pub fn from_config(config: &GameConfig) -> Result<Self, CatalogError> {
        let expected = UnitClass::ALL.len();
        if config.unit_information.len() < expected {
            return Err(CatalogError::MissingUnits {
                found: config.unit_information.len(),
                expected,
            });
        }

        let descriptors = &config.unit_information[..expected];
        for (index, descriptor) in descriptors.iter().enumerate() {
            if descriptors[..index]
                .iter()
                .any(|earlier| earlier.shorthand == descriptor.shorthand)
            {
                return Err(CatalogError::DuplicateShorthand(
                    descriptor.shorthand.clone(),
                ));
            }
        }

        let shorthands = std::array::from_fn(|index| descriptors[index].shorthand.clone());
        let stats = std::array::from_fn(|index| {
            let descriptor = &descriptors[index];
            let upgraded_range = descriptor
                .upgrade
                .as_ref()
                .and_then(|upgrade| upgrade.attack_range);
            UnitStats {
                attack_range: descriptor.attack_range,
                upgraded_attack_range: upgraded_range.unwrap_or(descriptor.attack_range),
                damage_to_mobile: descriptor.attack_damage_walker,
            }
        });

        Ok(Self { shorthands, stats })
    }

    /// Catalog matching the engine's stock configuration.
    #[must_use]
    pub fn standard() -> Self {
        let stats = |attack_range, upgraded_attack_range, damage_to_mobile| UnitStats {
            attack_range,
            upgraded_attack_range,
            damage_to_mobile,
        };

        Self {
            shorthands: ["FF", "EF", "DF", "PI", "EI", "SI"].map(str::to_owned),
            stats: [
                stats(0.0, 0.0, 0.0),
                stats(0.0, 0.0, 0.0),
                stats(2.5, 3.5, 5.0),
                stats(3.5, 3.5, 2.0),
                stats(4.5, 4.5, 8.0),
                stats(4.5, 4.5, 20.0),
            ],
        }
    }

    /// Maps an engine shorthand onto its unit class.
    pub fn resolve(&self, shorthand: &str) -> Result<UnitClass, CatalogError> {
        self.shorthands
            .iter()
            .position(|candidate| candidate == shorthand)
            .map(|index| UnitClass::ALL[index])
            .ok_or_else(|| CatalogError::UnknownShorthand(shorthand.to_owned()))
    }

    /// Combat statistics for `class`.
    #[must_use]
    pub fn stats(&self, class: UnitClass) -> UnitStats {
        self.stats[index_of(class)]
    }
}

impl Default for UnitCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn index_of(class: UnitClass) -> usize {
    match class {
        UnitClass::Wall => 0,
        UnitClass::Support => 1,
        UnitClass::Turret => 2,
        UnitClass::FastRanged => 3,
        UnitClass::Siege => 4,
        UnitClass::DefensiveMobile => 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(shorthands: &[&str]) -> GameConfig {
        GameConfig {
            unit_information: shorthands
                .iter()
                .map(|shorthand| UnitInformation {
                    shorthand: (*shorthand).to_owned(),
                    ..UnitInformation::default()
                })
                .collect(),
        }
    }

    #[test]
    fn resolves_shorthands_in_engine_order() {
        let catalog =
            UnitCatalog::from_config(&config(&["FF", "EF", "DF", "PI", "EI", "SI"])).expect("ok");
        assert_eq!(catalog.resolve("DF"), Ok(UnitClass::Turret));
        assert_eq!(catalog.resolve("SI"), Ok(UnitClass::DefensiveMobile));
        assert_eq!(catalog.resolve("PI"), Ok(UnitClass::FastRanged));
    }

    #[test]
    fn rejects_short_configuration() {
        let error = UnitCatalog::from_config(&config(&["FF", "EF"])).unwrap_err();
        assert_eq!(
            error,
            CatalogError::MissingUnits {
                found: 2,
                expected: 6
            }
        );
    }

    #[test]
    fn rejects_duplicate_shorthands() {
        let error =
            UnitCatalog::from_config(&config(&["FF", "EF", "DF", "PI", "PI", "SI"])).unwrap_err();
        assert_eq!(error, CatalogError::DuplicateShorthand("PI".to_owned()));
    }

    #[test]
    fn unknown_shorthand_is_reported() {
        let catalog = UnitCatalog::standard();
        assert_eq!(
            catalog.resolve("XX"),
            Err(CatalogError::UnknownShorthand("XX".to_owned()))
        );
    }

    #[test]
    fn parses_engine_json_with_upgrades() {
        let json = r#"{
            "unitInformation": [
                {"shorthand": "FF", "cost1": 1.0},
                {"shorthand": "EF", "cost1": 4.0},
                {"shorthand": "DF", "cost1": 2.0, "attackRange": 2.5, "attackDamageWalker": 5.0,
                 "upgrade": {"attackRange": 3.5, "attackDamageWalker": 15.0}},
                {"shorthand": "PI", "cost2": 1.0, "attackRange": 3.5, "attackDamageWalker": 2.0},
                {"shorthand": "EI", "cost2": 3.0, "attackRange": 4.5, "attackDamageWalker": 8.0},
                {"shorthand": "SI", "cost2": 1.0, "attackRange": 4.5, "attackDamageWalker": 20.0},
                {"shorthand": "RM"}
            ]
        }"#;
        let config: GameConfig = serde_json::from_str(json).expect("parse");
        let catalog = UnitCatalog::from_config(&config).expect("resolve");
        let turret = catalog.stats(UnitClass::Turret);
        assert_eq!(turret.attack_range, 2.5);
        assert_eq!(turret.upgraded_attack_range, 3.5);
        assert_eq!(turret.damage_to_mobile, 5.0);
        assert_eq!(catalog.stats(UnitClass::Siege).attack_range, 4.5);
        assert_eq!(
            catalog.stats(UnitClass::Wall),
            UnitStats {
                attack_range: 0.0,
                upgraded_attack_range: 0.0,
                damage_to_mobile: 0.0,
            }
        );
    }
}
