//! Built-in presets
//!
//! Each preset is a small set of overrides on top of the registry defaults.

use harnessgen_core::{Param, ParameterSet, TileType};
use serde::Serialize;

/// A named starting configuration
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Preset {
    pub name: &'static str,
    pub description: &'static str,
    overrides: &'static [(Param, f64)],
}

impl Preset {
    /// The full parameter set of this preset
    pub fn params(&self) -> ParameterSet {
        self.overrides
            .iter()
            .fold(ParameterSet::defaults(), |set, &(param, value)| {
                set.with(param, value)
            })
    }

    pub fn tile_type(&self) -> TileType {
        self.params().tile_type()
    }
}

pub static PRESETS: &[Preset] = &[
    Preset {
        name: "Standard hexagon",
        description: "50 mm hexagonal tile with six 5 mm magnets",
        overrides: &[],
    },
    Preset {
        name: "Compact hexagon",
        description: "35 mm hexagonal tile with six 4 mm magnets for small limbs",
        overrides: &[
            (Param::Circumradius, 35.0),
            (Param::MagnetDiameter, 4.0),
            (Param::RingRadius, 14.0),
            (Param::TactorDiameter, 14.0),
            (Param::SlitWidth, 14.0),
            (Param::CarrierWallThickness, 1.5),
            (Param::ConnectorMagnetSpacing, 12.0),
        ],
    },
    Preset {
        name: "Standard square",
        description: "60 mm square tile with six 5 mm magnets",
        overrides: &[(Param::TileType, 1.0), (Param::SideLength, 60.0)],
    },
];

/// Look up a preset by name, ignoring case
pub fn preset(name: &str) -> Option<&'static Preset> {
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}
