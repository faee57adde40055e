//! Parameter registry
//!
//! The fixed table of every parameter the generator understands: its name,
//! unit, hard physical domain and default. Domains here only describe values
//! that are physically meaningful on their own; feasibility between
//! parameters is the validator's concern.

use crate::error::{ParameterError, ParameterResult};
use crate::precision::{greater_than, less_than, normalize};
use crate::units::Unit;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of registered parameters
pub const PARAM_COUNT: usize = 30;

/// Parameter identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Param {
    TileType,
    Circumradius,
    SideLength,
    PhaseOffset,
    Kerf,
    MagnetCount,
    MagnetDiameter,
    MagnetThickness,
    RingRadius,
    Clearance,
    FitTolerance,
    TactorDiameter,
    SlitWidth,
    SlitHeight,
    SlitInset,
    CarrierWallThickness,
    CarrierHeight,
    ConnectorMagnetSpacing,
    ConnectorThickness,
    ConnectorRimWidth,
    LinerThickness,
    LinerInset,
    StrapWidth,
    StrapThickness,
    StrapGap,
    StrapClipThickness,
    StrapClipRadius,
    StrapClipRim,
    CircleSegments,
    MinPrintableWall,
}

impl Param {
    /// Every parameter in registry order
    pub const ALL: [Param; PARAM_COUNT] = [
        Param::TileType,
        Param::Circumradius,
        Param::SideLength,
        Param::PhaseOffset,
        Param::Kerf,
        Param::MagnetCount,
        Param::MagnetDiameter,
        Param::MagnetThickness,
        Param::RingRadius,
        Param::Clearance,
        Param::FitTolerance,
        Param::TactorDiameter,
        Param::SlitWidth,
        Param::SlitHeight,
        Param::SlitInset,
        Param::CarrierWallThickness,
        Param::CarrierHeight,
        Param::ConnectorMagnetSpacing,
        Param::ConnectorThickness,
        Param::ConnectorRimWidth,
        Param::LinerThickness,
        Param::LinerInset,
        Param::StrapWidth,
        Param::StrapThickness,
        Param::StrapGap,
        Param::StrapClipThickness,
        Param::StrapClipRadius,
        Param::StrapClipRim,
        Param::CircleSegments,
        Param::MinPrintableWall,
    ];

    /// Position in the registry
    pub fn index(self) -> usize {
        self as usize
    }

    /// Registry entry for this parameter
    pub fn definition(self) -> &'static ParameterDefinition {
        &DEFINITIONS[self.index()]
    }

    /// camelCase identifier used in snapshots and messages
    pub fn name(self) -> &'static str {
        self.definition().name
    }

    pub fn unit(self) -> Unit {
        self.definition().unit
    }

    pub fn default_value(self) -> f64 {
        self.definition().default
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Param {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Param::ALL
            .iter()
            .copied()
            .find(|param| param.name() == s)
            .ok_or_else(|| ParameterError::UnknownParameter(s.to_string()))
    }
}

/// Grouping used when listing parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Tile,
    Magnets,
    Slits,
    Peripherals,
    Manufacturing,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tile => write!(f, "Tile Parameters"),
            Self::Magnets => write!(f, "Magnet Parameters"),
            Self::Slits => write!(f, "Slit Parameters"),
            Self::Peripherals => write!(f, "Peripheral Parameters"),
            Self::Manufacturing => write!(f, "Manufacturing"),
        }
    }
}

/// Static description of one parameter
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDefinition {
    pub param: Param,
    pub name: &'static str,
    pub display_name: &'static str,
    /// Number shown next to the field in the reference drawing, 0 for none
    pub ui_number: u8,
    pub unit: Unit,
    pub min: f64,
    pub max: f64,
    /// Whether `min` itself is allowed
    pub min_inclusive: bool,
    pub integer: bool,
    pub default: f64,
    pub category: Category,
    pub tooltip: &'static str,
}

impl ParameterDefinition {
    /// Normalize `value` and check it against the hard domain
    ///
    /// Returns the normalized value on success.
    pub fn check_domain(&self, value: f64) -> ParameterResult<f64> {
        let value = normalize(value);
        let reject = |reason: String| ParameterError::OutOfDomain {
            name: self.name.to_string(),
            value,
            reason,
        };

        if !value.is_finite() {
            return Err(reject("not a finite number".to_string()));
        }
        if self.integer && value.fract() != 0.0 {
            return Err(reject("must be an integer".to_string()));
        }
        if self.min_inclusive {
            if less_than(value, self.min) {
                return Err(reject(format!("below minimum {}", self.min)));
            }
        } else if !greater_than(value, self.min) {
            return Err(reject(format!("must be greater than {}", self.min)));
        }
        if greater_than(value, self.max) {
            return Err(reject(format!("above maximum {}", self.max)));
        }
        Ok(value)
    }

    /// Label shown in listings, `[n] Name` when the parameter is numbered
    pub fn display_label(&self) -> String {
        if self.ui_number > 0 {
            format!("[{}] {}", self.ui_number, self.display_name)
        } else {
            self.display_name.to_string()
        }
    }
}

/// Look up a parameter definition by name
pub fn definition(name: &str) -> ParameterResult<&'static ParameterDefinition> {
    name.parse::<Param>().map(Param::definition)
}

/// Iterate over every parameter definition in registry order
pub fn definitions() -> impl Iterator<Item = &'static ParameterDefinition> {
    DEFINITIONS.iter()
}

/// Tile variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileType {
    #[default]
    Hexagon,
    Square,
}

impl TileType {
    /// Decode the numeric selector stored in a parameter set
    pub fn from_value(value: f64) -> Option<Self> {
        if value == 0.0 {
            Some(Self::Hexagon)
        } else if value == 1.0 {
            Some(Self::Square)
        } else {
            None
        }
    }

    pub fn as_value(self) -> f64 {
        match self {
            Self::Hexagon => 0.0,
            Self::Square => 1.0,
        }
    }

    /// Number of outline edges
    pub fn sides(self) -> usize {
        match self {
            Self::Hexagon => 6,
            Self::Square => 4,
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hexagon => write!(f, "hexagon"),
            Self::Square => write!(f, "square"),
        }
    }
}

impl FromStr for TileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "hexagon" | "hex" => Ok(Self::Hexagon),
            "square" => Ok(Self::Square),
            _ => Err(format!("Unknown tile type: {}", s)),
        }
    }
}

#[allow(clippy::too_many_arguments)]
const fn length(
    param: Param,
    name: &'static str,
    display_name: &'static str,
    ui_number: u8,
    (min, min_inclusive, max): (f64, bool, f64),
    default: f64,
    category: Category,
    tooltip: &'static str,
) -> ParameterDefinition {
    ParameterDefinition {
        param,
        name,
        display_name,
        ui_number,
        unit: Unit::Millimeters,
        min,
        max,
        min_inclusive,
        integer: false,
        default,
        category,
        tooltip,
    }
}

#[allow(clippy::too_many_arguments)]
const fn count(
    param: Param,
    name: &'static str,
    display_name: &'static str,
    ui_number: u8,
    (min, max): (f64, f64),
    default: f64,
    category: Category,
    tooltip: &'static str,
) -> ParameterDefinition {
    ParameterDefinition {
        param,
        name,
        display_name,
        ui_number,
        unit: Unit::Count,
        min,
        max,
        min_inclusive: true,
        integer: true,
        default,
        category,
        tooltip,
    }
}

const OPEN: bool = false;
const CLOSED: bool = true;

static DEFINITIONS: [ParameterDefinition; PARAM_COUNT] = [
    count(
        Param::TileType,
        "tileType",
        "Tile Type",
        0,
        (0.0, 1.0),
        0.0,
        Category::Tile,
        "0 for a hexagonal tile, 1 for a square tile",
    ),
    length(
        Param::Circumradius,
        "circumradius",
        "Circumradius",
        1,
        (0.0, OPEN, 500.0),
        50.0,
        Category::Tile,
        "Distance from the tile centre to a hexagon vertex",
    ),
    length(
        Param::SideLength,
        "sideLength",
        "Side Length",
        2,
        (0.0, OPEN, 1000.0),
        60.0,
        Category::Tile,
        "Edge length of a square tile",
    ),
    ParameterDefinition {
        param: Param::PhaseOffset,
        name: "phaseOffset",
        display_name: "Phase Offset",
        ui_number: 3,
        unit: Unit::Degrees,
        min: 0.0,
        max: 360.0,
        min_inclusive: CLOSED,
        integer: false,
        default: 0.0,
        category: Category::Tile,
        tooltip: "Rotation applied to the hexagon vertices",
    },
    length(
        Param::Kerf,
        "kerf",
        "Kerf",
        4,
        (0.0, CLOSED, 5.0),
        0.1,
        Category::Manufacturing,
        "Material removed by the cutter; the fold-line is offset inward by this amount",
    ),
    count(
        Param::MagnetCount,
        "magnetCount",
        "Magnets in Ring",
        5,
        (3.0, 64.0),
        6.0,
        Category::Magnets,
        "Number of magnets evenly spaced on the ring",
    ),
    length(
        Param::MagnetDiameter,
        "magnetDiameter",
        "Magnet Diameter",
        6,
        (0.0, OPEN, 50.0),
        5.0,
        Category::Magnets,
        "Diameter of one magnet",
    ),
    length(
        Param::MagnetThickness,
        "magnetThickness",
        "Magnet Thickness",
        7,
        (0.0, OPEN, 20.0),
        2.0,
        Category::Magnets,
        "Thickness of one magnet; depth of the printed pockets",
    ),
    length(
        Param::RingRadius,
        "ringRadius",
        "Magnet Ring Radius",
        8,
        (0.0, OPEN, 500.0),
        20.0,
        Category::Magnets,
        "Radius of the circle the magnet centres lie on",
    ),
    length(
        Param::Clearance,
        "clearance",
        "Clearance",
        9,
        (0.0, CLOSED, 20.0),
        1.0,
        Category::Manufacturing,
        "Minimum material left between neighbouring features",
    ),
    length(
        Param::FitTolerance,
        "fitTolerance",
        "Fit Tolerance",
        0,
        (0.0, CLOSED, 2.0),
        0.15,
        Category::Manufacturing,
        "Radial enlargement of printed magnet bores",
    ),
    length(
        Param::TactorDiameter,
        "tactorDiameter",
        "Tactor Diameter",
        10,
        (0.0, CLOSED, 200.0),
        20.0,
        Category::Tile,
        "Diameter of the centre opening; 0 disables it",
    ),
    length(
        Param::SlitWidth,
        "slitWidth",
        "Slit Width",
        11,
        (0.0, CLOSED, 200.0),
        20.0,
        Category::Slits,
        "Length of the strap slit along each edge; 0 disables slits",
    ),
    length(
        Param::SlitHeight,
        "slitHeight",
        "Slit Height",
        12,
        (0.0, OPEN, 20.0),
        1.5,
        Category::Slits,
        "Width of the strap slit across the edge",
    ),
    length(
        Param::SlitInset,
        "slitInset",
        "Slit Inset",
        13,
        (0.0, CLOSED, 100.0),
        3.0,
        Category::Slits,
        "Distance from the compensated edge to the outer side of the slit",
    ),
    length(
        Param::CarrierWallThickness,
        "carrierWallThickness",
        "Carrier Wall Thickness",
        14,
        (0.0, OPEN, 20.0),
        2.0,
        Category::Peripherals,
        "Material around the magnet bores of the carrier",
    ),
    length(
        Param::CarrierHeight,
        "carrierHeight",
        "Carrier Height",
        15,
        (0.0, OPEN, 50.0),
        4.0,
        Category::Peripherals,
        "Height of the magnet carrier ring",
    ),
    length(
        Param::ConnectorMagnetSpacing,
        "connectorMagnetSpacing",
        "Connector Magnet Spacing",
        16,
        (0.0, OPEN, 200.0),
        15.0,
        Category::Peripherals,
        "Centre-to-centre distance of the two connector magnets",
    ),
    length(
        Param::ConnectorThickness,
        "connectorThickness",
        "Connector Thickness",
        17,
        (0.0, OPEN, 20.0),
        4.0,
        Category::Peripherals,
        "Thickness of the connector plate",
    ),
    length(
        Param::ConnectorRimWidth,
        "connectorRimWidth",
        "Connector Rim Width",
        18,
        (0.0, OPEN, 20.0),
        1.5,
        Category::Peripherals,
        "Material around each connector pocket",
    ),
    length(
        Param::LinerThickness,
        "linerThickness",
        "Liner Thickness",
        19,
        (0.0, OPEN, 20.0),
        1.0,
        Category::Peripherals,
        "Thickness of the foam liner spacer",
    ),
    length(
        Param::LinerInset,
        "linerInset",
        "Liner Inset",
        20,
        (0.0, CLOSED, 100.0),
        1.0,
        Category::Peripherals,
        "How far the liner outline sits inside the tile outline",
    ),
    length(
        Param::StrapWidth,
        "strapWidth",
        "Strap Width",
        21,
        (0.0, OPEN, 100.0),
        10.0,
        Category::Peripherals,
        "Width of the strap threaded through the strap clip",
    ),
    length(
        Param::StrapThickness,
        "strapThickness",
        "Strap Thickness",
        22,
        (0.0, OPEN, 20.0),
        1.0,
        Category::Peripherals,
        "Thickness of the strap; width of each clip slot",
    ),
    length(
        Param::StrapGap,
        "strapGap",
        "Distance Between Straps",
        23,
        (0.0, OPEN, 50.0),
        2.0,
        Category::Peripherals,
        "Bar of material left between the two strap slots",
    ),
    length(
        Param::StrapClipThickness,
        "strapClipThickness",
        "Strap Clip Thickness",
        24,
        (0.0, OPEN, 20.0),
        1.0,
        Category::Peripherals,
        "Height of the printed strap clip",
    ),
    length(
        Param::StrapClipRadius,
        "strapClipRadius",
        "Strap Clip Corner Radius",
        25,
        (0.0, CLOSED, 20.0),
        1.0,
        Category::Peripherals,
        "Corner rounding of the strap clip; 0 for sharp corners",
    ),
    length(
        Param::StrapClipRim,
        "strapClipRim",
        "Strap Clip Rim",
        26,
        (0.0, OPEN, 20.0),
        2.0,
        Category::Peripherals,
        "Material around the strap slots",
    ),
    count(
        Param::CircleSegments,
        "circleSegments",
        "Circle Segments",
        0,
        (8.0, 256.0),
        32.0,
        Category::Manufacturing,
        "Number of segments used to tessellate circles",
    ),
    length(
        Param::MinPrintableWall,
        "minPrintableWall",
        "Minimum Printable Wall",
        0,
        (0.0, OPEN, 10.0),
        0.8,
        Category::Manufacturing,
        "Walls thinner than this are reported as warnings",
    ),
];
