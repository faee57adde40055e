//! Derived tile dimensions
//!
//! Both the validator and the generator reason about the same regular
//! polygon: its circumradius, inscribed radius and edge length, before and
//! after the kerf offset. They are computed here once so the two never
//! disagree.

use harnessgen_core::{Param, ParameterSet, TileType};
use std::f64::consts::PI;

/// Regular polygon dimensions of a tile variant
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileMetrics {
    pub tile_type: TileType,
    pub sides: usize,
    pub circumradius: f64,
    pub inradius: f64,
    pub edge: f64,
    /// Inscribed radius of the fold-line, the outline moved inward by the kerf
    pub compensated_inradius: f64,
    pub compensated_circumradius: f64,
    pub compensated_edge: f64,
}

impl TileMetrics {
    pub fn from_params(params: &ParameterSet) -> Self {
        let tile_type = params.tile_type();
        let sides = tile_type.sides();
        let half_angle = PI / sides as f64;

        let circumradius = match tile_type {
            TileType::Hexagon => params.get(Param::Circumradius),
            TileType::Square => params.get(Param::SideLength) / 2.0 / half_angle.cos(),
        };
        let inradius = circumradius * half_angle.cos();
        let edge = 2.0 * circumradius * half_angle.sin();

        let kerf = params.get(Param::Kerf);
        let compensated_inradius = inradius - kerf;
        let compensated_circumradius = circumradius - kerf / half_angle.cos();
        let compensated_edge = 2.0 * compensated_circumradius * half_angle.sin();

        Self {
            tile_type,
            sides,
            circumradius,
            inradius,
            edge,
            compensated_inradius,
            compensated_circumradius,
            compensated_edge,
        }
    }

    /// Angle of the first outline vertex in radians
    pub fn start_angle(&self, params: &ParameterSet) -> f64 {
        match self.tile_type {
            TileType::Hexagon => params.get(Param::PhaseOffset).to_radians(),
            TileType::Square => PI / 4.0,
        }
    }

    /// Length of the chord parallel to an edge at `depth` inside the fold-line
    pub fn chord_at_depth(&self, depth: f64) -> f64 {
        let half_angle = PI / self.sides as f64;
        self.compensated_edge - 2.0 * depth * half_angle.tan()
    }
}
