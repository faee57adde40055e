//! Constraint validation
//!
//! Checks a parameter set against manufacturing feasibility. Validation is a
//! fixed, ordered table of independent rules. Every rule runs against a
//! normalized copy of the input, computes its limit exactly and compares
//! the parameter to it with the tolerance-aware helpers, so values that
//! differ only by floating-point noise are never flagged.
//!
//! Where a rule can propose a corrected value, the suggestion is the closest
//! normalized value on the passing side of the limit. Applying a suggestion
//! and validating again therefore never reproduces the same finding.

use crate::tile::TileMetrics;
use harnessgen_core::{
    at_least, format_display, greater_than, less_than, normalize, Param, ParameterSet, TileType,
    Unit,
};
use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;
use tracing::debug;

/// Smallest step between two normalized values
const STEP: f64 = 0.01;

/// Inclusive range accepted by the magnet-count rule
const MAGNET_COUNT_RANGE: (f64, f64) = (3.0, 12.0);

/// Stable identifier of a validation rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    MagnetCount,
    MagnetClearance,
    RingProportion,
    TactorClearance,
    SlitLength,
    SlitRingClearance,
    KerfProportion,
    CarrierDepth,
    ConnectorSpacing,
    ConnectorDepth,
    ThinWall,
    LinerFit,
    StrapClipCorner,
}

impl RuleId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MagnetCount => "magnet-count",
            Self::MagnetClearance => "magnet-clearance",
            Self::RingProportion => "ring-proportion",
            Self::TactorClearance => "tactor-clearance",
            Self::SlitLength => "slit-length",
            Self::SlitRingClearance => "slit-ring-clearance",
            Self::KerfProportion => "kerf-proportion",
            Self::CarrierDepth => "carrier-depth",
            Self::ConnectorSpacing => "connector-spacing",
            Self::ConnectorDepth => "connector-depth",
            Self::ThinWall => "thin-wall",
            Self::LinerFit => "liner-fit",
            Self::StrapClipCorner => "strap-clip-corner",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Severity of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// One violated constraint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Finding {
    pub rule: RuleId,
    pub parameter: Param,
    pub severity: Severity,
    pub message: String,
    /// Normalized corrected value for `parameter`, when one exists inside
    /// its domain
    pub suggestion: Option<f64>,
}

impl Finding {
    fn error(rule: RuleId, parameter: Param, message: String) -> Self {
        Self {
            rule,
            parameter,
            severity: Severity::Error,
            message,
            suggestion: None,
        }
    }

    fn warning(rule: RuleId, parameter: Param, message: String) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(rule, parameter, message)
        }
    }

    /// Attach a suggestion if the parameter's domain accepts it
    fn suggest(mut self, value: f64) -> Self {
        self.suggestion = self.parameter.definition().check_domain(value).ok();
        self
    }

    pub fn parameter_name(&self) -> &'static str {
        self.parameter.name()
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} ({}): {}",
            self.severity, self.parameter, self.rule, self.message
        )?;
        if let Some(value) = self.suggestion {
            write!(f, " Suggested: {}", format_display(value, self.parameter.unit()))?;
        }
        Ok(())
    }
}

/// Ordered findings produced by [`validate`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.severity == Severity::Warning)
    }

    /// First finding produced by `rule`
    pub fn find(&self, rule: RuleId) -> Option<&Finding> {
        self.findings.iter().find(|f| f.rule == rule)
    }

    /// Parameters named by any finding, in report order without repeats
    pub fn affected_parameters(&self) -> Vec<Param> {
        let mut params = Vec::new();
        for finding in &self.findings {
            if !params.contains(&finding.parameter) {
                params.push(finding.parameter);
            }
        }
        params
    }
}

struct RuleContext<'a> {
    params: &'a ParameterSet,
    tile: TileMetrics,
}

impl RuleContext<'_> {
    fn get(&self, param: Param) -> f64 {
        self.params.get(param)
    }
}

/// Entry of the rule table
pub struct Rule {
    pub id: RuleId,
    check: fn(&RuleContext<'_>, &mut Vec<Finding>),
}

/// Every rule in evaluation order
pub static RULES: &[Rule] = &[
    Rule { id: RuleId::MagnetCount, check: check_magnet_count },
    Rule { id: RuleId::MagnetClearance, check: check_magnet_clearance },
    Rule { id: RuleId::RingProportion, check: check_ring_proportion },
    Rule { id: RuleId::TactorClearance, check: check_tactor_clearance },
    Rule { id: RuleId::SlitLength, check: check_slit_length },
    Rule { id: RuleId::SlitRingClearance, check: check_slit_ring_clearance },
    Rule { id: RuleId::KerfProportion, check: check_kerf_proportion },
    Rule { id: RuleId::CarrierDepth, check: check_carrier_depth },
    Rule { id: RuleId::ConnectorSpacing, check: check_connector_spacing },
    Rule { id: RuleId::ConnectorDepth, check: check_connector_depth },
    Rule { id: RuleId::ThinWall, check: check_thin_walls },
    Rule { id: RuleId::LinerFit, check: check_liner_fit },
    Rule { id: RuleId::StrapClipCorner, check: check_strap_clip_corner },
];

/// Validate a parameter set
///
/// Pure function of its input: the same set always yields the same findings
/// in the same order.
pub fn validate(params: &ParameterSet) -> ValidationReport {
    let params = params.normalized();
    let ctx = RuleContext {
        params: &params,
        tile: TileMetrics::from_params(&params),
    };

    let mut findings = Vec::new();
    for rule in RULES {
        (rule.check)(&ctx, &mut findings);
    }

    debug!(
        "Validation produced {} finding(s) for {} tile",
        findings.len(),
        ctx.tile.tile_type
    );
    ValidationReport { findings }
}

fn mm(value: f64) -> String {
    format_display(value, Unit::Millimeters)
}

/// Smallest normalized value that is not below `limit`
fn round_up(limit: f64) -> f64 {
    let value = normalize(limit);
    if less_than(value, limit) {
        normalize(value + STEP)
    } else {
        value
    }
}

/// Largest normalized value that is not above `limit`
fn round_down(limit: f64) -> f64 {
    let value = normalize(limit);
    if greater_than(value, limit) {
        normalize(value - STEP)
    } else {
        value
    }
}

/// Largest normalized value strictly below `limit`
fn step_below(limit: f64) -> f64 {
    let value = round_down(limit);
    if at_least(value, limit) {
        normalize(value - STEP)
    } else {
        value
    }
}

fn check_magnet_count(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    let count = ctx.get(Param::MagnetCount);
    let (min, max) = MAGNET_COUNT_RANGE;
    if count.fract() == 0.0 && count >= min && count <= max {
        return;
    }

    let nearest = if count.is_finite() {
        count.round().clamp(min, max)
    } else {
        min
    };
    out.push(
        Finding::error(
            RuleId::MagnetCount,
            Param::MagnetCount,
            format!(
                "Magnet count {} must be a whole number between {} and {}.",
                count, min, max
            ),
        )
        .suggest(nearest),
    );
}

fn check_magnet_clearance(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    let count = ctx.get(Param::MagnetCount);
    if count <= 0.0 {
        return;
    }
    let radius = ctx.get(Param::RingRadius);
    let required = ctx.get(Param::MagnetDiameter) + ctx.get(Param::Clearance);

    let min_radius = count * required / (2.0 * PI);
    if less_than(radius, min_radius) {
        let spacing = normalize(2.0 * PI * radius / count);
        out.push(
            Finding::error(
                RuleId::MagnetClearance,
                Param::RingRadius,
                format!(
                    "Magnet spacing along the ring ({}) is less than magnet diameter plus clearance ({}).",
                    mm(spacing),
                    mm(required)
                ),
            )
            .suggest(round_up(min_radius)),
        );
    }
}

fn check_ring_proportion(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    let radius = ctx.get(Param::RingRadius);
    let (limit, basis) = match ctx.tile.tile_type {
        TileType::Hexagon => (ctx.tile.inradius / 2.0, "half the inscribed radius"),
        TileType::Square => (ctx.tile.edge / 2.0, "half the side length"),
    };

    if at_least(radius, limit) {
        out.push(
            Finding::error(
                RuleId::RingProportion,
                Param::RingRadius,
                format!(
                    "Magnet ring radius {} must be less than {} of the tile ({}).",
                    mm(radius),
                    basis,
                    mm(limit)
                ),
            )
            .suggest(step_below(limit)),
        );
    }
}

fn check_tactor_clearance(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    let tactor = ctx.get(Param::TactorDiameter);
    if tactor == 0.0 {
        return;
    }
    let limit = 2.0
        * (ctx.get(Param::RingRadius)
            - ctx.get(Param::MagnetDiameter) / 2.0
            - ctx.get(Param::Clearance));

    if greater_than(tactor, limit) {
        out.push(
            Finding::error(
                RuleId::TactorClearance,
                Param::TactorDiameter,
                format!(
                    "Tactor opening {} leaves less than the clearance to the magnet holes (maximum {}).",
                    mm(tactor),
                    mm(limit.max(0.0))
                ),
            )
            .suggest(round_down(limit).max(0.0)),
        );
    }
}

fn check_slit_length(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    let width = ctx.get(Param::SlitWidth);
    if width == 0.0 {
        return;
    }
    let depth = ctx.get(Param::SlitInset) + ctx.get(Param::SlitHeight);
    let limit = ctx.tile.chord_at_depth(depth) - 2.0 * ctx.get(Param::Clearance);

    if greater_than(width, limit) {
        out.push(
            Finding::error(
                RuleId::SlitLength,
                Param::SlitWidth,
                format!(
                    "Slit width {} plus clearance does not fit along the compensated edge (maximum {}).",
                    mm(width),
                    mm(limit.max(0.0))
                ),
            )
            .suggest(round_down(limit).max(0.0)),
        );
    }
}

fn check_slit_ring_clearance(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    if ctx.get(Param::SlitWidth) == 0.0 {
        return;
    }
    let inset = ctx.get(Param::SlitInset);
    let hole_reach = ctx.get(Param::RingRadius)
        + ctx.get(Param::MagnetDiameter) / 2.0
        + ctx.get(Param::Clearance);
    let limit = ctx.tile.compensated_inradius - ctx.get(Param::SlitHeight) - hole_reach;

    if greater_than(inset, limit) {
        out.push(
            Finding::error(
                RuleId::SlitRingClearance,
                Param::SlitInset,
                format!(
                    "Slits inset by {} reach into the magnet holes (maximum inset {}).",
                    mm(inset),
                    mm(limit)
                ),
            )
            .suggest(round_down(limit)),
        );
    }
}

fn check_kerf_proportion(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    let kerf = ctx.get(Param::Kerf);
    let smallest = ctx
        .get(Param::MagnetDiameter)
        .min(ctx.get(Param::SlitHeight));
    let limit = smallest / 2.0;

    if at_least(kerf, limit) {
        out.push(
            Finding::error(
                RuleId::KerfProportion,
                Param::Kerf,
                format!(
                    "Kerf {} must be less than half the smallest cut feature ({}).",
                    mm(kerf),
                    mm(limit)
                ),
            )
            .suggest(step_below(limit)),
        );
    }
}

fn check_pocket_depth(
    ctx: &RuleContext<'_>,
    rule: RuleId,
    param: Param,
    part: &str,
    out: &mut Vec<Finding>,
) {
    let thickness = ctx.get(param);
    let limit = ctx.get(Param::MagnetThickness) + ctx.get(Param::MinPrintableWall);

    if less_than(thickness, limit) {
        out.push(
            Finding::error(
                rule,
                param,
                format!(
                    "{} thickness {} cannot hold the magnet pocket above a printable floor (minimum {}).",
                    part,
                    mm(thickness),
                    mm(limit)
                ),
            )
            .suggest(round_up(limit)),
        );
    }
}

fn check_carrier_depth(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    check_pocket_depth(ctx, RuleId::CarrierDepth, Param::CarrierHeight, "Carrier", out);
}

fn check_connector_depth(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    check_pocket_depth(
        ctx,
        RuleId::ConnectorDepth,
        Param::ConnectorThickness,
        "Connector",
        out,
    );
}

fn check_connector_spacing(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    let spacing = ctx.get(Param::ConnectorMagnetSpacing);
    let limit = ctx.get(Param::MagnetDiameter) + ctx.get(Param::Clearance);

    if less_than(spacing, limit) {
        out.push(
            Finding::error(
                RuleId::ConnectorSpacing,
                Param::ConnectorMagnetSpacing,
                format!(
                    "Connector magnets {} apart would overlap (minimum {}).",
                    mm(spacing),
                    mm(limit)
                ),
            )
            .suggest(round_up(limit)),
        );
    }
}

fn check_thin_walls(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    let min_wall = ctx.get(Param::MinPrintableWall);
    for param in [
        Param::CarrierWallThickness,
        Param::ConnectorRimWidth,
        Param::LinerThickness,
        Param::StrapClipThickness,
        Param::StrapClipRim,
    ] {
        let value = ctx.get(param);
        if less_than(value, min_wall) {
            out.push(
                Finding::warning(
                    RuleId::ThinWall,
                    param,
                    format!(
                        "{} of {} may be too thin for reliable 3D printing.",
                        param.definition().display_name,
                        mm(value)
                    ),
                )
                .suggest(min_wall),
            );
        }
    }
}

fn check_liner_fit(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    let inset = ctx.get(Param::LinerInset);
    let limit =
        ctx.tile.inradius - ctx.get(Param::TactorDiameter) / 2.0 - ctx.get(Param::Clearance);

    if at_least(inset, limit) {
        out.push(
            Finding::error(
                RuleId::LinerFit,
                Param::LinerInset,
                format!(
                    "Liner inset {} leaves no material around the tactor opening (must be below {}).",
                    mm(inset),
                    mm(limit)
                ),
            )
            .suggest(step_below(limit)),
        );
    }
}

fn check_strap_clip_corner(ctx: &RuleContext<'_>, out: &mut Vec<Finding>) {
    let radius = ctx.get(Param::StrapClipRadius);
    let rim = ctx.get(Param::StrapClipRim);

    if greater_than(radius, rim) {
        out.push(
            Finding::error(
                RuleId::StrapClipCorner,
                Param::StrapClipRadius,
                format!(
                    "Strap clip corner radius {} cannot be larger than the clip rim ({}).",
                    mm(radius),
                    mm(rim)
                ),
            )
            .suggest(round_down(rim)),
        );
    }
}
