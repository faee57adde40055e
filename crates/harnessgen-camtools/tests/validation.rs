use harnessgen_camtools::validation::{validate, RuleId, Severity};
use harnessgen_core::{Param, ParameterSet, TileType};
use proptest::prelude::*;

/// Apply the suggestion of every finding produced by `rule` and check the
/// finding does not come back.
fn assert_suggestion_resolves(params: ParameterSet, rule: RuleId) {
    let report = validate(&params);
    let findings: Vec<_> = report.findings.iter().filter(|f| f.rule == rule).collect();
    assert!(!findings.is_empty(), "{rule} did not fire for {:?}", params);

    for finding in findings {
        let value = finding
            .suggestion
            .unwrap_or_else(|| panic!("{rule} gave no suggestion"));
        let fixed = params.with(finding.parameter, value);
        let again = validate(&fixed);
        assert!(
            !again
                .findings
                .iter()
                .any(|f| f.rule == rule && f.parameter == finding.parameter),
            "{rule} still fires after applying {} = {}",
            finding.parameter,
            value
        );
    }
}

#[test]
fn test_validation_is_deterministic() {
    let params = ParameterSet::defaults()
        .with(Param::RingRadius, 3.0)
        .with(Param::MagnetCount, 14.0)
        .with(Param::LinerThickness, 0.3);
    let first = validate(&params);
    for _ in 0..10 {
        assert_eq!(validate(&params), first);
    }
    assert!(first.has_errors());
    assert!(first.warnings().count() >= 1);
}

#[test]
fn test_validate_does_not_touch_input() {
    let params = ParameterSet::defaults().with(Param::RingRadius, 30.0);
    let copy = params;
    let _ = validate(&params);
    assert_eq!(params, copy);
}

#[test]
fn test_magnet_clearance_feasibility_boundary() {
    // 6 · (5 + 1) / 2π = 5.7295..., normalized to 5.73
    let base = ParameterSet::defaults();

    let at_threshold = base.with(Param::RingRadius, 5.73);
    assert!(validate(&at_threshold).find(RuleId::MagnetClearance).is_none());

    let below = base.with(Param::RingRadius, 5.72);
    let finding = validate(&below)
        .find(RuleId::MagnetClearance)
        .cloned()
        .unwrap();
    assert_eq!(finding.parameter, Param::RingRadius);
    assert_eq!(finding.severity, Severity::Error);
    assert_eq!(finding.suggestion, Some(5.73));
}

#[test]
fn test_clearance_threshold_that_rounds_down() {
    // 6 · (5 + 0) / 2π = 4.7746..., which normalizes below the threshold
    let base = ParameterSet::defaults().with(Param::Clearance, 0.0);

    let below = base.with(Param::RingRadius, 4.77);
    let finding = validate(&below)
        .find(RuleId::MagnetClearance)
        .cloned()
        .unwrap();
    assert_eq!(finding.suggestion, Some(4.78));

    let fixed = base.with(Param::RingRadius, 4.78);
    assert!(validate(&fixed).find(RuleId::MagnetClearance).is_none());
}

#[test]
fn test_strict_limits_suggest_the_passing_side() {
    // magnet thickness 2 + minimum wall 0.8
    let base = ParameterSet::defaults();
    let shallow = base.with(Param::CarrierHeight, 2.79);
    let finding = validate(&shallow).find(RuleId::CarrierDepth).cloned().unwrap();
    assert_eq!(finding.suggestion, Some(2.8));

    // inradius 43.30127 - tactor radius 10 - clearance 1 = 32.30127
    let inset = base.with(Param::LinerInset, 32.31);
    let finding = validate(&inset).find(RuleId::LinerFit).cloned().unwrap();
    assert_eq!(finding.suggestion, Some(32.3));
    assert!(validate(&base.with(Param::LinerInset, 32.3))
        .find(RuleId::LinerFit)
        .is_none());
}

#[test]
fn test_noise_is_not_flagged() {
    let noisy = ParameterSet::defaults().with(Param::RingRadius, 5.729999999999);
    assert!(validate(&noisy).find(RuleId::MagnetClearance).is_none());
}

#[test]
fn test_ring_proportion_uses_tile_shape() {
    // half the inscribed radius: 21.6506...
    let hexagon = ParameterSet::defaults().with(Param::RingRadius, 21.66);
    let finding = validate(&hexagon)
        .find(RuleId::RingProportion)
        .cloned()
        .unwrap();
    assert_eq!(finding.suggestion, Some(21.65));
    assert!(validate(&hexagon.with(Param::RingRadius, 21.65))
        .find(RuleId::RingProportion)
        .is_none());

    let square = ParameterSet::defaults()
        .with_tile_type(TileType::Square)
        .with(Param::RingRadius, 29.0);
    assert!(validate(&square).find(RuleId::RingProportion).is_none());
    let square = square.with(Param::RingRadius, 30.0);
    let finding = validate(&square)
        .find(RuleId::RingProportion)
        .cloned()
        .unwrap();
    assert_eq!(finding.suggestion, Some(29.99));
}

#[test]
fn test_every_rule_suggestion_resolves_its_finding() {
    let base = ParameterSet::defaults();
    let cases = [
        (base.with(Param::MagnetCount, 13.0), RuleId::MagnetCount),
        (base.with(Param::MagnetCount, 2.4), RuleId::MagnetCount),
        (base.with(Param::RingRadius, 5.0), RuleId::MagnetClearance),
        (base.with(Param::RingRadius, 25.0), RuleId::RingProportion),
        (base.with(Param::TactorDiameter, 40.0), RuleId::TactorClearance),
        (base.with(Param::SlitWidth, 45.0), RuleId::SlitLength),
        (base.with(Param::SlitInset, 20.0), RuleId::SlitRingClearance),
        (base.with(Param::Kerf, 1.0), RuleId::KerfProportion),
        (base.with(Param::CarrierHeight, 2.5), RuleId::CarrierDepth),
        (base.with(Param::ConnectorMagnetSpacing, 5.0), RuleId::ConnectorSpacing),
        (base.with(Param::ConnectorThickness, 2.0), RuleId::ConnectorDepth),
        (base.with(Param::CarrierWallThickness, 0.4), RuleId::ThinWall),
        (
            base.with(Param::ConnectorRimWidth, 0.2)
                .with(Param::LinerThickness, 0.5),
            RuleId::ThinWall,
        ),
        (base.with(Param::LinerInset, 40.0), RuleId::LinerFit),
        (base.with(Param::StrapClipThickness, 0.5), RuleId::ThinWall),
        (base.with(Param::StrapClipRadius, 2.5), RuleId::StrapClipCorner),
        (
            base.with_tile_type(TileType::Square)
                .with(Param::SlitWidth, 55.0),
            RuleId::SlitLength,
        ),
    ];

    for (params, rule) in cases {
        assert_suggestion_resolves(params, rule);
    }
}

#[test]
fn test_findings_follow_rule_table_order() {
    let params = ParameterSet::defaults()
        .with(Param::LinerInset, 40.0)
        .with(Param::MagnetCount, 20.0)
        .with(Param::Kerf, 1.0);
    let rules: Vec<_> = validate(&params).findings.iter().map(|f| f.rule).collect();
    let mut sorted = rules.clone();
    let position = |id: &RuleId| {
        harnessgen_camtools::validation::RULES
            .iter()
            .position(|r| r.id == *id)
            .unwrap()
    };
    sorted.sort_by_key(position);
    assert_eq!(rules, sorted);
    assert_eq!(rules.first(), Some(&RuleId::MagnetCount));
}

fn arb_params() -> impl Strategy<Value = ParameterSet> {
    (
        0..2u8,
        1.0..100.0f64,
        3..20u32,
        0.5..15.0f64,
        1.0..60.0f64,
        0.0..4.0f64,
        0.0..80.0f64,
        0.0..60.0f64,
        0.0..2.0f64,
        0.0..30.0f64,
    )
        .prop_map(
            |(tile, size, count, diameter, ring, clearance, tactor, slit, kerf, inset)| {
                ParameterSet::defaults()
                    .with(Param::TileType, tile as f64)
                    .with(Param::Circumradius, size)
                    .with(Param::SideLength, size)
                    .with(Param::MagnetCount, count as f64)
                    .with(Param::MagnetDiameter, diameter)
                    .with(Param::RingRadius, ring)
                    .with(Param::Clearance, clearance)
                    .with(Param::TactorDiameter, tactor)
                    .with(Param::SlitWidth, slit)
                    .with(Param::Kerf, kerf)
                    .with(Param::LinerInset, inset)
            },
        )
}

proptest! {
    #[test]
    fn proptest_suggestions_never_reproduce_their_finding(params in arb_params()) {
        let report = validate(&params);
        for finding in &report.findings {
            if let Some(value) = finding.suggestion {
                let again = validate(&params.with(finding.parameter, value));
                prop_assert!(
                    !again.findings.iter().any(|f| f.rule == finding.rule && f.parameter == finding.parameter),
                    "{} on {} not resolved by {}", finding.rule, finding.parameter, value
                );
            }
        }
    }

    #[test]
    fn proptest_validation_is_pure(params in arb_params()) {
        prop_assert_eq!(validate(&params), validate(&params));
    }
}
