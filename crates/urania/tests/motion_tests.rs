mod common;

use chrono::{Duration, TimeZone, Utc};
use common::{base_instant, full_stub, StubEphemeris};
use urania::motion::{PositionCalculator, MOTION_STEP_SECONDS};
use urania::{ChartError, TrackedBody, ZodiacSign};

#[test]
fn test_decreasing_longitude_is_retrograde() {
    let stub = StubEphemeris::new(base_instant()).with_motion(TrackedBody::Mars, 101.0, 100.0);
    let calculator = PositionCalculator::new(&stub);

    let positions = calculator.compute(base_instant(), &[TrackedBody::Mars]).unwrap();
    let mars = &positions[&TrackedBody::Mars];

    assert!(mars.is_retrograde);
    assert!((mars.longitude_delta_deg + 1.0).abs() < 1e-9);
    assert_eq!(mars.zodiac_sign, ZodiacSign::Cancer);
}

#[test]
fn test_increasing_longitude_is_direct() {
    let stub = StubEphemeris::new(base_instant()).with_motion(TrackedBody::Jupiter, 100.0, 101.0);
    let positions = PositionCalculator::new(&stub)
        .compute(base_instant(), &[TrackedBody::Jupiter])
        .unwrap();

    assert!(!positions[&TrackedBody::Jupiter].is_retrograde);
}

#[test]
fn test_crossing_zero_aries_is_direct() {
    let stub = StubEphemeris::new(base_instant()).with_motion(TrackedBody::Venus, 359.5, 0.3);
    let positions = PositionCalculator::new(&stub)
        .compute(base_instant(), &[TrackedBody::Venus])
        .unwrap();
    let venus = &positions[&TrackedBody::Venus];

    assert!((venus.longitude_delta_deg - 0.8).abs() < 1e-9);
    assert!(!venus.is_retrograde);
    assert_eq!(venus.zodiac_sign, ZodiacSign::Pisces);
}

#[test]
fn test_backing_over_zero_aries_is_retrograde() {
    let stub = StubEphemeris::new(base_instant()).with_motion(TrackedBody::Pluto, 0.2, 359.9);
    let positions = PositionCalculator::new(&stub)
        .compute(base_instant(), &[TrackedBody::Pluto])
        .unwrap();

    assert!(positions[&TrackedBody::Pluto].is_retrograde);
}

#[test]
fn test_sun_and_moon_never_retrograde() {
    let stub = StubEphemeris::new(base_instant())
        .with_motion(TrackedBody::Sun, 200.0, 199.0)
        .with_motion(TrackedBody::Moon, 15.0, 10.0);
    let positions = PositionCalculator::new(&stub)
        .compute(base_instant(), &[TrackedBody::Sun, TrackedBody::Moon])
        .unwrap();

    assert!(!positions[&TrackedBody::Sun].is_retrograde);
    assert!(!positions[&TrackedBody::Moon].is_retrograde);
    assert!(positions[&TrackedBody::Moon].longitude_delta_deg < 0.0);
}

#[test]
fn test_longitudes_are_normalized() {
    let stub = StubEphemeris::new(base_instant()).with_motion(TrackedBody::Saturn, -15.0, 345.5);
    let positions = PositionCalculator::new(&stub)
        .compute(base_instant(), &[TrackedBody::Saturn])
        .unwrap();
    let saturn = &positions[&TrackedBody::Saturn];

    assert!((saturn.ecliptic_longitude_deg - 345.0).abs() < 1e-9);
    assert!(!saturn.is_retrograde);
}

#[test]
fn test_every_body_sampled_at_same_two_instants() {
    let stub = full_stub([0.0, 30.0, 60.0, 90.0, 120.0, 150.0, 180.0, 210.0, 240.0, 270.0]);
    let positions = PositionCalculator::new(&stub)
        .compute(base_instant(), &TrackedBody::ALL)
        .unwrap();
    assert_eq!(positions.len(), 10);

    let calls = stub.calls.lock().unwrap();
    assert_eq!(calls.len(), 20);
    let later = base_instant() + Duration::seconds(MOTION_STEP_SECONDS);
    for body in TrackedBody::ALL {
        let instants: Vec<_> = calls
            .iter()
            .filter(|(key, _)| key == body.key())
            .map(|(_, t)| *t)
            .collect();
        assert_eq!(instants, vec![base_instant(), later], "{}", body);
    }
}

#[test]
fn test_provider_failure_aborts_whole_run() {
    let stub = full_stub([0.0; 10]).failing_on(TrackedBody::Neptune);
    let result = PositionCalculator::new(&stub).compute(base_instant(), &TrackedBody::ALL);

    match result {
        Err(ChartError::ProviderUnavailable { body, instant, .. }) => {
            assert_eq!(body, TrackedBody::Neptune);
            assert_eq!(instant, base_instant());
        }
        other => panic!("expected ProviderUnavailable, got {:?}", other),
    }
}

#[test]
fn test_unknown_body_key_is_provider_unavailable() {
    // Only the Sun is known to this stub
    let stub = StubEphemeris::new(base_instant()).with_motion(TrackedBody::Sun, 10.0, 10.01);
    let result = PositionCalculator::new(&stub).compute(base_instant(), &[TrackedBody::Sun, TrackedBody::Moon]);

    assert!(matches!(
        result,
        Err(ChartError::ProviderUnavailable { body: TrackedBody::Moon, .. })
    ));
}

#[test]
fn test_out_of_range_instant_rejected_before_queries() {
    let stub = full_stub([0.0; 10]);
    let too_early = Utc.with_ymd_and_hms(1850, 1, 1, 0, 0, 0).unwrap();
    let result = PositionCalculator::new(&stub).compute(too_early, &TrackedBody::ALL);

    assert!(matches!(result, Err(ChartError::InvalidInstant { .. })));
    assert_eq!(stub.call_count(), 0);
}

#[test]
fn test_motion_sample_must_also_be_in_range() {
    let stub = full_stub([0.0; 10]);
    let end = Utc.with_ymd_and_hms(2100, 1, 1, 0, 0, 0).unwrap();
    let result = PositionCalculator::new(&stub).compute(end - Duration::seconds(30), &TrackedBody::ALL);

    assert!(matches!(result, Err(ChartError::InvalidInstant { .. })));
    assert_eq!(stub.call_count(), 0);
}

#[test]
fn test_cartesian_uses_display_scale() {
    let stub = StubEphemeris::new(base_instant()).with_motion(TrackedBody::Mercury, 0.0, 0.1);
    let positions = PositionCalculator::new(&stub)
        .compute(base_instant(), &[TrackedBody::Mercury])
        .unwrap();
    let c = positions[&TrackedBody::Mercury].cartesian;

    // Stub reports 1 AU at RA 0, dec 0
    assert!((c.x - urania::DISPLAY_SCALE).abs() < 1e-9);
    assert!(c.y.abs() < 1e-9);
    assert!(c.z.abs() < 1e-9);
}
