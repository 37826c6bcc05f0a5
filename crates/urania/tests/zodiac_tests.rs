use urania::zodiac::{ruler_of, sign_for, RulerScheme, ZodiacSign, SIGN_BANDS};
use urania::TrackedBody;

#[test]
fn test_sign_for_band_edges() {
    assert_eq!(sign_for(0.0), ZodiacSign::Aries);
    assert_eq!(sign_for(29.999), ZodiacSign::Aries);
    assert_eq!(sign_for(30.0), ZodiacSign::Taurus);
    assert_eq!(sign_for(359.999), ZodiacSign::Pisces);
}

#[test]
fn test_sign_for_is_periodic() {
    for lon in [0.0, 12.5, 29.999, 30.0, 145.0, 210.0, 299.9, 330.0, 359.999] {
        for k in -3..=3 {
            let shifted = lon + 360.0 * f64::from(k);
            assert_eq!(sign_for(lon), sign_for(shifted), "{} vs {}", lon, shifted);
        }
    }
}

#[test]
fn test_every_band_start_belongs_to_its_sign() {
    for (sign, start) in SIGN_BANDS {
        assert_eq!(sign_for(start), sign);
        assert_eq!(sign_for(start + 29.5), sign);
        assert_eq!(sign.start_degree(), start);
    }
}

#[test]
fn test_leo_is_ruled_by_sun() {
    for scheme in [RulerScheme::Hybrid, RulerScheme::Traditional, RulerScheme::Modern] {
        assert_eq!(ruler_of(ZodiacSign::Leo, scheme), TrackedBody::Sun);
    }
}
