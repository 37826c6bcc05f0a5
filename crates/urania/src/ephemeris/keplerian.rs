//! Built-in analytical ephemeris.
//!
//! Planets use the JPL "approximate positions of the planets" Keplerian
//! elements (valid 1800-2050, errors of a few arcminutes for the inner
//! planets). The Earth-Moon barycentre stands in for the observer. The Moon
//! uses a mean orbit corrected by its twelve largest longitude terms.

use crate::ephemeris::provider::EphemerisProvider;
use crate::ephemeris::time::{centuries_since_j2000, julian_day, utc_from_unix};
use crate::ephemeris::types::{EphemerisError, EphemerisSample};
use crate::zodiac::normalize_degrees;
use chrono::{DateTime, Utc};
use std::f64::consts::TAU;

/// 1800-01-01T00:00:00Z
const RANGE_START_UNIX: i64 = -5_364_662_400;
/// 2051-01-01T00:00:00Z
const RANGE_END_UNIX: i64 = 2_556_144_000;

/// Earth equatorial radius in AU
const EARTH_RADIUS_AU: f64 = 6378.137 / 149_597_870.7;

/// Keplerian elements at J2000 and their rates per Julian century:
/// semi-major axis (AU), eccentricity, inclination, mean longitude,
/// longitude of perihelion, longitude of ascending node (degrees).
struct OrbitalElements {
    base: [f64; 6],
    rate: [f64; 6],
}

const MERCURY: OrbitalElements = OrbitalElements {
    base: [0.38709927, 0.20563593, 7.00497902, 252.25032350, 77.45779628, 48.33076593],
    rate: [0.00000037, 0.00001906, -0.00594749, 149472.67411175, 0.16047689, -0.12534081],
};
const VENUS: OrbitalElements = OrbitalElements {
    base: [0.72333566, 0.00677672, 3.39467605, 181.97909950, 131.60246718, 76.67984255],
    rate: [0.00000390, -0.00004107, -0.00078890, 58517.81538729, 0.00268329, -0.27769418],
};
const EARTH_MOON_BARYCENTER: OrbitalElements = OrbitalElements {
    base: [1.00000261, 0.01671123, -0.00001531, 100.46457166, 102.93768193, 0.0],
    rate: [0.00000562, -0.00004392, -0.01294668, 35999.37244981, 0.32327364, 0.0],
};
const MARS: OrbitalElements = OrbitalElements {
    base: [1.52371034, 0.09339410, 1.84969142, -4.55343205, -23.94362959, 49.55953891],
    rate: [0.00001847, 0.00007882, -0.00813131, 19140.30268499, 0.44441088, -0.29257343],
};
const JUPITER: OrbitalElements = OrbitalElements {
    base: [5.20288700, 0.04838624, 1.30439695, 34.39644051, 14.72847983, 100.47390909],
    rate: [-0.00011607, -0.00013253, -0.00183714, 3034.74612775, 0.21252668, 0.20469106],
};
const SATURN: OrbitalElements = OrbitalElements {
    base: [9.53667594, 0.05386179, 2.48599187, 49.95424423, 92.59887831, 113.66242448],
    rate: [-0.00125060, -0.00050991, 0.00193609, 1222.49362201, -0.41897216, -0.28867794],
};
const URANUS: OrbitalElements = OrbitalElements {
    base: [19.18916464, 0.04725744, 0.77263783, 313.23810451, 170.95427630, 74.01692503],
    rate: [-0.00196176, -0.00004397, -0.00242939, 428.48202785, 0.40805281, 0.04240589],
};
const NEPTUNE: OrbitalElements = OrbitalElements {
    base: [30.06992276, 0.00859048, 1.77004347, -55.12002969, 44.96476227, 131.78422574],
    rate: [0.00026291, 0.00005105, 0.00035372, 218.45945325, -0.32241464, -0.00508664],
};
const PLUTO: OrbitalElements = OrbitalElements {
    base: [39.48211675, 0.24882730, 17.14001206, 238.92903833, 224.06891629, 110.30393684],
    rate: [-0.00031596, 0.00005170, 0.00004818, 145.20780515, -0.04062942, -0.01183482],
};

impl OrbitalElements {
    /// Heliocentric position in the J2000 ecliptic frame (AU)
    fn heliocentric(&self, t: f64) -> [f64; 3] {
        let mut el = [0.0; 6];
        for (k, value) in el.iter_mut().enumerate() {
            *value = self.base[k] + self.rate[k] * t;
        }
        let [a, e, incl, mean_lon, peri_lon, node] = el;

        let arg_peri = (peri_lon - node).to_radians();
        let mean_anomaly = signed_degrees(mean_lon - peri_lon).to_radians();
        let ecc_anomaly = solve_kepler(mean_anomaly, e);

        let xp = a * (ecc_anomaly.cos() - e);
        let yp = a * (1.0 - e * e).sqrt() * ecc_anomaly.sin();

        let (sw, cw) = arg_peri.sin_cos();
        let (sn, cn) = node.to_radians().sin_cos();
        let (si, ci) = incl.to_radians().sin_cos();

        [
            (cw * cn - sw * sn * ci) * xp + (-sw * cn - cw * sn * ci) * yp,
            (cw * sn + sw * cn * ci) * xp + (-sw * sn + cw * cn * ci) * yp,
            (sw * si) * xp + (cw * si) * yp,
        ]
    }
}

/// Solve Kepler's equation `E - e sin E = M` (radians) by Newton iteration.
fn solve_kepler(mean_anomaly: f64, e: f64) -> f64 {
    let mut ecc = mean_anomaly + e * mean_anomaly.sin();
    for _ in 0..32 {
        let delta = (ecc - e * ecc.sin() - mean_anomaly) / (1.0 - e * ecc.cos());
        ecc -= delta;
        if delta.abs() < 1e-12 {
            break;
        }
    }
    ecc
}

/// Fold degrees into `(-180, 180]`
fn signed_degrees(degrees: f64) -> f64 {
    let folded = normalize_degrees(degrees);
    if folded > 180.0 {
        folded - 360.0
    } else {
        folded
    }
}

/// General precession in longitude from J2000 to the equinox of date (degrees)
fn precession_in_longitude(t: f64) -> f64 {
    1.396_971_3 * t + 0.000_308_6 * t * t
}

/// Mean obliquity of the ecliptic of date (degrees)
fn mean_obliquity(t: f64) -> f64 {
    23.439_291_1 - 0.013_004_2 * t - 1.64e-7 * t * t
}

/// Ecliptic spherical coordinates of date: longitude (deg), latitude (deg), distance (AU)
struct EclipticPosition {
    lon: f64,
    lat: f64,
    dist: f64,
}

impl EclipticPosition {
    fn from_j2000_vector(v: [f64; 3], t: f64) -> Self {
        let [x, y, z] = v;
        let lon = y.atan2(x).to_degrees() + precession_in_longitude(t);
        let lat = z.atan2(x.hypot(y)).to_degrees();
        Self {
            lon: normalize_degrees(lon),
            lat,
            dist: (x * x + y * y + z * z).sqrt(),
        }
    }

    fn to_sample(&self, t: f64) -> EphemerisSample {
        let (sl, cl) = self.lon.to_radians().sin_cos();
        let (sb, cb) = self.lat.to_radians().sin_cos();
        let (se, ce) = mean_obliquity(t).to_radians().sin_cos();

        let x = cb * cl;
        let y = cb * sl * ce - sb * se;
        let z = cb * sl * se + sb * ce;

        EphemerisSample {
            ecliptic_longitude_deg: self.lon,
            ecliptic_latitude_deg: self.lat,
            right_ascension_rad: y.atan2(x).rem_euclid(TAU),
            declination_rad: z.atan2(x.hypot(y)),
            distance_au: self.dist,
        }
    }
}

/// Geocentric Moon, ecliptic of date.
fn moon_position(jd: f64) -> EclipticPosition {
    // Day number counted from 1999-12-31 0h
    let d = jd - 2_451_543.5;

    let node = 125.1228 - 0.052_953_808_3 * d;
    let incl = 5.1454_f64;
    let arg_peri = 318.0634 + 0.164_357_322_3 * d;
    let a = 60.2666; // Earth radii
    let e = 0.054_900;
    let mean_anomaly = 115.3654 + 13.064_992_950_9 * d;

    let ecc = solve_kepler(normalize_degrees(mean_anomaly).to_radians(), e);
    let xv = a * (ecc.cos() - e);
    let yv = a * (1.0 - e * e).sqrt() * ecc.sin();
    let true_anomaly = yv.atan2(xv);
    let r = xv.hypot(yv);

    let (sn, cn) = node.to_radians().sin_cos();
    let (si, ci) = incl.to_radians().sin_cos();
    let (su, cu) = (true_anomaly + arg_peri.to_radians()).sin_cos();
    let xh = r * (cn * cu - sn * su * ci);
    let yh = r * (sn * cu + cn * su * ci);
    let zh = r * su * si;

    let mut lon = yh.atan2(xh).to_degrees();
    let mut lat = zh.atan2(xh.hypot(yh)).to_degrees();
    let mut dist = r;

    // Perturbation arguments
    let sun_mean_anomaly = 356.0470 + 0.985_600_258_5 * d;
    let sun_arg_peri = 282.9404 + 4.709_35e-5 * d;
    let sun_mean_lon = sun_mean_anomaly + sun_arg_peri;
    let moon_mean_lon = node + arg_peri + mean_anomaly;
    let elong = (moon_mean_lon - sun_mean_lon).to_radians();
    let lat_arg = (moon_mean_lon - node).to_radians();
    let mm = mean_anomaly.to_radians();
    let ms = sun_mean_anomaly.to_radians();

    lon += -1.274 * (mm - 2.0 * elong).sin()
        + 0.658 * (2.0 * elong).sin()
        - 0.186 * ms.sin()
        - 0.059 * (2.0 * mm - 2.0 * elong).sin()
        - 0.057 * (mm - 2.0 * elong + ms).sin()
        + 0.053 * (mm + 2.0 * elong).sin()
        + 0.046 * (2.0 * elong - ms).sin()
        + 0.041 * (mm - ms).sin()
        - 0.035 * elong.sin()
        - 0.031 * (mm + ms).sin()
        - 0.015 * (2.0 * lat_arg - 2.0 * elong).sin()
        + 0.011 * (mm - 4.0 * elong).sin();

    lat += -0.173 * (lat_arg - 2.0 * elong).sin()
        - 0.055 * (mm - lat_arg - 2.0 * elong).sin()
        - 0.046 * (mm + lat_arg - 2.0 * elong).sin()
        + 0.033 * (lat_arg + 2.0 * elong).sin()
        + 0.017 * (2.0 * mm + lat_arg).sin();

    dist += -0.58 * (mm - 2.0 * elong).cos() - 0.46 * (2.0 * elong).cos();

    EclipticPosition {
        lon: normalize_degrees(lon),
        lat,
        dist: dist * EARTH_RADIUS_AU,
    }
}

fn planet_elements(key: &str) -> Option<&'static OrbitalElements> {
    match key {
        "mercury" => Some(&MERCURY),
        "venus" => Some(&VENUS),
        "mars" => Some(&MARS),
        "jupiter" => Some(&JUPITER),
        "saturn" => Some(&SATURN),
        "uranus" => Some(&URANUS),
        "neptune" => Some(&NEPTUNE),
        "pluto" => Some(&PLUTO),
        _ => None,
    }
}

/// Analytical ephemeris needing no data files
#[derive(Debug, Clone, Copy, Default)]
pub struct KeplerianEphemeris;

impl KeplerianEphemeris {
    pub fn new() -> Self {
        Self
    }
}

impl EphemerisProvider for KeplerianEphemeris {
    fn name(&self) -> &str {
        "keplerian"
    }

    fn supported_range(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (utc_from_unix(RANGE_START_UNIX), utc_from_unix(RANGE_END_UNIX))
    }

    fn query(&self, key: &str, instant: DateTime<Utc>) -> Result<EphemerisSample, EphemerisError> {
        if !self.supports(instant) {
            return Err(self.out_of_range(instant));
        }

        let jd = julian_day(instant);
        let t = centuries_since_j2000(jd);

        let position = match key {
            "moon" => moon_position(jd),
            "sun" => {
                let [x, y, z] = EARTH_MOON_BARYCENTER.heliocentric(t);
                EclipticPosition::from_j2000_vector([-x, -y, -z], t)
            }
            other => {
                let elements = planet_elements(other).ok_or_else(|| EphemerisError::UnknownBody {
                    key: other.to_string(),
                })?;
                let planet = elements.heliocentric(t);
                let earth = EARTH_MOON_BARYCENTER.heliocentric(t);
                EclipticPosition::from_j2000_vector(
                    [planet[0] - earth[0], planet[1] - earth[1], planet[2] - earth[2]],
                    t,
                )
            }
        };

        let sample = position.to_sample(t);
        if !sample.ecliptic_longitude_deg.is_finite() || !sample.distance_au.is_finite() {
            return Err(EphemerisError::CalculationFailed {
                key: key.to_string(),
                instant,
                message: "non-finite position".to_string(),
            });
        }
        Ok(sample)
    }
}
