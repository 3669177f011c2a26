//! Authalic latitude: the latitude on the sphere of equal surface area.
//!
//! Geodetic ↔ authalic conversion uses the sixth-order trigonometric series in
//! the third flattening `n` from Karney (2022), "On auxiliary latitudes",
//! summed with Clenshaw's method. For strongly flattened bodies (|n| ≥ 0.01)
//! the forward direction is evaluated exactly through `q`, and the inverse
//! series result is polished by Newton iteration (Snyder 1987, eq. 3-16).

use crate::error::ProjError;
use crate::proj::common::qsfn;
use crate::proj::ellipsoid::Ellipsoid;

/// Order of the series in `n`.
pub const ORDER: usize = 6;

/// Beyond this third flattening the truncated series is no longer trusted.
const SERIES_LIMIT: f64 = 0.01;

const NEWTON_MAX_ITER: usize = 10;
const NEWTON_TOL: f64 = 1e-15;

/// ξ - φ, coefficient of sin(2kφ) as polynomials in n (n¹ … n⁶).
const TO_AUTHALIC: [[f64; ORDER]; ORDER] = [
    [
        -4.0 / 3.0,
        -4.0 / 45.0,
        88.0 / 315.0,
        538.0 / 4725.0,
        20824.0 / 467775.0,
        -44732.0 / 2837835.0,
    ],
    [
        0.0,
        34.0 / 45.0,
        8.0 / 105.0,
        -2482.0 / 14175.0,
        -37192.0 / 467775.0,
        -12467764.0 / 212837625.0,
    ],
    [
        0.0,
        0.0,
        -1532.0 / 2835.0,
        -898.0 / 14175.0,
        54968.0 / 467775.0,
        100320856.0 / 1915538625.0,
    ],
    [
        0.0,
        0.0,
        0.0,
        6007.0 / 14175.0,
        24496.0 / 467775.0,
        -5884124.0 / 70945875.0,
    ],
    [0.0, 0.0, 0.0, 0.0, -23356.0 / 66825.0, -839792.0 / 19348875.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 570284222.0 / 1915538625.0],
];

/// φ - ξ, coefficient of sin(2kξ) as polynomials in n (n¹ … n⁶).
const TO_GEODETIC: [[f64; ORDER]; ORDER] = [
    [
        4.0 / 3.0,
        4.0 / 45.0,
        -16.0 / 35.0,
        -2582.0 / 14175.0,
        60136.0 / 467775.0,
        28112932.0 / 212837625.0,
    ],
    [
        0.0,
        46.0 / 45.0,
        152.0 / 945.0,
        -11966.0 / 14175.0,
        -21016.0 / 51975.0,
        251310128.0 / 638512875.0,
    ],
    [
        0.0,
        0.0,
        3044.0 / 2835.0,
        3802.0 / 14175.0,
        -94388.0 / 66825.0,
        -8797648.0 / 10945935.0,
    ],
    [
        0.0,
        0.0,
        0.0,
        6059.0 / 4725.0,
        41072.0 / 93555.0,
        -1472637812.0 / 638512875.0,
    ],
    [0.0, 0.0, 0.0, 0.0, 768272.0 / 467775.0, 455935736.0 / 638512875.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 4210684958.0 / 1915538625.0],
];

/// Series coefficients for one ellipsoid, evaluated at its third flattening.
///
/// The first `ORDER` entries convert geodetic → authalic, the last `ORDER`
/// authalic → geodetic.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthalicCoeffs {
    coeffs: Box<[f64]>,
}

impl AuthalicCoeffs {
    /// Evaluate the coefficient polynomials at third flattening `n`.
    ///
    /// Storage is reserved fallibly so an allocation failure surfaces as
    /// [`ProjError::OutOfMemory`] instead of aborting.
    pub fn new(n: f64) -> Result<Self, ProjError> {
        let mut coeffs = Vec::new();
        coeffs
            .try_reserve_exact(2 * ORDER)
            .map_err(|e| ProjError::OutOfMemory(format!("authalic coefficients: {e}")))?;

        coeffs.extend(TO_AUTHALIC.iter().map(|row| horner_n(row, n)));
        coeffs.extend(TO_GEODETIC.iter().map(|row| horner_n(row, n)));

        Ok(Self {
            coeffs: coeffs.into_boxed_slice(),
        })
    }

    pub fn to_authalic(&self) -> &[f64] {
        &self.coeffs[..ORDER]
    }

    pub fn to_geodetic(&self) -> &[f64] {
        &self.coeffs[ORDER..]
    }
}

/// `Σ row[j] · n^(j+1)`
fn horner_n(row: &[f64; ORDER], n: f64) -> f64 {
    n * row.iter().rev().fold(0.0, |acc, &c| acc * n + c)
}

/// Clenshaw summation of `Σ c[k] · sin(2(k+1)x)` given sin(2x) and cos(2x).
fn clenshaw_sin(c: &[f64], sin2x: f64, cos2x: f64) -> f64 {
    let two_cos = 2.0 * cos2x;
    let (mut u0, mut u1) = (0.0, 0.0);
    for &ck in c.iter().rev() {
        let t = two_cos * u0 - u1 + ck;
        u1 = u0;
        u0 = t;
    }
    u0 * sin2x
}

/// The authalic `q` function at sin φ.
pub fn authalic_q(sinphi: f64, ellipsoid: &Ellipsoid) -> f64 {
    qsfn(sinphi, ellipsoid.eccentricity())
}

/// Geodetic latitude φ → authalic latitude ξ.
///
/// `qp` is `authalic_q(1.0, ellipsoid)`, passed in because callers hold it
/// precomputed.
pub fn authalic_latitude(
    phi: f64,
    sinphi: f64,
    cosphi: f64,
    coeffs: &AuthalicCoeffs,
    ellipsoid: &Ellipsoid,
    qp: f64,
) -> f64 {
    if ellipsoid.n.abs() < SERIES_LIMIT {
        let sin2 = 2.0 * sinphi * cosphi;
        let cos2 = (cosphi - sinphi) * (cosphi + sinphi);
        phi + clenshaw_sin(coeffs.to_authalic(), sin2, cos2)
    } else {
        let ratio = (authalic_q(sinphi, ellipsoid) / qp).clamp(-1.0, 1.0);
        ratio.asin()
    }
}

/// Authalic latitude ξ → geodetic latitude φ.
pub fn authalic_latitude_inverse(
    beta: f64,
    coeffs: &AuthalicCoeffs,
    ellipsoid: &Ellipsoid,
    qp: f64,
) -> f64 {
    let (sinb, cosb) = beta.sin_cos();
    let sin2 = 2.0 * sinb * cosb;
    let cos2 = (cosb - sinb) * (cosb + sinb);
    let mut phi = beta + clenshaw_sin(coeffs.to_geodetic(), sin2, cos2);

    if ellipsoid.n.abs() < SERIES_LIMIT {
        return phi;
    }

    let e = ellipsoid.eccentricity();
    let es = ellipsoid.e2;
    let one_es = 1.0 - es;
    let q = sinb * qp;
    for _ in 0..NEWTON_MAX_ITER {
        let (sinphi, cosphi) = phi.sin_cos();
        if cosphi.abs() < 1e-12 {
            // at the pole dq/dφ vanishes, and the series is already exact there
            break;
        }
        let one_es_sin2 = 1.0 - es * sinphi * sinphi;
        let dphi = one_es_sin2 * one_es_sin2 / (2.0 * cosphi)
            * (q / one_es - sinphi / one_es_sin2 - (e * sinphi).atanh() / e);
        phi += dphi;
        if dphi.abs() < NEWTON_TOL {
            break;
        }
    }
    phi
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proj::ellipsoid::{Ellipsoid, CLARKE_1866, GRS80, WGS84};
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    fn exact_authalic(phi: f64, ell: &Ellipsoid) -> f64 {
        let qp = authalic_q(1.0, ell);
        (authalic_q(phi.sin(), ell) / qp).asin()
    }

    #[test]
    fn test_coeffs_layout() {
        let c = AuthalicCoeffs::new(WGS84.n).unwrap();
        assert_eq!(c.to_authalic().len(), ORDER);
        assert_eq!(c.to_geodetic().len(), ORDER);
        // First coefficient through n^2: ∓(4n/3 + 4n^2/45)
        let n = WGS84.n;
        let lead = 4.0 / 3.0 * n + 4.0 / 45.0 * n * n;
        assert_relative_eq!(c.to_authalic()[0], -lead, epsilon = 1e-8);
        assert_relative_eq!(c.to_geodetic()[0], lead, epsilon = 1e-8);
    }

    #[test]
    fn test_coeffs_vanish_for_sphere() {
        let c = AuthalicCoeffs::new(0.0).unwrap();
        assert!(c.to_authalic().iter().all(|&v| v == 0.0));
        assert!(c.to_geodetic().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_series_matches_exact_q() {
        for ell in [WGS84, GRS80, CLARKE_1866] {
            let coeffs = AuthalicCoeffs::new(ell.n).unwrap();
            let qp = authalic_q(1.0, &ell);
            for deg in [-89.0, -60.0, -33.3, -1.0, 0.0, 12.5, 45.0, 71.0, 89.9] {
                let phi = f64::to_radians(deg);
                let (s, c) = phi.sin_cos();
                let xi = authalic_latitude(phi, s, c, &coeffs, &ell, qp);
                assert_relative_eq!(xi, exact_authalic(phi, &ell), epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_authalic_below_geodetic_in_north() {
        let coeffs = AuthalicCoeffs::new(WGS84.n).unwrap();
        let qp = authalic_q(1.0, &WGS84);
        let phi = 45.0_f64.to_radians();
        let xi = authalic_latitude(phi, phi.sin(), phi.cos(), &coeffs, &WGS84, qp);
        // Snyder table 3: about 0.128° less at 45° for Clarke 1866
        let diff = (phi - xi).to_degrees();
        assert!(diff > 0.12 && diff < 0.13, "diff = {diff}");
    }

    #[test]
    fn test_inverse_roundtrip() {
        let coeffs = AuthalicCoeffs::new(GRS80.n).unwrap();
        let qp = authalic_q(1.0, &GRS80);
        for deg in [-90.0, -75.0, -20.0, 0.0, 3.0, 52.0, 88.0, 90.0] {
            let phi = f64::to_radians(deg);
            let xi = authalic_latitude(phi, phi.sin(), phi.cos(), &coeffs, &GRS80, qp);
            let back = authalic_latitude_inverse(xi, &coeffs, &GRS80, qp);
            assert_relative_eq!(back, phi, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_poles_are_fixed_points() {
        let coeffs = AuthalicCoeffs::new(WGS84.n).unwrap();
        let qp = authalic_q(1.0, &WGS84);
        let xi = authalic_latitude(FRAC_PI_2, 1.0, 0.0, &coeffs, &WGS84, qp);
        assert_relative_eq!(xi, FRAC_PI_2, epsilon = 1e-15);
        let phi = authalic_latitude_inverse(-FRAC_PI_2, &coeffs, &WGS84, qp);
        assert_relative_eq!(phi, -FRAC_PI_2, epsilon = 1e-14);
    }

    #[test]
    fn test_strongly_flattened_uses_newton() {
        // n ≈ 0.017, outside the series range
        let ell = Ellipsoid::new(1.0, 1.0 / 30.0);
        assert!(ell.n >= SERIES_LIMIT);
        let coeffs = AuthalicCoeffs::new(ell.n).unwrap();
        let qp = authalic_q(1.0, &ell);
        for deg in [-80.0, -40.0, 0.0, 10.0, 60.0, 85.0] {
            let phi = f64::to_radians(deg);
            let xi = authalic_latitude(phi, phi.sin(), phi.cos(), &coeffs, &ell, qp);
            assert_relative_eq!(xi, exact_authalic(phi, &ell), epsilon = 1e-15);
            let back = authalic_latitude_inverse(xi, &coeffs, &ell, qp);
            assert_relative_eq!(back, phi, epsilon = 1e-12);
        }
    }
}
