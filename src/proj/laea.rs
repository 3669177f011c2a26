//! Lambert Azimuthal Equal Area projection for the polar, equatorial and oblique
//! aspects, on the sphere and on the ellipsoid.
//!
//! [`Laea`] works in normalised units (unit semi-major axis, longitude already
//! reduced to the central meridian). [`LambertAzimuthalEqualArea`] wraps it
//! with `lon0`, the semi-major axis and false easting/northing.
//!
//! EPSG:3035 (ETRS89-LAEA Europe), EPSG:6931/6932 (EASE-Grid 2.0 North/South),
//! EPSG:3571–3576 (North Pole LAEA), EPSG:2163 (US National Atlas, sphere).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::error::ProjError;
use crate::proj::authalic::{
    authalic_latitude, authalic_latitude_inverse, authalic_q, AuthalicCoeffs,
};
use crate::proj::common::{adjlon, EPS10};
use crate::proj::ellipsoid::{Ellipsoid, CLARKE_1866_AUTHALIC, GRS80, WGS84};
use crate::proj::Projection;

/// Below this the polar forward collapses onto the projection centre.
const POLAR_Q_MIN: f64 = 1e-15;

/// Which point of the globe the projection is centred on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aspect {
    NorthPole,
    SouthPole,
    Equatorial,
    Oblique,
}

impl Aspect {
    /// Classify a centre latitude (radians).
    pub fn from_lat0(phi0: f64) -> Self {
        let t = phi0.abs();
        if (t - FRAC_PI_2).abs() < EPS10 {
            if phi0 < 0.0 {
                Aspect::SouthPole
            } else {
                Aspect::NorthPole
            }
        } else if t < EPS10 {
            Aspect::Equatorial
        } else {
            Aspect::Oblique
        }
    }

    pub fn is_polar(self) -> bool {
        matches!(self, Aspect::NorthPole | Aspect::SouthPole)
    }
}

/// Constants of the ellipsoidal model.
#[derive(Debug, Clone)]
struct Ellipsoidal {
    ellipsoid: Ellipsoid,
    /// Authalic q at the pole
    qp: f64,
    mmf: f64,
    /// Authalic sphere radius in units of `a`: sqrt(qp / 2)
    rq: f64,
    dd: f64,
    xmf: f64,
    ymf: f64,
    apa: AuthalicCoeffs,
}

#[derive(Debug, Clone)]
enum Model {
    Spherical,
    Ellipsoidal(Ellipsoidal),
}

/// Precomputed LAEA state for one centre latitude and one ellipsoid.
///
/// Built once by [`Laea::new`], immutable afterwards. The forward/inverse pair
/// is selected by the model (sphere or ellipsoid) and the [`Aspect`].
#[derive(Debug, Clone)]
pub struct Laea {
    phi0: f64,
    aspect: Aspect,
    sinb1: f64,
    cosb1: f64,
    model: Model,
}

impl Laea {
    /// Set up the projection for centre latitude `phi0` (radians).
    ///
    /// Only `e2` and `n` of the ellipsoid are used; the semi-major axis is
    /// applied by the caller. Fails with [`ProjError::InvalidParameter`] when
    /// `|phi0| > 90°` and with [`ProjError::OutOfMemory`] when the authalic
    /// coefficients cannot be allocated.
    pub fn new(phi0: f64, ellipsoid: &Ellipsoid) -> Result<Self, ProjError> {
        if !phi0.is_finite() || phi0.abs() > FRAC_PI_2 + EPS10 {
            tracing::error!(
                lat_0 = phi0.to_degrees(),
                "Invalid value for lat_0: |lat_0| should be <= 90°"
            );
            return Err(ProjError::InvalidParameter(format!(
                "|lat_0| should be <= 90°, got {}°",
                phi0.to_degrees()
            )));
        }
        if !(0.0..1.0).contains(&ellipsoid.f) {
            tracing::error!(f = ellipsoid.f, "Invalid flattening");
            return Err(ProjError::InvalidParameter(format!(
                "flattening must be in [0, 1), got {}",
                ellipsoid.f
            )));
        }
        let es = ellipsoid.e2;
        if !(0.0..1.0).contains(&es) {
            tracing::error!(es, "Invalid squared eccentricity");
            return Err(ProjError::InvalidParameter(format!(
                "squared eccentricity must be in [0, 1), got {es}"
            )));
        }

        let aspect = Aspect::from_lat0(phi0);

        let laea = if es != 0.0 {
            Self::ellipsoidal(phi0, aspect, ellipsoid)?
        } else {
            let (sinb1, cosb1) = if aspect == Aspect::Oblique {
                phi0.sin_cos()
            } else {
                (0.0, 0.0)
            };
            Self {
                phi0,
                aspect,
                sinb1,
                cosb1,
                model: Model::Spherical,
            }
        };

        match &laea.model {
            Model::Ellipsoidal(c) => tracing::debug!(
                ?aspect,
                lat_0 = phi0.to_degrees(),
                qp = c.qp,
                rq = c.rq,
                dd = c.dd,
                xmf = c.xmf,
                ymf = c.ymf,
                mmf = c.mmf,
                "LAEA ellipsoidal setup"
            ),
            Model::Spherical => tracing::debug!(
                ?aspect,
                lat_0 = phi0.to_degrees(),
                "LAEA spherical setup"
            ),
        }

        Ok(laea)
    }

    fn ellipsoidal(phi0: f64, aspect: Aspect, ellipsoid: &Ellipsoid) -> Result<Self, ProjError> {
        let es = ellipsoid.e2;
        let qp = authalic_q(1.0, ellipsoid);
        let mmf = 0.5 / (1.0 - es);
        let apa = AuthalicCoeffs::new(ellipsoid.n)?;

        let mut sinb1 = 0.0;
        let mut cosb1 = 0.0;
        let (rq, dd, xmf, ymf) = match aspect {
            Aspect::NorthPole | Aspect::SouthPole => (0.0, 1.0, 0.0, 0.0),
            Aspect::Equatorial => {
                let rq = (0.5 * qp).sqrt();
                (rq, 1.0 / rq, 1.0, 0.5 * qp)
            }
            Aspect::Oblique => {
                let rq = (0.5 * qp).sqrt();
                let (sinphi, cosphi) = phi0.sin_cos();
                let b1 = authalic_latitude(phi0, sinphi, cosphi, &apa, ellipsoid, qp);
                (sinb1, cosb1) = b1.sin_cos();
                let dd = cosphi / ((1.0 - es * sinphi * sinphi).sqrt() * rq * cosb1);
                (rq, dd, rq * dd, rq / dd)
            }
        };

        Ok(Self {
            phi0,
            aspect,
            sinb1,
            cosb1,
            model: Model::Ellipsoidal(Ellipsoidal {
                ellipsoid: *ellipsoid,
                qp,
                mmf,
                rq,
                dd,
                xmf,
                ymf,
                apa,
            }),
        })
    }

    pub fn aspect(&self) -> Aspect {
        self.aspect
    }

    /// Centre latitude in radians.
    pub fn phi0(&self) -> f64 {
        self.phi0
    }

    pub fn is_spherical(&self) -> bool {
        matches!(self.model, Model::Spherical)
    }

    /// Forward: (lam, phi) in radians, lam relative to the central meridian
    /// -> normalised (x, y).
    pub fn forward(&self, lam: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        match &self.model {
            Model::Ellipsoidal(c) => self.e_forward(c, lam, phi),
            Model::Spherical => self.s_forward(lam, phi),
        }
    }

    /// Inverse: normalised (x, y) -> (lam, phi) in radians.
    pub fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        match &self.model {
            Model::Ellipsoidal(c) => self.e_inverse(c, x, y),
            Model::Spherical => self.s_inverse(x, y),
        }
    }

    fn outside(&self, x: f64, y: f64) -> ProjError {
        tracing::trace!(x, y, aspect = ?self.aspect, "outside projection domain");
        ProjError::OutsideDomain { x, y }
    }

    fn e_forward(&self, c: &Ellipsoidal, lam: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let (sinlam, coslam) = lam.sin_cos();
        let (sinphi, cosphi) = phi.sin_cos();
        let xi = authalic_latitude(phi, sinphi, cosphi, &c.apa, &c.ellipsoid, c.qp);
        let (sinb, cosb) = xi.sin_cos();
        let mut q = sinb * c.qp;

        let b = match self.aspect {
            Aspect::Oblique => 1.0 + self.sinb1 * sinb + self.cosb1 * cosb * coslam,
            Aspect::Equatorial => 1.0 + cosb * coslam,
            Aspect::NorthPole => {
                q = c.qp - q;
                FRAC_PI_2 + phi
            }
            Aspect::SouthPole => {
                q = c.qp + q;
                phi - FRAC_PI_2
            }
        };
        if b.abs() < EPS10 {
            return Err(self.outside(lam, phi));
        }

        match self.aspect {
            Aspect::Oblique => {
                let b = (2.0 / b).sqrt();
                let y = c.ymf * b * (self.cosb1 * sinb - self.sinb1 * cosb * coslam);
                Ok((c.xmf * b * cosb * sinlam, y))
            }
            Aspect::Equatorial => {
                let b = (2.0 / b).sqrt();
                Ok((c.xmf * b * cosb * sinlam, b * sinb * c.ymf))
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                if q >= POLAR_Q_MIN {
                    let b = q.sqrt();
                    let signed = if self.aspect == Aspect::SouthPole { b } else { -b };
                    Ok((b * sinlam, coslam * signed))
                } else {
                    Ok((0.0, 0.0))
                }
            }
        }
    }

    fn s_forward(&self, lam: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let (sinphi, cosphi) = phi.sin_cos();
        let mut coslam = lam.cos();

        match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                let denom = if self.aspect == Aspect::Equatorial {
                    1.0 + cosphi * coslam
                } else {
                    1.0 + self.sinb1 * sinphi + self.cosb1 * cosphi * coslam
                };
                if denom <= EPS10 {
                    return Err(self.outside(lam, phi));
                }
                let k = (2.0 / denom).sqrt();
                let x = k * cosphi * lam.sin();
                let y = k * if self.aspect == Aspect::Equatorial {
                    sinphi
                } else {
                    self.cosb1 * sinphi - self.sinb1 * cosphi * coslam
                };
                Ok((x, y))
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                // North shares the south arithmetic with cos(lam) flipped
                if self.aspect == Aspect::NorthPole {
                    coslam = -coslam;
                }
                if (phi + self.phi0).abs() < EPS10 {
                    return Err(self.outside(lam, phi));
                }
                let t = FRAC_PI_4 - phi * 0.5;
                let y = 2.0 * if self.aspect == Aspect::SouthPole {
                    t.cos()
                } else {
                    t.sin()
                };
                Ok((y * lam.sin(), y * coslam))
            }
        }
    }

    fn e_inverse(&self, c: &Ellipsoidal, x_in: f64, y_in: f64) -> Result<(f64, f64), ProjError> {
        let (mut x, mut y) = (x_in, y_in);
        let ab = match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                x /= c.dd;
                y *= c.dd;
                let rho = x.hypot(y);
                if rho < EPS10 {
                    return Ok((0.0, self.phi0));
                }
                let asin_argument = 0.5 * rho / c.rq;
                if asin_argument > 1.0 {
                    return Err(self.outside(x_in, y_in));
                }
                let (s_ce, c_ce) = (2.0 * asin_argument.asin()).sin_cos();
                x *= s_ce;
                if self.aspect == Aspect::Oblique {
                    let ab = c_ce * self.sinb1 + y * s_ce * self.cosb1 / rho;
                    y = rho * self.cosb1 * c_ce - y * self.sinb1 * s_ce;
                    ab
                } else {
                    let ab = y * s_ce / rho;
                    y = rho * c_ce;
                    ab
                }
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                if self.aspect == Aspect::NorthPole {
                    y = -y;
                }
                let q = x * x + y * y;
                if q == 0.0 {
                    return Ok((0.0, self.phi0));
                }
                let ab = 1.0 - q / c.qp;
                if self.aspect == Aspect::SouthPole {
                    -ab
                } else {
                    ab
                }
            }
        };
        if ab.abs() > 1.0 + EPS10 {
            // beyond the rim of the polar disk
            return Err(self.outside(x_in, y_in));
        }

        let lam = x.atan2(y);
        let beta = ab.clamp(-1.0, 1.0).asin();
        let phi = authalic_latitude_inverse(beta, &c.apa, &c.ellipsoid, c.qp);
        Ok((lam, phi))
    }

    fn s_inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let rh = x.hypot(y);
        let half = rh * 0.5;
        if half > 1.0 {
            return Err(self.outside(x, y));
        }
        let z = 2.0 * half.asin();
        let (mut x, mut y) = (x, y);

        let phi = match self.aspect {
            Aspect::Equatorial => {
                let (sinz, cosz) = z.sin_cos();
                let phi = if rh.abs() <= EPS10 {
                    0.0
                } else {
                    (y * sinz / rh).clamp(-1.0, 1.0).asin()
                };
                x *= sinz;
                y = cosz * rh;
                phi
            }
            Aspect::Oblique => {
                let (sinz, cosz) = z.sin_cos();
                let phi = if rh.abs() <= EPS10 {
                    self.phi0
                } else {
                    (cosz * self.sinb1 + y * sinz * self.cosb1 / rh)
                        .clamp(-1.0, 1.0)
                        .asin()
                };
                x *= sinz * self.cosb1;
                y = (cosz - phi.sin() * self.sinb1) * rh;
                phi
            }
            Aspect::NorthPole => {
                y = -y;
                FRAC_PI_2 - z
            }
            Aspect::SouthPole => z - FRAC_PI_2,
        };

        // Only the centre itself has no bearing
        let lam = if x == 0.0 && y == 0.0 {
            0.0
        } else {
            x.atan2(y)
        };
        Ok((lam, phi))
    }
}

/// Lambert Azimuthal Equal Area in metres, with central meridian and false
/// easting/northing.
#[derive(Debug, Clone)]
pub struct LambertAzimuthalEqualArea {
    ellipsoid: Ellipsoid,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
    core: Laea,
}

impl LambertAzimuthalEqualArea {
    pub fn new(
        ellipsoid: Ellipsoid,
        lon0: f64,
        lat0: f64,
        false_easting: f64,
        false_northing: f64,
    ) -> Result<Self, ProjError> {
        if !ellipsoid.a.is_finite() || ellipsoid.a <= 0.0 {
            tracing::error!(a = ellipsoid.a, "Invalid semi-major axis");
            return Err(ProjError::InvalidParameter(format!(
                "semi-major axis must be positive and finite, got {}",
                ellipsoid.a
            )));
        }
        let core = Laea::new(lat0, &ellipsoid)?;
        Ok(Self {
            ellipsoid,
            lon0,
            false_easting,
            false_northing,
            core,
        })
    }

    /// EPSG:3035: ETRS89-extended / LAEA Europe
    pub fn etrs89() -> Result<Self, ProjError> {
        Self::new(
            GRS80,
            10.0_f64.to_radians(),
            52.0_f64.to_radians(),
            4_321_000.0,
            3_210_000.0,
        )
    }

    /// EPSG:6931: WGS 84 / NSIDC EASE-Grid 2.0 North
    pub fn ease_grid_north() -> Result<Self, ProjError> {
        Self::new(WGS84, 0.0, FRAC_PI_2, 0.0, 0.0)
    }

    /// EPSG:6932: WGS 84 / NSIDC EASE-Grid 2.0 South
    pub fn ease_grid_south() -> Result<Self, ProjError> {
        Self::new(WGS84, 0.0, -FRAC_PI_2, 0.0, 0.0)
    }

    /// EPSG:3571–3576: WGS 84 / North Pole LAEA, central meridian `lon0` (radians).
    pub fn north_pole(lon0: f64) -> Result<Self, ProjError> {
        Self::new(WGS84, lon0, FRAC_PI_2, 0.0, 0.0)
    }

    /// EPSG:2163: US National Atlas Equal Area (Clarke 1866 authalic sphere)
    pub fn us_national_atlas() -> Result<Self, ProjError> {
        Self::new(
            CLARKE_1866_AUTHALIC,
            (-100.0_f64).to_radians(),
            45.0_f64.to_radians(),
            0.0,
            0.0,
        )
    }

    pub fn aspect(&self) -> Aspect {
        self.core.aspect()
    }

    pub fn is_spherical(&self) -> bool {
        self.core.is_spherical()
    }

    pub fn core(&self) -> &Laea {
        &self.core
    }
}

impl Projection for LambertAzimuthalEqualArea {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        if !lat.is_finite() || lat.abs() > FRAC_PI_2 + EPS10 {
            return Err(ProjError::InvalidCoordinate(format!(
                "latitude {}° out of range",
                lat.to_degrees()
            )));
        }
        if !lon.is_finite() {
            return Err(ProjError::InvalidCoordinate(format!(
                "longitude {lon} is not finite"
            )));
        }
        let a = self.ellipsoid.a;
        let (x, y) = self.core.forward(adjlon(lon - self.lon0), lat)?;
        Ok((a * x + self.false_easting, a * y + self.false_northing))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let a = self.ellipsoid.a;
        let (lam, phi) = self
            .core
            .inverse((x - self.false_easting) / a, (y - self.false_northing) / a)?;
        Ok((adjlon(lam + self.lon0), phi))
    }

    fn ellipsoid(&self) -> &Ellipsoid {
        &self.ellipsoid
    }
}
