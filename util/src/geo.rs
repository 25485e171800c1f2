//! Great-circle distance and the proximity acceptance policy used when a
//! student marks attendance from a scanned QR code.

/// A WGS-84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// (0, 0) is the sentinel a client reports before its geolocation fix
    /// arrives. It must never be treated as a real position.
    pub fn is_unset(&self) -> bool {
        self.lat == 0.0 && self.lon == 0.0
    }
}

/// Mean Earth radius in meters.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine great-circle distance between two coordinates, in meters.
pub fn haversine_m(a: Coordinates, b: Coordinates) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

/// Outcome of a proximity check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProximityCheck {
    /// Device is within the acceptance radius; carries the measured distance.
    Accepted { distance_m: f64 },
    /// Device is too far from the session anchor.
    Rejected { distance_m: f64, threshold_m: f64 },
    /// Device coordinates are (0, 0) — no geolocation fix yet.
    LocationUnavailable,
}

/// Acceptance policy for attendance marking.
///
/// The base threshold is widened by the reported accuracy radii of both the
/// device and the session anchor, so a poor GPS fix does not lock students
/// out of a room they are standing in.
#[derive(Debug, Clone, Copy)]
pub struct ProximityPolicy {
    pub base_threshold_m: f64,
}

impl Default for ProximityPolicy {
    fn default() -> Self {
        Self {
            base_threshold_m: 10.0,
        }
    }
}

impl ProximityPolicy {
    pub fn new(base_threshold_m: f64) -> Self {
        Self { base_threshold_m }
    }

    /// Checks a device position against a session anchor.
    ///
    /// The boundary is inclusive: a distance exactly equal to the effective
    /// threshold is accepted.
    pub fn check(
        &self,
        device: Coordinates,
        device_accuracy_m: Option<f64>,
        anchor: Coordinates,
        anchor_accuracy_m: Option<f64>,
    ) -> ProximityCheck {
        if device.is_unset() {
            return ProximityCheck::LocationUnavailable;
        }

        let threshold_m = self.base_threshold_m
            + device_accuracy_m.unwrap_or(0.0).max(0.0)
            + anchor_accuracy_m.unwrap_or(0.0).max(0.0);

        let distance_m = haversine_m(device, anchor);
        if distance_m <= threshold_m {
            ProximityCheck::Accepted { distance_m }
        } else {
            ProximityCheck::Rejected {
                distance_m,
                threshold_m,
            }
        }
    }
}
