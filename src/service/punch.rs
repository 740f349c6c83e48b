use serde::{Deserialize, Serialize};
use strum_macros::Display;
use utoipa::ToSchema;

use crate::config::Config;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema, Display)]
#[serde(rename_all = "snake_case")]
pub enum PunchDirection {
    #[strum(serialize = "in")]
    In,
    #[strum(serialize = "out")]
    Out,
}

/// Gate in front of every punch. Both checks must pass.
pub trait PunchValidator: Send + Sync {
    fn is_valid_punch(&self, code: &str, direction: PunchDirection) -> bool;

    fn is_within_geofence(&self, latitude: f64, longitude: f64) -> bool;
}

/// One code for both directions and a circular site boundary.
#[derive(Debug, Clone)]
pub struct StaticPunchValidator {
    code: String,
    latitude: f64,
    longitude: f64,
    radius_meters: f64,
}

impl StaticPunchValidator {
    pub fn new(code: impl Into<String>, latitude: f64, longitude: f64, radius_meters: f64) -> Self {
        Self {
            code: code.into(),
            latitude,
            longitude,
            radius_meters,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.punch_code.clone(),
            config.geofence_latitude,
            config.geofence_longitude,
            config.geofence_radius_meters,
        )
    }
}

impl PunchValidator for StaticPunchValidator {
    fn is_valid_punch(&self, code: &str, _direction: PunchDirection) -> bool {
        !self.code.is_empty() && code == self.code
    }

    fn is_within_geofence(&self, latitude: f64, longitude: f64) -> bool {
        haversine_meters(self.latitude, self.longitude, latitude, longitude) <= self.radius_meters
    }
}

/// Great-circle distance between two coordinates.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}
