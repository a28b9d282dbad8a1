//! Geofence verification for start actions.
//!
//! Validates that a reported device position is within the configured
//! radius of the target site's fixed coordinate. The radius is one global
//! configuration value, not per-site.

use rota_core::error::CoreError;
use rota_core::geo::{self, GeoPoint};
use rota_core::types::DbId;
use rota_db::repositories::SiteRepo;
use rota_db::DbPool;

use crate::error::{AppError, AppResult};

/// Result of a distance measurement against a site.
#[derive(Debug, Clone, Copy)]
pub struct ProximityCheck {
    /// Distance between the reported point and the site, in meters.
    pub distance_meters: f64,
    /// Whether the distance is within the configured radius.
    pub within_range: bool,
}

/// Measures and verifies reported positions against site coordinates.
#[derive(Debug, Clone, Copy)]
pub struct GeofenceChecker {
    radius_meters: f64,
}

impl GeofenceChecker {
    pub fn new(radius_meters: f64) -> Self {
        Self { radius_meters }
    }

    pub fn radius_meters(&self) -> f64 {
        self.radius_meters
    }

    /// Measure the distance from a reported position to a site.
    ///
    /// An unknown site is `NotFound`, a different failure from an
    /// out-of-range measurement.
    pub async fn measure(
        &self,
        pool: &DbPool,
        site_id: DbId,
        longitude: f64,
        latitude: f64,
    ) -> AppResult<ProximityCheck> {
        let site = SiteRepo::get(pool, site_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Site",
                id: site_id,
            })?;

        let distance_meters = geo::distance_meters(
            GeoPoint::new(site.longitude, site.latitude),
            GeoPoint::new(longitude, latitude),
        );

        Ok(ProximityCheck {
            distance_meters,
            within_range: distance_meters <= self.radius_meters,
        })
    }

    /// [`measure`](Self::measure), failing with `ProximityDenied` when the
    /// reported position is out of range.
    pub async fn verify(
        &self,
        pool: &DbPool,
        site_id: DbId,
        longitude: f64,
        latitude: f64,
    ) -> AppResult<ProximityCheck> {
        let check = self.measure(pool, site_id, longitude, latitude).await?;

        if !check.within_range {
            return Err(AppError::Core(CoreError::ProximityDenied {
                distance_meters: check.distance_meters,
                radius_meters: self.radius_meters,
            }));
        }
        Ok(check)
    }
}
