use std::time::Duration;

use chrono::Utc;
use tokio::time::{interval, Interval};
use tracing::{error, info, warn};

use crate::gql::domains::reservations::service as reservation_service;
use crate::gql::domains::timeslots::types::{AvailabilityEvent, AvailabilityEventType};
use crate::gql::subscriptions::publish_availability_event;
use crate::AppState;
use infra::repos::reservations;

const DEFAULT_TTL_MINUTES: i64 = 30;

/// Background sweeper that releases slots held by pending reservations the
/// payer abandoned. Reservations whose payment already confirmed are left
/// alone so an interrupted settlement sequence can still be reconciled.
pub struct ExpiryService {
    state: AppState,
    interval: Interval,
    ttl: chrono::Duration,
}

impl ExpiryService {
    pub fn new(state: AppState) -> Self {
        let ttl_minutes = std::env::var("RESERVATION_TTL_MINUTES")
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_TTL_MINUTES);

        Self {
            state,
            interval: interval(Duration::from_secs(60)),
            ttl: chrono::Duration::minutes(ttl_minutes),
        }
    }

    pub async fn run(&mut self) {
        info!(
            "Starting reservation expiry service (ttl {} minutes)",
            self.ttl.num_minutes()
        );

        loop {
            self.interval.tick().await;

            if let Err(e) = self.sweep().await {
                error!("Error sweeping expired reservations: {}", e);
            }
        }
    }

    async fn sweep(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let cutoff = Utc::now() - self.ttl;
        let stale = reservations::list_stale_pending(&self.state.db, cutoff).await?;

        for row in stale {
            match reservation_service::expire_reservation(&self.state.db, row.id).await {
                Ok(Some(expired)) => {
                    info!(
                        "Expired pending reservation {} (slot {})",
                        expired.id, expired.timeslot_id
                    );

                    if let Ok(Some(slot)) =
                        infra::repos::timeslots::get_by_id(&self.state.db, expired.timeslot_id)
                            .await
                    {
                        publish_availability_event(
                            slot.court_id,
                            AvailabilityEvent::from_slot(AvailabilityEventType::SlotReleased, &slot),
                        );
                    }
                }
                // Raced with a confirm or a cancel; nothing to release
                Ok(None) => {}
                Err(e) => {
                    warn!("Failed to expire reservation {}: {}", row.id, e);
                }
            }
        }

        Ok(())
    }
}

/// Spawn the expiry service as a background task
pub fn spawn_expiry_service(state: AppState) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut service = ExpiryService::new(state);
        service.run().await;
    })
}
