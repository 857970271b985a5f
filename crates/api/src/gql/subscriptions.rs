use async_graphql::{Context, Result, Subscription};
use futures_util::Stream;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use uuid::Uuid;

use crate::gql::domains::timeslots::types::AvailabilityEvent;
use crate::gql::error::ResultExt;

/// All subscription channels
struct SubscriptionChannels {
    /// Per-court availability channels
    courts: HashMap<Uuid, broadcast::Sender<AvailabilityEvent>>,
    /// Per-club availability channels (for owners watching all their courts)
    clubs: HashMap<Uuid, broadcast::Sender<AvailabilityEvent>>,
}

impl SubscriptionChannels {
    fn new() -> Self {
        Self {
            courts: HashMap::new(),
            clubs: HashMap::new(),
        }
    }

    fn get_or_create_court(&mut self, court_id: Uuid) -> &broadcast::Sender<AvailabilityEvent> {
        self.courts
            .entry(court_id)
            .or_insert_with(|| broadcast::channel(100).0)
    }

    fn get_or_create_club(&mut self, club_id: Uuid) -> &broadcast::Sender<AvailabilityEvent> {
        self.clubs
            .entry(club_id)
            .or_insert_with(|| broadcast::channel(100).0)
    }
}

static CHANNELS: Lazy<Arc<Mutex<SubscriptionChannels>>> =
    Lazy::new(|| Arc::new(Mutex::new(SubscriptionChannels::new())));

pub struct SubscriptionRoot;

#[Subscription]
impl SubscriptionRoot {
    /// Subscribe to availability changes for a specific court
    async fn court_availability_changes(
        &self,
        court_id: async_graphql::ID,
    ) -> Result<impl Stream<Item = Result<AvailabilityEvent, BroadcastStreamRecvError>>> {
        let court_uuid = Uuid::parse_str(court_id.as_str()).gql_err("Invalid court ID")?;

        let receiver = {
            let mut channels = CHANNELS.lock();
            let court_sender = channels.get_or_create_court(court_uuid);
            court_sender.subscribe()
        };

        Ok(BroadcastStream::new(receiver))
    }

    /// Subscribe to availability changes across all courts of a club (owner only)
    async fn club_availability_changes(
        &self,
        ctx: &Context<'_>,
        club_id: async_graphql::ID,
    ) -> Result<impl Stream<Item = Result<AvailabilityEvent, BroadcastStreamRecvError>>> {
        use crate::auth::permissions::require_club_owner;

        let club_uuid = Uuid::parse_str(club_id.as_str()).gql_err("Invalid club ID")?;
        let _owner = require_club_owner(ctx, club_uuid).await?;

        let receiver = {
            let mut channels = CHANNELS.lock();
            let club_sender = channels.get_or_create_club(club_uuid);
            club_sender.subscribe()
        };

        Ok(BroadcastStream::new(receiver))
    }
}

// ============================================================================
// Publish functions - send events to specific channels
// ============================================================================

/// Publish an availability event to a court's channel and its club's channel
pub fn publish_availability_event(court_id: Uuid, event: AvailabilityEvent) {
    let club_id = match Uuid::parse_str(event.club_id.as_str()) {
        Ok(id) => id,
        Err(_) => return,
    };

    let mut channels = CHANNELS.lock();
    // Send to court channel
    let court_sender = channels.get_or_create_court(court_id);
    let _ = court_sender.send(event.clone());

    // Also send to club channel (for owners watching all their courts)
    let club_sender = channels.get_or_create_club(club_id);
    let _ = club_sender.send(event);
}
