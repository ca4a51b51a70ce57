//! Repository operations for parking lot documents.
//!
//! All discovery paths (list, search, radius) exclude inactive lots.
//! Direct fetches by id still return them so existing references (reviews,
//! stats views) keep working after a soft delete.

use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use spotwatch_core::error::CoreError;
use spotwatch_core::geo::{self, GeoPoint};
use spotwatch_core::lot::{
    validate_capacity, CreateLot, ParkingLot, Rating, UpdateAvailability, UpdateLot,
    DEFAULT_CURRENCY,
};
use spotwatch_core::roles::{authorize_lot_manager, Actor};
use spotwatch_core::search::{rank_unbound, PagedResult, Paging, SearchFilters};
use spotwatch_core::types::LotId;
use spotwatch_events::{LotEvent, SubscriptionHub};

use crate::memory::MemoryStore;

fn lot_not_found(id: LotId) -> CoreError {
    CoreError::NotFound {
        entity: "parking lot",
        id,
    }
}

/// Provides CRUD, discovery, and the availability mutation for lots.
pub struct LotRepo;

impl LotRepo {
    // -----------------------------------------------------------------------
    // CRUD
    // -----------------------------------------------------------------------

    /// Create a lot owned by the acting identity.
    pub async fn create(
        store: &MemoryStore,
        input: CreateLot,
        actor: &Actor,
    ) -> Result<ParkingLot, CoreError> {
        input.validate()?;
        validate_capacity(input.total_spots, input.available_spots)?;
        let position = GeoPoint::new(input.latitude, input.longitude)?;

        let now = Utc::now();
        let lot = ParkingLot {
            id: Uuid::new_v4(),
            name: input.name.trim().to_string(),
            description: input.description,
            address: input.address,
            position,
            total_spots: input.total_spots as u32,
            available_spots: input.available_spots as u32,
            is_open: input.is_open.unwrap_or(true),
            is_active: true,
            hourly_rate: input.hourly_rate,
            daily_rate: input.daily_rate,
            currency: input.currency.unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
            amenities: input.amenities,
            rating: Rating::default(),
            last_updated: now,
            created_at: now,
            owner: actor.id,
        };

        store.insert_lot(lot.clone()).await;
        tracing::debug!(lot_id = %lot.id, owner = %actor.id, "Parking lot created");
        Ok(lot)
    }

    /// Fetch a lot by id, soft-deleted ones included.
    pub async fn find_by_id(store: &MemoryStore, lot_id: LotId) -> Option<ParkingLot> {
        let handle = store.lot_handle(lot_id).await?;
        let lot = handle.read().await.clone();
        Some(lot)
    }

    /// Fetch a lot by id or fail with `NotFound`.
    pub async fn get(store: &MemoryStore, lot_id: LotId) -> Result<ParkingLot, CoreError> {
        Self::find_by_id(store, lot_id)
            .await
            .ok_or_else(|| lot_not_found(lot_id))
    }

    /// List active lots, newest first.
    pub async fn list(store: &MemoryStore, paging: Paging) -> PagedResult<ParkingLot> {
        let mut lots: Vec<ParkingLot> = store
            .snapshot_lots()
            .await
            .into_iter()
            .filter(|lot| lot.is_active)
            .collect();

        lots.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        PagedResult::paginate(lots, paging)
    }

    /// Owner/admin edit of lot metadata.
    ///
    /// Shrinking `total_spots` below the current `available_spots` would
    /// break the capacity invariant and is rejected.
    pub async fn update(
        store: &MemoryStore,
        lot_id: LotId,
        input: UpdateLot,
        actor: &Actor,
    ) -> Result<ParkingLot, CoreError> {
        input.validate()?;

        let handle = store
            .lot_handle(lot_id)
            .await
            .ok_or_else(|| lot_not_found(lot_id))?;
        let mut lot = handle.write().await;

        if !lot.is_active {
            return Err(lot_not_found(lot_id));
        }
        authorize_lot_manager(actor, lot.owner)?;

        if let Some(total) = input.total_spots {
            validate_capacity(total, lot.available_spots as i64)?;
        }

        if let Some(name) = input.name {
            lot.name = name.trim().to_string();
        }
        if let Some(description) = input.description {
            lot.description = Some(description);
        }
        if let Some(address) = input.address {
            lot.address = address;
        }
        if let Some(total) = input.total_spots {
            lot.total_spots = total as u32;
        }
        if let Some(rate) = input.hourly_rate {
            lot.hourly_rate = rate;
        }
        if let Some(rate) = input.daily_rate {
            lot.daily_rate = Some(rate);
        }
        if let Some(currency) = input.currency {
            lot.currency = currency;
        }
        if let Some(amenities) = input.amenities {
            lot.amenities = amenities;
        }

        Ok(lot.clone())
    }

    /// Soft delete: flip `is_active` off so the lot disappears from
    /// discovery while existing review references stay intact.
    pub async fn deactivate(
        store: &MemoryStore,
        lot_id: LotId,
        actor: &Actor,
    ) -> Result<(), CoreError> {
        let handle = store
            .lot_handle(lot_id)
            .await
            .ok_or_else(|| lot_not_found(lot_id))?;
        let mut lot = handle.write().await;

        if !lot.is_active {
            return Err(lot_not_found(lot_id));
        }
        authorize_lot_manager(actor, lot.owner)?;

        lot.is_active = false;
        tracing::info!(%lot_id, actor = %actor.id, "Parking lot deactivated");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Availability mutation
    // -----------------------------------------------------------------------

    /// Atomically update a lot's availability state.
    ///
    /// The whole read-modify-write runs under the lot's write guard, so
    /// concurrent updates to the same lot serialize (last committed wins)
    /// and every individual update is all-or-nothing. The change event is
    /// published before the guard is released, which makes subscriber
    /// delivery order match commit order per lot; it is still strictly
    /// after the mutation is applied.
    pub async fn update_availability(
        store: &MemoryStore,
        hub: &SubscriptionHub,
        lot_id: LotId,
        input: UpdateAvailability,
        actor: &Actor,
    ) -> Result<ParkingLot, CoreError> {
        let handle = store
            .lot_handle(lot_id)
            .await
            .ok_or_else(|| lot_not_found(lot_id))?;
        let mut lot = handle.write().await;

        if !lot.is_active {
            return Err(lot_not_found(lot_id));
        }
        authorize_lot_manager(actor, lot.owner)?;

        if let Some(available) = input.available_spots {
            validate_capacity(lot.total_spots as i64, available)?;
        }

        if let Some(available) = input.available_spots {
            lot.available_spots = available as u32;
        }
        if let Some(is_open) = input.is_open {
            lot.is_open = is_open;
        }
        lot.last_updated = Utc::now();

        let snapshot = lot.clone();
        let delivered = hub
            .publish(lot_id, LotEvent::availability_changed(&snapshot))
            .await;
        tracing::debug!(
            %lot_id,
            available_spots = snapshot.available_spots,
            is_open = snapshot.is_open,
            delivered,
            "Availability updated"
        );

        Ok(snapshot)
    }

    // -----------------------------------------------------------------------
    // Discovery
    // -----------------------------------------------------------------------

    /// Active lots within `radius_km` of `center`, ordered by ascending
    /// great-circle distance. The boundary is inclusive.
    pub async fn find_within_radius(
        store: &MemoryStore,
        center: GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<(ParkingLot, f64)>, CoreError> {
        geo::validate_radius_km(radius_km)?;

        let mut hits: Vec<(ParkingLot, f64)> = store
            .snapshot_lots()
            .await
            .into_iter()
            .filter(|lot| lot.is_active)
            .map(|lot| {
                let distance = geo::haversine_km(center, lot.position);
                (lot, distance)
            })
            .filter(|(_, distance)| *distance <= radius_km)
            .collect();

        hits.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.id.cmp(&b.0.id))
        });
        Ok(hits)
    }

    /// Filtered search over active lots with the default ranking.
    ///
    /// Fallible like every read that touches the store; callers on the
    /// public search path retry once on `TransientStore`.
    pub async fn search(
        store: &MemoryStore,
        filters: &SearchFilters,
        paging: Paging,
    ) -> Result<PagedResult<ParkingLot>, CoreError> {
        let predicates = filters.compile();
        let mut matches: Vec<ParkingLot> = store
            .snapshot_lots()
            .await
            .into_iter()
            .filter(|lot| lot.is_active && predicates.iter().all(|p| p.matches(lot)))
            .collect();

        matches.sort_by(rank_unbound);
        Ok(PagedResult::paginate(matches, paging))
    }
}
