//! Shared fixtures for store integration tests.

#![allow(dead_code)]

use spotwatch_core::lot::{Address, CreateLot, ParkingLot};
use spotwatch_core::roles::{Actor, Role};
use spotwatch_store::{LotRepo, MemoryStore};
use uuid::Uuid;

pub fn owner() -> Actor {
    Actor::new(Uuid::new_v4(), Role::ParkingOwner)
}

pub fn admin() -> Actor {
    Actor::new(Uuid::new_v4(), Role::Admin)
}

pub fn stranger() -> Actor {
    Actor::new(Uuid::new_v4(), Role::User)
}

pub fn lot_input(name: &str, latitude: f64, longitude: f64, total: i64) -> CreateLot {
    CreateLot {
        name: name.to_string(),
        description: None,
        address: Address {
            street: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip_code: "62701".to_string(),
            country: "United States".to_string(),
        },
        latitude,
        longitude,
        total_spots: total,
        available_spots: total,
        hourly_rate: 2.0,
        daily_rate: None,
        currency: None,
        amenities: vec![],
        is_open: Some(true),
    }
}

pub async fn seed_lot(store: &MemoryStore, actor: &Actor, name: &str) -> ParkingLot {
    LotRepo::create(store, lot_input(name, 10.0, 20.0, 10), actor)
        .await
        .expect("seed lot")
}
