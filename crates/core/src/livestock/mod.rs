//! Livestock module - animals, their events, and the event workflow.

mod livestock_model;
mod livestock_service;
mod livestock_traits;

#[cfg(test)]
mod livestock_service_tests;

pub use livestock_model::{Animal, AnimalEvent, EventType, RecordedEvent};
pub use livestock_service::LivestockService;
pub use livestock_traits::{
    AnimalEventRepositoryTrait, AnimalRepositoryTrait, LivestockServiceTrait,
};
