use async_trait::async_trait;

use super::livestock_model::{Animal, AnimalEvent, RecordedEvent};
use crate::errors::Result;

/// Persistence contract for animals.
///
/// Animal ids equal their names, so name uniqueness is id uniqueness.
#[async_trait]
pub trait AnimalRepositoryTrait: Send + Sync {
    async fn get_animals(&self) -> Result<Vec<Animal>>;

    /// Adds the animal unless one with the same name exists (`Ok(0)`).
    async fn add_animal(&self, animal: Animal) -> Result<usize>;

    async fn update_animal(&self, animal: Animal) -> Result<usize>;
    async fn delete_animal(&self, animal_id: &str) -> Result<usize>;
}

/// Persistence contract for animal events, keyed by id.
#[async_trait]
pub trait AnimalEventRepositoryTrait: Send + Sync {
    async fn get_animal_events(&self) -> Result<Vec<AnimalEvent>>;
    async fn add_animal_event(&self, event: AnimalEvent) -> Result<usize>;
    async fn update_animal_event(&self, event: AnimalEvent) -> Result<usize>;
    async fn delete_animal_event(&self, event_id: &str) -> Result<usize>;
}

/// Livestock workflows spanning more than one collection.
#[async_trait]
pub trait LivestockServiceTrait: Send + Sync {
    /// Saves the event and, when it has a positive cost, books a matching
    /// expense. The two writes are independent: if the expense fails the
    /// event stays saved and the error is returned.
    async fn record_event(&self, event: AnimalEvent) -> Result<RecordedEvent>;

    /// Events of one animal, newest first.
    async fn events_for_animal(&self, animal_id: &str) -> Result<Vec<AnimalEvent>>;
}
