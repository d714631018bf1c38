use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, warn};

use super::livestock_model::{AnimalEvent, RecordedEvent};
use super::livestock_traits::{AnimalEventRepositoryTrait, LivestockServiceTrait};
use crate::errors::Result;
use crate::expenses::{Expense, ExpenseRepositoryTrait};
use crate::store::FarmStore;
use crate::utils::new_record_id;

pub struct LivestockService {
    store: Arc<dyn FarmStore>,
}

impl LivestockService {
    pub fn new(store: Arc<dyn FarmStore>) -> Self {
        LivestockService { store }
    }

    fn expense_for(event: &AnimalEvent) -> Expense {
        let mut expense = Expense::new(
            new_record_id(),
            event.date,
            format!("Animal Expense - {}", event.event_type),
            format!(
                "Animal {} - {}: {}",
                event.animal_id, event.event_type, event.value
            ),
            event.cost,
        );
        expense.animal_id = Some(event.animal_id.clone());
        expense
    }
}

#[async_trait]
impl LivestockServiceTrait for LivestockService {
    async fn record_event(&self, event: AnimalEvent) -> Result<RecordedEvent> {
        self.store.add_animal_event(event.clone()).await?;

        if event.cost <= 0.0 {
            return Ok(RecordedEvent {
                event,
                expense: None,
            });
        }

        let expense = Self::expense_for(&event);
        debug!(
            "Booking expense {} of {} for event {}",
            expense.id, expense.amount, event.id
        );
        if let Err(err) = self.store.add_expense(expense.clone()).await {
            warn!(
                "Event {} was saved but its expense could not be: {}",
                event.id, err
            );
            return Err(err);
        }

        Ok(RecordedEvent {
            event,
            expense: Some(expense),
        })
    }

    async fn events_for_animal(&self, animal_id: &str) -> Result<Vec<AnimalEvent>> {
        let mut events: Vec<AnimalEvent> = self
            .store
            .get_animal_events()
            .await?
            .into_iter()
            .filter(|e| e.animal_id == animal_id)
            .collect();
        events.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(events)
    }
}
