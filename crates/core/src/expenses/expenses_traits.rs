use async_trait::async_trait;

use super::expenses_model::Expense;
use crate::errors::Result;

/// Persistence contract for expenses.
///
/// Expenses are keyed by `id`. Mutations return the number of records they
/// touched; a missing id is not an error and yields `Ok(0)`.
#[async_trait]
pub trait ExpenseRepositoryTrait: Send + Sync {
    async fn get_expenses(&self) -> Result<Vec<Expense>>;

    /// Appends the expense without checking for an existing id.
    async fn add_expense(&self, expense: Expense) -> Result<usize>;

    /// Replaces the first record whose id matches `expense.id`.
    async fn update_expense(&self, expense: Expense) -> Result<usize>;

    /// Removes every record with the given id.
    async fn delete_expense(&self, expense_id: &str) -> Result<usize>;
}
