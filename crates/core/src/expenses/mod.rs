//! Expenses module - domain models and repository trait.

mod expenses_model;
mod expenses_traits;

pub use expenses_model::Expense;
pub use expenses_traits::ExpenseRepositoryTrait;
