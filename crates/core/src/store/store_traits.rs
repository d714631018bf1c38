use crate::expenses::ExpenseRepositoryTrait;
use crate::livestock::{AnimalEventRepositoryTrait, AnimalRepositoryTrait};
use crate::production::DailyYieldRepositoryTrait;
use crate::sales::{BuyerRepositoryTrait, MilkSaleRepositoryTrait, PaymentRepositoryTrait};

/// The full storage port: every per-collection repository behind one handle.
///
/// Every backend honours the same contract:
/// - reading an empty collection yields an empty `Vec`, never an error
/// - adds append without checking ids, except buyers and animals, whose
///   duplicate names are silently skipped
/// - updates replace by key and deletes remove every match; a missing key is
///   a no-op returning `Ok(0)`
/// - nothing is atomic across collections
pub trait FarmStore:
    ExpenseRepositoryTrait
    + BuyerRepositoryTrait
    + MilkSaleRepositoryTrait
    + DailyYieldRepositoryTrait
    + PaymentRepositoryTrait
    + AnimalRepositoryTrait
    + AnimalEventRepositoryTrait
{
    /// Short label of the backend, for status output and logs.
    fn backend_name(&self) -> &'static str;
}
