//! The storage port every backend implements, and the collection catalogue
//! backends share.

mod collection;
mod store_traits;

#[cfg(test)]
pub(crate) mod test_store;

pub use collection::{remove_where, replace_first, Collection};
pub use store_traits::FarmStore;
