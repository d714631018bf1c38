//! Local JSON storage for the dairy bookkeeping application.
//!
//! Each collection lives in its own file holding a JSON array, inside one
//! data directory:
//!
//! ```text
//! local_data/
//!   expenses.json  buyers.json  milk_sales.json  daily_yields.json
//!   payments.json  cows.json    cow_events.json
//! ```
//!
//! Every read loads the whole file and every write rewrites it. There is no
//! file locking; two processes writing the same directory can lose updates.

mod store;

pub use store::JsonFileStore;
