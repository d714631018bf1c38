pub mod id_utils;
pub mod time_utils;

pub use id_utils::new_record_id;
