use uuid::Uuid;

/// Generates a random identifier for a new record.
///
/// Identifiers are assigned by the caller before the record is handed to a
/// store; stores never generate them.
pub fn new_record_id() -> String {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = new_record_id();
        let b = new_record_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
