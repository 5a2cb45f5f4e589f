//! ID generation utilities

/// Generate an entity ID (hyphenated UUID v4, 36 characters)
pub fn generate_entity_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Generate a database ID (32 characters, UUID without hyphens)
pub fn generate_database_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
