//! Rows as SQLite hands them back: ids and timestamps stay as text and are
//! parsed by the API layer into `noor_types` models.

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub password: String,
    pub created_at: String,
}

pub struct DuaRow {
    pub id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: String,
}
