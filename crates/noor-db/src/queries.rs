use crate::models::{DuaRow, UserRow};
use crate::Database;
use anyhow::Result;
use rusqlite::{Connection, Row, ffi};

impl Database {
    // -- Users --

    /// Insert a user. Returns false when the username is already taken.
    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        display_name: &str,
        password_hash: &str,
    ) -> Result<bool> {
        self.with_conn_mut(|conn| {
            match conn.execute(
                "INSERT INTO users (id, username, display_name, password) VALUES (?1, ?2, ?3, ?4)",
                (id, username, display_name, password_hash),
            ) {
                Ok(_) => Ok(true),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE =>
                {
                    Ok(false)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "username", username))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id", id))
    }

    // -- Duas --

    /// Insert a dua and return the stored row, including the timestamp the
    /// store assigned to it.
    pub fn insert_dua(&self, id: &str, user_id: &str, content: &str) -> Result<DuaRow> {
        self.with_conn_mut(|conn| {
            let row = conn.query_row(
                "INSERT INTO duas (id, user_id, content) VALUES (?1, ?2, ?3)
                 RETURNING id, user_id, content, created_at",
                (id, user_id, content),
                dua_from_row,
            )?;
            Ok(row)
        })
    }

    /// All duas owned by `user_id`, newest first.
    pub fn list_duas_by_owner(&self, user_id: &str) -> Result<Vec<DuaRow>> {
        self.with_conn(|conn| {
            // rowid breaks ties between inserts within the same millisecond
            let mut stmt = conn.prepare(
                "SELECT id, user_id, content, created_at
                 FROM duas
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, rowid DESC",
            )?;

            let rows = stmt
                .query_map([user_id], dua_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Read one dua, but only if `user_id` owns it.
    pub fn get_dua(&self, id: &str, user_id: &str) -> Result<Option<DuaRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, user_id, content, created_at FROM duas WHERE id = ?1 AND user_id = ?2",
                (id, user_id),
                dua_from_row,
            )
            .optional()
        })
    }

    /// Delete a dua owned by `user_id`. Returns false when nothing matched.
    pub fn delete_dua(&self, id: &str, user_id: &str) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let deleted = conn.execute(
                "DELETE FROM duas WHERE id = ?1 AND user_id = ?2",
                (id, user_id),
            )?;
            Ok(deleted > 0)
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<UserRow>> {
    let sql = format!(
        "SELECT id, username, display_name, password, created_at FROM users WHERE {} = ?1",
        column
    );
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                display_name: row.get(2)?,
                password: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn dua_from_row(row: &Row<'_>) -> rusqlite::Result<DuaRow> {
    Ok(DuaRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        content: row.get(2)?,
        created_at: row.get(3)?,
    })
}

/// Maps `QueryReturnedNoRows` to `None` for single-row lookups.
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
