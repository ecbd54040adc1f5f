//! Message persistence backed by SQLite

use rusqlite::{params, Connection, Result as SqliteResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::domain::entities::ChatPost;

/// A persisted chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub channel: String,
    pub sender: String,
    pub body: String,
    pub is_media: bool,
    pub timestamp: String,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

/// Channel history store
pub struct MessageStore {
    conn: Connection,
}

impl MessageStore {
    pub fn new(path: impl AsRef<Path>) -> SqliteResult<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    pub fn in_memory() -> SqliteResult<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init_tables()?;
        Ok(store)
    }

    fn init_tables(&self) -> SqliteResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS messages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                channel TEXT NOT NULL,
                sender TEXT NOT NULL,
                message TEXT NOT NULL,
                is_media INTEGER NOT NULL DEFAULT 0,
                timestamp TEXT NOT NULL,
                image_url TEXT,
                thumbnail_url TEXT
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_messages_channel ON messages(channel, id)",
            [],
        )?;

        Ok(())
    }

    /// Persist a post, stamping it with the current local time
    pub fn save(&self, channel: &str, post: &ChatPost) -> SqliteResult<StoredMessage> {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        self.conn.execute(
            "INSERT INTO messages (channel, sender, message, is_media, timestamp, image_url, thumbnail_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                channel,
                post.sender,
                post.body,
                post.is_media,
                timestamp,
                post.image_url,
                post.thumbnail_url
            ],
        )?;

        Ok(StoredMessage {
            id: self.conn.last_insert_rowid(),
            channel: channel.to_string(),
            sender: post.sender.clone(),
            body: post.body.clone(),
            is_media: post.is_media,
            timestamp,
            image_url: post.image_url.clone(),
            thumbnail_url: post.thumbnail_url.clone(),
        })
    }

    /// Latest `limit` messages for a channel, oldest first
    pub fn recent(&self, channel: &str, limit: usize) -> SqliteResult<Vec<StoredMessage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, channel, sender, message, is_media, timestamp, image_url, thumbnail_url
             FROM messages WHERE channel = ?1 ORDER BY id DESC LIMIT ?2",
        )?;

        let rows = stmt.query_map(params![channel, limit as i64], |row| {
            Ok(StoredMessage {
                id: row.get(0)?,
                channel: row.get(1)?,
                sender: row.get(2)?,
                body: row.get(3)?,
                is_media: row.get(4)?,
                timestamp: row.get(5)?,
                image_url: row.get(6)?,
                thumbnail_url: row.get(7)?,
            })
        })?;

        let mut messages = Vec::new();
        for message in rows {
            messages.push(message?);
        }
        messages.reverse();
        Ok(messages)
    }

    pub fn count(&self, channel: &str) -> SqliteResult<i64> {
        self.conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE channel = ?1",
            [channel],
            |row| row.get(0),
        )
    }
}
