//! SQLite-backed store

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::application::errors::StorageError;
use crate::domain::entities::{
    Collection, Prompt, PromptCandidate, Run, RunWithPrompt, Settings, SettingsUpdate, Signal,
};
use crate::domain::traits::Store;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS settings (
    id INTEGER PRIMARY KEY DEFAULT 1,
    tracked_domain TEXT NOT NULL DEFAULT '',
    openai_api_key TEXT,
    anthropic_api_key TEXT,
    perplexity_api_key TEXT,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS prompts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    content TEXT NOT NULL CHECK (length(trim(content)) > 0),
    category TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS collections (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS prompt_collections (
    prompt_id INTEGER NOT NULL REFERENCES prompts(id) ON DELETE CASCADE,
    collection_id INTEGER NOT NULL REFERENCES collections(id) ON DELETE CASCADE,
    PRIMARY KEY (prompt_id, collection_id)
);

CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    prompt_id INTEGER NOT NULL REFERENCES prompts(id) ON DELETE CASCADE,
    provider TEXT NOT NULL,
    model TEXT NOT NULL,
    response TEXT NOT NULL,
    signals TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_runs_created ON runs(created_at);
CREATE INDEX IF NOT EXISTS idx_prompt_collections_collection ON prompt_collections(collection_id);

INSERT OR IGNORE INTO settings (id, tracked_domain) VALUES (1, '');
";

/// Prompts inserted into an empty library
const SEED_PROMPTS: [(&str, &str, &str); 3] = [
    (
        "Best tools for SEO",
        "What are the best tools for search engine optimization in 2025?",
        "SEO",
    ),
    (
        "Top marketing platforms",
        "What are the top marketing automation platforms for small businesses?",
        "Marketing",
    ),
    (
        "Website analytics solutions",
        "What website analytics solutions do you recommend for tracking user behavior?",
        "Analytics",
    ),
];

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get::<_, String>(0))?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Self::init(conn)
    }

    pub fn in_memory() -> Result<Self, StorageError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StorageError> {
        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.execute_batch(SCHEMA)?;

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM prompts", [], |row| row.get(0))?;
        if count == 0 {
            for (name, content, category) in SEED_PROMPTS {
                conn.execute(
                    "INSERT INTO prompts (name, content, category) VALUES (?1, ?2, ?3)",
                    params![name, content, category],
                )?;
            }
        }

        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, StorageError> {
        self.conn.lock().map_err(|_| StorageError::Lock)
    }
}

fn prompt_from_row(row: &Row<'_>) -> rusqlite::Result<Prompt> {
    Ok(Prompt {
        id: row.get(0)?,
        name: row.get(1)?,
        content: row.get(2)?,
        category: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Raw run row; signals are still JSON text
fn run_from_row(row: &Row<'_>) -> rusqlite::Result<(Run, String)> {
    Ok((
        Run {
            id: row.get(0)?,
            prompt_id: row.get(1)?,
            provider: row.get(2)?,
            model: row.get(3)?,
            response: row.get(4)?,
            signals: Signal::default(),
            created_at: row.get(6)?,
        },
        row.get(5)?,
    ))
}

fn with_signals((mut run, signals): (Run, String)) -> Result<Run, StorageError> {
    run.signals = serde_json::from_str(&signals)?;
    Ok(run)
}

fn collection_prompt_ids(conn: &Connection, collection_id: i64) -> rusqlite::Result<Vec<i64>> {
    let mut stmt = conn.prepare(
        "SELECT prompt_id FROM prompt_collections WHERE collection_id = ?1 ORDER BY prompt_id",
    )?;
    let ids = stmt.query_map([collection_id], |row| row.get(0))?;
    ids.collect()
}

fn link_prompts(conn: &Connection, collection_id: i64, prompt_ids: &[i64]) -> rusqlite::Result<()> {
    let mut stmt = conn.prepare(
        "INSERT OR IGNORE INTO prompt_collections (prompt_id, collection_id) VALUES (?1, ?2)",
    )?;
    for prompt_id in prompt_ids {
        stmt.execute(params![prompt_id, collection_id])?;
    }
    Ok(())
}

#[async_trait]
impl Store for SqliteStore {
    async fn get_settings(&self) -> Result<Settings, StorageError> {
        let conn = self.conn()?;
        let settings = conn
            .query_row(
                "SELECT tracked_domain, openai_api_key, anthropic_api_key, perplexity_api_key, updated_at
                 FROM settings WHERE id = 1",
                [],
                |row| {
                    Ok(Settings {
                        tracked_domain: row.get(0)?,
                        openai_api_key: row.get(1)?,
                        anthropic_api_key: row.get(2)?,
                        perplexity_api_key: row.get(3)?,
                        updated_at: row.get(4)?,
                    })
                },
            )
            .optional()?;

        Ok(settings.unwrap_or_default())
    }

    async fn update_settings(&self, update: &SettingsUpdate) -> Result<(), StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let mut changed = false;

        if let Some(domain) = &update.tracked_domain {
            tx.execute("UPDATE settings SET tracked_domain = ?1 WHERE id = 1", [domain.trim()])?;
            changed = true;
        }

        // Column names come from a fixed list, never from input
        for (column, value) in update.key_changes() {
            tx.execute(&format!("UPDATE settings SET {} = ?1 WHERE id = 1", column), [value])?;
            changed = true;
        }

        if changed {
            let now = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
            tx.execute("UPDATE settings SET updated_at = ?1 WHERE id = 1", [now])?;
        }

        tx.commit()?;
        Ok(())
    }

    async fn list_prompts(&self, limit: usize) -> Result<Vec<Prompt>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, content, category, created_at FROM prompts
             ORDER BY created_at DESC, id DESC LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit as i64], prompt_from_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    async fn get_prompt(&self, id: i64) -> Result<Option<Prompt>, StorageError> {
        let conn = self.conn()?;
        let prompt = conn
            .query_row(
                "SELECT id, name, content, category, created_at FROM prompts WHERE id = ?1",
                [id],
                prompt_from_row,
            )
            .optional()?;
        Ok(prompt)
    }

    async fn insert_prompt(
        &self,
        name: &str,
        content: &str,
        category: Option<&str>,
    ) -> Result<Prompt, StorageError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO prompts (name, content, category) VALUES (?1, ?2, ?3)",
            params![name, content, category],
        )?;
        let id = conn.last_insert_rowid();
        let prompt = conn.query_row(
            "SELECT id, name, content, category, created_at FROM prompts WHERE id = ?1",
            [id],
            prompt_from_row,
        )?;
        Ok(prompt)
    }

    async fn delete_prompt(&self, id: i64) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM prompts WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    async fn list_collections(&self) -> Result<Vec<Collection>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM collections ORDER BY name, id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Collection {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: row.get(2)?,
                    prompt_ids: Vec::new(),
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut collections = Vec::with_capacity(rows.len());
        for mut collection in rows {
            collection.prompt_ids = collection_prompt_ids(&conn, collection.id)?;
            collections.push(collection);
        }
        Ok(collections)
    }

    async fn create_collection(&self, name: &str, prompt_ids: &[i64]) -> Result<Collection, StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        tx.execute("INSERT INTO collections (name) VALUES (?1)", [name])?;
        let id = tx.last_insert_rowid();
        link_prompts(&tx, id, prompt_ids)?;

        let created_at: String =
            tx.query_row("SELECT created_at FROM collections WHERE id = ?1", [id], |row| row.get(0))?;
        let prompt_ids = collection_prompt_ids(&tx, id)?;
        tx.commit()?;

        Ok(Collection {
            id,
            name: name.to_string(),
            created_at,
            prompt_ids,
        })
    }

    async fn set_collection_prompts(&self, id: i64, prompt_ids: &[i64]) -> Result<(), StorageError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let exists: Option<i64> = tx
            .query_row("SELECT id FROM collections WHERE id = ?1", [id], |row| row.get(0))
            .optional()?;
        if exists.is_none() {
            return Err(StorageError::NotFound(format!("collection {}", id)));
        }

        tx.execute("DELETE FROM prompt_collections WHERE collection_id = ?1", [id])?;
        link_prompts(&tx, id, prompt_ids)?;
        tx.commit()?;
        Ok(())
    }

    async fn delete_collection(&self, id: i64) -> Result<bool, StorageError> {
        let conn = self.conn()?;
        let rows = conn.execute("DELETE FROM collections WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    async fn create_collection_with_prompts(
        &self,
        name: &str,
        prompts: &[PromptCandidate],
    ) -> Result<i64, StorageError> {
        let mut conn = self.conn()?;
        // Dropping the transaction without commit rolls everything back
        let tx = conn.transaction()?;

        tx.execute("INSERT INTO collections (name) VALUES (?1)", [name])?;
        let collection_id = tx.last_insert_rowid();

        {
            let mut insert_prompt =
                tx.prepare("INSERT INTO prompts (name, content, category) VALUES (?1, ?2, ?3)")?;
            let mut link = tx.prepare(
                "INSERT OR IGNORE INTO prompt_collections (prompt_id, collection_id) VALUES (?1, ?2)",
            )?;

            for prompt in prompts {
                let prompt_id = insert_prompt.insert(params![prompt.name, prompt.content, prompt.category])?;
                link.execute(params![prompt_id, collection_id])?;
            }
        }

        tx.commit()?;
        Ok(collection_id)
    }

    async fn insert_run(
        &self,
        prompt_id: i64,
        provider: &str,
        model: &str,
        response: &str,
        signals: &Signal,
    ) -> Result<Run, StorageError> {
        let signals_json = serde_json::to_string(signals)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO runs (prompt_id, provider, model, response, signals) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![prompt_id, provider, model, response, signals_json],
        )?;
        let id = conn.last_insert_rowid();

        let raw = conn.query_row(
            "SELECT id, prompt_id, provider, model, response, signals, created_at FROM runs WHERE id = ?1",
            [id],
            run_from_row,
        )?;
        with_signals(raw)
    }

    async fn list_runs(&self, limit: usize) -> Result<Vec<RunWithPrompt>, StorageError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT runs.id, runs.prompt_id, runs.provider, runs.model, runs.response, runs.signals,
                    runs.created_at, prompts.name, prompts.content
             FROM runs
             JOIN prompts ON runs.prompt_id = prompts.id
             ORDER BY runs.created_at DESC, runs.id DESC
             LIMIT ?1",
        )?;

        let rows = stmt
            .query_map([limit as i64], |row| {
                Ok((run_from_row(row)?, row.get::<_, String>(7)?, row.get::<_, String>(8)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter()
            .map(|(raw, prompt_name, prompt_content)| {
                Ok(RunWithPrompt {
                    run: with_signals(raw)?,
                    prompt_name,
                    prompt_content,
                })
            })
            .collect()
    }
}
