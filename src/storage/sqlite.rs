//! SQLite storage backend

use super::traits::{CatalogStats, CatalogStore, MergeOutcome, OpenStore, StorageError, StorageResult};
use crate::catalog::{Item, ItemId, Link, LinkId, NewItem};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Mutex;

/// SQLite-backed catalog store
///
/// A single database file with `items` and `links` tables. Thread-safe via an
/// internal mutex on the connection.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    fn init_schema(conn: &Connection) -> StorageResult<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS items (
                item_id INTEGER PRIMARY KEY AUTOINCREMENT,
                word TEXT NOT NULL,
                category TEXT NOT NULL,
                definition TEXT,
                derivation TEXT,
                appendices TEXT,
                created_at TEXT NOT NULL,
                modified_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_items_word
                ON items(word COLLATE NOCASE);

            -- Endpoints are plain integers: a link may outlive its items,
            -- and the dangling-links pass detects exactly that.
            CREATE TABLE IF NOT EXISTS links (
                link_id INTEGER PRIMARY KEY AUTOINCREMENT,
                source_item_id INTEGER NOT NULL,
                destination_item_id INTEGER NOT NULL,
                link_type TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_links_source
                ON links(source_item_id);
            CREATE INDEX IF NOT EXISTS idx_links_destination
                ON links(destination_item_id);

            -- Enable WAL mode for concurrent reads during writes
            PRAGMA journal_mode = WAL;
            "#,
        )?;
        Ok(())
    }

    fn parse_ts(raw: &str) -> StorageResult<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| StorageError::DateParse(e.to_string()))
    }

    fn item_from_row(row: &rusqlite::Row<'_>) -> StorageResult<Item> {
        let created_at: String = row.get(6)?;
        let modified_at: String = row.get(7)?;
        Ok(Item {
            id: ItemId::new(row.get(0)?),
            word: row.get(1)?,
            category: row.get(2)?,
            definition: row.get(3)?,
            derivation: row.get(4)?,
            appendices: row.get(5)?,
            created_at: Self::parse_ts(&created_at)?,
            modified_at: Self::parse_ts(&modified_at)?,
        })
    }

    fn link_from_row(row: &rusqlite::Row<'_>) -> StorageResult<Link> {
        let created_at: String = row.get(4)?;
        Ok(Link {
            id: LinkId::new(row.get(0)?),
            source: ItemId::new(row.get(1)?),
            destination: ItemId::new(row.get(2)?),
            link_type: row.get(3)?,
            created_at: Self::parse_ts(&created_at)?,
        })
    }
}

impl OpenStore for SqliteStore {
    fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn open_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }
}

impl CatalogStore for SqliteStore {
    // === Item Operations ===

    fn list_items(&self) -> StorageResult<Vec<Item>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT item_id, word, category, definition, derivation, appendices,
                    created_at, modified_at
             FROM items ORDER BY item_id",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(Self::item_from_row(row)?);
        }
        Ok(items)
    }

    fn get_item(&self, id: ItemId) -> StorageResult<Option<Item>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT item_id, word, category, definition, derivation, appendices,
                    created_at, modified_at
             FROM items WHERE item_id = ?1",
        )?;
        let mut rows = stmt.query(params![id.as_i64()])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::item_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn find_item_by_word(&self, word: &str) -> StorageResult<Option<Item>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT item_id, word, category, definition, derivation, appendices,
                    created_at, modified_at
             FROM items WHERE word = ?1 COLLATE NOCASE
             ORDER BY item_id LIMIT 1",
        )?;
        let mut rows = stmt.query(params![word])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::item_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn create_item(&self, item: NewItem) -> StorageResult<Item> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();
        conn.execute(
            "INSERT INTO items (word, category, definition, derivation, appendices,
                                created_at, modified_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![
                item.word,
                item.category,
                item.definition,
                item.derivation,
                item.appendices,
                now.to_rfc3339(),
            ],
        )?;
        Ok(Item {
            id: ItemId::new(conn.last_insert_rowid()),
            word: item.word,
            category: item.category,
            definition: item.definition,
            derivation: item.derivation,
            appendices: item.appendices,
            created_at: now,
            modified_at: now,
        })
    }

    fn update_item(&self, item: &Item) -> StorageResult<()> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "UPDATE items
             SET word = ?1, category = ?2, definition = ?3, derivation = ?4,
                 appendices = ?5, modified_at = ?6
             WHERE item_id = ?7",
            params![
                item.word,
                item.category,
                item.definition,
                item.derivation,
                item.appendices,
                Utc::now().to_rfc3339(),
                item.id.as_i64(),
            ],
        )?;
        if changed == 0 {
            return Err(StorageError::ItemNotFound(item.id));
        }
        Ok(())
    }

    fn delete_item(&self, id: ItemId) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM items WHERE item_id = ?1", params![id.as_i64()])?;
        Ok(changed > 0)
    }

    // === Link Operations ===

    fn list_links(&self) -> StorageResult<Vec<Link>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT link_id, source_item_id, destination_item_id, link_type, created_at
             FROM links ORDER BY link_id",
        )?;
        let mut rows = stmt.query([])?;
        let mut links = Vec::new();
        while let Some(row) = rows.next()? {
            links.push(Self::link_from_row(row)?);
        }
        Ok(links)
    }

    fn get_link(&self, id: LinkId) -> StorageResult<Option<Link>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT link_id, source_item_id, destination_item_id, link_type, created_at
             FROM links WHERE link_id = ?1",
        )?;
        let mut rows = stmt.query(params![id.as_i64()])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::link_from_row(row)?)),
            None => Ok(None),
        }
    }

    fn create_link(
        &self,
        source: ItemId,
        destination: ItemId,
        link_type: &str,
    ) -> StorageResult<Link> {
        let conn = self.conn.lock().unwrap();
        let now = Utc::now();
        conn.execute(
            "INSERT INTO links (source_item_id, destination_item_id, link_type, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![source.as_i64(), destination.as_i64(), link_type, now.to_rfc3339()],
        )?;
        Ok(Link {
            id: LinkId::new(conn.last_insert_rowid()),
            source,
            destination,
            link_type: link_type.to_string(),
            created_at: now,
        })
    }

    fn delete_link(&self, id: LinkId) -> StorageResult<bool> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute("DELETE FROM links WHERE link_id = ?1", params![id.as_i64()])?;
        Ok(changed > 0)
    }

    fn delete_link_by_endpoints(
        &self,
        source: ItemId,
        destination: ItemId,
    ) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM links WHERE source_item_id = ?1 AND destination_item_id = ?2",
            params![source.as_i64(), destination.as_i64()],
        )?;
        Ok(changed)
    }

    // === Bulk Operations ===

    fn merge_items(&self, original: ItemId, duplicates: &[ItemId]) -> StorageResult<MergeOutcome> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let mut outcome = MergeOutcome::default();

        let exists: bool = tx.query_row(
            "SELECT COUNT(*) > 0 FROM items WHERE item_id = ?1",
            params![original.as_i64()],
            |row| row.get(0),
        )?;
        if !exists {
            return Err(StorageError::ItemNotFound(original));
        }

        let dup_set: HashSet<i64> = duplicates.iter().map(|d| d.as_i64()).collect();

        // Seed the triple set with links no rewrite will touch, and collect
        // the links that need one.
        let mut triples: HashSet<(i64, i64, String)> = HashSet::new();
        let mut touched: Vec<(i64, i64, i64, String)> = Vec::new();
        {
            let mut stmt = tx.prepare(
                "SELECT link_id, source_item_id, destination_item_id, link_type
                 FROM links ORDER BY link_id",
            )?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                let link_id: i64 = row.get(0)?;
                let source: i64 = row.get(1)?;
                let destination: i64 = row.get(2)?;
                let link_type: String = row.get(3)?;
                if dup_set.contains(&source) || dup_set.contains(&destination) {
                    touched.push((link_id, source, destination, link_type));
                } else {
                    triples.insert((source, destination, link_type));
                }
            }
        }

        let redirect = |id: i64| if dup_set.contains(&id) { original.as_i64() } else { id };
        for (link_id, source, destination, link_type) in touched {
            let (new_source, new_destination) = (redirect(source), redirect(destination));
            if triples.insert((new_source, new_destination, link_type)) {
                tx.execute(
                    "UPDATE links SET source_item_id = ?1, destination_item_id = ?2
                     WHERE link_id = ?3",
                    params![new_source, new_destination, link_id],
                )?;
                outcome.links_rewritten += 1;
            } else {
                tx.execute("DELETE FROM links WHERE link_id = ?1", params![link_id])?;
                outcome.links_dropped += 1;
            }
        }

        for duplicate in duplicates {
            outcome.items_deleted += tx.execute(
                "DELETE FROM items WHERE item_id = ?1",
                params![duplicate.as_i64()],
            )?;
        }

        tx.commit()?;
        Ok(outcome)
    }

    fn purge_dangling_links(&self) -> StorageResult<usize> {
        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(
            "DELETE FROM links
             WHERE NOT EXISTS (SELECT 1 FROM items WHERE item_id = links.source_item_id)
                OR NOT EXISTS (SELECT 1 FROM items WHERE item_id = links.destination_item_id)",
            [],
        )?;
        Ok(changed)
    }

    fn stats(&self) -> StorageResult<CatalogStats> {
        let conn = self.conn.lock().unwrap();
        let items: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        let links: i64 = conn.query_row("SELECT COUNT(*) FROM links", [], |row| row.get(0))?;

        let mut stmt = conn.prepare(
            "SELECT category, COUNT(*) FROM items GROUP BY category ORDER BY category",
        )?;
        let mut rows = stmt.query([])?;
        let mut items_by_category = Vec::new();
        while let Some(row) = rows.next()? {
            let category: String = row.get(0)?;
            let count: i64 = row.get(1)?;
            items_by_category.push((category, count as usize));
        }

        Ok(CatalogStats {
            items: items as usize,
            links: links as usize,
            items_by_category,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::NewItem;

    fn store() -> SqliteStore {
        SqliteStore::open_in_memory().unwrap()
    }

    #[test]
    fn create_and_get_item_round_trip() {
        let store = store();
        let created = store
            .create_item(NewItem::new("Rose", "Word").with_definition("a flower"))
            .unwrap();

        let fetched = store.get_item(created.id).unwrap().unwrap();
        assert_eq!(fetched.word, "Rose");
        assert_eq!(fetched.category, "Word");
        assert_eq!(fetched.definition.as_deref(), Some("a flower"));
        assert_eq!(fetched.created_at, fetched.modified_at);
    }

    #[test]
    fn find_item_by_word_is_case_insensitive_lowest_id() {
        let store = store();
        let first = store.create_item(NewItem::new("Rose", "Word")).unwrap();
        store.create_item(NewItem::new("ROSE", "Word")).unwrap();

        let found = store.find_item_by_word("rose").unwrap().unwrap();
        assert_eq!(found.id, first.id);
        assert!(store.find_item_by_word("briar").unwrap().is_none());
    }

    #[test]
    fn update_item_replaces_fields_and_bumps_modified() {
        let store = store();
        let mut item = store.create_item(NewItem::new("Rose", "Word")).unwrap();
        item.definition = Some("a flower".to_string());
        store.update_item(&item).unwrap();

        let fetched = store.get_item(item.id).unwrap().unwrap();
        assert_eq!(fetched.definition.as_deref(), Some("a flower"));
        assert!(fetched.modified_at >= fetched.created_at);
    }

    #[test]
    fn update_missing_item_is_not_found() {
        let store = store();
        let mut item = store.create_item(NewItem::new("Rose", "Word")).unwrap();
        store.delete_item(item.id).unwrap();
        item.definition = Some("gone".to_string());
        assert!(matches!(
            store.update_item(&item),
            Err(StorageError::ItemNotFound(_))
        ));
    }

    #[test]
    fn deleting_an_item_leaves_its_links_dangling() {
        let store = store();
        let rose = store.create_item(NewItem::new("Rose", "Word")).unwrap();
        let thorn = store.create_item(NewItem::new("Thorn", "Word")).unwrap();
        store.create_link(rose.id, thorn.id, "reference").unwrap();

        assert!(store.delete_item(thorn.id).unwrap());
        assert_eq!(store.list_links().unwrap().len(), 1);

        assert_eq!(store.purge_dangling_links().unwrap(), 1);
        assert!(store.list_links().unwrap().is_empty());
    }

    #[test]
    fn delete_link_by_endpoints_is_best_effort() {
        let store = store();
        let rose = store.create_item(NewItem::new("Rose", "Word")).unwrap();
        let thorn = store.create_item(NewItem::new("Thorn", "Word")).unwrap();
        assert_eq!(store.delete_link_by_endpoints(rose.id, thorn.id).unwrap(), 0);

        store.create_link(rose.id, thorn.id, "reference").unwrap();
        store.create_link(rose.id, thorn.id, "reference").unwrap();
        assert_eq!(store.delete_link_by_endpoints(rose.id, thorn.id).unwrap(), 2);
    }

    #[test]
    fn merge_redirects_dedups_and_deletes() {
        let store = store();
        let rose = store.create_item(NewItem::new("Rose", "Word")).unwrap();
        let dup = store.create_item(NewItem::new("rose", "Word")).unwrap();
        let thorn = store.create_item(NewItem::new("Thorn", "Word")).unwrap();

        // Both the original and the duplicate link to Thorn: the duplicate's
        // link would collide after the rewrite and must be dropped.
        store.create_link(rose.id, thorn.id, "reference").unwrap();
        store.create_link(dup.id, thorn.id, "reference").unwrap();
        store.create_link(thorn.id, dup.id, "reference").unwrap();

        let outcome = store.merge_items(rose.id, &[dup.id]).unwrap();
        assert_eq!(outcome.links_rewritten, 1);
        assert_eq!(outcome.links_dropped, 1);
        assert_eq!(outcome.items_deleted, 1);

        assert!(store.get_item(dup.id).unwrap().is_none());
        let links = store.list_links().unwrap();
        assert_eq!(links.len(), 2);
        assert!(links
            .iter()
            .all(|l| l.source != dup.id && l.destination != dup.id));
    }

    #[test]
    fn merge_into_missing_original_rolls_back() {
        let store = store();
        let dup = store.create_item(NewItem::new("rose", "Word")).unwrap();
        let ghost = ItemId::new(999);
        assert!(matches!(
            store.merge_items(ghost, &[dup.id]),
            Err(StorageError::ItemNotFound(_))
        ));
        assert!(store.get_item(dup.id).unwrap().is_some());
    }

    #[test]
    fn stats_counts_by_category() {
        let store = store();
        store.create_item(NewItem::new("Rose", "Word")).unwrap();
        store.create_item(NewItem::new("Thorn", "Word")).unwrap();
        store.create_item(NewItem::new("Keats", "Writer")).unwrap();

        let stats = store.stats().unwrap();
        assert_eq!(stats.items, 3);
        assert_eq!(stats.links, 0);
        assert_eq!(
            stats.items_by_category,
            vec![("Word".to_string(), 2), ("Writer".to_string(), 1)]
        );
    }
}
