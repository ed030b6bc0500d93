//! Persistent record store over tantivy.
//!
//! One tantivy doc per workspace document, keyed by path and id. Every
//! mutation runs delete-term + add + commit and then reloads the reader, so
//! lookups are served from point-in-time snapshots and a record's replacement
//! becomes visible in one step, never as a half-written row.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tantivy::collector::{Count, TopDocs};
use tantivy::directory::MmapDirectory;
use tantivy::query::{AllQuery, Query, TermQuery};
use tantivy::schema::{Field, IndexRecordOption, Value};
use tantivy::{Index, IndexReader, IndexSettings, IndexWriter, ReloadPolicy, TantivyDocument, Term};

use crate::documents::{Document, DocumentSummary, EntityType};
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::schema::RecordSchema;

/// Listing cap, far above the dozens-to-hundreds of documents a workspace holds.
const LIST_LIMIT: usize = 100_000;

/// Writer heap. Records are small; this is the usual comfortable default.
const WRITER_HEAP_BYTES: usize = 50_000_000;

/// Tantivy-backed store of whole document records.
pub struct RecordStore {
    index: Index,
    reader: IndexReader,
    writer: Mutex<Option<IndexWriter>>,
    fields: RecordSchema,
}

impl RecordStore {
    /// Open the store at `index_path`, creating it on first use.
    pub fn open(index_path: impl AsRef<Path>) -> StorageResult<Self> {
        let index_path = index_path.as_ref();
        std::fs::create_dir_all(index_path)?;

        let (schema, fields) = RecordSchema::build();

        let index = if index_path.join("meta.json").exists() {
            Index::open_in_dir(index_path)?
        } else {
            let dir = MmapDirectory::open(index_path)?;
            Index::create(dir, schema, IndexSettings::default())?
        };

        let reader = index
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        reader.reload()?;

        Ok(Self {
            index,
            reader,
            writer: Mutex::new(None),
            fields,
        })
    }

    /// Insert or replace the record at `document.path`.
    ///
    /// The prior record for the path is deleted in the same commit: if the
    /// document's id changed, the old id stops resolving and the new one
    /// starts, atomically from a reader's point of view. An id that already
    /// belongs to a different live path is rejected and the store is left
    /// unchanged.
    pub fn upsert(&self, document: &Document) -> StorageResult<()> {
        if let Some(existing) = self.get_by_id(&document.id)? {
            if existing.path != document.path {
                return Err(StorageError::IdConflict {
                    id: document.id.clone(),
                    existing: existing.path,
                });
            }
        }

        let record = self.encode_record(document)?;
        {
            let mut writer_guard = self.writer.lock();
            let writer = self.ensure_writer(&mut writer_guard)?;
            writer.delete_term(self.path_term(&document.path));
            writer.add_document(record)?;
            writer.commit()?;
        }
        self.reader.reload()?;
        Ok(())
    }

    /// Delete the record at `path`, returning its id. `Ok(None)` when the
    /// path was not indexed.
    pub fn remove(&self, path: &Path) -> StorageResult<Option<String>> {
        let Some(existing) = self.get_by_path(path)? else {
            return Ok(None);
        };
        {
            let mut writer_guard = self.writer.lock();
            let writer = self.ensure_writer(&mut writer_guard)?;
            writer.delete_term(self.path_term(path));
            writer.commit()?;
        }
        self.reader.reload()?;
        Ok(Some(existing.id))
    }

    /// Look up one record by id.
    pub fn get_by_id(&self, id: &str) -> StorageResult<Option<Document>> {
        self.get_by_term(Term::from_field_text(self.fields.id, id))
    }

    /// Look up one record by source path.
    pub fn get_by_path(&self, path: &Path) -> StorageResult<Option<Document>> {
        self.get_by_term(self.path_term(path))
    }

    /// Summaries of all records, optionally filtered by entity type,
    /// ordered by id.
    pub fn list(&self, entity_type: Option<EntityType>) -> StorageResult<Vec<DocumentSummary>> {
        let searcher = self.reader.searcher();
        let query: Box<dyn Query> = match entity_type {
            Some(entity_type) => Box::new(TermQuery::new(
                Term::from_field_text(self.fields.entity_type, entity_type.as_str()),
                IndexRecordOption::Basic,
            )),
            None => Box::new(AllQuery),
        };

        let top_docs = searcher.search(&*query, &TopDocs::with_limit(LIST_LIMIT))?;
        let mut summaries = Vec::with_capacity(top_docs.len());
        for (_score, address) in top_docs {
            let stored: TantivyDocument = searcher.doc(address)?;
            summaries.push(self.decode_record(&stored)?.summary());
        }
        summaries.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(summaries)
    }

    /// Number of live records.
    pub fn count(&self) -> StorageResult<usize> {
        let searcher = self.reader.searcher();
        Ok(searcher.search(&AllQuery, &Count)?)
    }

    fn get_by_term(&self, term: Term) -> StorageResult<Option<Document>> {
        let searcher = self.reader.searcher();
        let query = TermQuery::new(term, IndexRecordOption::Basic);
        let top_docs = searcher.search(&query, &TopDocs::with_limit(1))?;
        let Some((_score, address)) = top_docs.into_iter().next() else {
            return Ok(None);
        };
        let stored: TantivyDocument = searcher.doc(address)?;
        self.decode_record(&stored).map(Some)
    }

    fn ensure_writer<'a>(
        &self,
        writer_guard: &'a mut Option<IndexWriter>,
    ) -> StorageResult<&'a mut IndexWriter> {
        if writer_guard.is_none() {
            *writer_guard = Some(self.index.writer(WRITER_HEAP_BYTES)?);
        }
        Ok(writer_guard.as_mut().unwrap())
    }

    fn path_term(&self, path: &Path) -> Term {
        Term::from_field_text(self.fields.path, path.to_string_lossy().as_ref())
    }

    fn encode_record(&self, document: &Document) -> StorageResult<TantivyDocument> {
        let mut record = TantivyDocument::new();
        record.add_text(self.fields.id, &document.id);
        record.add_text(self.fields.path, document.path.to_string_lossy().as_ref());
        record.add_text(self.fields.entity_type, document.entity_type.as_str());
        record.add_text(self.fields.title, &document.title);
        if let Some(owner) = &document.owner {
            record.add_text(self.fields.owner, owner);
        }
        if let Some(status) = &document.status {
            record.add_text(self.fields.status, status);
        }
        record.add_text(self.fields.content, &document.content);
        record.add_text(
            self.fields.attributes,
            &serde_json::to_string(&document.attributes)?,
        );
        record.add_u64(self.fields.indexed_at, to_epoch_seconds(document.indexed_at));
        record.add_u64(self.fields.updated_at, to_epoch_seconds(document.updated_at));
        Ok(record)
    }

    fn decode_record(&self, stored: &TantivyDocument) -> StorageResult<Document> {
        let attributes_json = text_value(stored, self.fields.attributes, "attributes")?;
        Ok(Document {
            id: text_value(stored, self.fields.id, "id")?,
            path: PathBuf::from(text_value(stored, self.fields.path, "path")?),
            entity_type: text_value(stored, self.fields.entity_type, "entity_type")?
                .parse()
                .unwrap_or(EntityType::Unknown),
            title: text_value(stored, self.fields.title, "title")?,
            owner: optional_text(stored, self.fields.owner),
            status: optional_text(stored, self.fields.status),
            content: text_value(stored, self.fields.content, "content")?,
            attributes: serde_json::from_str(&attributes_json)?,
            indexed_at: timestamp_value(stored, self.fields.indexed_at, "indexed_at")?,
            updated_at: timestamp_value(stored, self.fields.updated_at, "updated_at")?,
        })
    }
}

fn optional_text(stored: &TantivyDocument, field: Field) -> Option<String> {
    stored
        .get_first(field)
        .and_then(|value| value.as_str())
        .map(str::to_string)
}

fn text_value(
    stored: &TantivyDocument,
    field: Field,
    name: &'static str,
) -> StorageResult<String> {
    optional_text(stored, field).ok_or(StorageError::MissingField(name))
}

fn timestamp_value(
    stored: &TantivyDocument,
    field: Field,
    name: &'static str,
) -> StorageResult<DateTime<Utc>> {
    let seconds = stored
        .get_first(field)
        .and_then(|value| value.as_u64())
        .ok_or(StorageError::MissingField(name))?;
    Ok(DateTime::from_timestamp(seconds as i64, 0).unwrap_or(DateTime::UNIX_EPOCH))
}

fn to_epoch_seconds(at: DateTime<Utc>) -> u64 {
    at.timestamp().max(0) as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;
    use tempfile::TempDir;

    fn sample_document(id: &str, path: &str, entity_type: EntityType) -> Document {
        let now = DateTime::from_timestamp(1_760_000_000, 0).unwrap();
        let mut attributes = Map::new();
        attributes.insert("id".into(), id.into());
        Document {
            id: id.to_string(),
            path: PathBuf::from(path),
            entity_type,
            title: format!("Title of {id}"),
            owner: Some("dana".to_string()),
            status: None,
            content: format!("---\nid: {id}\n---\n# Title of {id}\n"),
            attributes,
            indexed_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_upsert_then_get_by_id_and_path() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(dir.path()).unwrap();

        let doc = sample_document("project:alpha", "/ws/projects/alpha.md", EntityType::Project);
        store.upsert(&doc).unwrap();

        let by_id = store.get_by_id("project:alpha").unwrap().unwrap();
        assert_eq!(by_id.path, doc.path);
        assert_eq!(by_id.content, doc.content);
        assert_eq!(by_id.owner.as_deref(), Some("dana"));
        assert_eq!(by_id.status, None);
        assert_eq!(by_id.attributes, doc.attributes);
        assert_eq!(by_id.indexed_at, doc.indexed_at);

        let by_path = store
            .get_by_path(Path::new("/ws/projects/alpha.md"))
            .unwrap()
            .unwrap();
        assert_eq!(by_path.id, "project:alpha");
    }

    #[test]
    fn test_upsert_replaces_prior_record_at_path() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(dir.path()).unwrap();

        let mut doc = sample_document("risk:r1", "/ws/risks/r1.md", EntityType::Risk);
        store.upsert(&doc).unwrap();

        doc.content = "updated body".to_string();
        store.upsert(&doc).unwrap();

        assert_eq!(store.count().unwrap(), 1);
        let fetched = store.get_by_id("risk:r1").unwrap().unwrap();
        assert_eq!(fetched.content, "updated body");
    }

    #[test]
    fn test_upsert_id_change_moves_the_mapping() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(dir.path()).unwrap();

        let mut doc = sample_document("epic:search", "/ws/epics/search.md", EntityType::Epic);
        store.upsert(&doc).unwrap();

        doc.id = "custom-9".to_string();
        store.upsert(&doc).unwrap();

        assert!(store.get_by_id("epic:search").unwrap().is_none());
        assert_eq!(
            store.get_by_id("custom-9").unwrap().unwrap().path,
            doc.path
        );
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_upsert_rejects_id_owned_by_another_path() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(dir.path()).unwrap();

        let first = sample_document("shared-id", "/ws/projects/a.md", EntityType::Project);
        store.upsert(&first).unwrap();

        let second = sample_document("shared-id", "/ws/projects/b.md", EntityType::Project);
        let err = store.upsert(&second).unwrap_err();
        assert!(matches!(err, StorageError::IdConflict { .. }));

        // The first record is untouched and the second path never landed.
        assert_eq!(store.count().unwrap(), 1);
        assert!(
            store
                .get_by_path(Path::new("/ws/projects/b.md"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_remove_returns_id_and_forgets_record() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(dir.path()).unwrap();

        let doc = sample_document("log:monday", "/ws/logs/monday.md", EntityType::Log);
        store.upsert(&doc).unwrap();

        let removed = store.remove(Path::new("/ws/logs/monday.md")).unwrap();
        assert_eq!(removed.as_deref(), Some("log:monday"));
        assert!(store.get_by_id("log:monday").unwrap().is_none());

        let again = store.remove(Path::new("/ws/logs/monday.md")).unwrap();
        assert_eq!(again, None);
    }

    #[test]
    fn test_list_filters_by_type_and_orders_by_id() {
        let dir = TempDir::new().unwrap();
        let store = RecordStore::open(dir.path()).unwrap();

        for (id, path, entity_type) in [
            ("project:zeta", "/ws/projects/zeta.md", EntityType::Project),
            ("project:alpha", "/ws/projects/alpha.md", EntityType::Project),
            ("risk:r1", "/ws/risks/r1.md", EntityType::Risk),
        ] {
            store.upsert(&sample_document(id, path, entity_type)).unwrap();
        }

        let all = store.list(None).unwrap();
        let ids: Vec<&str> = all.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["project:alpha", "project:zeta", "risk:r1"]);

        let projects = store.list(Some(EntityType::Project)).unwrap();
        assert_eq!(projects.len(), 2);
        assert!(
            projects
                .iter()
                .all(|s| s.entity_type == EntityType::Project)
        );
    }

    #[test]
    fn test_records_survive_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = RecordStore::open(dir.path()).unwrap();
            let doc = sample_document(
                "decision:adr-1",
                "/ws/decisions/adr-1.md",
                EntityType::Decision,
            );
            store.upsert(&doc).unwrap();
        }

        let reopened = RecordStore::open(dir.path()).unwrap();
        let fetched = reopened.get_by_id("decision:adr-1").unwrap().unwrap();
        assert_eq!(fetched.entity_type, EntityType::Decision);
        assert_eq!(reopened.count().unwrap(), 1);
    }
}
