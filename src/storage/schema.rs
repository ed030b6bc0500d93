//! Tantivy schema for workspace document records.
//!
//! One tantivy doc per workspace document, whole record stored. Only the
//! lookup keys (id, path) and the listing filter (entity type) are indexed;
//! everything else is stored for retrieval.

use tantivy::schema::{FAST, Field, STORED, STRING, Schema, SchemaBuilder};

/// Schema fields for document record storage.
#[derive(Debug)]
pub struct RecordSchema {
    /// Document id - STRING for exact lookup, unique across the index.
    pub id: Field,

    /// Source path - STRING for exact lookup and replacement, unique.
    pub path: Field,

    /// Lowercase entity-type tag - STRING for filtered listings.
    pub entity_type: Field,

    /// Display title.
    pub title: Field,

    /// Owner attribute, absent when the document has none.
    pub owner: Field,

    /// Status attribute, absent when the document has none.
    pub status: Field,

    /// Raw file content, attribute block included.
    pub content: Field,

    /// Attribute block as a JSON object string.
    pub attributes: Field,

    /// First-index timestamp (UTC seconds).
    pub indexed_at: Field,

    /// Last-upsert timestamp (UTC seconds).
    pub updated_at: Field,
}

impl RecordSchema {
    /// Build the schema for document record storage.
    pub fn build() -> (Schema, Self) {
        let mut builder = SchemaBuilder::default();

        let id = builder.add_text_field("id", STRING | STORED);
        let path = builder.add_text_field("path", STRING | STORED);
        let entity_type = builder.add_text_field("entity_type", STRING | STORED | FAST);
        let title = builder.add_text_field("title", STORED);
        let owner = builder.add_text_field("owner", STORED);
        let status = builder.add_text_field("status", STORED);
        let content = builder.add_text_field("content", STORED);
        let attributes = builder.add_text_field("attributes", STORED);
        let indexed_at = builder.add_u64_field("indexed_at", STORED);
        let updated_at = builder.add_u64_field("updated_at", STORED | FAST);

        let schema = builder.build();

        let record_schema = Self {
            id,
            path,
            entity_type,
            title,
            owner,
            status,
            content,
            attributes,
            indexed_at,
            updated_at,
        };

        (schema, record_schema)
    }
}
