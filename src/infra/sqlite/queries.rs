use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDateTime;
use rusqlite::params;
use tracing::info;

use crate::domain::entities::profile::RecordKind;
use crate::domain::entities::record::{FieldValue, Record};
use crate::infra::sqlite::schema::{init_db, open_connection};
use crate::usecase::ports::repo::CollectionMeta;

const STORED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

pub fn encode_field_value(value: &FieldValue) -> (&'static str, String) {
    let encoded = match value {
        FieldValue::Text(text) => text.clone(),
        FieldValue::Number(number) => number.to_string(),
        FieldValue::Bool(flag) => (if *flag { "1" } else { "0" }).to_string(),
        FieldValue::Date(date) => date.format(STORED_DATE_FORMAT).to_string(),
        FieldValue::Null => String::new(),
    };
    (value.type_name(), encoded)
}

pub fn decode_field_value(value_type: &str, value: &str) -> Result<FieldValue> {
    match value_type {
        "text" => Ok(FieldValue::Text(value.to_string())),
        "number" => value
            .parse::<f64>()
            .map(FieldValue::Number)
            .with_context(|| format!("invalid stored number: {value}")),
        "bool" => Ok(FieldValue::Bool(value == "1")),
        "date" => NaiveDateTime::parse_from_str(value, STORED_DATE_FORMAT)
            .map(FieldValue::Date)
            .with_context(|| format!("invalid stored date: {value}")),
        "null" => Ok(FieldValue::Null),
        other => Err(anyhow!("unknown stored value_type: {other}")),
    }
}

pub fn insert_column_names(
    tx: &rusqlite::Transaction<'_>,
    collection_id: i64,
    columns: &[String],
) -> Result<()> {
    let mut insert_column = tx
        .prepare("INSERT INTO column_name(collection_id, col_idx, name) VALUES (?1, ?2, ?3)")
        .context("failed to prepare column insert")?;

    for (col_idx, name) in columns.iter().enumerate() {
        insert_column
            .execute(params![collection_id, col_idx as i64, name])
            .context("failed to insert column name")?;
    }

    Ok(())
}

pub fn insert_records(
    tx: &rusqlite::Transaction<'_>,
    collection_id: i64,
    records: &[Record],
) -> Result<()> {
    let mut insert_field = tx
        .prepare(
            "INSERT INTO field(collection_id, record_idx, name, value_type, value)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .context("failed to prepare field insert")?;

    for (record_idx, record) in records.iter().enumerate() {
        for (name, value) in record.iter() {
            let (value_type, encoded) = encode_field_value(value);
            insert_field
                .execute(params![
                    collection_id,
                    record_idx as i64,
                    name,
                    value_type,
                    encoded
                ])
                .context("failed to insert field")?;
        }
    }

    Ok(())
}

pub fn create_collection(
    db_path: &Path,
    kind: RecordKind,
    name: &str,
    source_path: &str,
    columns: &[String],
    records: &[Record],
) -> Result<i64> {
    init_db(db_path)?;
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start collection create transaction")?;

    tx.execute(
        "INSERT INTO collection(kind, name, source_path, record_count) VALUES (?1, ?2, ?3, ?4)",
        params![kind.as_str(), name, source_path, records.len() as i64],
    )
    .context("failed to insert collection")?;
    let collection_id = tx.last_insert_rowid();

    insert_column_names(&tx, collection_id, columns)?;
    insert_records(&tx, collection_id, records)?;

    tx.commit().context("failed to commit collection create")?;
    info!(
        collection_id,
        kind = %kind,
        records = records.len(),
        "created collection"
    );
    Ok(collection_id)
}

pub fn replace_records(
    db_path: &Path,
    collection_id: i64,
    columns: &[String],
    records: &[Record],
) -> Result<()> {
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start replace transaction")?;

    tx.execute(
        "DELETE FROM field WHERE collection_id = ?1",
        params![collection_id],
    )
    .context("failed to clear existing fields")?;
    tx.execute(
        "DELETE FROM column_name WHERE collection_id = ?1",
        params![collection_id],
    )
    .context("failed to clear existing columns")?;

    insert_column_names(&tx, collection_id, columns)?;
    insert_records(&tx, collection_id, records)?;

    let updated = tx
        .execute(
            "UPDATE collection SET record_count = ?1 WHERE id = ?2",
            params![records.len() as i64, collection_id],
        )
        .context("failed to update collection record_count")?;
    if updated == 0 {
        anyhow::bail!("collection #{collection_id} does not exist");
    }

    tx.commit().context("failed to commit record replacement")?;
    Ok(())
}

pub fn load_columns(db_path: &Path, collection_id: i64) -> Result<Vec<String>> {
    let conn = open_connection(db_path)?;
    let mut stmt = conn
        .prepare(
            "SELECT name
             FROM column_name
             WHERE collection_id = ?1
             ORDER BY col_idx ASC",
        )
        .context("failed to prepare columns query")?;
    let columns = stmt
        .query_map([collection_id], |row| row.get::<_, String>(0))
        .context("failed to query columns")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect columns")?;
    Ok(columns)
}

pub fn load_records(db_path: &Path, collection_id: i64) -> Result<Vec<Record>> {
    let conn = open_connection(db_path)?;
    let record_count: i64 = conn
        .query_row(
            "SELECT record_count FROM collection WHERE id = ?1",
            [collection_id],
            |row| row.get(0),
        )
        .with_context(|| format!("failed to find collection #{collection_id}"))?;

    let mut records = vec![Record::new(); record_count.max(0) as usize];
    let mut stmt = conn
        .prepare(
            "SELECT record_idx, name, value_type, value
             FROM field
             WHERE collection_id = ?1
             ORDER BY record_idx ASC, name ASC",
        )
        .context("failed to prepare record query")?;
    let mut rows = stmt
        .query([collection_id])
        .context("failed to run record query")?;

    while let Some(row) = rows.next().context("failed to read field row")? {
        let record_idx: i64 = row.get(0).context("failed to read record_idx")?;
        let name: String = row.get(1).context("failed to read field name")?;
        let value_type: String = row.get(2).context("failed to read value_type")?;
        let value: String = row.get(3).context("failed to read value")?;

        let decoded = decode_field_value(&value_type, &value)
            .with_context(|| format!("failed to decode field {name} of record {record_idx}"))?;
        if let Some(record) = records.get_mut(record_idx as usize) {
            record.insert(name, decoded);
        }
    }

    Ok(records)
}

pub fn list_collections(db_path: &Path, include_deleted: bool) -> Result<Vec<CollectionMeta>> {
    init_db(db_path)?;
    let conn = open_connection(db_path)?;
    let filter = if include_deleted {
        ""
    } else {
        "WHERE deleted_at IS NULL"
    };
    let mut stmt = conn
        .prepare(&format!(
            "SELECT id, kind, name, record_count, source_path, deleted_at, imported_at
             FROM collection
             {filter}
             ORDER BY id DESC"
        ))
        .context("failed to prepare collections query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, Option<String>>(5)?,
                row.get::<_, String>(6)?,
            ))
        })
        .context("failed to query collections")?
        .collect::<rusqlite::Result<Vec<_>>>()
        .context("failed to collect collections")?;

    rows.into_iter()
        .map(
            |(id, kind, name, record_count, source_path, deleted_at, imported_at)| {
                let kind = RecordKind::parse(&kind)
                    .ok_or_else(|| anyhow!("collection #{id} has unknown kind: {kind}"))?;
                Ok(CollectionMeta {
                    id: id.into(),
                    kind,
                    name,
                    record_count,
                    source_path,
                    deleted_at,
                    imported_at,
                })
            },
        )
        .collect()
}

pub fn rename_collection(db_path: &Path, collection_id: i64, name: &str) -> Result<()> {
    let conn = open_connection(db_path)?;
    let updated = conn
        .execute(
            "UPDATE collection SET name = ?1 WHERE id = ?2",
            params![name, collection_id],
        )
        .context("failed to rename collection")?;
    if updated == 0 {
        anyhow::bail!("collection #{collection_id} does not exist");
    }
    Ok(())
}

pub fn soft_delete_collection(db_path: &Path, collection_id: i64) -> Result<()> {
    init_db(db_path)?;
    let conn = open_connection(db_path)?;
    conn.execute(
        "UPDATE collection SET deleted_at = datetime('now') WHERE id = ?1",
        params![collection_id],
    )
    .with_context(|| format!("failed to soft-delete collection #{collection_id}"))?;
    Ok(())
}

pub fn purge_collection(db_path: &Path, collection_id: i64) -> Result<()> {
    init_db(db_path)?;
    let mut conn = open_connection(db_path)?;
    let tx = conn
        .transaction()
        .context("failed to start purge transaction")?;
    tx.execute(
        "DELETE FROM field WHERE collection_id = ?1",
        params![collection_id],
    )
    .with_context(|| format!("failed to delete fields for collection #{collection_id}"))?;
    tx.execute(
        "DELETE FROM column_name WHERE collection_id = ?1",
        params![collection_id],
    )
    .with_context(|| format!("failed to delete columns for collection #{collection_id}"))?;
    tx.execute(
        "DELETE FROM collection WHERE id = ?1",
        params![collection_id],
    )
    .with_context(|| format!("failed to delete collection #{collection_id}"))?;
    tx.commit().context("failed to commit purge transaction")?;
    info!(collection_id, "purged collection");
    Ok(())
}
