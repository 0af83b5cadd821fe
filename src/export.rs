// Schema export - portable snapshot of resolved schemas
// Record layout is stable so snapshots from different runs can be compared

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::schema::ModelSchema;
use crate::error::{ReorderError, ReorderResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaRecord {
    pub name: String,       // model name
    pub table_name: String, // database table
    pub fields: Vec<FieldRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRecord {
    pub name: String,
    pub db_name: String,
    pub data_type: String,
    pub full_type_name: String,
    pub size: u32,
    pub unique: bool,
    pub comment: String,
    pub not_null: bool,
    pub is_ptr: bool,
    pub has_default_value: bool,
    pub default_value: serde_json::Value,
    pub primary_key: bool,
    pub auto_increment: bool,
    pub tags: BTreeMap<String, String>,
}

/// Projects schemas onto interchange records, keeping their order.
///
/// Fields skipped by migrations or without a column type are left out.
pub fn to_records<'s, I>(schemas: I) -> Vec<SchemaRecord>
where
    I: IntoIterator<Item = &'s ModelSchema>,
{
    schemas
        .into_iter()
        .map(|schema| SchemaRecord {
            name: schema.name.clone(),
            table_name: schema.table.clone(),
            fields: schema
                .fields
                .iter()
                .filter_map(|field| {
                    let data_type = field.data_type.as_ref().filter(|_| !field.ignore_migration)?;
                    Some(FieldRecord {
                        name: field.name.clone(),
                        db_name: field.db_name.clone(),
                        data_type: data_type.as_str().to_string(),
                        full_type_name: field.full_type_name.clone(),
                        size: field.size,
                        unique: field.unique,
                        comment: field.comment.clone(),
                        not_null: field.not_null,
                        is_ptr: field.is_ptr,
                        has_default_value: field.has_default_value,
                        default_value: field.default_value.clone(),
                        primary_key: field.primary_key,
                        auto_increment: field.auto_increment,
                        tags: field.tags.clone(),
                    })
                })
                .collect(),
        })
        .collect()
}

pub fn marshal_records(records: &[SchemaRecord]) -> ReorderResult<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    String::from_utf8(buf).map_err(|e| ReorderError::SchemaFormat(e.to_string()))
}

pub fn marshal_schema<'s, I>(schemas: I) -> ReorderResult<String>
where
    I: IntoIterator<Item = &'s ModelSchema>,
{
    marshal_records(&to_records(schemas))
}

/// Parses an interchange document; `null` reads as an empty snapshot.
pub fn unmarshal_schema(buf: &str) -> ReorderResult<Vec<SchemaRecord>> {
    let records: Option<Vec<SchemaRecord>> = serde_json::from_str(buf)?;
    Ok(records.unwrap_or_default())
}

pub fn save_snapshot<'s, I>(path: impl AsRef<Path>, schemas: I) -> ReorderResult<()>
where
    I: IntoIterator<Item = &'s ModelSchema>,
{
    let path = path.as_ref();
    let json = marshal_schema(schemas)?;
    fs::write(path, json)
        .map_err(|e| ReorderError::Io(format!("failed to write {}: {}", path.display(), e)))?;
    debug!(path = %path.display(), "saved schema snapshot");
    Ok(())
}

pub fn load_snapshot(path: impl AsRef<Path>) -> ReorderResult<Vec<SchemaRecord>> {
    let path = path.as_ref();
    let buf = fs::read_to_string(path)
        .map_err(|e| ReorderError::Io(format!("failed to read {}: {}", path.display(), e)))?;
    unmarshal_schema(&buf)
}

/// Field-level changes to a table present in both snapshots
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableChange {
    pub table: String,
    pub added_fields: Vec<String>,
    pub removed_fields: Vec<String>,
    pub modified_fields: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SnapshotDiff {
    pub added_tables: Vec<String>,
    pub removed_tables: Vec<String>,
    pub changed_tables: Vec<TableChange>,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.added_tables.is_empty()
            && self.removed_tables.is_empty()
            && self.changed_tables.is_empty()
    }
}

/// Compares two snapshots by table name and, within a table, by column name.
pub fn diff_snapshots(old: &[SchemaRecord], new: &[SchemaRecord]) -> SnapshotDiff {
    let old_tables: HashMap<&str, &SchemaRecord> =
        old.iter().map(|r| (r.table_name.as_str(), r)).collect();
    let new_tables: HashMap<&str, &SchemaRecord> =
        new.iter().map(|r| (r.table_name.as_str(), r)).collect();

    let mut diff = SnapshotDiff::default();

    for record in new {
        match old_tables.get(record.table_name.as_str()) {
            None => diff.added_tables.push(record.table_name.clone()),
            Some(previous) => {
                let change = diff_fields(previous, record);
                if change != TableChange::default() {
                    diff.changed_tables.push(TableChange {
                        table: record.table_name.clone(),
                        ..change
                    });
                }
            }
        }
    }

    diff.removed_tables = old
        .iter()
        .filter(|r| !new_tables.contains_key(r.table_name.as_str()))
        .map(|r| r.table_name.clone())
        .collect();

    diff
}

fn diff_fields(old: &SchemaRecord, new: &SchemaRecord) -> TableChange {
    let old_fields: HashMap<&str, &FieldRecord> =
        old.fields.iter().map(|f| (f.db_name.as_str(), f)).collect();
    let new_fields: HashMap<&str, &FieldRecord> =
        new.fields.iter().map(|f| (f.db_name.as_str(), f)).collect();

    let mut change = TableChange::default();
    for field in &new.fields {
        match old_fields.get(field.db_name.as_str()) {
            None => change.added_fields.push(field.db_name.clone()),
            Some(previous) if *previous != field => {
                change.modified_fields.push(field.db_name.clone())
            }
            Some(_) => {}
        }
    }
    change.removed_fields = old
        .fields
        .iter()
        .filter(|f| !new_fields.contains_key(f.db_name.as_str()))
        .map(|f| f.db_name.clone())
        .collect();
    change
}
