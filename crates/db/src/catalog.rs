use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use storage::{Attribute, Domain, Schema, Table, Tuple, Value};

/// A named collection of tables. Table names are unique and case-sensitive
/// within a database (spec §3).
#[derive(Default)]
pub struct Database {
    tables: BTreeMap<String, Table>,
}

impl Database {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.get(name)
    }

    pub fn table_mut(&mut self, name: &str) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    pub fn create_table(&mut self, name: &str, schema: Schema) -> bool {
        if self.tables.contains_key(name) {
            return false;
        }
        self.tables.insert(name.to_string(), Table::new(name, schema));
        true
    }

    pub fn drop_table(&mut self, name: &str) -> bool {
        self.tables.remove(name).is_some()
    }

    pub fn table_names(&self) -> Vec<&str> {
        self.tables.keys().map(|s| s.as_str()).collect()
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }
}

/// The process-wide set of databases plus the current-database selection;
/// the unit of persistence (spec §3).
#[derive(Default)]
pub struct Catalog {
    databases: BTreeMap<String, Database>,
    current: Option<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_database(&mut self, name: &str) -> bool {
        if self.databases.contains_key(name) {
            return false;
        }
        self.databases.insert(name.to_string(), Database::new());
        true
    }

    pub fn use_database(&mut self, name: &str) -> bool {
        if !self.databases.contains_key(name) {
            return false;
        }
        self.current = Some(name.to_string());
        true
    }

    pub fn current(&self) -> Option<&Database> {
        self.current.as_ref().and_then(|name| self.databases.get(name))
    }

    pub fn current_mut(&mut self) -> Option<&mut Database> {
        match &self.current {
            Some(name) => self.databases.get_mut(name),
            None => None,
        }
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn database_names(&self) -> Vec<&str> {
        self.databases.keys().map(|s| s.as_str()).collect()
    }

    /// Writes the full catalog to `path` atomically: the snapshot is
    /// serialized into a sibling temp file, then renamed over the target, so
    /// a crash mid-write never corrupts the previous good snapshot.
    pub fn save(&self, path: &Path) -> Result<()> {
        let snapshot = SerializedCatalog::from_catalog(self);
        let tmp_path = path.with_extension("tmp");
        let file = fs::File::create(&tmp_path).context("create snapshot temp file")?;
        serde_json::to_writer_pretty(file, &snapshot).context("serialize catalog")?;
        fs::rename(&tmp_path, path).context("install snapshot")?;
        Ok(())
    }

    /// Loads the catalog from `path`. Returns an empty catalog when the file
    /// is absent, matching spec §4.5's "missing/unreadable at startup: warn,
    /// start empty" — the "warn" half is the caller's responsibility since
    /// only it knows whether absence or unreadability occurred.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let file = fs::File::open(path).context("open snapshot file")?;
        let snapshot: SerializedCatalog =
            serde_json::from_reader(file).context("parse snapshot file")?;
        Ok(snapshot.into_catalog())
    }
}

#[derive(Serialize, Deserialize)]
struct SerializedCatalog {
    current: Option<String>,
    databases: Vec<SerializedDatabase>,
}

#[derive(Serialize, Deserialize)]
struct SerializedDatabase {
    name: String,
    tables: Vec<SerializedTable>,
}

#[derive(Serialize, Deserialize)]
struct SerializedTable {
    name: String,
    attributes: Vec<SerializedAttribute>,
    tuples: Vec<Vec<Value>>,
}

#[derive(Serialize, Deserialize)]
struct SerializedAttribute {
    name: String,
    domain: Domain,
    primary_key: bool,
}

impl SerializedCatalog {
    fn from_catalog(catalog: &Catalog) -> Self {
        let mut databases = Vec::new();
        for (db_name, database) in &catalog.databases {
            let mut tables = Vec::new();
            for table in database.tables() {
                let attributes = table
                    .schema()
                    .attributes
                    .iter()
                    .map(|a| SerializedAttribute {
                        name: a.name.clone(),
                        domain: a.domain,
                        primary_key: a.primary_key,
                    })
                    .collect();
                let tuples = table.tuples().iter().map(|t| t.values().to_vec()).collect();
                tables.push(SerializedTable {
                    name: table.name().to_string(),
                    attributes,
                    tuples,
                });
            }
            databases.push(SerializedDatabase {
                name: db_name.clone(),
                tables,
            });
        }
        SerializedCatalog {
            current: catalog.current.clone(),
            databases,
        }
    }

    fn into_catalog(self) -> Catalog {
        let mut databases = BTreeMap::new();
        for serialized_db in self.databases {
            let mut database = Database::new();
            for serialized_table in serialized_db.tables {
                let attributes = serialized_table
                    .attributes
                    .into_iter()
                    .map(|a| Attribute::new(a.name, a.domain, a.primary_key))
                    .collect();
                let schema = match Schema::new(attributes) {
                    Ok(schema) => schema,
                    Err(_) => continue,
                };
                database.create_table(&serialized_table.name, schema);
                let table = database
                    .table_mut(&serialized_table.name)
                    .expect("just created");
                for values in serialized_table.tuples {
                    let _ = table.insert(Tuple::new(values));
                }
            }
            databases.insert(serialized_db.name, database);
        }
        Catalog {
            databases,
            current: self.current,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.create_database("d");
        catalog.use_database("d");
        let schema = Schema::new(vec![Attribute::new("id", Domain::Integer, true)]).unwrap();
        catalog.current_mut().unwrap().create_table("t", schema);
        let table = catalog.current_mut().unwrap().table_mut("t").unwrap();
        table.insert(Tuple::new(vec![Value::Integer(1)])).unwrap();
        table.insert(Tuple::new(vec![Value::Integer(2)])).unwrap();
        catalog
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dbms_state.ser");
        let catalog = sample_catalog();
        catalog.save(&path).unwrap();

        let loaded = Catalog::load(&path).unwrap();
        assert_eq!(loaded.current_name(), Some("d"));
        let table = loaded.current().unwrap().table("t").unwrap();
        let ids: Vec<i32> = table
            .select(|_| true)
            .iter()
            .map(|t| t.get(0).unwrap().as_i32().unwrap())
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn missing_file_loads_empty_catalog() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.ser");
        let loaded = Catalog::load(&path).unwrap();
        assert!(loaded.current_name().is_none());
        assert!(loaded.database_names().is_empty());
    }
}
