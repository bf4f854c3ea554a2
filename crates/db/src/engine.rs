use std::path::PathBuf;

use query::{matches, parse_condition};
use storage::{Attribute, Domain, Schema, Tuple, Value};

use crate::catalog::Catalog;
use crate::commands::{Command, DescribeTarget, Literal, SelectStatement, parse_command};
use crate::printer::Output;

/// What running one statement produced: either a result to print, or a
/// request to end the session (spec §4.4's `EXIT`).
pub enum EngineOutcome {
    Output(Output),
    Exit { snapshot_saved: bool },
}

/// Owns the catalog and drives every command onto it. The catalog is passed
/// explicitly through `&mut self`, never stored in a global (spec §5).
pub struct Engine {
    catalog: Catalog,
    persistence_path: PathBuf,
}

impl Engine {
    /// Loads the catalog from `persistence_path` if present; starts with an
    /// empty catalog otherwise (spec §4.5/§7: missing or unreadable
    /// snapshot at startup is a warning, not a fatal error).
    pub fn new(persistence_path: impl Into<PathBuf>) -> Self {
        let path = persistence_path.into();
        let catalog = match Catalog::load(&path) {
            Ok(catalog) => catalog,
            Err(err) => {
                eprintln!("Warning: could not load snapshot at {}: {}", path.display(), err);
                Catalog::new()
            }
        };
        Self {
            catalog,
            persistence_path: path,
        }
    }

    /// Parses and runs one already-semicolon-delimited statement. Every
    /// recoverable error (syntax, semantic, constraint) is turned into a
    /// single diagnostic `Output::Message` rather than propagated — only
    /// `EXIT` ends the session (spec §7's "executor never halts the
    /// process on recoverable errors").
    pub fn execute(&mut self, statement: &str) -> EngineOutcome {
        let command = match parse_command(statement) {
            Ok(command) => command,
            Err(err) => return EngineOutcome::Output(Output::message(err.to_string())),
        };

        if matches!(command, Command::Exit) {
            tracing::debug!("dispatching EXIT");
            let snapshot_saved = match self.catalog.save(&self.persistence_path) {
                Ok(()) => true,
                Err(err) => {
                    eprintln!("Warning: could not write snapshot: {:#}", err);
                    false
                }
            };
            return EngineOutcome::Exit { snapshot_saved };
        }

        tracing::debug!(command = ?command, "dispatching command");
        let outcome = self.dispatch(command);
        EngineOutcome::Output(match outcome {
            Ok(output) => output,
            Err(message) => Output::message(message),
        })
    }

    fn dispatch(&mut self, command: Command) -> Result<Output, String> {
        match command {
            Command::CreateDatabase(name) => self.exec_create_database(&name),
            Command::Use(name) => self.exec_use(&name),
            Command::CreateTable { name, attributes } => self.exec_create_table(&name, attributes),
            Command::Describe(target) => self.exec_describe(target),
            Command::Insert { table, values } => self.exec_insert(&table, values),
            Command::Update {
                table,
                assignments,
                condition,
            } => self.exec_update(&table, assignments, condition),
            Command::Delete { table, condition } => self.exec_delete(&table, condition),
            Command::Select(select) => self.exec_select(select),
            Command::Let { table, key, select } => self.exec_let(&table, &key, select),
            Command::Rename { table, names } => self.exec_rename(&table, names),
            Command::ShowDatabases => Ok(self.exec_show_databases()),
            Command::ShowTables => self.exec_show_tables(),
            Command::ShowRecords(table) => self.exec_show_records(&table),
            Command::Input { file, output } => self.exec_input(&file, output),
            Command::Exit => unreachable!("EXIT is handled in execute()"),
        }
    }

    fn exec_create_database(&mut self, name: &str) -> Result<Output, String> {
        if self.catalog.create_database(name) {
            Ok(Output::message(format!("Database '{}' created.", name)))
        } else {
            Err(format!("Database '{}' already exists.", name))
        }
    }

    fn exec_use(&mut self, name: &str) -> Result<Output, String> {
        if self.catalog.use_database(name) {
            Ok(Output::message(format!("Using database '{}'.", name)))
        } else {
            Err(format!("Database '{}' does not exist.", name))
        }
    }

    fn exec_create_table(
        &mut self,
        name: &str,
        attribute_defs: Vec<crate::commands::AttributeDef>,
    ) -> Result<Output, String> {
        let database = self
            .catalog
            .current_mut()
            .ok_or_else(|| "No current database selected.".to_string())?;
        if database.contains_table(name) {
            return Err(format!("Table '{}' already exists.", name));
        }
        let attributes: Vec<Attribute> = attribute_defs
            .into_iter()
            .map(|def| Attribute::new(def.name, def.domain, def.primary_key))
            .collect();
        let schema = Schema::new(attributes).map_err(|e| e.to_string())?;
        database.create_table(name, schema);
        Ok(Output::message(format!("Table '{}' created.", name)))
    }

    fn exec_describe(&self, target: DescribeTarget) -> Result<Output, String> {
        let database = self
            .catalog
            .current()
            .ok_or_else(|| "No current database selected.".to_string())?;
        match target {
            DescribeTarget::All => {
                let mut lines: Vec<String> = database.tables().map(describe_table).collect();
                if lines.is_empty() {
                    lines.push("No tables.".to_string());
                }
                Ok(Output::Lines(lines))
            }
            DescribeTarget::Table(name) => {
                let table = database
                    .table(&name)
                    .ok_or_else(|| format!("Table '{}' does not exist.", name))?;
                Ok(Output::Lines(vec![describe_table(table)]))
            }
        }
    }

    fn exec_insert(&mut self, table_name: &str, values: Vec<Literal>) -> Result<Output, String> {
        let database = self
            .catalog
            .current_mut()
            .ok_or_else(|| "No current database selected.".to_string())?;
        let table = database
            .table_mut(table_name)
            .ok_or_else(|| format!("Table '{}' does not exist.", table_name))?;
        let raw: Vec<String> = values.iter().map(Literal::raw_text).collect();
        table
            .insert_literals(&raw)
            .map(|()| Output::message("1 row inserted.".to_string()))
            .map_err(|e| e.to_string())
    }

    fn exec_update(
        &mut self,
        table_name: &str,
        assignments: Vec<(String, Literal)>,
        condition: Option<String>,
    ) -> Result<Output, String> {
        let database = self
            .catalog
            .current_mut()
            .ok_or_else(|| "No current database selected.".to_string())?;
        let table = database
            .table_mut(table_name)
            .ok_or_else(|| format!("Table '{}' does not exist.", table_name))?;
        let schema = table.schema().clone();

        let condition = condition
            .as_deref()
            .map(parse_condition)
            .transpose()
            .map_err(|e| e.to_string())?;

        let mut resolved = Vec::new();
        let mut diagnostics = Vec::new();
        for (column, literal) in assignments {
            let index = schema
                .attribute_index(&column)
                .ok_or_else(|| format!("Unknown attribute '{}'.", column))?;
            let attribute = &schema.attributes[index];
            match attribute.domain.parse_value(&attribute.name, &literal.raw_text()) {
                Ok(value) => resolved.push((index, value)),
                Err(err) => diagnostics.push(err.to_string()),
            }
        }

        let (updated, errors) = table.update(
            |tuple| match &condition {
                Some(cond) => matches(cond, tuple, &schema),
                None => true,
            },
            |tuple| {
                let mut row = tuple.values().to_vec();
                for (index, value) in &resolved {
                    row[*index] = value.clone();
                }
                Tuple::new(row)
            },
        );
        diagnostics.extend(errors.iter().map(|e| e.to_string()));

        let mut message = format!("{} row(s) updated.", updated);
        for diagnostic in diagnostics {
            message.push('\n');
            message.push_str(&diagnostic);
        }
        Ok(Output::message(message))
    }

    fn exec_delete(&mut self, table_name: &str, condition: Option<String>) -> Result<Output, String> {
        let database = self
            .catalog
            .current_mut()
            .ok_or_else(|| "No current database selected.".to_string())?;
        match condition {
            None => {
                if database.drop_table(table_name) {
                    Ok(Output::message(format!("Table '{}' dropped.", table_name)))
                } else {
                    Err(format!("Table '{}' does not exist.", table_name))
                }
            }
            Some(condition_text) => {
                let table = database
                    .table_mut(table_name)
                    .ok_or_else(|| format!("Table '{}' does not exist.", table_name))?;
                let schema = table.schema().clone();
                let condition = parse_condition(&condition_text).map_err(|e| e.to_string())?;
                let removed = table.delete(Some(|tuple: &Tuple| {
                    matches(&condition, tuple, &schema)
                }));
                Ok(Output::message(format!("{} row(s) deleted.", removed)))
            }
        }
    }

    fn exec_select(&self, select: SelectStatement) -> Result<Output, String> {
        let (headers, _domains, rows) = self.run_select(&select)?;
        Ok(Output::Rows { headers, rows })
    }

    fn exec_let(&mut self, new_table: &str, key_attr: &str, select: SelectStatement) -> Result<Output, String> {
        let (headers, domains, rows) = self.run_select(&select)?;
        let key_bare = bare(key_attr);
        let key_index = headers
            .iter()
            .position(|h| bare(h).eq_ignore_ascii_case(&key_bare))
            .ok_or_else(|| format!("key attribute '{}' is not in the projection", key_attr))?;

        let attributes: Vec<Attribute> = headers
            .iter()
            .zip(domains.iter())
            .enumerate()
            .map(|(idx, (name, domain))| Attribute::new(name.clone(), *domain, idx == key_index))
            .collect();
        let schema = Schema::new(attributes).map_err(|e| e.to_string())?;

        let database = self
            .catalog
            .current_mut()
            .ok_or_else(|| "No current database selected.".to_string())?;
        if database.contains_table(new_table) {
            return Err(format!("Table '{}' already exists.", new_table));
        }
        database.create_table(new_table, schema);
        let table = database.table_mut(new_table).expect("just created");
        let mut inserted = 0;
        for row in rows {
            if table.insert(Tuple::new(row)).is_ok() {
                inserted += 1;
            }
        }
        Ok(Output::message(format!(
            "Table '{}' created with {} row(s).",
            new_table, inserted
        )))
    }

    fn exec_rename(&mut self, table_name: &str, names: Vec<String>) -> Result<Output, String> {
        let database = self
            .catalog
            .current_mut()
            .ok_or_else(|| "No current database selected.".to_string())?;
        let table = database
            .table_mut(table_name)
            .ok_or_else(|| format!("Table '{}' does not exist.", table_name))?;
        table.rename_attributes(&names).map_err(|e| e.to_string())?;
        Ok(Output::message(format!("Table '{}' renamed.", table_name)))
    }

    fn exec_show_databases(&self) -> Output {
        let mut names: Vec<String> = self
            .catalog
            .database_names()
            .into_iter()
            .map(|s| s.to_string())
            .collect();
        names.sort();
        if names.is_empty() {
            Output::Lines(vec!["No databases.".to_string()])
        } else {
            Output::Lines(names)
        }
    }

    fn exec_show_tables(&self) -> Result<Output, String> {
        let database = self
            .catalog
            .current()
            .ok_or_else(|| "No current database selected.".to_string())?;
        let mut names: Vec<String> = database.table_names().into_iter().map(|s| s.to_string()).collect();
        names.sort();
        if names.is_empty() {
            Ok(Output::Lines(vec!["No tables.".to_string()]))
        } else {
            Ok(Output::Lines(names))
        }
    }

    fn exec_show_records(&self, table_name: &str) -> Result<Output, String> {
        let database = self
            .catalog
            .current()
            .ok_or_else(|| "No current database selected.".to_string())?;
        let table = database
            .table(table_name)
            .ok_or_else(|| format!("Table '{}' does not exist.", table_name))?;
        let headers: Vec<String> = table.schema().attributes.iter().map(|a| a.name.clone()).collect();
        let rows: Vec<Vec<Value>> = table.select(|_| true).into_iter().map(|t| t.values().to_vec()).collect();
        Ok(Output::Rows { headers, rows })
    }

    fn exec_input(&mut self, file: &str, output: Option<String>) -> Result<Output, String> {
        let contents =
            std::fs::read_to_string(file).map_err(|e| format!("could not read input file '{}': {}", file, e))?;
        let mut log = Vec::new();
        for line in contents.lines() {
            let line = line.trim().trim_end_matches(';').trim();
            if line.is_empty() {
                continue;
            }
            match self.execute(line) {
                EngineOutcome::Output(out) => log.push(out.to_string()),
                EngineOutcome::Exit { snapshot_saved } => {
                    log.push(format!("EXIT (snapshot saved: {})", snapshot_saved));
                    break;
                }
            }
        }
        if let Some(output_file) = output {
            let joined = log.join("\n");
            std::fs::write(&output_file, joined)
                .map_err(|e| format!("could not write output file '{}': {}", output_file, e))?;
        }
        Ok(Output::Lines(log))
    }

    /// Shared single/multi-table projection used by both `SELECT` and
    /// `LET`'s inner select. Returns the projected column names, their
    /// declared domains (so `LET` can build a schema), and the projected
    /// rows in the table's/join's canonical order.
    fn run_select(&self, select: &SelectStatement) -> Result<(Vec<String>, Vec<Domain>, Vec<Vec<Value>>), String> {
        let database = self
            .catalog
            .current()
            .ok_or_else(|| "No current database selected.".to_string())?;

        if select.tables.len() == 1 {
            let table_name = &select.tables[0];
            let table = database
                .table(table_name)
                .ok_or_else(|| format!("Table '{}' does not exist.", table_name))?;
            let schema = table.schema();
            let condition = select
                .condition
                .as_deref()
                .map(parse_condition)
                .transpose()
                .map_err(|e| e.to_string())?;
            let column_indices: Vec<usize> = select
                .columns
                .iter()
                .map(|name| {
                    schema
                        .attribute_index(name)
                        .ok_or_else(|| format!("Unknown attribute '{}'.", name))
                })
                .collect::<Result<_, _>>()?;
            let domains = column_indices.iter().map(|&i| schema.attributes[i].domain).collect();

            let matched = table.select(|tuple| match &condition {
                Some(cond) => matches(cond, tuple, schema),
                None => true,
            });
            let rows = matched
                .into_iter()
                .map(|tuple| {
                    column_indices
                        .iter()
                        .map(|&i| tuple.get(i).cloned().unwrap_or(Value::Null))
                        .collect()
                })
                .collect();
            Ok((select.columns.clone(), domains, rows))
        } else {
            let mut named_schemas = Vec::new();
            let mut tables = Vec::new();
            for name in &select.tables {
                let table = database
                    .table(name)
                    .ok_or_else(|| format!("Table '{}' does not exist.", name))?;
                named_schemas.push((name.as_str(), table.schema()));
                tables.push(table);
            }
            let combined = Schema::combine(&named_schemas);
            let condition = select
                .condition
                .as_deref()
                .map(parse_condition)
                .transpose()
                .map_err(|e| e.to_string())?;
            let column_indices: Vec<usize> = select
                .columns
                .iter()
                .map(|name| {
                    combined
                        .attribute_index(name)
                        .ok_or_else(|| format!("Unknown attribute '{}'.", name))
                })
                .collect::<Result<_, _>>()?;
            let domains = column_indices
                .iter()
                .map(|&i| combined.attributes[i].domain)
                .collect();

            let mut combos: Vec<Tuple> = vec![Tuple::new(Vec::new())];
            for table in &tables {
                let mut next = Vec::new();
                for existing in &combos {
                    for tuple in table.select(|_| true) {
                        next.push(existing.concat(tuple));
                    }
                }
                combos = next;
            }

            let rows = combos
                .iter()
                .filter(|tuple| match &condition {
                    Some(cond) => matches(cond, tuple, &combined),
                    None => true,
                })
                .map(|tuple| {
                    column_indices
                        .iter()
                        .map(|&i| tuple.get(i).cloned().unwrap_or(Value::Null))
                        .collect()
                })
                .collect();
            Ok((select.columns.clone(), domains, rows))
        }
    }
}

fn describe_table(table: &storage::Table) -> String {
    let parts: Vec<String> = table
        .schema()
        .attributes
        .iter()
        .map(|a| {
            if a.primary_key {
                format!("{} {} PRIMARY KEY", a.name, a.domain.name())
            } else {
                format!("{} {}", a.name, a.domain.name())
            }
        })
        .collect();
    format!("{} ({})", table.name(), parts.join(", "))
}

/// Strips an optional `table.` qualifier, used to match a `LET` key
/// attribute against a (possibly qualified) projected column name.
fn bare(name: &str) -> String {
    name.rsplit('.').next().unwrap_or(name).to_string()
}
