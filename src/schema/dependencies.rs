use super::tables::{get_table, ALL_TABLES};
use super::types::TableSchema;
use std::collections::{HashMap, HashSet, VecDeque};

/// Resolves table dependencies for filtering
pub struct DependencyResolver {
    /// Map of table name -> tables it depends on
    deps: HashMap<&'static str, HashSet<&'static str>>,
}

impl DependencyResolver {
    pub fn new() -> Self {
        let deps = ALL_TABLES
            .iter()
            .map(|table| (table.name, table.dependencies()))
            .collect();

        Self { deps }
    }

    /// Given a set of requested tables, resolve all required dependencies.
    /// Returns tables in dependency order (parents before children).
    pub fn resolve_includes(&self, requested: &[&str]) -> Result<Vec<&'static TableSchema>, String> {
        let mut included: HashSet<&str> = HashSet::new();
        let mut queue: VecDeque<&str> = requested.iter().copied().collect();

        while let Some(table_name) = queue.pop_front() {
            if included.contains(table_name) {
                continue;
            }

            if get_table(table_name).is_none() {
                return Err(format!("Unknown table: {}", table_name));
            }

            included.insert(table_name);

            if let Some(table_deps) = self.deps.get(table_name) {
                for dep in table_deps {
                    if !included.contains(dep) {
                        queue.push_back(dep);
                    }
                }
            }
        }

        Ok(self.in_order(&included))
    }

    /// Given a set of tables to exclude, return the remaining tables in
    /// order. Tables whose FK parent is excluded are dropped as well.
    pub fn resolve_excludes(&self, excluded: &[&str]) -> Result<Vec<&'static TableSchema>, String> {
        for name in excluded {
            if get_table(name).is_none() {
                return Err(format!("Unknown table: {}", name));
            }
        }

        let excluded_set: HashSet<&str> = excluded.iter().copied().collect();
        let included: HashSet<&str> = ALL_TABLES
            .iter()
            .filter(|table| !excluded_set.contains(table.name))
            .filter(|table| {
                !table
                    .foreign_keys
                    .iter()
                    .any(|fk| excluded_set.contains(fk.references_table))
            })
            .map(|table| table.name)
            .collect();

        Ok(self.in_order(&included))
    }

    /// Return all tables in dependency order
    pub fn all_tables_ordered(&self) -> Vec<&'static TableSchema> {
        ALL_TABLES.to_vec()
    }

    /// `ALL_TABLES` is declared parents-first, so filtering it keeps that order
    fn in_order(&self, included: &HashSet<&str>) -> Vec<&'static TableSchema> {
        ALL_TABLES
            .iter()
            .copied()
            .filter(|table| included.contains(table.name))
            .collect()
    }
}

impl Default for DependencyResolver {
    fn default() -> Self {
        Self::new()
    }
}
