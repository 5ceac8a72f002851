//! Plugin registry
//!
//! The static map from table name to table definition, handed to whatever
//! drives queries (the CLI harness here, a host engine in production).

use crate::plugin::table::Table;
use crate::tables;
use std::collections::HashMap;
use std::sync::Arc;

/// The plugin: a name-keyed registry of table definitions
pub struct Plugin {
    pub name: &'static str,
    tables: HashMap<&'static str, Arc<Table>>,
}

impl Plugin {
    pub fn table(&self, name: &str) -> Option<&Arc<Table>> {
        self.tables.get(name)
    }

    /// Table names in sorted order (schema discovery)
    pub fn table_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.tables.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn tables(&self) -> impl Iterator<Item = &Arc<Table>> {
        self.tables.values()
    }
}

/// Build the plugin with every Scalingo table registered
pub fn plugin() -> Plugin {
    let defs = vec![
        tables::addon::table(),
        tables::app::table(),
        tables::app_event::table(),
        tables::collaborator::table(),
        tables::container::table(),
        tables::cron::table(),
        tables::database::table(),
        tables::database_type_version::table(),
        tables::deployment::table(),
        tables::domain::table(),
        tables::environment::table(),
        tables::key::table(),
        tables::log_drain::table(),
        tables::log_drain_addon::table(),
        tables::region::table(),
        tables::scm_repo_link::table(),
        tables::token::table(),
        tables::user_event::table(),
    ];

    let mut tables = HashMap::with_capacity(defs.len());
    for def in defs {
        tables.insert(def.name, Arc::new(def));
    }

    Plugin {
        name: "scalingo-tables",
        tables,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plugin_registers_all_tables() {
        let plugin = plugin();
        assert_eq!(plugin.name, "scalingo-tables");
        assert_eq!(plugin.table_names().len(), 18);
        assert!(plugin.table("scalingo_app").is_some());
        assert!(plugin.table("scalingo_user_event").is_some());
        assert!(plugin.table("nope").is_none());
    }

    #[test]
    fn test_every_table_has_an_operation_and_columns() {
        for table in plugin().tables() {
            assert!(
                table.list.is_some() || table.get.is_some(),
                "{} has no operation",
                table.name
            );
            assert!(!table.columns.is_empty(), "{} has no columns", table.name);
            assert!(!table.description.is_empty(), "{} has no description", table.name);
        }
    }

    #[test]
    fn test_app_scoped_tables_require_app_name() {
        let plugin = plugin();
        for name in ["scalingo_environment", "scalingo_addon", "scalingo_deployment"] {
            let table = plugin.table(name).unwrap();
            let list = table.list.as_ref().unwrap();
            assert!(
                list.key_columns.iter().any(|k| k.name == "app_name" && k.required),
                "{name} should require app_name"
            );
        }
    }
}
