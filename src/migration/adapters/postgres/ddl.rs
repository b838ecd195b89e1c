//! `PostgreSQL` DDL rendering for table definitions.

use crate::migration::domain::{TableConstraint, TableDefinition};

/// Renders a `CREATE TABLE IF NOT EXISTS` statement for `table`.
///
/// Identifiers are always double-quoted.
#[must_use]
pub fn render_create_table(table: &TableDefinition) -> String {
    let columns = table.columns().iter().map(|column| {
        let mut line = format!(
            "{} {}",
            quote_identifier(column.name()),
            column.column_type().ddl()
        );
        if !column.is_nullable() {
            line.push_str(" NOT NULL");
        }
        if let Some(default) = column.default() {
            line.push_str(" DEFAULT ");
            line.push_str(default.ddl());
        }
        line
    });

    let constraints = table.constraints().iter().map(|constraint| match constraint {
        TableConstraint::PrimaryKey(columns) => format!("PRIMARY KEY ({})", quote_list(columns)),
        TableConstraint::Unique(columns) => format!("UNIQUE ({})", quote_list(columns)),
        TableConstraint::ForeignKey(foreign_key) => format!(
            "FOREIGN KEY ({}) REFERENCES {} ({})",
            quote_list(foreign_key.columns()),
            quote_identifier(foreign_key.referenced_table()),
            quote_list(foreign_key.referenced_columns())
        ),
    });

    let body = columns
        .chain(constraints)
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join(",\n");
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{body}\n)",
        quote_identifier(table.name())
    )
}

/// Double-quotes an identifier, escaping embedded quotes.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_list(names: &[String]) -> String {
    names
        .iter()
        .map(|name| quote_identifier(name))
        .collect::<Vec<_>>()
        .join(", ")
}
