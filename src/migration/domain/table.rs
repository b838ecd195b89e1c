//! Minimal table-definition builder for schema migrations.
//!
//! A [`TableDefinition`] carries exactly what a create-if-absent step needs:
//! ordered columns with type, nullability and default, plus primary-key,
//! unique and foreign-key constraints. Definitions are rendered to DDL by the
//! database adapters and compared against the live catalog through
//! [`TableShape`].

use super::MigrationDomainError;
use std::collections::HashSet;

/// Column data types supported by the schema builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// 128-bit UUID.
    Uuid,
    /// Bounded character string.
    Varchar(u32),
    /// Binary JSON document.
    Jsonb,
    /// 64-bit signed integer.
    BigInt,
    /// Unbounded text.
    Text,
    /// Timestamp with time zone.
    TimestampTz,
}

impl ColumnType {
    /// Returns the DDL spelling of the type.
    #[must_use]
    pub fn ddl(self) -> String {
        match self {
            Self::Uuid => "UUID".to_owned(),
            Self::Varchar(length) => format!("VARCHAR({length})"),
            Self::Jsonb => "JSONB".to_owned(),
            Self::BigInt => "BIGINT".to_owned(),
            Self::Text => "TEXT".to_owned(),
            Self::TimestampTz => "TIMESTAMPTZ".to_owned(),
        }
    }

    /// Returns the type name reported by `information_schema.columns`.
    #[must_use]
    pub const fn catalog_name(self) -> &'static str {
        match self {
            Self::Uuid => "uuid",
            Self::Varchar(_) => "character varying",
            Self::Jsonb => "jsonb",
            Self::BigInt => "bigint",
            Self::Text => "text",
            Self::TimestampTz => "timestamp with time zone",
        }
    }

    /// Returns the declared maximum character length, if bounded.
    #[must_use]
    pub const fn max_length(self) -> Option<u32> {
        match self {
            Self::Varchar(length) => Some(length),
            _ => None,
        }
    }
}

/// Column default expressions supported by the schema builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnDefault {
    /// Current transaction timestamp.
    CurrentTimestamp,
}

impl ColumnDefault {
    /// Returns the DDL expression for the default.
    #[must_use]
    pub const fn ddl(self) -> &'static str {
        match self {
            Self::CurrentTimestamp => "now()",
        }
    }
}

/// A single column of a table definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    name: String,
    column_type: ColumnType,
    nullable: bool,
    default: Option<ColumnDefault>,
}

impl ColumnDefinition {
    /// Creates a `NOT NULL` column.
    #[must_use]
    pub fn required(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: false,
            default: None,
        }
    }

    /// Creates a nullable column.
    #[must_use]
    pub fn optional(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            nullable: true,
            ..Self::required(name, column_type)
        }
    }

    /// Sets the column default.
    #[must_use]
    pub const fn with_default(mut self, default: ColumnDefault) -> Self {
        self.default = Some(default);
        self
    }

    /// Returns the column name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the column type.
    #[must_use]
    pub const fn column_type(&self) -> ColumnType {
        self.column_type
    }

    /// Returns whether the column accepts `NULL`.
    #[must_use]
    pub const fn is_nullable(&self) -> bool {
        self.nullable
    }

    /// Returns the column default, if any.
    #[must_use]
    pub const fn default(&self) -> Option<ColumnDefault> {
        self.default
    }
}

/// Foreign key from local columns to columns of another table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKey {
    columns: Vec<String>,
    referenced_table: String,
    referenced_columns: Vec<String>,
}

impl ForeignKey {
    /// Returns the referencing columns.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the referenced table name.
    #[must_use]
    pub fn referenced_table(&self) -> &str {
        &self.referenced_table
    }

    /// Returns the referenced columns.
    #[must_use]
    pub fn referenced_columns(&self) -> &[String] {
        &self.referenced_columns
    }
}

/// Table-level constraints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableConstraint {
    /// Primary key over the listed columns.
    PrimaryKey(Vec<String>),
    /// Uniqueness over the listed columns.
    Unique(Vec<String>),
    /// Foreign key into another table.
    ForeignKey(ForeignKey),
}

/// Validated definition of a table created by a migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    name: String,
    columns: Vec<ColumnDefinition>,
    constraints: Vec<TableConstraint>,
}

impl TableDefinition {
    /// Starts a definition for the named table.
    #[must_use]
    pub fn builder(name: impl Into<String>) -> TableDefinitionBuilder {
        TableDefinitionBuilder {
            name: name.into(),
            columns: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Returns the table name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the columns in declaration order.
    #[must_use]
    pub fn columns(&self) -> &[ColumnDefinition] {
        &self.columns
    }

    /// Returns the constraints in declaration order.
    #[must_use]
    pub fn constraints(&self) -> &[TableConstraint] {
        &self.constraints
    }

    /// Returns the named column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|column| column.name == name)
    }

    /// Returns the primary-key columns, if the table declares one.
    #[must_use]
    pub fn primary_key(&self) -> Option<&[String]> {
        self.constraints.iter().find_map(|constraint| match constraint {
            TableConstraint::PrimaryKey(columns) => Some(columns.as_slice()),
            _ => None,
        })
    }

    /// Returns the declared foreign keys.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &ForeignKey> {
        self.constraints.iter().filter_map(|constraint| match constraint {
            TableConstraint::ForeignKey(foreign_key) => Some(foreign_key),
            _ => None,
        })
    }

    /// Returns the shape a freshly created table reports in the catalog.
    #[must_use]
    pub fn shape(&self) -> TableShape {
        TableShape {
            columns: self
                .columns
                .iter()
                .map(|column| ColumnShape {
                    name: column.name.clone(),
                    data_type: column.column_type.catalog_name().to_owned(),
                    max_length: column.column_type.max_length(),
                    nullable: column.nullable,
                    has_default: column.default.is_some(),
                })
                .collect(),
            primary_key: self.primary_key().map(<[String]>::to_vec).unwrap_or_default(),
            unique: self
                .constraints
                .iter()
                .filter_map(|constraint| match constraint {
                    TableConstraint::Unique(columns) => Some(columns.clone()),
                    _ => None,
                })
                .collect(),
            foreign_keys: self
                .foreign_keys()
                .map(|foreign_key| ForeignKeyShape {
                    columns: foreign_key.columns.clone(),
                    referenced_table: foreign_key.referenced_table.clone(),
                    referenced_columns: foreign_key.referenced_columns.clone(),
                })
                .collect(),
        }
    }

    /// Checks that an existing table can stand in for this definition.
    ///
    /// Every declared column must be present with the same type and
    /// nullability, and declared defaults must exist. The primary key must
    /// list the same columns in the same order, and every declared unique
    /// and foreign-key constraint must be present. Extra columns and
    /// constraints in the live table are accepted.
    ///
    /// # Errors
    ///
    /// Returns a description of the first incompatibility found.
    pub fn check_compatible(&self, live: &TableShape) -> Result<(), String> {
        for expected in &self.columns {
            let Some(actual) = live.column(&expected.name) else {
                return Err(format!("missing column '{}'", expected.name));
            };
            let expected_type = expected.column_type;
            if actual.data_type != expected_type.catalog_name()
                || actual.max_length != expected_type.max_length()
            {
                return Err(format!(
                    "column '{}' has type {}, expected {}",
                    expected.name,
                    actual.describe_type(),
                    expected_type.ddl()
                ));
            }
            if actual.nullable != expected.nullable {
                return Err(format!(
                    "column '{}' nullability is {}, expected {}",
                    expected.name,
                    nullability(actual.nullable),
                    nullability(expected.nullable)
                ));
            }
            if let Some(default) = expected.default {
                if !actual.has_default {
                    return Err(format!(
                        "column '{}' has no default, expected DEFAULT {}",
                        expected.name,
                        default.ddl()
                    ));
                }
            }
        }

        let expected_key = self.primary_key().unwrap_or_default();
        if live.primary_key.as_slice() != expected_key {
            return Err(format!(
                "primary key is ({}), expected ({})",
                live.primary_key.join(", "),
                expected_key.join(", ")
            ));
        }

        for constraint in &self.constraints {
            match constraint {
                TableConstraint::PrimaryKey(_) => {}
                TableConstraint::Unique(columns) => {
                    if !live.unique.iter().any(|live_columns| live_columns == columns) {
                        return Err(format!(
                            "missing unique constraint on ({})",
                            columns.join(", ")
                        ));
                    }
                }
                TableConstraint::ForeignKey(foreign_key) => {
                    if !live.foreign_keys.iter().any(|live_key| live_key.matches(foreign_key)) {
                        return Err(format!(
                            "missing foreign key ({}) referencing {}({})",
                            foreign_key.columns.join(", "),
                            foreign_key.referenced_table,
                            foreign_key.referenced_columns.join(", ")
                        ));
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns a canonical textual form used for checksums.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let columns = self.columns.iter().map(|column| {
            format!(
                "column {} {} {} {}",
                column.name,
                column.column_type.ddl(),
                nullability(column.nullable),
                column.default.map_or("-", ColumnDefault::ddl)
            )
        });
        let constraints = self.constraints.iter().map(|constraint| match constraint {
            TableConstraint::PrimaryKey(columns) => format!("primary key {}", columns.join(",")),
            TableConstraint::Unique(columns) => format!("unique {}", columns.join(",")),
            TableConstraint::ForeignKey(foreign_key) => format!(
                "foreign key {} -> {}({})",
                foreign_key.columns.join(","),
                foreign_key.referenced_table,
                foreign_key.referenced_columns.join(",")
            ),
        });

        std::iter::once(format!("table {}", self.name))
            .chain(columns)
            .chain(constraints)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

const fn nullability(nullable: bool) -> &'static str {
    if nullable { "NULL" } else { "NOT NULL" }
}

/// Builder for [`TableDefinition`].
#[derive(Debug, Clone)]
pub struct TableDefinitionBuilder {
    name: String,
    columns: Vec<ColumnDefinition>,
    constraints: Vec<TableConstraint>,
}

impl TableDefinitionBuilder {
    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Declares the primary key.
    #[must_use]
    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints
            .push(TableConstraint::PrimaryKey(collect_names(columns)));
        self
    }

    /// Declares a uniqueness constraint.
    #[must_use]
    pub fn unique<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.constraints
            .push(TableConstraint::Unique(collect_names(columns)));
        self
    }

    /// Declares a foreign key into `referenced_table`.
    #[must_use]
    pub fn foreign_key<I, S, J, T>(
        mut self,
        columns: I,
        referenced_table: impl Into<String>,
        referenced_columns: J,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.constraints
            .push(TableConstraint::ForeignKey(ForeignKey {
                columns: collect_names(columns),
                referenced_table: referenced_table.into(),
                referenced_columns: collect_names(referenced_columns),
            }));
        self
    }

    /// Validates and returns the definition.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationDomainError::InvalidTableDefinition`] when the table
    /// has no name or columns, repeats a column name, declares more than one
    /// primary key, refers to an unknown column from a constraint, declares a
    /// nullable primary-key column, or declares a foreign key whose column
    /// lists differ in length.
    pub fn build(self) -> Result<TableDefinition, MigrationDomainError> {
        let invalid = |reason: String| MigrationDomainError::InvalidTableDefinition {
            table: self.name.clone(),
            reason,
        };

        if self.name.trim().is_empty() {
            return Err(invalid("table name must not be empty".to_owned()));
        }
        if self.columns.is_empty() {
            return Err(invalid("table must declare at least one column".to_owned()));
        }

        let mut seen = HashSet::new();
        for column in &self.columns {
            if column.name.trim().is_empty() {
                return Err(invalid("column name must not be empty".to_owned()));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(invalid(format!("duplicate column '{}'", column.name)));
            }
        }

        let mut primary_keys = 0_usize;
        for constraint in &self.constraints {
            let columns = match constraint {
                TableConstraint::PrimaryKey(columns) => {
                    primary_keys += 1;
                    if let Some(nullable) = columns.iter().find(|name| {
                        self.columns
                            .iter()
                            .any(|column| &column.name == *name && column.nullable)
                    }) {
                        return Err(invalid(format!(
                            "primary key column '{nullable}' must be NOT NULL"
                        )));
                    }
                    columns
                }
                TableConstraint::Unique(columns) => columns,
                TableConstraint::ForeignKey(foreign_key) => {
                    if foreign_key.columns.len() != foreign_key.referenced_columns.len() {
                        return Err(invalid(format!(
                            "foreign key into '{}' pairs {} columns with {} referenced columns",
                            foreign_key.referenced_table,
                            foreign_key.columns.len(),
                            foreign_key.referenced_columns.len()
                        )));
                    }
                    if foreign_key.referenced_table.trim().is_empty() {
                        return Err(invalid(
                            "foreign key must name a referenced table".to_owned(),
                        ));
                    }
                    &foreign_key.columns
                }
            };
            if columns.is_empty() {
                return Err(invalid("constraint must list at least one column".to_owned()));
            }
            if let Some(unknown) = columns.iter().find(|name| !seen.contains(name.as_str())) {
                return Err(invalid(format!(
                    "constraint refers to unknown column '{unknown}'"
                )));
            }
        }
        if primary_keys > 1 {
            return Err(invalid("table declares more than one primary key".to_owned()));
        }

        Ok(TableDefinition {
            name: self.name,
            columns: self.columns,
            constraints: self.constraints,
        })
    }
}

fn collect_names<I, S>(columns: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    columns.into_iter().map(Into::into).collect()
}

/// Column as reported by a live catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnShape {
    /// Column name.
    pub name: String,
    /// Catalog type name, for example `character varying`.
    pub data_type: String,
    /// Maximum character length for bounded string types.
    pub max_length: Option<u32>,
    /// Whether the column accepts `NULL`.
    pub nullable: bool,
    /// Whether the column has a default expression.
    pub has_default: bool,
}

impl ColumnShape {
    fn describe_type(&self) -> String {
        match self.max_length {
            Some(length) => format!("{}({length})", self.data_type),
            None => self.data_type.clone(),
        }
    }
}

/// Table as reported by a live catalog.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableShape {
    /// Columns in ordinal order.
    pub columns: Vec<ColumnShape>,
    /// Primary-key columns in key order; empty when the table has none.
    pub primary_key: Vec<String>,
    /// Columns of each unique constraint, in key order.
    pub unique: Vec<Vec<String>>,
    /// Foreign keys declared on the table.
    pub foreign_keys: Vec<ForeignKeyShape>,
}

impl TableShape {
    /// Returns the named column.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&ColumnShape> {
        self.columns.iter().find(|column| column.name == name)
    }
}

/// Foreign key as reported by a live catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyShape {
    /// Referencing columns in key order.
    pub columns: Vec<String>,
    /// Referenced table name.
    pub referenced_table: String,
    /// Referenced columns, paired with `columns`.
    pub referenced_columns: Vec<String>,
}

impl ForeignKeyShape {
    fn matches(&self, declared: &ForeignKey) -> bool {
        self.columns == declared.columns
            && self.referenced_table == declared.referenced_table
            && self.referenced_columns == declared.referenced_columns
    }
}
