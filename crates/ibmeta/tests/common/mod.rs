//! In-memory stand-in for an engine's system catalog.
#![allow(dead_code)]

use std::collections::BTreeMap;

use ibmeta::{Executor, MetaError, Result, Row, SqlValue};
use regex::Regex;

/// One row of `RDB$RELATION_FIELDS` joined with its `RDB$FIELDS` domain.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub field_type: i16,
    pub precision: Option<i16>,
    pub scale: Option<i16>,
    pub sub_type: Option<i16>,
    pub character_length: Option<i16>,
    pub default_source: Option<String>,
    pub not_null: bool,
}

impl Field {
    pub fn new(name: &str, field_type: i16) -> Self {
        Self {
            name: name.to_string(),
            field_type,
            precision: None,
            scale: None,
            sub_type: None,
            character_length: None,
            default_source: None,
            not_null: false,
        }
    }

    pub fn sub_type(mut self, sub_type: i16) -> Self {
        self.sub_type = Some(sub_type);
        self
    }

    pub fn precision(mut self, precision: i16, scale: i16) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    pub fn char_length(mut self, length: i16) -> Self {
        self.character_length = Some(length);
        self
    }

    pub fn default_source(mut self, source: &str) -> Self {
        self.default_source = Some(source.to_string());
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }

    fn to_row(&self) -> Row {
        Row::new(vec![
            self.name.as_str().into(),
            SqlValue::I16(self.field_type),
            SqlValue::I16(8),
            self.precision.into(),
            self.scale.map(i64::from).into(),
            self.sub_type.into(),
            self.default_source.clone().into(),
            if self.not_null { SqlValue::I16(1) } else { SqlValue::Null },
            self.character_length.into(),
        ])
    }
}

/// One row of `RDB$INDICES` with its segments.
#[derive(Debug, Clone)]
pub struct FakeIndex {
    pub table: String,
    pub name: String,
    pub unique: bool,
    pub inactive: bool,
    pub descending: bool,
    pub segments: Vec<String>,
    pub foreign_key: Option<String>,
}

impl FakeIndex {
    pub fn new(table: &str, name: &str, segments: &[&str]) -> Self {
        Self {
            table: table.to_string(),
            name: name.to_string(),
            unique: false,
            inactive: false,
            descending: false,
            segments: segments.iter().map(|s| s.to_string()).collect(),
            foreign_key: None,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn references(mut self, index: &str) -> Self {
        self.foreign_key = Some(index.to_string());
        self
    }
}

/// One row of `RDB$RELATION_CONSTRAINTS`.
#[derive(Debug, Clone)]
pub struct FakeConstraint {
    pub name: String,
    pub table: String,
    pub kind: String,
    pub index: String,
}

/// Executor answering catalog queries from in-memory tables.
///
/// Table, column, key and index DDL is applied to the in-memory catalog, so
/// a later introspection query sees its effect. Rows are tracked only as a
/// count per table.
#[derive(Default)]
pub struct FakeCatalog {
    pub tables: BTreeMap<String, Vec<Field>>,
    pub indices: Vec<FakeIndex>,
    pub constraints: Vec<FakeConstraint>,
    pub rows: BTreeMap<String, usize>,
    pub log: Vec<String>,
    failures: Vec<String>,
    sequence: usize,
}

fn capture(pattern: &str, sql: &str) -> Option<String> {
    Regex::new(pattern)
        .ok()?
        .captures(sql)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: &str, fields: Vec<Field>) -> Self {
        self.tables.insert(name.to_string(), fields);
        self
    }

    /// Pretend `table` holds `count` rows.
    pub fn with_rows(mut self, table: &str, count: usize) -> Self {
        self.rows.insert(table.to_string(), count);
        self
    }

    pub fn with_index(mut self, index: FakeIndex) -> Self {
        self.indices.push(index);
        self
    }

    pub fn with_constraint(mut self, name: &str, table: &str, kind: &str, index: &str) -> Self {
        self.constraints.push(FakeConstraint {
            name: name.to_string(),
            table: table.to_string(),
            kind: kind.to_string(),
            index: index.to_string(),
        });
        self
    }

    /// Fail every statement containing `fragment`.
    pub fn fail_on(mut self, fragment: &str) -> Self {
        self.failures.push(fragment.to_string());
        self
    }

    /// Statements other than catalog reads.
    pub fn ddl(&self) -> Vec<&str> {
        self.log
            .iter()
            .map(String::as_str)
            .filter(|s| !s.starts_with("SELECT"))
            .collect()
    }

    pub fn field(&self, table: &str, name: &str) -> Option<&Field> {
        self.tables.get(table)?.iter().find(|f| f.name == name)
    }

    fn field_mut(&mut self, table: &str, name: &str) -> Option<&mut Field> {
        self.tables.get_mut(table)?.iter_mut().find(|f| f.name == name)
    }

    fn index(&self, name: &str) -> Option<&FakeIndex> {
        self.indices.iter().find(|i| i.name == name)
    }

    fn record(&mut self, sql: &str) -> Result<()> {
        self.log.push(sql.to_string());
        if self.failures.iter().any(|f| sql.contains(f.as_str())) {
            return Err(MetaError::engine(-607, 335544351, format!("rejected: {}", sql)));
        }
        Ok(())
    }

    fn answer(&self, sql: &str) -> Vec<Row> {
        let text = |s: &str| SqlValue::from(s);

        if sql.contains("FROM RDB$RELATION_FIELDS r") {
            let table = capture(r"r\.RDB\$RELATION_NAME = '([^']*)'", sql).unwrap_or_default();
            let field = capture(r"r\.RDB\$FIELD_NAME = '([^']*)'", sql);
            return self
                .tables
                .get(&table)
                .map(|fields| {
                    fields
                        .iter()
                        .filter(|f| field.as_ref().map_or(true, |name| &f.name == name))
                        .map(Field::to_row)
                        .collect()
                })
                .unwrap_or_default();
        }

        if sql.contains("RDB$INDEX_INACTIVE") {
            let table = capture(r"i\.RDB\$RELATION_NAME = '([^']*)'", sql).unwrap_or_default();
            return self
                .indices
                .iter()
                .filter(|i| i.table == table && !i.name.starts_with("RDB$"))
                .filter(|i| !self.constraints.iter().any(|c| c.index == i.name))
                .map(|i| {
                    Row::new(vec![
                        text(&i.name),
                        SqlValue::I16(i16::from(i.unique)),
                        SqlValue::I16(i16::from(i.inactive)),
                        if i.descending { SqlValue::I16(1) } else { SqlValue::Null },
                    ])
                })
                .collect();
        }

        if sql.contains("FROM RDB$INDEX_SEGMENTS") {
            let index = capture(r"RDB\$INDEX_NAME = '([^']*)'", sql).unwrap_or_default();
            return self
                .index(&index)
                .map(|i| i.segments.iter().map(|s| Row::new(vec![text(s)])).collect())
                .unwrap_or_default();
        }

        if sql.contains("FROM RDB$RELATION_CONSTRAINTS WHERE") {
            let table = capture(r"RDB\$RELATION_NAME = '([^']*)'", sql).unwrap_or_default();
            return self
                .constraints
                .iter()
                .filter(|c| c.table == table)
                .map(|c| Row::new(vec![text(&c.name), text(&c.kind), text(&c.index)]))
                .collect();
        }

        if sql.starts_with("SELECT RDB$FOREIGN_KEY") {
            let index = capture(r"RDB\$INDEX_NAME = '([^']*)'", sql).unwrap_or_default();
            return self
                .index(&index)
                .map(|i| vec![Row::new(vec![i.foreign_key.clone().into()])])
                .unwrap_or_default();
        }

        if sql.starts_with("SELECT RDB$RELATION_NAME FROM RDB$INDICES") {
            let index = capture(r"RDB\$INDEX_NAME = '([^']*)'", sql).unwrap_or_default();
            return self
                .index(&index)
                .map(|i| vec![Row::new(vec![text(&i.table)])])
                .unwrap_or_default();
        }

        if sql.starts_with("SELECT RDB$RELATION_NAME FROM RDB$RELATIONS") {
            let filter = capture(r"RDB\$RELATION_NAME = '([^']*)'", sql);
            return self
                .tables
                .keys()
                .filter(|name| filter.as_ref().map_or(true, |f| f == *name))
                .map(|name| Row::new(vec![text(name)]))
                .collect();
        }

        Vec::new()
    }

    /// Next free `<prefix><n>` name among indices and constraints.
    fn system_name(&mut self, prefix: &str) -> String {
        loop {
            self.sequence += 1;
            let name = format!("{}{}", prefix, self.sequence);
            if self.index(&name).is_none() && !self.constraints.iter().any(|c| c.name == name) {
                return name;
            }
        }
    }

    /// Back a new key constraint with a system index, as the engine does.
    fn add_key(&mut self, table: &str, kind: &str, columns: &str, references: Option<String>) {
        let prefix = if kind == "PRIMARY KEY" { "RDB$PRIMARY" } else { "RDB$FOREIGN" };
        let index_name = self.system_name(prefix);
        let mut index = FakeIndex::new(table, &index_name, &split_list(columns));
        index.unique = references.is_none();
        index.foreign_key = references;
        self.indices.push(index);

        let constraint_name = self.system_name("INTEG_");
        self.constraints.push(FakeConstraint {
            name: constraint_name,
            table: table.to_string(),
            kind: kind.to_string(),
            index: index_name,
        });
    }

    fn primary_index_of(&self, table: &str) -> Option<String> {
        self.constraints
            .iter()
            .find(|c| c.table == table && c.kind == "PRIMARY KEY")
            .map(|c| c.index.clone())
    }

    fn apply(&mut self, sql: &str) {
        let upper = |s: &str| s.to_uppercase();
        let matches = |pattern: &str| Regex::new(pattern).ok().and_then(|re| re.captures(sql));

        if let Some(caps) = matches(r"^CREATE TABLE (\w+) \((.*)\)$") {
            let fields = caps[2].split(", ").filter_map(parse_field).collect();
            self.tables.insert(upper(&caps[1]), fields);
            return;
        }

        if let Some(caps) = matches(r"^INSERT INTO (\w+) SELECT \* FROM (\w+)$") {
            let copied = self.rows.get(&upper(&caps[2])).copied().unwrap_or(0);
            *self.rows.entry(upper(&caps[1])).or_insert(0) += copied;
            return;
        }

        if let Some(caps) = matches(r"^ALTER TABLE (\w+) ADD PRIMARY KEY \(([^)]*)\)$") {
            self.add_key(&upper(&caps[1]), "PRIMARY KEY", &caps[2], None);
            return;
        }

        if let Some(caps) =
            matches(r"^ALTER TABLE (\w+) ADD FOREIGN KEY \(([^)]*)\) REFERENCES (\w+) \(([^)]*)\)$")
        {
            let referenced = self.primary_index_of(&upper(&caps[3]));
            self.add_key(&upper(&caps[1]), "FOREIGN KEY", &caps[2], referenced);
            return;
        }

        if let Some(caps) = matches(r"^CREATE( UNIQUE)?( ASC| DESC)? INDEX (\w+) ON (\w+) \(([^)]*)\)$") {
            let mut index = FakeIndex::new(&upper(&caps[4]), &upper(&caps[3]), &split_list(&caps[5]));
            index.unique = caps.get(1).is_some();
            index.descending = caps.get(2).is_some_and(|m| m.as_str() == " DESC");
            self.indices.push(index);
            return;
        }

        if let Some(caps) = matches(r"^DROP INDEX (\w+)$") {
            let name = upper(&caps[1]);
            self.indices.retain(|i| i.name != name);
            return;
        }

        if let Some(caps) = matches(r"^ALTER INDEX (\w+) (ACTIVE|INACTIVE)$") {
            let name = upper(&caps[1]);
            let inactive = &caps[2] == "INACTIVE";
            self.indices
                .iter_mut()
                .filter(|i| i.name == name)
                .for_each(|i| i.inactive = inactive);
            return;
        }

        if let Some(caps) = matches(r"^ALTER TABLE (\w+) ALTER COLUMN (\w+) TO (\w+)$") {
            let (table, old, new) = (upper(&caps[1]), upper(&caps[2]), upper(&caps[3]));
            if let Some(field) = self.field_mut(&table, &old) {
                field.name = new;
            }
            return;
        }

        if let Some(caps) = matches(r"^ALTER TABLE (\w+) ALTER (\w+) TYPE \w+\((\d+),(\d+)\)$") {
            let (table, column) = (upper(&caps[1]), upper(&caps[2]));
            let precision = caps[3].parse().ok();
            let scale = caps[4].parse().ok();
            if let Some(field) = self.field_mut(&table, &column) {
                field.precision = precision;
                field.scale = scale;
            }
            return;
        }

        if let Some(caps) = matches(r"^ALTER TABLE (\w+) ADD (.*)$") {
            let table = upper(&caps[1]);
            if let (Some(field), Some(fields)) = (parse_field(&caps[2]), self.tables.get_mut(&table)) {
                fields.push(field);
            }
            return;
        }

        if let Some(caps) = matches(r"^ALTER TABLE (\w+) DROP ([\w$]+)$") {
            let (table, column) = (upper(&caps[1]), upper(&caps[2]));
            if let Some(fields) = self.tables.get_mut(&table) {
                fields.retain(|f| f.name != column);
            }
            return;
        }

        if sql.starts_with("UPDATE RDB$RELATION_FIELDS SET RDB$DEFAULT_SOURCE") {
            let shadow = capture(r"RDB\$FIELD_NAME = '([^']*)' AND", sql).unwrap_or_default();
            let target = capture(r"\) WHERE RDB\$FIELD_NAME = '([^']*)'", sql).unwrap_or_default();
            let table = capture(r"RDB\$RELATION_NAME = '([^']*)'$", sql).unwrap_or_default();
            let source = self.field(&table, &shadow).and_then(|f| f.default_source.clone());
            if let Some(field) = self.field_mut(&table, &target) {
                field.default_source = source;
            }
            return;
        }

        if sql.starts_with("UPDATE RDB$RELATION_FIELDS SET RDB$NULL_FLAG") {
            let not_null = sql.contains("RDB$NULL_FLAG = 1");
            let table = capture(r"RDB\$RELATION_NAME = '([^']*)'", sql).unwrap_or_default();
            let column = capture(r"RDB\$FIELD_NAME = '([^']*)'", sql).unwrap_or_default();
            if let Some(field) = self.field_mut(&table, &column) {
                field.not_null = not_null;
            }
            return;
        }

        if let Some(table) = capture(r"^DROP TABLE (\w+)$", sql) {
            self.tables.remove(&table);
            self.rows.remove(&table);
            self.constraints.retain(|c| c.table != table);
            self.indices.retain(|i| i.table != table);
        }
    }
}

fn split_list(list: &str) -> Vec<&str> {
    list.split(", ").map(str::trim).collect()
}

/// Parse one rendered column definition back into a catalog field.
fn parse_field(definition: &str) -> Option<Field> {
    let re = Regex::new(
        r"^([\w$]+) (BLOB SUB_TYPE (\d+)|(CHAR|VARCHAR)\((\d+)\)|(DECIMAL|NUMERIC)\((\d+),(\d+)\)|DOUBLE PRECISION|\w+)( DEFAULT .*?)?( NOT NULL)?$",
    )
    .ok()?;
    let caps = re.captures(definition)?;
    let name = &caps[1];

    let mut field = if let Some(sub_type) = caps.get(3) {
        Field::new(name, 261).sub_type(sub_type.as_str().parse().ok()?)
    } else if let Some(kind) = caps.get(4) {
        let code = if kind.as_str() == "CHAR" { 14 } else { 37 };
        Field::new(name, code).char_length(caps[5].parse().ok()?)
    } else if let Some(kind) = caps.get(6) {
        let sub_type = if kind.as_str() == "NUMERIC" { 1 } else { 2 };
        Field::new(name, 16)
            .sub_type(sub_type)
            .precision(caps[7].parse().ok()?, caps[8].parse().ok()?)
    } else {
        let code = match &caps[2] {
            "BOOLEAN" => 17,
            "DATE" => 12,
            "TIME" => 13,
            "TIMESTAMP" => 35,
            "INTEGER" => 8,
            "SMALLINT" => 7,
            "BIGINT" => 16,
            "DOUBLE PRECISION" => 27,
            "FLOAT" => 10,
            _ => return None,
        };
        Field::new(name, code)
    };

    field.default_source = caps
        .get(9)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| s != "DEFAULT NULL");
    field.not_null = caps.get(10).is_some();
    Some(field)
}

impl Executor for FakeCatalog {
    fn execute(&mut self, sql: &str) -> Result<()> {
        self.record(sql)?;
        self.apply(sql);
        Ok(())
    }

    fn query(&mut self, sql: &str, handler: &mut dyn FnMut(&Row) -> Result<()>) -> Result<()> {
        self.record(sql)?;
        for row in self.answer(sql) {
            handler(&row)?;
        }
        Ok(())
    }

    fn execute_for(&mut self, sql: &str, _params: &[SqlValue]) -> Result<u64> {
        self.record(sql)?;
        Ok(0)
    }
}

/// The MTEST table: booleans, blobs, chars, dates and decimals with and
/// without defaults.
pub fn mtest() -> Vec<Field> {
    vec![
        Field::new("ID", 8).not_null(),
        Field::new("BOOL1", 17).default_source("default false"),
        Field::new("BOOL2", 17),
        Field::new("BOOL3", 17).default_source("default true"),
        Field::new("BOOL4", 17).default_source("default true").not_null(),
        Field::new("BLOB1", 261).sub_type(1).not_null(),
        Field::new("BLOB2", 261).sub_type(1),
        Field::new("BLOB3", 261).sub_type(0),
        Field::new("CHAR1", 14).char_length(10).default_source("default 'fred'"),
        Field::new("CHAR2", 14).char_length(10).default_source("default 'fred'").not_null(),
        Field::new("CHAR3", 14).char_length(10),
        Field::new("CHAR4", 14).char_length(20).default_source("default 'wil''ma'"),
        Field::new("DATE1", 12).default_source("default current_date"),
        Field::new("DATE2", 12).not_null(),
        Field::new("DATE3", 12).default_source("default current_date").not_null(),
        Field::new("DECIMAL1", 16).sub_type(2).precision(18, 5).default_source("default 1.345"),
        Field::new("DECIMAL2", 16)
            .sub_type(2)
            .precision(15, 5)
            .default_source("default 20.22")
            .not_null(),
        Field::new("DECIMAL3", 16).sub_type(2).precision(12, 6).not_null(),
    ]
}

/// MTEST plus PK_TABLE and FK_TABLE, where FK_TABLE.FK_ID references PK_TABLE.ID.
pub fn meta_database() -> FakeCatalog {
    FakeCatalog::new()
        .with_table("MTEST", mtest())
        .with_table("PK_TABLE", vec![Field::new("ID", 8).not_null()])
        .with_table(
            "FK_TABLE",
            vec![Field::new("ID", 8).not_null(), Field::new("FK_ID", 8)],
        )
        .with_index(FakeIndex::new("PK_TABLE", "RDB$PRIMARY1", &["ID"]).unique())
        .with_index(FakeIndex::new("FK_TABLE", "RDB$PRIMARY2", &["ID"]).unique())
        .with_index(FakeIndex::new("FK_TABLE", "RDB$FOREIGN3", &["FK_ID"]).references("RDB$PRIMARY1"))
        .with_index(FakeIndex::new("FK_TABLE", "IDX_FK_TABLE_FK_ID", &["FK_ID"]))
        .with_index(FakeIndex::new("MTEST", "IDX_MTEST_CHAR", &["CHAR1", "CHAR2"]).unique())
        .with_constraint("INTEG_1", "PK_TABLE", "PRIMARY KEY", "RDB$PRIMARY1")
        .with_constraint("INTEG_2", "FK_TABLE", "PRIMARY KEY", "RDB$PRIMARY2")
        .with_constraint("INTEG_3", "FK_TABLE", "FOREIGN KEY", "RDB$FOREIGN3")
        .with_rows("PK_TABLE", 2)
        .with_rows("FK_TABLE", 3)
}
