use log::{debug, error};
use rusqlite::ffi;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection, OptionalExtension, Row, ToSql};

use crate::error::{CatalogError, CatalogResult};

/// A column a caller may filter or sort on.
pub trait SortField: Copy {
    fn column(self) -> &'static str;

    /// Text columns sort case-insensitively; everything else sorts with NULLs
    /// after every concrete value.
    fn is_text(self) -> bool;

    /// `ORDER BY` clause for this field. Ties always break on `id`.
    fn order_clause(self) -> String {
        let column = self.column();
        if self.is_text() {
            format!("{column} COLLATE NOCASE, {column}, id")
        } else {
            format!("{column} IS NULL, {column}, id")
        }
    }
}

/// A persisted row type. Implemented once per table so the store can run the
/// same primitives against both entities.
pub trait Record: Sized {
    type Field: SortField;

    /// Singular name used in error messages ("Artist", "Song").
    const KIND: &'static str;
    const TABLE: &'static str;
    /// Column list in the order `from_row` reads them.
    const COLUMNS: &'static str;
    /// Parameterised update with the id bound last.
    const UPDATE_SQL: &'static str;

    fn id(&self) -> i64;

    /// Human-facing key for messages, normally the natural key.
    fn label(&self) -> String;

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;

    /// Values bound to `UPDATE_SQL`, id last.
    fn update_values(&self) -> Vec<Value>;
}

/// Unsaved field values for a `Record`.
pub trait Draft {
    type Output: Record;

    const INSERT_SQL: &'static str;

    fn values(&self) -> Vec<Value>;

    fn label(&self) -> String;

    fn into_record(self, id: i64) -> Self::Output;

    /// Error reported when a foreign key on this draft points nowhere.
    fn missing_reference(&self) -> CatalogError {
        CatalogError::Validation(format!(
            "{} {} references a record that does not exist",
            <Self::Output as Record>::KIND,
            self.label()
        ))
    }
}

/// Owns the SQLite connection for the life of the process. Every primitive is
/// a single statement, so each call is independently retryable.
pub struct Store {
    pub(super) conn: Connection,
}

impl Store {
    /// Insert a new row and return it hydrated with the assigned id.
    pub fn insert<D: Draft>(&self, draft: D) -> CatalogResult<D::Output> {
        let kind = <D::Output as Record>::KIND;
        let result = self
            .conn
            .execute(D::INSERT_SQL, params_from_iter(draft.values()));

        if let Err(err) = result {
            return Err(match constraint_kind(&err) {
                Some(Constraint::Unique) => CatalogError::duplicate(kind, draft.label()),
                Some(Constraint::ForeignKey) => draft.missing_reference(),
                None => storage_failure("insert", kind, err),
            });
        }

        let id = self.conn.last_insert_rowid();
        debug!("event=store_insert module=db kind={kind} id={id}");
        Ok(draft.into_record(id))
    }

    /// First row whose `field` equals `value`, lowest id first.
    pub fn find_by<R: Record>(
        &self,
        field: R::Field,
        value: &dyn ToSql,
    ) -> CatalogResult<Option<R>> {
        self.find_where::<R>(&[(field, value)])
    }

    /// First row matching every `(field, value)` pair, lowest id first.
    pub fn find_where<R: Record>(
        &self,
        filters: &[(R::Field, &dyn ToSql)],
    ) -> CatalogResult<Option<R>> {
        let sql = format!(
            "SELECT {} FROM {}{} ORDER BY id LIMIT 1",
            R::COLUMNS,
            R::TABLE,
            where_clause::<R>(filters)
        );
        self.conn
            .query_row(&sql, params_from_iter(filters.iter().map(|(_, v)| *v)), |row| {
                R::from_row(row)
            })
            .optional()
            .map_err(|err| storage_failure("find", R::KIND, err))
    }

    /// Persist every mutable field of an existing row.
    pub fn update<R: Record>(&self, record: &R) -> CatalogResult<()> {
        let updated = self
            .conn
            .execute(R::UPDATE_SQL, params_from_iter(record.update_values()))
            .map_err(|err| match constraint_kind(&err) {
                Some(Constraint::Unique) => CatalogError::duplicate(R::KIND, record.label()),
                _ => storage_failure("update", R::KIND, err),
            })?;

        if updated == 0 {
            Err(CatalogError::not_found(R::KIND, format!("#{}", record.id())))
        } else {
            debug!(
                "event=store_update module=db kind={} id={}",
                R::KIND,
                record.id()
            );
            Ok(())
        }
    }

    /// Remove a row by identity. Dependent rows follow the schema's
    /// `ON DELETE` rules.
    pub fn delete<R: Record>(&self, record: &R) -> CatalogResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
        let deleted = self
            .conn
            .execute(&sql, [record.id()])
            .map_err(|err| storage_failure("delete", R::KIND, err))?;

        if deleted == 0 {
            Err(CatalogError::not_found(R::KIND, format!("#{}", record.id())))
        } else {
            debug!(
                "event=store_delete module=db kind={} id={}",
                R::KIND,
                record.id()
            );
            Ok(())
        }
    }

    /// Every row of a table sorted ascending by `sort`.
    pub fn list_ordered<R: Record>(&self, sort: R::Field) -> CatalogResult<Vec<R>> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            R::COLUMNS,
            R::TABLE,
            sort.order_clause()
        );
        self.collect::<R>(&sql, &[])
    }

    /// Rows whose `field` equals `value`, in id order.
    pub fn list_where<R: Record>(
        &self,
        field: R::Field,
        value: &dyn ToSql,
    ) -> CatalogResult<Vec<R>> {
        let sql = format!(
            "SELECT {} FROM {}{} ORDER BY id",
            R::COLUMNS,
            R::TABLE,
            where_clause::<R>(&[(field, value)])
        );
        self.collect::<R>(&sql, &[value])
    }

    pub fn count_where<R: Record>(
        &self,
        field: R::Field,
        value: &dyn ToSql,
    ) -> CatalogResult<usize> {
        let sql = format!(
            "SELECT COUNT(*) FROM {}{}",
            R::TABLE,
            where_clause::<R>(&[(field, value)])
        );
        let count: i64 = self
            .conn
            .query_row(&sql, [value], |row| row.get(0))
            .map_err(|err| storage_failure("count", R::KIND, err))?;
        Ok(count as usize)
    }

    fn collect<R: Record>(&self, sql: &str, values: &[&dyn ToSql]) -> CatalogResult<Vec<R>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|err| storage_failure("prepare", R::KIND, err))?;

        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| R::from_row(row))
            .map_err(|err| storage_failure("list", R::KIND, err))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| storage_failure("list", R::KIND, err))?;

        Ok(rows)
    }
}

fn where_clause<R: Record>(filters: &[(R::Field, &dyn ToSql)]) -> String {
    if filters.is_empty() {
        return String::new();
    }
    let conditions: Vec<String> = filters
        .iter()
        .enumerate()
        .map(|(idx, (field, _))| format!("{} = ?{}", field.column(), idx + 1))
        .collect();
    format!(" WHERE {}", conditions.join(" AND "))
}

enum Constraint {
    Unique,
    ForeignKey,
}

/// Classify SQLite constraint failures the catalog reports as domain
/// outcomes. Anything else is a storage failure.
fn constraint_kind(err: &rusqlite::Error) -> Option<Constraint> {
    let code = err.sqlite_error()?.extended_code;
    if code == ffi::SQLITE_CONSTRAINT_UNIQUE || code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY {
        Some(Constraint::Unique)
    } else if code == ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
        Some(Constraint::ForeignKey)
    } else {
        None
    }
}

fn storage_failure(op: &str, kind: &str, err: rusqlite::Error) -> CatalogError {
    error!("event=store_{op} module=db status=error kind={kind} error={err}");
    CatalogError::StorageUnavailable(err)
}
