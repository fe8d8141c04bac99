//! Item repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update/search APIs over the `items` table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Identifiers come from SQLite `AUTOINCREMENT` and are never reused.
//! - Write paths call `validate()` before SQL mutations; read paths apply the
//!   same rule and reject invalid persisted state instead of masking it.
//! - The repository runs on whatever connection or transaction it borrows;
//!   commit/rollback belongs to the caller.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::item::{
    validate_item_name, Item, ItemId, ItemUpdate, ItemValidationError, NewItem,
};
use crate::search::item_filter::{ItemFilter, ItemSearchCond, WhereClause};
use log::debug;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

const ITEM_SELECT_SQL: &str = "SELECT id, item_name, price, quantity FROM items";

const ITEM_COLUMNS: [&str; 4] = ["id", "item_name", "price", "quantity"];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for item persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ItemValidationError),
    /// Storage engine failure, propagated unmodified.
    Db(DbError),
    /// Update targeted an identifier with no stored item.
    NotFound(ItemId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted item data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound(_)
            | Self::InvalidData(_)
            | Self::UninitializedConnection { .. }
            | Self::MissingRequiredTable(_)
            | Self::MissingRequiredColumn { .. } => None,
        }
    }
}

impl From<ItemValidationError> for RepoError {
    fn from(value: ItemValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for item persistence.
///
/// Write paths validate the name before touching storage, so every backend
/// accepts and rejects the same writes.
pub trait ItemRepository {
    /// Persists a new item and returns its assigned identifier.
    fn save(&self, item: &NewItem) -> RepoResult<ItemId>;
    /// Overwrites name, price and quantity of an existing item.
    ///
    /// Fails with `RepoError::NotFound` when `id` is unknown.
    fn update(&self, id: ItemId, update: &ItemUpdate) -> RepoResult<()>;
    /// Returns the item with `id`, or `None` when absent.
    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>>;
    /// Returns every item matching all filters in `cond`, ordered by id.
    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>>;
}

/// SQLite-backed item repository.
pub struct SqliteItemRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemRepository<'conn> {
    /// Constructs a repository from a migrated/ready connection.
    ///
    /// A `rusqlite::Transaction` may be passed here as well; every operation
    /// then joins that transaction.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_item_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ItemRepository for SqliteItemRepository<'_> {
    fn save(&self, item: &NewItem) -> RepoResult<ItemId> {
        item.validate()?;

        self.conn.execute(
            "INSERT INTO items (item_name, price, quantity) VALUES (?1, ?2, ?3);",
            params![item.name.as_str(), item.price, item.quantity],
        )?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, id: ItemId, update: &ItemUpdate) -> RepoResult<()> {
        update.validate()?;

        let changed = self.conn.execute(
            "UPDATE items
             SET
                item_name = ?1,
                price = ?2,
                quantity = ?3
             WHERE id = ?4;",
            params![update.name.as_str(), update.price, update.quantity, id],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn find_by_id(&self, id: ItemId) -> RepoResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn find_all(&self, cond: &ItemSearchCond) -> RepoResult<Vec<Item>> {
        let started_at = Instant::now();
        let filters = cond.filters();
        let clause = WhereClause::from_filters(&filters);
        let sql = format!("{ITEM_SELECT_SQL}{} ORDER BY id ASC", clause.sql);

        debug!(
            "event=item_find_all module=repo status=start filters={} sql={}",
            filter_kinds(&filters),
            sql
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(clause.bind_values))?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        debug!(
            "event=item_find_all module=repo status=ok rows={} duration_ms={}",
            items.len(),
            started_at.elapsed().as_millis()
        );
        Ok(items)
    }
}

fn filter_kinds(filters: &[ItemFilter]) -> String {
    if filters.is_empty() {
        return "none".to_string();
    }

    filters
        .iter()
        .map(ItemFilter::kind)
        .collect::<Vec<_>>()
        .join(",")
}

fn parse_item_row(row: &Row<'_>) -> RepoResult<Item> {
    let id: ItemId = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in items.id"
        )));
    }

    let name: String = row.get("item_name")?;
    validate_item_name(&name)
        .map_err(|err| RepoError::InvalidData(format!("items.item_name for item {id}: {err}")))?;

    Ok(Item {
        id,
        name,
        price: row.get("price")?,
        quantity: row.get("quantity")?,
    })
}

fn ensure_item_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "items")? {
        return Err(RepoError::MissingRequiredTable("items"));
    }

    for column in ITEM_COLUMNS {
        if !table_has_column(conn, "items", column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: "items",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
