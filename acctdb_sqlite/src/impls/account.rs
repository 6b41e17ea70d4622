use acctcore::{
    account::{
        traits::AccountBackend,
        Account,
        AccountEntry,
    },
    error::BackendError,
    listing::{
        ListingParams,
        Page,
        SortField,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc as ChronoUtc};

use crate::{
    SqliteBackend,
    chrono::Utc,
};

const ACCOUNT_COLUMNS: &str = r#"
    id,
    name,
    email,
    email_verified_ts,
    password,
    clearpw,
    emailpw,
    active,
    gid,
    uid,
    home,
    created_ts,
    updated_ts
"#;

// SQLite folds case for ASCII letters only when evaluating LIKE, so a
// search for "änne" does not find "Änne".
const SEARCH_CLAUSE: &str = r#"
WHERE
    name LIKE ?1 ESCAPE '\'
    OR email LIKE ?1 ESCAPE '\'
    OR clearpw LIKE ?1 ESCAPE '\'
    OR emailpw LIKE ?1 ESCAPE '\'
    OR home LIKE ?1 ESCAPE '\'
"#;

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    name: String,
    email: String,
    email_verified_ts: Option<i64>,
    password: String,
    clearpw: Option<String>,
    emailpw: Option<String>,
    active: bool,
    gid: i64,
    uid: i64,
    home: Option<String>,
    created_ts: i64,
    updated_ts: i64,
}

fn timestamp(ts: i64) -> Result<DateTime<ChronoUtc>, BackendError> {
    DateTime::from_timestamp(ts, 0)
        .ok_or_else(|| BackendError::AppInvariantViolation(
            format!("timestamp {ts} out of range")
        ))
}

impl TryFrom<AccountRow> for Account {
    type Error = BackendError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: row.id,
            name: row.name,
            email: row.email,
            email_verified_at: row.email_verified_ts
                .map(timestamp)
                .transpose()?,
            password: row.password,
            clearpw: row.clearpw,
            emailpw: row.emailpw,
            active: row.active,
            gid: row.gid,
            uid: row.uid,
            home: row.home,
            created_at: timestamp(row.created_ts)?,
            updated_at: timestamp(row.updated_ts)?,
        })
    }
}

fn map_conflict(e: sqlx::Error) -> BackendError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            BackendError::Conflict("email".to_string())
        }
        _ => e.into(),
    }
}

fn sort_column(sort: SortField) -> &'static str {
    match sort {
        SortField::Name => "name",
        SortField::Email => "email",
        SortField::CreatedAt => "created_ts",
        SortField::UpdatedAt => "updated_ts",
    }
}

/// Escape the LIKE wildcards so the search term is matched literally.
fn like_pattern(search: &str) -> String {
    let mut result = String::with_capacity(search.len() + 2);
    result.push('%');
    for c in search.chars() {
        if matches!(c, '\\' | '%' | '_') {
            result.push('\\');
        }
        result.push(c);
    }
    result.push('%');
    result
}

async fn add_account_sqlite(
    backend: &SqliteBackend,
    entry: &AccountEntry,
) -> Result<i64, BackendError> {
    let ts = Utc::now().timestamp();
    let id = sqlx::query(
        r#"
INSERT INTO account (
    name,
    email,
    email_verified_ts,
    password,
    clearpw,
    emailpw,
    active,
    gid,
    uid,
    home,
    created_ts,
    updated_ts
)
VALUES ( ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11 )
        "#,
    )
    .bind(&entry.name)
    .bind(&entry.email)
    .bind(entry.email_verified_at.map(|ts| ts.timestamp()))
    .bind(&entry.password)
    .bind(&entry.clearpw)
    .bind(&entry.emailpw)
    .bind(entry.active)
    .bind(entry.gid)
    .bind(entry.uid)
    .bind(&entry.home)
    .bind(ts)
    .execute(&*backend.pool)
    .await
    .map_err(map_conflict)?
    .last_insert_rowid();
    Ok(id)
}

async fn get_account_by_id_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<Option<Account>, BackendError> {
    sqlx::query_as::<_, AccountRow>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM account WHERE id = ?1"
    ))
    .bind(id)
    .fetch_optional(&*backend.pool)
    .await?
    .map(Account::try_from)
    .transpose()
}

async fn get_account_by_email_sqlite(
    backend: &SqliteBackend,
    email: &str,
) -> Result<Option<Account>, BackendError> {
    sqlx::query_as::<_, AccountRow>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM account WHERE email = ?1"
    ))
    .bind(email)
    .fetch_optional(&*backend.pool)
    .await?
    .map(Account::try_from)
    .transpose()
}

async fn store_account_sqlite(
    backend: &SqliteBackend,
    id: i64,
    entry: &AccountEntry,
) -> Result<bool, BackendError> {
    let ts = Utc::now().timestamp();
    let rows_affected = sqlx::query(
        r#"
UPDATE
    account
SET
    name = ?2,
    email = ?3,
    email_verified_ts = ?4,
    password = ?5,
    clearpw = ?6,
    emailpw = ?7,
    active = ?8,
    gid = ?9,
    uid = ?10,
    home = ?11,
    updated_ts = ?12
WHERE
    id = ?1
        "#,
    )
    .bind(id)
    .bind(&entry.name)
    .bind(&entry.email)
    .bind(entry.email_verified_at.map(|ts| ts.timestamp()))
    .bind(&entry.password)
    .bind(&entry.clearpw)
    .bind(&entry.emailpw)
    .bind(entry.active)
    .bind(entry.gid)
    .bind(entry.uid)
    .bind(&entry.home)
    .bind(ts)
    .execute(&*backend.pool)
    .await
    .map_err(map_conflict)?
    .rows_affected();
    Ok(rows_affected > 0)
}

async fn delete_account_sqlite(
    backend: &SqliteBackend,
    id: i64,
) -> Result<bool, BackendError> {
    let rows_affected = sqlx::query(
        r#"
DELETE FROM
    account
WHERE
    id = ?1
        "#,
    )
    .bind(id)
    .execute(&*backend.pool)
    .await?
    .rows_affected();
    Ok(rows_affected > 0)
}

async fn list_accounts_sqlite(
    backend: &SqliteBackend,
    params: &ListingParams,
) -> Result<Page<Account>, BackendError> {
    let column = sort_column(params.sort);
    let direction = params.direction.as_sql();
    let pattern = params.search.as_deref().map(like_pattern);

    let (total, rows) = match &pattern {
        Some(pattern) => {
            let total = sqlx::query_scalar::<_, i64>(&format!(
                "SELECT COUNT(*) FROM account {SEARCH_CLAUSE}"
            ))
            .bind(pattern)
            .fetch_one(&*backend.pool)
            .await?;
            let rows = sqlx::query_as::<_, AccountRow>(&format!(
                "SELECT {ACCOUNT_COLUMNS} FROM account {SEARCH_CLAUSE} \
                ORDER BY {column} {direction}, id {direction} LIMIT ?2 OFFSET ?3"
            ))
            .bind(pattern)
            .bind(params.per_page)
            .bind(params.offset())
            .fetch_all(&*backend.pool)
            .await?;
            (total, rows)
        }
        None => {
            let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM account")
                .fetch_one(&*backend.pool)
                .await?;
            let rows = sqlx::query_as::<_, AccountRow>(&format!(
                "SELECT {ACCOUNT_COLUMNS} FROM account \
                ORDER BY {column} {direction}, id {direction} LIMIT ?1 OFFSET ?2"
            ))
            .bind(params.per_page)
            .bind(params.offset())
            .fetch_all(&*backend.pool)
            .await?;
            (total, rows)
        }
    };

    let data = rows.into_iter()
        .map(Account::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    log::trace!("listed {} of {total} account(s) for {params:?}", data.len());
    Ok(Page::new(data, total, params))
}

#[async_trait]
impl AccountBackend for SqliteBackend {
    async fn add_account(
        &self,
        entry: &AccountEntry,
    ) -> Result<i64, BackendError> {
        add_account_sqlite(
            &self,
            entry,
        ).await
    }

    async fn get_account_by_id(
        &self,
        id: i64,
    ) -> Result<Option<Account>, BackendError> {
        get_account_by_id_sqlite(
            &self,
            id,
        ).await
    }

    async fn get_account_by_email(
        &self,
        email: &str,
    ) -> Result<Option<Account>, BackendError> {
        get_account_by_email_sqlite(
            &self,
            email,
        ).await
    }

    async fn store_account(
        &self,
        id: i64,
        entry: &AccountEntry,
    ) -> Result<bool, BackendError> {
        store_account_sqlite(
            &self,
            id,
            entry,
        ).await
    }

    async fn delete_account(
        &self,
        id: i64,
    ) -> Result<bool, BackendError> {
        delete_account_sqlite(
            &self,
            id,
        ).await
    }

    async fn list_accounts(
        &self,
        params: &ListingParams,
    ) -> Result<Page<Account>, BackendError> {
        list_accounts_sqlite(
            &self,
            params,
        ).await
    }
}
