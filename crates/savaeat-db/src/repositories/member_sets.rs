//! Set-valued document fields stored as join tables.
//!
//! Each add or remove is one statement, so concurrent writers never lose
//! each other's members.

use std::collections::{BTreeSet, HashMap};

use savaeat_core::RepositoryError;
use sqlx::SqlitePool;

use super::row_mappers::{MemberRow, group_members, map_sqlx_error};

/// A join table from an owner document to its members.
pub struct MemberSet {
    table: &'static str,
    owner_column: &'static str,
    member_column: &'static str,
}

pub const VENDOR_LIKERS: MemberSet = MemberSet {
    table: "vendor_likers",
    owner_column: "vendor_id",
    member_column: "liker_id",
};

pub const FAVORITE_VENDORS: MemberSet = MemberSet {
    table: "favorite_vendors",
    owner_column: "owner_id",
    member_column: "vendor_id",
};

pub const CLIENT_REVIEWS: MemberSet = MemberSet {
    table: "client_reviews",
    owner_column: "client_id",
    member_column: "review_id",
};

/// Table holding the owner documents, with the noun used in errors.
#[derive(Clone, Copy)]
pub struct Owners {
    pub table: &'static str,
    pub noun: &'static str,
}

pub const VENDORS: Owners = Owners {
    table: "vendors",
    noun: "vendor",
};

pub const CLIENTS: Owners = Owners {
    table: "clients",
    noun: "client",
};

impl MemberSet {
    pub async fn members_of(
        &self,
        pool: &SqlitePool,
        owner_id: &str,
    ) -> Result<BTreeSet<String>, RepositoryError> {
        let sql = format!(
            "SELECT {member} FROM {table} WHERE {owner} = ?",
            member = self.member_column,
            table = self.table,
            owner = self.owner_column,
        );
        let rows: Vec<(String,)> = sqlx::query_as(&sql)
            .bind(owner_id)
            .fetch_all(pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(|(m,)| m).collect())
    }

    /// Every owner's members, for list queries.
    pub async fn all(
        &self,
        pool: &SqlitePool,
    ) -> Result<HashMap<String, BTreeSet<String>>, RepositoryError> {
        let sql = format!(
            "SELECT {owner} AS owner, {member} AS member FROM {table}",
            owner = self.owner_column,
            member = self.member_column,
            table = self.table,
        );
        let rows = sqlx::query_as::<_, MemberRow>(&sql)
            .fetch_all(pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(group_members(rows))
    }

    /// Add `member` to the owner's set. Present members are left alone.
    pub async fn add(
        &self,
        pool: &SqlitePool,
        owners: Owners,
        owner_id: &str,
        member: &str,
    ) -> Result<(), RepositoryError> {
        // Insert only if the owner exists, in the same statement.
        let sql = format!(
            "INSERT OR IGNORE INTO {table} ({owner}, {member}) SELECT id, ? FROM {owners} WHERE id = ?",
            table = self.table,
            owner = self.owner_column,
            member = self.member_column,
            owners = owners.table,
        );
        let result = sqlx::query(&sql)
            .bind(member)
            .bind(owner_id)
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            ensure_exists(pool, owners, owner_id).await?;
        }
        Ok(())
    }

    /// Remove `member` from the owner's set. Absent members are ignored.
    pub async fn remove(
        &self,
        pool: &SqlitePool,
        owners: Owners,
        owner_id: &str,
        member: &str,
    ) -> Result<(), RepositoryError> {
        let sql = format!(
            "DELETE FROM {table} WHERE {owner} = ? AND {member} = ?",
            table = self.table,
            owner = self.owner_column,
            member = self.member_column,
        );
        let result = sqlx::query(&sql)
            .bind(owner_id)
            .bind(member)
            .execute(pool)
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            ensure_exists(pool, owners, owner_id).await?;
        }
        Ok(())
    }
}

/// `NotFound` unless the owner row exists.
pub async fn ensure_exists(
    pool: &SqlitePool,
    owners: Owners,
    owner_id: &str,
) -> Result<(), RepositoryError> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = ?)", owners.table);
    let (exists,): (bool,) = sqlx::query_as(&sql)
        .bind(owner_id)
        .fetch_one(pool)
        .await
        .map_err(map_sqlx_error)?;

    if exists {
        Ok(())
    } else {
        Err(RepositoryError::NotFound(format!(
            "{} {owner_id}",
            owners.noun
        )))
    }
}
