use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use wayfarer_core::TripPlan;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedPlan {
    pub plan: TripPlan,
    pub revision: u32,
    pub persisted_at: DateTime<Utc>,
}

/// Persistence port for trip plans. Saving the same plan id again bumps its
/// revision.
pub trait PlanRepository: Send + Sync {
    async fn save(&self, plan: &TripPlan) -> Result<PersistedPlan>;
    async fn load(&self, plan_id: &str) -> Result<Option<PersistedPlan>>;
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<PersistedPlan>>;
    async fn delete(&self, plan_id: &str) -> Result<bool>;
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    plans: Arc<RwLock<HashMap<String, PersistedPlan>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.plans.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.read().is_empty()
    }
}

impl PlanRepository for MemoryStore {
    async fn save(&self, plan: &TripPlan) -> Result<PersistedPlan> {
        let mut plans = self.plans.write();
        let revision = plans
            .get(&plan.id)
            .map(|existing| existing.revision + 1)
            .unwrap_or(1);
        let persisted = PersistedPlan {
            plan: plan.clone(),
            revision,
            persisted_at: Utc::now(),
        };
        plans.insert(plan.id.clone(), persisted.clone());
        Ok(persisted)
    }

    async fn load(&self, plan_id: &str) -> Result<Option<PersistedPlan>> {
        Ok(self.plans.read().get(plan_id).cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<PersistedPlan>> {
        let mut plans = self
            .plans
            .read()
            .values()
            .filter(|persisted| persisted.plan.user_id == user_id)
            .cloned()
            .collect::<Vec<_>>();
        plans.sort_by(|a, b| b.plan.updated_at.cmp(&a.plan.updated_at));
        Ok(plans)
    }

    async fn delete(&self, plan_id: &str) -> Result<bool> {
        Ok(self.plans.write().remove(plan_id).is_some())
    }
}

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub async fn connect(database_url: &str) -> Result<Self> {
        // Every connection to an in-memory database sees its own empty
        // database, so keep the pool to one connection there.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .with_context(|| format!("failed connecting to sqlite at {}", database_url))?;

        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS trip_plans (
              id TEXT PRIMARY KEY,
              user_id TEXT NOT NULL,
              plan_type TEXT NOT NULL,
              status TEXT NOT NULL,
              name TEXT NOT NULL,
              plan_json TEXT NOT NULL,
              revision INTEGER NOT NULL,
              updated_at TEXT NOT NULL,
              persisted_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        for statement in [
            "CREATE INDEX IF NOT EXISTS trip_plans_user_idx ON trip_plans (user_id)",
            "CREATE INDEX IF NOT EXISTS trip_plans_status_idx ON trip_plans (status)",
        ] {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        Ok(())
    }
}

fn row_to_persisted(row: &sqlx::sqlite::SqliteRow) -> Result<PersistedPlan> {
    let plan_json: String = row.get("plan_json");
    let plan = serde_json::from_str(&plan_json).context("stored plan json is invalid")?;
    let revision: i64 = row.get("revision");
    let persisted_at = row
        .get::<String, _>("persisted_at")
        .parse()
        .unwrap_or_else(|_| Utc::now());

    Ok(PersistedPlan {
        plan,
        revision: revision.max(0) as u32,
        persisted_at,
    })
}

impl PlanRepository for SqliteStore {
    async fn save(&self, plan: &TripPlan) -> Result<PersistedPlan> {
        let plan_json = serde_json::to_string(plan)?;
        let plan_type = serde_json::to_value(plan.plan_type)?
            .as_str()
            .unwrap_or("quick")
            .to_string();
        let persisted_at = Utc::now();

        let row = sqlx::query(
            r#"
            INSERT INTO trip_plans
              (id, user_id, plan_type, status, name, plan_json, revision, updated_at, persisted_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
              user_id=excluded.user_id,
              plan_type=excluded.plan_type,
              status=excluded.status,
              name=excluded.name,
              plan_json=excluded.plan_json,
              revision=trip_plans.revision + 1,
              updated_at=excluded.updated_at,
              persisted_at=excluded.persisted_at
            RETURNING revision
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.user_id)
        .bind(plan_type)
        .bind(plan.status.as_code())
        .bind(&plan.name)
        .bind(plan_json)
        .bind(plan.updated_at.to_rfc3339())
        .bind(persisted_at.to_rfc3339())
        .fetch_one(&self.pool)
        .await
        .with_context(|| format!("failed saving plan {}", plan.id))?;

        let revision: i64 = row.get("revision");
        Ok(PersistedPlan {
            plan: plan.clone(),
            revision: revision.max(0) as u32,
            persisted_at,
        })
    }

    async fn load(&self, plan_id: &str) -> Result<Option<PersistedPlan>> {
        let row = sqlx::query(
            r#"
            SELECT plan_json, revision, persisted_at
            FROM trip_plans
            WHERE id = ?1
            "#,
        )
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        row_to_persisted(&row).map(Some)
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<PersistedPlan>> {
        let rows = sqlx::query(
            r#"
            SELECT plan_json, revision, persisted_at
            FROM trip_plans
            WHERE user_id = ?1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_persisted).collect()
    }

    async fn delete(&self, plan_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM trip_plans WHERE id = ?1")
            .bind(plan_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub enum Store {
    Memory(MemoryStore),
    Sqlite(SqliteStore),
}

impl Store {
    pub fn memory() -> Self {
        Self::Memory(MemoryStore::new())
    }

    pub async fn sqlite(database_url: &str) -> Result<Self> {
        let sqlite = SqliteStore::connect(database_url).await?;
        Ok(Self::Sqlite(sqlite))
    }

    pub fn backend(&self) -> &'static str {
        match self {
            Store::Memory(_) => "memory",
            Store::Sqlite(_) => "sqlite",
        }
    }
}

impl PlanRepository for Store {
    async fn save(&self, plan: &TripPlan) -> Result<PersistedPlan> {
        match self {
            Store::Memory(store) => store.save(plan).await,
            Store::Sqlite(store) => store.save(plan).await,
        }
    }

    async fn load(&self, plan_id: &str) -> Result<Option<PersistedPlan>> {
        match self {
            Store::Memory(store) => store.load(plan_id).await,
            Store::Sqlite(store) => store.load(plan_id).await,
        }
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<PersistedPlan>> {
        match self {
            Store::Memory(store) => store.list_for_user(user_id).await,
            Store::Sqlite(store) => store.list_for_user(user_id).await,
        }
    }

    async fn delete(&self, plan_id: &str) -> Result<bool> {
        match self {
            Store::Memory(store) => store.delete(plan_id).await,
            Store::Sqlite(store) => store.delete(plan_id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use wayfarer_core::{draft_snapshot, Location, PlanFormData, QuickAction, QuickTripFormData};

    use super::*;

    fn plan(user_id: &str, destination: &str) -> TripPlan {
        let form = QuickTripFormData::default().apply(QuickAction::SetDestination {
            destination: Some(Location::named(destination)),
        });
        draft_snapshot(None, user_id, PlanFormData::Quick(form), None, Utc::now())
    }

    #[tokio::test]
    async fn memory_store_bumps_revision() {
        let store = MemoryStore::new();
        let plan = plan("u-1", "Paris");
        assert_eq!(store.save(&plan).await.unwrap().revision, 1);
        assert_eq!(store.save(&plan).await.unwrap().revision, 2);
        assert_eq!(store.len(), 1);

        let loaded = store.load(&plan.id).await.unwrap().unwrap();
        assert_eq!(loaded.plan, plan);
    }

    #[tokio::test]
    async fn memory_store_lists_newest_first() {
        let store = MemoryStore::new();
        let older = plan("u-1", "Paris");
        let mut newer = plan("u-1", "Tokyo");
        newer.updated_at = older.updated_at + Duration::minutes(1);
        store.save(&older).await.unwrap();
        store.save(&newer).await.unwrap();
        store.save(&plan("u-2", "Rome")).await.unwrap();

        let listed = store.list_for_user("u-1").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].plan.id, newer.id);

        assert!(store.delete(&older.id).await.unwrap());
        assert!(!store.delete(&older.id).await.unwrap());
    }

    #[tokio::test]
    async fn sqlite_schema_indexes_user_and_status() {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        let names: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'index' AND tbl_name = 'trip_plans' ORDER BY name",
        )
        .fetch_all(store.pool())
        .await
        .unwrap();
        assert!(names.contains(&"trip_plans_status_idx".to_string()));
        assert!(names.contains(&"trip_plans_user_idx".to_string()));
    }

    #[tokio::test]
    async fn sqlite_store_round_trips_plans() {
        let store = Store::sqlite("sqlite::memory:").await.unwrap();
        assert_eq!(store.backend(), "sqlite");
        let plan = plan("u-1", "Barcelona");

        assert_eq!(store.save(&plan).await.unwrap().revision, 1);
        assert_eq!(store.save(&plan).await.unwrap().revision, 2);

        let loaded = store.load(&plan.id).await.unwrap().unwrap();
        assert_eq!(loaded.plan.name, plan.name);
        assert_eq!(loaded.revision, 2);
        assert_eq!(store.list_for_user("u-1").await.unwrap().len(), 1);
        assert!(store.load("missing").await.unwrap().is_none());
    }
}
