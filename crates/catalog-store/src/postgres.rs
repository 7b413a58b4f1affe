use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Executor, PgPool, Postgres, Row, Transaction, postgres::PgRow};

use crate::{
    Page, PageRequest, ProductId, ProductRecord, Result, StoreError, VariantRecord, Version,
    store::{ProductStore, SaveOptions},
};

const PRODUCT_COLUMNS: &str =
    "id, name, description, price, stock, version, created_at, updated_at";

/// PostgreSQL-backed product store implementation.
#[derive(Clone)]
pub struct PostgresProductStore {
    pool: PgPool,
}

impl PostgresProductStore {
    /// Creates a new PostgreSQL product store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("../../migrations").run(&self.pool).await
    }

    fn row_to_record(row: &PgRow, variants: Vec<VariantRecord>) -> Result<ProductRecord> {
        Ok(ProductRecord {
            id: ProductId::new(row.try_get::<String, _>("id")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            price: row.try_get("price")?,
            stock: row.try_get("stock")?,
            variants,
            version: Version::new(row.try_get("version")?),
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    /// Loads the variants of the given products, grouped by product id and
    /// ordered by position.
    async fn load_variants<'e, E>(
        executor: E,
        ids: &[String],
    ) -> Result<HashMap<String, Vec<VariantRecord>>>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query(
            r#"
            SELECT product_id, size, color, price, stock, image_url
            FROM product_variants
            WHERE product_id = ANY($1)
            ORDER BY product_id ASC, position ASC
            "#,
        )
        .bind(ids)
        .fetch_all(executor)
        .await?;

        let mut grouped: HashMap<String, Vec<VariantRecord>> = HashMap::new();
        for row in rows {
            let product_id: String = row.try_get("product_id")?;
            grouped.entry(product_id).or_default().push(VariantRecord {
                size: row.try_get("size")?,
                color: row.try_get("color")?,
                price: row.try_get("price")?,
                stock: row.try_get("stock")?,
                image_url: row.try_get("image_url")?,
            });
        }
        Ok(grouped)
    }

    async fn replace_variants(
        tx: &mut Transaction<'_, Postgres>,
        record: &ProductRecord,
    ) -> Result<()> {
        sqlx::query("DELETE FROM product_variants WHERE product_id = $1")
            .bind(record.id.as_str())
            .execute(&mut **tx)
            .await?;

        for (position, variant) in record.variants.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO product_variants (product_id, position, size, color, price, stock, image_url)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(record.id.as_str())
            .bind(position as i32)
            .bind(&variant.size)
            .bind(&variant.color)
            .bind(variant.price)
            .bind(variant.stock)
            .bind(&variant.image_url)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl ProductStore for PostgresProductStore {
    async fn save(&self, record: ProductRecord, options: SaveOptions) -> Result<Version> {
        let product_id = record.id.clone();

        // Start a transaction
        let mut tx = self.pool.begin().await?;

        // Lock the row so concurrent writers serialize on the version check
        let current: Option<i64> =
            sqlx::query_scalar("SELECT version FROM products WHERE id = $1 FOR UPDATE")
                .bind(product_id.as_str())
                .fetch_optional(&mut *tx)
                .await?;
        let current_version = current.map(Version::new).unwrap_or(Version::initial());

        if let Some(expected) = options.expected_version
            && current_version != expected
        {
            return Err(StoreError::ConcurrencyConflict {
                product_id,
                expected,
                actual: current_version,
            });
        }

        let new_version = current_version.next();

        if current.is_some() {
            sqlx::query(
                r#"
                UPDATE products
                SET name = $2, description = $3, price = $4, stock = $5, version = $6, updated_at = $7
                WHERE id = $1
                "#,
            )
            .bind(product_id.as_str())
            .bind(&record.name)
            .bind(&record.description)
            .bind(record.price)
            .bind(record.stock)
            .bind(new_version.as_i64())
            .bind(record.updated_at)
            .execute(&mut *tx)
            .await?;
        } else {
            sqlx::query(
                r#"
                INSERT INTO products (id, name, description, price, stock, version, created_at, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(product_id.as_str())
            .bind(&record.name)
            .bind(&record.description)
            .bind(record.price)
            .bind(record.stock)
            .bind(new_version.as_i64())
            .bind(record.created_at)
            .bind(record.updated_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                // A concurrent insert of the same id won the race
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.constraint() == Some("products_pkey")
                {
                    return StoreError::ConcurrencyConflict {
                        product_id: product_id.clone(),
                        expected: options.expected_version.unwrap_or(Version::initial()),
                        actual: Version::first(),
                    };
                }
                StoreError::Database(e)
            })?;
        }

        Self::replace_variants(&mut tx, &record).await?;

        tx.commit().await?;
        Ok(new_version)
    }

    async fn find(&self, id: &ProductId) -> Result<Option<ProductRecord>> {
        let row: Option<PgRow> =
            sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
                .bind(id.as_str())
                .fetch_optional(&self.pool)
                .await?;

        match row {
            Some(row) => {
                let mut variants = Self::load_variants(&self.pool, &[id.to_string()]).await?;
                let variants = variants.remove(id.as_str()).unwrap_or_default();
                Ok(Some(Self::row_to_record(&row, variants)?))
            }
            None => Ok(None),
        }
    }

    async fn find_page(&self, page: PageRequest) -> Result<Page<ProductRecord>> {
        let mut tx = self.pool.begin().await?;

        // Count, page and variants all read the same snapshot
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *tx)
            .await?;

        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at ASC, id ASC LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(page.limit()))
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&mut *tx)
        .await?;

        let ids = rows
            .iter()
            .map(|row| row.try_get::<String, _>("id"))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut variants = Self::load_variants(&mut *tx, &ids).await?;
        tx.commit().await?;

        let items = rows
            .iter()
            .zip(&ids)
            .map(|(row, id)| Self::row_to_record(row, variants.remove(id).unwrap_or_default()))
            .collect::<Result<Vec<_>>>()?;

        Ok(Page::new(items, total.max(0) as u64))
    }

    async fn delete(&self, id: &ProductId) -> Result<()> {
        // Variants go with the product (ON DELETE CASCADE)
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(total.max(0) as u64)
    }
}
