use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::{
    Client, Collection, Database,
    bson::doc,
    error::{ErrorKind, WriteFailure},
};
use serde::{Deserialize, Serialize};

use crate::{
    Page, PageRequest, ProductId, ProductRecord, Result, StoreError, VariantRecord, Version,
    store::{ProductStore, SaveOptions},
};

/// Server error code for a duplicate `_id`.
const DUPLICATE_KEY: i32 = 11000;

/// One product per document, variants embedded in display order.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    description: String,
    price: f64,
    stock: i64,
    variants: Vec<VariantRecord>,
    version: i64,
    /// Microseconds since the epoch, matching the precision Postgres keeps.
    created_at_us: i64,
    updated_at_us: i64,
}

impl ProductDocument {
    fn from_record(record: ProductRecord, version: Version) -> Self {
        Self {
            id: record.id.into_inner(),
            name: record.name,
            description: record.description,
            price: record.price,
            stock: record.stock,
            variants: record.variants,
            version: version.as_i64(),
            created_at_us: record.created_at.timestamp_micros(),
            updated_at_us: record.updated_at.timestamp_micros(),
        }
    }

    fn into_record(self) -> Result<ProductRecord> {
        let created_at = timestamp(&self.id, "created_at_us", self.created_at_us)?;
        let updated_at = timestamp(&self.id, "updated_at_us", self.updated_at_us)?;
        Ok(ProductRecord {
            id: ProductId::new(self.id),
            name: self.name,
            description: self.description,
            price: self.price,
            stock: self.stock,
            variants: self.variants,
            version: Version::new(self.version),
            created_at,
            updated_at,
        })
    }
}

fn timestamp(id: &str, field: &str, micros: i64) -> Result<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp_micros(micros).ok_or_else(|| StoreError::InvalidDocument {
        product_id: ProductId::new(id),
        reason: format!("{field} {micros} is out of range"),
    })
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

/// MongoDB-backed product store implementation.
#[derive(Clone)]
pub struct MongoProductStore {
    collection: Collection<ProductDocument>,
}

impl MongoProductStore {
    /// Creates a store over the named collection of a database.
    pub fn new(database: &Database, collection: &str) -> Self {
        Self {
            collection: database.collection(collection),
        }
    }

    /// Connects to a MongoDB deployment and opens the given collection.
    pub async fn connect(url: &str, database: &str, collection: &str) -> Result<Self> {
        let client = Client::with_uri_str(url).await?;
        tracing::debug!(database, collection, "connected to document store");
        Ok(Self::new(&client.database(database), collection))
    }

    async fn current_version(&self, id: &ProductId) -> Result<Version> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.as_str() })
            .await?;
        Ok(document
            .map(|d| Version::new(d.version))
            .unwrap_or(Version::initial()))
    }
}

#[async_trait]
impl ProductStore for MongoProductStore {
    async fn save(&self, record: ProductRecord, options: SaveOptions) -> Result<Version> {
        let product_id = record.id.clone();
        let current_version = self.current_version(&product_id).await?;

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
        let document = ProductDocument::from_record(record, new_version);

        if current_version == Version::initial() {
            if let Err(e) = self.collection.insert_one(document).await {
                if is_duplicate_key(&e) {
                    return Err(StoreError::ConcurrencyConflict {
                        actual: self.current_version(&product_id).await?,
                        product_id,
                        expected: current_version,
                    });
                }
                return Err(e.into());
            }
        } else {
            // Conditional on the version read above, so an interleaved write
            // leaves nothing to match
            let result = self
                .collection
                .replace_one(
                    doc! { "_id": product_id.as_str(), "version": current_version.as_i64() },
                    document,
                )
                .await?;

            if result.matched_count == 0 {
                return Err(StoreError::ConcurrencyConflict {
                    actual: self.current_version(&product_id).await?,
                    product_id,
                    expected: current_version,
                });
            }
        }

        Ok(new_version)
    }

    async fn find(&self, id: &ProductId) -> Result<Option<ProductRecord>> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.as_str() })
            .await?;
        document.map(ProductDocument::into_record).transpose()
    }

    async fn find_page(&self, page: PageRequest) -> Result<Page<ProductRecord>> {
        let total = self.collection.count_documents(doc! {}).await?;

        let documents: Vec<ProductDocument> = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at_us": 1, "_id": 1 })
            .skip(page.offset())
            .limit(i64::from(page.limit()))
            .await?
            .try_collect()
            .await?;

        let items = documents
            .into_iter()
            .map(ProductDocument::into_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(Page::new(items, total))
    }

    async fn delete(&self, id: &ProductId) -> Result<()> {
        self.collection
            .delete_one(doc! { "_id": id.as_str() })
            .await?;
        Ok(())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ProductRecord {
        let created_at = DateTime::<Utc>::from_timestamp_millis(1_700_000_000_123).unwrap();
        ProductRecord {
            id: ProductId::new("p-1"),
            name: "Sneaker".to_string(),
            description: "Running shoe".to_string(),
            price: 89.9,
            stock: 12,
            variants: vec![
                VariantRecord {
                    size: "42".to_string(),
                    color: "White".to_string(),
                    price: 89.9,
                    stock: 5,
                    image_url: "https://img.example/42-white.png".to_string(),
                },
                VariantRecord {
                    size: "43".to_string(),
                    color: "Black".to_string(),
                    price: 92.0,
                    stock: 7,
                    image_url: String::new(),
                },
            ],
            version: Version::initial(),
            created_at,
            updated_at: created_at,
        }
    }

    #[test]
    fn document_roundtrip_preserves_record() {
        let record = sample_record();
        let document = ProductDocument::from_record(record.clone(), Version::new(3));

        assert_eq!(document.id, "p-1");
        assert_eq!(document.version, 3);

        let restored = document.into_record().unwrap();
        assert_eq!(restored, record.with_version(Version::new(3)));
    }

    #[test]
    fn document_keeps_microseconds() {
        let mut record = sample_record();
        record.created_at = DateTime::<Utc>::from_timestamp_micros(1_700_000_000_123_456).unwrap();
        let earlier = DateTime::<Utc>::from_timestamp_micros(1_700_000_000_123_455).unwrap();

        let document = ProductDocument::from_record(record.clone(), Version::first());
        assert_eq!(document.created_at_us, 1_700_000_000_123_456);
        assert!(document.created_at_us > earlier.timestamp_micros());
        assert_eq!(document.into_record().unwrap().created_at, record.created_at);
    }

    #[test]
    fn out_of_range_timestamp_is_reported() {
        let mut document = ProductDocument::from_record(sample_record(), Version::first());
        document.created_at_us = i64::MAX;

        let result = document.into_record();
        assert!(matches!(
            result,
            Err(StoreError::InvalidDocument { ref product_id, ref reason })
                if product_id.as_str() == "p-1" && reason.contains("created_at_us")
        ));
    }

    #[test]
    fn document_uses_mongo_id_field() {
        let document = ProductDocument::from_record(sample_record(), Version::first());
        let bson = mongodb::bson::to_document(&document).unwrap();

        assert_eq!(bson.get_str("_id").unwrap(), "p-1");
        assert!(!bson.contains_key("id"));
        assert_eq!(bson.get_array("variants").unwrap().len(), 2);
    }
}
