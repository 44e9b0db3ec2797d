use std::{future::Future, time::Duration};

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use super::domain::{NewSignature, Signature};
use crate::errors::ServiceError;

/// The only access path to stored signatures.
#[async_trait]
pub trait SignatureRepository: Send + Sync {
    /// Fails with `ServiceError::Duplicate` when the national id is taken.
    async fn insert(&self, new: NewSignature) -> Result<Signature, ServiceError>;
    /// Rows in insertion order starting at row `offset`.
    async fn page(&self, offset: u64, limit: u64) -> Result<Vec<Signature>, ServiceError>;
    async fn count(&self) -> Result<u64, ServiceError>;
}

/// SeaORM-backed repository implementation.
pub struct SeaOrmSignatureRepository {
    pub db: DatabaseConnection,
    pub timeout: Duration,
}

impl SeaOrmSignatureRepository {
    pub fn new(db: DatabaseConnection, timeout: Duration) -> Self { Self { db, timeout } }

    async fn bounded<T, F>(&self, op: &'static str, fut: F) -> Result<T, ServiceError>
    where
        F: Future<Output = Result<T, models::errors::ModelError>>,
    {
        match tokio::time::timeout(self.timeout, fut).await {
            Ok(res) => res.map_err(ServiceError::from),
            Err(_) => Err(ServiceError::Timeout(op, self.timeout.as_secs())),
        }
    }
}

#[async_trait]
impl SignatureRepository for SeaOrmSignatureRepository {
    async fn insert(&self, new: NewSignature) -> Result<Signature, ServiceError> {
        self.bounded("insert", models::signature::create(&self.db, new)).await
    }

    async fn page(&self, offset: u64, limit: u64) -> Result<Vec<Signature>, ServiceError> {
        self.bounded("select_page", models::signature::page(&self.db, offset, limit)).await
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        self.bounded("count", models::signature::count(&self.db)).await
    }
}

/// In-memory repository with a switchable storage fault, for tests.
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockSignatureRepository {
        rows: Mutex<Vec<Signature>>,
        // when set, every operation fails with this storage error
        fault: Mutex<Option<String>>,
    }

    impl MockSignatureRepository {
        pub fn fail_with(&self, msg: impl Into<String>) {
            *self.fault.lock().unwrap_or_else(|p| p.into_inner()) = Some(msg.into());
        }

        pub fn rows(&self) -> Vec<Signature> {
            self.rows.lock().unwrap_or_else(|p| p.into_inner()).clone()
        }

        fn check_fault(&self) -> Result<(), ServiceError> {
            match self.fault.lock().unwrap_or_else(|p| p.into_inner()).as_ref() {
                Some(msg) => Err(ServiceError::Db(msg.clone())),
                None => Ok(()),
            }
        }
    }

    #[async_trait]
    impl SignatureRepository for MockSignatureRepository {
        async fn insert(&self, new: NewSignature) -> Result<Signature, ServiceError> {
            self.check_fault()?;
            let mut rows = self.rows.lock().unwrap_or_else(|p| p.into_inner());
            if rows.iter().any(|r| r.national_id == new.national_id) {
                return Err(ServiceError::Duplicate(new.national_id));
            }
            let row = Signature {
                id: rows.len() as i32 + 1,
                name: new.name,
                national_id: new.national_id,
                comment: new.comment,
                anonymous: new.anonymous,
                created_at: chrono::Utc::now().into(),
            };
            rows.push(row.clone());
            Ok(row)
        }

        async fn page(&self, offset: u64, limit: u64) -> Result<Vec<Signature>, ServiceError> {
            self.check_fault()?;
            let rows = self.rows.lock().unwrap_or_else(|p| p.into_inner());
            let start = usize::try_from(offset).unwrap_or(usize::MAX);
            let take = usize::try_from(limit).unwrap_or(usize::MAX);
            Ok(rows.iter().skip(start).take(take).cloned().collect())
        }

        async fn count(&self) -> Result<u64, ServiceError> {
            self.check_fault()?;
            Ok(self.rows.lock().unwrap_or_else(|p| p.into_inner()).len() as u64)
        }
    }
}
