//! `RocksDB` storage implementation.
//!
//! This module provides the `RocksStore` implementation of the `Store`
//! trait.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rocksdb::{
    BoundColumnFamily, ColumnFamilyDescriptor, DBWithThreadMode, Direction, IteratorMode, Options,
    WriteBatch,
};

use planshop_core::{Account, Order, OrderId, PaymentTransaction};

use crate::error::{Result, StoreError};
use crate::keys;
use crate::schema::{all_column_families, cf};
use crate::Store;

/// RocksDB-backed storage implementation.
pub struct RocksStore {
    db: Arc<DBWithThreadMode<rocksdb::MultiThreaded>>,

    /// Serializes the existence check and insert in
    /// `insert_order_for_session`. RocksDB has no conditional put, so the
    /// check-then-write pair must not interleave across callers.
    order_session_lock: Mutex<()>,
}

impl RocksStore {
    /// Open or create a `RocksDB` database at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors: Vec<_> = all_column_families()
            .into_iter()
            .map(|name| ColumnFamilyDescriptor::new(name, Options::default()))
            .collect();

        let db = DBWithThreadMode::open_cf_descriptors(&opts, path, cf_descriptors)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(Self {
            db: Arc::new(db),
            order_session_lock: Mutex::new(()),
        })
    }

    /// Get a column family handle.
    fn cf(&self, name: &str) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::Database(format!("column family not found: {name}")))
    }

    /// Serialize a value using CBOR.
    fn serialize<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize a value from CBOR.
    fn deserialize<T: serde::de::DeserializeOwned>(data: &[u8]) -> Result<T> {
        ciborium::from_reader(data).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    /// Stage an order write (record + email index) into a batch.
    fn stage_order(&self, batch: &mut WriteBatch, order: &Order) -> Result<()> {
        let cf_orders = self.cf(cf::ORDERS)?;
        let value = Self::serialize(order)?;
        batch.put_cf(&cf_orders, keys::order_key(&order.id), value);

        if let Some(email) = &order.user_email {
            let cf_by_email = self.cf(cf::ORDERS_BY_EMAIL)?;
            batch.put_cf(&cf_by_email, keys::email_order_key(email, &order.id), []);
        }

        Ok(())
    }
}

impl Store for RocksStore {
    // =========================================================================
    // Account Operations
    // =========================================================================

    fn put_account(&self, account: &Account) -> Result<()> {
        let cf = self.cf(cf::ACCOUNTS)?;
        let key = keys::account_key(&account.email);
        let value = Self::serialize(account)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>> {
        let cf = self.cf(cf::ACCOUNTS)?;

        self.db
            .get_cf(&cf, keys::account_key(email))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    // =========================================================================
    // Order Operations
    // =========================================================================

    fn put_order(&self, order: &Order) -> Result<()> {
        let mut batch = WriteBatch::default();
        self.stage_order(&mut batch, order)?;

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_order(&self, order_id: &OrderId) -> Result<Option<Order>> {
        let cf = self.cf(cf::ORDERS)?;

        self.db
            .get_cf(&cf, keys::order_key(order_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }

    fn list_orders(&self, user_email: Option<&str>, limit: usize) -> Result<Vec<Order>> {
        let Some(email) = user_email else {
            // Unfiltered listing scans the primary column family directly;
            // ULID keys keep it time-ordered.
            let cf = self.cf(cf::ORDERS)?;
            let mut orders = Vec::new();
            for item in self.db.iterator_cf(&cf, IteratorMode::Start).take(limit) {
                let (_, value) = item.map_err(|e| StoreError::Database(e.to_string()))?;
                orders.push(Self::deserialize(&value)?);
            }
            return Ok(orders);
        };

        let cf_index = self.cf(cf::ORDERS_BY_EMAIL)?;
        let prefix = keys::email_orders_prefix(email);

        let mut orders = Vec::new();
        let iter = self
            .db
            .iterator_cf(&cf_index, IteratorMode::From(&prefix, Direction::Forward));
        for item in iter {
            let (key, _) = item.map_err(|e| StoreError::Database(e.to_string()))?;
            if !key.starts_with(&prefix) {
                break;
            }
            let order_id = keys::extract_order_id_from_email_key(&key);
            if let Some(order) = self.get_order(&order_id)? {
                orders.push(order);
            }
            if orders.len() >= limit {
                break;
            }
        }

        Ok(orders)
    }

    fn find_order_by_session(&self, session_id: &str) -> Result<Option<Order>> {
        let cf = self.cf(cf::ORDERS_BY_SESSION)?;

        let Some(id_bytes) = self
            .db
            .get_cf(&cf, keys::session_key(session_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
        else {
            return Ok(None);
        };

        let mut bytes = [0u8; 16];
        if id_bytes.len() != 16 {
            return Err(StoreError::InvalidRecord(format!(
                "session index value has {} bytes, expected 16",
                id_bytes.len()
            )));
        }
        bytes.copy_from_slice(&id_bytes);
        let order_id = OrderId::from_bytes(bytes)
            .map_err(|e| StoreError::InvalidRecord(e.to_string()))?;

        self.get_order(&order_id)
    }

    fn insert_order_for_session(&self, order: &Order) -> Result<bool> {
        let session_id = order.payment_session_id.as_deref().ok_or_else(|| {
            StoreError::InvalidRecord("order has no payment session id".into())
        })?;

        let cf_by_session = self.cf(cf::ORDERS_BY_SESSION)?;
        let session_key = keys::session_key(session_id);

        // The lock makes the check and the batched write one atomic step
        // with respect to other callers.
        let _guard = self
            .order_session_lock
            .lock()
            .map_err(|_| StoreError::Database("order session lock poisoned".into()))?;

        let existing = self
            .db
            .get_cf(&cf_by_session, &session_key)
            .map_err(|e| StoreError::Database(e.to_string()))?;
        if existing.is_some() {
            return Ok(false);
        }

        let mut batch = WriteBatch::default();
        self.stage_order(&mut batch, order)?;
        batch.put_cf(&cf_by_session, &session_key, order.id.to_bytes());

        self.db
            .write(batch)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(true)
    }

    // =========================================================================
    // Payment Transaction Operations
    // =========================================================================

    fn put_transaction(&self, transaction: &PaymentTransaction) -> Result<()> {
        let cf = self.cf(cf::TRANSACTIONS)?;
        let key = keys::session_key(&transaction.session_id);
        let value = Self::serialize(transaction)?;

        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(())
    }

    fn get_transaction_by_session(&self, session_id: &str) -> Result<Option<PaymentTransaction>> {
        let cf = self.cf(cf::TRANSACTIONS)?;

        self.db
            .get_cf(&cf, keys::session_key(session_id))
            .map_err(|e| StoreError::Database(e.to_string()))?
            .map(|data| Self::deserialize(&data))
            .transpose()
    }
}
