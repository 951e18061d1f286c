// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory IP address store for tools and tests

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{IpAddressRecord, IpAddressStore, RepositoryResult};

/// Records keyed by instance and network name
#[derive(Debug, Default)]
pub struct InMemoryIpAddressStore {
    records: RwLock<HashMap<(Uuid, String), IpAddressRecord>>,
}

impl InMemoryIpAddressStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from existing records; later duplicates win
    pub fn with_records(records: impl IntoIterator<Item = IpAddressRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| ((record.instance_id, record.network_name.clone()), record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Store a record, returning the one it replaced
    pub async fn insert(&self, record: IpAddressRecord) -> Option<IpAddressRecord> {
        let key = (record.instance_id, record.network_name.clone());
        self.records.write().await.insert(key, record)
    }

    pub async fn remove(&self, instance_id: Uuid, network_name: &str) -> Option<IpAddressRecord> {
        self.records
            .write()
            .await
            .remove(&(instance_id, network_name.to_string()))
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl IpAddressStore for InMemoryIpAddressStore {
    async fn find_for_instance(
        &self,
        instance_id: Uuid,
        network_name: &str,
    ) -> RepositoryResult<Option<IpAddressRecord>> {
        let records = self.records.read().await;
        Ok(records.get(&(instance_id, network_name.to_string())).cloned())
    }
}
