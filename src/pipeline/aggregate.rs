use std::collections::BTreeMap;
use std::sync::Arc;

use linked_hash_map::LinkedHashMap;
use serde::Serialize;

use crate::models::{ProxyRecord, ProxyType};

/// Ordered, unique sequence of raw links keyed by dedup key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bucket {
    links: LinkedHashMap<String, Arc<str>>,
}

impl Bucket {
    /// Appends a link unless its key is already present. Returns whether it
    /// was added.
    pub fn push(&mut self, key: &str, raw_link: &Arc<str>) -> bool {
        if self.links.contains_key(key) {
            return false;
        }
        self.links.insert(key.to_string(), Arc::clone(raw_link));
        true
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Raw links in insertion order.
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.links.values().map(|link| link.as_ref())
    }

    /// Newline-terminated file content.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for link in self.links() {
            out.push_str(link);
            out.push('\n');
        }
        out
    }
}

/// Count row for the summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub name: String,
    pub count: usize,
}

/// Records partitioned by protocol and by matched country.
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    protocols: BTreeMap<ProxyType, Bucket>,
    countries: BTreeMap<String, Bucket>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a record to its protocol bucket and to every matched country's
    /// bucket.
    pub fn add(&mut self, record: &ProxyRecord) {
        self.protocols
            .entry(record.protocol)
            .or_default()
            .push(&record.dedup_key, &record.raw_link);

        for code in &record.matched_countries {
            self.countries
                .entry(code.clone())
                .or_default()
                .push(&record.dedup_key, &record.raw_link);
        }
    }

    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ProxyRecord>) -> Self {
        let mut aggregate = Self::new();
        for record in records {
            aggregate.add(record);
        }
        aggregate
    }

    pub fn protocol(&self, protocol: ProxyType) -> Option<&Bucket> {
        self.protocols.get(&protocol)
    }

    pub fn country(&self, code: &str) -> Option<&Bucket> {
        self.countries.get(code)
    }

    /// Non-empty protocol buckets in protocol order.
    pub fn protocols(&self) -> impl Iterator<Item = (ProxyType, &Bucket)> {
        self.protocols
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(protocol, bucket)| (*protocol, bucket))
    }

    /// Non-empty country buckets ordered by code.
    pub fn countries(&self) -> impl Iterator<Item = (&str, &Bucket)> {
        self.countries
            .iter()
            .filter(|(_, bucket)| !bucket.is_empty())
            .map(|(code, bucket)| (code.as_str(), bucket))
    }

    pub fn protocol_counts(&self) -> Vec<BucketCount> {
        self.protocols()
            .map(|(protocol, bucket)| BucketCount {
                name: protocol.as_str().to_string(),
                count: bucket.len(),
            })
            .collect()
    }

    pub fn country_counts(&self) -> Vec<BucketCount> {
        self.countries()
            .map(|(code, bucket)| BucketCount {
                name: code.to_string(),
                count: bucket.len(),
            })
            .collect()
    }
}
