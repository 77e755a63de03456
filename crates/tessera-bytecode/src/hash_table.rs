//! On-disk hash tables stored in index blobs.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! u32 0                                   reserved, so no bucket starts at 0
//! bucket*: u32 count, item*               item = u32 hash, u32 key_len,
//!                                                u32 data_len, key, data
//! padding to a multiple of 4
//! u32 bucket_count, u32 entry_count       <- table offset
//! u32 bucket_offset[bucket_count]         0 marks an empty bucket
//! ```
//!
//! Keys are written in sorted order, so the same entries always produce the
//! same bytes.

use std::collections::BTreeMap;

const INITIAL_BUCKETS: u32 = 64;
const HEADER_BYTES: usize = 8;

/// Bernstein hash over raw key bytes.
pub fn djb_hash(key: &[u8]) -> u32 {
    key.iter().fold(5381u32, |h, &b| {
        (h << 5).wrapping_add(h).wrapping_add(b as u32)
    })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashTableError {
    #[error("hash table offset {offset} is outside its {len}-byte blob")]
    BadOffset { offset: u32, len: usize },

    #[error("hash table bucket at byte {at} is truncated")]
    Truncated { at: usize },
}

/// Collects key/data pairs and lays them out as a table.
#[derive(Debug, Default, Clone)]
pub struct HashTableBuilder {
    entries: BTreeMap<Vec<u8>, Vec<u8>>,
}

impl HashTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data for `key`, created empty on first use. Tables whose values are
    /// lists append to it.
    pub fn entry(&mut self, key: impl Into<Vec<u8>>) -> &mut Vec<u8> {
        self.entries.entry(key.into()).or_default()
    }

    pub fn insert(&mut self, key: impl Into<Vec<u8>>, data: Vec<u8>) {
        self.entries.insert(key.into(), data);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lay out the table. Returns the table offset and the blob.
    pub fn finish(self) -> (u32, Vec<u8>) {
        let bucket_count = bucket_count_for(self.entries.len());
        let mut buckets: Vec<Vec<(u32, &[u8], &[u8])>> = vec![Vec::new(); bucket_count as usize];
        for (key, data) in &self.entries {
            let hash = djb_hash(key);
            buckets[(hash % bucket_count) as usize].push((hash, key, data));
        }

        let mut out = Vec::new();
        push_u32(&mut out, 0);
        let mut offsets = Vec::with_capacity(buckets.len());
        for bucket in &buckets {
            if bucket.is_empty() {
                offsets.push(0);
                continue;
            }
            offsets.push(out.len() as u32);
            push_u32(&mut out, bucket.len() as u32);
            for (hash, key, data) in bucket {
                push_u32(&mut out, *hash);
                push_u32(&mut out, key.len() as u32);
                push_u32(&mut out, data.len() as u32);
                out.extend_from_slice(key);
                out.extend_from_slice(data);
            }
        }
        while out.len() % 4 != 0 {
            out.push(0);
        }

        let table_offset = out.len() as u32;
        push_u32(&mut out, bucket_count);
        push_u32(&mut out, self.entries.len() as u32);
        for offset in offsets {
            push_u32(&mut out, offset);
        }
        (table_offset, out)
    }
}

fn bucket_count_for(entries: usize) -> u32 {
    let mut buckets = INITIAL_BUCKETS;
    // Keep the load factor below 3/4.
    while entries as u64 * 4 >= buckets as u64 * 3 {
        buckets *= 2;
    }
    buckets
}

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn read_u32(bytes: &[u8], at: usize) -> Result<u32, HashTableError> {
    bytes
        .get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or(HashTableError::Truncated { at })
}

/// Read-only view over a laid-out table.
#[derive(Debug, Clone, Copy)]
pub struct HashTableView<'a> {
    blob: &'a [u8],
    table_offset: usize,
    bucket_count: u32,
    entry_count: u32,
}

impl<'a> HashTableView<'a> {
    pub fn new(blob: &'a [u8], table_offset: u32) -> Result<Self, HashTableError> {
        let at = table_offset as usize;
        if at + HEADER_BYTES > blob.len() {
            return Err(HashTableError::BadOffset {
                offset: table_offset,
                len: blob.len(),
            });
        }
        let bucket_count = read_u32(blob, at)?;
        let entry_count = read_u32(blob, at + 4)?;
        let view = Self {
            blob,
            table_offset: at,
            bucket_count,
            entry_count,
        };
        // The bucket offset array must be present in full.
        if bucket_count == 0 {
            return Err(HashTableError::Truncated { at });
        }
        read_u32(blob, view.bucket_slot(bucket_count - 1))?;
        Ok(view)
    }

    pub fn len(&self) -> usize {
        self.entry_count as usize
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    pub fn bucket_count(&self) -> u32 {
        self.bucket_count
    }

    /// Data stored under `key`.
    pub fn get(&self, key: &[u8]) -> Result<Option<&'a [u8]>, HashTableError> {
        let hash = djb_hash(key);
        let bucket = read_u32(self.blob, self.bucket_slot(hash % self.bucket_count))?;
        if bucket == 0 {
            return Ok(None);
        }
        for item in self.bucket_items(bucket as usize)? {
            let (item_hash, item_key, data) = item;
            if item_hash == hash && item_key == key {
                return Ok(Some(data));
            }
        }
        Ok(None)
    }

    /// Every `(key, data)` pair, in bucket order.
    pub fn entries(&self) -> Result<Vec<(&'a [u8], &'a [u8])>, HashTableError> {
        let mut out = Vec::with_capacity(self.len());
        for bucket in 0..self.bucket_count {
            let offset = read_u32(self.blob, self.bucket_slot(bucket))?;
            if offset == 0 {
                continue;
            }
            out.extend(
                self.bucket_items(offset as usize)?
                    .into_iter()
                    .map(|(_, key, data)| (key, data)),
            );
        }
        Ok(out)
    }

    fn bucket_slot(&self, bucket: u32) -> usize {
        self.table_offset + HEADER_BYTES + bucket as usize * 4
    }

    fn bucket_items(&self, at: usize) -> Result<Vec<(u32, &'a [u8], &'a [u8])>, HashTableError> {
        let count = read_u32(self.blob, at)?;
        let mut pos = at + 4;
        let mut items = Vec::with_capacity(count.min(1024) as usize);
        for _ in 0..count {
            let hash = read_u32(self.blob, pos)?;
            let key_len = read_u32(self.blob, pos + 4)? as usize;
            let data_len = read_u32(self.blob, pos + 8)? as usize;
            let key_start = pos + 12;
            let data_start = key_start + key_len;
            let end = data_start + data_len;
            let key = self
                .blob
                .get(key_start..data_start)
                .ok_or(HashTableError::Truncated { at: pos })?;
            let data = self
                .blob
                .get(data_start..end)
                .ok_or(HashTableError::Truncated { at: pos })?;
            items.push((hash, key, data));
            pos = end;
        }
        Ok(items)
    }
}
