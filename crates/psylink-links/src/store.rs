use std::collections::HashSet;

use psylink_core::models::link::{LinkRecord, LinkStatus};
use psylink_core::storage_keys;
use psylink_storage::state::save_state;
use psylink_storage::{ChangeBus, ChangeDomain, KeyValueStore, SharedStore};
use serde_json::Value;

use crate::error::LinkError;

/// The `test_links` collection.
///
/// Mutations work on the stored entries as raw JSON, so an entry this build
/// cannot decode is carried through untouched rather than dropped. Each one is
/// a whole-list read-modify-write followed by a [`ChangeDomain::Links`]
/// signal. Concurrent writers race; the last one wins.
#[derive(Clone)]
pub struct LinkStore {
    store: SharedStore,
    bus: ChangeBus,
    base_url: String,
}

impl LinkStore {
    pub fn new(store: SharedStore, bus: ChangeBus, base_url: impl Into<String>) -> Self {
        Self {
            store,
            bus,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Every stored entry as-is. Empty when the key is missing; an error when
    /// it holds invalid JSON or anything but an array.
    pub fn load_raw(&self) -> Result<Vec<Value>, LinkError> {
        let Some(text) = self.store.get(storage_keys::LINKS)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&text) {
            Ok(Value::Array(entries)) => Ok(entries),
            Ok(_) => Err(LinkError::Corrupt("expected a JSON array".to_string())),
            Err(e) => Err(LinkError::Corrupt(e.to_string())),
        }
    }

    /// The links that decode. Undecodable entries are skipped with a warning;
    /// an unreadable collection reads as empty.
    pub fn load(&self) -> Vec<LinkRecord> {
        let raw = match self.load_raw() {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(error = %e, "links unreadable, using empty list");
                return Vec::new();
            }
        };
        raw.into_iter()
            .filter_map(|value| match serde_json::from_value(value) {
                Ok(link) => Some(link),
                Err(e) => {
                    tracing::warn!(error = %e, "skipping unreadable link entry");
                    None
                }
            })
            .collect()
    }

    /// Ids of every stored entry, decodable or not.
    pub fn ids(&self) -> Result<HashSet<String>, LinkError> {
        Ok(self
            .load_raw()?
            .iter()
            .filter_map(entry_id)
            .map(str::to_string)
            .collect())
    }

    fn persist(&self, entries: &[Value]) -> Result<(), LinkError> {
        save_state(self.store.as_ref(), storage_keys::LINKS, entries)?;
        self.bus.notify(ChangeDomain::Links);
        Ok(())
    }

    /// Append `records` after the existing entries in a single write.
    pub fn append(&self, records: &[LinkRecord]) -> Result<usize, LinkError> {
        if records.is_empty() {
            return Ok(0);
        }
        let mut raw = self.load_raw()?;
        for record in records {
            raw.push(serde_json::to_value(record)?);
        }
        self.persist(&raw)?;
        tracing::info!(added = records.len(), total = raw.len(), "links appended");
        Ok(records.len())
    }

    /// Mint `quantity` fresh `unused` links for one questionnaire type.
    pub fn add_links(
        &self,
        questionnaire_type: &str,
        quantity: usize,
        created_by: Option<&str>,
    ) -> Result<Vec<LinkRecord>, LinkError> {
        let minted: Vec<LinkRecord> = (0..quantity)
            .map(|_| {
                LinkRecord::mint(
                    &self.base_url,
                    questionnaire_type,
                    created_by.map(str::to_string),
                )
            })
            .collect();
        self.append(&minted)?;
        Ok(minted)
    }

    pub fn get(&self, id: &str) -> Option<LinkRecord> {
        self.load().into_iter().find(|link| link.id == id)
    }

    pub fn get_by_url(&self, url: &str) -> Option<LinkRecord> {
        self.load().into_iter().find(|link| link.url == url)
    }

    /// Consume a link for a completed assessment. Returns `false` if the link
    /// is missing or no longer `unused`.
    pub fn use_link(&self, id: &str, report_id: Option<&str>) -> Result<bool, LinkError> {
        let mut raw = self.load_raw()?;
        let Some(entry) = raw.iter_mut().find(|entry| entry_id(entry) == Some(id)) else {
            return Ok(false);
        };
        let mut link: LinkRecord = serde_json::from_value(entry.clone())?;
        if link.status != LinkStatus::Unused {
            return Ok(false);
        }
        link.transition(LinkStatus::Used, jiff::Timestamp::now())?;
        if let Some(report_id) = report_id {
            link.report_id = Some(report_id.to_string());
        }
        write_back(entry, &link)?;
        self.persist(&raw)?;
        Ok(true)
    }

    /// Administrative status change, subject to the link lifecycle.
    pub fn update_status(
        &self,
        id: &str,
        status: LinkStatus,
        report_id: Option<&str>,
    ) -> Result<LinkRecord, LinkError> {
        let mut raw = self.load_raw()?;
        let entry = raw
            .iter_mut()
            .find(|entry| entry_id(entry) == Some(id))
            .ok_or_else(|| LinkError::NotFound(id.to_string()))?;
        let mut link: LinkRecord = serde_json::from_value(entry.clone())?;
        link.transition(status, jiff::Timestamp::now())?;
        if status == LinkStatus::Used
            && let Some(report_id) = report_id
        {
            link.report_id = Some(report_id.to_string());
        }
        write_back(entry, &link)?;
        self.persist(&raw)?;
        Ok(link)
    }

    pub fn delete(&self, id: &str) -> Result<bool, LinkError> {
        let mut raw = self.load_raw()?;
        let before = raw.len();
        raw.retain(|entry| entry_id(entry) != Some(id));
        if raw.len() == before {
            return Ok(false);
        }
        self.persist(&raw)?;
        Ok(true)
    }
}

fn entry_id(entry: &Value) -> Option<&str> {
    entry.get("id").and_then(Value::as_str)
}

/// Overlay the encoded `link` onto its stored entry, keeping fields it does
/// not know about.
fn write_back(entry: &mut Value, link: &LinkRecord) -> Result<(), LinkError> {
    match (entry, serde_json::to_value(link)?) {
        (Value::Object(existing), Value::Object(fields)) => existing.extend(fields),
        (entry, updated) => *entry = updated,
    }
    Ok(())
}
