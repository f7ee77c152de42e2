//! Display models built from API documents
//!
//! Each model is read from a [`Document`] with default-on-missing semantics:
//! a partial record still renders, with empty strings and zeros in place of
//! the absent fields.

use serde::{Deserialize, Serialize};

use crate::api::{event_types, DIRECTORY_CONTENT_TYPE};
use crate::document::Document;

const GIGABYTE: u64 = 1 << 30;

/// Disk quota figures, in bytes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskQuota {
    pub avail: u64,
    pub used: u64,
    pub size: u64,
}

impl DiskQuota {
    /// The same figures in whole gigabytes (truncating)
    pub fn in_gigabytes(&self) -> DiskQuota {
        DiskQuota {
            avail: self.avail / GIGABYTE,
            used: self.used / GIGABYTE,
            size: self.size / GIGABYTE,
        }
    }
}

/// Account summary from `/account/info`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountInfo {
    pub username: String,
    pub mail: String,
    pub plan_expiration_date: String,
    pub disk: DiskQuota,
}

impl AccountInfo {
    pub fn from_document(doc: &Document) -> Self {
        let text = |key: &str| doc.get_str(&["info", key]).unwrap_or_default().to_string();
        let disk = |key: &str| doc.get_u64(&["info", "disk", key]).unwrap_or_default();

        Self {
            username: text("username"),
            mail: text("mail"),
            plan_expiration_date: text("plan_expiration_date"),
            disk: DiskQuota {
                avail: disk("avail"),
                used: disk("used"),
                size: disk("size"),
            },
        }
    }
}

/// One entry of a folder listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: i64,
    pub name: String,
    pub content_type: String,
}

impl FileEntry {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.get_i64(&["id"]).unwrap_or_default(),
            name: doc.get_str(&["name"]).unwrap_or_default().to_string(),
            content_type: doc.get_str(&["content_type"]).unwrap_or_default().to_string(),
        }
    }

    /// Entries of a `/files/list` response
    pub fn list_from(doc: &Document) -> Vec<Self> {
        doc.get_object_array(&["files"])
            .unwrap_or_default()
            .iter()
            .map(Self::from_document)
            .collect()
    }

    pub fn is_directory(&self) -> bool {
        self.content_type == DIRECTORY_CONTENT_TYPE
    }
}

/// A file entry positioned in a recursive listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeLine {
    /// Nesting depth below the folder the listing started from
    pub depth: usize,
    pub id: i64,
    pub content_type: String,
    pub name: String,
}

impl TreeLine {
    pub fn new(entry: FileEntry, depth: usize) -> Self {
        Self {
            depth,
            id: entry.id,
            content_type: entry.content_type,
            name: entry.name,
        }
    }
}

/// One transfer from `/transfers/list`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Transfer {
    pub id: i64,
    pub file_id: i64,
    pub name: String,
    pub status: String,
    pub size: u64,
    pub down_speed: u64,
    pub up_speed: u64,
    pub current_ratio: f64,
}

impl Transfer {
    pub fn from_document(doc: &Document) -> Self {
        Self {
            id: doc.get_i64(&["id"]).unwrap_or_default(),
            file_id: doc.get_i64(&["file_id"]).unwrap_or_default(),
            name: doc.get_str(&["name"]).unwrap_or_default().to_string(),
            status: doc.get_str(&["status"]).unwrap_or_default().to_string(),
            size: doc.get_u64(&["size"]).unwrap_or_default(),
            down_speed: doc.get_u64(&["down_speed"]).unwrap_or_default(),
            up_speed: doc.get_u64(&["up_speed"]).unwrap_or_default(),
            current_ratio: doc.get_f64(&["current_ratio"]).unwrap_or_default(),
        }
    }

    /// Entries of a `/transfers/list` response
    pub fn list_from(doc: &Document) -> Vec<Self> {
        doc.get_object_array(&["transfers"])
            .unwrap_or_default()
            .iter()
            .map(Self::from_document)
            .collect()
    }
}

/// One entry of the account event feed, selected by its `type` tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    TransferCompleted {
        created_at: String,
        transfer_name: String,
    },
    ZipCreated {
        created_at: String,
        zip_id: i64,
        zip_size: u64,
    },
    /// A type tag this client does not know about
    Unsupported {
        created_at: String,
        event_type: String,
        /// Field names carried by the event, sorted
        fields: Vec<String>,
    },
}

impl Event {
    pub fn from_document(doc: &Document) -> Self {
        let created_at = doc.get_str(&["created_at"]).unwrap_or_default().to_string();
        let event_type = doc.get_str(&["type"]).unwrap_or_default();

        match event_type {
            event_types::TRANSFER_COMPLETED => Event::TransferCompleted {
                created_at,
                transfer_name: doc.get_str(&["transfer_name"]).unwrap_or_default().to_string(),
            },
            event_types::ZIP_CREATED => Event::ZipCreated {
                created_at,
                zip_id: doc.get_i64(&["zip_id"]).unwrap_or_default(),
                zip_size: doc.get_u64(&["zip_size"]).unwrap_or_default(),
            },
            other => Event::Unsupported {
                created_at,
                event_type: other.to_string(),
                fields: doc.keys().into_iter().map(str::to_string).collect(),
            },
        }
    }

    /// Entries of an `/events/list` response
    pub fn list_from(doc: &Document) -> Vec<Self> {
        doc.get_object_array(&["events"])
            .unwrap_or_default()
            .iter()
            .map(Self::from_document)
            .collect()
    }

    pub fn created_at(&self) -> &str {
        match self {
            Event::TransferCompleted { created_at, .. }
            | Event::ZipCreated { created_at, .. }
            | Event::Unsupported { created_at, .. } => created_at,
        }
    }
}
