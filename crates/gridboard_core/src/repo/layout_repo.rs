//! Layout record persistence over a key-value store.
//!
//! # Responsibility
//! - Encode/decode the single layout record stored under one fixed key.
//! - Probe store availability before every access.
//! - Resolve a user's layout, falling back to defaults with a typed reason.
//!
//! # Invariants
//! - Decoding checks type and enum of every field of every widget; a record
//!   failing any check is never returned.
//! - `layout_for` never returns an error; failures become fallbacks.

use crate::config::LayoutConfig;
use crate::model::layout::LayoutRecord;
use crate::model::widget::{default_widgets, GridPosition, Widget, WidgetSize, WidgetType};
use crate::storage::{KeyValueStore, StorageError};
use log::{debug, info, warn};
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Layout persistence error.
#[derive(Debug)]
pub enum RepoError {
    /// Availability probe failed.
    Unavailable,
    Storage(StorageError),
    /// Stored text is not JSON, or the record could not be encoded.
    Json(serde_json::Error),
    /// Stored JSON does not match the record schema.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable => write!(f, "layout storage is unavailable"),
            Self::Storage(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "layout json error: {err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted layout data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::Unavailable | Self::InvalidData(_) => None,
        }
    }
}

impl From<StorageError> for RepoError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Why a lookup produced the default layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    StorageUnavailable,
    NoRecord,
    InvalidRecord,
    ForeignUser,
    VersionMismatch,
}

impl FallbackReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StorageUnavailable => "storage_unavailable",
            Self::NoRecord => "no_record",
            Self::InvalidRecord => "invalid_record",
            Self::ForeignUser => "foreign_user",
            Self::VersionMismatch => "version_mismatch",
        }
    }
}

/// Result of resolving one user's layout.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutLookup {
    Stored(Vec<Widget>),
    Default {
        widgets: Vec<Widget>,
        reason: FallbackReason,
    },
}

impl LayoutLookup {
    fn fallback(reason: FallbackReason) -> Self {
        Self::Default {
            widgets: default_widgets(),
            reason,
        }
    }

    pub fn widgets(&self) -> &[Widget] {
        match self {
            Self::Stored(widgets) | Self::Default { widgets, .. } => widgets,
        }
    }

    pub fn into_widgets(self) -> Vec<Widget> {
        match self {
            Self::Stored(widgets) | Self::Default { widgets, .. } => widgets,
        }
    }

    pub fn fallback_reason(&self) -> Option<FallbackReason> {
        match self {
            Self::Stored(_) => None,
            Self::Default { reason, .. } => Some(*reason),
        }
    }
}

/// Persistence adapter for the layout record.
pub struct LayoutRepository<S: KeyValueStore> {
    store: S,
    storage_key: String,
    storage_version: String,
}

impl<S: KeyValueStore> LayoutRepository<S> {
    pub fn new(store: S, config: &LayoutConfig) -> Self {
        Self {
            store,
            storage_key: config.storage_key.clone(),
            storage_version: config.storage_version.clone(),
        }
    }

    /// Returns whether a throwaway write/delete succeeds.
    pub fn is_available(&self) -> bool {
        self.store.probe_available()
    }

    pub fn storage_version(&self) -> &str {
        &self.storage_version
    }

    /// Reads and validates the stored record, whoever owns it.
    ///
    /// Returns `Ok(None)` when no record is stored.
    pub fn load_record(&self) -> RepoResult<Option<LayoutRecord>> {
        let raw = match self.read_raw()? {
            Some(raw) => raw,
            None => return Ok(None),
        };
        let value: Value = serde_json::from_str(&raw)?;
        parse_layout_record(&value).map(Some)
    }

    /// Writes `record` over any existing one. Returns the encoded byte size.
    pub fn save_record(&self, record: &LayoutRecord) -> RepoResult<usize> {
        self.ensure_available()?;
        let encoded = serde_json::to_string(record)?;
        self.store.set(&self.storage_key, &encoded)?;
        Ok(encoded.len())
    }

    pub fn remove_record(&self) -> RepoResult<()> {
        self.ensure_available()?;
        self.store.remove(&self.storage_key)?;
        Ok(())
    }

    /// Byte size of the stored record text, `0` when none is stored.
    pub fn stored_size(&self) -> RepoResult<usize> {
        Ok(self.read_raw()?.map_or(0, |raw| raw.len()))
    }

    /// Resolves `user_id`'s layout, falling back to defaults.
    ///
    /// # Side effects
    /// - Emits a `warn` diagnostic for unavailable storage, unreadable or
    ///   invalid records, and version mismatches.
    pub fn layout_for(&self, user_id: &str) -> LayoutLookup {
        let record = match self.load_record() {
            Ok(Some(record)) => record,
            Ok(None) => return LayoutLookup::fallback(FallbackReason::NoRecord),
            Err(RepoError::Unavailable) => {
                return fallback_with_warning(FallbackReason::StorageUnavailable, "")
            }
            Err(err) => {
                return fallback_with_warning(
                    FallbackReason::InvalidRecord,
                    &format!(" error={err}"),
                )
            }
        };

        if record.user_id != user_id {
            debug!(
                "event=layout_load module=repo status=fallback reason={}",
                FallbackReason::ForeignUser.as_str()
            );
            return LayoutLookup::fallback(FallbackReason::ForeignUser);
        }

        if record.version != self.storage_version {
            return fallback_with_warning(
                FallbackReason::VersionMismatch,
                &format!(
                    " stored={} expected={}",
                    record.version, self.storage_version
                ),
            );
        }

        info!(
            "event=layout_load module=repo status=ok widget_count={}",
            record.widgets.len()
        );
        LayoutLookup::Stored(record.widgets)
    }

    /// Timestamp of the stored record when it is valid and owned by `user_id`.
    pub fn last_updated_for(&self, user_id: &str) -> Option<i64> {
        match self.load_record() {
            Ok(Some(record)) if record.user_id == user_id => Some(record.last_updated),
            Ok(_) => None,
            Err(err) => {
                debug!(
                    "event=layout_last_updated module=repo status=unavailable error={}",
                    err
                );
                None
            }
        }
    }

    fn ensure_available(&self) -> RepoResult<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(RepoError::Unavailable)
        }
    }

    fn read_raw(&self) -> RepoResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.store.get(&self.storage_key)?)
    }
}

fn fallback_with_warning(reason: FallbackReason, detail: &str) -> LayoutLookup {
    warn!(
        "event=layout_load module=repo status=fallback reason={}{detail}",
        reason.as_str()
    );
    LayoutLookup::fallback(reason)
}

fn parse_layout_record(value: &Value) -> RepoResult<LayoutRecord> {
    let object = as_object(value, "record")?;
    let user_id = string_field(object, "userId", "record")?;
    let last_updated = number_field(object, "lastUpdated", "record")?;
    let version = string_field(object, "version", "record")?;
    let widgets = object
        .get("widgets")
        .and_then(Value::as_array)
        .ok_or_else(|| invalid("record.widgets must be an array"))?
        .iter()
        .enumerate()
        .map(|(index, widget)| parse_widget(index, widget))
        .collect::<RepoResult<Vec<_>>>()?;

    Ok(LayoutRecord {
        user_id,
        widgets,
        last_updated,
        version,
    })
}

fn parse_widget(index: usize, value: &Value) -> RepoResult<Widget> {
    let path = format!("widgets[{index}]");
    let object = as_object(value, &path)?;
    let id = string_field(object, "id", &path)?;
    let type_text = string_field(object, "type", &path)?;
    let kind = WidgetType::parse(&type_text)
        .ok_or_else(|| invalid(format!("{path}.type has unknown value `{type_text}`")))?;
    let title = string_field(object, "title", &path)?;

    let position_path = format!("{path}.position");
    let position = object
        .get("position")
        .ok_or_else(|| invalid(format!("{position_path} is missing")))?;
    let position = as_object(position, &position_path)?;
    let position = GridPosition::new(
        integer_field(position, "row", &position_path)?,
        integer_field(position, "col", &position_path)?,
    );

    let size_path = format!("{path}.size");
    let size = object
        .get("size")
        .ok_or_else(|| invalid(format!("{size_path} is missing")))?;
    let size = as_object(size, &size_path)?;
    let size = WidgetSize {
        width: finite_field(size, "width", &size_path)?,
        height: finite_field(size, "height", &size_path)?,
    };

    Ok(Widget {
        id,
        kind,
        title,
        position,
        size,
    })
}

fn as_object<'a>(value: &'a Value, path: &str) -> RepoResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| invalid(format!("{path} must be an object")))
}

fn string_field(object: &Map<String, Value>, field: &str, path: &str) -> RepoResult<String> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| invalid(format!("{path}.{field} must be a string")))
}

/// Any finite JSON number; fractional milliseconds are truncated.
fn number_field(object: &Map<String, Value>, field: &str, path: &str) -> RepoResult<i64> {
    match object.get(field).and_then(Value::as_i64) {
        Some(number) => Ok(number),
        None => finite_field(object, field, path).map(|number| number as i64),
    }
}

fn integer_field(object: &Map<String, Value>, field: &str, path: &str) -> RepoResult<i64> {
    object
        .get(field)
        .and_then(Value::as_i64)
        .ok_or_else(|| invalid(format!("{path}.{field} must be an integer")))
}

fn finite_field(object: &Map<String, Value>, field: &str, path: &str) -> RepoResult<f64> {
    object
        .get(field)
        .and_then(Value::as_f64)
        .filter(|number| number.is_finite())
        .ok_or_else(|| invalid(format!("{path}.{field} must be a number")))
}

fn invalid(message: impl Into<String>) -> RepoError {
    RepoError::InvalidData(message.into())
}
