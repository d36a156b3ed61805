use std::fmt;

pub const TRACK_FIELD: &str = "track";
pub const ARTIST_FIELD: &str = "artist";

const KEY_SEPARATOR: char = '|';

/// One input row. Field order is the column order of the source file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WorkUnit {
    fields: Vec<(String, String)>,
}

impl WorkUnit {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn track(&self) -> &str {
        self.get(TRACK_FIELD).unwrap_or_default()
    }

    pub fn artist(&self) -> &str {
        self.get(ARTIST_FIELD).unwrap_or_default()
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    pub fn key(&self) -> UnitKey {
        UnitKey::new(self.track(), self.artist())
    }

    /// A unit can only be looked up when both identity fields carry text.
    pub fn is_queryable(&self) -> bool {
        !self.track().trim().is_empty() && !self.artist().trim().is_empty()
    }
}

/// Normalized `track|artist` identity used for resume bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UnitKey(String);

impl UnitKey {
    pub fn new(track: &str, artist: &str) -> Self {
        Self(format!(
            "{}{}{}",
            normalize_key_part(track),
            KEY_SEPARATOR,
            normalize_key_part(artist)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UnitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<UnitKey> for String {
    fn from(key: UnitKey) -> Self {
        key.0
    }
}

fn normalize_key_part(value: &str) -> String {
    value.trim().to_lowercase()
}

/// A unit's fields plus the columns derived while routing it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OutputRow {
    fields: Vec<(String, String)>,
}

impl OutputRow {
    pub fn from_unit(unit: &WorkUnit) -> Self {
        Self {
            fields: unit.fields.clone(),
        }
    }

    /// Sets a derived column. An existing column of the same name is
    /// overwritten in place so the column order stays stable.
    pub fn with(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.fields.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value,
            None => self.fields.push((name.to_string(), value)),
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(_, value)| value.as_str())
    }

    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }
}
