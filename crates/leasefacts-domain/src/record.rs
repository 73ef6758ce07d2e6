//! Fact record - the fixed-shape output of every extraction stage
//!
//! A record holds at most one value per [`FactField`]. A value is either a
//! non-empty, trimmed string or missing (`None`, serialized as `null`).
//! `property_address_and_suite` is never stored: it is computed from
//! `property_address` and `suite` whenever it is read or serialized.

use crate::field::FactField;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// A lease fact record with exactly eleven keys
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactRecord {
    values: BTreeMap<FactField, String>,
}

impl FactRecord {
    /// Create a record with every field missing
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this record with `field` set to `value`
    ///
    /// Values are trimmed; empty values become missing. Setting the derived
    /// field has no effect.
    pub fn with<V: AsRef<str>>(mut self, field: FactField, value: Option<V>) -> Self {
        if field.is_derived() {
            return self;
        }
        match value.as_ref().map(|v| v.as_ref().trim()) {
            Some(v) if !v.is_empty() => {
                self.values.insert(field, v.to_string());
            }
            _ => {
                self.values.remove(&field);
            }
        }
        self
    }

    /// Get the value of a field, computing the derived field on demand
    pub fn get(&self, field: FactField) -> Option<Cow<'_, str>> {
        if field.is_derived() {
            return self.property_address_and_suite().map(Cow::Owned);
        }
        self.values.get(&field).map(|v| Cow::Borrowed(v.as_str()))
    }

    /// `"{address} Suite {suite}"`, or whichever part is present
    pub fn property_address_and_suite(&self) -> Option<String> {
        let address = self.values.get(&FactField::PropertyAddress);
        let suite = self.values.get(&FactField::Suite);
        match (address, suite) {
            (Some(address), Some(suite)) => Some(format!("{} Suite {}", address, suite)),
            (Some(address), None) => Some(address.clone()),
            (None, Some(suite)) => Some(format!("Suite {}", suite)),
            (None, None) => None,
        }
    }

    /// Whether the field has no value
    pub fn is_missing(&self, field: FactField) -> bool {
        self.get(field).is_none()
    }

    /// Whether every field is missing
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of fields with a value, the derived field included
    pub fn len_present(&self) -> usize {
        FactField::ALL.iter().filter(|f| !self.is_missing(**f)).count()
    }

    /// Fields with a value, in canonical order
    pub fn present_fields(&self) -> Vec<FactField> {
        FactField::ALL
            .iter()
            .copied()
            .filter(|f| !self.is_missing(*f))
            .collect()
    }

    /// Fields without a value, in canonical order
    pub fn missing_fields(&self) -> Vec<FactField> {
        FactField::ALL
            .iter()
            .copied()
            .filter(|f| self.is_missing(*f))
            .collect()
    }

    /// Build a record from any partial mapping of wire keys to values
    ///
    /// Unknown keys are dropped, absent or empty values become missing, and a
    /// supplied `property_address_and_suite` is ignored in favour of the
    /// computed one.
    pub fn from_partial<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, Option<V>)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        entries
            .into_iter()
            .fold(Self::new(), |record, (key, value)| match FactField::parse(key.as_ref()) {
                Some(field) => record.with(field, value),
                None => record,
            })
    }

    /// Build a record from a JSON object
    ///
    /// Strings are taken as-is, numbers are converted to their decimal form,
    /// every other JSON value is treated as missing.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        Self::from_partial(object.iter().map(|(key, value)| {
            let value = match value {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            };
            (key, value)
        }))
    }

    /// All eleven keys with their values, in canonical order
    pub fn to_map(&self) -> BTreeMap<&'static str, Option<String>> {
        FactField::ALL
            .iter()
            .map(|f| (f.key(), self.get(*f).map(Cow::into_owned)))
            .collect()
    }
}

impl Serialize for FactRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FactField::ALL.len()))?;
        for field in FactField::ALL {
            map.serialize_entry(field.key(), &self.get(field))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FactRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        Ok(Self::from_json_object(&object))
    }
}
