//! Typed records produced by ingestion

use chrono::NaiveDate;
use std::collections::HashMap;
use std::fmt;

/// A coerced field value
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Integer(i32),
    Long(i64),
    Double(f64),
    Boolean(bool),
    Date(NaiveDate),
    /// Identifying text of a referenced entity
    Reference(String),
    List(Vec<Value>),
}

impl Value {
    /// Elements of a list value, or the value itself as a one-element slice
    pub fn elements(&self) -> &[Value] {
        match self {
            Self::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// Text used when the value names a resource
    pub fn identifying_text(&self) -> String {
        match self {
            Self::String(s) | Self::Reference(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) | Self::Reference(s) => f.write_str(s),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Long(v) => write!(f, "{}", v),
            Self::Double(v) => write!(f, "{}", v),
            Self::Boolean(v) => write!(f, "{}", v),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                Ok(())
            }
        }
    }
}

/// One ingested row: field name to value, unset fields are absent
///
/// Records are built once through [`RecordBuilder`] and never mutated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    values: HashMap<String, Value>,
}

impl Record {
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn is_set(&self, field: &str) -> bool {
        self.values.contains_key(field)
    }

    /// Number of set fields
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct RecordBuilder {
    values: HashMap<String, Value>,
}

impl RecordBuilder {
    pub fn set(&mut self, field: impl Into<String>, value: Value) -> &mut Self {
        self.values.insert(field.into(), value);
        self
    }

    pub fn with(mut self, field: impl Into<String>, value: Value) -> Self {
        self.set(field, value);
        self
    }

    pub fn build(self) -> Record {
        Record {
            values: self.values,
        }
    }
}
