use indexmap::IndexMap;

/// A resolved argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Integer(i32),
    Real(f64),
    Text(String),
}

impl Value {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "a boolean",
            Self::Integer(_) => "an integer",
            Self::Real(_) => "a real",
            Self::Text(_) => "text",
        }
    }
}

/// Resolved values of one parse, keyed by argument key.
///
/// Keys keep the order in which they were first stored. Storing a key again
/// replaces its value in place.
#[derive(Debug, Clone, Default)]
pub struct Values {
    entries: IndexMap<String, Value>,
}

impl Values {
    pub(crate) fn insert(&mut self, key: &str, value: Value) {
        match self.entries.get_mut(key) {
            Some(slot) => *slot = value,
            None => {
                self.entries.insert(key.to_string(), value);
            }
        }
    }

    /// Whether a value was stored for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in first-stored order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Boolean value of `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` holds a value of another type.
    pub fn bool(&self, key: &str) -> Option<bool> {
        self.typed(key, "a boolean", |v| match v {
            Value::Bool(b) => Some(*b),
            _ => None,
        })
    }

    /// Integer value of `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` holds a value of another type.
    pub fn integer(&self, key: &str) -> Option<i32> {
        self.typed(key, "an integer", |v| match v {
            Value::Integer(i) => Some(*i),
            _ => None,
        })
    }

    /// Real value of `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` holds a value of another type.
    pub fn real(&self, key: &str) -> Option<f64> {
        self.typed(key, "a real", |v| match v {
            Value::Real(r) => Some(*r),
            _ => None,
        })
    }

    /// Text value of `key`.
    ///
    /// # Panics
    ///
    /// Panics if `key` holds a value of another type.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.typed(key, "text", |v| match v {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        self.bool(key).unwrap_or(default)
    }

    pub fn integer_or(&self, key: &str, default: i32) -> i32 {
        self.integer(key).unwrap_or(default)
    }

    pub fn real_or(&self, key: &str, default: f64) -> f64 {
        self.real(key).unwrap_or(default)
    }

    pub fn text_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.text(key).unwrap_or(default)
    }

    fn typed<'a, T>(
        &'a self,
        key: &str,
        wanted: &str,
        extract: impl FnOnce(&'a Value) -> Option<T>,
    ) -> Option<T> {
        let value = self.entries.get(key)?;
        match extract(value) {
            Some(v) => Some(v),
            None => panic!(
                "argument '{key}' holds {}, not {wanted}",
                value.type_name()
            ),
        }
    }
}
