//! Flat `KEY=VALUE` record files
//!
//! One field per line, split on the first `=` only. Values are raw bytes
//! since codec output is not guaranteed to be UTF-8.

/// Ordered set of fields read from or written to a record file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, Vec<u8>)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field
    pub fn with(mut self, key: &str, value: impl Into<Vec<u8>>) -> Self {
        self.fields.push((key.to_string(), value.into()));
        self
    }

    /// Parse file content. Lines without `=` are ignored.
    pub fn parse(content: &[u8]) -> Self {
        let fields = content
            .split(|&b| b == b'\n')
            .filter_map(|line| {
                let eq = line.iter().position(|&b| b == b'=')?;
                let key = String::from_utf8_lossy(&line[..eq]).into_owned();
                Some((key, line[eq + 1..].to_vec()))
            })
            .collect();
        Self { fields }
    }

    /// Serialize as `KEY=VALUE\n` lines in insertion order
    pub fn render(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (key, value) in &self.fields {
            out.extend_from_slice(key.as_bytes());
            out.push(b'=');
            out.extend_from_slice(value);
            out.push(b'\n');
        }
        out
    }

    /// Value of a field; when a key repeats the last one wins
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        self.fields
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Value of a field as text, or empty when absent
    pub fn text(&self, key: &str) -> String {
        self.get(key)
            .map(|v| String::from_utf8_lossy(v).into_owned())
            .unwrap_or_default()
    }
}
