//! Free-text key/value comments

/// Ordered key/value comments.
///
/// Insertion order is kept and repeated keys are preserved as they appear in
/// the source file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Comments {
    entries: Vec<(String, String)>,
}

impl Comments {
    /// Empty comment block.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// Value of the first entry with `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Values of every entry with `key`, in order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterate over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append every pair of `other`.
    pub fn extend(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Comments {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl IntoIterator for Comments {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_and_duplicates() {
        let comments: Comments = [("NAME", "read1"), ("MACH", "ABI"), ("NAME", "read2")]
            .into_iter()
            .collect();

        assert_eq!(comments.len(), 3);
        assert_eq!(comments.get("NAME"), Some("read1"));
        assert_eq!(comments.get_all("NAME").collect::<Vec<_>>(), vec!["read1", "read2"]);
        assert_eq!(
            comments.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            vec!["NAME", "MACH", "NAME"]
        );
        assert_eq!(comments.get("DATE"), None);
    }
}
