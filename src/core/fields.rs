//! Ordered key-value context carried by a logger handle

use std::fmt;
use std::sync::Arc;

/// Ordered sequence of `(key, value)` string pairs.
///
/// Cloning is cheap: the pairs live behind an `Arc` and are never mutated.
/// Extending always copies into a new sequence, so a parent handle keeps
/// its own view no matter how many children are derived from it.
/// Duplicate keys are kept in position and every instance is rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fields {
    pairs: Arc<Vec<(String, String)>>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a flat `[k1, v1, k2, v2, ...]` slice.
    ///
    /// A dangling key at the end of an odd-length slice is ignored.
    pub fn from_flat<S: AsRef<str>>(flat: &[S]) -> Self {
        Self::new().extended(flat)
    }

    /// Add a pair, consuming `self`.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.pairs).push((key.into(), value.into()));
        self
    }

    /// A new set holding these pairs followed by the flat `[k, v, ...]` pairs.
    #[must_use]
    pub fn extended<S: AsRef<str>>(&self, flat: &[S]) -> Self {
        if flat.len() < 2 {
            return self.clone();
        }
        let mut pairs = Vec::with_capacity(self.pairs.len() + flat.len() / 2);
        pairs.extend(self.pairs.iter().cloned());
        pairs.extend(
            flat.chunks_exact(2)
                .map(|kv| (kv[0].as_ref().to_string(), kv[1].as_ref().to_string())),
        );
        Self {
            pairs: Arc::new(pairs),
        }
    }

    /// A new set holding these pairs followed by all of `other`'s.
    #[must_use]
    pub fn concat(&self, other: &Fields) -> Self {
        if other.is_empty() {
            return self.clone();
        }
        if self.is_empty() {
            return other.clone();
        }
        let mut pairs = Vec::with_capacity(self.len() + other.len());
        pairs.extend(self.pairs.iter().cloned());
        pairs.extend(other.pairs.iter().cloned());
        Self {
            pairs: Arc::new(pairs),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Flatten back into `[k1, v1, k2, v2, ...]`.
    pub fn to_flat(&self) -> Vec<String> {
        self.pairs
            .iter()
            .flat_map(|(k, v)| [k.clone(), v.clone()])
            .collect()
    }
}

impl fmt::Display for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}={}", k, v)?;
        }
        Ok(())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            pairs: Arc::new(
                iter.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}
