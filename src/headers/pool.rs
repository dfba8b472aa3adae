use crate::config::compute_source_hash;
use crate::headers::parser::parse_header_line;
use crate::{ConfigError, ConfigResult, HeaderError};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};

/// One simulated client identity: an immutable set of request headers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSet {
    headers: HeaderMap,
}

impl HeaderSet {
    /// Builds a header set from `(name, value)` pairs
    ///
    /// Later pairs replace earlier pairs with the same (case-insensitive) name.
    ///
    /// # Returns
    ///
    /// * `Ok(HeaderSet)` - All names and values are valid HTTP header tokens
    /// * `Err(String)` - Description of the first invalid name or value
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            let name = name.as_ref();
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| format!("invalid header name '{}'", name))?;
            let header_value = HeaderValue::from_str(value.as_ref())
                .map_err(|_| format!("invalid value for header '{}'", name))?;
            headers.insert(header_name, header_value);
        }
        Ok(Self { headers })
    }

    /// Returns the value of a header, if present and visible ASCII
    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// The headers in the form the HTTP client consumes
    pub fn header_map(&self) -> &HeaderMap {
        &self.headers
    }
}

/// Pool of request identities loaded once at startup
///
/// The pool is read-only after construction and can be shared between
/// concurrent jobs behind an `Arc`. Selection is uniform over the loaded sets
/// and driven by an injectable random source, so tests can supply a seeded or
/// scripted generator.
pub struct HeaderPool {
    sets: Vec<Arc<HeaderSet>>,
    rng: Mutex<Box<dyn RngCore + Send>>,
    source_hash: Option<String>,
}

impl HeaderPool {
    /// Creates a pool drawing from an entropy-seeded generator
    pub fn new(sets: Vec<HeaderSet>) -> Self {
        Self::with_rng(sets, StdRng::from_entropy())
    }

    /// Creates a pool drawing from the given generator
    ///
    /// # Example
    ///
    /// ```
    /// use rand::rngs::StdRng;
    /// use rand::SeedableRng;
    /// use sumi_scrape::headers::{HeaderPool, HeaderSet};
    ///
    /// let set = HeaderSet::from_pairs([("User-Agent", "Bot/1.0")]).unwrap();
    /// let pool = HeaderPool::with_rng(vec![set], StdRng::seed_from_u64(7));
    /// assert_eq!(pool.next().unwrap().get("user-agent"), Some("Bot/1.0"));
    /// ```
    pub fn with_rng<R>(sets: Vec<HeaderSet>, rng: R) -> Self
    where
        R: RngCore + Send + 'static,
    {
        Self {
            sets: sets.into_iter().map(Arc::new).collect(),
            rng: Mutex::new(Box::new(rng)),
            source_hash: None,
        }
    }

    /// Loads a pool from a header identity file
    ///
    /// # Arguments
    ///
    /// * `path` - File with one dictionary-literal mapping per line
    ///
    /// # Returns
    ///
    /// * `Ok(HeaderPool)` - Every non-blank line parsed into a valid header set
    /// * `Err(ConfigError)` - The file is unreadable or a line is malformed
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let sets = parse_header_source(&content)?;
        let hash = compute_source_hash(&content);

        tracing::info!(
            "Loaded {} header sets from {} (sha256: {})",
            sets.len(),
            path.display(),
            hash
        );

        let mut pool = Self::new(sets);
        pool.source_hash = Some(hash);
        Ok(pool)
    }

    /// Draws one header set uniformly at random
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<HeaderSet>)` - The chosen identity
    /// * `Err(HeaderError::EmptyPool)` - Nothing was loaded
    pub fn next(&self) -> Result<Arc<HeaderSet>, HeaderError> {
        if self.sets.is_empty() {
            return Err(HeaderError::EmptyPool);
        }

        let index = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            rng.gen_range(0..self.sets.len())
        };

        Ok(Arc::clone(&self.sets[index]))
    }

    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// SHA-256 of the file the pool was loaded from, if any
    pub fn source_hash(&self) -> Option<&str> {
        self.source_hash.as_deref()
    }

    /// All loaded header sets in file order
    pub fn sets(&self) -> impl Iterator<Item = &HeaderSet> {
        self.sets.iter().map(|set| set.as_ref())
    }
}

impl fmt::Debug for HeaderPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeaderPool")
            .field("sets", &self.sets.len())
            .field("source_hash", &self.source_hash)
            .finish()
    }
}

/// Parses the full content of a header identity file
///
/// Blank lines are skipped. Any other line must be a valid mapping; the first
/// bad line aborts the load with its 1-based line number.
pub fn parse_header_source(content: &str) -> ConfigResult<Vec<HeaderSet>> {
    let mut sets = Vec::new();

    for (index, line) in content.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }

        let pairs = parse_header_line(line).map_err(|message| ConfigError::HeaderLine {
            line: line_number,
            message,
        })?;

        let set = HeaderSet::from_pairs(pairs).map_err(|message| ConfigError::InvalidHeader {
            line: line_number,
            message,
        })?;

        sets.push(set);
    }

    Ok(sets)
}
