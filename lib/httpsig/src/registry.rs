use miette::Diagnostic;
use std::{collections::HashMap, fmt, sync::Arc};
use thiserror::Error;

/// Anything that can be registered under a name
pub trait Algorithm {
    /// Name the algorithm is registered and looked up under
    fn name(&self) -> &str;
}

/// Lookup miss
#[derive(Debug, Diagnostic, Error)]
#[error("unsupported algorithm '{0}'")]
pub struct UnsupportedAlgorithm(pub String);

/// Name-keyed algorithm registry with a default selection
///
/// Names are matched ASCII case-insensitively.
/// Meant to be populated once during setup and only read afterwards.
pub struct Registry<A: ?Sized> {
    algorithms: HashMap<String, Arc<A>>,
    default: Option<String>,
}

impl<A> Registry<A>
where
    A: Algorithm + ?Sized,
{
    /// Construct an empty registry without a default
    #[must_use]
    pub fn new() -> Self {
        Self {
            algorithms: HashMap::new(),
            default: None,
        }
    }

    /// Register an algorithm, returning the one it replaced (if any)
    pub fn register(&mut self, algorithm: Arc<A>) -> Option<Arc<A>> {
        let name = algorithm.name().to_ascii_uppercase();
        self.algorithms.insert(name, algorithm)
    }

    /// Look up an algorithm by its name
    pub fn get(&self, name: &str) -> Result<&Arc<A>, UnsupportedAlgorithm> {
        self.algorithms
            .get(&name.to_ascii_uppercase())
            .ok_or_else(|| UnsupportedAlgorithm(name.to_owned()))
    }

    /// Select the default algorithm
    ///
    /// Leaves the previous default untouched if the name isn't registered
    pub fn set_default(&mut self, name: &str) -> Result<(), UnsupportedAlgorithm> {
        let key = name.to_ascii_uppercase();
        if !self.algorithms.contains_key(&key) {
            return Err(UnsupportedAlgorithm(name.to_owned()));
        }

        self.default = Some(key);
        Ok(())
    }

    /// Name of the default algorithm
    #[must_use]
    pub fn default_name(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// The default algorithm
    #[must_use]
    pub fn default_algorithm(&self) -> Option<&Arc<A>> {
        self.default
            .as_ref()
            .and_then(|name| self.algorithms.get(name))
    }

    /// Names of all registered algorithms, in no particular order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.algorithms.values().map(|algorithm| algorithm.name())
    }
}

impl<A> Default for Registry<A>
where
    A: Algorithm + ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for Registry<A>
where
    A: Algorithm + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("algorithms", &self.algorithms.keys().collect::<Vec<_>>())
            .field("default", &self.default)
            .finish()
    }
}
