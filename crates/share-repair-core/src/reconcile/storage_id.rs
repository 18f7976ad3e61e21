use crate::error::Error;

/// A storage identifier split into its backend kind and owning user,
/// e.g. `home::alice` → (`home::`, `alice`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageIdentifier {
    pub backend: String,
    pub owner: String,
}

impl StorageIdentifier {
    /// Resolve `raw` against the known backend prefixes. The longest
    /// matching prefix wins; an unknown prefix or an empty owner is
    /// [`Error::MalformedIdentifier`].
    pub fn resolve<S: AsRef<str>>(raw: &str, prefixes: &[S]) -> Result<Self, Error> {
        let backend = prefixes
            .iter()
            .map(|p| p.as_ref())
            .filter(|p| !p.is_empty() && raw.starts_with(p))
            .max_by_key(|p| p.len())
            .ok_or_else(|| Error::MalformedIdentifier(raw.to_string()))?;

        let owner = &raw[backend.len()..];
        if owner.is_empty() {
            return Err(Error::MalformedIdentifier(raw.to_string()));
        }

        Ok(Self {
            backend: backend.to_string(),
            owner: owner.to_string(),
        })
    }
}
