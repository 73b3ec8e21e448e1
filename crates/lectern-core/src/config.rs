/// Trait for loading service configuration from environment variables.
///
/// Implementors derive `serde::Deserialize` (field `database_url` reads
/// `DATABASE_URL`) and call `Config::from_env()` at startup.
pub trait Config: Sized + serde::de::DeserializeOwned {
    /// Load configuration, reporting the first missing or malformed variable.
    fn try_from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    /// Load configuration from an explicit variable list. Used by tests.
    fn from_iter<I>(vars: I) -> Result<Self, envy::Error>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter(vars)
    }

    /// # Panics
    ///
    /// Panics if any required env var is missing or cannot be deserialized.
    fn from_env() -> Self {
        Self::try_from_env().expect("failed to load config from environment")
    }
}
