use async_trait::async_trait;

/// Hostname to address lookups.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait Resolver: Send + Sync {
    /// Every address record of `host`, as IP literals.
    ///
    /// Fails when the lookup fails or yields nothing.
    async fn lookup(&self, host: &str) -> std::io::Result<Vec<String>>;
}
