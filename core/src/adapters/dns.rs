use std::io;

use async_trait::async_trait;
use blackhole_common::resolver::Resolver;
use tokio::net::lookup_host;

/// Resolves through the platform resolver (`getaddrinfo`), like every other
/// client on the machine does.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemResolver;

#[async_trait]
impl Resolver for SystemResolver {
    async fn lookup(&self, host: &str) -> io::Result<Vec<String>> {
        let mut addresses: Vec<String> = lookup_host((host, 0))
            .await?
            .map(|socket| socket.ip().to_string())
            .collect();

        addresses.sort();
        addresses.dedup();

        if addresses.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no addresses for {host}"),
            ));
        }

        Ok(addresses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ip_literals_resolve_to_themselves() {
        let resolver = SystemResolver;
        assert_eq!(resolver.lookup("127.0.0.1").await.unwrap(), vec!["127.0.0.1"]);
        assert_eq!(resolver.lookup("::1").await.unwrap(), vec!["::1"]);
    }
}
