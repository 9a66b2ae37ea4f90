//! # Hickory Name Resolver
//!
//! CNAME lookups for DNS4 multiaddr hosts.
//!
//! A name with no CNAME record is its own canonical name, provided it
//! resolves at all; this matches the usual `LookupCNAME` semantics of stub
//! resolvers.

use async_trait::async_trait;
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::proto::rr::{RData, RecordType};
use hickory_resolver::Resolver;
use tracing::{debug, warn};

use crate::error::ResolveError;
use crate::ports::NameResolver;

/// [`NameResolver`] backed by hickory-resolver.
///
/// Construction never fails: when the system configuration cannot be read,
/// every lookup reports `NoResolver` and only DNS4 descriptors are affected.
pub struct HickoryNameResolver {
    resolver: Result<Resolver<TokioConnectionProvider>, String>,
}

impl HickoryNameResolver {
    /// Use the host's resolver configuration (`/etc/resolv.conf` on Unix).
    pub fn from_system_conf() -> Self {
        let resolver = match Resolver::builder_tokio() {
            Ok(builder) => Ok(builder.build()),
            Err(e) => {
                warn!(error = %e, "System resolver configuration unavailable");
                Err(e.to_string())
            }
        };
        Self { resolver }
    }
}

#[async_trait]
impl NameResolver for HickoryNameResolver {
    async fn lookup_cname(&self, host: &str) -> Result<String, ResolveError> {
        let resolver = self
            .resolver
            .as_ref()
            .map_err(|reason| ResolveError::NoResolver(reason.clone()))?;

        match resolver.lookup(host, RecordType::CNAME).await {
            Ok(lookup) => {
                if let Some(canonical) = first_cname(lookup.iter()) {
                    debug!(host, %canonical, "CNAME lookup completed");
                    return Ok(canonical);
                }
            }
            Err(e) => {
                debug!(host, error = %e, "No CNAME record, checking address records");
            }
        }

        let addresses = resolver
            .lookup_ip(host)
            .await
            .map(|lookup| lookup.iter().count())
            .map_err(|e| e.to_string());
        self_canonical(host, addresses)
    }
}

/// Target of the first CNAME record in an answer, ignoring other record types.
fn first_cname<'a>(records: impl IntoIterator<Item = &'a RData>) -> Option<String> {
    records.into_iter().find_map(|rdata| match rdata {
        RData::CNAME(cname) => Some(cname.0.to_utf8()),
        _ => None,
    })
}

/// A host without a CNAME is its own canonical name only if it has addresses.
fn self_canonical(host: &str, addresses: Result<usize, String>) -> Result<String, ResolveError> {
    match addresses {
        Ok(0) => Err(ResolveError::NotFound),
        Ok(_) => Ok(host.to_string()),
        Err(reason) => Err(ResolveError::Lookup(reason)),
    }
}
