use crate::error::ResolveError;
use crate::memo::Memo;
use async_trait::async_trait;

/// Result of a federation lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved {
    pub account_id: String,
    pub memo: Option<Memo>,
}

/// The federation protocol seam. The HTTP transport lives behind this trait.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self, address: &str) -> Result<Resolved, ResolveError>;
}

/// Whether `address` is syntactically a `name*domain` federated address.
///
/// The domain must look like a real hostname with a top-level domain, so
/// `bob*example` does not count while `bob*example.co` does.
pub fn is_federated_address(address: &str) -> bool {
    let Some((name, domain)) = address.split_once('*') else {
        return false;
    };
    !name.is_empty() && is_hostname_with_tld(domain)
}

fn is_hostname_with_tld(domain: &str) -> bool {
    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let label_ok = |label: &&str| {
        !label.is_empty()
            && label
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    };
    if !labels.iter().all(label_ok) {
        return false;
    }
    let tld = labels[labels.len() - 1];
    tld.len() >= 2 && tld.bytes().all(|b| b.is_ascii_alphabetic())
}
