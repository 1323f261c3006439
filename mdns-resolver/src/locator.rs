//! Target and locator parsing.
//!
//! A target looks like `mdns://_svc._tcp/instance1.local`: the authority names the
//! service and the endpoint is `<instance>.<domain>` with exactly one separator.

use std::fmt;
use shared::protocol::DOMAIN_SEPARATOR;
use crate::error::ResolverError;

/// A dial target as handed over by the host, before locator validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub scheme: String,
    pub authority: String,
    pub endpoint: String,
}

impl Target {
    pub fn new(
        scheme: impl Into<String>,
        authority: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            authority: authority.into(),
            endpoint: endpoint.into(),
        }
    }

    /// Split `scheme://authority/endpoint` into its components.
    pub fn parse(uri: &str) -> Result<Self, ResolverError> {
        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| ResolverError::InvalidLocator(format!("missing scheme in {uri:?}")))?;
        let (authority, endpoint) = rest
            .split_once('/')
            .ok_or_else(|| ResolverError::InvalidLocator(format!("missing endpoint in {uri:?}")))?;

        Ok(Self::new(scheme, authority, endpoint))
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.authority, self.endpoint)
    }
}

/// A validated service locator. All three fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    instance_name: String,
    service_name: String,
    domain: String,
}

impl Locator {
    pub fn parse(authority: &str, endpoint: &str) -> Result<Self, ResolverError> {
        if authority.is_empty() {
            return Err(ResolverError::InvalidLocator("empty authority".to_string()));
        }
        if endpoint.is_empty() {
            return Err(ResolverError::InvalidLocator("empty endpoint".to_string()));
        }

        let parts: Vec<&str> = endpoint.split(DOMAIN_SEPARATOR).collect();
        match parts.as_slice() {
            [instance, domain] if !instance.is_empty() && !domain.is_empty() => Ok(Self {
                instance_name: instance.to_string(),
                service_name: authority.to_string(),
                domain: domain.to_string(),
            }),
            _ => Err(ResolverError::InvalidLocator(format!(
                "endpoint {endpoint:?} is not <instance>{DOMAIN_SEPARATOR}<domain>"
            ))),
        }
    }

    pub fn from_target(target: &Target) -> Result<Self, ResolverError> {
        Self::parse(&target.authority, &target.endpoint)
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Fully qualified service type to browse, e.g. "_svc._tcp.local."
    pub fn service_type(&self) -> String {
        format!("{}.{}.", self.service_name, self.domain)
    }

    /// Fully qualified instance name, e.g. "instance1._svc._tcp.local."
    pub fn fullname(&self) -> String {
        format!("{}.{}", self.instance_name, self.service_type())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.instance_name, self.service_name, self.domain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_locator() {
        let locator = Locator::parse("_myservice._tcp", "instance1.local").unwrap();

        assert_eq!(locator.instance_name(), "instance1");
        assert_eq!(locator.service_name(), "_myservice._tcp");
        assert_eq!(locator.domain(), "local");
        assert_eq!(locator.service_type(), "_myservice._tcp.local.");
        assert_eq!(locator.fullname(), "instance1._myservice._tcp.local.");
    }

    #[test]
    fn test_parse_rejects_missing_parts() {
        assert!(matches!(
            Locator::parse("", "instance1.local"),
            Err(ResolverError::InvalidLocator(_))
        ));
        assert!(matches!(
            Locator::parse("_svc._tcp", ""),
            Err(ResolverError::InvalidLocator(_))
        ));
    }

    #[test]
    fn test_parse_rejects_wrong_separator_count() {
        for endpoint in ["instance1", "instance1.sub.local", "a.b.c.d"] {
            let result = Locator::parse("_svc._tcp", endpoint);
            assert!(
                matches!(result, Err(ResolverError::InvalidLocator(_))),
                "{endpoint} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_rejects_empty_segments() {
        for endpoint in [".local", "instance1.", "."] {
            assert!(Locator::parse("_svc._tcp", endpoint).is_err(), "{endpoint} should be rejected");
        }
    }

    #[test]
    fn test_target_parse() {
        let target = Target::parse("mdns://_svc._tcp/instance1.local").unwrap();
        assert_eq!(target, Target::new("mdns", "_svc._tcp", "instance1.local"));
        assert_eq!(target.to_string(), "mdns://_svc._tcp/instance1.local");

        let locator = Locator::from_target(&target).unwrap();
        assert_eq!(locator.to_string(), "instance1._svc._tcp.local");
    }

    #[test]
    fn test_target_parse_allows_empty_authority() {
        let target = Target::parse("mdns:///instance1.local").unwrap();
        assert_eq!(target.authority, "");
        assert!(Locator::from_target(&target).is_err());
    }

    #[test]
    fn test_target_parse_rejects_malformed_uri() {
        assert!(Target::parse("_svc._tcp/instance1.local").is_err());
        assert!(Target::parse("mdns://_svc._tcp").is_err());
    }
}
