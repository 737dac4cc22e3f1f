/// Hostnames considered compliant egress targets. Entries starting with
/// `*.` trust any subdomain of the suffix. Config may append to this list
/// but never remove from it.
pub const DEFAULT_TRUSTED_DOMAINS: [&str; 8] = [
    "api.openai.com",
    "api.anthropic.com",
    "generativelanguage.googleapis.com",
    "api.stripe.com",
    "api.twilio.com",
    "*.fhir.org",
    "localhost",
    "127.0.0.1",
];

/// Allow-list of egress hostnames, built once per engine.
#[derive(Debug, Clone)]
pub struct TrustedDomains {
    entries: Vec<String>,
}

impl Default for TrustedDomains {
    fn default() -> Self {
        Self {
            entries: DEFAULT_TRUSTED_DOMAINS
                .iter()
                .map(|d| d.to_string())
                .collect(),
        }
    }
}

impl TrustedDomains {
    /// Built-in list plus extra entries from configuration.
    pub fn with_extra(extra: &[String]) -> Self {
        let mut trusted = Self::default();
        trusted
            .entries
            .extend(extra.iter().map(|d| d.to_lowercase()));
        trusted
    }

    /// True when the URL's hostname is on the allow-list, exactly or via a
    /// `*.` wildcard suffix. An unparseable URL is never trusted.
    pub fn is_trusted(&self, url: &str) -> bool {
        let Some(hostname) = extract_hostname(url) else {
            return false;
        };
        self.entries.iter().any(|trusted| {
            if let Some(suffix) = trusted.strip_prefix("*.") {
                hostname.ends_with(&format!(".{}", suffix))
            } else {
                hostname == *trusted
            }
        })
    }
}

/// Lowercased hostname of an http(s)/ws(s) URL, without port, path, or
/// userinfo. Returns None for anything that does not look like a URL.
pub fn extract_hostname(url: &str) -> Option<String> {
    let rest = url.split_once("://").map(|(_, r)| r)?;
    let authority = rest.split(['/', '?', '#']).next()?;
    let host_port = authority.rsplit('@').next()?;
    let host = host_port.split(':').next()?;
    if host.is_empty() {
        return None;
    }
    Some(host.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let trusted = TrustedDomains::default();
        assert!(trusted.is_trusted("https://api.openai.com/v1/chat/completions"));
        assert!(trusted.is_trusted("http://localhost:4000/api/data"));
        assert!(trusted.is_trusted("http://127.0.0.1:3000/x"));
        assert!(!trusted.is_trusted("https://evil.example.com/collect"));
    }

    #[test]
    fn test_wildcard_suffix() {
        let trusted = TrustedDomains::default();
        assert!(trusted.is_trusted("https://sandbox.fhir.org/r4/Patient"));
        assert!(!trusted.is_trusted("https://notfhir.org/r4"));
        // A lookalike where the suffix is embedded but not a subdomain.
        assert!(!trusted.is_trusted("https://fhir.org.evil.com/x"));
    }

    #[test]
    fn test_hostname_extraction() {
        assert_eq!(
            extract_hostname("https://API.OpenAI.com/v1"),
            Some("api.openai.com".to_string())
        );
        assert_eq!(
            extract_hostname("wss://stream.example.com:443/feed"),
            Some("stream.example.com".to_string())
        );
        assert_eq!(extract_hostname("not a url"), None);
        assert_eq!(extract_hostname("https://"), None);
    }

    #[test]
    fn test_extra_domains_are_additive() {
        let trusted = TrustedDomains::with_extra(&["api.internal.example".to_string()]);
        assert!(trusted.is_trusted("https://api.internal.example/v2"));
        assert!(trusted.is_trusted("https://api.openai.com/v1"));
    }
}
