//! Host comparison helpers for the hostname and domain accuracy methods.

use url::{Host, Url};

/// Registrable domain (eTLD+1) of a host name, per the Public Suffix List.
///
/// Private suffixes count: "alice.github.io" and "bob.github.io" are
/// different registrable domains. A host that is itself a suffix, or has
/// a single label, is returned as is.
///
/// E.g., "accounts.example.com" -> "example.com"
/// E.g., "sub.example.co.uk" -> "example.co.uk"
pub fn registrable_domain(host: &str) -> String {
    let host = host.trim_end_matches('.').to_lowercase();
    psl::domain_str(&host).map(str::to_string).unwrap_or(host)
}

/// Same scheme, host and effective port.
pub fn same_hostname(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host().is_some()
        && a.host() == b.host()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Same registrable domain. IP hosts must be identical.
pub fn same_domain(a: &Url, b: &Url) -> bool {
    match (a.host(), b.host()) {
        (Some(Host::Domain(da)), Some(Host::Domain(db))) => {
            registrable_domain(da) == registrable_domain(db)
        }
        (Some(ha), Some(hb)) => ha == hb,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_registrable_domain() {
        assert_eq!(registrable_domain("accounts.example.com"), "example.com");
        assert_eq!(registrable_domain("example.com"), "example.com");
        assert_eq!(registrable_domain("sub.example.co.uk"), "example.co.uk");
        assert_eq!(registrable_domain("example.co.uk"), "example.co.uk");
        assert_eq!(registrable_domain("deep.sub.example.com.au"), "example.com.au");
        assert_eq!(registrable_domain("localhost"), "localhost");
        assert_eq!(registrable_domain("WWW.Example.COM."), "example.com");
        assert_eq!(registrable_domain("bank.co.ke"), "bank.co.ke");
        assert_eq!(registrable_domain("login.bank.com.pe"), "bank.com.pe");
        assert_eq!(registrable_domain("alice.github.io"), "alice.github.io");
        assert_eq!(registrable_domain("github.io"), "github.io");
    }

    #[test]
    fn test_same_hostname() {
        assert!(same_hostname(&url("https://a.example.com/x"), &url("https://a.example.com/y?q#f")));
        assert!(same_hostname(&url("https://a.example.com:443/"), &url("https://a.example.com/")));
        assert!(!same_hostname(&url("http://a.example.com/"), &url("https://a.example.com/")));
        assert!(!same_hostname(&url("https://a.example.com:8443/"), &url("https://a.example.com/")));
        assert!(!same_hostname(&url("https://a.example.com/"), &url("https://b.example.com/")));
        assert!(!same_hostname(&url("about:blank"), &url("about:blank")));
    }

    #[test]
    fn test_same_domain() {
        assert!(same_domain(&url("https://accounts.example.com/"), &url("http://www.example.com/")));
        assert!(same_domain(&url("https://a.example.co.uk/"), &url("https://b.example.co.uk/")));
        assert!(!same_domain(&url("https://example.co.uk/"), &url("https://other.co.uk/")));
        assert!(!same_domain(&url("https://another-example.com/"), &url("https://example.com/")));
        assert!(!same_domain(&url("https://example.com.evil.com/"), &url("https://example.com/")));
        assert!(!same_domain(&url("https://bank.co.ke/login"), &url("https://evil.co.ke/")));
        assert!(!same_domain(&url("https://bank.com.pe/"), &url("https://evil.com.pe/")));
        assert!(!same_domain(&url("https://alice.github.io/"), &url("https://bob.github.io/")));
        assert!(same_domain(&url("https://alice.github.io/a"), &url("https://alice.github.io/b")));
        assert!(same_domain(&url("http://192.168.1.1:8080/"), &url("https://192.168.1.1/")));
        assert!(!same_domain(&url("http://192.168.1.1/"), &url("http://192.168.1.2/")));
    }
}
