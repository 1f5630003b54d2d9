/// Subdomain label placed between a machine name and the base domain.
pub const NETWORK_LABEL: &str = "net";

/// Fully qualified host name for a machine, e.g. `foo.net.example.com`.
pub fn create_domain_name(name: &str, base_domain: &str) -> String {
    format!("{}.{}.{}", name, NETWORK_LABEL, base_domain).to_lowercase()
}

/// Record name relative to the base domain zone, e.g. `foo.net`.
pub fn dns_record_name(name: &str) -> String {
    format!("{}.{}", name, NETWORK_LABEL)
}

pub fn machine_name(prefix: &str, suffix: &str) -> String {
    format!("{}-{}", prefix, suffix).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_name_is_derived_and_case_folded() {
        assert_eq!(create_domain_name("foo", "example.com"), "foo.net.example.com");
        assert_eq!(create_domain_name("Factorio-AB12c", "Example.COM"), "factorio-ab12c.net.example.com");
    }

    #[test]
    fn record_name_is_relative_to_zone() {
        assert_eq!(dns_record_name("factorio-ab12c"), "factorio-ab12c.net");
    }

    #[test]
    fn machine_name_joins_prefix_and_suffix() {
        assert_eq!(machine_name("Factorio", "x9y8z"), "factorio-x9y8z");
    }
}
