//! Network address rules. The IP family leans on the standard parsers; MAC
//! addresses go through the registry's shared pattern table.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::sync::Arc;

use serde_json::Value;

use crate::registry::Registry;
use crate::rule::Check;

use super::Predicate;

pub(crate) fn install(registry: &mut Registry) {
    registry.register("ip", |_, _| {
        Ok(Predicate::new(
            "ip",
            "The :attribute must be a valid IP address.",
            |check| text(check).is_some_and(|s| s.parse::<IpAddr>().is_ok()),
        ))
    });

    registry.register("ipv4", |_, _| {
        Ok(Predicate::new(
            "ipv4",
            "The :attribute must be a valid IPv4 address.",
            |check| text(check).is_some_and(|s| s.parse::<Ipv4Addr>().is_ok()),
        ))
    });

    registry.register("ipv6", |_, _| {
        Ok(Predicate::new(
            "ipv6",
            "The :attribute must be a valid IPv6 address.",
            |check| text(check).is_some_and(|s| s.parse::<Ipv6Addr>().is_ok()),
        ))
    });

    registry.register("mac_address", |ctx, _| {
        let patterns = Arc::clone(ctx.patterns());
        Ok(Predicate::new(
            "mac_address",
            "The :attribute must be a valid MAC address.",
            move |check| text(check).is_some_and(|s| patterns.mac_address.is_match(s)),
        ))
    });
}

fn text<'c>(check: &'c Check<'_>) -> Option<&'c str> {
    match check.value() {
        Some(Value::String(s)) => Some(s.as_str()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::Registry;
    use serde_json::json;

    fn failing(data: serde_json::Value, field: &'static str, rules: &'static str) -> bool {
        let registry = Registry::new();
        registry.make(data, [(field, rules)]).unwrap().fails()
    }

    #[test]
    fn ip_family() {
        assert!(!failing(json!({ "a": "192.168.1.1" }), "a", "ip"));
        assert!(!failing(json!({ "a": "::1" }), "a", "ip"));
        assert!(failing(json!({ "a": "999.1.1.1" }), "a", "ip"));
        assert!(!failing(json!({ "a": "10.0.0.1" }), "a", "ipv4"));
        assert!(failing(json!({ "a": "::1" }), "a", "ipv4"));
        assert!(!failing(json!({ "a": "2001:db8::8a2e:370:7334" }), "a", "ipv6"));
        assert!(failing(json!({ "a": "10.0.0.1" }), "a", "ipv6"));
    }

    #[test]
    fn mac_addresses_allow_colon_or_dash_but_not_mixed() {
        assert!(!failing(json!({ "m": "00:1a:2b:3c:4d:5e" }), "m", "mac_address"));
        assert!(!failing(json!({ "m": "00-1A-2B-3C-4D-5E" }), "m", "mac_address"));
        assert!(failing(json!({ "m": "00:1a-2b:3c:4d:5e" }), "m", "mac_address"));
        assert!(failing(json!({ "m": "001a2b3c4d5e" }), "m", "mac_address"));
    }
}
