//! The `ip` rule.
//!
//! Addresses are matched textually rather than parsed, so the accepted
//! forms are exactly those the patterns spell out: dotted-quad IPv4 without
//! leading zeros, and IPv6 in full, compressed, link-local-with-zone and
//! IPv4-embedded forms.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use crate::args::RuleArgs;
use crate::coerce::truthy;
use crate::outcome::RuleOutcome;

const IPV4_SEGMENT: &str = r"(?:25[0-5]|(?:2[0-4]|1[0-9]|[1-9])?[0-9])";
const IPV4_ADDRESS: &str = r"(?:SEG4\.){3}SEG4";
const IPV6_SEGMENT: &str = r"[0-9a-fA-F]{1,4}";

const IPV6_TEMPLATE: &str = r"(?x)
    ^(?:
        (?:SEG6:){7}SEG6                    # 1:2:3:4:5:6:7:8
        |(?:SEG6:){1,7}:                    # 1::  1:2:3:4:5:6:7::
        |(?:SEG6:){1,6}:SEG6                # 1::8  1:2:3:4:5:6::8
        |(?:SEG6:){1,5}(?::SEG6){1,2}       # 1::7:8  1:2:3:4:5::8
        |(?:SEG6:){1,4}(?::SEG6){1,3}       # 1::6:7:8  1:2:3:4::8
        |(?:SEG6:){1,3}(?::SEG6){1,4}       # 1::5:6:7:8  1:2:3::8
        |(?:SEG6:){1,2}(?::SEG6){1,5}       # 1::4:5:6:7:8  1:2::8
        |SEG6:(?:(?::SEG6){1,6})            # 1::3:4:5:6:7:8  1::8
        |:(?:(?::SEG6){1,7}|:)              # ::2:3:4:5:6:7:8  ::8  ::
        |fe80:(?::SEG6){0,4}%[0-9a-zA-Z]+   # fe80::7:8%eth0 (link-local with zone index)
        |::(?:ffff(?::0{1,4})?:)?V4         # ::255.255.255.255  ::ffff:0:255.255.255.255
        |(?:SEG6:){1,4}:V4                  # 2001:db8:3:4::192.0.2.33  64:ff9b::192.0.2.33
    )$";

fn ipv4_address() -> String {
    IPV4_ADDRESS.replace("SEG4", IPV4_SEGMENT)
}

static IPV4_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^{}$", ipv4_address())).expect("IPv4 pattern is valid")
});

static IPV6_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = IPV6_TEMPLATE
        .replace("SEG6", IPV6_SEGMENT)
        .replace("V4", &ipv4_address());
    Regex::new(&pattern).expect("IPv6 pattern is valid")
});

/// Passes IPv4 addresses, and IPv6 addresses when `ipv6` is truthy.
pub fn ip(value: Option<&Value>, args: &RuleArgs) -> RuleOutcome {
    let Some(Value::String(input)) = value else {
        return RuleOutcome::Fail;
    };

    if IPV4_REGEX.is_match(input) {
        return RuleOutcome::Pass;
    }

    let allow_v6 = args.get_set("ipv6").is_some_and(truthy);
    (allow_v6 && IPV6_REGEX.is_match(input)).into()
}
