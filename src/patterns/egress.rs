use regex::Regex;
use std::sync::LazyLock;

/// A rule flagging an outbound network call in scanned code. `captures_url`
/// is false for constructs where no target can be read off the call site
/// (raw XMLHttpRequest construction); those matches are not classifiable
/// against the trusted-domain list and are skipped.
pub struct EgressDetector {
    pub id: &'static str,
    pub regex: &'static LazyLock<Regex>,
    pub captures_url: bool,
}

macro_rules! egress_pattern {
    ($name:ident, $regex_str:expr) => {
        pub static $name: LazyLock<Regex> =
            LazyLock::new(|| Regex::new($regex_str).expect("built-in egress pattern must compile"));
    };
}

egress_pattern!(RE_FETCH, r#"\bfetch\s*\(\s*[`'"](https?://[^`'"]+)[`'"]"#);

egress_pattern!(
    RE_AXIOS,
    r#"\baxios\s*\.\s*(?:get|post|put|patch|delete)\s*\(\s*[`'"](https?://[^`'"]+)[`'"]"#
);

egress_pattern!(RE_XHR, r"\bnew\s+XMLHttpRequest\s*\(\)");

egress_pattern!(
    RE_HTTP_CLIENT,
    r#"\bhttp\s*\.\s*(?:get|post|put|patch|delete)\s*\(\s*[`'"](https?://[^`'"]+)[`'"]"#
);

egress_pattern!(
    RE_SEND_BEACON,
    r#"\bnavigator\.sendBeacon\s*\(\s*[`'"](https?://[^`'"]+)[`'"]"#
);

egress_pattern!(
    RE_WEBSOCKET,
    r#"\bnew\s+WebSocket\s*\(\s*[`'"](wss?://[^`'"]+)[`'"]"#
);

static ALL_EGRESS: [EgressDetector; 6] = [
    EgressDetector {
        id: "fetch",
        regex: &RE_FETCH,
        captures_url: true,
    },
    EgressDetector {
        id: "axios",
        regex: &RE_AXIOS,
        captures_url: true,
    },
    EgressDetector {
        id: "xhr",
        regex: &RE_XHR,
        captures_url: false,
    },
    EgressDetector {
        id: "http-client",
        regex: &RE_HTTP_CLIENT,
        captures_url: true,
    },
    EgressDetector {
        id: "send-beacon",
        regex: &RE_SEND_BEACON,
        captures_url: true,
    },
    EgressDetector {
        id: "websocket",
        regex: &RE_WEBSOCKET,
        captures_url: true,
    },
];

pub fn all_egress_detectors() -> Vec<&'static EgressDetector> {
    ALL_EGRESS.iter().collect()
}

/// Guess the HTTP method from the matched call text. Beacons are always
/// POST; anything without an explicit verb defaults to GET.
pub fn guess_method(matched: &str) -> &'static str {
    if matched.contains("sendBeacon") {
        return "POST";
    }
    for (needle, method) in [
        ("post", "POST"),
        ("put", "PUT"),
        ("patch", "PATCH"),
        ("delete", "DELETE"),
    ] {
        if matched.to_lowercase().contains(&format!(".{}", needle)) {
            return method;
        }
    }
    "GET"
}

/// Sensitive-data probes run against the text window around an untrusted
/// egress call. Each hit contributes one category tag to the risk entry.
pub struct DataTypeProbe {
    pub tag: &'static str,
    pub regex: &'static LazyLock<Regex>,
}

egress_pattern!(RE_KW_PATIENT, r"(?i)patient|user|name");
egress_pattern!(RE_KW_SSN, r"(?i)ssn|social");
egress_pattern!(RE_KW_DIAGNOSIS, r"(?i)diagnosis|icd|condition");
egress_pattern!(RE_KW_MEDICATION, r"(?i)medication|drug|rx");
egress_pattern!(RE_KW_LAB, r"(?i)lab|result|test");

static DATA_TYPE_PROBES: [DataTypeProbe; 5] = [
    DataTypeProbe {
        tag: "patient_data",
        regex: &RE_KW_PATIENT,
    },
    DataTypeProbe {
        tag: "ssn",
        regex: &RE_KW_SSN,
    },
    DataTypeProbe {
        tag: "diagnosis",
        regex: &RE_KW_DIAGNOSIS,
    },
    DataTypeProbe {
        tag: "medication",
        regex: &RE_KW_MEDICATION,
    },
    DataTypeProbe {
        tag: "lab_results",
        regex: &RE_KW_LAB,
    },
];

pub fn data_type_probes() -> Vec<&'static DataTypeProbe> {
    DATA_TYPE_PROBES.iter().collect()
}
