/*!
 * Sensitive data detection.
 *
 * Scans clipboard text against an ordered list of rules (private keys,
 * cloud credentials, payment cards, identity numbers, email addresses and
 * generic API secrets) and reports the first category that matches.
 *
 * Detection is deliberately shallow: there is no confidence score and no
 * Luhn validation of card numbers. A rule that fails to compile is logged
 * and skipped, so scanning itself never fails.
 */

use log::{debug, error};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default upper bound on scanned content, in characters
pub const DEFAULT_MAX_SCAN_CHARS: usize = 100_000;

/// Number of trailing characters left visible by [`SensitiveDetector::mask`]
const VISIBLE_TAIL: usize = 4;

/// Content shorter than this is masked entirely
const FULL_MASK_BELOW: usize = 8;

/// Length of an AWS access key id
const AWS_KEY_LEN: usize = 20;

/// Category of sensitive content, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SensitiveKind {
    #[serde(rename = "Private Key")]
    PrivateKey,
    #[serde(rename = "AWS Key")]
    AwsKey,
    #[serde(rename = "Credit Card")]
    CreditCard,
    #[serde(rename = "SSN")]
    Ssn,
    #[serde(rename = "Email")]
    Email,
    #[serde(rename = "API Secret")]
    ApiSecret,
}

impl SensitiveKind {
    /// Human readable label, also used as the stored category
    pub fn label(&self) -> &'static str {
        match self {
            Self::PrivateKey => "Private Key",
            Self::AwsKey => "AWS Key",
            Self::CreditCard => "Credit Card",
            Self::Ssn => "SSN",
            Self::Email => "Email",
            Self::ApiSecret => "API Secret",
        }
    }
}

impl fmt::Display for SensitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Outcome of a scan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Matched category, if any
    #[serde(rename = "type")]
    pub kind: Option<SensitiveKind>,

    /// Whether any rule matched
    pub is_sensitive: bool,
}

impl ScanResult {
    fn clean() -> Self {
        Self {
            kind: None,
            is_sensitive: false,
        }
    }

    fn flagged(kind: SensitiveKind) -> Self {
        Self {
            kind: Some(kind),
            is_sensitive: true,
        }
    }
}

/// How a rule decides whether content matches
enum Matcher {
    /// Any match of the expression counts
    Pattern(Regex),

    /// A maximal run matched by the expression must have exactly this many characters
    ExactRun(Regex, usize),
}

impl Matcher {
    fn is_match(&self, content: &str) -> bool {
        match self {
            Matcher::Pattern(re) => re.is_match(content),
            Matcher::ExactRun(re, len) => re.find_iter(content).any(|m| m.as_str().len() == *len),
        }
    }
}

struct Rule {
    kind: SensitiveKind,
    matcher: Matcher,
}

/// Rule sources, in precedence order
const RULE_SOURCES: &[(SensitiveKind, &str, Option<usize>)] = &[
    (SensitiveKind::PrivateKey, r"-----BEGIN (?:[A-Z]+ )?PRIVATE KEY-----", None),
    (SensitiveKind::AwsKey, r"[A-Z0-9]+", Some(AWS_KEY_LEN)),
    // Digits and word boundaries are ASCII-only; Arabic-Indic numerals are not card or SSN digits
    (SensitiveKind::CreditCard, r"(?-u:\b)(?:[0-9][ -]*?){13,16}(?-u:\b)", None),
    (SensitiveKind::Ssn, r"(?-u:\b)[0-9]{3}-[0-9]{2}-[0-9]{4}(?-u:\b)", None),
    (SensitiveKind::Email, r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}", None),
    (
        SensitiveKind::ApiSecret,
        r#"(?i)(?:api_key|client_secret|access_token|secret)[=:\s"]+([a-zA-Z0-9_-]{20,64})(?-u:\b)"#,
        None,
    ),
];

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
    RULE_SOURCES
        .iter()
        .filter_map(|(kind, source, exact_len)| match Regex::new(source) {
            Ok(re) => {
                let matcher = match exact_len {
                    Some(len) => Matcher::ExactRun(re, *len),
                    None => Matcher::Pattern(re),
                };
                Some(Rule { kind: *kind, matcher })
            }
            Err(e) => {
                error!("Sensitive rule '{}' failed to compile, skipping: {}", kind, e);
                None
            }
        })
        .collect()
});

/// Regex-based sensitive content detector
#[derive(Debug, Clone)]
pub struct SensitiveDetector {
    /// Content longer than this many characters is not scanned
    max_scan_chars: usize,
}

impl SensitiveDetector {
    /// Create a detector with the given scan limit
    pub fn new(max_scan_chars: usize) -> Self {
        Self { max_scan_chars }
    }

    /// Scan content and report the first matching category
    pub fn scan(&self, content: &str) -> ScanResult {
        if content.is_empty() {
            return ScanResult::clean();
        }

        // Cheap byte check first; only count chars when the byte length is over the limit
        if content.len() > self.max_scan_chars && content.chars().count() > self.max_scan_chars {
            debug!(
                "Skipping sensitive scan, content exceeds {} characters",
                self.max_scan_chars
            );
            return ScanResult::clean();
        }

        RULES
            .iter()
            .find(|rule| rule.matcher.is_match(content))
            .map(|rule| ScanResult::flagged(rule.kind))
            .unwrap_or_else(ScanResult::clean)
    }

    /// Return a masked copy of sensitive content, or the content unchanged
    pub fn mask(&self, content: &str) -> String {
        if !self.scan(content).is_sensitive {
            return content.to_string();
        }

        mask_chars(content)
    }

    /// Number of rules available for scanning
    pub fn rule_count(&self) -> usize {
        RULES.len()
    }

    /// Number of rules that failed to compile
    pub fn disabled_rule_count(&self) -> usize {
        RULE_SOURCES.len() - RULES.len()
    }

    /// Maximum number of characters scanned
    pub fn max_scan_chars(&self) -> usize {
        self.max_scan_chars
    }
}

impl Default for SensitiveDetector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SCAN_CHARS)
    }
}

/// Replace all but the last few characters with `*`
fn mask_chars(content: &str) -> String {
    let len = content.chars().count();

    if len < FULL_MASK_BELOW {
        return "*".repeat(len);
    }

    let tail: String = content.chars().skip(len - VISIBLE_TAIL).collect();
    format!("{}{}", "*".repeat(len - VISIBLE_TAIL), tail)
}
