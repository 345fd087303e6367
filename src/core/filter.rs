//! Noise filters applied to contact attributes before anyone is asked to
//! follow them.

use crate::core::registrars::RegistrarList;

/// Common WHOIS privacy strings.
pub const PRIVACY_BLOCKLIST: [&str; 5] = [
    "withheldforprivacy",
    "tieredaccess",
    "redacted",
    "privacy",
    "not disclosed",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Seen,
    Protected,
    Registrar,
    MalformedEmail,
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        self == Verdict::Accept
    }
}

pub fn is_privacy_protected(value: &str) -> bool {
    let lowered = value.to_lowercase();
    PRIVACY_BLOCKLIST.iter().any(|s| lowered.contains(s))
}

/// Masked addresses commonly replace characters with `*`.
pub fn is_plausible_email(value: &str) -> bool {
    value.contains('@') && !value.contains('*')
}

/// Verdict for a company that has not been seen before.
pub fn screen_company(company: &str, registrars: &RegistrarList) -> Verdict {
    if is_privacy_protected(company) {
        Verdict::Protected
    } else if registrars.matches(company) {
        Verdict::Registrar
    } else {
        Verdict::Accept
    }
}

/// Verdict for an email address that has not been seen before.
pub fn screen_email(email: &str) -> Verdict {
    if is_privacy_protected(email) {
        Verdict::Protected
    } else if !is_plausible_email(email) {
        Verdict::MalformedEmail
    } else {
        Verdict::Accept
    }
}
