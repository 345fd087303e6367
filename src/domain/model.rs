use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single contact block of a WHOIS snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
}

impl Contact {
    pub fn company(&self) -> Option<&str> {
        non_blank(self.company_name.as_deref())
    }

    pub fn email(&self) -> Option<&str> {
        non_blank(self.email_address.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRole {
    Registrant,
    Administrative,
    Technical,
    Billing,
}

impl ContactRole {
    pub const ALL: [ContactRole; 4] = [
        ContactRole::Registrant,
        ContactRole::Administrative,
        ContactRole::Technical,
        ContactRole::Billing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Registrant => "registrant",
            Self::Administrative => "administrative",
            Self::Technical => "technical",
            Self::Billing => "billing",
        }
    }
}

/// One historical ownership snapshot, as returned by history, live and
/// reverse lookups alike.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisRecord {
    #[serde(default)]
    pub domain_name: Option<String>,
    #[serde(default)]
    pub registrant_contact: Option<Contact>,
    #[serde(default)]
    pub administrative_contact: Option<Contact>,
    #[serde(default)]
    pub technical_contact: Option<Contact>,
    #[serde(default)]
    pub billing_contact: Option<Contact>,
}

impl WhoisRecord {
    pub fn for_domain(domain: &str) -> Self {
        Self {
            domain_name: Some(domain.to_string()),
            ..Self::default()
        }
    }

    pub fn with_contact(mut self, role: ContactRole, contact: Contact) -> Self {
        let slot = match role {
            ContactRole::Registrant => &mut self.registrant_contact,
            ContactRole::Administrative => &mut self.administrative_contact,
            ContactRole::Technical => &mut self.technical_contact,
            ContactRole::Billing => &mut self.billing_contact,
        };
        *slot = Some(contact);
        self
    }

    pub fn domain(&self) -> Option<&str> {
        non_blank(self.domain_name.as_deref())
    }

    pub fn contact(&self, role: ContactRole) -> Option<&Contact> {
        match role {
            ContactRole::Registrant => self.registrant_contact.as_ref(),
            ContactRole::Administrative => self.administrative_contact.as_ref(),
            ContactRole::Technical => self.technical_contact.as_ref(),
            ContactRole::Billing => self.billing_contact.as_ref(),
        }
    }

    /// Present contacts in registrant, administrative, technical, billing order.
    pub fn contacts(&self) -> impl Iterator<Item = (ContactRole, &Contact)> {
        ContactRole::ALL
            .into_iter()
            .filter_map(move |role| self.contact(role).map(|c| (role, c)))
    }
}

/// Remaining query credits of the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    #[serde(rename = "live_whois_balance")]
    pub live: i64,
    #[serde(rename = "whois_history_balance")]
    pub history: i64,
    #[serde(rename = "reverse_whois_balance")]
    pub reverse: i64,
}

/// Attribute a reverse lookup is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReverseKind {
    Name,
    Company,
    Email,
}

impl ReverseKind {
    pub fn param(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Company => "company",
            Self::Email => "email",
        }
    }
}

impl fmt::Display for ReverseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.param())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WhoisHistory {
    #[serde(default)]
    pub total_records_found: Option<u64>,
    #[serde(default)]
    pub whois_records: Vec<WhoisRecord>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReverseWhoisPage {
    #[serde(default = "first_page")]
    pub total_pages: u32,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub search_result: Vec<WhoisRecord>,
}

fn first_page() -> u32 {
    1
}

/// Reverse lookup results concatenated across the pages that were fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseWhoisResult {
    pub total_pages: u32,
    pub pages_fetched: u32,
    pub search_result: Vec<WhoisRecord>,
}

impl ReverseWhoisResult {
    pub fn is_complete(&self) -> bool {
        self.pages_fetched >= self.total_pages
    }
}

/// Set of identifiers compared case-insensitively that keeps the casing of
/// the first occurrence for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntitySet {
    entries: BTreeMap<String, String>,
}

impl EntitySet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fold(value: &str) -> String {
        value.trim().to_lowercase()
    }

    /// Returns `true` when the value was not present yet.
    pub fn insert(&mut self, value: &str) -> bool {
        let key = Self::fold(value);
        if self.entries.contains_key(&key) {
            return false;
        }
        self.entries.insert(key, value.trim().to_string());
        true
    }

    pub fn contains(&self, value: &str) -> bool {
        self.entries.contains_key(&Self::fold(value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display values sorted for deterministic output.
    pub fn sorted(&self) -> Vec<&str> {
        let mut values: Vec<&str> = self.entries.values().map(String::as_str).collect();
        values.sort_unstable();
        values
    }
}

impl<'a> FromIterator<&'a str> for EntitySet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// What a session has turned up so far. Only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discoveries {
    pub domains: EntitySet,
    pub companies: EntitySet,
    pub emails: EntitySet,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_set_folds_case_but_keeps_display() {
        let mut set = EntitySet::new();
        assert!(set.insert("Acme Corp"));
        assert!(!set.insert("ACME CORP"));
        assert!(set.contains("acme corp"));
        assert_eq!(set.sorted(), vec!["Acme Corp"]);
    }

    #[test]
    fn test_entity_set_sorted_output() {
        let set: EntitySet = ["b.com", "a.com", "c.com"].into_iter().collect();
        assert_eq!(set.sorted(), vec!["a.com", "b.com", "c.com"]);
    }

    #[test]
    fn test_record_contacts_in_role_order() {
        let record = WhoisRecord::for_domain("example.com")
            .with_contact(ContactRole::Billing, Contact::default())
            .with_contact(ContactRole::Registrant, Contact::default());
        let roles: Vec<ContactRole> = record.contacts().map(|(role, _)| role).collect();
        assert_eq!(roles, vec![ContactRole::Registrant, ContactRole::Billing]);
    }

    #[test]
    fn test_blank_fields_are_absent() {
        let contact = Contact {
            company_name: Some("  ".to_string()),
            email_address: Some(" admin@example.com ".to_string()),
            ..Contact::default()
        };
        assert_eq!(contact.company(), None);
        assert_eq!(contact.email(), Some("admin@example.com"));
    }

    #[test]
    fn test_deserialize_whoxy_record() {
        let json = serde_json::json!({
            "domain_name": "example.com",
            "registrant_contact": {
                "full_name": "Jane Doe",
                "company_name": "Example Inc",
                "email_address": "jane@example.com",
                "phone_number": "+1.5555555"
            },
            "domain_registered": "yes"
        });
        let record: WhoisRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.domain(), Some("example.com"));
        let registrant = record.contact(ContactRole::Registrant).unwrap();
        assert_eq!(registrant.company(), Some("Example Inc"));
        assert!(record.contact(ContactRole::Technical).is_none());
    }

    #[test]
    fn test_deserialize_balance() {
        let json = serde_json::json!({
            "status": 1,
            "live_whois_balance": 120,
            "whois_history_balance": 40,
            "reverse_whois_balance": 3
        });
        let balance: Balance = serde_json::from_value(json).unwrap();
        assert_eq!(
            balance,
            Balance {
                live: 120,
                history: 40,
                reverse: 3
            }
        );
    }
}
