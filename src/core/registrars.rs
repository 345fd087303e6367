use crate::utils::error::Result;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const IANA_REGISTRARS_URL: &str =
    "https://www.iana.org/assignments/registrar-ids/registrar-ids.xml";

/// Where `update-registrars` writes the refreshed list, next to the config file.
pub const REFRESHED_FILE_NAME: &str = "whois-pivot-registrars.txt";

const BUNDLED: &str = include_str!("../../data/registrars.txt");

/// Lower-cased registrar names. A company containing one of them is a
/// registrar, not an owner.
#[derive(Debug, Clone, Default)]
pub struct RegistrarList {
    names: Vec<String>,
}

impl RegistrarList {
    pub fn from_lines(content: &str) -> Self {
        let names = content
            .lines()
            .map(|line| line.trim().to_lowercase())
            .filter(|line| !line.is_empty())
            .collect();
        Self { names }
    }

    pub fn bundled() -> Self {
        Self::from_lines(BUNDLED)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_lines(&content))
    }

    pub fn refreshed_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(REFRESHED_FILE_NAME))
    }

    /// An explicitly configured file wins, then a refreshed list if one was
    /// downloaded, then the bundled copy.
    pub fn select(configured: Option<&str>, refreshed: Option<&Path>) -> Result<Self> {
        if let Some(path) = configured {
            return Self::load(path);
        }
        match refreshed {
            Some(path) if path.is_file() => {
                tracing::debug!("Using refreshed registrar list {}", path.display());
                Self::load(path)
            }
            _ => Ok(Self::bundled()),
        }
    }

    pub fn matches(&self, company: &str) -> bool {
        let company = company.to_lowercase();
        self.names.iter().any(|name| company.contains(name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

fn record_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<record\b[^>]*>(.*?)</record>").expect("record pattern is valid")
    })
}

fn field_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)<(name|status)>(.*?)</(?:name|status)>").expect("field pattern is valid")
    })
}

/// Registrar names from the IANA registrar-ids registry. Reserved ids are
/// skipped, their placeholder names would match unrelated companies.
pub fn parse_iana_registry(xml: &str) -> Vec<String> {
    let mut names = Vec::new();

    for record in record_pattern().captures_iter(xml) {
        let mut name = None;
        let mut status = None;
        for field in field_pattern().captures_iter(&record[1]) {
            let value = unescape_xml(field[2].trim());
            match &field[1] {
                "name" => name = Some(value),
                _ => status = Some(value),
            }
        }

        if status.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("reserved")) {
            continue;
        }
        if let Some(name) = name.filter(|n| !n.is_empty()) {
            names.push(name);
        }
    }

    names
}

fn char_ref_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").expect("char ref pattern is valid")
    })
}

fn unescape_xml(value: &str) -> String {
    let decoded = char_ref_pattern().replace_all(value, |caps: &regex::Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    decoded
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
