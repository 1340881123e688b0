use std::collections::HashMap;

use anyhow::{anyhow, bail};
use serde_json::Value;

use super::{lang::Lang, locale::Locale};

const EMBEDDED: [(&str, &str); 2] = [
    ("en", include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/lang/en.json"))),
    ("es", include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/lang/es.json"))),
];

/// Per-locale message tables: locale -> dotted key -> template.
///
/// Built once at startup and shared read-only through the app state.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: HashMap<String, HashMap<String, String>>,
    supported: Vec<String>,
    default_locale: String,
}

impl Catalog {
    /// Catalog from the message files compiled into the binary.
    pub fn embedded() -> anyhow::Result<Self> {
        Self::from_sources(&EMBEDDED)
    }

    /// Parse `(locale, json)` pairs. Nested objects are flattened into dotted
    /// keys, so `{"messages": {"FAILED": ".."}}` becomes `messages.FAILED`.
    pub fn from_sources(sources: &[(&str, &str)]) -> anyhow::Result<Self> {
        let mut tables = HashMap::new();
        let mut supported = vec![];
        for (code, raw) in sources {
            let value: Value = serde_json::from_str(raw)
                .map_err(|err| anyhow!("failed to parse messages for locale {}: {}", code, err))?;
            let mut table = HashMap::new();
            flatten(&value, "", &mut table);
            let code = code.to_ascii_lowercase();
            supported.push(code.clone());
            tables.insert(code, table);
        }
        let default_locale = match supported.first() {
            Some(val) => val.clone(),
            None => bail!("message catalog has no locale"),
        };
        Ok(Self {
            tables,
            supported,
            default_locale,
        })
    }

    /// Restrict the catalog to the configured locales and pick the default one.
    pub fn configure(
        mut self,
        default_locale: &str,
        supported_locales: Option<&[String]>,
    ) -> anyhow::Result<Self> {
        if let Some(locales) = supported_locales {
            let mut supported = vec![];
            for item in locales {
                let code = item.trim().to_ascii_lowercase();
                if code.is_empty() {
                    continue;
                }
                if !self.tables.contains_key(&code) {
                    bail!("no message table for supported locale {}", code);
                }
                supported.push(code);
            }
            if supported.is_empty() {
                bail!("supported locales must not be empty");
            }
            self.supported = supported;
        }
        let default_locale = default_locale.trim().to_ascii_lowercase();
        if !self.tables.contains_key(&default_locale) {
            bail!("no message table for default locale {}", default_locale);
        }
        self.default_locale = default_locale;
        Ok(self)
    }

    pub fn supported_locales(&self) -> &[String] {
        &self.supported
    }

    pub fn default_locale(&self) -> Locale {
        Locale::new(&self.default_locale)
    }

    /// Raw template, falling back to the default locale's table.
    pub fn template(&self, locale: &Locale, key: &str) -> Option<&str> {
        self.tables
            .get(locale.as_str())
            .and_then(|x| x.get(key))
            .or_else(|| {
                self.tables
                    .get(&self.default_locale)
                    .and_then(|x| x.get(key))
            })
            .map(String::as_str)
    }

    pub fn lang(&self, locale: Locale) -> Lang<'_> {
        Lang::new(self, locale)
    }

    pub fn default_lang(&self) -> Lang<'_> {
        Lang::new(self, self.default_locale())
    }
}

fn flatten(value: &Value, prefix: &str, out: &mut HashMap<String, String>) {
    match value {
        Value::Object(map) => {
            for (key, item) in map {
                let key = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(item, &key, out);
            }
        }
        Value::String(val) => {
            out.insert(prefix.to_string(), val.clone());
        }
        Value::Null => {}
        other => {
            out.insert(prefix.to_string(), other.to_string());
        }
    }
}
