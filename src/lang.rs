//! Language packs.
//!
//! A pack is a plain text file named after its locale (`en_US.txt`). The
//! first line is the display name; every other line is `key<whitespace>value`
//! with `#` comments and `|` standing for a line break.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::translate::Translator;

/// Key under which the display name is stored.
pub const NAME_KEY: &str = "language";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePack {
    locale: String,
    entries: BTreeMap<String, String>,
}

/// An installed pack as listed by [`discover`].
#[derive(Debug, Clone, PartialEq)]
pub struct PackInfo {
    pub locale: String,
    pub name: String,
    /// Share of the reference pack's keys this pack defines, in percent.
    pub completeness: f64,
}

pub fn pack_path(langs_dir: &Path, locale: &str) -> PathBuf {
    langs_dir.join(format!("{locale}.txt"))
}

impl LanguagePack {
    /// Load `<langs_dir>/<locale>.txt`.
    pub fn load(langs_dir: &Path, locale: &str) -> Result<Self> {
        let path = pack_path(langs_dir, locale);
        debug!(path = %path.display(), "load: reading language pack");
        let text = fs::read_to_string(&path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::MissingLanguage {
                locale: locale.to_string(),
                path: path.clone(),
            },
            _ => Error::Io(e),
        })?;
        Ok(Self::parse(locale, &text))
    }

    pub fn parse(locale: &str, text: &str) -> Self {
        let mut lines = text.lines();
        let mut entries = BTreeMap::new();
        let name = lines.next().unwrap_or("").trim().to_string();
        entries.insert(NAME_KEY.to_string(), name);

        for (number, line) in lines.enumerate() {
            let line = match line.find('#') {
                Some(at) => &line[..at],
                None => line,
            };
            if line.trim().is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once(char::is_whitespace) else {
                warn!(%locale, line = number + 2, "parse: line has no value, skipped");
                continue;
            };
            let value = value.trim_start().trim_end_matches(['\r', '\n']);
            entries.insert(key.to_string(), value.replace('|', "\n"));
        }
        Self { locale: locale.to_string(), entries }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn display_name(&self) -> &str {
        self.entries.get(NAME_KEY).map(String::as_str).unwrap_or(&self.locale)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Look up a string; unknown keys come back as `"<key>" not found!`.
    pub fn get(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(value) => value.clone(),
            None => format!("\"{key}\" not found!"),
        }
    }

    /// Look up a string and fill its `{}` placeholders in order.
    pub fn format(&self, key: &str, args: &[&str]) -> String {
        fill_placeholders(&self.get(key), args)
    }
}

fn fill_placeholders(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut args = args.iter();
    let mut rest = template;
    while let Some(at) = rest.find("{}") {
        out.push_str(&rest[..at]);
        match args.next() {
            Some(arg) => out.push_str(arg),
            None => out.push_str("{}"),
        }
        rest = &rest[at + 2..];
    }
    out.push_str(rest);
    out
}

/// List every installed pack with its completeness against `reference`.
pub fn discover(langs_dir: &Path, reference: &str) -> Result<Vec<PackInfo>> {
    let reference = LanguagePack::load(langs_dir, reference)?;
    let total = reference.len().max(1) as f64;

    let mut packs = Vec::new();
    for entry in fs::read_dir(langs_dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            continue;
        }
        let Some(locale) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let pack = match fs::read_to_string(&path) {
            Ok(text) => LanguagePack::parse(locale, &text),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discover: unreadable pack skipped");
                continue;
            }
        };
        let completeness = (pack.len() as f64 / total * 10_000.0).round() / 100.0;
        packs.push(PackInfo {
            locale: pack.locale.clone(),
            name: pack.display_name().to_string(),
            completeness,
        });
    }
    packs.sort_by(|a, b| a.locale.cmp(&b.locale));
    debug!(count = packs.len(), "discover: found packs");
    Ok(packs)
}

/// Number of tabs after `key` so all values start in the same column.
fn tab_padding(key: &str, longest: usize) -> usize {
    let mut max_indent = longest / 4;
    if longest % 4 == 0 {
        max_indent += 1;
    }
    max_indent - key.len() / 4 + 1
}

/// Machine-translate `reference` into each target locale and write the packs
/// to `out_dir`. Returns the written paths.
pub async fn generate(
    reference: &LanguagePack,
    targets: &[String],
    translator: &dyn Translator,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let longest = reference.entries.keys().map(String::len).max().unwrap_or(0);

    let mut written = Vec::new();
    for locale in targets {
        let language: String = locale.chars().take(2).collect();
        info!(%locale, %language, keys = reference.len(), "generate: translating pack");

        let mut out = format!("{locale}\n");
        for (key, value) in reference.entries() {
            if key == NAME_KEY {
                continue;
            }
            let translated = translator.translate(value, &language).await?;
            out.push_str(key);
            out.push_str(&"\t".repeat(tab_padding(key, longest)));
            out.push_str(&translated.text.replace('\n', "|"));
            out.push('\n');
        }

        let path = pack_path(out_dir, locale);
        fs::write(&path, out)?;
        written.push(path);
    }
    Ok(written)
}
