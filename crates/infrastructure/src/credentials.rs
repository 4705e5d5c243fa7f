//! Local credential file, `username=password:role` per line.
//!
//! The file uses Java properties syntax so existing credential files keep
//! working. Passwords are stored in plain text; this is a convenience login
//! for a single-user desktop install, not a secret store.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const HEADER: &str = "#credentials: username=password:role";

#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl CredentialStore {
    /// Reads the file at `path`. A missing file yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let text = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read credentials file {}", path.display()))?;
            parse_properties(&text)
        } else {
            debug!(path = %path.display(), "No credentials file yet");
            BTreeMap::new()
        };

        info!(path = %path.display(), users = entries.len(), "Credentials loaded");
        Ok(Self { path, entries })
    }

    pub fn exists_user(&self, username: &str) -> bool {
        self.entries.contains_key(username)
    }

    pub fn validate(&self, username: &str, password: &str) -> bool {
        let valid = self
            .entries
            .get(username)
            .map(|v| split_value(v).0 == password)
            .unwrap_or(false);
        if !valid {
            warn!(username, "Credential check failed");
        }
        valid
    }

    pub fn role(&self, username: &str) -> Option<&str> {
        self.entries.get(username).and_then(|v| split_value(v).1)
    }

    /// Adds or replaces a user and rewrites the file.
    pub fn save_credential(&mut self, username: &str, password: &str, role: &str) -> Result<()> {
        anyhow::ensure!(!username.trim().is_empty(), "Username must not be empty");
        anyhow::ensure!(
            !password.contains(':'),
            "Password must not contain ':' (it separates password and role)"
        );

        self.entries
            .insert(username.to_string(), format!("{}:{}", password, role));
        self.store()?;
        info!(username, role, "Credential saved");
        Ok(())
    }

    fn store(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut out = String::from(HEADER);
        out.push('\n');
        for (key, value) in &self.entries {
            out.push_str(&escape(key, true));
            out.push('=');
            out.push_str(&escape(value, false));
            out.push('\n');
        }

        fs::write(&self.path, out)
            .with_context(|| format!("Failed to write credentials file {}", self.path.display()))
    }
}

/// Password before the first ':', role after it.
fn split_value(value: &str) -> (&str, Option<&str>) {
    match value.split_once(':') {
        Some((password, role)) => (password, Some(role)),
        None => (value, None),
    }
}

fn parse_properties(text: &str) -> BTreeMap<String, String> {
    let mut entries = BTreeMap::new();
    let mut lines = text.lines();

    while let Some(line) = lines.next() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
            continue;
        }

        // An odd number of trailing backslashes continues the logical line
        let mut logical = trimmed.to_string();
        while ends_with_continuation(&logical) {
            logical.pop();
            match lines.next() {
                Some(next) => logical.push_str(next.trim_start()),
                None => break,
            }
        }

        let (key, value) = split_key_value(&logical);
        entries.insert(unescape(key), unescape(value));
    }
    entries
}

fn ends_with_continuation(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

/// Splits on the first unescaped `=`, `:` or whitespace.
fn split_key_value(line: &str) -> (&str, &str) {
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' | ' ' | '\t' | '\x0c' => {
                let key = &line[..i];
                let mut rest = line[i..].trim_start_matches([' ', '\t', '\x0c']);
                if c != '=' && c != ':' {
                    if let Some(stripped) = rest.strip_prefix(['=', ':']) {
                        rest = stripped;
                    }
                } else {
                    rest = &rest[1..];
                }
                return (key, rest.trim_start_matches([' ', '\t', '\x0c']));
            }
            _ => {}
        }
    }
    (line, "")
}

/// Appends buffered `\uXXXX` code units; an unpaired surrogate becomes U+FFFD.
fn flush_units(out: &mut String, units: &mut Vec<u16>) {
    out.extend(
        char::decode_utf16(units.drain(..)).map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER)),
    );
}

fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    let mut units: Vec<u16> = Vec::new();

    while let Some(c) = chars.next() {
        if c != '\\' {
            flush_units(&mut out, &mut units);
            out.push(c);
            continue;
        }
        let next = chars.next();
        if next == Some('u') {
            let hex: String = chars.by_ref().take(4).collect();
            match u16::from_str_radix(&hex, 16) {
                Ok(unit) => units.push(unit),
                Err(_) => {
                    flush_units(&mut out, &mut units);
                    out.push_str(&hex);
                }
            }
            continue;
        }
        flush_units(&mut out, &mut units);
        match next {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    flush_units(&mut out, &mut units);
    out
}

fn escape(s: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            ' ' if is_key || i == 0 => out.push_str("\\ "),
            c if (c as u32) < 0x20 || (c as u32) > 0x7e => {
                let mut buf = [0u16; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.push_str(&format!("\\u{:04X}", unit));
                }
            }
            c => out.push(c),
        }
    }
    out
}
