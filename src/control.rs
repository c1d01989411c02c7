//! Debian control-file (deb822) stanzas.
//!
//! `apt-cache show`, `apt-cache dumpavail` and `dpkg-query` all print
//! paragraphs of `Field: value` lines separated by blank lines. Continuation
//! lines start with whitespace; a lone ` .` stands for an empty line.

/// One paragraph. Field names compare case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stanza {
    fields: Vec<(String, String)>,
}

impl Stanza {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(field))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// First line of the Description field.
    pub fn summary(&self) -> Option<&str> {
        self.get("Description").and_then(|d| d.lines().next())
    }

    /// Description continuation lines, if any.
    pub fn long_description(&self) -> Option<&str> {
        self.get("Description")
            .and_then(|d| d.split_once('\n'))
            .map(|(_, rest)| rest)
    }

    fn push_line(&mut self, line: &str) {
        if line.starts_with([' ', '\t']) {
            if let Some((_, value)) = self.fields.last_mut() {
                let text = line.trim_start();
                value.push('\n');
                if text != "." {
                    value.push_str(text);
                }
            }
            return;
        }

        if let Some((name, value)) = line.split_once(':') {
            self.fields.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
}

/// Lazily groups lines into stanzas.
pub struct Stanzas<I> {
    lines: I,
}

pub fn stanzas<I>(lines: I) -> Stanzas<I::IntoIter>
where
    I: IntoIterator<Item = String>,
{
    Stanzas {
        lines: lines.into_iter(),
    }
}

impl<I: Iterator<Item = String>> Iterator for Stanzas<I> {
    type Item = Stanza;

    fn next(&mut self) -> Option<Stanza> {
        let mut stanza = Stanza::default();
        for line in self.lines.by_ref() {
            if line.trim().is_empty() {
                if stanza.is_empty() {
                    continue;
                }
                return Some(stanza);
            }
            stanza.push_line(&line);
        }
        (!stanza.is_empty()).then_some(stanza)
    }
}
