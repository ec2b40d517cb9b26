use std::str::FromStr;

use crate::point::PointField;

const LOCATION_SEGMENT: &str = ".location";

/// A single `<world>.location.<field>: <value>` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Entry {
    pub world: String,
    pub field: PointField,
    pub value: String,
}

impl Entry {
    /// World names may contain `:`, so the key ends at the first colon that
    /// leaves a well-formed key on its left.
    fn parse(line: &str) -> Option<Self> {
        line.match_indices(':').find_map(|(at, _)| {
            let (world, field) = Self::parse_key(&line[..at])?;
            Some(Self {
                world: world.to_string(),
                field,
                value: line[at + 1..].trim().to_string(),
            })
        })
    }

    fn parse_key(key: &str) -> Option<(&str, PointField)> {
        let (prefix, field) = key.trim_end().rsplit_once('.')?;
        let field = PointField::from_str(field).ok()?;
        let world = prefix.strip_suffix(LOCATION_SEGMENT)?;
        if world.is_empty() {
            return None;
        }
        Some((world, field))
    }

    fn matches(&self, world: &str, field: PointField) -> bool {
        self.field == field && self.world == world
    }

    fn render(&self) -> String {
        format!(
            "{}{}.{}: {}",
            self.world, LOCATION_SEGMENT, self.field, self.value
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line {
    Entry(Entry),
    // Anything we do not understand survives a rewrite untouched.
    Verbatim(String),
}

/// Whether entries for `world` read back under the same name.
pub(crate) fn is_storable_world(world: &str) -> bool {
    if world.contains(['\n', '\r']) {
        return false;
    }
    let entry = Entry {
        world: world.to_string(),
        field: PointField::X,
        value: "0".to_string(),
    };
    Entry::parse(&entry.render()).is_some_and(|parsed| parsed == entry)
}

/// Parsed contents of the store file, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigDocument {
    lines: Vec<Line>,
}

impl ConfigDocument {
    pub fn parse(text: &str) -> Self {
        let lines = text
            .lines()
            .map(|line| match Entry::parse(line) {
                Some(entry) => Line::Entry(entry),
                None => Line::Verbatim(line.to_string()),
            })
            .collect();

        Self { lines }
    }

    fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.lines.iter().filter_map(|line| match line {
            Line::Entry(entry) => Some(entry),
            Line::Verbatim(_) => None,
        })
    }

    /// Value of the first entry for `world`/`field`.
    pub fn get(&self, world: &str, field: PointField) -> Option<&str> {
        self.entries()
            .find(|entry| entry.matches(world, field))
            .map(|entry| entry.value.as_str())
    }

    /// Rewrites every entry for `world`/`field`, or appends one if none exists.
    ///
    /// Returns `true` if an existing entry was replaced.
    pub fn upsert(&mut self, world: &str, field: PointField, value: &str) -> bool {
        let mut replaced = false;
        for line in &mut self.lines {
            if let Line::Entry(entry) = line {
                if entry.matches(world, field) {
                    entry.value = value.to_string();
                    replaced = true;
                }
            }
        }

        if !replaced {
            self.lines.push(Line::Entry(Entry {
                world: world.to_string(),
                field,
                value: value.to_string(),
            }));
        }
        replaced
    }

    /// Distinct world names with at least one entry, in file order.
    pub fn worlds(&self) -> Vec<&str> {
        let mut worlds: Vec<&str> = Vec::new();
        for entry in self.entries() {
            if !worlds.contains(&entry.world.as_str()) {
                worlds.push(&entry.world);
            }
        }
        worlds
    }

    /// Newline-terminated text of the whole document.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                Line::Entry(entry) => out.push_str(&entry.render()),
                Line::Verbatim(text) => out.push_str(text),
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entries_and_keeps_other_lines() {
        let doc = ConfigDocument::parse("# spawn points\nworld.location.x: 12.5\n\nnot a key\n");

        assert_eq!(doc.get("world", PointField::X), Some("12.5"));
        assert_eq!(
            doc.render(),
            "# spawn points\nworld.location.x: 12.5\n\nnot a key\n"
        );
    }

    #[test]
    fn y_does_not_match_yaw() {
        let doc = ConfigDocument::parse("world.location.yaw: 90.0\n");

        assert_eq!(doc.get("world", PointField::Y), None);
        assert_eq!(doc.get("world", PointField::Yaw), Some("90.0"));
    }

    #[test]
    fn world_names_may_contain_dots() {
        let doc = ConfigDocument::parse("my.world.location.z: -3\n");

        assert_eq!(doc.get("my.world", PointField::Z), Some("-3"));
        assert_eq!(doc.worlds(), ["my.world"]);
    }

    #[test]
    fn value_is_everything_after_first_colon() {
        let doc = ConfigDocument::parse("world.location.x:   1:2  \n");
        assert_eq!(doc.get("world", PointField::X), Some("1:2"));
    }

    #[test]
    fn world_names_may_contain_colons() {
        let doc = ConfigDocument::parse("hub:1.location.x: 2.0\nhub: 2.location.y:3\n");

        assert_eq!(doc.get("hub:1", PointField::X), Some("2.0"));
        assert_eq!(doc.get("hub: 2", PointField::Y), Some("3"));
        assert_eq!(doc.worlds(), ["hub:1", "hub: 2"]);
    }

    #[test]
    fn storable_worlds() {
        assert!(is_storable_world("world"));
        assert!(is_storable_world("hub:1"));
        assert!(is_storable_world("my.world"));

        assert!(!is_storable_world(""));
        assert!(!is_storable_world("two\nlines"));
        assert!(!is_storable_world("a.location.x: 1"));
    }

    #[test]
    fn world_match_is_case_sensitive() {
        let doc = ConfigDocument::parse("World.location.x: 1.0\n");
        assert_eq!(doc.get("world", PointField::X), None);
    }

    #[test]
    fn upsert_replaces_in_place_and_appends_otherwise() {
        let mut doc = ConfigDocument::parse("a.location.x: 1.0\nb.location.x: 2.0\n");

        assert!(doc.upsert("a", PointField::X, "5.0"));
        assert!(!doc.upsert("a", PointField::Y, "6.0"));

        assert_eq!(
            doc.render(),
            "a.location.x: 5.0\nb.location.x: 2.0\na.location.y: 6.0\n"
        );
    }

    #[test]
    fn upsert_rewrites_duplicate_lines() {
        let mut doc = ConfigDocument::parse("a.location.x: 1.0\na.location.x: 9.0\n");

        doc.upsert("a", PointField::X, "3.0");

        assert_eq!(doc.render(), "a.location.x: 3.0\na.location.x: 3.0\n");
    }

    #[test]
    fn empty_document_renders_empty() {
        assert_eq!(ConfigDocument::parse("").render(), "");
    }
}
