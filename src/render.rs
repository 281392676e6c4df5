//! Table output for the `dhub` CLI.
//!
//! Colouring is decided by the caller through [`Renderer`]; nothing here reads
//! terminal or environment state.

use colored::Colorize;
use tabled::builder::Builder;
use tabled::settings::Style;
use crate::catalog::{Library, LibraryVersion};

/// Renders query results as text tables.
#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn green(&self, text: &str) -> String {
        if self.color { text.green().to_string() } else { text.to_string() }
    }

    fn cyan(&self, text: &str) -> String {
        if self.color { text.bright_cyan().bold().to_string() } else { text.to_string() }
    }

    pub fn yellow(&self, text: &str) -> String {
        if self.color { text.bright_yellow().to_string() } else { text.to_string() }
    }

    pub fn red(&self, text: &str) -> String {
        if self.color { text.red().to_string() } else { text.to_string() }
    }

    /// Name / Description / Last Updated / Pull Count, one row per library, in the given order.
    pub fn libraries(&self, libraries: &[Library]) -> String {
        let headers = ["Name", "Description", "Last Updated", "Pull Count"];
        let mut builder = Builder::default();
        builder.push_record(headers);
        for library in libraries {
            builder.push_record([
                self.green(&library.name),
                library.description.clone(),
                library
                    .last_updated
                    .map(|date| date.format("%Y-%m-%d").to_string())
                    .unwrap_or_default(),
                format_count(library.pull_count),
            ]);
        }
        if libraries.len() > 10 {
            builder.push_record(headers);
        }
        let mut table = builder.build();
        table.with(Style::modern());
        table.to_string()
    }

    /// One row per version. With `verbose`, one `TAG (<CHANNEL>)` column per
    /// distribution channel listing its image repositories; otherwise the channel names.
    pub fn versions(&self, library_version: &LibraryVersion, verbose: bool) -> String {
        let channels = library_version.channels();
        let mut headers = vec!["VERSION".to_string(), "DATE".to_string()];
        if verbose {
            headers.extend(channels.iter().map(|c| format!("TAG ({})", c.to_uppercase())));
        } else {
            headers.push("CHANNELS".to_string());
        }

        let mut builder = Builder::default();
        builder.push_record(headers);
        for version in &library_version.versions {
            let name = if version.prerelease {
                self.cyan(&version.version)
            } else {
                self.green(&version.version)
            };
            let mut row = vec![name, short_date(&version.date).to_string()];
            if verbose {
                for channel in &channels {
                    let repositories = version
                        .distributions
                        .get(channel)
                        .map(|dists| {
                            dists
                                .iter()
                                .map(|d| d.image_repository.as_str())
                                .collect::<Vec<_>>()
                                .join("\n")
                        })
                        .unwrap_or_default();
                    row.push(repositories);
                }
            } else {
                row.push(version.distributions.keys().cloned().collect::<Vec<_>>().join(", "));
            }
            builder.push_record(row);
        }
        let mut table = builder.build();
        table.with(Style::modern());
        table.to_string()
    }
}

/// `1234567` -> `1,234,567`
pub fn format_count(count: u64) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Keeps the date part of `2020-05-11T13:40:25`.
fn short_date(date: &str) -> &str {
    date.split('T').next().unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Distribution, Version};
    use std::collections::BTreeMap;

    fn library_version() -> LibraryVersion {
        let mut distributions = BTreeMap::new();
        distributions.insert(
            "alpine".to_string(),
            vec![Distribution {
                image_repository: "redis:6.0.1-alpine".to_string(),
                ..Distribution::default()
            }],
        );
        LibraryVersion {
            name: "redis".to_string(),
            hub_url: String::new(),
            repository_url: String::new(),
            versions: vec![
                Version {
                    version: "6.0.1".to_string(),
                    prerelease: false,
                    date: "2020-05-02T11:21:00".to_string(),
                    distributions,
                },
                Version {
                    version: "6.0-rc4".to_string(),
                    prerelease: true,
                    date: String::new(),
                    distributions: BTreeMap::new(),
                },
            ],
        }
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_libraries_table() {
        let renderer = Renderer::new(false);
        let libraries = vec![Library {
            name: "redis".to_string(),
            description: "key-value store".to_string(),
            star_count: None,
            pull_count: 1500,
            last_updated: None,
        }];
        let out = renderer.libraries(&libraries);
        assert!(out.contains("Pull Count"));
        assert!(out.contains("redis"));
        assert!(out.contains("1,500"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn test_versions_table() {
        let renderer = Renderer::new(false);
        let out = renderer.versions(&library_version(), false);
        assert!(out.contains("CHANNELS"));
        assert!(out.contains("6.0.1"));
        assert!(out.contains("2020-05-02"));
        assert!(!out.contains("redis:6.0.1-alpine"));

        let verbose = renderer.versions(&library_version(), true);
        assert!(verbose.contains("TAG (ALPINE)"));
        assert!(verbose.contains("redis:6.0.1-alpine"));
    }

    #[test]
    fn test_color_is_explicit() {
        let libraries = vec![Library {
            name: "redis".to_string(),
            description: String::new(),
            star_count: None,
            pull_count: 1,
            last_updated: None,
        }];
        colored::control::set_override(true);
        assert!(Renderer::new(true).libraries(&libraries).contains('\u{1b}'));
        assert!(!Renderer::new(false).libraries(&libraries).contains('\u{1b}'));
    }
}
