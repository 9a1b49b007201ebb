//! Shortcut expansion.
//!
//! Rewrites abbreviations and aliases in raw text into canonical command
//! phrases before classification. Expansion is a pure token-sequence
//! substitution: longest alias first, unmatched text passes through
//! unchanged, and `expand(expand(x)) == expand(x)` because no alias
//! replacement may itself contain an alias key.

use crate::error::{ParlanceError, Result};
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

/// One alias: a key token sequence and its canonical replacement.
#[derive(Debug, Clone)]
struct Alias {
    /// Lowercased key tokens, matched against the input
    key: Vec<String>,
    /// Canonical replacement text
    replacement: String,
}

impl Alias {
    fn new(key: &str, replacement: &str) -> Self {
        Self {
            key: key.split_whitespace().map(str::to_lowercase).collect(),
            replacement: replacement.to_string(),
        }
    }
}

/// Static storage for the global alias table (initialized once).
static GLOBAL_ALIASES: OnceLock<Vec<Alias>> = OnceLock::new();

/// Global aliases shared by every user, longest key first.
fn global_aliases() -> &'static [Alias] {
    GLOBAL_ALIASES.get_or_init(|| {
        let mut aliases = vec![
            Alias::new("go to", "navigate to"),
            Alias::new("look up", "search for"),
            Alias::new("goto", "navigate to"),
            Alias::new("nav", "navigate to"),
            Alias::new("srch", "search for"),
            Alias::new("gen", "generate"),
        ];
        aliases.sort_by_key(|alias| std::cmp::Reverse(alias.key.len()));
        aliases
    })
}

/// Expands user-defined and global aliases into canonical phrases.
///
/// Per-user aliases take precedence over the global table. The expander owns
/// its user tables in memory; persistence of alias definitions belongs to the
/// storage layer outside this core.
#[derive(Default)]
pub struct ShortcutExpander {
    /// Per-user alias tables, keyed by user id; each kept longest key first
    user_aliases: RwLock<HashMap<i64, Vec<Alias>>>,
}

impl ShortcutExpander {
    /// Creates an expander with only the global alias table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a user-defined alias.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when the alias or replacement is blank, or when
    /// the replacement contains an alias key (which would break the
    /// idempotence guarantee).
    pub fn set_user_alias(
        &self,
        user_id: i64,
        alias: &str,
        replacement: &str,
    ) -> Result<()> {
        let new = Alias::new(alias, replacement);
        if new.key.is_empty() || replacement.trim().is_empty() {
            return Err(ParlanceError::invalid_input(
                "alias and replacement must be non-empty",
            ));
        }

        let mut tables = self
            .user_aliases
            .write()
            .map_err(|_| ParlanceError::internal("alias table lock poisoned"))?;
        let table = tables.entry(user_id).or_default();

        if self.replacement_reexpands(&new, table) {
            return Err(ParlanceError::invalid_input(format!(
                "replacement for '{alias}' contains an alias key; expansion would not be idempotent"
            )));
        }

        table.retain(|existing| existing.key != new.key);
        table.push(new);
        table.sort_by_key(|alias| std::cmp::Reverse(alias.key.len()));
        Ok(())
    }

    /// Expands aliases in `text` for `user_id`. Pure; idempotent.
    pub fn expand(&self, text: &str, user_id: i64) -> String {
        let tables = match self.user_aliases.read() {
            Ok(tables) => tables,
            Err(_) => return text.to_string(),
        };
        let user_table = tables.get(&user_id).map(Vec::as_slice).unwrap_or(&[]);

        let tokens: Vec<&str> = text.split_whitespace().collect();
        let lowered: Vec<String> = tokens.iter().map(|t| t.to_lowercase()).collect();

        let mut output: Vec<&str> = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            let matched = Self::match_at(user_table, &lowered, i)
                .or_else(|| Self::match_at(global_aliases(), &lowered, i));
            match matched {
                Some(alias) => {
                    output.push(alias.replacement.as_str());
                    i += alias.key.len();
                }
                None => {
                    output.push(tokens[i]);
                    i += 1;
                }
            }
        }
        output.join(" ")
    }

    /// Longest alias in `table` whose key matches the tokens at `start`.
    fn match_at<'a>(table: &'a [Alias], lowered: &[String], start: usize) -> Option<&'a Alias> {
        table.iter().find(|alias| {
            lowered.len() >= start + alias.key.len()
                && lowered[start..start + alias.key.len()]
                    .iter()
                    .zip(&alias.key)
                    .all(|(token, key)| token == key)
        })
    }

    /// Whether expanding `candidate.replacement` would hit any alias key.
    fn replacement_reexpands(&self, candidate: &Alias, user_table: &[Alias]) -> bool {
        let replacement_tokens: Vec<String> = candidate
            .replacement
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        let windows_hit = |table: &[Alias]| {
            table.iter().chain(std::iter::once(candidate)).any(|alias| {
                replacement_tokens
                    .windows(alias.key.len())
                    .any(|window| window == alias.key.as_slice())
            })
        };
        windows_hit(user_table) || windows_hit(global_aliases())
    }
}
