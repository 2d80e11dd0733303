//! Runtime security settings.
//!
//! [`SecuritySettings`] is what the broker consults: roles grouped by the
//! address match they were configured under. Address matches are
//! dot-separated words where `*` stands for exactly one word and `#` for any
//! number of words, including none.

use indexmap::IndexMap;
use mgmt_system::service::GlobalService;
use parking_lot::RwLock;

use crate::role::SecurityRole;

/// Word separator in addresses and address matches.
pub const DELIMITER: char = '.';
/// Matches exactly one word.
pub const SINGLE_WORD: &str = "*";
/// Matches any number of words.
pub const ANY_WORDS: &str = "#";

/// Returns true if `address` is matched by the address match `pattern`.
///
/// ```
/// use mgmt_messaging::settings::address_matches;
///
/// assert!(address_matches("jms.queue.#", "jms.queue.orders.eu"));
/// assert!(address_matches("jms.*.orders", "jms.queue.orders"));
/// assert!(!address_matches("jms.*", "jms.queue.orders"));
/// ```
#[must_use]
pub fn address_matches(pattern: &str, address: &str) -> bool {
    let pattern: Vec<&str> = pattern.split(DELIMITER).collect();
    let address: Vec<&str> = address.split(DELIMITER).collect();
    words_match(&pattern, &address)
}

fn words_match(pattern: &[&str], address: &[&str]) -> bool {
    match pattern.split_first() {
        None => address.is_empty(),
        Some((&ANY_WORDS, rest)) => (0..=address.len()).any(|skip| words_match(rest, &address[skip..])),
        Some((&word, rest)) => address.split_first().is_some_and(|(&first, tail)| {
            (word == SINGLE_WORD || word == first) && words_match(rest, tail)
        }),
    }
}

/// Orders matches from least to most specific: literal matches beat any
/// wildcard, `*` beats `#`, then more literal words win.
fn specificity(pattern: &str) -> (bool, bool, usize, usize) {
    let words: Vec<&str> = pattern.split(DELIMITER).collect();
    let any_words = words.contains(&ANY_WORDS);
    let literal = words
        .iter()
        .filter(|word| **word != ANY_WORDS && **word != SINGLE_WORD)
        .count();
    (
        !any_words && !words.contains(&SINGLE_WORD),
        !any_words,
        literal,
        words.len(),
    )
}

type AddressSettings = IndexMap<String, IndexMap<String, SecurityRole>>;

/// Roles in force, keyed by messaging server, then address match, then role
/// name.
///
/// Each server's settings are independent: a match configured on one server
/// never applies to another. Mutated by the security-role handlers while a
/// management operation runs; read concurrently by everything else.
#[derive(Debug, Default)]
pub struct SecuritySettings {
    servers: RwLock<IndexMap<String, AddressSettings>>,
}

impl GlobalService for SecuritySettings {}

impl SecuritySettings {
    /// Creates empty settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `role` under `address_match` on `server`, returning the role
    /// it replaced.
    pub fn install(
        &self,
        server: &str,
        address_match: &str,
        role: SecurityRole,
    ) -> Option<SecurityRole> {
        tracing::debug!(server, address_match, role = %role, "security role installed");
        self.servers
            .write()
            .entry(server.to_string())
            .or_default()
            .entry(address_match.to_string())
            .or_default()
            .insert(role.name().to_string(), role)
    }

    /// Removes a role. The address match is dropped with its last role, and
    /// the server with its last match.
    pub fn uninstall(&self, server: &str, address_match: &str, name: &str) -> Option<SecurityRole> {
        let mut servers = self.servers.write();
        let matches = servers.get_mut(server)?;
        let set = matches.get_mut(address_match)?;
        let removed = set.shift_remove(name);
        if set.is_empty() {
            matches.shift_remove(address_match);
        }
        if matches.is_empty() {
            servers.shift_remove(server);
        }
        if removed.is_some() {
            tracing::debug!(server, address_match, role = name, "security role uninstalled");
        }
        removed
    }

    /// A role configured on `server` under exactly `address_match`.
    #[must_use]
    pub fn role(&self, server: &str, address_match: &str, name: &str) -> Option<SecurityRole> {
        self.servers
            .read()
            .get(server)?
            .get(address_match)?
            .get(name)
            .cloned()
    }

    /// Every role configured on `server` under exactly `address_match`.
    #[must_use]
    pub fn roles(&self, server: &str, address_match: &str) -> Vec<SecurityRole> {
        self.servers
            .read()
            .get(server)
            .and_then(|matches| matches.get(address_match))
            .map(|set| set.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Servers with at least one role, in installation order.
    #[must_use]
    pub fn servers(&self) -> Vec<String> {
        self.servers.read().keys().cloned().collect()
    }

    /// Address matches configured on `server`, in installation order.
    #[must_use]
    pub fn address_matches(&self, server: &str) -> Vec<String> {
        self.servers
            .read()
            .get(server)
            .map(|matches| matches.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The most specific match configured on `server` for a concrete
    /// `address`.
    ///
    /// Ties go to the match installed first.
    #[must_use]
    pub fn best_match(&self, server: &str, address: &str) -> Option<String> {
        let servers = self.servers.read();
        let matches = servers.get(server)?;
        let mut best: Option<&str> = None;
        for pattern in matches.keys().filter(|pattern| address_matches(pattern, address)) {
            if best.is_none_or(|current| specificity(pattern) > specificity(current)) {
                best = Some(pattern.as_str());
            }
        }
        best.map(str::to_string)
    }

    /// The roles that apply to a concrete `address` on `server`: those of its
    /// most specific match.
    #[must_use]
    pub fn roles_for_address(&self, server: &str, address: &str) -> Vec<SecurityRole> {
        self.best_match(server, address)
            .map(|pattern| self.roles(server, &pattern))
            .unwrap_or_default()
    }

    /// Returns the total number of installed roles across servers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.servers
            .read()
            .values()
            .flat_map(IndexMap::values)
            .map(IndexMap::len)
            .sum()
    }

    /// Returns true if no role is installed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.servers.read().is_empty()
    }
}
