use crate::net::connection::ConnId;
use hashbrown::HashMap;

/// Indexes registered connections by nickname. Nicknames compare byte-exactly
/// (case-sensitive): `Alice` and `alice` are distinct identities here.
#[derive(Default)]
pub struct Registry {
    by_nick: HashMap<String, ConnId>,
}

impl Registry {
    pub fn new() -> Registry {
        Registry { by_nick: HashMap::new() }
    }

    pub fn is_taken(&self, nick: &str) -> bool {
        self.by_nick.contains_key(nick)
    }

    pub fn lookup(&self, nick: &str) -> Option<ConnId> {
        self.by_nick.get(nick).copied()
    }

    /// Claims `nick` for `id`. Caller must have already checked `is_taken`.
    pub fn insert(&mut self, nick: &str, id: ConnId) {
        self.by_nick.insert(nick.to_string(), id);
    }

    /// Releases whatever nickname `id` currently holds, if any.
    pub fn remove_by_conn(&mut self, id: ConnId) {
        self.by_nick.retain(|_, v| *v != id);
    }

    /// Moves a claim from `old` to `new`, used when a registered connection
    /// changes its nickname.
    pub fn rename(&mut self, old: &str, new: &str, id: ConnId) {
        self.by_nick.remove(old);
        self.by_nick.insert(new.to_string(), id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nick_uniqueness_is_case_sensitive() {
        let mut reg = Registry::new();
        reg.insert("Alice", ConnId(1));
        assert!(reg.is_taken("Alice"));
        assert!(!reg.is_taken("alice"));
    }

    #[test]
    fn rename_moves_the_claim() {
        let mut reg = Registry::new();
        reg.insert("bob", ConnId(1));
        reg.rename("bob", "bobby", ConnId(1));
        assert!(!reg.is_taken("bob"));
        assert_eq!(reg.lookup("bobby"), Some(ConnId(1)));
    }

    #[test]
    fn remove_by_conn_frees_its_nick() {
        let mut reg = Registry::new();
        reg.insert("carl", ConnId(3));
        reg.remove_by_conn(ConnId(3));
        assert!(!reg.is_taken("carl"));
    }
}
