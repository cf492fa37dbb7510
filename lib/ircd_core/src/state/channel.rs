use crate::net::connection::ConnId;
use hashbrown::HashSet;
use indexmap::IndexMap;

/// Per-channel mode flags.
#[derive(Debug, Clone, Default)]
pub struct ChannelModes {
    pub invite_only: bool,
    pub topic_restricted: bool,
    pub key: Option<String>,
    pub user_limit: Option<usize>,
}

/// An IRC channel. Names compare byte-exactly (case-sensitive): `#Foo` and
/// `#foo` are different channels.
pub struct Channel {
    pub name: String,
    pub topic: String,
    /// Keyed by join order: iterating `members` walks the channel in the
    /// order people joined, so NAMES replies and broadcast fan-out see a
    /// stable order instead of whatever a hash map's bucket layout produces.
    pub members: IndexMap<ConnId, bool>,
    pub modes: ChannelModes,
    pub invited: HashSet<ConnId>,
}

impl Channel {
    pub fn new(name: String) -> Channel {
        Channel {
            name,
            topic: String::new(),
            members: IndexMap::new(),
            modes: ChannelModes::default(),
            invited: HashSet::new(),
        }
    }

    pub fn is_member(&self, id: ConnId) -> bool {
        self.members.contains_key(&id)
    }

    pub fn is_operator(&self, id: ConnId) -> bool {
        self.members.get(&id).copied().unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Adds `id` as a member. The first joiner of a freshly created channel is
    /// op; every later joiner starts as a regular member.
    pub fn add_member(&mut self, id: ConnId, is_first: bool) {
        self.members.insert(id, is_first);
        self.invited.remove(&id);
    }

    /// Removes `id` from the channel. If `id` was the channel's only
    /// operator and other members remain, promotes the longest-standing
    /// remaining member so the channel is never left with members but no
    /// operator.
    pub fn remove_member(&mut self, id: ConnId) {
        // `shift_remove` over `swap_remove`: NAMES/broadcast order should stay
        // join order, not have the last joiner silently swapped into a gap.
        self.members.shift_remove(&id);
        self.invited.remove(&id);
        self.promote_operator_if_orphaned();
    }

    pub fn set_operator(&mut self, id: ConnId, is_operator: bool) {
        if let Some(op) = self.members.get_mut(&id) {
            *op = is_operator;
        }
    }

    /// Promotes the earliest-joined remaining member to operator if the
    /// channel is non-empty and has lost its last operator.
    fn promote_operator_if_orphaned(&mut self) {
        if self.members.is_empty() || self.members.values().any(|&is_op| is_op) {
            return;
        }
        if let Some((_, is_op)) = self.members.get_index_mut(0) {
            *is_op = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_joiner_becomes_operator() {
        let mut chan = Channel::new("#r".into());
        chan.add_member(ConnId(1), true);
        assert!(chan.is_operator(ConnId(1)));
    }

    #[test]
    fn later_joiner_is_not_operator() {
        let mut chan = Channel::new("#r".into());
        chan.add_member(ConnId(1), true);
        chan.add_member(ConnId(2), false);
        assert!(!chan.is_operator(ConnId(2)));
    }

    #[test]
    fn departing_operator_promotes_next_member() {
        let mut chan = Channel::new("#r".into());
        chan.add_member(ConnId(1), true);
        chan.add_member(ConnId(2), false);
        chan.add_member(ConnId(3), false);

        chan.remove_member(ConnId(1));

        assert!(chan.is_operator(ConnId(2)));
        assert!(!chan.is_operator(ConnId(3)));
    }

    #[test]
    fn removing_non_operator_does_not_disturb_existing_operator() {
        let mut chan = Channel::new("#r".into());
        chan.add_member(ConnId(1), true);
        chan.add_member(ConnId(2), false);

        chan.remove_member(ConnId(2));

        assert!(chan.is_operator(ConnId(1)));
    }

    #[test]
    fn removing_last_member_leaves_channel_empty() {
        let mut chan = Channel::new("#r".into());
        chan.add_member(ConnId(1), true);

        chan.remove_member(ConnId(1));

        assert!(chan.is_empty());
    }

    #[test]
    fn removing_member_clears_invite() {
        let mut chan = Channel::new("#r".into());
        chan.invited.insert(ConnId(2));
        chan.add_member(ConnId(2), false);
        assert!(!chan.invited.contains(&ConnId(2)));
    }
}
