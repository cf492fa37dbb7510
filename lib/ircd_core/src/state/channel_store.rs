use crate::net::connection::ConnId;
use crate::state::channel::Channel;
use hashbrown::HashMap;

/// Owns every live channel, keyed by its byte-exact name. A channel with zero
/// members is dropped rather than retained indefinitely, so an abandoned
/// channel doesn't linger in the store forever.
#[derive(Default)]
pub struct ChannelStore {
    channels: HashMap<String, Channel>,
}

impl ChannelStore {
    pub fn new() -> ChannelStore {
        ChannelStore { channels: HashMap::new() }
    }

    pub fn get(&self, name: &str) -> Option<&Channel> {
        self.channels.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Channel> {
        self.channels.get_mut(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.channels.contains_key(name)
    }

    /// Looks up `name`, creating it (with no members yet) if absent.
    /// Returns whether the channel was just created, so the caller can make
    /// the first joiner operator.
    pub fn get_or_create(&mut self, name: &str) -> (&mut Channel, bool) {
        let created = !self.channels.contains_key(name);
        let channel = self
            .channels
            .entry(name.to_string())
            .or_insert_with(|| Channel::new(name.to_string()));
        (channel, created)
    }

    /// Removes `id` from every channel it belongs to, garbage-collecting any
    /// channel left with zero members. Returns the names of channels the
    /// connection was removed from (for fan-out).
    pub fn remove_member_everywhere(&mut self, id: ConnId) -> Vec<String> {
        let mut touched = Vec::new();

        self.channels.retain(|name, channel| {
            if channel.is_member(id) {
                channel.remove_member(id);
                touched.push(name.clone());
            }
            !channel.is_empty()
        });

        touched
    }

    /// Drops a channel explicitly if it has become empty (e.g. right after a
    /// KICK that emptied it).
    pub fn gc_if_empty(&mut self, name: &str) {
        if self.channels.get(name).map_or(false, Channel::is_empty) {
            self.channels.remove(name);
        }
    }

    pub fn names_containing(&self, id: ConnId) -> Vec<String> {
        self.channels
            .values()
            .filter(|c| c.is_member(id))
            .map(|c| c.name.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_or_create_marks_first_creation() {
        let mut store = ChannelStore::new();
        let (_, created) = store.get_or_create("#r");
        assert!(created);
        let (_, created_again) = store.get_or_create("#r");
        assert!(!created_again);
    }

    #[test]
    fn channel_is_garbage_collected_once_empty() {
        let mut store = ChannelStore::new();
        {
            let (chan, _) = store.get_or_create("#r");
            chan.add_member(ConnId(1), true);
        }
        store.remove_member_everywhere(ConnId(1));
        assert!(!store.exists("#r"));
    }

    #[test]
    fn case_sensitive_names_are_distinct() {
        let mut store = ChannelStore::new();
        store.get_or_create("#R");
        assert!(!store.exists("#r"));
        assert!(store.exists("#R"));
    }
}
