//! Joined channels and their member lists.

use std::collections::BTreeMap;

use crate::casemap::irc_to_lower;

/// Channel privilege prefixes that may precede a nick in a NAMES reply.
pub const MODE_PREFIXES: &[char] = &['~', '&', '@', '%', '+'];

/// Strip NAMES privilege prefixes (`~&@%+`) from a nick.
pub fn strip_mode_prefix(nick: &str) -> &str {
    nick.trim_start_matches(MODE_PREFIXES)
}

#[derive(Clone, Debug)]
struct Channel {
    name: String,
    /// Folded nick -> nick as last seen.
    members: BTreeMap<String, String>,
}

impl Channel {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            members: BTreeMap::new(),
        }
    }

    fn insert(&mut self, nick: &str) {
        self.members.insert(irc_to_lower(nick), nick.to_string());
    }

    fn remove(&mut self, nick: &str) -> bool {
        self.members.remove(&irc_to_lower(nick)).is_some()
    }
}

/// Channels the local client has joined, in join order, each with its
/// member set.
///
/// Membership only exists for joined channels: updates addressed to any
/// other channel are ignored, and dropping a channel drops its members
/// with it.
#[derive(Clone, Debug, Default)]
pub struct ChannelTracker {
    channels: Vec<Channel>,
}

impl ChannelTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, channel: &str) -> Option<usize> {
        let key = irc_to_lower(channel);
        self.channels
            .iter()
            .position(|c| irc_to_lower(&c.name) == key)
    }

    fn get_mut(&mut self, channel: &str) -> Option<&mut Channel> {
        let key = irc_to_lower(channel);
        self.channels
            .iter_mut()
            .find(|c| irc_to_lower(&c.name) == key)
    }

    /// Record a self-JOIN. Returns false if already joined.
    pub fn join(&mut self, channel: &str) -> bool {
        if self.position(channel).is_some() {
            return false;
        }
        self.channels.push(Channel::new(channel));
        true
    }

    /// Forget a channel and its members. Returns false if not joined.
    pub fn remove(&mut self, channel: &str) -> bool {
        match self.position(channel) {
            Some(i) => {
                self.channels.remove(i);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, channel: &str) -> bool {
        self.position(channel).is_some()
    }

    /// Add `nick` to a joined channel.
    pub fn add_member(&mut self, channel: &str, nick: &str) -> bool {
        match self.get_mut(channel) {
            Some(chan) => {
                chan.insert(nick);
                true
            }
            None => false,
        }
    }

    pub fn remove_member(&mut self, channel: &str, nick: &str) -> bool {
        self.get_mut(channel)
            .map(|chan| chan.remove(nick))
            .unwrap_or(false)
    }

    /// Merge one NAMES reply into a joined channel, stripping privilege
    /// prefixes. Returns the stripped nicks in reply order.
    pub fn merge_names<'a, I>(&mut self, channel: &str, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(strip_mode_prefix)
            .filter(|nick| !nick.is_empty())
            .map(str::to_owned)
            .collect();
        if let Some(chan) = self.get_mut(channel) {
            for nick in &names {
                chan.insert(nick);
            }
        }
        names
    }

    /// Remove `nick` from every channel. Returns the channels it was in,
    /// in join order.
    pub fn quit(&mut self, nick: &str) -> Vec<String> {
        self.channels
            .iter_mut()
            .filter_map(|chan| chan.remove(nick).then(|| chan.name.clone()))
            .collect()
    }

    /// Rename `old` to `new` everywhere. Returns the channels affected, in
    /// join order.
    pub fn rename(&mut self, old: &str, new: &str) -> Vec<String> {
        self.channels
            .iter_mut()
            .filter_map(|chan| {
                if chan.remove(old) {
                    chan.insert(new);
                    Some(chan.name.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    pub fn is_member(&self, channel: &str, nick: &str) -> bool {
        let key = irc_to_lower(nick);
        self.position(channel)
            .map(|i| self.channels[i].members.contains_key(&key))
            .unwrap_or(false)
    }

    /// Joined channel names, in join order.
    pub fn channels(&self) -> Vec<String> {
        self.channels.iter().map(|c| c.name.clone()).collect()
    }

    /// Members of a joined channel, sorted by folded nick.
    pub fn members(&self, channel: &str) -> Option<Vec<String>> {
        self.position(channel)
            .map(|i| self.channels[i].members.values().cloned().collect())
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    pub fn clear(&mut self) {
        self.channels.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker_with(channels: &[&str]) -> ChannelTracker {
        let mut tracker = ChannelTracker::new();
        for channel in channels {
            tracker.join(channel);
        }
        tracker
    }

    #[test]
    fn test_join_and_remove() {
        let mut tracker = tracker_with(&["#test"]);
        assert!(tracker.contains("#TEST"));
        assert!(!tracker.join("#test"));
        assert!(tracker.remove("#test"));
        assert!(tracker.is_empty());
        assert_eq!(tracker.members("#test"), None);
    }

    #[test]
    fn test_members_only_for_joined_channels() {
        let mut tracker = tracker_with(&["#test"]);
        assert!(tracker.add_member("#test", "alice"));
        assert!(!tracker.add_member("#elsewhere", "alice"));
        assert_eq!(tracker.members("#elsewhere"), None);
    }

    #[test]
    fn test_merge_names_strips_prefixes() {
        let mut tracker = tracker_with(&["#test"]);
        let names = tracker.merge_names("#test", "alice @bob +carol ~dave %&erin".split(' '));
        assert_eq!(names, vec!["alice", "bob", "carol", "dave", "erin"]);
        assert_eq!(
            tracker.members("#test").unwrap(),
            vec!["alice", "bob", "carol", "dave", "erin"]
        );
    }

    #[test]
    fn test_merge_names_for_unjoined_channel_leaves_state_alone() {
        let mut tracker = ChannelTracker::new();
        let names = tracker.merge_names("#test", ["@op"]);
        assert_eq!(names, vec!["op"]);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_quit_reports_channels_in_join_order() {
        let mut tracker = tracker_with(&["#test", "#other", "#third"]);
        tracker.add_member("#other", "bob");
        tracker.add_member("#test", "Bob");
        let channels = tracker.quit("BOB");
        assert_eq!(channels, vec!["#test", "#other"]);
        assert!(!tracker.is_member("#test", "bob"));
        assert!(!tracker.is_member("#other", "bob"));
    }

    #[test]
    fn test_rename_moves_membership() {
        let mut tracker = tracker_with(&["#test", "#other"]);
        tracker.add_member("#test", "bob");
        let channels = tracker.rename("bob", "robert");
        assert_eq!(channels, vec!["#test"]);
        assert!(tracker.is_member("#test", "robert"));
        assert!(!tracker.is_member("#test", "bob"));
    }
}
