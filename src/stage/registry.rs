// Name -> clip lookup, filled once when the model arrives

use super::animation::ClipHandle;
use log::{info, warn};
use std::collections::HashMap;

/// Maps lowercase clip names to the mixer's playable handles
#[derive(Debug, Default)]
pub struct AnimationRegistry {
    clips: HashMap<String, ClipHandle>,
    populated: bool,
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the registry. Only the first call has any effect.
    ///
    /// Names are lowercased; when two clips share a name the first one wins.
    pub fn populate<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, ClipHandle)>,
    {
        if self.populated {
            warn!("Animation registry already populated, ignoring new clips");
            return;
        }

        for (name, handle) in entries {
            let name = name.to_lowercase();
            if self.clips.contains_key(&name) {
                warn!("Duplicate animation '{}', keeping the first", name);
                continue;
            }
            info!("Loaded animation: {}", name);
            self.clips.insert(name, handle);
        }

        self.populated = true;
    }

    /// Look up a clip; unknown names are simply absent
    pub fn get(&self, name: &str) -> Option<ClipHandle> {
        self.clips.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.clips.contains_key(name)
    }

    pub fn is_populated(&self) -> bool {
        self.populated
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.clips.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
