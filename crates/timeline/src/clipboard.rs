use crate::{Clip, Seconds};

/// Detached copies of clips. The clipboard owns its clips outright, so
/// deleting or editing the originals never touches it.
#[derive(Clone, Debug, Default)]
pub struct Clipboard {
    clips: Vec<Clip>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the clipboard contents. An empty copy leaves the previous
    /// contents in place.
    pub fn store<'a>(&mut self, clips: impl IntoIterator<Item = &'a Clip>) -> usize {
        let mut copied: Vec<Clip> = clips.into_iter().cloned().collect();
        if copied.is_empty() {
            return 0;
        }
        copied.sort_by(|a, b| a.start.total_cmp(&b.start));
        self.clips = copied;
        tracing::debug!(count = self.clips.len(), "Clipboard updated");
        self.clips.len()
    }

    /// Fresh clips ready to insert: new ids, shifted so the earliest copied
    /// clip starts at `at`. Empty when nothing has been copied.
    pub fn instantiate(&self, at: Seconds) -> Vec<Clip> {
        let Some(min_start) = self.min_start() else {
            return Vec::new();
        };
        let offset = at - min_start;
        self.clips
            .iter()
            .map(|clip| clip.duplicate_shifted(offset))
            .collect()
    }

    pub fn min_start(&self) -> Option<Seconds> {
        self.clips.iter().map(|c| c.start).reduce(f64::min)
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MediaKind;

    #[test]
    fn instantiate_shifts_relative_to_earliest_clip() {
        let a = Clip::new(MediaKind::Video, "a.mp4", 12.0, 14.0).with_name("a");
        let b = Clip::new(MediaKind::Audio, "b.wav", 10.0, 11.5).with_layer(2);
        let mut clipboard = Clipboard::new();
        assert_eq!(clipboard.store([&a, &b]), 2);

        let pasted = clipboard.instantiate(20.0);
        assert_eq!(pasted.len(), 2);
        assert_eq!((pasted[0].start, pasted[0].end), (20.0, 21.5));
        assert_eq!((pasted[1].start, pasted[1].end), (22.0, 24.0));
        assert_eq!(pasted[0].layer, Some(2));
        assert_eq!(pasted[1].display_name, "a");
        assert!(pasted.iter().all(|c| c.id != a.id && c.id != b.id));
    }

    #[test]
    fn empty_clipboard_pastes_nothing() {
        let clipboard = Clipboard::new();
        assert!(clipboard.instantiate(3.0).is_empty());
    }

    #[test]
    fn empty_copy_keeps_previous_contents() {
        let a = Clip::new(MediaKind::Image, "a.png", 1.0, 2.0);
        let mut clipboard = Clipboard::new();
        clipboard.store([&a]);
        assert_eq!(clipboard.store(std::iter::empty()), 0);
        assert_eq!(clipboard.len(), 1);
    }
}
