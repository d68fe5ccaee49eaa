// SPDX-FileCopyrightText: 2026 Columbus Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pending attachments for the next outgoing turn.
//!
//! An [`AttachmentSet`] keeps the user's selected files in the order they were
//! added. Every entry owns a [`DisplayHandle`] acquired from a
//! [`PreviewRegistry`]; the handle is released when the entry is removed or
//! the set is cleared, so previews never accumulate.

use std::sync::Arc;

use columbus_core::AttachmentRef;
use dashmap::DashMap;
use tracing::debug;

/// A user-selected file, fully read into memory.
///
/// Cloning is cheap: the bytes are shared and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    display_name: String,
    media_type: String,
    bytes: Arc<[u8]>,
    declared_size: usize,
}

impl Attachment {
    /// Creates an attachment whose declared size is the buffer length.
    pub fn new(
        display_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        let bytes: Vec<u8> = bytes.into();
        let declared_size = bytes.len();
        Self::with_declared_size(display_name, media_type, bytes, declared_size)
    }

    /// Creates an attachment whose source reported `declared_size` bytes.
    ///
    /// A mismatch with the buffer length means the read did not complete and
    /// makes the attachment fail to encode.
    pub fn with_declared_size(
        display_name: impl Into<String>,
        media_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
        declared_size: usize,
    ) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            display_name: display_name.into(),
            media_type: media_type.into(),
            bytes: Arc::from(bytes),
            declared_size,
        }
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn declared_size(&self) -> usize {
        self.declared_size
    }

    /// True when the buffer holds exactly the declared number of bytes.
    pub fn is_complete(&self) -> bool {
        self.bytes.len() == self.declared_size
    }
}

/// Tracks preview handles that are currently alive.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<DashMap<String, String>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires a handle for displaying `display_name`. Released on drop.
    pub fn acquire(&self, display_name: &str) -> DisplayHandle {
        let id = format!("preview-{}", uuid::Uuid::new_v4());
        self.live.insert(id.clone(), display_name.to_string());
        DisplayHandle {
            id,
            live: Arc::clone(&self.live),
        }
    }

    /// Number of handles not yet released.
    pub fn live(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, handle_id: &str) -> bool {
        self.live.contains_key(handle_id)
    }
}

/// Scoped display resource for one pending attachment.
#[derive(Debug)]
pub struct DisplayHandle {
    id: String,
    live: Arc<DashMap<String, String>>,
}

impl DisplayHandle {
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        self.live.remove(&self.id);
    }
}

/// An attachment in the set together with its display handle.
#[derive(Debug)]
pub struct PendingAttachment {
    attachment: Attachment,
    handle: DisplayHandle,
}

impl PendingAttachment {
    pub fn attachment(&self) -> &Attachment {
        &self.attachment
    }

    pub fn handle_id(&self) -> &str {
        self.handle.id()
    }

    /// Plain-data reference suitable for a transcript entry.
    pub fn reference(&self) -> AttachmentRef {
        AttachmentRef {
            handle_id: self.handle.id().to_string(),
            display_name: self.attachment.display_name.clone(),
            media_type: self.attachment.media_type.clone(),
            size: self.attachment.bytes.len(),
        }
    }
}

/// Immutable copy of the set taken when a submission begins.
#[derive(Debug, Clone, Default)]
pub struct AttachmentSnapshot {
    attachments: Vec<Attachment>,
    references: Vec<AttachmentRef>,
}

impl AttachmentSnapshot {
    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    pub fn references(&self) -> &[AttachmentRef] {
        &self.references
    }

    pub fn len(&self) -> usize {
        self.attachments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attachments.is_empty()
    }
}

/// Ordered collection of attachments pending for the next turn.
#[derive(Debug, Default)]
pub struct AttachmentSet {
    entries: Vec<PendingAttachment>,
    registry: PreviewRegistry,
}

impl AttachmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a set that acquires its display handles from `registry`.
    pub fn with_registry(registry: PreviewRegistry) -> Self {
        Self {
            entries: Vec::new(),
            registry,
        }
    }

    /// Appends `files` in order. Same-named files are kept as distinct entries.
    pub fn add(&mut self, files: impl IntoIterator<Item = Attachment>) {
        for attachment in files {
            let handle = self.registry.acquire(&attachment.display_name);
            debug!(
                name = attachment.display_name.as_str(),
                size = attachment.bytes.len(),
                "attachment added"
            );
            self.entries.push(PendingAttachment { attachment, handle });
        }
    }

    /// Removes the entry at `index` and releases its display handle.
    ///
    /// An out-of-range index leaves the set unchanged and returns `None`.
    pub fn remove_at(&mut self, index: usize) -> Option<Attachment> {
        if index >= self.entries.len() {
            return None;
        }
        let removed = self.entries.remove(index);
        Some(removed.attachment)
    }

    /// Empties the set, releasing every display handle. Idempotent.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Ordered, immutable copy of the current contents.
    pub fn snapshot(&self) -> AttachmentSnapshot {
        AttachmentSnapshot {
            attachments: self.entries.iter().map(|e| e.attachment.clone()).collect(),
            references: self.entries.iter().map(PendingAttachment::reference).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PendingAttachment> {
        self.entries.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingAttachment> {
        self.entries.iter()
    }

    /// The registry this set acquires handles from.
    pub fn registry(&self) -> &PreviewRegistry {
        &self.registry
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn file(name: &str) -> Attachment {
        Attachment::new(name, "image/png", name.as_bytes().to_vec())
    }

    fn names(set: &AttachmentSet) -> Vec<String> {
        set.iter()
            .map(|e| e.attachment().display_name().to_string())
            .collect()
    }

    #[test]
    fn add_preserves_order_and_duplicates() {
        let mut set = AttachmentSet::new();
        set.add([file("a.png"), file("b.png")]);
        set.add([file("a.png")]);
        assert_eq!(names(&set), ["a.png", "b.png", "a.png"]);
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut set = AttachmentSet::new();
        set.add([file("a.png")]);
        assert!(set.remove_at(1).is_none());
        assert!(set.remove_at(usize::MAX).is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn clear_is_idempotent() {
        let mut set = AttachmentSet::new();
        set.clear();
        assert!(set.is_empty());
        set.add([file("a.png")]);
        set.clear();
        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn handles_released_on_remove_and_clear() {
        let registry = PreviewRegistry::new();
        let mut set = AttachmentSet::with_registry(registry.clone());
        set.add([file("a.png"), file("b.png"), file("c.png")]);
        assert_eq!(registry.live(), 3);

        let b_handle = set.get(1).unwrap().handle_id().to_string();
        set.remove_at(1);
        assert_eq!(registry.live(), 2);
        assert!(!registry.is_live(&b_handle));

        set.clear();
        assert_eq!(registry.live(), 0);
    }

    #[test]
    fn handles_released_when_set_dropped() {
        let registry = PreviewRegistry::new();
        {
            let mut set = AttachmentSet::with_registry(registry.clone());
            set.add([file("a.png")]);
            assert_eq!(registry.live(), 1);
        }
        assert_eq!(registry.live(), 0);
    }

    #[test]
    fn snapshot_is_decoupled_from_later_mutation() {
        let mut set = AttachmentSet::new();
        set.add([file("a.png"), file("b.png")]);
        let snapshot = set.snapshot();
        set.remove_at(0);
        set.add([file("c.png")]);

        let snap_names: Vec<&str> = snapshot
            .attachments()
            .iter()
            .map(Attachment::display_name)
            .collect();
        assert_eq!(snap_names, ["a.png", "b.png"]);
        assert_eq!(snapshot.references()[1].display_name, "b.png");
        assert_eq!(snapshot.references()[1].size, 5);
    }

    #[test]
    fn declared_size_mismatch_marks_incomplete() {
        let full = Attachment::new("a.png", "image/png", vec![0u8; 4]);
        assert!(full.is_complete());
        let short = Attachment::with_declared_size("a.png", "image/png", vec![0u8; 2], 4);
        assert!(!short.is_complete());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8),
        Remove(usize),
        Clear,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            4 => any::<u8>().prop_map(Op::Add),
            3 => (0usize..12).prop_map(Op::Remove),
            1 => Just(Op::Clear),
        ]
    }

    proptest! {
        #[test]
        fn set_order_matches_model(ops in proptest::collection::vec(op(), 0..40)) {
            let registry = PreviewRegistry::new();
            let mut set = AttachmentSet::with_registry(registry.clone());
            let mut model: Vec<String> = Vec::new();

            for op in ops {
                match op {
                    Op::Add(n) => {
                        let name = format!("f{n}.png");
                        set.add([file(&name)]);
                        model.push(name);
                    }
                    Op::Remove(i) => {
                        let removed = set.remove_at(i);
                        if i < model.len() {
                            let expected = model.remove(i);
                            prop_assert_eq!(removed.map(|a| a.display_name().to_string()), Some(expected));
                        } else {
                            prop_assert!(removed.is_none());
                        }
                    }
                    Op::Clear => {
                        set.clear();
                        model.clear();
                    }
                }
                prop_assert_eq!(names(&set), model.clone());
                prop_assert_eq!(registry.live(), model.len());
            }
        }
    }
}
