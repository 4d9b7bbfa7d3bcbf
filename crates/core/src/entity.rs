//! Identity of the records list screens show, edit and delete.

/// A backend record that keeps its `_id` across page reloads, so an
/// optimistic change can find the same row again.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    fn has_id(&self, id: &Self::Id) -> bool {
        self.id() == id
    }
}
