//! Editor lifecycle extension point.
//!
//! The query editor front end hooks into the store's lifecycle at three
//! moments. None of them carry storage logic; they exist so a
//! presentation layer can wire itself in without the store knowing
//! anything about it. All methods default to no-ops.

/// Lifecycle hooks a presentation layer may implement.
pub trait EditorLifecycle {
    /// Called when the editor surface becomes visible.
    fn mounted(&mut self) {}

    /// Called before the editor surface is torn down.
    fn before_unmount(&mut self) {}

    /// Called once when the editor registers against a store.
    fn register(&mut self) {}
}
