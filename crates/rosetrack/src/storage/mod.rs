pub mod memory;

pub use memory::MemorySessionStore;

/// Session-scoped key/value storage (the browser's `sessionStorage`).
///
/// Values live until the browsing session ends; clearing is up to the host.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the write (quota, private mode).
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
}
