//! Per-user state for NeuroBOT.
//!
//! An in-memory assistant conversation that always ends on an assistant
//! turn, and the locally persisted profile of the signed-in employee.

pub mod conversation;
pub mod profile_store;

pub use conversation::ConversationManager;
pub use profile_store::ProfileStore;
