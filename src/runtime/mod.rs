//! Serialized task list runtime and its event stream.

/// Events broadcast after each applied command.
pub mod events;
/// Cloneable handle and the command loop behind it.
pub mod handle;
