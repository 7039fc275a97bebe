//! Player port definitions.
//!
//! Traits at the seams between the store and the outside world: the socket,
//! persisted storage, the clock and audio output.

pub mod outbound;
