//! Terminal presentation of the client state.

pub mod markup;
pub mod terminal;

pub use terminal::TerminalView;
