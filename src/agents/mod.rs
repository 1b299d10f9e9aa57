//! The personas behind the main menu
//!
//! Chat-style agents implement [`convo::Persona`] and run through the shared
//! interaction loop; `code_easy` and `replay` are menu-driven and own their
//! own loops.

pub mod code_easy;
pub mod convo;
pub mod explain_like_x;
pub mod future_sim;
pub mod lingua_link;
pub mod replay;
pub mod study_buddy;
pub mod time_travel;
