//! Structural rewrites: projection-aware cloning, Kleene closure,
//! union-sum and epsilon-class removal.

pub mod clone;
pub mod closure;
pub mod remove;
pub mod union;

pub use self::clone::{clone, project, project_input, project_output, Projection};
pub use closure::closure;
pub use remove::{remove, remove_labels};
pub use union::sum;
