pub mod arithmetic;
pub mod compose;
pub mod forward;
pub mod structural;

pub use arithmetic::{add, negate, subtract};
pub use compose::compose;
pub use forward::forward;
pub use structural::{
    clone, closure, project, project_input, project_output, remove, remove_labels, sum,
    Projection,
};
