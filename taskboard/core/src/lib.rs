//! Core domain models and view derivation for Taskboard.
pub mod task;
pub mod view;

pub use task::{NewTask, ParsePriorityError, Priority, Task, TaskId, TaskPatch};
pub use view::{
    Counts, DerivedView, Filter, ParseFilterError, ParseSortMethodError, SortMethod, derive,
};
