pub mod task;
pub mod user;

pub use task::{NewTask, OwnerRef, Task, TaskPatch, TaskRow, TaskStatus};
pub use user::{AdminFlag, Credentials, NewUser, User, UserChanges, UserPatch};
