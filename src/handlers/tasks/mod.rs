// handlers/tasks/mod.rs - /api/tasks handlers (all require a token)

pub mod create; // POST /api/tasks
pub mod delete; // DELETE /api/tasks/:id
pub mod list;   // GET /api/tasks
pub mod update; // PATCH /api/tasks/:id

pub use create::task_create;
pub use delete::task_delete;
pub use list::task_list;
pub use update::task_update;
