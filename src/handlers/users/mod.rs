// handlers/users/mod.rs - /api/users handlers

pub mod delete;    // DELETE /api/users/:id
pub mod list;      // GET /api/users (admin)
pub mod register;  // POST /api/users
pub mod set_admin; // PATCH /api/users/:id/set-admin (admin)
pub mod show;      // GET /api/users/:id
pub mod update;    // PATCH /api/users/:id

pub use delete::user_delete;
pub use list::user_list;
pub use register::user_register;
pub use set_admin::user_set_admin;
pub use show::user_show;
pub use update::user_update;
