// handlers/mod.rs - Route handlers grouped by resource
//
// Every handler builds a RequestContext, runs its route's pipeline from
// AppState, and only then touches the store. Anything a stage rejects is
// returned to the client as-is.

pub mod auth;    // POST /api/auth
pub mod system;  // GET /, GET /health, fallback
pub mod tasks;   // /api/tasks[/:id]
pub mod users;   // /api/users[/:id][/set-admin]
