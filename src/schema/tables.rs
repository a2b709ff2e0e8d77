// Rule tables for every payload the API accepts

use super::{CrossRule, FieldRule, Schema};
use crate::database::models::TaskStatus;

pub const SET_ADMIN_MESSAGE: &str = "isAdmin field is required and must be boolean";

pub fn user_create() -> Schema {
    Schema::new("user create")
        .field(FieldRule::text("username").min(3).max(50).trim().required())
        .field(FieldRule::text("password").min(8).max(50).required())
        .field(FieldRule::text("email").min(5).max(50).trim().email().required())
}

pub fn user_update() -> Schema {
    user_create().as_update("user update")
}

pub fn credentials() -> Schema {
    Schema::new("credentials")
        .field(FieldRule::text("username").min(3).max(50).trim())
        .field(FieldRule::text("password").min(8).max(50).required())
        .field(FieldRule::text("email").min(5).max(50).trim().email())
        .rule(CrossRule::ExactlyOneOf(&["email", "username"]))
}

pub fn task_create() -> Schema {
    Schema::new("task create")
        .field(FieldRule::text("name").min(2).max(50).trim().required())
        .field(FieldRule::text("status").trim().one_of(&TaskStatus::ALL))
        .field(FieldRule::date("dueDate"))
}

pub fn task_update() -> Schema {
    task_create().as_update("task update")
}

pub fn set_admin() -> Schema {
    Schema::new("set admin").field(FieldRule::boolean("isAdmin").required().message(SET_ADMIN_MESSAGE))
}
