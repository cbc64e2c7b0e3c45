//! UI Components
//!
//! Reusable Leptos components.

mod auth_form;
mod delete_confirm_button;
mod header;
mod new_task_form;
mod task_item;
mod task_list;

pub use auth_form::AuthForm;
pub use delete_confirm_button::DeleteConfirmButton;
pub use header::Header;
pub use new_task_form::NewTaskForm;
pub use task_item::TaskItem;
pub use task_list::TaskList;
