// Services for the scroll restorer.

pub mod restore_controller;
pub mod scheduler;
