pub mod assist;
pub mod events;
pub mod planning;
pub mod projects;
pub mod users;
