pub mod prelude;

pub mod cars;
pub mod contacts;
pub mod users;
