pub mod suggestion;
pub mod user;
pub mod vote;

pub use suggestion::Entity as Suggestion;
pub use user::Entity as User;
pub use vote::Entity as Vote;
