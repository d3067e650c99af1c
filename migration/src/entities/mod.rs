pub mod event;
pub mod session;
pub mod user;

pub use event::Entity as EventEntity;
pub use session::Entity as SessionEntity;
pub use user::Entity as UserEntity;
