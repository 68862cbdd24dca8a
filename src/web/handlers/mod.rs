pub mod application_handlers;
pub mod favorite_handlers;
pub mod notification_handlers;
pub mod system_handlers;

pub use application_handlers::*;
pub use favorite_handlers::*;
pub use notification_handlers::*;
pub use system_handlers::*;
