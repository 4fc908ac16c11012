pub mod dispatch;
pub mod inspect;
pub mod promote;
pub mod schema;
pub mod validate;
