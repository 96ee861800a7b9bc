pub mod channel;
pub mod dispatch;
pub mod fake;
pub mod reconfig;
pub mod sync;
