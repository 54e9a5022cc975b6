//! Handlers 模块

pub mod auth;
pub mod device_sync;
pub mod devices;
pub mod media;
pub mod metrics;
pub mod sites;
pub mod users;

pub use auth::*;
pub use device_sync::*;
pub use devices::*;
pub use media::*;
pub use metrics::*;
pub use sites::*;
pub use users::*;
