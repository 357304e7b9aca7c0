pub mod collision;
pub mod config;
pub mod constants;
pub mod entity;
pub mod error;
pub mod geom;
pub mod protocol;
pub mod world;

pub use config::Config;
pub use error::ProtocolError;
pub use protocol::Move;
pub use world::World;
