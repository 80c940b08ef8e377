pub mod ack;
pub mod identity;

pub use ack::{InsertAck, UpdateAck};
pub use identity::Identity;
