// Identity module - account keypairs and the addresses derived from them

mod address;
mod keypair;

pub use address::*;
pub use keypair::*;
