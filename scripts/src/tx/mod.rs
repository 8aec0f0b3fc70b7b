//! Chain access: the RPC client and the calldata we send through it

pub mod abi;
pub mod client;
