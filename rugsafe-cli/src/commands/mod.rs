//! Command implementations for the rugsafe CLI

pub mod derive;
pub mod faucet;
pub mod keys;
pub mod rpc;
pub mod vault;
