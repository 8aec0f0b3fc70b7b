//! Scripts for deploying and verifying the CryptoDevs NFT, marketplace and DAO contracts.

#![cfg_attr(not(test), deny(clippy::missing_docs_in_private_items))]

pub mod artifacts;
pub mod cli;
pub mod commands;
pub mod constants;
pub mod contracts;
pub mod errors;
pub mod utils;

/// Our build utils
pub mod build;

/// Our deploy utils
pub mod deploy;

/// Our verification utils
pub mod verify;

/// Our output utils
pub mod output_writer;

pub mod tx;
