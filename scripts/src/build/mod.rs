//! Compilation of the solidity contracts

pub mod hardhat;
