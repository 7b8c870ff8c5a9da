//! Scripts for deploying the staking suite contracts: a reward token, a
//! staking token, and the staking controller wired to both.

#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod constants;
pub mod deployer;
pub mod errors;
pub mod plan;
mod solidity;
pub mod types;
pub mod utils;
