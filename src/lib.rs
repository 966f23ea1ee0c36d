//! Audit a deployed contract's observed on-chain events against its
//! declared ABI over a block range: compute the expected event topics,
//! fetch the address's logs in bounded chunks, tally observed topics,
//! and flag anything outside the interface or missing from a required
//! list.

pub mod abi;
pub mod audit;
pub mod models;
pub mod report;
pub mod utils;
