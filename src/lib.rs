#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

pub mod board;
pub mod cell;
pub mod client;
pub mod coord;
pub mod display;
pub mod event;
pub mod grid;
pub mod network;
pub mod test_util;
