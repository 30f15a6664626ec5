#![allow(dead_code)]

mod mirror;

pub use mirror::*;
