#![allow(dead_code)]

pub mod fixture;
pub mod gradecast_env;
