//! Command implementations.

mod common;
mod describe;
mod fields;
mod git;
mod hg;

// Re-export all command argument structs
pub use common::OutputArgs;
pub use describe::{
    DescribeArgs,
    describe,
};
pub use fields::{
    FieldsArgs,
    fields,
};
pub use git::{
    GitArgs,
    git,
};
pub use hg::{
    HgArgs,
    hg,
};
