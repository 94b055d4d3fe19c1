pub mod bootstrap;
pub mod cli;
pub mod key_select;
