pub mod check;
pub mod cli;
pub mod logging;
pub mod output;
pub mod replay;
