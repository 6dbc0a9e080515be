pub mod history;
pub mod list;
pub mod quote;
pub mod serve;
