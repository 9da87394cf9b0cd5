pub mod assessment;
pub mod caller;
pub mod daily_log;
