pub mod gbans;
pub mod log_channel;
pub mod modlog;
pub mod raters;
pub mod servers;
