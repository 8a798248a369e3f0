pub use command_service::CommandCenter;
pub use scheduler_service::{AutoSignalScheduler, StartOutcome, StopOutcome};
pub use telegram_service::TelegramService;

pub mod command_service;
pub mod scheduler_service;
pub mod telegram_service;

#[cfg(test)]
pub mod test_support;
