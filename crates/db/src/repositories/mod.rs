pub mod bot_record_repo;

pub use bot_record_repo::BotRecordRepo;
