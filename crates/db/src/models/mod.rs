pub mod bot_record;
