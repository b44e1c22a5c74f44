pub mod embeds;
pub mod gban;
