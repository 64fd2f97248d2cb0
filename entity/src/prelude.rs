pub use super::campaigns::Entity as Campaigns;
pub use super::game_sessions::Entity as GameSessions;
pub use super::users::Entity as Users;
pub use super::wiki_entries::Entity as WikiEntries;
