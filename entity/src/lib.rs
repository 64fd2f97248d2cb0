use uuid::Uuid;

pub mod prelude;

pub mod campaigns;
pub mod game_sessions;
pub mod users;
pub mod wiki_entries;

/// A type alias that represents any Entity's internal id field data type.
/// Aliased so that it's easy to change the underlying type if necessary.
pub type Id = Uuid;
