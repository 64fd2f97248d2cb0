pub(crate) mod game_session_controller;
pub(crate) mod wiki_entry_controller;
