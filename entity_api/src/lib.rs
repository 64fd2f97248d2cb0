use chrono::Utc;
use password_auth::generate_hash;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, Value};
use std::collections::HashMap;

pub use entity::{campaigns, game_sessions, users, wiki_entries, Id};

pub mod campaign;
pub mod error;
pub mod game_session;
pub mod mutate;
pub mod query;
pub mod user;
pub mod wiki_entry;

/// `QueryFilterMap` is a data structure that serves as a bridge for translating filter parameters
/// between different layers of the application. It is essentially a wrapper around a `HashMap`
/// where the keys are filter parameter names (as `String`) and the values are optional `Value` types
/// from `sea_orm`.
///
/// This structure is particularly useful in scenarios where you need to pass filter parameters
/// from a web request down to the database query layer in a type-safe and organized manner.
///
/// # Example
///
/// ```
/// use sea_orm::Value;
/// use entity_api::QueryFilterMap;
///
/// let mut query_filter_map = QueryFilterMap::new();
/// query_filter_map.insert("campaign_id".to_string(), Some(Value::String(Some(Box::new("a_campaign_id".to_string())))));
/// let filter_value = query_filter_map.get("campaign_id");
/// ```
pub struct QueryFilterMap {
    map: HashMap<String, Option<Value>>,
}

impl QueryFilterMap {
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        // HashMap.get returns an Option and so we need to "flatten" this to a single Option
        self.map
            .get(key)
            .and_then(|inner_option| inner_option.clone())
    }

    pub fn insert(&mut self, key: String, value: Option<Value>) {
        self.map.insert(key, value);
    }
}

impl Default for QueryFilterMap {
    fn default() -> Self {
        Self::new()
    }
}

/// `IntoQueryFilterMap` is a trait that provides a method for converting a struct into a `QueryFilterMap`.
/// This is particularly useful for translating data between different layers of the application,
/// such as from web request parameters to database query filters.
pub trait IntoQueryFilterMap {
    fn into_query_filter_map(self) -> QueryFilterMap;
}

/// Seeds a demo user with one campaign so a fresh install has something to log into.
pub async fn seed_database(db: &DatabaseConnection) {
    let now = Utc::now();

    let demo_user: users::ActiveModel = users::ActiveModel {
        email: Set("gm@chronicler.dev".to_owned()),
        password: Set(generate_hash("password")),
        display_name: Set(Some("Demo GM".to_owned())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    campaigns::ActiveModel {
        user_id: Set(demo_user.id.unwrap()),
        title: Set("The Sunken Vale".to_owned()),
        description: Set(Some(
            "A starter campaign to try the session recorder against.".to_owned(),
        )),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_filter_map_flattens_missing_and_none_values() {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert("empty".to_string(), None);
        query_filter_map.insert(
            "campaign_id".to_string(),
            Some(Value::String(Some(Box::new("abc".to_string())))),
        );

        assert!(query_filter_map.get("missing").is_none());
        assert!(query_filter_map.get("empty").is_none());
        assert!(query_filter_map.get("campaign_id").is_some());
    }
}
