use domain::Id;
use domain::{IntoQueryFilterMap, QueryFilterMap};
use sea_orm::Value;

/// Campaign listings are always scoped to the authenticated user, so this is
/// built by the controller from the session rather than deserialized from the
/// query string.
#[derive(Debug)]
pub(crate) struct IndexParams {
    pub(crate) user_id: Id,
}

impl IntoQueryFilterMap for IndexParams {
    fn into_query_filter_map(self) -> QueryFilterMap {
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert(
            "user_id".to_string(),
            Some(Value::Uuid(Some(Box::new(self.user_id)))),
        );
        query_filter_map
    }
}
