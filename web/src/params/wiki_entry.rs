use domain::{IntoUpdateMap, UpdateMap};
use serde::Deserialize;
use utoipa::ToSchema;

/// Partial update body for a wiki entry. Only the fields present are written,
/// which makes the autosave endpoint safe to call with unchanged content.
#[derive(Debug, Deserialize, ToSchema)]
pub(crate) struct UpdateParams {
    pub(crate) title: Option<String>,
    pub(crate) content: Option<String>,
    pub(crate) icon: Option<String>,
    pub(crate) sibling_order: Option<i32>,
    /// JSON array of related page titles, serialized as a string.
    pub(crate) related_pages: Option<String>,
}

impl IntoUpdateMap for UpdateParams {
    fn into_update_map(self) -> UpdateMap {
        let mut update_map = UpdateMap::new();
        if let Some(title) = self.title {
            update_map.insert("title".to_string(), Some(title.into()));
        }
        if let Some(content) = self.content {
            update_map.insert("content".to_string(), Some(content.into()));
        }
        if let Some(icon) = self.icon {
            update_map.insert("icon".to_string(), Some(icon.into()));
        }
        if let Some(sibling_order) = self.sibling_order {
            update_map.insert("sibling_order".to_string(), Some(sibling_order.into()));
        }
        if let Some(related_pages) = self.related_pages {
            update_map.insert("related_pages".to_string(), Some(related_pages.into()));
        }
        update_map
    }
}
