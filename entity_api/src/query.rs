use crate::{error::Error, QueryFilterMap};
use sea_orm::strum::IntoEnumIterator;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Find all records of an entity by the given query filter map.
pub async fn find_by<E, C>(
    db: &DatabaseConnection,
    query_filter_map: QueryFilterMap,
) -> Result<Vec<E::Model>, Error>
where
    E: EntityTrait,
    C: ColumnTrait + IntoEnumIterator,
{
    let mut query = E::find();

    // We iterate through the entity's defined columns so that we only attempt
    // to filter by columns that exist.
    for column in C::iter() {
        if let Some(value) = query_filter_map.get(&column.to_string()) {
            query = query.filter(column.eq(value));
        }
    }

    Ok(query.all(db).await?)
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::{campaigns, Id};
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction, Value};

    #[tokio::test]
    async fn find_by_filters_only_on_columns_present_in_the_map() -> Result<(), Error> {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results::<campaigns::Model, Vec<_>, _>(vec![vec![]])
            .into_connection();

        let user_id = Id::new_v4();
        let mut query_filter_map = QueryFilterMap::new();
        query_filter_map.insert("user_id".to_string(), Some(Value::Uuid(Some(Box::new(user_id)))));
        query_filter_map.insert("not_a_column".to_string(), Some(Value::Int(Some(1))));

        let _ = find_by::<campaigns::Entity, campaigns::Column>(&db, query_filter_map).await?;

        assert_eq!(
            db.into_transaction_log(),
            [Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                r#"SELECT "campaigns"."id", "campaigns"."user_id", "campaigns"."title", "campaigns"."description", "campaigns"."created_at", "campaigns"."updated_at" FROM "chronicler"."campaigns" WHERE "campaigns"."user_id" = $1"#,
                [user_id.into()]
            )]
        );

        Ok(())
    }
}
