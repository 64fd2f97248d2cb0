use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // The tree builder reads whole campaigns at a time
        manager
            .create_index(
                Index::create()
                    .name("wiki_entries_campaign_id")
                    .table((Alias::new("chronicler"), Alias::new("wiki_entries")))
                    .col(Alias::new("campaign_id"))
                    .to_owned(),
            )
            .await?;

        // The merge engine's natural-key lookup
        manager
            .create_index(
                Index::create()
                    .name("wiki_entries_campaign_id_title")
                    .table((Alias::new("chronicler"), Alias::new("wiki_entries")))
                    .col(Alias::new("campaign_id"))
                    .col(Alias::new("title"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("game_sessions_campaign_id")
                    .table((Alias::new("chronicler"), Alias::new("game_sessions")))
                    .col(Alias::new("campaign_id"))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("campaigns_user_id")
                    .table((Alias::new("chronicler"), Alias::new("campaigns")))
                    .col(Alias::new("user_id"))
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for (table, name) in [
            ("wiki_entries", "wiki_entries_campaign_id"),
            ("wiki_entries", "wiki_entries_campaign_id_title"),
            ("game_sessions", "game_sessions_campaign_id"),
            ("campaigns", "campaigns_user_id"),
        ] {
            manager
                .drop_index(
                    Index::drop()
                        .name(name)
                        .table((Alias::new("chronicler"), Alias::new(table)))
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }
}
