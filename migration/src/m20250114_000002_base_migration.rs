use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // gen_random_uuid() for primary keys
        manager
            .get_connection()
            .execute_unprepared(r#"CREATE EXTENSION IF NOT EXISTS "pgcrypto";"#)
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE chronicler.users (
                    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                    email varchar(255) NOT NULL UNIQUE,
                    password varchar(255) NOT NULL,
                    display_name varchar(255),
                    created_at timestamptz NOT NULL DEFAULT now(),
                    updated_at timestamptz NOT NULL DEFAULT now()
                );
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE chronicler.campaigns (
                    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                    user_id uuid NOT NULL REFERENCES chronicler.users(id) ON DELETE CASCADE,
                    title varchar(255) NOT NULL,
                    description text,
                    created_at timestamptz NOT NULL DEFAULT now(),
                    updated_at timestamptz NOT NULL DEFAULT now()
                );
            "#,
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE chronicler.game_sessions (
                    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                    campaign_id uuid NOT NULL REFERENCES chronicler.campaigns(id) ON DELETE CASCADE,
                    title varchar(255) NOT NULL,
                    recap_text text NOT NULL,
                    transcription_text text NOT NULL,
                    created_at timestamptz NOT NULL DEFAULT now(),
                    updated_at timestamptz NOT NULL DEFAULT now()
                );
            "#,
            )
            .await?;

        // parent_id cascades so a subtree dies with its root; session_id is
        // SET NULL so deleting a session never destroys wiki pages.
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TABLE chronicler.wiki_entries (
                    id uuid PRIMARY KEY DEFAULT gen_random_uuid(),
                    campaign_id uuid NOT NULL REFERENCES chronicler.campaigns(id) ON DELETE CASCADE,
                    parent_id uuid REFERENCES chronicler.wiki_entries(id) ON DELETE CASCADE,
                    session_id uuid REFERENCES chronicler.game_sessions(id) ON DELETE SET NULL,
                    title varchar(255) NOT NULL,
                    content text,
                    icon varchar(16) NOT NULL DEFAULT '📄',
                    sibling_order integer NOT NULL DEFAULT 0,
                    related_pages text NOT NULL DEFAULT '[]',
                    created_at timestamptz NOT NULL DEFAULT now(),
                    updated_at timestamptz NOT NULL DEFAULT now()
                );
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DROP TABLE IF EXISTS chronicler.wiki_entries;
                DROP TABLE IF EXISTS chronicler.game_sessions;
                DROP TABLE IF EXISTS chronicler.campaigns;
                DROP TABLE IF EXISTS chronicler.users;
            "#,
            )
            .await?;

        Ok(())
    }
}
