use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create the application's schema
        manager
            .get_connection()
            .execute_unprepared("CREATE SCHEMA IF NOT EXISTS chronicler;")
            .await?;

        manager
            .get_connection()
            .execute_unprepared("SET search_path TO chronicler, public;")
            .await?;

        // Create the base DB user that will execute all application queries
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    GRANT ALL PRIVILEGES ON DATABASE chronicler TO chronicler;
                    GRANT ALL ON SCHEMA chronicler TO chronicler;

                    ALTER DEFAULT PRIVILEGES IN SCHEMA chronicler GRANT ALL ON TABLES TO chronicler;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA chronicler GRANT ALL ON SEQUENCES TO chronicler;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA chronicler GRANT ALL ON FUNCTIONS TO chronicler;
                END $$;
            "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Revoke default privileges first
        manager
            .get_connection()
            .execute_unprepared(
                r#"
                DO $$ BEGIN
                    ALTER DEFAULT PRIVILEGES IN SCHEMA chronicler REVOKE ALL ON FUNCTIONS FROM chronicler;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA chronicler REVOKE ALL ON SEQUENCES FROM chronicler;
                    ALTER DEFAULT PRIVILEGES IN SCHEMA chronicler REVOKE ALL ON TABLES FROM chronicler;
                    REVOKE ALL ON SCHEMA chronicler FROM chronicler;
                    REVOKE ALL PRIVILEGES ON DATABASE chronicler FROM chronicler;
                END $$;
            "#,
            )
            .await?;

        // Drop the schema (CASCADE will remove all objects in it)
        manager
            .get_connection()
            .execute_unprepared("DROP SCHEMA IF EXISTS chronicler CASCADE;")
            .await?;

        Ok(())
    }
}
