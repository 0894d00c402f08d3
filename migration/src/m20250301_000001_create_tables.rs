use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建学科表
        manager
            .create_table(
                Table::create()
                    .table(Subjects::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Subjects::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Subjects::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Subjects::Slug)
                            .string_len(200)
                            .not_null()
                            .unique_key(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建课程表
        manager
            .create_table(
                Table::create()
                    .table(Courses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Courses::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Courses::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::SubjectId).big_integer().not_null())
                    .col(ColumnDef::new(Courses::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Courses::Slug)
                            .string_len(200)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Courses::Overview).text().not_null())
                    .col(ColumnDef::new(Courses::CreatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Courses::Table, Courses::SubjectId)
                            .to(Subjects::Table, Subjects::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建选课关联表
        manager
            .create_table(
                Table::create()
                    .table(CourseStudents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CourseStudents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CourseStudents::CourseId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CourseStudents::UserId).big_integer().not_null())
                    .col(
                        ColumnDef::new(CourseStudents::EnrolledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseStudents::Table, CourseStudents::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CourseStudents::Table, CourseStudents::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建模块表
        manager
            .create_table(
                Table::create()
                    .table(Modules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Modules::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Modules::CourseId).big_integer().not_null())
                    .col(ColumnDef::new(Modules::Title).string_len(200).not_null())
                    .col(
                        ColumnDef::new(Modules::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Modules::SortOrder).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Modules::Table, Modules::CourseId)
                            .to(Courses::Table, Courses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建上传文件表
        manager
            .create_table(
                Table::create()
                    .table(Uploads::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Uploads::Token)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Uploads::OriginalName).string().not_null())
                    .col(ColumnDef::new(Uploads::FileSize).big_integer().not_null())
                    .col(ColumnDef::new(Uploads::FileType).string().not_null())
                    .col(ColumnDef::new(Uploads::OwnerId).big_integer().not_null())
                    .col(ColumnDef::new(Uploads::UploadedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Uploads::Table, Uploads::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建四种内容条目表（文本 / 文件 / 图片 / 视频）
        manager
            .create_table(item_table(
                Texts::Table,
                ColumnDef::new(Texts::Content).text().not_null().to_owned(),
            ))
            .await?;
        manager
            .create_table(item_table(
                Files::Table,
                ColumnDef::new(Files::File).string().not_null().to_owned(),
            ))
            .await?;
        manager
            .create_table(item_table(
                Images::Table,
                ColumnDef::new(Images::File).string().not_null().to_owned(),
            ))
            .await?;
        manager
            .create_table(item_table(
                Videos::Table,
                ColumnDef::new(Videos::Url).string().not_null().to_owned(),
            ))
            .await?;

        // 创建模块内容表（多态引用：content_type + object_id）
        manager
            .create_table(
                Table::create()
                    .table(Contents::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Contents::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Contents::ModuleId).big_integer().not_null())
                    .col(ColumnDef::new(Contents::ContentType).string().not_null())
                    .col(ColumnDef::new(Contents::ObjectId).big_integer().not_null())
                    .col(ColumnDef::new(Contents::SortOrder).integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Contents::Table, Contents::ModuleId)
                            .to(Modules::Table, Modules::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 索引
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_subject_id")
                    .table(Courses::Table)
                    .col(Courses::SubjectId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_courses_owner_id")
                    .table(Courses::Table)
                    .col(Courses::OwnerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("idx_course_students_course_user")
                    .table(CourseStudents::Table)
                    .col(CourseStudents::CourseId)
                    .col(CourseStudents::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_course_students_user_id")
                    .table(CourseStudents::Table)
                    .col(CourseStudents::UserId)
                    .to_owned(),
            )
            .await?;

        // 排序索引不设唯一约束：批量调整顺序时会出现短暂的重复值
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_modules_course_order")
                    .table(Modules::Table)
                    .col(Modules::CourseId)
                    .col(Modules::SortOrder)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_contents_module_order")
                    .table(Contents::Table)
                    .col(Contents::ModuleId)
                    .col(Contents::SortOrder)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_contents_item")
                    .table(Contents::Table)
                    .col(Contents::ContentType)
                    .col(Contents::ObjectId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Contents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Videos::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Images::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Files::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Texts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Uploads::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Modules::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CourseStudents::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Courses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Subjects::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

/// 内容条目表的公共结构：owner / title / 时间戳 + 各自的载荷列
fn item_table<T>(table: T, payload: ColumnDef) -> TableCreateStatement
where
    T: Iden + Copy + 'static,
{
    Table::create()
        .table(table)
        .if_not_exists()
        .col(
            ColumnDef::new(ItemColumn::Id)
                .big_integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(ItemColumn::OwnerId).big_integer().not_null())
        .col(ColumnDef::new(ItemColumn::Title).string_len(250).not_null())
        .col(payload)
        .col(ColumnDef::new(ItemColumn::CreatedAt).big_integer().not_null())
        .col(ColumnDef::new(ItemColumn::UpdatedAt).big_integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .from(table, ItemColumn::OwnerId)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Subjects {
    #[sea_orm(iden = "subjects")]
    Table,
    Id,
    Title,
    Slug,
}

#[derive(DeriveIden)]
enum Courses {
    #[sea_orm(iden = "courses")]
    Table,
    Id,
    OwnerId,
    SubjectId,
    Title,
    Slug,
    Overview,
    CreatedAt,
}

#[derive(DeriveIden)]
enum CourseStudents {
    #[sea_orm(iden = "course_students")]
    Table,
    Id,
    CourseId,
    UserId,
    EnrolledAt,
}

#[derive(DeriveIden)]
enum Modules {
    #[sea_orm(iden = "modules")]
    Table,
    Id,
    CourseId,
    Title,
    Description,
    SortOrder,
}

#[derive(DeriveIden)]
enum Contents {
    #[sea_orm(iden = "contents")]
    Table,
    Id,
    ModuleId,
    ContentType,
    ObjectId,
    SortOrder,
}

#[derive(DeriveIden)]
enum Uploads {
    #[sea_orm(iden = "uploads")]
    Table,
    Token,
    OriginalName,
    FileSize,
    FileType,
    OwnerId,
    UploadedAt,
}

#[derive(DeriveIden)]
enum ItemColumn {
    Id,
    OwnerId,
    Title,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden, Clone, Copy)]
enum Texts {
    #[sea_orm(iden = "texts")]
    Table,
    Content,
}

#[derive(DeriveIden, Clone, Copy)]
enum Files {
    #[sea_orm(iden = "files")]
    Table,
    File,
}

#[derive(DeriveIden, Clone, Copy)]
enum Images {
    #[sea_orm(iden = "images")]
    Table,
    File,
}

#[derive(DeriveIden, Clone, Copy)]
enum Videos {
    #[sea_orm(iden = "videos")]
    Table,
    Url,
}
