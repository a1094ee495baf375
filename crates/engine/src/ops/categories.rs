use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*, sea_query::Expr};
use uuid::Uuid;

use crate::{
    Category, NewCategoryCmd, ResultEngine, UpdateCategoryCmd, categories, transactions,
    util::{normalize_color, normalize_icon, normalize_required_name},
};

use super::{Engine, with_tx};

impl Engine {
    pub async fn category(&self, category_id: Uuid, user_id: &str) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, category_id).await?;
            Ok(Category::from(model))
        })
    }

    pub async fn list_categories(&self, user_id: &str) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .filter(categories::Column::UserId.eq(user_id.to_string()))
            .order_by_asc(categories::Column::Name)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Category::from).collect())
    }

    pub async fn new_category(&self, cmd: NewCategoryCmd) -> ResultEngine<Uuid> {
        let name = normalize_required_name(&cmd.name, "category")?;
        let color = normalize_color(&cmd.color)?;
        let icon = normalize_icon(cmd.icon.as_deref(), categories::DEFAULT_ICON);
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, &cmd.user_id).await?;
            let category = Category::new(cmd.user_id.clone(), name, icon, color);
            categories::ActiveModel::from(&category)
                .insert(&db_tx)
                .await?;
            Ok(category.id)
        })
    }

    pub async fn update_category(&self, cmd: UpdateCategoryCmd) -> ResultEngine<Category> {
        let name = cmd
            .name
            .as_deref()
            .map(|name| normalize_required_name(name, "category"))
            .transpose()?;
        let color = cmd.color.as_deref().map(normalize_color).transpose()?;
        with_tx!(self, |db_tx| {
            let model = self
                .require_category(&db_tx, &cmd.user_id, cmd.category_id)
                .await?;
            let icon = cmd.icon.as_deref().map_or_else(
                || model.icon.clone(),
                |icon| normalize_icon(Some(icon), categories::DEFAULT_ICON),
            );

            let active = categories::ActiveModel {
                id: ActiveValue::Unchanged(model.id),
                name: ActiveValue::Set(name.unwrap_or(model.name)),
                icon: ActiveValue::Set(icon),
                color: ActiveValue::Set(color.unwrap_or(model.color)),
                ..Default::default()
            };
            let updated = active.update(&db_tx).await?;
            Ok(Category::from(updated))
        })
    }

    /// Delete a category. Its transactions stay, uncategorized.
    pub async fn delete_category(&self, category_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let model = self.require_category(&db_tx, user_id, category_id).await?;

            transactions::Entity::update_many()
                .col_expr(
                    transactions::Column::CategoryId,
                    Expr::value(Option::<Uuid>::None),
                )
                .filter(transactions::Column::CategoryId.eq(model.id))
                .exec(&db_tx)
                .await?;

            categories::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
