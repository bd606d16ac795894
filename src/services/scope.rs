//! Helpers shared by the per-entity services: owner-scoped lookups of parent
//! rows, paging, and delete reporting.

use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QuerySelect, Select,
};

use crate::{
    entity::{
        Collections, Customers, Images, Orders, Pages, Products, Shops, collections, customers,
        images, orders, pages, products, shops,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::DeleteOutcome,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
};

// Parents referenced from a payload answer 400 rather than 404: the request
// itself is wrong, not the resource in the path.
macro_rules! owned_parent {
    ($($fn_name:ident => $entity:ident, $module:ident, $missing:literal;)*) => {
        $(
            pub async fn $fn_name<C: ConnectionTrait>(
                db: &C,
                user: &AuthUser,
                id: &str,
            ) -> AppResult<$module::Model> {
                $entity::find()
                    .filter(
                        Condition::all()
                            .add($module::Column::Id.eq(id))
                            .add($module::Column::UserId.eq(user.user_id.as_str())),
                    )
                    .one(db)
                    .await?
                    .ok_or_else(|| AppError::BadRequest($missing.into()))
            }
        )*
    };
}

owned_parent! {
    owned_shop => Shops, shops, "Shop not found";
    owned_product => Products, products, "Product not found";
    owned_collection => Collections, collections, "Collection not found";
    owned_page => Pages, pages, "Page not found";
    owned_customer => Customers, customers, "Customer not found";
    owned_order => Orders, orders, "Order not found";
    owned_image => Images, images, "Image not found";
}

/// Run a filtered query for one page of rows and the matching total.
pub async fn fetch_page<E, C>(
    db: &C,
    finder: Select<E>,
    pagination: Pagination,
) -> AppResult<(Vec<E::Model>, Meta)>
where
    C: ConnectionTrait,
    E: EntityTrait,
    E::Model: Sync,
{
    let (page, limit, offset) = pagination.normalize();
    let total = finder.clone().count(db).await? as i64;
    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(db)
        .await?;
    Ok((items, Meta::new(page, limit, total)))
}

pub fn delete_response(id: String, rows_affected: u64) -> ApiResponse<DeleteOutcome> {
    let deleted = rows_affected > 0;
    let message = if deleted { "Deleted" } else { "Nothing to delete" };
    ApiResponse::item(message, DeleteOutcome { id, deleted })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_of_foreign_row_reports_noop() {
        let resp = delete_response("s1".into(), 0);
        assert_eq!(resp.message, "Nothing to delete");
        assert_eq!(
            resp.data,
            Some(DeleteOutcome {
                id: "s1".into(),
                deleted: false
            })
        );

        let resp = delete_response("s1".into(), 1);
        assert_eq!(resp.data.map(|d| d.deleted), Some(true));
    }
}
