use crate::{
    entities::{product, Product, ProductModel, ProductVariant, ProductVariantModel},
    errors::ServiceError,
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use sea_orm::{ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use uuid::Uuid;

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product))
}

#[derive(Debug, Serialize)]
pub struct ProductWithVariants {
    pub product: ProductModel,
    pub variants: Vec<ProductVariantModel>,
}

async fn list_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ServiceError> {
    let products = Product::find()
        .filter(product::Column::IsPublished.eq(true))
        .order_by_asc(product::Column::Name)
        .all(&*state.db)
        .await?;
    Ok(Json(products))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let product = Product::find_by_id(id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("Product {id} not found")))?;

    let variants = product.find_related(ProductVariant).all(&*state.db).await?;
    Ok(Json(ProductWithVariants { product, variants }))
}
