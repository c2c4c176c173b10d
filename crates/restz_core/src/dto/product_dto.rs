use crate::model::product::{Product, ProductId};
use serde::{Deserialize, Serialize};

/// Full product detail with every image filename in `ino` order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub pno: Option<ProductId>,
    pub pname: String,
    pub price: i64,
    pub description: Option<String>,
    pub register_id: String,
    pub upload_file_names: Vec<String>,
}

impl ProductDto {
    /// Converts into an entity; image ordinals follow list order.
    pub fn to_entity(&self) -> Product {
        let mut product = Product::new(self.pname.clone(), self.price, self.register_id.clone());
        product.pno = self.pno;
        product.description = self.description.clone();
        for filename in &self.upload_file_names {
            product.add_image(filename.clone());
        }
        product
    }
}

impl From<&Product> for ProductDto {
    fn from(product: &Product) -> Self {
        Self {
            pno: product.pno,
            pname: product.pname.clone(),
            price: product.price,
            description: product.description.clone(),
            register_id: product.register_id.clone(),
            upload_file_names: product
                .images
                .iter()
                .map(|image| image.filename.clone())
                .collect(),
        }
    }
}

/// List row: one product plus its cover image filename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListDto {
    pub pno: ProductId,
    pub pname: String,
    pub price: i64,
    pub register_id: String,
    /// Cover image (`ino = 0`) filename.
    pub pimage: Option<String>,
    /// Only filled by review-count listings.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub review_count: Option<i64>,
}
