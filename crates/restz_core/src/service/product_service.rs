//! Product use-case service.
//!
//! # Responsibility
//! - Register/modify/remove products from `ProductDto` input.
//! - Attach uploaded images under collision-free stored names.

use super::{read_back, ServiceError, ServiceResult};
use crate::dto::product_dto::{ProductDto, ProductListDto};
use crate::model::product::{ProductId, ProductImage};
use crate::repo::page::{Page, PageRequest};
use crate::repo::product_repo::ProductRepository;
use crate::repo::RepoResult;
use log::info;

/// Product service facade over repository implementations.
pub struct ProductService<R: ProductRepository> {
    repo: R,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Stores a product with its images; list order decides `ino`.
    pub fn register(&self, dto: &ProductDto) -> ServiceResult<ProductDto> {
        let mut product = dto.to_entity();
        product.pno = None;
        let pno = self.repo.create_product(&product)?;
        info!(
            "event=product_register module=service status=ok pno={pno} images={}",
            product.images.len()
        );

        let stored = read_back(
            self.repo.get_product_with_images(pno),
            "registered product not found",
        )?;
        Ok(ProductDto::from(&stored))
    }

    pub fn read(&self, pno: ProductId) -> ServiceResult<ProductDto> {
        self.repo
            .get_product_with_images(pno)?
            .map(|product| ProductDto::from(&product))
            .ok_or(ServiceError::NotFound {
                table: "tbl_product",
                id: pno,
            })
    }

    /// Replaces name, price, description and the full image list.
    pub fn modify(&self, dto: &ProductDto) -> ServiceResult<ProductDto> {
        let pno = dto.pno.ok_or(ServiceError::InconsistentState(
            "product modification without pno",
        ))?;
        let mut product = self.repo.get_product(pno)?.ok_or(ServiceError::NotFound {
            table: "tbl_product",
            id: pno,
        })?;

        product.change_name(dto.pname.clone());
        product.change_price(dto.price);
        product.change_description(dto.description.clone());
        product.clear_images();
        for filename in &dto.upload_file_names {
            product.add_image(filename.clone());
        }
        self.repo.update_product(&product)?;

        let stored = read_back(
            self.repo.get_product_with_images(pno),
            "modified product not found",
        )?;
        Ok(ProductDto::from(&stored))
    }

    pub fn remove(&self, pno: ProductId) -> ServiceResult<()> {
        self.repo.delete_product(pno)?;
        info!("event=product_remove module=service status=ok pno={pno}");
        Ok(())
    }

    /// Appends uploaded files after the existing images.
    ///
    /// Returns the stored names in upload order.
    pub fn attach_uploaded_images(
        &self,
        pno: ProductId,
        originals: &[String],
    ) -> ServiceResult<Vec<String>> {
        let mut product =
            self.repo
                .get_product_with_images(pno)?
                .ok_or(ServiceError::NotFound {
                    table: "tbl_product",
                    id: pno,
                })?;

        let stored: Vec<String> = originals
            .iter()
            .map(|original| ProductImage::stored_filename(original))
            .collect();
        for filename in &stored {
            product.add_image(filename.clone());
        }
        self.repo.update_product(&product)?;
        Ok(stored)
    }

    pub fn list(&self, request: &PageRequest) -> RepoResult<Page<ProductListDto>> {
        self.repo.list(request)
    }

    pub fn list_with_review_count(
        &self,
        request: &PageRequest,
    ) -> RepoResult<Page<ProductListDto>> {
        self.repo.list_with_review_count(request)
    }
}
